use super::*;

#[test]
fn test_primitive_ids_round_trip() {
    for kind in PrimitiveKind::ALL {
        let id = kind.to_type_id();
        assert!(id.is_intrinsic());
        assert_eq!(PrimitiveKind::from_type_id(id), Some(kind));
        assert_eq!(PrimitiveKind::from_keyword(kind.keyword()), Some(kind));
    }
    assert_eq!(PrimitiveKind::from_type_id(TypeId::ANY), None);
}

#[test]
fn test_primitive_target_names() {
    assert_eq!(PrimitiveKind::Int.target_name(), "Int");
    assert_eq!(PrimitiveKind::Void.target_name(), "Unit");
    assert_eq!(PrimitiveKind::Char.target_array_name(), Some("CharArray"));
    assert_eq!(PrimitiveKind::Void.target_array_name(), None);
}

#[test]
fn test_intrinsic_range() {
    assert!(TypeId::NULLABLE_ANY.is_intrinsic());
    assert!(TypeId::UNBOUNDED_WILDCARD.is_intrinsic());
    assert!(!TypeId(TypeId::FIRST_USER).is_intrinsic());
}

#[test]
fn test_kind_names() {
    assert_eq!(TypeData::Primitive(PrimitiveKind::Int).kind_name(), "primitive");
    assert_eq!(TypeData::Union(TypeListId::EMPTY).kind_name(), "union");
    assert_eq!(
        TypeData::TypeVariable {
            variable: TypeVarId::UNBOUNDED_WILDCARD,
            nullable: false
        }
        .kind_name(),
        "type variable"
    );
}

#[test]
fn test_type_variable_info_keeps_bounds() {
    let bounds = TypeVariableBounds::wildcard(Atom(3), TypeId::ANY, Some(TypeId::INT));
    let info = TypeVariableInfo::new(Atom(7), bounds.clone());
    assert_eq!(info.key, Atom(7));
    assert!(info.is_wildcard_or_capture);
    assert_eq!(info.bounds(), bounds);

    let parameter = TypeVariableBounds::parameter(Atom(4), Some(Atom(5)), TypeId::NULLABLE_ANY);
    assert!(!parameter.is_wildcard_or_capture);
    assert_eq!(parameter.lower_bound, None);
}
