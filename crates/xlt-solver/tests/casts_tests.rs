use super::*;
use crate::decl::{DeclId, TypeDeclaration};
use crate::test_fixtures::Fixture;
use crate::types::TypeVariableBounds;

struct Types {
    list: DeclId,
    string: TypeId,
    nullable_string: TypeId,
}

fn types(fx: &Fixture) -> Types {
    let (list, _) = fx.generic_interface("java.util.List");
    let string = fx.class("java.lang.String");
    Types {
        list,
        string: fx.declared(string, vec![]),
        nullable_string: fx.nullable(string, vec![]),
    }
}

#[test]
fn test_argument_nullability_mismatch_needs_cast() {
    let fx = Fixture::new();
    let t = types(&fx);
    let from = fx.declared(t.list, vec![t.string]);
    let to = fx.declared(t.list, vec![t.nullable_string]);

    assert_eq!(cast_for_conversion(&fx.db, from, to), Ok(Some(to)));
    assert_eq!(cast_for_conversion(&fx.db, to, from), Ok(Some(from)));
    assert_eq!(cast_for_conversion(&fx.db, to, to), Ok(None));
}

#[test]
fn test_top_level_nullability() {
    let fx = Fixture::new();
    let t = types(&fx);

    assert_eq!(cast_for_conversion(&fx.db, t.nullable_string, t.string), Ok(Some(t.string)));
    assert_eq!(cast_for_conversion(&fx.db, t.string, t.nullable_string), Ok(None));
    assert_eq!(cast_for_conversion(&fx.db, TypeId::INT, TypeId::INT), Ok(None));
}

#[test]
fn test_nested_argument_mismatch() {
    let fx = Fixture::new();
    let t = types(&fx);
    let k = fx.parameter("java.util.Map", "K", TypeId::NULLABLE_ANY);
    let v = fx.parameter("java.util.Map", "V", TypeId::NULLABLE_ANY);
    let map = fx.register(TypeDeclaration::interface(fx.atom("java.util.Map")).with_type_parameters(vec![k, v]));

    let from = fx.declared(map, vec![t.string, fx.declared(t.list, vec![t.string])]);
    let to = fx.declared(map, vec![t.string, fx.declared(t.list, vec![t.nullable_string])]);
    assert_eq!(needs_cast(&fx.db, from, to), Ok(true));
}

#[test]
fn test_array_component_mismatch() {
    let fx = Fixture::new();
    let t = types(&fx);
    let from = fx.db.array(t.string, false);
    let to = fx.db.array(t.nullable_string, false);

    assert_eq!(needs_cast(&fx.db, from, to), Ok(true));
    assert_eq!(needs_cast(&fx.db, to, to), Ok(false));
}

#[test]
fn test_wildcard_argument_inferred_as_plain_type() {
    let fx = Fixture::new();
    let t = types(&fx);
    let extends_string = fx.wildcard(t.string, None);
    let from = fx.declared(t.list, vec![extends_string]);
    let to = fx.declared(t.list, vec![t.string]);

    assert_eq!(needs_cast(&fx.db, from, to), Ok(true));
    assert_eq!(needs_cast(&fx.db, from, from), Ok(false));
}

#[test]
fn test_inferred_wildcard_is_projected() {
    let fx = Fixture::new();
    let t = types(&fx);
    let to = fx.declared(t.list, vec![t.nullable_string]);
    let extends_list = fx.wildcard(to, None);
    let super_list = fx.wildcard(TypeId::NULLABLE_ANY, Some(to));

    assert_eq!(project(&fx.db, extends_list), Ok(to));
    assert_eq!(project(&fx.db, super_list), Ok(to));
    assert_eq!(project(&fx.db, t.string), Ok(t.string));

    let from = fx.declared(t.list, vec![t.string]);
    assert_eq!(cast_for_conversion(&fx.db, from, extends_list), Ok(Some(to)));
}

#[test]
fn test_projection_stops_at_named_variable_and_cycles() {
    let fx = Fixture::new();
    let t = fx.parameter("Box", "T", TypeId::NULLABLE_ANY);
    let (_, capture) = fx.capture("capture#1", t);
    assert_eq!(project(&fx.db, capture), Ok(t));

    let first = fx.db.declare_type_variable(fx.atom("capture#2"));
    let second = fx.db.declare_type_variable(fx.atom("capture#3"));
    fx.db
        .bind_type_variable(
            first,
            TypeVariableBounds::wildcard(fx.atom("capture#2"), fx.db.variable(second, false), None),
        )
        .expect("binds");
    fx.db
        .bind_type_variable(
            second,
            TypeVariableBounds::wildcard(fx.atom("capture#3"), fx.db.variable(first, false), None),
        )
        .expect("binds");
    let start = fx.db.variable(first, false);
    assert_eq!(project(&fx.db, start), Ok(start));
}

#[test]
fn test_non_denotable_target_never_gets_cast() {
    let fx = Fixture::new();
    let t = types(&fx);
    let anonymous = fx.register(TypeDeclaration::class(fx.atom("Main$1")).anonymous());
    let nullable_anonymous = fx.nullable(anonymous, vec![]);
    let anonymous = fx.declared(anonymous, vec![]);

    assert_eq!(needs_cast(&fx.db, nullable_anonymous, anonymous), Ok(false));

    let from = fx.declared(t.list, vec![nullable_anonymous]);
    let to = fx.declared(t.list, vec![anonymous]);
    assert_eq!(needs_cast(&fx.db, from, to), Ok(false));

    let both = fx.db.intersection(vec![t.string, fx.parameter("Box", "T", TypeId::NULLABLE_ANY)]);
    assert_eq!(needs_cast(&fx.db, t.nullable_string, both), Ok(false));
}

#[test]
fn test_is_denotable_for_cast() {
    let fx = Fixture::new();
    let t = types(&fx);
    let mut seen = FxHashSet::default();

    let super_string = fx.wildcard(TypeId::NULLABLE_ANY, Some(t.string));
    assert_eq!(
        is_denotable_for_cast(&fx.db, fx.declared(t.list, vec![super_string]), &mut seen),
        Ok(true)
    );
    let unknown_component = fx.db.intern(TypeData::Array {
        component: None,
        nullable: false,
    });
    assert_eq!(is_denotable_for_cast(&fx.db, unknown_component, &mut seen), Ok(false));
    assert!(seen.is_empty());

    // Self-referential capture: `capture#1 extends List<capture#1>`.
    let variable = fx.db.declare_type_variable(fx.atom("capture#1"));
    let capture = fx.db.variable(variable, false);
    fx.db
        .bind_type_variable(
            variable,
            TypeVariableBounds::wildcard(fx.atom("capture#1"), fx.declared(t.list, vec![capture]), None),
        )
        .expect("binds");
    assert_eq!(is_denotable_for_cast(&fx.db, capture, &mut seen), Ok(true));
}

#[test]
fn test_type_argument_descriptors() {
    let fx = Fixture::new();
    let t = types(&fx);

    assert_eq!(
        type_argument_descriptors(&fx.db, fx.declared(t.list, vec![t.string])),
        Ok(vec![t.string])
    );
    assert_eq!(type_argument_descriptors(&fx.db, fx.db.array(TypeId::INT, true)), Ok(vec![TypeId::INT]));
    assert_eq!(type_argument_descriptors(&fx.db, TypeId::INT), Ok(vec![]));
}
