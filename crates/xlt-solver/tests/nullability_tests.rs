use super::*;
use crate::decl::TypeDeclaration;
use crate::queries::{is_denotable, type_variable_of};
use crate::test_fixtures::Fixture;
use crate::types::TypeVariableBounds;

fn lookup(fx: &Fixture, id: TypeId) -> TypeData {
    fx.db.lookup(id).expect("interned")
}

fn members(fx: &Fixture, id: TypeId) -> Vec<TypeId> {
    match lookup(fx, id) {
        TypeData::Intersection(list) | TypeData::Union(list) => fx.db.type_list(list).to_vec(),
        other => panic!("expected intersection or union, got {other:?}"),
    }
}

/// Descriptors covering every variant and every normalizer branch.
fn corpus(fx: &Fixture) -> Vec<TypeId> {
    let string = fx.class("java.lang.String");
    let strict = fx.register(TypeDeclaration::class(fx.atom("kotlin.Strict")).nullable_as_bound(false));
    let (list, _) = fx.generic_interface("java.util.List");

    let t = fx.parameter("Box", "T", TypeId::NULLABLE_ANY);
    let s = fx.parameter("Box", "S", fx.nullable(strict, vec![]));
    let r = fx.parameter("Box", "R", TypeId::ANY);
    let rv = type_variable_of(&fx.db, r).expect("variable");
    let extends_string = fx.wildcard(fx.nullable(string, vec![]), None);
    let super_string = fx.wildcard(TypeId::NULLABLE_ANY, Some(fx.declared(string, vec![])));

    vec![
        TypeId::INT,
        TypeId::ANY,
        TypeId::NULLABLE_ANY,
        TypeId::UNBOUNDED_WILDCARD,
        fx.declared(string, vec![]),
        fx.nullable(string, vec![]),
        fx.nullable(list, vec![fx.nullable(string, vec![])]),
        fx.db.array(TypeId::INT, true),
        fx.db.array(fx.nullable(string, vec![]), true),
        t,
        s,
        r,
        fx.db.variable(rv, true),
        extends_string,
        super_string,
        fx.db.intersection(vec![t, s]),
        fx.db.union(vec![fx.nullable(string, vec![]), t]),
    ]
}

#[test]
fn test_non_nullable_input_is_unchanged() {
    let fx = Fixture::new();
    let string = fx.declared(fx.class("java.lang.String"), vec![]);

    assert_eq!(make_non_null(&fx.db, TypeId::INT), Ok(TypeId::INT));
    assert_eq!(make_non_null(&fx.db, TypeId::ANY), Ok(TypeId::ANY));
    assert_eq!(make_non_null(&fx.db, string), Ok(string));
}

#[test]
fn test_declared_and_array_flags_are_cleared() {
    let fx = Fixture::new();
    let string = fx.class("java.lang.String");

    assert_eq!(make_non_null(&fx.db, TypeId::NULLABLE_ANY), Ok(TypeId::ANY));
    assert_eq!(
        make_non_null(&fx.db, fx.nullable(string, vec![])),
        Ok(fx.declared(string, vec![]))
    );

    let component = fx.nullable(string, vec![]);
    assert_eq!(
        make_non_null(&fx.db, fx.db.array(component, true)),
        Ok(fx.db.array(component, false))
    );
}

#[test]
fn test_unbounded_wildcard_is_left_alone() {
    let fx = Fixture::new();
    assert_eq!(
        make_non_null(&fx.db, TypeId::UNBOUNDED_WILDCARD),
        Ok(TypeId::UNBOUNDED_WILDCARD)
    );

    // `? super String` also has the implicit upper bound.
    let string = fx.declared(fx.class("java.lang.String"), vec![]);
    let super_string = fx.wildcard(TypeId::NULLABLE_ANY, Some(string));
    assert_eq!(make_non_null(&fx.db, super_string), Ok(super_string));
}

#[test]
fn test_bounded_wildcard_gets_non_null_bound() {
    let fx = Fixture::new();
    let string = fx.class("java.lang.String");
    let extends_string = fx.wildcard(fx.nullable(string, vec![]), None);

    let result = make_non_null(&fx.db, extends_string).expect("normalizes");
    assert_ne!(result, extends_string);

    let TypeData::TypeVariable { variable, nullable } = lookup(&fx, result) else {
        panic!("expected type variable");
    };
    assert!(!nullable);
    let info = fx.db.type_variable(variable).expect("bound");
    assert!(info.is_wildcard_or_capture);
    assert_eq!(info.upper_bound, fx.declared(string, vec![]));
    assert!(fx.db.resolve_atom(info.key).starts_with("<??>"));
}

#[test]
fn test_nullable_bounds_force_t_and_any() {
    let fx = Fixture::new();
    let t = fx.parameter("Box", "T", TypeId::NULLABLE_ANY);

    let result = make_non_null(&fx.db, t).expect("normalizes");
    assert_eq!(members(&fx, result), vec![t, TypeId::ANY]);
    assert_eq!(is_denotable(&fx.db, result), Ok(true));

    // The explicit mark is dropped from the intersection member.
    let tv = type_variable_of(&fx.db, t).expect("variable");
    assert_eq!(make_non_null(&fx.db, fx.db.variable(tv, true)), Ok(result));
}

#[test]
fn test_forced_intersection_for_every_nullable_bound_chain() {
    let fx = Fixture::new();
    let w = fx.parameter("Chain", "W", TypeId::NULLABLE_ANY);
    let v = fx.parameter("Chain", "V", w);
    let (list, _) = fx.generic_interface("java.util.List");
    let u = fx.parameter("Chain", "U", fx.nullable(list, vec![v]));

    for variable in [w, v, u] {
        let result = make_non_null(&fx.db, variable).expect("normalizes");
        assert_eq!(members(&fx, result), vec![variable, TypeId::ANY]);
        assert_eq!(is_denotable(&fx.db, result), Ok(true));
    }
}

#[test]
fn test_marked_variable_with_non_null_bound_drops_mark() {
    let fx = Fixture::new();
    let r = fx.parameter("Box", "R", TypeId::ANY);
    let rv = type_variable_of(&fx.db, r).expect("variable");

    assert_eq!(make_non_null(&fx.db, fx.db.variable(rv, true)), Ok(r));
    assert_eq!(make_non_null(&fx.db, r), Ok(r));
}

#[test]
fn test_bound_forbidding_null_rebuilds_variable() {
    let fx = Fixture::new();
    let strict = fx.register(TypeDeclaration::class(fx.atom("kotlin.Strict")).nullable_as_bound(false));
    let s = fx.parameter("Box", "S", fx.nullable(strict, vec![]));
    let sv = type_variable_of(&fx.db, s).expect("variable");

    let result = make_non_null(&fx.db, s).expect("normalizes");
    let TypeData::TypeVariable { variable, nullable } = lookup(&fx, result) else {
        panic!("expected type variable");
    };
    assert!(!nullable);
    assert_ne!(variable, sv);

    let original = fx.db.type_variable(sv).expect("bound");
    let rebuilt = fx.db.type_variable(variable).expect("bound");
    assert_eq!(rebuilt.upper_bound, fx.declared(strict, vec![]));
    assert_eq!(rebuilt.name, original.name);
    assert_eq!(rebuilt.declaring, original.declaring);
    assert_eq!(rebuilt.lower_bound, None);
    assert!(!rebuilt.is_wildcard_or_capture);
    assert_eq!(
        fx.db.resolve_atom(rebuilt.key),
        "<??>Box::S+kotlin.Strict-null"
    );
}

#[test]
fn test_rebuilt_keys_do_not_collide() {
    let fx = Fixture::new();
    let strict = fx.register(TypeDeclaration::class(fx.atom("kotlin.Strict")).nullable_as_bound(false));
    let other = fx.register(TypeDeclaration::class(fx.atom("kotlin.Other")).nullable_as_bound(false));

    let a = fx.parameter("Box", "A", fx.nullable(strict, vec![]));
    let b = fx.parameter("Box", "B", fx.nullable(strict, vec![]));
    let c = fx.parameter("Box", "A2", fx.nullable(other, vec![]));

    let results: Vec<TypeId> = [a, b, c]
        .into_iter()
        .map(|id| make_non_null(&fx.db, id).expect("normalizes"))
        .collect();
    assert_ne!(results[0], results[1]);
    assert_ne!(results[0], results[2]);
    assert_ne!(results[1], results[2]);
}

#[test]
fn test_intersection_appends_any() {
    let fx = Fixture::new();
    let t = fx.parameter("Box", "T", TypeId::NULLABLE_ANY);
    let u = fx.parameter("Box", "U", TypeId::NULLABLE_ANY);
    let both = fx.db.intersection(vec![t, u]);

    let result = make_non_null(&fx.db, both).expect("normalizes");
    assert_eq!(members(&fx, result), vec![t, u, TypeId::ANY]);
    // Only the two-member shape is denotable.
    assert_eq!(is_denotable(&fx.db, result), Ok(false));
}

#[test]
fn test_union_normalizes_every_member() {
    let fx = Fixture::new();
    let io = fx.class("java.io.IOException");
    let state = fx.class("java.lang.IllegalStateException");
    let either = fx.db.union(vec![fx.nullable(io, vec![]), fx.nullable(state, vec![])]);

    let result = make_non_null(&fx.db, either).expect("normalizes");
    assert_eq!(
        members(&fx, result),
        vec![fx.declared(io, vec![]), fx.declared(state, vec![])]
    );
}

#[test]
fn test_self_bounded_variables() {
    let fx = Fixture::new();
    let (comparable, _) = fx.generic_interface("java.lang.Comparable");

    // Node::T extends Comparable<Node::T>?: permitted chain, so T & Any.
    let (tv, t) = fx.declare_parameter("Node", "T");
    fx.bind_parameter(tv, "Node", "T", fx.nullable(comparable, vec![t]));
    let result = make_non_null(&fx.db, t).expect("normalizes");
    assert_eq!(members(&fx, result), vec![t, TypeId::ANY]);

    // Same shape over a declaration that forbids nullable bounds.
    let strict = fx.reserve("kotlin.StrictComparable");
    let (sv, s) = fx.declare_parameter("kotlin.StrictComparable", "T");
    fx.bind_parameter(sv, "kotlin.StrictComparable", "T", fx.nullable(strict, vec![s]));
    fx.complete(
        strict,
        TypeDeclaration::interface(fx.atom("kotlin.StrictComparable"))
            .with_type_parameters(vec![s])
            .recursive(true)
            .nullable_as_bound(false),
    );
    let result = make_non_null(&fx.db, s).expect("normalizes");
    let TypeData::TypeVariable { variable, .. } = lookup(&fx, result) else {
        panic!("expected type variable");
    };
    let rebuilt = fx.db.type_variable(variable).expect("bound");
    assert_eq!(rebuilt.upper_bound, fx.declared(strict, vec![s]));
}

#[test]
fn test_capture_cycle_terminates() {
    let fx = Fixture::new();
    let first = fx.db.declare_type_variable(fx.atom("capture#1"));
    let second = fx.db.declare_type_variable(fx.atom("capture#2"));
    fx.db
        .bind_type_variable(
            first,
            TypeVariableBounds::wildcard(fx.atom("capture#1"), fx.db.variable(second, true), None),
        )
        .expect("binds");
    fx.db
        .bind_type_variable(
            second,
            TypeVariableBounds::wildcard(fx.atom("capture#2"), fx.db.variable(first, true), None),
        )
        .expect("binds");

    let result = make_non_null(&fx.db, fx.db.variable(first, false));
    assert!(result.is_ok());
}

#[test]
fn test_make_non_null_is_idempotent() {
    let fx = Fixture::new();
    for id in corpus(&fx) {
        let once = make_non_null(&fx.db, id).expect("normalizes");
        let twice = make_non_null(&fx.db, once).expect("normalizes again");
        assert_eq!(once, twice, "not idempotent for {id:?}");
    }
}

#[test]
fn test_make_non_null_result_is_not_nullable() {
    let fx = Fixture::new();
    for id in corpus(&fx) {
        let result = make_non_null(&fx.db, id).expect("normalizes");
        let expected_nullable = id == TypeId::UNBOUNDED_WILDCARD
            || matches!(lookup(&fx, id), TypeData::TypeVariable { variable, .. }
                if fx.db.type_variable(variable).is_some_and(|info| {
                    info.is_wildcard_or_capture && info.upper_bound == TypeId::NULLABLE_ANY
                }));
        assert_eq!(
            is_nullable(&fx.db, result),
            Ok(expected_nullable),
            "unexpected nullability for {id:?}"
        );
    }
}
