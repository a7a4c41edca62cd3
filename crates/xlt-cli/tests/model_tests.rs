use super::*;
use std::io::Write;
use xlt_solver::queries::{declaration_of, type_variable_of};
use xlt_solver::{TypeData, TypeFormatter};

fn build(json: &str) -> Result<LoadedModel, ModelError> {
    ProgramModel::parse(json)?.build()
}

const NODE_MODEL: &str = r#"{
    "declarations": [
        {
            "name": "java.lang.Comparable",
            "kind": "interface",
            "type_parameters": [{ "name": "T" }],
            "methods": [{ "name": "compareTo", "signature": "(Ljava/lang/Object;)I" }]
        },
        {
            "name": "Node",
            "type_parameters": [{
                "name": "T",
                "bound": {
                    "kind": "declared",
                    "name": "java.lang.Comparable",
                    "arguments": [{ "kind": "parameter", "declaring": "Node", "name": "T" }]
                }
            }],
            "super_types": [{ "kind": "declared", "name": "java.lang.Object" }]
        }
    ],
    "types": [
        { "name": "raw", "type": { "kind": "declared", "name": "Node" } },
        { "name": "t", "type": { "kind": "parameter", "declaring": "Node", "name": "T", "nullable": true } }
    ]
}"#;

#[test]
fn test_build_model_with_self_referential_bound() {
    let model = build(NODE_MODEL).expect("model builds");
    let node = model.declaration("Node").expect("declared");
    let declaration = model.db.declaration(node).expect("complete");

    assert!(declaration.is_recursive);
    assert_eq!(declaration.super_types, vec![TypeId::ANY]);
    assert_eq!(model.types.len(), 2);

    let (_, t) = model.types[1];
    assert!(matches!(
        model.db.lookup(t),
        Some(TypeData::TypeVariable { nullable: true, .. })
    ));
    let comparable = model.declaration("java.lang.Comparable").expect("declared");
    assert!(!model.db.declaration(comparable).expect("complete").is_recursive);
}

#[test]
fn test_root_class_resolves_to_intrinsics() {
    let model = build(
        r#"{ "types": [
            { "name": "any", "type": { "kind": "declared", "name": "java.lang.Object" } },
            { "name": "any?", "type": { "kind": "declared", "name": "java.lang.Object", "nullable": true } }
        ] }"#,
    )
    .expect("model builds");
    assert_eq!(model.types[0].1, TypeId::ANY);
    assert_eq!(model.types[1].1, TypeId::NULLABLE_ANY);
}

#[test]
fn test_declarations_may_refer_forward() {
    let model = build(
        r#"{
            "declarations": [
                { "name": "A", "super_types": [{ "kind": "declared", "name": "B" }] },
                { "name": "B", "kind": "interface" }
            ]
        }"#,
    )
    .expect("model builds");
    let a = model.declaration("A").expect("declared");
    let b = model.declaration("B").expect("declared");
    let super_type = model.db.declaration(a).expect("complete").super_types[0];
    assert_eq!(declaration_of(&model.db, super_type), Ok(b));
}

#[test]
fn test_explicit_recursive_flag_wins() {
    let model = build(
        r#"{
            "declarations": [
                { "name": "Plain", "type_parameters": [{ "name": "T" }], "recursive": true }
            ]
        }"#,
    )
    .expect("model builds");
    let plain = model.declaration("Plain").expect("declared");
    assert!(model.db.declaration(plain).expect("complete").is_recursive);
}

#[test]
fn test_enclosing_type_parameters() {
    let model = build(
        r#"{
            "declarations": [
                { "name": "Outer", "type_parameters": [{ "name": "T" }] },
                { "name": "Outer$Inner", "enclosing": "Outer", "type_parameters": [{ "name": "U" }] }
            ]
        }"#,
    )
    .expect("model builds");
    let inner = model.declaration("Outer$Inner").expect("declared");
    let declaration = model.db.declaration(inner).expect("complete");

    assert_eq!(declaration.type_parameters.len(), 2);
    assert_eq!(declaration.directly_declared_type_parameter_count, 1);
    let outer_t = type_variable_of(&model.db, declaration.type_parameters[1]).expect("variable");
    let key = model.db.type_variable_key(outer_t).expect("declared");
    assert_eq!(model.db.resolve_atom(key), "Outer::T");
}

#[test]
fn test_enclosing_cycle_is_rejected() {
    let result = build(
        r#"{
            "declarations": [
                { "name": "A", "enclosing": "B" },
                { "name": "B", "enclosing": "A" }
            ]
        }"#,
    );
    assert!(matches!(result, Err(ModelError::EnclosingCycle(_))));
}

#[test]
fn test_wildcards_and_composites() {
    let model = build(
        r#"{
            "declarations": [
                { "name": "java.util.List", "kind": "interface", "type_parameters": [{ "name": "E" }] },
                { "name": "java.lang.String" }
            ],
            "types": [
                { "name": "star", "type": { "kind": "wildcard" } },
                { "name": "out", "type": {
                    "kind": "declared", "name": "java.util.List",
                    "arguments": [{ "kind": "wildcard", "upper": { "kind": "declared", "name": "java.lang.String" } }]
                } },
                { "name": "in", "type": {
                    "kind": "wildcard", "lower": { "kind": "declared", "name": "java.lang.String" }
                } },
                { "name": "ints", "type": { "kind": "array", "component": { "kind": "primitive", "name": "int" }, "nullable": true } },
                { "name": "both", "type": { "kind": "intersection", "members": [
                    { "kind": "declared", "name": "java.lang.String" },
                    { "kind": "declared", "name": "java.util.List", "arguments": [{ "kind": "wildcard" }] }
                ] } },
                { "name": "either", "type": { "kind": "union", "members": [
                    { "kind": "declared", "name": "java.lang.String" },
                    { "kind": "primitive", "name": "int" }
                ] } }
            ]
        }"#,
    )
    .expect("model builds");

    let rendered: Vec<String> = model
        .types
        .iter()
        .map(|&(_, id)| TypeFormatter::new(&model.db).format(id))
        .collect();
    assert_eq!(
        rendered,
        vec![
            "*",
            "List<out String>",
            "in String",
            "IntArray?",
            "String & List<*>",
            "String | Int",
        ]
    );
    assert_eq!(model.types[0].1, TypeId::UNBOUNDED_WILDCARD);
}

#[test]
fn test_method_paths() {
    let model = build(
        r#"{
            "declarations": [
                { "name": "java.util.Collection", "kind": "interface",
                  "methods": [{ "name": "size", "signature": "()I" }, { "name": "size", "signature": "(I)I" }] }
            ]
        }"#,
    )
    .expect("model builds");

    let size = model.method("java.util.Collection.size").expect("method");
    let collection = model.declaration("java.util.Collection").expect("declared");
    let declaration = model.db.declaration(collection).expect("complete");
    assert_eq!(declaration.methods.len(), 2);
    assert_eq!(declaration.methods[0], size);

    assert!(matches!(
        model.method("java.util.Collection.clear"),
        Err(ModelError::UnknownMethod { .. })
    ));
    assert!(matches!(model.method("size"), Err(ModelError::InvalidMethodPath(_))));
    assert!(matches!(model.method("Missing.size"), Err(ModelError::UnknownDeclaration(_))));
}

#[test]
fn test_model_errors() {
    assert!(matches!(build("{ not json"), Err(ModelError::Parse(_))));
    assert!(matches!(
        build(r#"{ "declarations": [{ "name": "A" }, { "name": "A" }] }"#),
        Err(ModelError::DuplicateDeclaration(name)) if name == "A"
    ));
    assert!(matches!(
        build(r#"{ "declarations": [{ "name": "java.lang.Object" }] }"#),
        Err(ModelError::DuplicateDeclaration(_))
    ));
    assert!(matches!(
        build(r#"{ "types": [{ "name": "x", "type": { "kind": "declared", "name": "Missing" } }] }"#),
        Err(ModelError::UnknownDeclaration(name)) if name == "Missing"
    ));
    assert!(matches!(
        build(r#"{ "types": [{ "name": "x", "type": { "kind": "primitive", "name": "integer" } }] }"#),
        Err(ModelError::UnknownPrimitive(_))
    ));
    assert!(matches!(
        build(r#"{ "types": [{ "name": "x", "type": { "kind": "parameter", "declaring": "A", "name": "T" } }] }"#),
        Err(ModelError::UnknownTypeParameter { .. })
    ));
}

#[test]
fn test_parse_model_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(NODE_MODEL.as_bytes()).expect("write model");

    let json = std::fs::read_to_string(file.path()).expect("read model");
    let model = ProgramModel::parse(&json).expect("parses");
    assert_eq!(model.declarations.len(), 2);
    assert_eq!(model.declarations[0].kind, DeclarationKind::Interface);
    assert_eq!(model.declarations[1].kind, DeclarationKind::Class);
    assert!(model.declarations[1].nullable_as_bound);
    assert_eq!(model.declarations[0].methods[0].signature, "(Ljava/lang/Object;)I");
}
