use super::*;

#[test]
fn test_intern_is_stable() {
    let interner = ShardedInterner::new();
    let a = interner.intern("java.util.List");
    let b = interner.intern("java.util.List");
    assert_eq!(a, b);
    assert_eq!(&*interner.resolve(a), "java.util.List");
}

#[test]
fn test_distinct_strings_get_distinct_atoms() {
    let interner = ShardedInterner::new();
    let t = interner.intern("T");
    let u = interner.intern("U");
    assert_ne!(t, u);
    assert_eq!(&*interner.resolve(t), "T");
    assert_eq!(&*interner.resolve(u), "U");
}

#[test]
fn test_empty_string_is_none_atom() {
    let interner = ShardedInterner::new();
    assert_eq!(interner.intern(""), Atom::NONE);
    assert_eq!(Atom::default(), Atom::NONE);
    assert_eq!(&*interner.resolve(Atom::NONE), "");
}

#[test]
fn test_intern_common_keeps_existing_atoms() {
    let interner = ShardedInterner::new();
    let object = interner.intern("java.lang.Object");
    interner.intern_common();
    interner.intern_common();
    assert_eq!(interner.intern("java.lang.Object"), object);
    assert_eq!(&*interner.resolve(object), "java.lang.Object");
}

#[test]
fn test_unknown_atom_resolves_to_empty() {
    let interner = ShardedInterner::new();
    assert_eq!(&*interner.resolve(Atom(u32::MAX)), "");
}
