use std::mem;

use super::*;

#[test]
fn var_id_basics() {
    let v = VarId::new(42);
    assert_eq!(v.raw(), 42);
    assert_eq!(v.index(), 42);
    assert_eq!(format!("{v:?}"), "v42");
}

#[test]
fn block_id_basics() {
    let b = BlockId::new(7);
    assert_eq!(b.raw(), 7);
    assert_eq!(b.index(), 7);
    assert_eq!(format!("{b:?}"), "B7");
}

#[test]
fn id_sizes() {
    assert_eq!(mem::size_of::<VarId>(), 4);
    assert_eq!(mem::size_of::<ConstId>(), 4);
    assert_eq!(mem::size_of::<BlockId>(), 4);
}

#[test]
fn value_projections() {
    let var = Value::from(VarId::new(3));
    let lit = Value::from(ConstId::new(3));

    assert_eq!(var.as_var(), Some(VarId::new(3)));
    assert_eq!(var.as_const(), None);
    assert_eq!(lit.as_const(), Some(ConstId::new(3)));
    assert_eq!(lit.as_var(), None);
    assert!(var.is_var());
    assert!(!lit.is_var());

    // Same raw index, different kind.
    assert_ne!(var, lit);
}
