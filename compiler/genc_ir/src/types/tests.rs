use pretty_assertions::assert_eq;

use super::*;

#[test]
fn pre_interned_indices_are_stable() {
    let pool = TypePool::new();
    assert_eq!(pool.len(), TypeIdx::PRIMITIVE_COUNT as usize);
    assert_eq!(pool.get(TypeIdx::VOID), Some(&LowType::Void));
    assert_eq!(pool.get(TypeIdx::SIGNED), Some(&LowType::Signed));
    assert_eq!(
        pool.get(TypeIdx::OBJECT_GC),
        Some(&LowType::Ptr {
            gc: true,
            to: TypeIdx::PYOBJECT
        })
    );
    assert_eq!(
        pool.get(TypeIdx::OBJECT_RAW),
        Some(&LowType::Ptr {
            gc: false,
            to: TypeIdx::PYOBJECT
        })
    );
}

#[test]
fn interning_deduplicates_structural_types() {
    let mut pool = TypePool::new();
    let a = pool.array(TypeIdx::SIGNED);
    let b = pool.array(TypeIdx::SIGNED);
    assert_eq!(a, b);

    // Re-interning a pre-interned shape returns the fixed index.
    assert_eq!(pool.gc_ptr(TypeIdx::PYOBJECT), TypeIdx::OBJECT_GC);
    assert_eq!(pool.raw_ptr(TypeIdx::PYOBJECT), TypeIdx::OBJECT_RAW);
}

#[test]
fn structs_are_nominal() {
    let mut pool = TypePool::new();
    let first = pool.struct_type("Point", vec![("x", TypeIdx::SIGNED)]);
    let again = pool.declare_struct("Point");
    assert_eq!(first, again);
    assert_eq!(
        pool.as_struct(first).and_then(|st| st.field("x")),
        Some(TypeIdx::SIGNED)
    );
}

#[test]
fn recursive_struct_via_declare_define() {
    let mut pool = TypePool::new();
    let node = pool.declare_struct("Node");
    let node_ptr = pool.gc_ptr(node);
    assert!(pool.define_struct(
        node,
        vec![
            ("value".to_owned(), TypeIdx::SIGNED),
            ("next".to_owned(), node_ptr),
        ]
    ));

    assert_eq!(pool.pointee(node_ptr), Some(node));
    assert!(pool.is_gc_pointer(node_ptr));
    assert_eq!(
        pool.as_struct(node).and_then(|st| st.field("next")),
        Some(node_ptr)
    );

    // Defining a non-struct fails.
    assert!(!pool.define_struct(TypeIdx::SIGNED, vec![]));
}

#[test]
fn varsize_layout_of_array_and_struct() {
    let mut pool = TypePool::new();
    let arr = pool.array(TypeIdx::FLOAT);
    let layout = pool.varsize_layout(arr);
    assert_eq!(
        layout,
        Some(VarsizeLayout {
            array_field: None,
            array: arr,
            item: TypeIdx::FLOAT,
        })
    );

    let st = pool.struct_type("Buf", vec![("hash", TypeIdx::SIGNED), ("chars", arr)]);
    let layout = pool.varsize_layout(st);
    assert_eq!(
        layout,
        Some(VarsizeLayout {
            array_field: Some("chars"),
            array: arr,
            item: TypeIdx::FLOAT,
        })
    );

    let fixed = pool.struct_type("Fixed", vec![("a", TypeIdx::SIGNED)]);
    assert_eq!(pool.varsize_layout(fixed), None);
    assert_eq!(pool.varsize_layout(TypeIdx::SIGNED), None);
}

#[test]
fn non_pointers_have_no_pointee() {
    let pool = TypePool::new();
    assert_eq!(pool.pointee(TypeIdx::SIGNED), None);
    assert!(!pool.is_gc_pointer(TypeIdx::OBJECT_RAW));
    assert_eq!(pool.get(TypeIdx::from_raw(999)), None);
}

#[test]
fn debug_names() {
    assert_eq!(format!("{:?}", TypeIdx::VOID), "TypeIdx::Void");
    assert_eq!(format!("{:?}", TypeIdx::from_raw(40)), "TypeIdx(40)");
    assert!(TypeIdx::VOID.is_void());
    assert!(TypeIdx::OBJECT_RAW.is_primitive());
}
