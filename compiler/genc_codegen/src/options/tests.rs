use super::*;

#[test]
fn default_labels() {
    let opts = CodegenOptions::default();
    assert_eq!(opts.block_label(3), "block3");
    assert_eq!(opts.error_label(3, 0), "err3_0");
    assert_eq!(opts.error_label(12, 7), "err12_7");
}

#[test]
fn custom_prefixes() {
    let opts = CodegenOptions::default()
        .with_block_prefix("L")
        .with_error_prefix("E")
        .with_indent("    ");
    assert_eq!(opts.block_label(0), "L0");
    assert_eq!(opts.error_label(0, 2), "E0_2");
    assert_eq!(opts.indent, "    ");
}

#[test]
fn op_macro_is_upper_cased() {
    let rt = RuntimeNames::default();
    assert_eq!(rt.op_macro("int_add"), "OP_INT_ADD");

    let rt = RuntimeNames {
        macro_prefix: "RT_".to_owned(),
        ..RuntimeNames::default()
    };
    assert_eq!(rt.op_macro("getattr"), "RT_GETATTR");
}
