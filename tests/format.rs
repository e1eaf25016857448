use shscript::{Format, ScriptError};

#[test]
fn default_format_renders_verbatim() {
    let format = Format::default();
    assert_eq!(format.render("abc\n"), "abc\n");
    assert_eq!(format.render("  a\tb  \n"), "  a\tb  \n");
    assert_eq!(format.render(""), "");
}

#[test]
fn indent_repeats_indent_str() {
    let format = Format::default().with_indent_level(2);
    assert_eq!(format.indent(), "    ");
    assert_eq!(format.render("abc\n"), "    abc\n");
    assert_eq!(format.render(""), "");

    let format = Format::default().with_indent("--");
    assert_eq!(format.indent_level(), 1);
    assert_eq!(format.render("abc\n"), "--abc\n");
}

#[test]
fn eol_replaces_terminator_only_when_present() {
    let format = Format::default().with_eol("\r\n");
    assert_eq!(format.render("abc\n"), "abc\r\n");
    assert_eq!(format.render("abc\r\n"), "abc\r\n");
    assert_eq!(format.render("abc"), "abc");
}

#[test]
fn strip_flags() {
    let format = Format::default().with_lstrip(true);
    assert_eq!(format.render("  abc  \n"), "abc  \n");

    let format = Format::default().with_rstrip(true);
    assert_eq!(format.render("  abc  \n"), "  abc\n");

    let format = Format::default().with_strip(true).with_indent_level(1);
    assert_eq!(format.render(" \t abc \t \n"), "  abc\n");
}

#[test]
fn rstrip_waits_for_terminator() {
    let format = Format::default().with_rstrip(true);
    assert_eq!(format.render("abc  "), "abc  ");
    assert_eq!(format.render("abc  \n"), "abc\n");
}

#[test]
fn tab_expansion_applies_to_indent_and_body() {
    let format = Format::default().with_tab("    ");
    assert_eq!(format.render("\tx\n"), "    x\n");

    let mut format = Format::default().with_indent("\t").with_tab("  ");
    format.indent_by(1).unwrap();
    assert_eq!(format.render("a\tb\n"), "    a  b\n");
}

#[test]
fn negative_indent_level_is_rejected() {
    let mut format = Format::default();
    let err = format.set_indent_level(-1).unwrap_err();
    assert!(matches!(err, ScriptError::NegativeIndent(-1)));
    assert_eq!(
        err.to_string(),
        "indent level cannot be set to negative value: -1"
    );

    format.set_indent_level(1).unwrap();
    assert!(format.indent_by(-2).is_err());
    assert_eq!(format.indent_level(), 1);
    format.indent_by(-1).unwrap();
    assert_eq!(format.indent_level(), 0);
}

#[test]
fn format_loads_from_json_with_defaults() {
    let format: Format = serde_json::from_str(r#"{"indent_level": 2, "rstrip": true}"#).unwrap();
    assert_eq!(format.indent_str, "  ");
    assert_eq!(format.indent_level(), 2);
    assert!(format.rstrip);
    assert!(!format.lstrip);
    assert_eq!(format.eol, None);
    assert_eq!(format.render("x  \n"), "    x\n");
}

#[test]
fn format_json_rejects_negative_level() {
    let result: Result<Format, _> = serde_json::from_str(r#"{"indent_level": -1}"#);
    assert!(result.is_err());
}

#[test]
fn format_survives_json_round_trip() {
    let format = Format::default()
        .with_indent("\t")
        .with_eol("\r\n")
        .with_tab("    ")
        .with_strip(true);
    let json = serde_json::to_string(&format).unwrap();
    let back: Format = serde_json::from_str(&json).unwrap();
    assert_eq!(back, format);
}
