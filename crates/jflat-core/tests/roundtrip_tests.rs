use jflat_core::{flatten, flatten_json_form, unflatten, unflatten_json_form};

/// Assert that flatten → unflatten reproduces the input value exactly
/// (object key order aside — comparison is by parsed value).
fn assert_roundtrip(json: &str) {
    let flat = flatten(json).expect("flatten failed");
    let back = unflatten(&flat).expect("unflatten failed");
    let original: serde_json::Value = serde_json::from_str(json).unwrap();
    let roundtripped: serde_json::Value = serde_json::from_str(&back).unwrap();
    assert_eq!(
        original, roundtripped,
        "Roundtrip failed:\n  input:      {json}\n  statements:\n{flat}  output:     {back}"
    );
}

// ============================================================================
// Primitive roundtrips
// ============================================================================

#[test]
fn roundtrip_null() {
    assert_roundtrip("null");
}

#[test]
fn roundtrip_bools() {
    assert_roundtrip("true");
    assert_roundtrip("false");
}

#[test]
fn roundtrip_numbers() {
    assert_roundtrip("0");
    assert_roundtrip("-7");
    assert_roundtrip("3.14");
    assert_roundtrip("999999999999");
}

#[test]
fn roundtrip_integer_vs_float_form() {
    // `1` and `1.0` must stay distinct through the statement text.
    let flat = flatten(r#"{"int":1,"float":1.0}"#).unwrap();
    assert!(flat.contains("json.int = 1;"));
    assert!(flat.contains("json.float = 1.0;"));
    assert_roundtrip(r#"{"int":1,"float":1.0}"#);
}

#[test]
fn roundtrip_extreme_exponent_floats() {
    // Needs serde_json's float_roundtrip feature: the fast float path parses
    // extreme exponents lossily.
    assert_roundtrip("-9.244525184334991e-231");
    assert_roundtrip("[5e-324, 1.7976931348623157e308]");
}

#[test]
fn roundtrip_strings() {
    assert_roundtrip(r#""hello""#);
    assert_roundtrip(r#""""#);
    assert_roundtrip(r#""line1\nline2""#);
    assert_roundtrip(r#""path\\to\\file""#);
    assert_roundtrip(r#""say \"hi\"""#);
    assert_roundtrip(r#""café 😀""#);
}

#[test]
fn roundtrip_keyword_like_strings() {
    assert_roundtrip(r#"{"a":"true","b":"null","c":"42","d":"[]"}"#);
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn roundtrip_empty_containers() {
    assert_roundtrip("{}");
    assert_roundtrip("[]");
    assert_roundtrip(r#"{"a":{},"b":[]}"#);
}

#[test]
fn roundtrip_flat_object() {
    assert_roundtrip(r#"{"name":"Ada","age":36,"active":true,"email":null}"#);
}

#[test]
fn roundtrip_nested() {
    assert_roundtrip(r#"{"a":{"b":{"c":"deep"}},"arr":[[1,2],[3,[4]]]}"#);
}

#[test]
fn roundtrip_quoted_keys() {
    assert_roundtrip(r#"{"a quoted":"value","is-quoted":1,"123":2,"":3,"日本":4}"#);
}

#[test]
fn roundtrip_array_of_objects() {
    assert_roundtrip(r#"{"users":[{"name":"Ada","tags":["x","y"]},{"name":"Bob","tags":[]}]}"#);
}

#[test]
fn roundtrip_single_json_key_document() {
    // Top-level collapsing must unwrap exactly one synthetic level.
    assert_roundtrip(r#"{"json":{"inner":1}}"#);
    assert_roundtrip(r#"{"json":null}"#);
}

// ============================================================================
// Hand-edited input
// ============================================================================

#[test]
fn unflatten_grepped_subset() {
    let flat = flatten(r#"{"dotted":"A","anarr":[1,1.5],"anob":{"foo":"bar"}}"#).unwrap();
    let subset: String = flat
        .lines()
        .filter(|line| line.contains("anarr"))
        .map(|line| format!("{line}\n"))
        .collect();
    let back = unflatten(&subset).unwrap();
    let value: serde_json::Value = serde_json::from_str(&back).unwrap();
    assert_eq!(value, serde_json::json!({"anarr": [1, 1.5]}));
}

#[test]
fn unflatten_ignores_blank_lines() {
    let back = unflatten("\njson.a = 1;\n\n  \njson.b = 2;\n").unwrap();
    let value: serde_json::Value = serde_json::from_str(&back).unwrap();
    assert_eq!(value, serde_json::json!({"a": 1, "b": 2}));
}

#[test]
fn unflatten_reordered_lines() {
    let back = unflatten("json = {};\njson.arr[1] = 2;\njson.arr[0] = 1;\n").unwrap();
    let value: serde_json::Value = serde_json::from_str(&back).unwrap();
    assert_eq!(value, serde_json::json!({"arr": [1, 2]}));
}

#[test]
fn unflatten_trailing_container_line_overwrites() {
    // Assignments apply in input order, last writer wins: a trailing `= {};`
    // replaces the subtree built so far.
    let back = unflatten("json.arr[1] = 2;\njson.arr[0] = 1;\njson = {};\n").unwrap();
    let value: serde_json::Value = serde_json::from_str(&back).unwrap();
    assert_eq!(value, serde_json::json!({}));
}

// ============================================================================
// JSON token-array form
// ============================================================================

#[test]
fn roundtrip_json_form() {
    let json = r#"{"name":"Ada","a quoted":[1,1.5,null],"nested":{"ok":true}}"#;
    let flat = flatten_json_form(json).unwrap();
    // Every line is itself a JSON document.
    for line in flat.lines() {
        serde_json::from_str::<serde_json::Value>(line).expect("line must be valid JSON");
    }
    let back = unflatten_json_form(&flat).unwrap();
    let original: serde_json::Value = serde_json::from_str(json).unwrap();
    let roundtripped: serde_json::Value = serde_json::from_str(&back).unwrap();
    assert_eq!(original, roundtripped);
}

#[test]
fn unflatten_output_is_pretty_printed() {
    let back = unflatten("json.a = 1;\n").unwrap();
    assert_eq!(back, "{\n  \"a\": 1\n}");
}
