/// Property-based roundtrip tests.
///
/// Uses the `proptest` crate to generate random JSON values and verify that
/// `unflatten(flatten(json)) == json` holds for all generated inputs. This
/// catches edge cases that hand-written tests might miss.
///
/// Strategies generate:
/// - Random keys (bare identifiers and keys that need bracket quoting:
///   empty, unicode, dots, quotes, backslashes)
/// - Random numbers (integers and arbitrary finite floats; the walker keeps
///   the literal text, so no normalization is needed on comparison)
/// - Random booleans and null
/// - Random nested objects and arrays (up to 3 levels deep)
use proptest::prelude::*;
use serde_json::{json, Map, Number, Value};
use jflat_core::{flatten, flatten_json_form, lex, parse, unflatten, unflatten_json_form};

// ============================================================================
// Strategies for generating JSON values
// ============================================================================

/// Generate a random JSON object key, biased toward the quoting boundary.
fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        // Bare identifiers, rendered with dot notation
        3 => prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_]{0,12}").unwrap(),
        // Keys that force bracket quoting
        2 => prop::string::string_regex("[a-zA-Z0-9 .\\-]{0,12}").unwrap(),
        1 => Just("".to_string()),
        1 => Just("a \"quoted\" key".to_string()),
        1 => Just("back\\slash".to_string()),
        1 => Just("123leading".to_string()),
        1 => Just("caf\u{00e9}".to_string()),
        1 => Just("\u{4f60}\u{597d}".to_string()),
    ]
}

/// Generate a random JSON string value with edge cases.
fn arb_json_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,30}",
        Just("".to_string()),
        // Strings that look like other value kinds
        Just("true".to_string()),
        Just("null".to_string()),
        Just("42".to_string()),
        Just("[]".to_string()),
        Just("{}".to_string()),
        // Strings that look like statements
        Just("json.a = 1;".to_string()),
        // Escapes and unicode
        Just("line1\nline2".to_string()),
        Just("col1\tcol2".to_string()),
        Just("path\\to\\file".to_string()),
        Just("say \"hi\"".to_string()),
        Just("caf\u{00e9} \u{1f600}".to_string()),
        Just("\u{0008}\u{000c}\u{0000}".to_string()),
    ]
}

/// Generate a random JSON number. Any finite float roundtrips exactly
/// because the statement carries the `serde_json` rendering verbatim.
fn arb_json_number() -> impl Strategy<Value = Value> {
    prop_oneof![
        2 => any::<i64>().prop_map(|n| Value::Number(Number::from(n))),
        1 => any::<u64>().prop_map(|n| Value::Number(Number::from(n))),
        1 => any::<f64>().prop_filter_map("must be finite", |f| {
            Number::from_f64(f).map(Value::Number)
        }),
    ]
}

/// Generate a random primitive JSON value (string, number, bool, null).
fn arb_primitive() -> impl Strategy<Value = Value> {
    prop_oneof![
        arb_json_string().prop_map(Value::String),
        arb_json_number(),
        any::<bool>().prop_map(Value::Bool),
        Just(Value::Null),
    ]
}

/// Generate a JSON value with limited nesting (recursive).
fn arb_json_value_inner(depth: u32) -> impl Strategy<Value = Value> {
    if depth == 0 {
        arb_primitive().boxed()
    } else {
        prop_oneof![
            4 => arb_primitive(),
            2 => prop::collection::vec((arb_key(), arb_json_value_inner(depth - 1)), 0..5)
                .prop_map(|pairs| {
                    let mut map = Map::new();
                    for (k, v) in pairs {
                        map.insert(k, v);
                    }
                    Value::Object(map)
                }),
            2 => prop::collection::vec(arb_json_value_inner(depth - 1), 0..5)
                .prop_map(Value::Array),
        ]
        .boxed()
    }
}

/// Top-level strategy for generating random JSON values (up to 3 levels deep).
fn arb_json_value() -> impl Strategy<Value = Value> {
    arb_json_value_inner(3)
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Core roundtrip property: unflatten(flatten(json)) == json.
    #[test]
    fn roundtrip_preserves_json(value in arb_json_value()) {
        let json_str = serde_json::to_string(&value).unwrap();
        let flat = flatten(&json_str).unwrap();
        let back = unflatten(&flat).unwrap();
        let roundtripped: Value = serde_json::from_str(&back).unwrap();
        prop_assert_eq!(
            &value,
            &roundtripped,
            "Roundtrip failed!\n  JSON in:    {}\n  statements:\n{}  JSON out:   {}",
            json_str,
            flat,
            back
        );
    }

    /// The JSON token-array form roundtrips the same values.
    #[test]
    fn json_form_roundtrip_preserves_json(value in arb_json_value()) {
        let json_str = serde_json::to_string(&value).unwrap();
        let flat = flatten_json_form(&json_str).unwrap();
        let back = unflatten_json_form(&flat).unwrap();
        let roundtripped: Value = serde_json::from_str(&back).unwrap();
        prop_assert_eq!(&value, &roundtripped);
    }

    /// Flattening is deterministic and its output is sorted.
    #[test]
    fn output_is_sorted_and_deterministic(value in arb_json_value()) {
        let json_str = serde_json::to_string(&value).unwrap();
        let flat = flatten(&json_str).unwrap();
        prop_assert_eq!(&flat, &flatten(&json_str).unwrap());
        let lines: Vec<&str> = flat.lines().collect();
        let mut sorted = lines.clone();
        sorted.sort_unstable();
        prop_assert_eq!(lines, sorted);
    }

    /// Every emitted line lexes and parses back into a statement that
    /// renders to the same text.
    #[test]
    fn every_line_reparses(value in arb_json_value()) {
        let json_str = serde_json::to_string(&value).unwrap();
        let flat = flatten(&json_str).unwrap();
        for line in flat.lines() {
            let statement = parse(lex(line).unwrap()).unwrap();
            prop_assert_eq!(statement.to_string(), line);
        }
    }

    /// Feeding the statement stream twice merges to the same document.
    #[test]
    fn merge_is_idempotent(value in arb_json_value()) {
        let json_str = serde_json::to_string(&value).unwrap();
        let flat = flatten(&json_str).unwrap();
        let doubled = format!("{flat}{flat}");
        prop_assert_eq!(unflatten(&flat).unwrap(), unflatten(&doubled).unwrap());
    }

    /// Arbitrary finite floats roundtrip without precision loss.
    #[test]
    fn float_roundtrip_is_exact(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        let obj = json!({"val": f});
        let flat = flatten(&serde_json::to_string(&obj).unwrap()).unwrap();
        let back = unflatten(&flat).unwrap();
        let roundtripped: Value = serde_json::from_str(&back).unwrap();
        prop_assert_eq!(obj, roundtripped);
    }

    /// Any key, however hostile, survives the path encoding.
    #[test]
    fn key_roundtrip(key in arb_key()) {
        let obj = json!({key.clone(): 1});
        let flat = flatten(&serde_json::to_string(&obj).unwrap()).unwrap();
        let back = unflatten(&flat).unwrap();
        let roundtripped: Value = serde_json::from_str(&back).unwrap();
        prop_assert_eq!(obj, roundtripped);
    }

    /// Strings that look like other value kinds stay strings.
    #[test]
    fn keyword_like_strings_preserved(s in prop_oneof![
        Just("true".to_string()),
        Just("false".to_string()),
        Just("null".to_string()),
        Just("42".to_string()),
        Just("3.14".to_string()),
        Just("[]".to_string()),
        Just("{}".to_string()),
        Just("".to_string()),
    ]) {
        let obj = json!({"key": s.clone()});
        let flat = flatten(&serde_json::to_string(&obj).unwrap()).unwrap();
        let back = unflatten(&flat).unwrap();
        let roundtripped: Value = serde_json::from_str(&back).unwrap();
        prop_assert_eq!(obj, roundtripped);
    }
}
