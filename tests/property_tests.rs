//! Property-based tests for flattening and encoding invariants.

use proptest::prelude::*;
use seqdump::{
    decode_float32_bits, encode_leaf, encode_tokens, from_str, to_string_with_options, DumpOptions,
    Encoding, Nested,
};

/// Arbitrary irregular nesting, including empty sequences at any level.
fn arb_nested() -> impl Strategy<Value = Nested> {
    let leaf = (-1.0e6f64..1.0e6).prop_map(Nested::Leaf);
    leaf.prop_recursive(5, 64, 6, |inner| {
        prop::collection::vec(inner, 0..6).prop_map(Nested::Seq)
    })
}

fn count_leaves(value: &Nested) -> usize {
    match value {
        Nested::Leaf(_) => 1,
        Nested::Seq(items) => items.iter().map(count_leaves).sum(),
    }
}

fn collect_recursive(value: &Nested, out: &mut Vec<f64>) {
    match value {
        Nested::Leaf(v) => out.push(*v),
        Nested::Seq(items) => items.iter().for_each(|item| collect_recursive(item, out)),
    }
}

proptest! {
    #[test]
    fn prop_flatten_len_is_leaf_count(value in arb_nested()) {
        prop_assert_eq!(value.flatten().len(), count_leaves(&value));
    }

    #[test]
    fn prop_flatten_matches_recursive_descent(value in arb_nested()) {
        let mut expected = Vec::new();
        collect_recursive(&value, &mut expected);
        prop_assert_eq!(value.flatten(), expected);
    }

    #[test]
    fn prop_float32_bits_roundtrip(bits in any::<u32>()) {
        let value = f32::from_bits(bits);
        // NaN payloads may not survive the f32 -> f64 -> f32 widening
        prop_assume!(!value.is_nan());
        let token = encode_leaf(value as f64, &Encoding::Float32).unwrap();
        prop_assert_eq!(token.len(), 32);
        prop_assert_eq!(decode_float32_bits(&token).unwrap(), bits);
    }

    #[test]
    fn prop_binary_is_at_least_width(n in 0u32..1_000_000, width in 0usize..40) {
        let token = encode_leaf(n as f64, &Encoding::Binary(width)).unwrap();
        prop_assert!(token.len() >= width);
        prop_assert_eq!(u64::from_str_radix(&token, 2).unwrap(), n as u64);
    }

    #[test]
    fn prop_hex16_matches_wrapping_cast(n in any::<i32>()) {
        let token = encode_leaf(n as f64, &Encoding::Hex16).unwrap();
        prop_assert_eq!(token, format!("{:#x}", n as u16));
    }

    #[test]
    fn prop_token_count_matches_leaves(value in arb_nested()) {
        let tokens = encode_tokens(&value, &Encoding::Float32).unwrap();
        prop_assert_eq!(tokens.len(), value.leaf_count());
    }

    #[test]
    fn prop_concatenated_float32_decodes(values in prop::collection::vec(-1.0e3f32..1.0e3, 0..20)) {
        let options = DumpOptions::float32().concatenated();
        let dump = to_string_with_options(&values, &options).unwrap();
        let decoded = from_str(&dump, &options).unwrap();
        let expected: Vec<f64> = values.iter().map(|&v| v as f64).collect();
        prop_assert_eq!(decoded, expected);
    }
}
