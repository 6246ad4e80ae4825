//! Exact-match strategy for the single-output tier.

use std::collections::BTreeMap;

use serde_json::Value;

use super::{coerce_bit, EvaluationResult};

/// Compare a scalar answer against the expected final output.
///
/// A single bit has no meaningful partial state, so the outcome is binary:
/// full credit or none.
pub(crate) fn evaluate(expected: u8, answer: &Value) -> EvaluationResult {
    let bit = match coerce_bit(answer) {
        Ok(bit) => bit,
        Err(reason) => return EvaluationResult::malformed(reason),
    };

    let mut detail = BTreeMap::new();
    let correct = bit == expected;
    detail.insert(
        "output".to_string(),
        if correct {
            "correct".to_string()
        } else {
            format!("incorrect (expected {}, got {})", expected, bit)
        },
    );
    EvaluationResult::scored(correct as usize, 1, detail)
}
