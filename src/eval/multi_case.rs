//! Per-case scoring strategy for the multiple-cases tier.

use std::collections::BTreeMap;

use serde_json::Value;

use super::{coerce_bit, EvaluationResult};

/// Score a map of case answers against the expected outputs.
///
/// Each expected case contributes equally; absent cases are marked
/// `"missing"` and count against the score. `correct` still requires every
/// case to be exactly right — only the score is partial.
pub(crate) fn evaluate(expected: &BTreeMap<String, u8>, answer: &Value) -> EvaluationResult {
    if expected.is_empty() {
        return EvaluationResult::malformed("circuit has no expected cases");
    }
    let answers = match answer.as_object() {
        Some(map) => map,
        None => {
            return EvaluationResult::malformed(format!(
                "expected a map of case answers, got {}",
                answer
            ))
        }
    };

    let mut detail = BTreeMap::new();
    let mut correct_cases = 0;
    for (case_id, &expected_bit) in expected {
        let entry = match answers.get(case_id) {
            None => "missing".to_string(),
            Some(value) => match coerce_bit(value) {
                Err(reason) => format!("invalid ({})", reason),
                Ok(bit) if bit == expected_bit => {
                    correct_cases += 1;
                    "correct".to_string()
                }
                Ok(bit) => format!("incorrect (expected {}, got {})", expected_bit, bit),
            },
        };
        detail.insert(case_id.clone(), entry);
    }

    EvaluationResult::scored(correct_cases, expected.len(), detail)
}
