//! Component scoring strategy for the pattern-analysis tier.

use std::collections::BTreeMap;

use serde_json::Value;

use super::{coerce_bit, coerce_count, EvaluationResult};
use crate::circuit::PatternComponents;

/// Fraction of sequence elements that must match for the pattern component
/// to count as correct.
///
/// Reproducing an 8-element sequence exactly is disproportionately strict
/// on the hardest tier, so a near miss still earns the component. Tunable;
/// the other components always require exact equality.
pub const PATTERN_MATCH_THRESHOLD: f64 = 0.80;

/// Score the three answer components: `pattern`, `cycle_length`,
/// `final_state`.
pub(crate) fn evaluate(expected: &PatternComponents, answer: &Value) -> EvaluationResult {
    let answers = match answer.as_object() {
        Some(map) => map,
        None => {
            return EvaluationResult::malformed(format!(
                "expected a map with pattern, cycle_length, and final_state, got {}",
                answer
            ))
        }
    };

    let mut detail = BTreeMap::new();
    let mut correct_components = 0;

    // Sequence component: element-wise match fraction with tolerance.
    let entry = match answers.get("pattern") {
        None => "missing".to_string(),
        Some(value) => match score_sequence(&expected.pattern, value) {
            Err(reason) => reason,
            Ok(fraction) => {
                if fraction >= PATTERN_MATCH_THRESHOLD {
                    correct_components += 1;
                    format!("correct ({:.1}% accuracy)", fraction * 100.0)
                } else {
                    format!("incorrect ({:.1}% accuracy)", fraction * 100.0)
                }
            }
        },
    };
    detail.insert("pattern".to_string(), entry);

    // Cycle length: exact.
    let entry = match answers.get("cycle_length") {
        None => "missing".to_string(),
        Some(value) => match coerce_count(value) {
            Err(reason) => format!("invalid ({})", reason),
            Ok(count) if count == expected.cycle_length => {
                correct_components += 1;
                "correct".to_string()
            }
            Ok(count) => format!(
                "incorrect (expected {}, got {})",
                expected.cycle_length, count
            ),
        },
    };
    detail.insert("cycle_length".to_string(), entry);

    // Final state: exact.
    let entry = match answers.get("final_state") {
        None => "missing".to_string(),
        Some(value) => match coerce_bit(value) {
            Err(reason) => format!("invalid ({})", reason),
            Ok(bit) if bit == expected.final_state => {
                correct_components += 1;
                "correct".to_string()
            }
            Ok(bit) => format!(
                "incorrect (expected {}, got {})",
                expected.final_state, bit
            ),
        },
    };
    detail.insert("final_state".to_string(), entry);

    EvaluationResult::scored(correct_components, 3, detail)
}

/// Element-wise match fraction between the answered and expected sequences.
fn score_sequence(expected: &[u8], value: &Value) -> Result<f64, String> {
    let items = match value.as_array() {
        Some(items) => items,
        None => return Err(format!("invalid (expected a sequence, got {})", value)),
    };
    if items.len() != expected.len() {
        return Err(format!(
            "wrong length (expected {}, got {})",
            expected.len(),
            items.len()
        ));
    }
    let mut matches = 0;
    for (item, &expected_bit) in items.iter().zip(expected) {
        match coerce_bit(item) {
            Ok(bit) if bit == expected_bit => matches += 1,
            // A non-binary element is simply a mismatch at that position.
            _ => {}
        }
    }
    Ok(matches as f64 / expected.len() as f64)
}
