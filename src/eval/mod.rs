//! Tiered answer evaluation.
//!
//! One strategy per complexity tier, selected by the circuit's data tag:
//! - [`single`]: exact scalar match, no partial credit
//! - [`multi_case`]: per-case scoring with `"missing"` markers
//! - [`pattern`]: component scoring with near-miss credit on the sequence
//!
//! Every strategy is deterministic and total: malformed player input yields
//! a zero-score result with an `error` field, never a panic or an `Err` —
//! a wrong-shaped answer is a legitimate (if unsuccessful) game move.

mod multi_case;
mod pattern;
mod single;

pub use pattern::PATTERN_MATCH_THRESHOLD;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::circuit::{CircuitData, CircuitDescriptor};

/// Outcome of evaluating one answer against a stored circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// True iff every component is right (`partial_score == 1.0`).
    pub correct: bool,
    /// Fraction of components the player got right, in `[0, 1]`.
    pub partial_score: f64,
    /// Coaching message for the player.
    pub feedback: String,
    /// Per-component diagnostics keyed by case id or component name.
    #[serde(default)]
    pub component_detail: BTreeMap<String, String>,
    /// Present when the answer could not be interpreted.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl EvaluationResult {
    /// Build a result from a component score.
    ///
    /// `correct` requires a full score; fractional credit only ever shows
    /// up in `partial_score`.
    pub(crate) fn scored(
        correct_components: usize,
        total_components: usize,
        component_detail: BTreeMap<String, String>,
    ) -> Self {
        let partial_score = if total_components == 0 {
            0.0
        } else {
            correct_components as f64 / total_components as f64
        };
        let correct = partial_score == 1.0;
        Self {
            correct,
            partial_score,
            feedback: feedback_for(correct, partial_score),
            component_detail,
            error: None,
        }
    }

    /// Build the zero-score result for an uninterpretable answer.
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            correct: false,
            partial_score: 0.0,
            feedback: "Your answer could not be interpreted. Check its format and try a new game."
                .to_string(),
            component_detail: BTreeMap::new(),
            error: Some(reason),
        }
    }
}

/// Evaluate a player answer against a circuit, dispatching on its tier.
pub fn evaluate_answer(circuit: &CircuitDescriptor, answer: &Value) -> EvaluationResult {
    match &circuit.data {
        CircuitData::SingleOutput {
            expected_output, ..
        } => single::evaluate(*expected_output, answer),
        CircuitData::MultipleCases {
            expected_output, ..
        } => multi_case::evaluate(expected_output, answer),
        CircuitData::PatternAnalysis {
            expected_output, ..
        } => pattern::evaluate(expected_output, answer),
    }
}

/// Coaching bands shared by all strategies.
fn feedback_for(correct: bool, partial_score: f64) -> String {
    if correct {
        "Excellent! You have fully mastered these logic gates.".to_string()
    } else if partial_score > 0.5 {
        "Good attempt. You understand the concept, but review the details of each gate."
            .to_string()
    } else {
        "Review the truth tables of the basic gates.".to_string()
    }
}

/// Coerce a JSON value to a 0/1 bit.
///
/// Accepts integers, booleans, and numeric strings; everything else is an
/// interpretation error described for the player.
pub(crate) fn coerce_bit(value: &Value) -> Result<u8, String> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(0),
            Some(1) => Ok(1),
            _ => Err(format!("expected 0 or 1, got {}", value)),
        },
        Value::Bool(b) => Ok(*b as u8),
        Value::String(s) => match s.trim() {
            "0" => Ok(0),
            "1" => Ok(1),
            _ => Err(format!("expected 0 or 1, got \"{}\"", s)),
        },
        _ => Err(format!("expected 0 or 1, got {}", value)),
    }
}

/// Coerce a JSON value to a non-negative count (cycle lengths).
pub(crate) fn coerce_count(value: &Value) -> Result<usize, String> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(|v| v as usize)
            .ok_or_else(|| format!("expected a non-negative integer, got {}", value)),
        Value::String(s) => s
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("expected a non-negative integer, got \"{}\"", s)),
        _ => Err(format!("expected a non-negative integer, got {}", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_bit_accepts_common_shapes() {
        assert_eq!(coerce_bit(&json!(0)).unwrap(), 0);
        assert_eq!(coerce_bit(&json!(1)).unwrap(), 1);
        assert_eq!(coerce_bit(&json!(true)).unwrap(), 1);
        assert_eq!(coerce_bit(&json!("0")).unwrap(), 0);
        assert_eq!(coerce_bit(&json!(" 1 ")).unwrap(), 1);
    }

    #[test]
    fn test_coerce_bit_rejects_non_binary() {
        assert!(coerce_bit(&json!(2)).is_err());
        assert!(coerce_bit(&json!(-1)).is_err());
        assert!(coerce_bit(&json!(0.5)).is_err());
        assert!(coerce_bit(&json!("maybe")).is_err());
        assert!(coerce_bit(&json!([0])).is_err());
        assert!(coerce_bit(&json!(null)).is_err());
    }

    #[test]
    fn test_coerce_count() {
        assert_eq!(coerce_count(&json!(4)).unwrap(), 4);
        assert_eq!(coerce_count(&json!("8")).unwrap(), 8);
        assert!(coerce_count(&json!(-3)).is_err());
        assert!(coerce_count(&json!("few")).is_err());
    }

    #[test]
    fn test_scored_requires_full_score_for_correct() {
        let result = EvaluationResult::scored(2, 3, BTreeMap::new());
        assert!(!result.correct);
        assert!((result.partial_score - 2.0 / 3.0).abs() < 1e-9);

        let result = EvaluationResult::scored(3, 3, BTreeMap::new());
        assert!(result.correct);
        assert_eq!(result.partial_score, 1.0);
    }

    #[test]
    fn test_malformed_result_shape() {
        let result = EvaluationResult::malformed("expected 0 or 1, got \"two\"");
        assert!(!result.correct);
        assert_eq!(result.partial_score, 0.0);
        assert!(result.error.unwrap().contains("expected 0 or 1"));
    }

    #[test]
    fn test_feedback_bands() {
        assert!(feedback_for(true, 1.0).starts_with("Excellent"));
        assert!(feedback_for(false, 0.67).starts_with("Good attempt"));
        assert!(feedback_for(false, 0.33).starts_with("Review"));
    }
}
