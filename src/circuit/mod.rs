//! Circuit domain model.
//!
//! This module provides the data model for a logic-game round: gate types,
//! evaluation rows, the tier-tagged circuit payload, and the helpers the
//! validator, simulator, and evaluator share (sequence generation, cycle
//! detection, answer-hidden public views).

mod fallback;
mod gates;
mod simulate;
mod validate;

pub use fallback::{pool_for, supply};
pub use gates::evaluate;
pub use simulate::{simulate, SimulationReport, SimulationStep};
pub use validate::validate;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CircuitError;

/// A logic gate type applied to one or more binary inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateType {
    /// 1 iff all inputs are 1.
    And,
    /// 1 iff any input is 1.
    Or,
    /// Complement of the single input.
    Not,
    /// 1 iff an odd number of inputs are 1.
    Xor,
    /// Complement of AND.
    Nand,
    /// Complement of OR.
    Nor,
    /// Complement of XOR.
    Xnor,
}

impl GateType {
    /// Whether the gate takes exactly one input.
    pub fn is_unary(&self) -> bool {
        matches!(self, GateType::Not)
    }
}

impl std::fmt::Display for GateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateType::And => write!(f, "AND"),
            GateType::Or => write!(f, "OR"),
            GateType::Not => write!(f, "NOT"),
            GateType::Xor => write!(f, "XOR"),
            GateType::Nand => write!(f, "NAND"),
            GateType::Nor => write!(f, "NOR"),
            GateType::Xnor => write!(f, "XNOR"),
        }
    }
}

impl std::str::FromStr for GateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AND" => Ok(GateType::And),
            "OR" => Ok(GateType::Or),
            "NOT" => Ok(GateType::Not),
            "XOR" => Ok(GateType::Xor),
            "NAND" => Ok(GateType::Nand),
            "NOR" => Ok(GateType::Nor),
            "XNOR" => Ok(GateType::Xnor),
            _ => Err(format!("Unknown gate type: {}", s)),
        }
    }
}

/// Round difficulty, driving gate and input counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// 2 gates, 2 inputs per gate.
    #[default]
    Easy,
    /// 3 gates, 3 inputs per gate.
    Medium,
    /// 4 gates, 4 inputs per gate.
    Hard,
}

impl Difficulty {
    /// Number of gates in a round at this difficulty.
    pub fn gate_count(&self) -> usize {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
        }
    }

    /// Number of inputs per gate application at this difficulty.
    pub fn input_count(&self) -> usize {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
        }
    }

    /// The complexity tier used when a request does not pick one.
    pub fn default_complexity(&self) -> ComplexityType {
        match self {
            Difficulty::Easy => ComplexityType::SingleOutput,
            Difficulty::Medium => ComplexityType::MultipleCases,
            Difficulty::Hard => ComplexityType::PatternAnalysis,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(format!("Unknown difficulty: {}", s)),
        }
    }
}

/// Complexity tier of a round, determining data shape and evaluation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityType {
    /// One evaluated circuit; the answer is a single bit.
    SingleOutput,
    /// Several evaluated circuits; the answer is one bit per case.
    MultipleCases,
    /// A generated bit sequence; the answer names its pattern, cycle
    /// length, and final state.
    PatternAnalysis,
}

impl std::fmt::Display for ComplexityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplexityType::SingleOutput => write!(f, "single_output"),
            ComplexityType::MultipleCases => write!(f, "multiple_cases"),
            ComplexityType::PatternAnalysis => write!(f, "pattern_analysis"),
        }
    }
}

impl std::str::FromStr for ComplexityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single_output" => Ok(ComplexityType::SingleOutput),
            "multiple_cases" => Ok(ComplexityType::MultipleCases),
            "pattern_analysis" => Ok(ComplexityType::PatternAnalysis),
            _ => Err(format!("Unknown complexity type: {}", s)),
        }
    }
}

/// One gate application: ordered binary inputs plus the recorded output.
///
/// Serialized as a flat array with the output last (`[1, 0, 1]` means
/// inputs `[1, 0]`, output `1`), matching the generator wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<u8>")]
pub struct CircuitRow {
    /// Gate inputs, each 0 or 1.
    pub inputs: Vec<u8>,
    /// Recorded gate output, 0 or 1.
    pub output: u8,
}

impl CircuitRow {
    /// Build a row from inputs and an output.
    pub fn new(inputs: Vec<u8>, output: u8) -> Self {
        Self { inputs, output }
    }
}

impl TryFrom<Vec<i64>> for CircuitRow {
    type Error = CircuitError;

    fn try_from(values: Vec<i64>) -> Result<Self, Self::Error> {
        if values.len() < 2 {
            return Err(CircuitError::Malformed {
                message: format!("row needs at least one input and an output, got {:?}", values),
            });
        }
        let mut bits = Vec::with_capacity(values.len());
        for v in values {
            if v != 0 && v != 1 {
                return Err(CircuitError::NonBinaryValue { value: v });
            }
            bits.push(v as u8);
        }
        let output = bits.pop().unwrap_or(0);
        Ok(Self {
            inputs: bits,
            output,
        })
    }
}

impl From<CircuitRow> for Vec<u8> {
    fn from(row: CircuitRow) -> Self {
        let mut flat = row.inputs;
        flat.push(row.output);
        flat
    }
}

/// Expected answer components for the pattern-analysis tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternComponents {
    /// The generated output sequence (seed excluded).
    pub pattern: Vec<u8>,
    /// Smallest period after which the sequence repeats.
    pub cycle_length: usize,
    /// Last element of the sequence.
    pub final_state: u8,
}

/// Tier-specific circuit payload.
///
/// The tag fully determines which shape is populated; the evaluator,
/// validator, and simulator all dispatch on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "complexity_type", rename_all = "snake_case")]
pub enum CircuitData {
    /// One evaluated circuit; the last row's output is the round answer.
    SingleOutput {
        /// One row per gate in the pattern, evaluated in sequence.
        input_values: Vec<CircuitRow>,
        /// The scalar answer; must equal the last row's output.
        expected_output: u8,
    },
    /// Independent evaluated circuits keyed by case id.
    MultipleCases {
        /// One row list per case, each the length of the gate pattern.
        test_cases: BTreeMap<String, Vec<CircuitRow>>,
        /// Final output per case; keys mirror `test_cases`.
        expected_output: BTreeMap<String, u8>,
    },
    /// A bit sequence generated by cycling the gate pattern over a
    /// sliding window seeded with `seed`.
    PatternAnalysis {
        /// Initial window contents, oldest first.
        seed: Vec<u8>,
        /// The sequence the player must reproduce and analyze.
        expected_output: PatternComponents,
    },
}

impl CircuitData {
    /// The tier this payload belongs to.
    pub fn complexity_type(&self) -> ComplexityType {
        match self {
            CircuitData::SingleOutput { .. } => ComplexityType::SingleOutput,
            CircuitData::MultipleCases { .. } => ComplexityType::MultipleCases,
            CircuitData::PatternAnalysis { .. } => ComplexityType::PatternAnalysis,
        }
    }
}

/// The unit of a logic-game round: gate pattern plus tier payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitDescriptor {
    /// Ordered gate sequence composing the round's circuit.
    pub pattern: Vec<GateType>,
    /// Round difficulty.
    pub difficulty: Difficulty,
    /// Question shown to the player.
    pub question: String,
    /// Tier-specific data, tagged with `complexity_type`.
    #[serde(flatten)]
    pub data: CircuitData,
}

impl CircuitDescriptor {
    /// The round's complexity tier.
    pub fn complexity_type(&self) -> ComplexityType {
        self.data.complexity_type()
    }

    /// Client-facing JSON with expected values masked.
    ///
    /// Intermediate row outputs stay visible; the values the player must
    /// produce are replaced with `"?"` placeholders.
    pub fn public_view(&self) -> serde_json::Value {
        let base = serde_json::json!({
            "pattern": self.pattern,
            "difficulty": self.difficulty,
            "complexity_type": self.complexity_type(),
            "question": self.question,
        });
        let mut view = base;
        match &self.data {
            CircuitData::SingleOutput { input_values, .. } => {
                let rows: Vec<serde_json::Value> = input_values
                    .iter()
                    .enumerate()
                    .map(|(i, row)| masked_row(row, i + 1 == input_values.len()))
                    .collect();
                view["input_values"] = serde_json::json!(rows);
                view["expected_output"] = serde_json::json!("?");
            }
            CircuitData::MultipleCases {
                test_cases,
                expected_output,
            } => {
                let cases: BTreeMap<&String, Vec<serde_json::Value>> = test_cases
                    .iter()
                    .map(|(id, rows)| {
                        let masked = rows
                            .iter()
                            .enumerate()
                            .map(|(i, row)| masked_row(row, i + 1 == rows.len()))
                            .collect();
                        (id, masked)
                    })
                    .collect();
                let hidden: BTreeMap<&String, &str> =
                    expected_output.keys().map(|k| (k, "?")).collect();
                view["test_cases"] = serde_json::json!(cases);
                view["expected_output"] = serde_json::json!(hidden);
            }
            CircuitData::PatternAnalysis {
                seed,
                expected_output,
            } => {
                view["seed"] = serde_json::json!(seed);
                view["sequence_length"] = serde_json::json!(expected_output.pattern.len());
                view["expected_output"] = serde_json::json!({
                    "pattern": "?",
                    "cycle_length": "?",
                    "final_state": "?",
                });
            }
        }
        view
    }
}

/// Flatten a row to wire shape, masking the output when `hide` is set.
fn masked_row(row: &CircuitRow, hide: bool) -> serde_json::Value {
    let mut flat: Vec<serde_json::Value> = row
        .inputs
        .iter()
        .map(|&b| serde_json::json!(b))
        .collect();
    if hide {
        flat.push(serde_json::json!("?"));
    } else {
        flat.push(serde_json::json!(row.output));
    }
    serde_json::json!(flat)
}

/// Generate `len` sequence elements by cycling the gate pattern over a
/// sliding window of the last `seed.len()` values.
///
/// NOT consumes only the most recent value; every other gate consumes the
/// whole window, oldest first.
pub fn generate_sequence(
    pattern: &[GateType],
    seed: &[u8],
    len: usize,
) -> Result<Vec<u8>, CircuitError> {
    if pattern.is_empty() {
        return Err(CircuitError::Malformed {
            message: "empty gate pattern".to_string(),
        });
    }
    if seed.len() < 2 {
        return Err(CircuitError::Malformed {
            message: format!("sequence seed needs at least 2 values, got {}", seed.len()),
        });
    }
    let window_size = seed.len();
    let mut state = seed.to_vec();
    let mut out = Vec::with_capacity(len);
    for n in 0..len {
        let gate = pattern[n % pattern.len()];
        let window = &state[state.len() - window_size..];
        let next = if gate.is_unary() {
            evaluate(gate, &window[window_size - 1..])?
        } else {
            evaluate(gate, window)?
        };
        state.push(next);
        out.push(next);
    }
    Ok(out)
}

/// Smallest period `p >= 1` such that `seq[i] == seq[i + p]` for all valid
/// `i`; the sequence length itself when no shorter period exists.
pub fn smallest_period(seq: &[u8]) -> usize {
    if seq.is_empty() {
        return 0;
    }
    for p in 1..seq.len() {
        if (0..seq.len() - p).all(|i| seq[i] == seq[i + p]) {
            return p;
        }
    }
    seq.len()
}
