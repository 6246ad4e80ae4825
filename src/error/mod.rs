use thiserror::Error;

use crate::circuit::GateType;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    #[error("Circuit error: {0}")]
    Circuit(#[from] CircuitError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Session store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Game session not found: {game_id}")]
    SessionNotFound { game_id: String },

    #[error("Store operation failed: {message}")]
    Operation { message: String },
}

/// Circuit generator API errors
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Generator unavailable: {message} (retries: {retries})")]
    Unavailable { message: String, retries: u32 },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Circuit data errors: malformed candidates and gate misuse
#[derive(Debug, Error)]
pub enum CircuitError {
    #[error("Invalid input count for {gate}: got {got}")]
    InvalidInputCount { gate: GateType, got: usize },

    #[error("Non-binary value in circuit data: {value}")]
    NonBinaryValue { value: i64 },

    #[error("Malformed circuit candidate: {message}")]
    Malformed { message: String },
}

/// Reasons the diversity checker rejects a circuit
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationRejection {
    #[error("Pattern uses a single gate type")]
    UniformPattern,

    #[error("Pattern is drawn only from AND/OR gates")]
    TrivialGatePattern,

    #[error("All input rows are identical")]
    IdenticalInputRows,

    #[error("Fewer than 2 distinct case outputs")]
    InsufficientCaseVariety,

    #[error("All test cases share identical input rows")]
    IdenticalCaseInputs,

    #[error("Output pattern has fewer than 2 distinct values")]
    InsufficientPatternVariety,

    #[error("Output pattern too short: {len} elements")]
    PatternTooShort { len: usize },
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for generator operations
pub type GeneratorResult<T> = Result<T, GeneratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Config {
            message: "missing key".to_string(),
        };
        assert_eq!(err.to_string(), "Configuration error: missing key");

        let err = AppError::Internal {
            message: "unexpected".to_string(),
        };
        assert_eq!(err.to_string(), "Internal error: unexpected");
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::SessionNotFound {
            game_id: "game-123".to_string(),
        };
        assert_eq!(err.to_string(), "Game session not found: game-123");

        let err = StoreError::Operation {
            message: "lock poisoned".to_string(),
        };
        assert_eq!(err.to_string(), "Store operation failed: lock poisoned");
    }

    #[test]
    fn test_generator_error_display() {
        let err = GeneratorError::Unavailable {
            message: "server down".to_string(),
            retries: 3,
        };
        assert_eq!(
            err.to_string(),
            "Generator unavailable: server down (retries: 3)"
        );

        let err = GeneratorError::Api {
            status: 401,
            message: "unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 401 - unauthorized");

        let err = GeneratorError::Timeout { timeout_ms: 5000 };
        assert_eq!(err.to_string(), "Request timeout after 5000ms");
    }

    #[test]
    fn test_circuit_error_display() {
        let err = CircuitError::InvalidInputCount {
            gate: GateType::Not,
            got: 3,
        };
        assert_eq!(err.to_string(), "Invalid input count for NOT: got 3");

        let err = CircuitError::NonBinaryValue { value: 2 };
        assert_eq!(err.to_string(), "Non-binary value in circuit data: 2");
    }

    #[test]
    fn test_validation_rejection_display() {
        assert_eq!(
            ValidationRejection::UniformPattern.to_string(),
            "Pattern uses a single gate type"
        );
        assert_eq!(
            ValidationRejection::PatternTooShort { len: 4 }.to_string(),
            "Output pattern too short: 4 elements"
        );
    }

    #[test]
    fn test_store_error_conversion_to_app_error() {
        let store_err = StoreError::SessionNotFound {
            game_id: "test-123".to_string(),
        };
        let app_err: AppError = store_err.into();
        assert!(matches!(app_err, AppError::Store(_)));
    }

    #[test]
    fn test_generator_error_conversion_to_app_error() {
        let gen_err = GeneratorError::Timeout { timeout_ms: 1000 };
        let app_err: AppError = gen_err.into();
        assert!(matches!(app_err, AppError::Generator(_)));
    }

    #[test]
    fn test_circuit_error_conversion_to_app_error() {
        let circuit_err = CircuitError::NonBinaryValue { value: 7 };
        let app_err: AppError = circuit_err.into();
        assert!(matches!(app_err, AppError::Circuit(_)));
        assert!(app_err.to_string().contains("Non-binary value"));
    }
}
