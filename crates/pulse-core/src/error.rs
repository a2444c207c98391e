use thiserror::Error;

/// Validation and contract errors exposed by `pulse-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("date must be ISO-8601 calendar form (YYYY-MM-DD): '{value}'")]
    InvalidDate { value: String },

    #[error("invalid category '{value}', expected one of index, currency, commodity, yield")]
    InvalidCategory { value: String },

    #[error("invalid provider '{value}', expected 'yahoo'")]
    InvalidProvider { value: String },

    #[error("instrument name cannot be empty")]
    EmptyInstrumentName,
}
