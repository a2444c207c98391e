//! History provider trait and request types.
//!
//! The calculator treats the upstream market-data provider as an unreliable
//! collaborator: any [`SourceError`] coming back from
//! [`HistoryProvider::daily_history`] is a per-instrument soft failure, never
//! a batch abort.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CalendarDate, ObservationSeries, Symbol, ValidationError};

/// Canonical provider identifiers used in metadata and cache keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Yahoo,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yahoo => "yahoo",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yahoo" => Ok(Self::Yahoo),
            other => Err(ValidationError::InvalidProvider {
                value: other.to_owned(),
            }),
        }
    }
}

/// Provider-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    NotFound,
    Internal,
}

/// Structured provider error carried up to the calculator boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn not_found(symbol: &Symbol) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: format!("provider has no data for symbol '{symbol}'"),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request for daily observations over an inclusive calendar range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub start: CalendarDate,
    pub end: CalendarDate,
}

impl HistoryRequest {
    pub fn new(
        symbol: Symbol,
        start: CalendarDate,
        end: CalendarDate,
    ) -> Result<Self, SourceError> {
        if end < start {
            return Err(SourceError::invalid_request(format!(
                "history range end {end} precedes start {start}"
            )));
        }
        Ok(Self { symbol, start, end })
    }
}

/// Upstream daily-history contract.
///
/// Implementations must be `Send + Sync`; one blocking-equivalent call per
/// instrument, no retry, no fan-out.
pub trait HistoryProvider: Send + Sync {
    /// Unique provider identifier, used in cache keys and report metadata.
    fn id(&self) -> ProviderId;

    /// Fetches daily open/high/low/close observations for the requested
    /// inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the provider is unavailable, the symbol
    /// is unknown upstream, or the response cannot be parsed.
    fn daily_history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ObservationSeries, SourceError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_reversed_history_range() {
        let symbol = Symbol::parse("^GSPC").expect("valid symbol");
        let start = CalendarDate::parse("2024-03-08").expect("date");
        let end = CalendarDate::parse("2024-03-01").expect("date");

        let error = HistoryRequest::new(symbol, start, end).expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::InvalidRequest);
        assert!(!error.retryable());
    }

    #[test]
    fn single_day_range_is_valid() {
        let symbol = Symbol::parse("GC=F").expect("valid symbol");
        let day = CalendarDate::parse("2024-03-08").expect("date");
        assert!(HistoryRequest::new(symbol, day, day).is_ok());
    }

    #[test]
    fn provider_id_round_trips() {
        assert_eq!(ProviderId::from_str("Yahoo").expect("parses"), ProviderId::Yahoo);
        assert_eq!(ProviderId::Yahoo.as_str(), "yahoo");
        assert!(ProviderId::from_str("polygon").is_err());
    }
}
