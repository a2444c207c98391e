//! # Pulse Core
//!
//! Core contracts and the change calculator for the marketpulse toolkit.
//!
//! ## Overview
//!
//! This crate turns raw daily market history into day-over-day change
//! records for a configured watchlist of instruments:
//!
//! - **Canonical domain models** for instruments, observations, and changes
//! - **History provider trait** with a Yahoo Finance adapter
//! - **Currency-quote normalization** via a configurable inversion set
//! - **Time-bounded report cache** with explicit refresh
//! - **Response envelope** with metadata and warnings
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Yahoo) |
//! | [`cache`] | TTL report cache |
//! | [`calculator`] | The change calculator |
//! | [`data_source`] | History provider trait and request types |
//! | [`domain`] | Domain models |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`inversion`] | Currency-quote inversion set |
//! | [`watchlist`] | Instrument watchlist configuration |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pulse_core::{CacheMode, CalendarDate, ChangeCalculator, default_watchlist};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let calculator = ChangeCalculator::offline();
//!     let watchlist = default_watchlist();
//!     let reference = CalendarDate::parse("2024-03-08")?;
//!
//!     let report = calculator
//!         .compute_changes(&watchlist, reference, CacheMode::Use)
//!         .await?;
//!
//!     for group in &report.groups {
//!         println!("{}: {} records", group.category, group.records.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Per-instrument failures never abort a batch: fetch and parse errors are
//! converted into not-available records and surfaced as report warnings.
//! Invalid user input (reversed date ranges, malformed symbols) is rejected
//! before any fetch is attempted.

pub mod adapters;
pub mod cache;
pub mod calculator;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod inversion;
pub mod watchlist;

// Re-export commonly used types at crate root for convenience

pub use adapters::YahooHistoryProvider;

pub use cache::{CacheMode, CacheStore};

pub use calculator::{ChangeCalculator, ChangeReport, LOOKBACK_DAYS};

pub use data_source::{
    HistoryProvider, HistoryRequest, ProviderId, SourceError, SourceErrorKind,
};

pub use domain::{
    rank_by_percent_change, CalendarDate, Category, CategoryChanges, ChangeRecord, Instrument,
    ObservationSeries, PriceObservation, Symbol,
};

pub use envelope::{Envelope, EnvelopeMeta};

pub use error::ValidationError;

pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};

pub use inversion::{invert_price, rewrite_inverted_name, InversionSet, INVERT_SYMBOLS_ENV};

pub use watchlist::{default_watchlist, Watchlist};
