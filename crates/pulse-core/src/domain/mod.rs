//! # Domain Models
//!
//! Canonical domain types for marketpulse.
//!
//! All models are strongly typed with validation at construction time:
//! invalid symbols, dates, and instrument definitions are unrepresentable
//! past the constructor boundary, and every type serializes to JSON via
//! serde.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated provider ticker (`^GSPC`, `EURUSD=X`, `GC=F`) |
//! | [`CalendarDate`] | ISO calendar date with day arithmetic |
//! | [`Category`] | Instrument category driving display precision |
//! | [`Instrument`] | Ticker + display name + category |
//! | [`PriceObservation`] | One trading day's raw OHLC (all optional) |
//! | [`ObservationSeries`] | Date-ascending history for one symbol |
//! | [`ChangeRecord`] | Day-over-day change output unit |
//! | [`CategoryChanges`] | One category group of the output |

mod date;
mod models;
mod symbol;

pub use date::CalendarDate;
pub use models::{
    rank_by_percent_change, Category, CategoryChanges, ChangeRecord, Instrument,
    ObservationSeries, PriceObservation,
};
pub use symbol::Symbol;
