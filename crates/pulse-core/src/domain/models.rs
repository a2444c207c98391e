use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CalendarDate, Symbol, ValidationError};

/// Instrument category.
///
/// Immutable metadata that drives downstream formatting: currency values
/// render with 4 decimal places, everything else with 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    StockIndex,
    Currency,
    Commodity,
    Yield,
}

impl Category {
    pub const ALL: [Self; 4] = [
        Self::StockIndex,
        Self::Currency,
        Self::Commodity,
        Self::Yield,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StockIndex => "index",
            Self::Currency => "currency",
            Self::Commodity => "commodity",
            Self::Yield => "yield",
        }
    }

    /// Human heading used by table output.
    pub const fn label(self) -> &'static str {
        match self {
            Self::StockIndex => "Stock Indices",
            Self::Currency => "Currencies",
            Self::Commodity => "Commodities",
            Self::Yield => "Government Yields",
        }
    }

    /// Display precision for price and change columns.
    pub const fn decimals(self) -> usize {
        match self {
            Self::Currency => 4,
            _ => 2,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "index" => Ok(Self::StockIndex),
            "currency" => Ok(Self::Currency),
            "commodity" => Ok(Self::Commodity),
            "yield" => Ok(Self::Yield),
            other => Err(ValidationError::InvalidCategory {
                value: other.to_owned(),
            }),
        }
    }
}

/// Watchlist entry: a provider ticker with its display name and category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: Symbol,
    pub name: String,
    pub category: Category,
}

impl Instrument {
    pub fn new(
        symbol: Symbol,
        name: impl Into<String>,
        category: Category,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyInstrumentName);
        }
        Ok(Self {
            symbol,
            name,
            category,
        })
    }
}

/// One trading day's raw prices for one instrument, as reported upstream.
///
/// Providers emit nulls mid-series, so every field is optional. Raw
/// observations are never mutated; the calculator only derives new values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub date: CalendarDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
}

impl PriceObservation {
    pub const fn new(
        date: CalendarDate,
        open: Option<f64>,
        high: Option<f64>,
        low: Option<f64>,
        close: Option<f64>,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
        }
    }
}

/// Daily history for one symbol, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationSeries {
    pub symbol: Symbol,
    pub observations: Vec<PriceObservation>,
}

impl ObservationSeries {
    pub fn new(symbol: Symbol, mut observations: Vec<PriceObservation>) -> Self {
        observations.sort_by_key(|obs| obs.date);
        Self {
            symbol,
            observations,
        }
    }
}

/// Day-over-day change for one instrument.
///
/// `None` is the explicit not-available marker: every instrument in a
/// requested watchlist yields exactly one record, present or empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Display name, possibly rewritten by currency inversion.
    pub name: String,
    pub symbol: Symbol,
    pub category: Category,
    pub previous_close: Option<f64>,
    pub last_close: Option<f64>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub change: Option<f64>,
    pub percent_change: Option<f64>,
    pub previous_date: Option<CalendarDate>,
    pub last_date: Option<CalendarDate>,
}

impl ChangeRecord {
    /// Record with all numeric fields and dates marked not-available.
    pub fn not_available(instrument: &Instrument) -> Self {
        Self {
            name: instrument.name.clone(),
            symbol: instrument.symbol.clone(),
            category: instrument.category,
            previous_close: None,
            last_close: None,
            open: None,
            high: None,
            low: None,
            change: None,
            percent_change: None,
            previous_date: None,
            last_date: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.previous_close.is_some() && self.last_close.is_some()
    }
}

/// One output group: a category with its records in watchlist order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryChanges {
    pub category: Category,
    pub records: Vec<ChangeRecord>,
}

/// Records ranked for display: percent change descending, not-available
/// entries excluded from the ranking.
pub fn rank_by_percent_change(records: &[ChangeRecord]) -> Vec<&ChangeRecord> {
    let mut ranked: Vec<&ChangeRecord> = records
        .iter()
        .filter(|record| record.percent_change.is_some())
        .collect();
    ranked.sort_by(|a, b| {
        let pa = a.percent_change.unwrap_or(f64::NEG_INFINITY);
        let pb = b.percent_change.unwrap_or(f64::NEG_INFINITY);
        pb.partial_cmp(&pa).unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}
