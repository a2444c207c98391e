//! Day-over-day change computation.
//!
//! [`ChangeCalculator`] is the one reusable contract in this crate: given a
//! watchlist and date parameters it fetches daily history per instrument,
//! normalizes currency quotes, and emits one [`ChangeRecord`] per instrument
//! grouped by category. It is a pure function of its inputs plus the
//! time-bounded report cache; there is no ambient state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adapters::YahooHistoryProvider;
use crate::cache::{CacheMode, CacheStore};
use crate::data_source::{HistoryProvider, HistoryRequest, SourceError};
use crate::inversion::{invert_price, rewrite_inverted_name, InversionSet};
use crate::{
    CalendarDate, Category, CategoryChanges, ChangeRecord, Instrument, PriceObservation,
    Watchlist,
};

/// Calendar-day lookback guaranteeing at least two trading days even across
/// weekends and market holidays.
pub const LOOKBACK_DAYS: i64 = 10;

/// Output of one calculator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeReport {
    /// Category groups in watchlist declaration order.
    pub groups: Vec<CategoryChanges>,
    /// Per-instrument soft-failure diagnostics.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Whether this report was served from the cache. Never persisted.
    #[serde(skip)]
    pub cache_hit: bool,
}

impl ChangeReport {
    /// Flattened view across all groups, watchlist order.
    pub fn records(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.groups.iter().flat_map(|group| group.records.iter())
    }
}

enum Window {
    /// Lookback window ending at the reference date; the two most recent
    /// valid trading days inside it are compared.
    Lookback { reference: CalendarDate },
    /// Strict mode: observations must exist on exactly these two dates.
    Exact {
        start: CalendarDate,
        end: CalendarDate,
    },
}

impl Window {
    fn fetch_range(&self) -> (CalendarDate, CalendarDate) {
        match self {
            Self::Lookback { reference } => (reference.minus_days(LOOKBACK_DAYS), *reference),
            Self::Exact { start, end } => (*start, *end),
        }
    }

    fn cache_key(&self, provider: &dyn HistoryProvider, watchlist: &Watchlist) -> String {
        match self {
            Self::Lookback { reference } => format!(
                "{}|lookback|{}|{}",
                provider.id(),
                reference,
                watchlist.signature()
            ),
            Self::Exact { start, end } => format!(
                "{}|exact|{}|{}|{}",
                provider.id(),
                start,
                end,
                watchlist.signature()
            ),
        }
    }
}

/// The change calculator.
pub struct ChangeCalculator {
    provider: Arc<dyn HistoryProvider>,
    cache: CacheStore,
    inversion: InversionSet,
}

impl ChangeCalculator {
    pub fn new(
        provider: Arc<dyn HistoryProvider>,
        cache: CacheStore,
        inversion: InversionSet,
    ) -> Self {
        Self {
            provider,
            cache,
            inversion,
        }
    }

    /// Calculator wired to the offline Yahoo provider with the default
    /// one-hour cache and built-in inversion set.
    pub fn offline() -> Self {
        Self::new(
            Arc::new(YahooHistoryProvider::default()),
            CacheStore::with_default_ttl(),
            InversionSet::default(),
        )
    }

    /// Single-reference-date mode: compare the two most recent trading days
    /// in the lookback window ending at `reference_date`.
    pub async fn compute_changes(
        &self,
        watchlist: &Watchlist,
        reference_date: CalendarDate,
        cache_mode: CacheMode,
    ) -> Result<ChangeReport, SourceError> {
        self.run(
            watchlist,
            Window::Lookback {
                reference: reference_date,
            },
            cache_mode,
        )
        .await
    }

    /// Strict two-explicit-dates mode: both comparison dates are user-picked
    /// and must carry trading data; there is no nearest-date fallback.
    ///
    /// # Errors
    ///
    /// Rejects `end < start` before any fetch is attempted.
    pub async fn compute_changes_between(
        &self,
        watchlist: &Watchlist,
        start: CalendarDate,
        end: CalendarDate,
        cache_mode: CacheMode,
    ) -> Result<ChangeReport, SourceError> {
        if end < start {
            return Err(SourceError::invalid_request(format!(
                "end date {end} precedes start date {start}"
            )));
        }
        self.run(watchlist, Window::Exact { start, end }, cache_mode)
            .await
    }

    async fn run(
        &self,
        watchlist: &Watchlist,
        window: Window,
        cache_mode: CacheMode,
    ) -> Result<ChangeReport, SourceError> {
        let key = window.cache_key(self.provider.as_ref(), watchlist);

        if cache_mode == CacheMode::Use {
            if let Some(body) = self.cache.get(&key).await {
                match serde_json::from_str::<ChangeReport>(&body) {
                    Ok(mut report) => {
                        report.cache_hit = true;
                        return Ok(report);
                    }
                    Err(error) => {
                        log::warn!("discarding unreadable cache entry '{key}': {error}");
                    }
                }
            }
        }

        let report = self.compute(watchlist, &window).await;

        if cache_mode != CacheMode::Bypass {
            let body = serde_json::to_string(&report)
                .map_err(|e| SourceError::internal(format!("report serialization failed: {e}")))?;
            self.cache.put(key, body).await;
        }

        Ok(report)
    }

    async fn compute(&self, watchlist: &Watchlist, window: &Window) -> ChangeReport {
        let (start, end) = window.fetch_range();
        let mut warnings = Vec::new();
        let mut groups: Vec<CategoryChanges> = watchlist
            .categories()
            .into_iter()
            .map(|category| CategoryChanges {
                category,
                records: Vec::new(),
            })
            .collect();

        // One blocking-equivalent fetch per instrument, in declaration
        // order. A failure degrades that instrument only.
        for instrument in watchlist.instruments() {
            let record = match self.fetch_observations(instrument, start, end).await {
                Ok(observations) => self.build_record(instrument, &observations, window),
                Err(error) => {
                    let warning = format!(
                        "could not process data for {} ({}): {}",
                        instrument.name, instrument.symbol, error
                    );
                    log::warn!("{warning}");
                    warnings.push(warning);
                    ChangeRecord::not_available(instrument)
                }
            };
            push_record(&mut groups, instrument.category, record);
        }

        ChangeReport {
            groups,
            warnings,
            cache_hit: false,
        }
    }

    async fn fetch_observations(
        &self,
        instrument: &Instrument,
        start: CalendarDate,
        end: CalendarDate,
    ) -> Result<Vec<PriceObservation>, SourceError> {
        let request = HistoryRequest::new(instrument.symbol.clone(), start, end)?;
        let series = self.provider.daily_history(request).await?;
        log::debug!(
            "{}: {} observations in [{start}, {end}]",
            instrument.symbol,
            series.observations.len()
        );
        Ok(series.observations)
    }

    fn build_record(
        &self,
        instrument: &Instrument,
        observations: &[PriceObservation],
        window: &Window,
    ) -> ChangeRecord {
        // Only observations with a close participate.
        let valid: Vec<&PriceObservation> = observations
            .iter()
            .filter(|obs| obs.close.is_some())
            .collect();

        let (previous, last) = match window {
            Window::Lookback { .. } => {
                if valid.len() < 2 {
                    return ChangeRecord::not_available(instrument);
                }
                (valid[valid.len() - 2], valid[valid.len() - 1])
            }
            Window::Exact { start, end } => {
                let at = |date: CalendarDate| valid.iter().find(|obs| obs.date == date).copied();
                match (at(*start), at(*end)) {
                    (Some(previous), Some(last)) => (previous, last),
                    _ => return ChangeRecord::not_available(instrument),
                }
            }
        };

        self.derive_record(instrument, previous, last)
    }

    fn derive_record(
        &self,
        instrument: &Instrument,
        previous: &PriceObservation,
        last: &PriceObservation,
    ) -> ChangeRecord {
        let inverted = self.inversion.contains(&instrument.symbol);
        let normalize = |value: Option<f64>| {
            if inverted {
                value.map(invert_price)
            } else {
                value
            }
        };

        let previous_close = normalize(previous.close);
        let last_close = normalize(last.close);

        let (change, percent_change) = match (previous_close, last_close) {
            (Some(prev), Some(_)) if prev == 0.0 => (None, None),
            (Some(prev), Some(curr)) => {
                let change = curr - prev;
                (Some(change), Some(change / prev * 100.0))
            }
            _ => (None, None),
        };

        let name = if inverted {
            rewrite_inverted_name(&instrument.name)
        } else {
            instrument.name.clone()
        };

        ChangeRecord {
            name,
            symbol: instrument.symbol.clone(),
            category: instrument.category,
            previous_close,
            last_close,
            open: normalize(last.open),
            high: normalize(last.high),
            low: normalize(last.low),
            change,
            percent_change,
            previous_date: Some(previous.date),
            last_date: Some(last.date),
        }
    }
}

fn push_record(groups: &mut [CategoryChanges], category: Category, record: ChangeRecord) {
    if let Some(group) = groups.iter_mut().find(|group| group.category == category) {
        group.records.push(record);
    }
}
