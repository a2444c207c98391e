//! Behavior-driven tests for the change calculator.
//!
//! These tests verify HOW the calculator handles provider data and failures:
//! grouping, caching, currency inversion, and per-instrument degradation.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pulse_core::{
    default_watchlist, CacheMode, CacheStore, CalendarDate, Category, ChangeCalculator,
    HistoryProvider, HistoryRequest, Instrument, InversionSet, ObservationSeries,
    PriceObservation, ProviderId, SourceError, Symbol, Watchlist, YahooHistoryProvider,
};

// =============================================================================
// Scripted provider
// =============================================================================

/// Provider returning pre-scripted observations per symbol and counting
/// upstream fetches. Symbols without a script fail as not-found.
struct ScriptedProvider {
    series: HashMap<String, Vec<PriceObservation>>,
    fetch_count: AtomicUsize,
}

impl ScriptedProvider {
    fn new() -> Self {
        Self {
            series: HashMap::new(),
            fetch_count: AtomicUsize::new(0),
        }
    }

    fn with_series(mut self, symbol: &str, observations: Vec<PriceObservation>) -> Self {
        self.series.insert(symbol.to_string(), observations);
        self
    }

    fn fetches(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

impl HistoryProvider for ScriptedProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn daily_history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ObservationSeries, SourceError>> + Send + 'a>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        let result = match self.series.get(req.symbol.as_str()) {
            Some(observations) => Ok(ObservationSeries::new(
                req.symbol.clone(),
                observations.clone(),
            )),
            None => Err(SourceError::not_found(&req.symbol)),
        };
        Box::pin(async move { result })
    }
}

fn obs(date: &str, close: f64) -> PriceObservation {
    PriceObservation::new(
        CalendarDate::parse(date).expect("date"),
        Some(close - 0.5),
        Some(close + 1.0),
        Some(close - 1.0),
        Some(close),
    )
}

fn instrument(symbol: &str, name: &str, category: Category) -> Instrument {
    Instrument::new(Symbol::parse(symbol).expect("valid"), name, category).expect("valid")
}

fn date(value: &str) -> CalendarDate {
    CalendarDate::parse(value).expect("date")
}

// =============================================================================
// Per-instrument degradation
// =============================================================================

#[tokio::test]
async fn when_one_instrument_fails_siblings_still_compute() {
    // Given: gold has data, the second symbol is unknown upstream
    let provider = Arc::new(
        ScriptedProvider::new().with_series(
            "GC=F",
            vec![obs("2024-03-06", 100.0), obs("2024-03-07", 105.0)],
        ),
    );
    let calculator = ChangeCalculator::new(
        provider,
        CacheStore::disabled(),
        InversionSet::none(),
    );
    let watchlist = Watchlist::new(vec![
        instrument("GC=F", "Gold", Category::Commodity),
        instrument("SI=F", "Silver", Category::Commodity),
    ]);

    // When: the batch is computed
    let report = calculator
        .compute_changes(&watchlist, date("2024-03-08"), CacheMode::Bypass)
        .await
        .expect("batch must not abort");

    // Then: gold computes, silver degrades to not-available with a warning
    assert_eq!(report.groups.len(), 1);
    let records = &report.groups[0].records;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].change, Some(5.0));
    assert_eq!(records[0].percent_change, Some(5.0));
    assert!(!records[1].is_available());
    assert_eq!(report.warnings.len(), 1);
    assert!(
        report.warnings[0].contains("Silver"),
        "warning should name the instrument: {}",
        report.warnings[0]
    );
}

// =============================================================================
// Grouping
// =============================================================================

#[tokio::test]
async fn grouping_partitions_the_watchlist_exactly() {
    // Given: the offline provider and the full default watchlist
    let calculator = ChangeCalculator::new(
        Arc::new(YahooHistoryProvider::default()),
        CacheStore::disabled(),
        InversionSet::default(),
    );
    let watchlist = default_watchlist();

    // When: the batch is computed
    let report = calculator
        .compute_changes(&watchlist, date("2024-03-08"), CacheMode::Bypass)
        .await
        .expect("batch should compute");

    // Then: every instrument appears exactly once, in declaration order
    let grouped: Vec<&Symbol> = report.records().map(|record| &record.symbol).collect();
    let declared: Vec<&Symbol> = watchlist
        .instruments()
        .iter()
        .map(|instrument| &instrument.symbol)
        .collect();
    assert_eq!(grouped, declared);

    // And: category order is the watchlist's declaration order
    let categories: Vec<Category> = report.groups.iter().map(|group| group.category).collect();
    assert_eq!(categories, watchlist.categories());

    // And: records stay inside their own category group
    for group in &report.groups {
        for record in &group.records {
            assert_eq!(record.category, group.category);
        }
    }
}

// =============================================================================
// Caching
// =============================================================================

#[tokio::test]
async fn identical_calls_within_ttl_hit_the_cache_without_refetching() {
    // Given: a scripted provider and a live cache
    let provider = Arc::new(
        ScriptedProvider::new()
            .with_series(
                "GC=F",
                vec![obs("2024-03-06", 100.0), obs("2024-03-07", 105.0)],
            )
            .with_series(
                "SI=F",
                vec![obs("2024-03-06", 24.0), obs("2024-03-07", 25.0)],
            ),
    );
    let calculator = ChangeCalculator::new(
        provider.clone(),
        CacheStore::with_default_ttl(),
        InversionSet::none(),
    );
    let watchlist = Watchlist::new(vec![
        instrument("GC=F", "Gold", Category::Commodity),
        instrument("SI=F", "Silver", Category::Commodity),
    ]);

    // When: the same request runs twice inside the cache window
    let first = calculator
        .compute_changes(&watchlist, date("2024-03-08"), CacheMode::Use)
        .await
        .expect("first run");
    let second = calculator
        .compute_changes(&watchlist, date("2024-03-08"), CacheMode::Use)
        .await
        .expect("second run");

    // Then: one upstream fetch per instrument total, bit-identical records
    assert_eq!(provider.fetches(), 2);
    assert!(!first.cache_hit);
    assert!(second.cache_hit);
    assert_eq!(first.groups, second.groups);
}

#[tokio::test]
async fn refresh_mode_skips_the_cache_read_and_rewrites_the_entry() {
    let provider = Arc::new(ScriptedProvider::new().with_series(
        "GC=F",
        vec![obs("2024-03-06", 100.0), obs("2024-03-07", 105.0)],
    ));
    let calculator = ChangeCalculator::new(
        provider.clone(),
        CacheStore::with_default_ttl(),
        InversionSet::none(),
    );
    let watchlist = Watchlist::new(vec![instrument("GC=F", "Gold", Category::Commodity)]);

    // Prime the cache, then force a user-triggered refresh
    calculator
        .compute_changes(&watchlist, date("2024-03-08"), CacheMode::Use)
        .await
        .expect("prime");
    let refreshed = calculator
        .compute_changes(&watchlist, date("2024-03-08"), CacheMode::Refresh)
        .await
        .expect("refresh");

    assert_eq!(provider.fetches(), 2);
    assert!(!refreshed.cache_hit);

    // The rewritten entry still serves subsequent reads
    let after = calculator
        .compute_changes(&watchlist, date("2024-03-08"), CacheMode::Use)
        .await
        .expect("post-refresh read");
    assert!(after.cache_hit);
    assert_eq!(provider.fetches(), 2);
}

#[tokio::test]
async fn different_date_parameters_use_different_cache_entries() {
    let provider = Arc::new(ScriptedProvider::new().with_series(
        "GC=F",
        vec![obs("2024-03-06", 100.0), obs("2024-03-07", 105.0)],
    ));
    let calculator = ChangeCalculator::new(
        provider.clone(),
        CacheStore::with_default_ttl(),
        InversionSet::none(),
    );
    let watchlist = Watchlist::new(vec![instrument("GC=F", "Gold", Category::Commodity)]);

    calculator
        .compute_changes(&watchlist, date("2024-03-08"), CacheMode::Use)
        .await
        .expect("first date");
    calculator
        .compute_changes(&watchlist, date("2024-03-09"), CacheMode::Use)
        .await
        .expect("second date");

    assert_eq!(provider.fetches(), 2, "distinct dates must not share entries");
}

// =============================================================================
// Strict two-date mode
// =============================================================================

#[tokio::test]
async fn strict_mode_does_not_fall_back_to_nearby_dates() {
    // Given: data on 03-05 and 03-07 only
    let provider = Arc::new(ScriptedProvider::new().with_series(
        "GC=F",
        vec![obs("2024-03-05", 100.0), obs("2024-03-07", 105.0)],
    ));
    let calculator = ChangeCalculator::new(
        provider,
        CacheStore::disabled(),
        InversionSet::none(),
    );
    let watchlist = Watchlist::new(vec![instrument("GC=F", "Gold", Category::Commodity)]);

    // When: the user picks 03-06 (no trading data) and 03-07
    let report = calculator
        .compute_changes_between(
            &watchlist,
            date("2024-03-06"),
            date("2024-03-07"),
            CacheMode::Bypass,
        )
        .await
        .expect("batch should compute");

    // Then: the record is not-available rather than snapped to 03-05
    assert!(!report.groups[0].records[0].is_available());

    // And: picking both trading days produces the exact comparison
    let report = calculator
        .compute_changes_between(
            &watchlist,
            date("2024-03-05"),
            date("2024-03-07"),
            CacheMode::Bypass,
        )
        .await
        .expect("batch should compute");
    let record = &report.groups[0].records[0];
    assert_eq!(record.previous_close, Some(100.0));
    assert_eq!(record.last_close, Some(105.0));
    assert_eq!(record.change, Some(5.0));
}

#[tokio::test]
async fn reversed_explicit_dates_are_rejected_without_any_fetch() {
    // Given: a scripted provider that counts upstream fetches
    let provider = Arc::new(ScriptedProvider::new().with_series(
        "GC=F",
        vec![obs("2024-03-06", 100.0), obs("2024-03-07", 105.0)],
    ));
    let calculator = ChangeCalculator::new(
        provider.clone(),
        CacheStore::disabled(),
        InversionSet::none(),
    );
    let watchlist = Watchlist::new(vec![instrument("GC=F", "Gold", Category::Commodity)]);

    // When: the end date precedes the start date
    let error = calculator
        .compute_changes_between(
            &watchlist,
            date("2024-03-08"),
            date("2024-03-01"),
            CacheMode::Bypass,
        )
        .await
        .expect_err("reversed dates must fail");

    // Then: the call fails validation and the provider was never consulted
    assert_eq!(error.kind(), pulse_core::SourceErrorKind::InvalidRequest);
    assert_eq!(provider.fetches(), 0);
}

// =============================================================================
// Currency inversion end to end
// =============================================================================

#[tokio::test]
async fn inverted_currency_flows_through_the_full_pipeline() {
    let provider = Arc::new(ScriptedProvider::new().with_series(
        "EURUSD=X",
        vec![obs("2024-03-06", 1.10), obs("2024-03-07", 1.05)],
    ));
    let calculator = ChangeCalculator::new(
        provider,
        CacheStore::disabled(),
        InversionSet::default(),
    );
    let watchlist = Watchlist::new(vec![instrument(
        "EURUSD=X",
        "EUR/USD",
        Category::Currency,
    )]);

    let report = calculator
        .compute_changes(&watchlist, date("2024-03-08"), CacheMode::Bypass)
        .await
        .expect("batch should compute");

    let record = &report.groups[0].records[0];
    assert_eq!(record.name, "USD/EUR");
    assert!((record.previous_close.expect("previous") - 1.0 / 1.10).abs() < 1e-12);
    assert!((record.last_close.expect("last") - 1.0 / 1.05).abs() < 1e-12);
    // The USD strengthened, so the inverted quote moved up.
    assert!(record.percent_change.expect("percent") > 0.0);
}
