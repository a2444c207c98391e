use std::sync::Arc;
use std::time::Instant;

use pulse_core::{
    default_watchlist, CacheMode, CalendarDate, ChangeCalculator, ChangeReport, Envelope,
    EnvelopeMeta, InversionSet, ProviderId, ReqwestHttpClient, YahooHistoryProvider,
};
use uuid::Uuid;

use crate::cli::{ChangesArgs, Cli, OutputFormat};
use crate::error::CliError;
use crate::output;

pub async fn run(cli: &Cli, args: &ChangesArgs) -> Result<(), CliError> {
    let watchlist = default_watchlist();
    let inversion = InversionSet::from_env()?;
    let calculator = build_calculator(args.real, inversion);
    let cache_mode = if args.refresh {
        CacheMode::Refresh
    } else {
        CacheMode::Use
    };

    let started = Instant::now();
    let report = match (&args.from, &args.to) {
        (Some(from), Some(to)) => {
            let start = CalendarDate::parse(from)?;
            let end = CalendarDate::parse(to)?;
            log::debug!("strict comparison {start} -> {end}");
            calculator
                .compute_changes_between(&watchlist, start, end, cache_mode)
                .await?
        }
        _ => {
            let reference = match &args.date {
                Some(raw) => CalendarDate::parse(raw)?,
                None => CalendarDate::today_utc(),
            };
            log::debug!("lookback mode, reference date {reference}");
            calculator
                .compute_changes(&watchlist, reference, cache_mode)
                .await?
        }
    };
    let latency_ms = started.elapsed().as_millis() as u64;

    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }

    match cli.format {
        OutputFormat::Table => output::render_report_table(&report),
        OutputFormat::Json => {
            let envelope = wrap_report(&report, latency_ms);
            output::render_json(&envelope, cli.pretty)?;
        }
    }

    Ok(())
}

fn build_calculator(real: bool, inversion: InversionSet) -> ChangeCalculator {
    let provider = if real {
        YahooHistoryProvider::with_http_client(Arc::new(ReqwestHttpClient::new()))
    } else {
        YahooHistoryProvider::default()
    };
    ChangeCalculator::new(
        Arc::new(provider),
        pulse_core::CacheStore::with_default_ttl(),
        inversion,
    )
}

fn wrap_report(report: &ChangeReport, latency_ms: u64) -> Envelope<ChangeReport> {
    let meta = EnvelopeMeta::new(
        Uuid::new_v4().to_string(),
        ProviderId::Yahoo,
        latency_ms,
        report.cache_hit,
    )
    .with_warnings(report.warnings.clone());
    Envelope::new(meta, report.clone())
}
