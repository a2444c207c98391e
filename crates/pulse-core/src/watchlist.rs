//! Instrument watchlist configuration.

use serde::{Deserialize, Serialize};

use crate::{Category, Instrument, Symbol, ValidationError};

/// Ordered instrument set for one calculator run.
///
/// Declaration order is load-bearing: output groups keep the category order
/// of first appearance and the instrument order within each category, so
/// downstream tables and heatmaps render deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watchlist {
    instruments: Vec<Instrument>,
}

impl Watchlist {
    pub fn new(instruments: Vec<Instrument>) -> Self {
        Self { instruments }
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Categories in order of first appearance.
    pub fn categories(&self) -> Vec<Category> {
        let mut seen = Vec::new();
        for instrument in &self.instruments {
            if !seen.contains(&instrument.category) {
                seen.push(instrument.category);
            }
        }
        seen
    }

    /// Stable identity for cache keys: the symbol list in declaration order.
    pub fn signature(&self) -> String {
        self.instruments
            .iter()
            .map(|instrument| instrument.symbol.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Built-in global market watchlist mirroring the dashboard defaults.
pub fn default_watchlist() -> Watchlist {
    let entries: &[(&str, &str, Category)] = &[
        ("^GSPC", "S&P 500", Category::StockIndex),
        ("^IXIC", "NASDAQ Composite", Category::StockIndex),
        ("^FTSE", "FTSE 100 (UK)", Category::StockIndex),
        ("^N225", "Nikkei 225 (Japan)", Category::StockIndex),
        ("^GDAXI", "DAX 30 (Germany)", Category::StockIndex),
        ("^NSEI", "Nifty 50 (India)", Category::StockIndex),
        ("^BVSP", "Bovespa (Brazil)", Category::StockIndex),
        ("^MXX", "IPC Mexico", Category::StockIndex),
        ("^HSI", "Hang Seng (Hong Kong)", Category::StockIndex),
        ("^STOXX50E", "Euro Stoxx 50", Category::StockIndex),
        ("EURUSD=X", "Euro/USD", Category::Currency),
        ("JPY=X", "USD/JPY", Category::Currency),
        ("GBPUSD=X", "British Pound/USD", Category::Currency),
        ("INR=X", "USD/INR", Category::Currency),
        ("CNY=X", "USD/CNY", Category::Currency),
        ("AUDUSD=X", "Australian Dollar/USD", Category::Currency),
        ("BRL=X", "USD/BRL", Category::Currency),
        ("MXN=X", "USD/MXN", Category::Currency),
        ("CL=F", "Crude Oil (WTI)", Category::Commodity),
        ("GC=F", "Gold", Category::Commodity),
        ("SI=F", "Silver", Category::Commodity),
        ("HG=F", "Copper", Category::Commodity),
        ("PL=F", "Platinum", Category::Commodity),
        ("^TNX", "US 10-Year Yield", Category::Yield),
        ("^FVX", "US 5-Year Yield", Category::Yield),
        ("^TYX", "US 30-Year Yield", Category::Yield),
    ];

    let instruments = entries
        .iter()
        .map(|(symbol, name, category)| {
            build_instrument(symbol, name, *category)
                .expect("built-in watchlist entries are valid")
        })
        .collect();

    Watchlist::new(instruments)
}

fn build_instrument(
    symbol: &str,
    name: &str,
    category: Category,
) -> Result<Instrument, ValidationError> {
    Instrument::new(Symbol::parse(symbol)?, name, category)
}
