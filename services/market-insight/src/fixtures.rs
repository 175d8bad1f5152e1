//! Static market data shown on the overview page
//!
//! Prices and histories are fixed; there is no live market feed behind them.

use rust_decimal::Decimal;
use serde::Serialize;

const MONTHS: [&str; 24] = [
    "Jan 24", "Feb 24", "Mar 24", "Apr 24", "May 24", "Jun 24",
    "Jul 24", "Aug 24", "Sep 24", "Oct 24", "Nov 24", "Dec 24",
    "Jan 25", "Feb 25", "Mar 25", "Apr 25", "May 25", "Jun 25",
    "Jul 25", "Aug 25", "Sep 25", "Oct 25", "Nov 25", "Dec 25",
];

const USD_BRL_HISTORY: [f64; 24] = [
    4.85, 4.92, 4.98, 5.05, 5.12, 5.18, 5.25, 5.30, 5.22, 5.15, 5.08, 4.95,
    5.02, 5.10, 5.15, 5.25, 5.32, 5.40, 5.45, 5.52, 5.48, 5.42, 5.35, 5.48,
];

const EUR_BRL_HISTORY: [f64; 24] = [
    5.30, 5.45, 5.55, 5.50, 5.62, 5.68, 5.75, 5.82, 5.90, 5.95, 6.05, 6.15,
    6.10, 6.05, 6.12, 6.08, 6.02, 5.98, 5.95, 5.92, 5.88, 5.90, 5.94, 5.92,
];

const BTC_USD_HISTORY: [f64; 24] = [
    28000.0, 24000.0, 26000.0, 30000.0, 35000.0, 32000.0, 38000.0, 42000.0,
    45000.0, 48000.0, 52000.0, 44000.0, 42000.0, 51000.0, 68000.0, 62000.0,
    59000.0, 64000.0, 66000.0, 62000.0, 58000.0, 61000.0, 63000.0, 64200.0,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryPoint {
    pub date: &'static str,
    pub value: Decimal,
}

/// Currency or crypto quote with its monthly history
#[derive(Debug, Clone, Serialize)]
pub struct CurrencyQuote {
    pub id: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    pub price: Decimal,
    pub change_pct: f64,
    pub trend: Trend,
    pub history: Vec<HistoryPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize)]
pub struct Investment {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: &'static str,
    pub return_ytd_pct: f64,
    pub risk: RiskLevel,
    pub min_investment: Decimal,
}

fn history(values: &[f64; 24]) -> Vec<HistoryPoint> {
    MONTHS
        .iter()
        .zip(values.iter())
        .filter_map(|(date, value)| {
            Some(HistoryPoint {
                date: *date,
                value: Decimal::try_from(*value).ok()?.normalize(),
            })
        })
        .collect()
}

/// Quotes displayed on the overview page
pub fn currencies() -> Vec<CurrencyQuote> {
    vec![
        CurrencyQuote {
            id: "1",
            name: "US Dollar",
            symbol: "USD/BRL",
            price: Decimal::new(548, 2),
            change_pct: 0.15,
            trend: Trend::Up,
            history: history(&USD_BRL_HISTORY),
        },
        CurrencyQuote {
            id: "2",
            name: "Euro",
            symbol: "EUR/BRL",
            price: Decimal::new(592, 2),
            change_pct: -0.05,
            trend: Trend::Down,
            history: history(&EUR_BRL_HISTORY),
        },
        CurrencyQuote {
            id: "3",
            name: "Bitcoin",
            symbol: "BTC/USD",
            price: Decimal::new(64200, 0),
            change_pct: 2.4,
            trend: Trend::Up,
            history: history(&BTC_USD_HISTORY),
        },
    ]
}

/// Investment products listed under the quotes
pub fn investments() -> Vec<Investment> {
    vec![
        Investment {
            id: "i1",
            name: "Tesouro Selic 2029",
            kind: "Fixed Income",
            return_ytd_pct: 10.75,
            risk: RiskLevel::Low,
            min_investment: Decimal::new(140, 0),
        },
        Investment {
            id: "i2",
            name: "CDB Banco Inter",
            kind: "Fixed Income",
            return_ytd_pct: 11.2,
            risk: RiskLevel::Low,
            min_investment: Decimal::new(100, 0),
        },
        Investment {
            id: "i3",
            name: "S&P 500 ETF (IVVB11)",
            kind: "Equities",
            return_ytd_pct: 18.4,
            risk: RiskLevel::Medium,
            min_investment: Decimal::new(280, 0),
        },
        Investment {
            id: "i4",
            name: "Real Estate Fund KNRI11",
            kind: "REIT",
            return_ytd_pct: 8.9,
            risk: RiskLevel::Medium,
            min_investment: Decimal::new(160, 0),
        },
        Investment {
            id: "i5",
            name: "Apple Shares (AAPL)",
            kind: "US Equities",
            return_ytd_pct: 22.1,
            risk: RiskLevel::High,
            min_investment: Decimal::new(500, 0),
        },
    ]
}

/// One-line summary fed to the insight prompt, e.g. `USD/BRL: 5.48, EUR/BRL: 5.92`
pub fn market_summary(quotes: &[CurrencyQuote]) -> String {
    quotes
        .iter()
        .map(|q| format!("{}: {}", q.symbol, q.price))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_summary() {
        assert_eq!(
            market_summary(&currencies()),
            "USD/BRL: 5.48, EUR/BRL: 5.92, BTC/USD: 64200"
        );
        assert_eq!(market_summary(&[]), "");
    }

    #[test]
    fn test_histories_are_complete() {
        for quote in currencies() {
            assert_eq!(quote.history.len(), 24, "{}", quote.symbol);
            // last point of each series is the current price
            assert_eq!(quote.history[23].value, quote.price, "{}", quote.symbol);
        }
    }

    #[test]
    fn test_investments() {
        let products = investments();
        assert_eq!(products.len(), 5);
        assert_eq!(products.iter().filter(|p| p.risk == RiskLevel::Low).count(), 2);
    }
}
