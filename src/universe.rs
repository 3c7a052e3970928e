//! Static reference data for the instrument universe.
//!
//! The universe is fixed for the lifetime of a session: instruments are
//! created at startup, mutated every tick, never destroyed.

#[derive(Debug, Clone, Copy)]
pub struct InstrumentInfo {
    pub ticker: &'static str,
    pub name: &'static str,
    pub sector: &'static str,
    pub exchange: &'static str,
    pub initial_price: f64,
}

pub const UNIVERSE: [InstrumentInfo; 7] = [
    InstrumentInfo {
        ticker: "GOOG",
        name: "Alphabet Inc.",
        sector: "Technology",
        exchange: "NASDAQ",
        initial_price: 142.50,
    },
    InstrumentInfo {
        ticker: "TSLA",
        name: "Tesla, Inc.",
        sector: "Automotive",
        exchange: "NASDAQ",
        initial_price: 245.80,
    },
    InstrumentInfo {
        ticker: "AMZN",
        name: "Amazon.com Inc.",
        sector: "E-commerce",
        exchange: "NASDAQ",
        initial_price: 178.30,
    },
    InstrumentInfo {
        ticker: "META",
        name: "Meta Platforms Inc.",
        sector: "Technology",
        exchange: "NASDAQ",
        initial_price: 485.20,
    },
    InstrumentInfo {
        ticker: "NVDA",
        name: "NVIDIA Corporation",
        sector: "Semiconductors",
        exchange: "NASDAQ",
        initial_price: 875.40,
    },
    InstrumentInfo {
        ticker: "BTC",
        name: "Bitcoin",
        sector: "Crypto",
        exchange: "CRYPTO",
        initial_price: 64200.00,
    },
    InstrumentInfo {
        ticker: "ETH",
        name: "Ethereum",
        sector: "Crypto",
        exchange: "CRYPTO",
        initial_price: 3450.00,
    },
];

pub fn instrument(ticker: &str) -> Option<&'static InstrumentInfo> {
    UNIVERSE.iter().find(|i| i.ticker == ticker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_ticker() {
        let info = instrument("NVDA").unwrap();
        assert_eq!(info.name, "NVIDIA Corporation");
        assert_eq!(info.exchange, "NASDAQ");
    }

    #[test]
    fn test_lookup_unknown_ticker() {
        assert!(instrument("DOGE").is_none());
    }

    #[test]
    fn test_all_initial_prices_positive() {
        for info in &UNIVERSE {
            assert!(info.initial_price > 0.0, "{}", info.ticker);
        }
    }
}
