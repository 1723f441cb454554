//! Tickers offered when the user has not picked one.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    pub ticker: &'static str,
    pub description: &'static str,
}

const SUGGESTIONS: [Suggestion; 5] = [
    Suggestion {
        ticker: "AAPL",
        description: "Tech giant - Moderate Risk",
    },
    Suggestion {
        ticker: "MSFT",
        description: "Stable growth - Low Risk",
    },
    Suggestion {
        ticker: "TSLA",
        description: "High growth - High Risk",
    },
    Suggestion {
        ticker: "INFY.NS",
        description: "Indian IT - Moderate Risk",
    },
    Suggestion {
        ticker: "RELIANCE.NS",
        description: "Indian Conglomerate - Moderate Risk",
    },
];

pub fn suggested_tickers() -> &'static [Suggestion] {
    &SUGGESTIONS
}
