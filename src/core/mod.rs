//! Core business logic abstractions

pub mod config;
pub mod currency;
pub mod error;
pub mod growth;
pub mod log;
pub mod pipeline;
pub mod price;
pub mod projection;
pub mod stats;
pub mod suggest;
pub mod trend;

// Re-export main types for cleaner imports
pub use currency::{Currency, CurrencyRateProvider};
pub use error::ProjectionError;
pub use price::{HistoryProvider, PricePoint, PriceSeries};
pub use projection::{ProjectionRequest, ProjectionResult};
