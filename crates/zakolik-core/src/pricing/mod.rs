pub mod engine;
pub mod outcome;
pub mod windows;

pub use engine::quote_tariff;
pub use outcome::{PricingOption, Quote, QuoteResult};
