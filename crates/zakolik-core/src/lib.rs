pub mod error;
pub mod model;
pub mod parsing;
pub mod pricing;
pub mod provider;
pub mod tariffs;

use error::ZakolikError;
use model::Trip;
use pricing::QuoteResult;
use provider::Provider;
use tracing::debug;

/// Main API entry point: price a trip with every given provider.
///
/// Quotes from all providers are merged and sorted cheapest first. The trip
/// is checked against the same bounds as `Trip::new`.
pub fn quote_trip(trip: &Trip, providers: &[&dyn Provider]) -> Result<QuoteResult, ZakolikError> {
    trip.validate()?;

    let mut quotes = Vec::new();
    for provider in providers {
        let provider_quotes = provider.quote(trip)?;
        debug!(
            "{} returned {} quote(s)",
            provider.name(),
            provider_quotes.len()
        );
        quotes.extend(provider_quotes);
    }

    if quotes.is_empty() {
        return Err(ZakolikError::NoQuotes);
    }

    Ok(QuoteResult::new(trip.clone(), quotes))
}
