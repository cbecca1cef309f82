use zakolik_core::error::ZakolikError;
use zakolik_core::pricing::QuoteResult;

pub fn print(result: &QuoteResult) -> Result<(), ZakolikError> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}
