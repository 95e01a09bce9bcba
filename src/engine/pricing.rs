use rust_decimal::Decimal;

use crate::model::Span;

use super::EngineError;

/// Total price for a stay: nightly rate × whole calendar nights, exact
/// decimal arithmetic throughout.
pub fn quote(nightly_rate: Decimal, span: &Span) -> Result<Decimal, EngineError> {
    let nights = span.nights();
    if nights <= 0 {
        return Err(EngineError::NoNights);
    }
    Ok(nightly_rate * Decimal::from(nights))
}
