//! Price normalization and the target price filter.
//!
//! Nightly prices are rounded up before being multiplied by the number of
//! nights, so totals never understate what the user will pay.

use crate::models::{Deal, RateOffer, RateQuote, TargetPrice};
use chrono::NaiveDate;

/// Nightly price in the target currency, rounded up
pub fn nightly_price(offer: &RateOffer, usd_rate: f64) -> u64 {
    ((offer.rate + offer.tax) * usd_rate).ceil() as u64
}

/// Number of nights between the two dates, in either order
pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> u64 {
    (check_out - check_in).num_days().unsigned_abs()
}

/// Prices every offer of `quote` and keeps the ones `target` admits
pub fn evaluate(quote: &RateQuote, usd_rate: f64, target: TargetPrice) -> Vec<Deal> {
    let nights = nights(quote.check_in, quote.check_out);

    quote
        .offers
        .iter()
        .filter_map(|offer| {
            let total = nightly_price(offer, usd_rate).saturating_mul(nights);
            target.admits(total).then(|| Deal {
                provider: offer.provider.clone(),
                total,
            })
        })
        .collect()
}
