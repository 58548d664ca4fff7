// Award fare qualification over the fare records of one search response

use serde::Deserialize;

// Fare family marking a business/first award product.
pub const AWARD_BUSINESS_FIRST: &str = "AWARD-BUSINESS-FIRST";

// Availability value for fares that can no longer be booked.
pub const SOLD_OUT: &str = "SOLD_OUT";

// One fare record as returned by the search API. The upstream schema
// carries many more fields per fare; only the ones the qualification
// check needs are decoded, and both may be absent on any given record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Fare {
    pub fare_family_type: Option<String>,
    pub availability: Option<String>,
}

// True iff some fare is a business/first award product that is not sold
// out. A record without a family type never qualifies; a record without
// an availability value is treated as still open.
pub fn has_award_business(fares: &[Fare]) -> bool {
    fares.iter().any(|fare| {
        fare.fare_family_type.as_deref() == Some(AWARD_BUSINESS_FIRST)
            && fare.availability.as_deref() != Some(SOLD_OUT)
    })
}
