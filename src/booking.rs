use crate::error::BookingError;
use crate::models::Property;
use chrono::NaiveDate;
use serde::Serialize;

/// Flat cleaning fee per stay (HKD)
pub const CLEANING_FEE: u64 = 200;
/// Service fee as a percentage of the subtotal
pub const SERVICE_FEE_PERCENT: u64 = 10;

/// Fee breakdown shown next to a listing for a chosen stay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuote {
    pub nights: u64,
    pub nightly_rate: u32,
    pub subtotal: u64,
    pub service_fee: u64,
    pub cleaning_fee: u64,
    pub total: u64,
}

impl BookingQuote {
    /// Estimate fees for `guests` staying between two dates. Reversed dates
    /// count the same number of nights.
    pub fn estimate(
        property: &Property,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guests: u32,
    ) -> Result<Self, BookingError> {
        if !property.is_bookable() {
            return Err(BookingError::Unavailable(property.property_id.clone()));
        }
        if guests > property.details.guests {
            return Err(BookingError::TooManyGuests {
                requested: guests,
                capacity: property.details.guests,
            });
        }

        let nights = (check_out - check_in).num_days().unsigned_abs();
        if nights == 0 {
            return Err(BookingError::EmptyStay);
        }

        let subtotal = nights * u64::from(property.price);
        // Rounded to the nearest dollar.
        let service_fee = (subtotal * SERVICE_FEE_PERCENT + 50) / 100;

        Ok(Self {
            nights,
            nightly_rate: property.price,
            subtotal,
            service_fee,
            cleaning_fee: CLEANING_FEE,
            total: subtotal + service_fee + CLEANING_FEE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use crate::normalizer::{normalize, RawRecord};
    use serde_json::{json, Value};

    fn property(status: &str, price: &str) -> Property {
        let raw: RawRecord = match json!({
            "property_id": "dorm-001",
            "address": "旺角西洋菜南街166號",
            "district": "旺角",
            "price": price,
            "status": status,
            "room type": "private room",
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        normalize(&raw).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_quote_breakdown() {
        let quote =
            BookingQuote::estimate(&property("active", "355"), date("2025-09-01"), date("2025-09-04"), 2)
                .unwrap();
        assert_eq!(quote.nights, 3);
        assert_eq!(quote.subtotal, 1065);
        assert_eq!(quote.service_fee, 107);
        assert_eq!(quote.cleaning_fee, 200);
        assert_eq!(quote.total, 1372);
    }

    #[test]
    fn test_reversed_dates_count_nights() {
        let quote =
            BookingQuote::estimate(&property("active", "100"), date("2025-09-10"), date("2025-09-08"), 1)
                .unwrap();
        assert_eq!(quote.nights, 2);
    }

    #[test]
    fn test_rejections() {
        let inactive = property("inactive", "100");
        assert_eq!(inactive.status, Status::Inactive);
        assert_eq!(
            BookingQuote::estimate(&inactive, date("2025-09-01"), date("2025-09-02"), 1),
            Err(BookingError::Unavailable("dorm-001".to_string()))
        );

        let active = property("active", "100");
        assert_eq!(
            BookingQuote::estimate(&active, date("2025-09-01"), date("2025-09-01"), 1),
            Err(BookingError::EmptyStay)
        );
        assert_eq!(
            BookingQuote::estimate(&active, date("2025-09-01"), date("2025-09-02"), 3),
            Err(BookingError::TooManyGuests { requested: 3, capacity: 2 })
        );
    }
}
