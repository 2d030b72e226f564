use crate::models::Property;
use serde::{Deserialize, Serialize};

/// Search criteria for property listings. Every field is optional and the
/// active ones are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Matches the address or any nearby MTR station (case-insensitive substring)
    pub location_text: Option<String>,
    /// Minimum price (HKD, inclusive)
    pub min_price: Option<u32>,
    /// Maximum price (HKD, inclusive)
    pub max_price: Option<u32>,
    /// Minimum guest capacity
    pub min_guests: Option<u32>,
    /// Matches the subtitle (case-insensitive substring)
    pub property_type_text: Option<String>,
}

impl FilterCriteria {
    /// True when no criterion would be applied.
    pub fn is_empty(&self) -> bool {
        text_needle(&self.location_text).is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.min_guests.is_none()
            && text_needle(&self.property_type_text).is_none()
    }
}

/// Blank text criteria are treated as unset. Other text is matched as typed.
fn text_needle(text: &Option<String>) -> Option<String> {
    text.as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(str::to_lowercase)
}

/// Whether one property satisfies every active criterion.
pub fn matches(property: &Property, criteria: &FilterCriteria) -> bool {
    Matcher::new(criteria).matches(property)
}

/// Stable filter: matching properties in input order.
pub fn filter(properties: &[Property], criteria: &FilterCriteria) -> Vec<Property> {
    let matcher = Matcher::new(criteria);
    properties
        .iter()
        .filter(|p| matcher.matches(p))
        .cloned()
        .collect()
}

/// Criteria with text needles lowercased once per filter run.
struct Matcher<'a> {
    criteria: &'a FilterCriteria,
    location: Option<String>,
    property_type: Option<String>,
}

impl<'a> Matcher<'a> {
    fn new(criteria: &'a FilterCriteria) -> Self {
        Self {
            criteria,
            location: text_needle(&criteria.location_text),
            property_type: text_needle(&criteria.property_type_text),
        }
    }

    fn matches(&self, property: &Property) -> bool {
        if let Some(needle) = &self.location {
            let in_address = property.location.address.to_lowercase().contains(needle.as_str());
            let near_station = property
                .location
                .nearby_mtr
                .iter()
                .any(|station| station.to_lowercase().contains(needle.as_str()));
            if !in_address && !near_station {
                return false;
            }
        }

        if let Some(min) = self.criteria.min_price {
            if property.price < min {
                return false;
            }
        }
        if let Some(max) = self.criteria.max_price {
            if property.price > max {
                return false;
            }
        }

        if let Some(min_guests) = self.criteria.min_guests {
            if property.details.guests < min_guests {
                return false;
            }
        }

        if let Some(needle) = &self.property_type {
            if !property.subtitle.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }

        true
    }
}
