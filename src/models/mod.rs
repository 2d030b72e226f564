use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Listing status. Only `Active` listings are bookable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Pending,
    #[default]
    Inactive,
}

impl Status {
    /// Total mapping from a raw status string. Only the exact values
    /// `active` and `pending` are recognized; everything else is `Inactive`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "active" => Status::Active,
            "pending" => Status::Pending,
            _ => Status::Inactive,
        }
    }

    pub fn is_bookable(self) -> bool {
        self == Status::Active
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Active => f.write_str("active"),
            Status::Pending => f.write_str("pending"),
            Status::Inactive => f.write_str("inactive"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Location information for a property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub district: String,
    pub address: String,
    #[serde(rename = "nearbyMTR")]
    pub nearby_mtr: Vec<String>,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Details {
    pub guests: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub property_type: String,
    pub room_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub is_superhost: bool,
    pub response_time: String,
}

/// The business runs a single host account for every listing.
impl Default for Host {
    fn default() -> Self {
        Self {
            id: "admin-host".to_string(),
            name: "HKFLAL Admin".to_string(),
            avatar: "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=150&h=150&fit=crop&crop=face".to_string(),
            is_superhost: true,
            response_time: "1 hour".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub available: bool,
    pub min_stay: u32,
    pub max_stay: u32,
}

impl Availability {
    pub const DEFAULT_MIN_STAY: u32 = 30;
    pub const DEFAULT_MAX_STAY: u32 = 365;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Policies {
    pub check_in: String,
    pub check_out: String,
    pub cancellation: String,
}

impl Default for Policies {
    fn default() -> Self {
        Self {
            check_in: "2:00 PM".to_string(),
            check_out: "12:00 PM".to_string(),
            cancellation: "Flexible".to_string(),
        }
    }
}

/// Canonical rental listing, as handed to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Storage-assigned identifier. Never produced by the normalizer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "property_id")]
    pub property_id: String,
    #[serde(rename = "type")]
    pub category: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub address: String,
    pub district: String,
    pub price: u32,
    pub currency: String,
    pub unit: String,
    pub status: Status,
    #[serde(rename = "available_at")]
    pub available_at: String,
    #[serde(rename = "occupation")]
    pub occupancy_rate: String,
    pub images: Vec<String>,
    #[serde(rename = "image_url", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vr_url: Option<String>,
    pub rating: f32,
    pub review_count: u32,
    pub location: Location,
    pub details: Details,
    pub amenities: Vec<String>,
    pub host: Host,
    pub availability: Availability,
    pub policies: Policies,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Property {
    pub const CURRENCY: &'static str = "HKD";

    pub fn is_bookable(&self) -> bool {
        self.status.is_bookable()
    }

    /// First image, if any. Callers render a placeholder when this is `None`.
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}
