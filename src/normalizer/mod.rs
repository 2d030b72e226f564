//! Raw record → canonical [`Property`].
//!
//! Every optional field falls back to a documented default. Only
//! `property_id`, `address` and `district` are required.

mod embed;
mod fields;

pub use embed::embed_url;
pub use fields::{parse_tag_list, Fields, RawRecord};

use crate::error::NormalizeError;
use crate::lookup;
use crate::models::{
    Availability, Coordinates, Details, Host, Location, Policies, Property, Status,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

pub const DEFAULT_RATING: f32 = 4.0;
pub const DEFAULT_OCCUPANCY: &str = "0%";
pub const AVAILABLE_NOW: &str = "now";

const SHARED_ROOM: &str = "shared room";
const SUITE_UNIT: &str = "套房";

/// Parse a raw amenities value such as `["wifi", "aircon", ""]`.
pub fn parse_amenities(raw: &str) -> Vec<String> {
    parse_tag_list(raw)
}

/// Normalize a single raw record.
pub fn normalize(raw: &RawRecord) -> Result<Property, NormalizeError> {
    normalize_at(raw, None)
}

/// Normalize a raw record, naming it by `position` in errors when it has
/// no `property_id`.
pub fn normalize_at(raw: &RawRecord, position: Option<usize>) -> Result<Property, NormalizeError> {
    let fields = Fields::new(raw);

    let label = fields
        .string(&["property_id", "propertyId"])
        .or_else(|| position.map(|i| format!("#{}", i)))
        .unwrap_or_else(|| "<unknown>".to_string());
    let required = |field: &'static str, names: &[&str]| {
        fields.string(names).ok_or_else(|| NormalizeError::MissingRequiredField {
            field,
            record: label.clone(),
        })
    };

    let property_id = required("property_id", &["property_id", "propertyId"])?;
    let address = required("address", &["address"])?;
    let district = required("district", &["district"])?;

    let category = fields.string(&["type", "category"]).unwrap_or_default();
    let unit = fields.string(&["unit"]).unwrap_or_default();
    let room_type = fields
        .string(&["room type", "room_type", "roomType"])
        .unwrap_or_default();
    let price = fields.count(&["price"]).unwrap_or(0);
    let status = fields
        .string(&["status"])
        .map(|s| Status::parse(&s))
        .unwrap_or_default();

    let title = fields.string(&["title"]).unwrap_or_else(|| address.clone());
    let subtitle = fields
        .string(&["subtitle"])
        .unwrap_or_else(|| format!("{}在{}", category, district));
    let description = fields.string(&["description"]).unwrap_or_else(|| {
        let room = if room_type.is_empty() { &unit } else { &room_type };
        format!("位於{}的{}，{}，月租HK${}", district, category, room, price)
    });

    let image_url = fields.string(&["image_url", "imageUrl"]);
    let images = match fields.list(&["images"]) {
        Some(images) if !images.is_empty() => images,
        _ => image_url.iter().cloned().collect(),
    };

    let vr = fields.string(&["vr"]);
    let vr_url = vr.as_deref().and_then(embed_url);

    let rating = fields
        .float(&["rating"])
        .map(|r| r.clamp(0.0, 5.0) as f32)
        .unwrap_or(DEFAULT_RATING);
    let review_count = fields.count(&["review_count", "reviewCount"]).unwrap_or(0);

    let coordinates = match (
        fields.float(&["latitude", "lat"]),
        fields.float(&["longitude", "lng"]),
    ) {
        (Some(lat), Some(lng)) => Coordinates { lat, lng },
        _ => lookup::coordinates_or_fallback(&district),
    };
    let nearby_mtr = fields
        .list(&["nearby_mtr", "nearbyMTR"])
        .unwrap_or_else(|| lookup::nearby_stations(&district));

    let details = Details {
        guests: fields
            .count(&["guests"])
            .filter(|g| *g > 0)
            .unwrap_or(if room_type == SHARED_ROOM { 1 } else { 2 }),
        bedrooms: fields
            .count(&["bedrooms"])
            .unwrap_or(if unit == SUITE_UNIT { 1 } else { 0 }),
        bathrooms: fields
            .count(&["bathrooms"])
            .unwrap_or(if unit == SUITE_UNIT { 1 } else { 0 }),
        property_type: fields
            .string(&["property_type", "propertyType"])
            .unwrap_or_else(|| category.clone()),
        room_type,
    };

    let amenities = amenities(&fields);

    let default_host = Host::default();
    let host = Host {
        id: fields.string(&["host_id"]).unwrap_or(default_host.id),
        name: fields.string(&["host_name"]).unwrap_or(default_host.name),
        avatar: fields.string(&["host_avatar"]).unwrap_or(default_host.avatar),
        is_superhost: fields
            .boolean(&["host_is_superhost"])
            .unwrap_or(default_host.is_superhost),
        response_time: fields
            .string(&["host_response_time"])
            .unwrap_or(default_host.response_time),
    };

    let availability = Availability {
        available: status.is_bookable(),
        min_stay: fields
            .count(&["min_stay", "minStay"])
            .unwrap_or(Availability::DEFAULT_MIN_STAY),
        max_stay: fields
            .count(&["max_stay", "maxStay"])
            .unwrap_or(Availability::DEFAULT_MAX_STAY),
    };

    let default_policies = Policies::default();
    let policies = Policies {
        check_in: fields.string(&["check_in", "checkIn"]).unwrap_or(default_policies.check_in),
        check_out: fields
            .string(&["check_out", "checkOut"])
            .unwrap_or(default_policies.check_out),
        cancellation: fields
            .string(&["cancellation"])
            .unwrap_or(default_policies.cancellation),
    };

    Ok(Property {
        id: fields.string(&["id"]),
        category,
        title,
        subtitle,
        description,
        price,
        currency: Property::CURRENCY.to_string(),
        unit,
        status,
        available_at: fields
            .string(&["available_at", "availableAt"])
            .unwrap_or_else(|| AVAILABLE_NOW.to_string()),
        occupancy_rate: fields
            .string(&["occupation", "occupancy", "occupancy_rate"])
            .unwrap_or_else(|| DEFAULT_OCCUPANCY.to_string()),
        images,
        image_url,
        vr,
        vr_url,
        rating,
        review_count,
        location: Location {
            district: district.clone(),
            address: address.clone(),
            nearby_mtr,
            coordinates,
        },
        details,
        amenities,
        host,
        availability,
        policies,
        created_at: timestamp(&fields, &["created_at", "createdAt"]),
        updated_at: timestamp(&fields, &["updated_at", "updatedAt"]),
        property_id,
        address,
        district,
    })
}

fn amenities(fields: &Fields<'_>) -> Vec<String> {
    match fields.value(&["amenities"]) {
        None => Vec::new(),
        Some(Value::String(raw)) => parse_amenities(raw),
        Some(Value::Array(_)) => fields.list(&["amenities"]).unwrap_or_default(),
        Some(other) => {
            warn!("Failed to parse amenities: {}", other);
            Vec::new()
        }
    }
}

fn timestamp(fields: &Fields<'_>, names: &[&str]) -> Option<DateTime<Utc>> {
    let raw = fields.string(names)?;
    match DateTime::parse_from_rfc3339(&raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            debug!("Ignoring unparseable timestamp {:?}: {}", raw, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    fn minimal() -> RawRecord {
        record(json!({
            "property_id": "dorm-001",
            "address": "旺角西洋菜南街166號",
            "district": "旺角",
        }))
    }

    fn csv_row() -> RawRecord {
        record(json!({
            "\u{FEFF}type": "勞工舍宿",
            "property_id": "dorm-002",
            "title": "",
            "address": "旺角通菜街72-82號",
            "district": "旺角",
            "price": "3500",
            "unit": "套房",
            "status": "active",
            "available_at": "2025-09-01",
            "occupation ": "95%",
            "room type": "shared room",
            "amenities ": "[\"wifi\", \"aircon\", \"\"]",
            "image_url": "https://img.example/2.jpg",
            "vr": "<iframe src=\"https://vr.example/2\"></iframe>",
        }))
    }

    #[test]
    fn test_defaults_for_minimal_record() {
        let property = normalize(&minimal()).unwrap();

        assert!(property.images.is_empty());
        assert!(property.amenities.is_empty());
        assert_eq!(property.rating, 4.0);
        assert_eq!(property.review_count, 0);
        assert_eq!(property.price, 0);
        assert_eq!(property.currency, "HKD");
        assert_eq!(property.status, Status::Inactive);
        assert!(!property.availability.available);
        assert_eq!(property.availability.min_stay, 30);
        assert_eq!(property.availability.max_stay, 365);
        assert_eq!(property.available_at, "now");
        assert_eq!(property.occupancy_rate, "0%");
        assert_eq!(property.title, "旺角西洋菜南街166號");
        assert_eq!(property.host, Host::default());
        assert_eq!(property.policies, Policies::default());
        assert_eq!(property.id, None);
        assert_eq!(property.details.guests, 2);
        assert_eq!((property.details.bedrooms, property.details.bathrooms), (0, 0));
    }

    #[test]
    fn test_csv_row_with_header_artifacts() {
        let property = normalize(&csv_row()).unwrap();

        assert_eq!(property.category, "勞工舍宿");
        assert_eq!(property.title, "旺角通菜街72-82號");
        assert_eq!(property.subtitle, "勞工舍宿在旺角");
        assert_eq!(property.description, "位於旺角的勞工舍宿，shared room，月租HK$3500");
        assert_eq!(property.price, 3500);
        assert_eq!(property.occupancy_rate, "95%");
        assert_eq!(property.available_at, "2025-09-01");
        assert_eq!(property.amenities, vec!["wifi", "aircon"]);
        assert_eq!(property.images, vec!["https://img.example/2.jpg"]);
        assert_eq!(property.vr_url.as_deref(), Some("https://vr.example/2"));
        assert_eq!(property.details.guests, 1);
        assert_eq!((property.details.bedrooms, property.details.bathrooms), (1, 1));
        assert_eq!(property.details.property_type, "勞工舍宿");
        assert_eq!(property.location.coordinates, Coordinates { lat: 22.3193, lng: 114.1694 });
        assert_eq!(
            property.location.nearby_mtr,
            vec!["Mong Kok", "Prince Edward", "Yau Ma Tei"]
        );
        assert!(property.availability.available);
    }

    #[test]
    fn test_status_and_availability_agree() {
        for raw_status in ["active", "pending", "inactive", "ACTIVE", "deleted", "", "  "] {
            let mut raw = minimal();
            raw.insert("status".to_string(), json!(raw_status));
            let property = normalize(&raw).unwrap();
            assert!(matches!(
                property.status,
                Status::Active | Status::Pending | Status::Inactive
            ));
            assert_eq!(property.availability.available, property.status == Status::Active);
        }
    }

    #[test]
    fn test_status_is_case_sensitive() {
        let mut raw = minimal();
        raw.insert("status".to_string(), json!("ACTIVE"));
        let property = normalize(&raw).unwrap();
        assert_eq!(property.status, Status::Inactive);
        assert!(!property.availability.available);
    }

    #[test]
    fn test_missing_district_is_rejected() {
        let mut raw = csv_row();
        raw.remove("district");
        let err = normalize(&raw).unwrap_err();
        assert_eq!(err.field(), "district");
        assert_eq!(
            err,
            NormalizeError::MissingRequiredField {
                field: "district",
                record: "dorm-002".to_string()
            }
        );
    }

    #[test]
    fn test_missing_property_id_names_position() {
        let mut raw = minimal();
        raw.remove("property_id");
        let err = normalize_at(&raw, Some(4)).unwrap_err();
        assert_eq!(
            err,
            NormalizeError::MissingRequiredField {
                field: "property_id",
                record: "#4".to_string()
            }
        );
    }

    #[test]
    fn test_blank_address_is_missing() {
        let mut raw = minimal();
        raw.insert("address".to_string(), json!("   "));
        assert_eq!(normalize(&raw).unwrap_err().field(), "address");
    }

    #[test]
    fn test_description_falls_back_to_unit() {
        let mut raw = minimal();
        raw.insert("type".to_string(), json!("勞工舍宿"));
        raw.insert("unit".to_string(), json!("床位"));
        raw.insert("price".to_string(), json!("3500"));
        let property = normalize(&raw).unwrap();
        assert_eq!(property.description, "位於旺角的勞工舍宿，床位，月租HK$3500");
    }

    #[test]
    fn test_unparseable_price_is_zero() {
        let mut raw = minimal();
        raw.insert("price".to_string(), json!("面議"));
        assert_eq!(normalize(&raw).unwrap().price, 0);
    }

    #[test]
    fn test_unknown_district_uses_fallback() {
        let mut raw = minimal();
        raw.insert("district".to_string(), json!("沙田"));
        let property = normalize(&raw).unwrap();
        assert_eq!(property.location.coordinates, lookup::FALLBACK_COORDINATES);
        assert!(property.location.nearby_mtr.is_empty());
    }

    #[test]
    fn test_malformed_amenities_do_not_fail_record() {
        let mut raw = minimal();
        raw.insert("amenities".to_string(), json!({ "wifi": true }));
        let property = normalize(&raw).unwrap();
        assert!(property.amenities.is_empty());
    }

    #[test]
    fn test_database_row_values_win() {
        let raw = record(json!({
            "id": "5f1c",
            "property_id": "dorm-010",
            "type": "學生宿舍",
            "title": "有利大廈",
            "subtitle": "Student dorm",
            "description": "Near campus",
            "address": "彌敦道186號 有利大廈",
            "district": "佐敦",
            "price": 4200,
            "status": "pending",
            "images": ["a.jpg", "b.jpg"],
            "image_url": "a.jpg",
            "rating": 7.5,
            "review_count": 12,
            "latitude": 22.30,
            "longitude": 114.17,
            "nearby_mtr": ["Jordan"],
            "guests": 3,
            "bedrooms": 2,
            "bathrooms": 1,
            "room_type": "private room",
            "amenities": ["wifi", "gym"],
            "host_name": "Amy Ho",
            "host_is_superhost": false,
            "min_stay": 60,
            "check_out": "11:00 AM",
            "created_at": "2024-04-22T16:00:00.000Z",
            "updated_at": "not a date",
        }));
        let property = normalize(&raw).unwrap();

        assert_eq!(property.id.as_deref(), Some("5f1c"));
        assert_eq!(property.subtitle, "Student dorm");
        assert_eq!(property.price, 4200);
        assert_eq!(property.status, Status::Pending);
        assert_eq!(property.images, vec!["a.jpg", "b.jpg"]);
        assert_eq!(property.rating, 5.0);
        assert_eq!(property.review_count, 12);
        assert_eq!(property.location.coordinates, Coordinates { lat: 22.30, lng: 114.17 });
        assert_eq!(property.location.nearby_mtr, vec!["Jordan"]);
        assert_eq!(property.details.guests, 3);
        assert_eq!(property.details.bedrooms, 2);
        assert_eq!(property.amenities, vec!["wifi", "gym"]);
        assert_eq!(property.host.name, "Amy Ho");
        assert_eq!(property.host.id, "admin-host");
        assert!(!property.host.is_superhost);
        assert_eq!(property.availability.min_stay, 60);
        assert_eq!(property.availability.max_stay, 365);
        assert_eq!(property.policies.check_out, "11:00 AM");
        assert_eq!(property.policies.check_in, "2:00 PM");
        assert!(property.created_at.is_some());
        assert!(property.updated_at.is_none());
    }

    #[test]
    fn test_serializes_with_listing_keys() {
        let property = normalize(&csv_row()).unwrap();
        let value = serde_json::to_value(&property).unwrap();
        assert_eq!(value["property_id"], "dorm-002");
        assert_eq!(value["type"], "勞工舍宿");
        assert_eq!(value["occupation"], "95%");
        assert_eq!(value["reviewCount"], 0);
        assert_eq!(value["location"]["nearbyMTR"][0], "Mong Kok");
        assert_eq!(value["availability"]["minStay"], 30);
        assert!(value.get("id").is_none());
    }
}
