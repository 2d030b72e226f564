use crate::error::NormalizeError;
use crate::filter::{self, FilterCriteria};
use crate::models::Property;
use crate::normalizer::{normalize_at, RawRecord};
use std::collections::HashSet;
use tracing::{info, warn};

/// In-memory, ordered collection of normalized listings.
///
/// Rebuilt from the backing data on every load; never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyStore {
    properties: Vec<Property>,
}

/// Result of normalizing a batch: the store plus every rejected record.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub store: PropertyStore,
    pub failures: Vec<(usize, NormalizeError)>,
}

impl PropertyStore {
    pub fn new(properties: Vec<Property>) -> Self {
        warn_on_duplicates(&properties);
        Self { properties }
    }

    /// Normalize every raw record. A rejected record is reported with its
    /// input index and does not stop the rest of the batch.
    pub fn load(records: &[RawRecord]) -> LoadReport {
        let mut properties = Vec::with_capacity(records.len());
        let mut failures = Vec::new();

        for (index, raw) in records.iter().enumerate() {
            match normalize_at(raw, Some(index)) {
                Ok(property) => properties.push(property),
                Err(e) => {
                    warn!("Skipping record {}: {}", index, e);
                    failures.push((index, e));
                }
            }
        }

        info!(
            "Normalized {} of {} records ({} rejected)",
            properties.len(),
            records.len(),
            failures.len()
        );

        LoadReport {
            store: Self::new(properties),
            failures,
        }
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    pub fn as_slice(&self) -> &[Property] {
        &self.properties
    }

    /// Look up by business key. The first occurrence wins on duplicates.
    pub fn get(&self, property_id: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.property_id == property_id)
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<Property> {
        filter::filter(&self.properties, criteria)
    }

    pub fn by_category(&self, category: &str) -> Vec<&Property> {
        self.properties.iter().filter(|p| p.category == category).collect()
    }

    pub fn by_district(&self, district: &str) -> Vec<&Property> {
        self.properties.iter().filter(|p| p.district == district).collect()
    }

    pub fn into_vec(self) -> Vec<Property> {
        self.properties
    }
}

fn warn_on_duplicates(properties: &[Property]) {
    let mut seen = HashSet::new();
    for property in properties {
        if !seen.insert(property.property_id.as_str()) {
            warn!("Duplicate property_id {} in collection", property.property_id);
        }
    }
}
