//! Listing pipeline for the dormitory rental site: raw CSV or database rows
//! in, canonical [`Property`] records out, plus the search filter and
//! booking estimate the site runs over them.

pub mod booking;
pub mod config;
pub mod error;
pub mod filter;
pub mod lookup;
pub mod models;
pub mod normalizer;
pub mod sources;
pub mod store;

pub use booking::BookingQuote;
pub use error::{BookingError, ConfigError, NormalizeError};
pub use filter::{filter, FilterCriteria};
pub use models::{Property, Status};
pub use normalizer::{normalize, parse_amenities, RawRecord};
pub use store::{LoadReport, PropertyStore};
