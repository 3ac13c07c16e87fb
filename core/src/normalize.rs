//! Turn a raw search response into `ListingData` records.
//!
//! # Design
//! The provider speaks camelCase and publishes no schema, so keys are
//! converted mechanically (`sourceId` -> `source_id`) instead of through a
//! per-field mapping table. New provider fields therefore need no code
//! change; they are simply ignored by `ListingData` until someone adds them.
//!
//! A response whose envelope lacks `search.result.listings` fails as a whole
//! with `ApiError::MalformedResponse`. Inside a valid envelope each listing
//! is validated on its own: failures are collected as `RecordError`s, logged,
//! and left out of the result, and the rest of the batch carries on.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::error;

use crate::error::ApiError;
use crate::types::ListingData;

/// Path from the envelope root to the listings array.
pub const LISTINGS_PATH: [&str; 3] = ["search", "result", "listings"];

/// Key of the listing object inside each entry of the listings array.
pub const LISTING_KEY: &str = "listing";

/// A listing that was dropped from a batch.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("listing at index {index} rejected: {message}")]
pub struct RecordError {
    /// Position in the provider's listings array.
    pub index: usize,
    /// The raw `id` of the listing, when it had one.
    pub listing_id: Option<String>,
    pub message: String,
}

/// Outcome of normalizing one response.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// Valid listings, in provider order.
    pub listings: Vec<ListingData>,
    pub rejected: Vec<RecordError>,
}

/// What `parse_listings` hands back.
#[derive(Debug, Clone)]
pub enum SearchOutput {
    Listings(Vec<ListingData>),
    /// The decoded response, untouched.
    Raw(Value),
}

impl SearchOutput {
    pub fn listings(&self) -> Option<&[ListingData]> {
        match self {
            SearchOutput::Listings(listings) => Some(listings),
            SearchOutput::Raw(_) => None,
        }
    }

    pub fn into_raw(self) -> Option<Value> {
        match self {
            SearchOutput::Raw(value) => Some(value),
            SearchOutput::Listings(_) => None,
        }
    }
}

/// Convert a camelCase key to snake_case.
///
/// Every uppercase letter becomes `_` followed by its lowercase form, so
/// `sourceId` becomes `source_id`. Acronyms are not special-cased: `listingID`
/// becomes `listing_i_d`.
pub fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_uppercase() {
            out.push('_');
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Rewrite every object key in `value` to snake_case.
///
/// Recurses into objects and into objects held directly by arrays. Scalars
/// and arrays of non-objects are returned as they are.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(normalize_map(map)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => Value::Object(normalize_map(map)),
                    other => other,
                })
                .collect(),
        ),
        other => other,
    }
}

fn normalize_map(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| (snake_case(&key), normalize_keys(value)))
        .collect()
}

/// Locate the listings array inside a response envelope.
pub fn extract_listings(envelope: &Value) -> Result<&Vec<Value>, ApiError> {
    let mut node = envelope;
    for key in LISTINGS_PATH {
        node = node.get(key).ok_or_else(|| ApiError::MalformedResponse {
            key: key.to_string(),
        })?;
    }
    node.as_array().ok_or_else(|| ApiError::MalformedResponse {
        key: LISTINGS_PATH.join("."),
    })
}

/// Validate a single entry of the listings array.
pub fn normalize_listing(index: usize, entry: &Value) -> Result<ListingData, RecordError> {
    let raw = entry.get(LISTING_KEY).ok_or_else(|| RecordError {
        index,
        listing_id: None,
        message: format!("entry has no `{LISTING_KEY}` object"),
    })?;
    serde_json::from_value(normalize_keys(raw.clone())).map_err(|e| RecordError {
        index,
        listing_id: raw.get("id").map(id_text),
        message: e.to_string(),
    })
}

fn id_text(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Validate every listing of a response envelope.
///
/// Fails only when the envelope itself is malformed. Rejected listings are
/// logged at error level and reported in `NormalizedBatch::rejected`.
pub fn normalize_listings(envelope: &Value) -> Result<NormalizedBatch, ApiError> {
    let entries = extract_listings(envelope)?;
    let batch = entries.iter().enumerate().fold(
        NormalizedBatch::default(),
        |mut batch, (index, entry)| {
            match normalize_listing(index, entry) {
                Ok(listing) => batch.listings.push(listing),
                Err(rejected) => {
                    error!(
                        index = rejected.index,
                        listing_id = rejected.listing_id.as_deref().unwrap_or("<none>"),
                        error = %rejected.message,
                        "Skipping invalid listing"
                    );
                    batch.rejected.push(rejected);
                }
            }
            batch
        },
    );
    Ok(batch)
}

/// Normalize a decoded response, or hand it back untouched when `validate`
/// is false.
pub fn parse_listings(envelope: Value, validate: bool) -> Result<SearchOutput, ApiError> {
    if !validate {
        return Ok(SearchOutput::Raw(envelope));
    }
    let batch = normalize_listings(&envelope)?;
    Ok(SearchOutput::Listings(batch.listings))
}
