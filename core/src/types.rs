//! Domain types for the listings API.
//!
//! # Design
//! `ListingData` and its nested records are deserialized from a listing
//! whose keys have already been converted to snake_case by the normalizer,
//! so field names here are plain Rust names with no serde renames. Unknown
//! keys are ignored. Every field is required unless it is an `Option`.
//!
//! Physical attributes are sequences because a development listing
//! describes several units at once (e.g. `bedrooms: [2, 3]`).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::selector::FullSearchResponseFields;

/// Sale or rent. Used both as a request filter and inside pricing records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusinessType {
    Sale,
    Rent,
}

impl BusinessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessType::Sale => "SALE",
            BusinessType::Rent => "RENT",
        }
    }
}

/// Resale of an existing property, or a new development.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingType {
    Used,
    Development,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Used => "USED",
            ListingType::Development => "DEVELOPMENT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractType {
    RealEstate,
    Owner,
    Builder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstructionStatus {
    Built,
    UnderConstruction,
    PlanOnly,
    /// The provider's value for listings with no construction status.
    #[serde(rename = "ConstructionStatus_NONE")]
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitType {
    Apartment,
    Home,
    CondominiumHouse,
    TwoStoryHouse,
    Penthouse,
    Flat,
    Kitnet,
    Studio,
    ResidentialAllotmentLand,
    AllotmentLand,
    Farm,
    CommercialProperty,
    CommercialBuilding,
    Office,
    Business,
    ShedDepositWarehouse,
    ParkingSpace,
    Hotel,
}

/// Geographic point of an address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    pub state: String,
    pub neighborhood: String,
    pub country: Option<String>,
    pub street: Option<String>,
    pub street_number: Option<String>,
    pub zip_code: Option<String>,
    pub zone: Option<String>,
    pub complement: Option<String>,
    pub point: Option<GeoPoint>,
}

/// Rental-specific pricing details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalInfo {
    pub period: String,
    pub warranties: Vec<String>,
    pub monthly_rental_total_price: Option<Decimal>,
}

/// Price of a listing for one business type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingInfo {
    pub business_type: BusinessType,
    pub price: Decimal,
    pub monthly_condo_fee: Option<Decimal>,
    pub yearly_iptu: Option<Decimal>,
    pub rental_info: Option<RentalInfo>,
}

/// A validated property listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingData {
    pub id: String,
    pub source_id: String,
    pub external_id: String,
    pub provider_id: Option<String>,
    pub legacy_id: Option<String>,
    pub title: String,
    pub description: String,
    pub contract_type: ContractType,
    pub listing_type: ListingType,
    pub construction_status: ConstructionStatus,
    pub unit_types: Vec<UnitType>,
    #[serde(deserialize_with = "lenient_seq")]
    pub bedrooms: Vec<u32>,
    #[serde(deserialize_with = "lenient_seq")]
    pub bathrooms: Vec<u32>,
    #[serde(deserialize_with = "lenient_seq")]
    pub parking_spaces: Vec<u32>,
    #[serde(deserialize_with = "lenient_seq")]
    pub usable_areas: Vec<f64>,
    #[serde(deserialize_with = "lenient_seq")]
    pub total_areas: Vec<f64>,
    #[serde(deserialize_with = "lenient_seq")]
    pub floors: Vec<u32>,
    #[serde(deserialize_with = "lenient_seq")]
    pub suites: Vec<u32>,
    pub address: Address,
    pub pricing_infos: Vec<PricingInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub amenities: Vec<String>,
    pub stamps: Vec<String>,
    pub portals: Vec<String>,
}

impl ListingData {
    /// The pricing record for `business_type`, if the listing has one.
    pub fn price_for(&self, business_type: BusinessType) -> Option<&PricingInfo> {
        self.pricing_infos
            .iter()
            .find(|p| p.business_type == business_type)
    }
}

/// A number the provider may send either as a JSON number or as a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Text(String),
}

/// Deserialize a sequence of numbers, accepting numeric strings.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
{
    let raw: Vec<Lenient<T>> = Vec::deserialize(deserializer)?;
    raw.into_iter()
        .map(|item| match item {
            Lenient::Value(value) => Ok(value),
            Lenient::Text(text) => text.trim().parse().map_err(|e| {
                serde::de::Error::custom(format!("invalid number {text:?}: {e}"))
            }),
        })
        .collect()
}

/// Maximum page size the provider accepts.
pub const MAX_PAGE_SIZE: u32 = 110;

/// Parameters of a listings search.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub business_type: BusinessType,
    pub listing_type: ListingType,
    /// 1-based page number.
    pub page: u32,
    pub size: u32,
    pub include_fields: FullSearchResponseFields,
}

impl SearchParams {
    pub fn new(business_type: BusinessType, listing_type: ListingType) -> Self {
        Self {
            business_type,
            listing_type,
            ..Default::default()
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn include_fields(mut self, fields: FullSearchResponseFields) -> Self {
        self.include_fields = fields;
        self
    }

    /// Result offset of the first listing on this page.
    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.size)
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            business_type: BusinessType::Sale,
            listing_type: ListingType::Used,
            page: 1,
            size: 10,
            include_fields: FullSearchResponseFields::listing_search(),
        }
    }
}
