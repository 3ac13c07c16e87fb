//! Synchronous client core for the Zap Imóveis listings search API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). Two pieces carry the real
//! logic:
//!
//! - `selector`: typed field selections serialized into the provider's
//!   `includeFields` bracket syntax.
//! - `normalize`: camelCase response envelopes turned into validated
//!   `ListingData` records, dropping (and logging) individual bad records.
//!
//! # Design
//! - `ListingsClient` holds only its `SdkConfig`.
//! - A search is split into `build_search` (produces request) and
//!   `parse_search` (consumes response), so the I/O boundary is explicit.
//! - `ZapSdk` joins the two halves over a `Transport`; the bundled
//!   `UreqTransport` sits behind the default `transport` feature.
//! - Integration tests run against the `mock-server` crate to catch drift
//!   between the builder and the envelope shape.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod sdk;
pub mod selector;
pub mod transport;
pub mod types;

pub use client::ListingsClient;
pub use config::{LogLevel, SdkConfig};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use normalize::{normalize_listings, parse_listings, NormalizedBatch, RecordError, SearchOutput};
pub use sdk::ZapSdk;
pub use selector::{FieldSelector, FullSearchResponseFields, ListingSearchFields};
pub use transport::Transport;
#[cfg(feature = "transport")]
pub use transport::UreqTransport;
pub use types::{
    Address, BusinessType, ConstructionStatus, ContractType, GeoPoint, ListingData, ListingType,
    PricingInfo, RentalInfo, SearchParams, UnitType,
};
