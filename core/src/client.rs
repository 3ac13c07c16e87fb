//! Stateless HTTP request builder and response parser for the listings API.
//!
//! # Design
//! `ListingsClient` holds only its `SdkConfig` and carries no mutable state
//! between calls. A search is split into `build_search`, which produces an
//! `HttpRequest`, and `parse_search`, which consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip (or hands both halves to
//! `ZapSdk`), keeping this module deterministic and free of I/O.

use serde_json::Value;
use tracing::{debug, error};

use crate::config::SdkConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::normalize::{parse_listings, SearchOutput};
use crate::selector::FieldSelector;
use crate::types::{SearchParams, MAX_PAGE_SIZE};

/// Resource path of the listings endpoint, relative to the base URL.
pub const LISTINGS_RESOURCE: &str = "listings";

/// The only `categoryPage` the search endpoint is used with.
pub const CATEGORY_PAGE: &str = "RESULT";

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:141.0) Gecko/20100101 Firefox/141.0";

/// Synchronous, stateless client for the listings API.
#[derive(Debug, Clone)]
pub struct ListingsClient {
    config: SdkConfig,
}

impl ListingsClient {
    pub fn new(config: SdkConfig) -> Self {
        Self { config }
    }

    /// Client with the default configuration, pointed at `base_url`.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::new(SdkConfig::default().with_base_url(base_url))
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// URL of the listings resource, optionally followed by a sub-resource.
    ///
    /// `resource_name` may be given with or without its leading slash.
    pub fn endpoint_url(&self, resource_name: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let resource = resource_name.trim_start_matches('/');
        if resource.is_empty() {
            format!("{base}/{LISTINGS_RESOURCE}")
        } else {
            format!("{base}/{LISTINGS_RESOURCE}/{resource}")
        }
    }

    /// Headers the provider expects from its own web front end.
    pub fn build_headers(&self) -> Vec<(String, String)> {
        [
            ("User-Agent", USER_AGENT.to_string()),
            ("Accept", "*/*".to_string()),
            ("Accept-Language", "pt-BR,pt;q=0.8,en-US;q=0.5,en;q=0.3".to_string()),
            ("Referer", "https://www.zapimoveis.com.br/".to_string()),
            ("x-domain", ".zapimoveis.com.br".to_string()),
            ("X-DeviceId", self.config.device_id.to_string()),
            ("Origin", "https://www.zapimoveis.com.br".to_string()),
            ("Sec-Fetch-Dest", "empty".to_string()),
            ("Sec-Fetch-Mode", "cors".to_string()),
            ("Sec-Fetch-Site", "same-site".to_string()),
            ("Pragma", "no-cache".to_string()),
            ("Cache-Control", "no-cache".to_string()),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
    }

    /// Build the listings search request.
    ///
    /// Rejects `size` outside `1..=110` and a `page` of 0 before anything
    /// is built.
    pub fn build_search(&self, params: &SearchParams) -> Result<HttpRequest, ApiError> {
        if params.size == 0 || params.size > MAX_PAGE_SIZE {
            return Err(ApiError::InvalidPageSize {
                size: params.size,
                max: MAX_PAGE_SIZE,
            });
        }
        if params.page == 0 {
            return Err(ApiError::InvalidPage);
        }

        let query = vec![
            ("size".to_string(), params.size.to_string()),
            ("categoryPage".to_string(), CATEGORY_PAGE.to_string()),
            ("includeFields".to_string(), params.include_fields.include_fields()),
            ("businessType".to_string(), params.business_type.as_str().to_string()),
            ("listingType".to_string(), params.listing_type.as_str().to_string()),
            ("page".to_string(), params.page.to_string()),
            ("from".to_string(), params.offset().to_string()),
        ];

        let request = HttpRequest {
            method: HttpMethod::Get,
            url: self.endpoint_url(""),
            query,
            headers: self.build_headers(),
        };
        if self.config.log_requests {
            debug!(
                method = request.method.as_str(),
                url = %request.url,
                query = ?request.query,
                "Request"
            );
        }
        Ok(request)
    }

    /// Parse a search response.
    ///
    /// With `validate` the body is normalized into listings; without it the
    /// decoded JSON is returned as is.
    pub fn parse_search(
        &self,
        response: HttpResponse,
        validate: bool,
    ) -> Result<SearchOutput, ApiError> {
        if self.config.log_responses {
            debug!(
                status = response.status,
                body = %response.body,
                "Response"
            );
        }
        self.check_status(&response)?;
        let envelope: Value = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        parse_listings(envelope, validate)
    }

    /// Map non-success status codes to the appropriate `ApiError` variant.
    ///
    /// Does nothing when `raise_for_status` is off.
    pub fn check_status(&self, response: &HttpResponse) -> Result<(), ApiError> {
        if !self.config.raise_for_status {
            return Ok(());
        }
        let err = match response.status {
            200 | 201 | 204 => return Ok(()),
            404 => ApiError::NotFound {
                url: self.endpoint_url(""),
            },
            status => ApiError::HttpError {
                status,
                body: response.body.clone(),
            },
        };
        error!(status = response.status, "Error in ListingsClient: {}", err);
        Err(err)
    }
}

impl Default for ListingsClient {
    fn default() -> Self {
        Self::new(SdkConfig::default())
    }
}
