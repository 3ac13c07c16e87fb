//! One-call searches: a `ListingsClient` paired with a `Transport`.

use crate::client::ListingsClient;
use crate::config::SdkConfig;
use crate::error::ApiError;
use crate::normalize::SearchOutput;
use crate::transport::Transport;
use crate::types::SearchParams;

pub struct ZapSdk<T> {
    client: ListingsClient,
    transport: T,
}

impl<T: Transport> ZapSdk<T> {
    pub fn with_transport(config: SdkConfig, transport: T) -> Self {
        Self {
            client: ListingsClient::new(config),
            transport,
        }
    }

    pub fn client(&self) -> &ListingsClient {
        &self.client
    }

    /// Build, execute and parse a listings search.
    pub fn search(&self, params: &SearchParams, validate: bool) -> Result<SearchOutput, ApiError> {
        let request = self.client.build_search(params)?;
        let response = self.transport.execute(&request)?;
        self.client.parse_search(response, validate)
    }
}

#[cfg(feature = "transport")]
impl ZapSdk<crate::transport::UreqTransport> {
    /// SDK on the bundled blocking transport, using the config's timeout.
    pub fn new(config: SdkConfig) -> Self {
        let transport = crate::transport::UreqTransport::new(config.default_timeout);
        Self::with_transport(config, transport)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::http::{HttpRequest, HttpResponse};
    use crate::types::{BusinessType, ListingType};

    /// Replays a canned response and remembers what it was asked to send.
    struct CannedTransport {
        status: u16,
        body: String,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl CannedTransport {
        fn new(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for CannedTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.borrow_mut().push(request.clone());
            Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: self.body.clone(),
            })
        }
    }

    #[test]
    fn search_round_trip() {
        let transport =
            CannedTransport::new(200, r#"{"search": {"result": {"listings": []}}}"#);
        let sdk = ZapSdk::with_transport(SdkConfig::default(), transport);
        let params = SearchParams::new(BusinessType::Rent, ListingType::Used).page(2);

        let output = sdk.search(&params, true).unwrap();
        assert_eq!(output.listings().unwrap().len(), 0);

        let seen = sdk.transport.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].query_param("businessType"), Some("RENT"));
        assert_eq!(seen[0].query_param("from"), Some("10"));
    }

    #[test]
    fn invalid_params_never_reach_transport() {
        let sdk = ZapSdk::with_transport(SdkConfig::default(), CannedTransport::new(200, "{}"));
        let err = sdk
            .search(&SearchParams::default().page(0), true)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidPage));
        assert!(sdk.transport.seen.borrow().is_empty());
    }

    #[test]
    fn status_errors_surface() {
        let sdk = ZapSdk::with_transport(SdkConfig::default(), CannedTransport::new(503, "busy"));
        let err = sdk.search(&SearchParams::default(), true).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 503, .. }));
    }
}
