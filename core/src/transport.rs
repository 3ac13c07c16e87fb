//! Executing `HttpRequest`s.
//!
//! The rest of the crate never performs I/O. `Transport` is the seam where a
//! host plugs in its HTTP stack; `UreqTransport` (feature `transport`,
//! enabled by default) is a blocking implementation on top of `ureq`.

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Something that can perform an HTTP round-trip.
pub trait Transport {
    /// Execute `request` and return the response whatever its status.
    ///
    /// Only failures to obtain a response at all are errors.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

#[cfg(feature = "transport")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "transport")]
mod blocking {
    use std::time::Duration;

    use tracing::debug;

    use super::Transport;
    use crate::error::ApiError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport backed by a `ureq` agent.
    ///
    /// 4xx/5xx responses are returned as data so the client decides how to
    /// treat them.
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl UreqTransport {
        pub fn new(timeout: Duration) -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(Some(timeout))
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            let url = request.full_url()?;
            debug!(method = request.method.as_str(), url = %url, "Sending request");

            let mut builder = match request.method {
                HttpMethod::Get => self.agent.get(&url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            let mut response = builder
                .call()
                .map_err(|e| ApiError::Transport(e.to_string()))?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response
                .body_mut()
                .read_to_string()
                .map_err(|e| ApiError::Transport(e.to_string()))?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}
