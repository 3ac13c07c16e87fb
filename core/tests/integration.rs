//! Listings searches against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `ZapSdk` over real
//! HTTP with the bundled `UreqTransport`. Validates that query building,
//! envelope parsing and per-record rejection work end-to-end.

use std::net::SocketAddr;

use zap_core::{
    ApiError, BusinessType, HttpMethod, HttpRequest, ListingType, ListingsClient, SdkConfig,
    SearchParams, Transport, UreqTransport, ZapSdk,
};

/// Start the mock server on a random port and return its address.
fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn config(addr: SocketAddr) -> SdkConfig {
    SdkConfig::default()
        .with_base_url(format!("http://{addr}/v2/"))
        .with_logging(true, true)
}

fn ids(output: &zap_core::SearchOutput) -> Vec<String> {
    output
        .listings()
        .unwrap()
        .iter()
        .map(|listing| listing.id.clone())
        .collect()
}

#[test]
fn search_lifecycle() {
    // Step 1: start mock server on a random port.
    let addr = start_server();
    let sdk = ZapSdk::new(config(addr));

    // Step 2: first page of used listings for sale, one of which is invalid.
    let params = SearchParams::new(BusinessType::Sale, ListingType::Used);
    let output = sdk.search(&params, true).unwrap();
    assert_eq!(ids(&output), vec!["1001", "1002", "1004"]);

    let first = &output.listings().unwrap()[0];
    assert_eq!(first.source_id, "src-1001");
    assert_eq!(first.usable_areas, vec![65.0]);
    assert_eq!(first.address.neighborhood, "Vila Mariana");
    assert!(first.price_for(BusinessType::Sale).is_some());

    // Step 3: same search without validation keeps every entry.
    let raw = sdk.search(&params, false).unwrap().into_raw().unwrap();
    let entries = raw["search"]["result"]["listings"].as_array().unwrap();
    assert_eq!(entries.len(), 4);
    assert_eq!(raw["search"]["totalCount"], 4);

    // Step 4: second page of two, the invalid listing is dropped again.
    let params = SearchParams::new(BusinessType::Sale, ListingType::Used)
        .page(2)
        .size(2);
    let output = sdk.search(&params, true).unwrap();
    assert_eq!(ids(&output), vec!["1004"]);

    // Step 5: rentals.
    let params = SearchParams::new(BusinessType::Rent, ListingType::Used);
    let output = sdk.search(&params, true).unwrap();
    assert_eq!(ids(&output), vec!["2001"]);

    // Step 6: developments.
    let params = SearchParams::new(BusinessType::Sale, ListingType::Development);
    let output = sdk.search(&params, true).unwrap();
    let listing = &output.listings().unwrap()[0];
    assert_eq!(listing.id, "3001");
    assert_eq!(listing.listing_type, ListingType::Development);

    // Step 7: past the last page.
    let params = SearchParams::new(BusinessType::Sale, ListingType::Used).page(9);
    let output = sdk.search(&params, true).unwrap();
    assert!(ids(&output).is_empty());
}

#[test]
fn invalid_page_size_is_rejected_locally() {
    let addr = start_server();
    let sdk = ZapSdk::new(config(addr));

    let err = sdk
        .search(&SearchParams::default().size(111), true)
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidPageSize { size: 111, .. }));
}

#[test]
fn blocked_response_is_malformed() {
    let addr = start_server();
    let client = ListingsClient::new(config(addr));
    let transport = UreqTransport::new(client.config().default_timeout);

    let request = HttpRequest {
        method: HttpMethod::Get,
        url: client.endpoint_url("/broken"),
        query: Vec::new(),
        headers: client.build_headers(),
    };
    let response = transport.execute(&request).unwrap();
    assert_eq!(response.status, 200);

    let err = client.parse_search(response, true).unwrap_err();
    assert!(matches!(err, ApiError::MalformedResponse { ref key } if key == "search"));
}

#[test]
fn unknown_api_version_is_not_found() {
    let addr = start_server();
    let sdk = ZapSdk::new(SdkConfig::default().with_base_url(format!("http://{addr}/v1/")));

    let err = sdk.search(&SearchParams::default(), true).unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
}

#[test]
fn unreachable_host_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let sdk = ZapSdk::new(SdkConfig::default().with_base_url(format!("http://{addr}/v2/")));

    let err = sdk.search(&SearchParams::default(), true).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
