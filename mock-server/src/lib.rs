use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::info;

pub const MAX_PAGE_SIZE: u32 = 110;

/// Query string of `GET /v2/listings`, as the real API names it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub size: u32,
    pub category_page: Option<String>,
    pub include_fields: Option<String>,
    pub business_type: String,
    pub listing_type: String,
    pub page: u32,
    pub from: u32,
}

/// Raw camelCase listing objects served by the mock.
pub type Store = Arc<Vec<Value>>;

pub fn app() -> Router {
    app_with(seed_listings())
}

pub fn app_with(listings: Vec<Value>) -> Router {
    let store: Store = Arc::new(listings);
    Router::new()
        .route("/v2/listings", get(search_listings))
        .route("/v2/listings/broken", get(broken_envelope))
        .with_state(store)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn search_listings(
    State(store): State<Store>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    info!(
        size = query.size,
        page = query.page,
        from = query.from,
        business_type = %query.business_type,
        listing_type = %query.listing_type,
        include_fields = query.include_fields.as_deref().unwrap_or(""),
        "Search"
    );
    if query.size == 0 || query.size > MAX_PAGE_SIZE {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"message": format!("size must be between 1 and {MAX_PAGE_SIZE}")})),
        ));
    }

    let matching: Vec<&Value> = store
        .iter()
        .filter(|listing| matches(listing, &query.business_type, &query.listing_type))
        .collect();
    let total = matching.len();
    let entries: Vec<Value> = matching
        .into_iter()
        .skip(query.from as usize)
        .take(query.size as usize)
        .map(|listing| {
            json!({
                "listing": listing,
                "account": {"id": "acc-1", "name": "Imobiliária Exemplo"},
                "medias": [],
                "link": {"href": format!("/imovel/{}", listing["id"].as_str().unwrap_or_default())}
            })
        })
        .collect();

    Ok(Json(json!({
        "search": {
            "result": {"listings": entries},
            "totalCount": total
        },
        "page": {
            "uriCategory": {"page": query.category_page.unwrap_or_else(|| "RESULT".to_string())}
        }
    })))
}

/// What the provider sends when it decides a client is a bot.
async fn broken_envelope() -> Json<Value> {
    Json(json!({"error": {"code": "FORBIDDEN", "message": "request blocked"}}))
}

fn matches(listing: &Value, business_type: &str, listing_type: &str) -> bool {
    let type_matches = listing["listingType"].as_str() == Some(listing_type);
    let business_matches = listing["pricingInfos"]
        .as_array()
        .map(|infos| {
            infos
                .iter()
                .any(|info| info["businessType"].as_str() == Some(business_type))
        })
        .unwrap_or(false);
    type_matches && business_matches
}

fn listing(id: &str, listing_type: &str, business_type: &str, price: &str) -> Value {
    json!({
        "id": id,
        "sourceId": format!("src-{id}"),
        "externalId": format!("EXT{id}"),
        "providerId": "provider-1",
        "title": format!("Imóvel {id}"),
        "description": "Apartamento bem localizado",
        "contractType": "REAL_ESTATE",
        "listingType": listing_type,
        "constructionStatus": if listing_type == "DEVELOPMENT" { "UNDER_CONSTRUCTION" } else { "ConstructionStatus_NONE" },
        "unitTypes": ["APARTMENT"],
        "bedrooms": [2],
        "bathrooms": [1],
        "parkingSpaces": [1],
        "usableAreas": ["65"],
        "totalAreas": ["80"],
        "floors": [],
        "suites": [1],
        "address": {
            "city": "São Paulo",
            "state": "São Paulo",
            "stateAcronym": "SP",
            "neighborhood": "Vila Mariana",
            "street": "Rua Domingos de Morais",
            "zipCode": "04010100",
            "point": {"lat": -23.5891, "lon": -46.6345, "source": "GOOGLE"}
        },
        "pricingInfos": [{
            "businessType": business_type,
            "price": price,
            "monthlyCondoFee": "850",
            "yearlyIptu": "1200"
        }],
        "createdAt": "2024-03-08T14:22:31.948Z",
        "updatedAt": "2024-05-02T08:10:00Z",
        "amenities": ["ELEVATOR", "GYM"],
        "stamps": [],
        "portals": ["ZAP", "VIVAREAL"],
        "whatsappNumber": "+5511999999999"
    })
}

/// Listings the default app serves.
///
/// `1003` lacks `sourceId` and fails validation on the client side.
pub fn seed_listings() -> Vec<Value> {
    let mut broken = listing("1003", "USED", "SALE", "720000");
    if let Some(obj) = broken.as_object_mut() {
        obj.remove("sourceId");
    }
    vec![
        listing("1001", "USED", "SALE", "650000"),
        listing("1002", "USED", "SALE", "480000"),
        broken,
        listing("1004", "USED", "SALE", "910000"),
        listing("2001", "USED", "RENT", "3500"),
        listing("3001", "DEVELOPMENT", "SALE", "1200000"),
    ]
}
