//! HTTP client for the Shipyard server API.

use crate::CliResult;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use shipyard_core::{NewShip, Ship, ShipOrder, ShipPatch, ShipType};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`ShipClient`] methods.
pub type ClientFuture<'a, T> = Pin<Box<dyn Future<Output = CliResult<T>> + Send + 'a>>;

/// Query string accepted by the listing and count endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipListQuery {
    /// Substring of the ship name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Substring of the planet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planet: Option<String>,
    /// Ship class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_type: Option<ShipType>,
    /// Produced strictly after this epoch millisecond.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<i64>,
    /// Produced strictly before this epoch millisecond.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<i64>,
    /// Used flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_used: Option<bool>,
    /// Minimum speed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_speed: Option<f64>,
    /// Maximum speed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<f64>,
    /// Minimum crew size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_crew_size: Option<i32>,
    /// Maximum crew size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_crew_size: Option<i32>,
    /// Minimum rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    /// Maximum rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rating: Option<f64>,
    /// Sort key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<ShipOrder>,
    /// Zero-based page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<i64>,
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
}

/// Error payload returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

/// Operations the CLI performs against the server.
pub trait ShipClient {
    /// Fetch a filtered, sorted page of ships.
    fn list<'a>(&'a self, query: &'a ShipListQuery) -> ClientFuture<'a, Vec<Ship>>;
    /// Count ships matching the filter part of `query`.
    fn count<'a>(&'a self, query: &'a ShipListQuery) -> ClientFuture<'a, usize>;
    /// Fetch one ship.
    fn get<'a>(&'a self, id: &'a str) -> ClientFuture<'a, Ship>;
    /// Create a ship.
    fn create<'a>(&'a self, ship: &'a NewShip) -> ClientFuture<'a, Ship>;
    /// Update a ship.
    fn update<'a>(&'a self, id: &'a str, patch: &'a ShipPatch) -> ClientFuture<'a, Ship>;
    /// Delete a ship.
    fn delete<'a>(&'a self, id: &'a str) -> ClientFuture<'a, ()>;
}

/// Normalize the server URL for consistent API requests.
pub fn normalize_server_url(server_url: &str) -> CliResult<String> {
    let trimmed = server_url.trim();
    if trimmed.is_empty() {
        return Err("server url is required".into());
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Reqwest-backed client used in production.
pub struct ReqwestShipClient {
    client: Client,
    base_url: String,
}

impl ReqwestShipClient {
    /// Build a client for the server at `server_url`.
    pub fn new(server_url: &str) -> CliResult<Self> {
        let client = Client::builder().user_agent("shipyard-cli").build()?;
        Ok(Self {
            client,
            base_url: normalize_server_url(server_url)?,
        })
    }

    fn ships_url(&self) -> String {
        format!("{}/rest/ships", self.base_url)
    }

    fn ship_url(&self, id: &str) -> String {
        format!("{}/rest/ships/{}", self.base_url, id.trim())
    }
}

/// Send a request and turn non-success statuses into errors carrying the server message.
async fn send(request: RequestBuilder) -> CliResult<Response> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = match response.json::<ErrorResponse>().await {
        Ok(body) => body.message,
        Err(_) => "no details".to_string(),
    };
    Err(format!("server returned {status}: {detail}").into())
}

impl ShipClient for ReqwestShipClient {
    fn list<'a>(&'a self, query: &'a ShipListQuery) -> ClientFuture<'a, Vec<Ship>> {
        Box::pin(async move {
            let response = send(self.client.get(self.ships_url()).query(query)).await?;
            Ok(response.json::<Vec<Ship>>().await?)
        })
    }

    fn count<'a>(&'a self, query: &'a ShipListQuery) -> ClientFuture<'a, usize> {
        Box::pin(async move {
            let url = format!("{}/count", self.ships_url());
            let response = send(self.client.get(url).query(query)).await?;
            Ok(response.json::<usize>().await?)
        })
    }

    fn get<'a>(&'a self, id: &'a str) -> ClientFuture<'a, Ship> {
        Box::pin(async move {
            let response = send(self.client.get(self.ship_url(id))).await?;
            Ok(response.json::<Ship>().await?)
        })
    }

    fn create<'a>(&'a self, ship: &'a NewShip) -> ClientFuture<'a, Ship> {
        Box::pin(async move {
            let response = send(self.client.post(self.ships_url()).json(ship)).await?;
            Ok(response.json::<Ship>().await?)
        })
    }

    fn update<'a>(&'a self, id: &'a str, patch: &'a ShipPatch) -> ClientFuture<'a, Ship> {
        Box::pin(async move {
            let response = send(self.client.post(self.ship_url(id)).json(patch)).await?;
            Ok(response.json::<Ship>().await?)
        })
    }

    fn delete<'a>(&'a self, id: &'a str) -> ClientFuture<'a, ()> {
        Box::pin(async move {
            send(self.client.delete(self.ship_url(id))).await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_server_url_trims_trailing_slash() {
        let url = normalize_server_url("http://localhost:8080/").expect("url");
        assert_eq!(url, "http://localhost:8080");
    }

    #[test]
    fn normalize_server_url_rejects_empty() {
        let err = normalize_server_url("   ").unwrap_err();
        assert!(err.to_string().contains("server url"));
    }

    #[test]
    fn ship_urls_are_built_from_base() {
        let client = ReqwestShipClient::new("http://127.0.0.1:8080/").expect("client");

        assert_eq!(client.ships_url(), "http://127.0.0.1:8080/rest/ships");
        assert_eq!(client.ship_url(" 7 "), "http://127.0.0.1:8080/rest/ships/7");
    }

    #[test]
    fn list_query_omits_unset_parameters() {
        let query = ShipListQuery {
            ship_type: Some(ShipType::Merchant),
            is_used: Some(true),
            order: Some(ShipOrder::Rating),
            page_size: Some(5),
            ..ShipListQuery::default()
        };

        let value = serde_json::to_value(&query).expect("serialize");

        assert_eq!(
            value,
            serde_json::json!({
                "shipType": "MERCHANT",
                "isUsed": true,
                "order": "RATING",
                "pageSize": 5
            })
        );
    }
}
