use crate::coin_page::ObjectsPage;
use crate::error::{SnapshotError, SnapshotResult};
use crate::fetcher::{MetadataFetcher, PageFetcher};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

const COIN_OBJECTS_QUERY: &str = r#"
query CoinObjects($type: String!, $first: Int!, $after: String) {
  objects(filter: { type: $type }, first: $first, after: $after) {
    pageInfo { hasNextPage endCursor }
    nodes {
      owner {
        __typename
        ... on AddressOwner { owner { address } }
      }
      asMoveObject { contents { json } }
    }
  }
}
"#;

const COIN_METADATA_QUERY: &str = r#"
query CoinMetadata($coinType: String!) {
  coinMetadata(coinType: $coinType) { decimals }
}
"#;

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoinMetadataData {
    coin_metadata: Option<CoinMetadata>,
}

#[derive(Debug, Deserialize)]
struct CoinMetadata {
    decimals: Option<Value>,
}

/// Talks to a Sui GraphQL indexer for a single coin type.
pub struct GraphqlClient {
    client: Client,
    endpoint: String,
    coin_type: String,
    page_size: u32,
}

impl GraphqlClient {
    pub fn new(
        endpoint: &str,
        coin_type: &str,
        page_size: u32,
        request_timeout: Duration,
    ) -> SnapshotResult<Self> {
        let mut headers = HeaderMap::new();
        headers.append(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            coin_type: coin_type.to_string(),
            page_size,
        })
    }

    /// Type filter matching every live coin object of the configured coin.
    pub fn object_type(&self) -> String {
        coin_object_type(&self.coin_type)
    }

    async fn post<T: DeserializeOwned>(&self, query: &str, variables: Value) -> SnapshotResult<T> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&GraphqlRequest { query, variables })
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body: GraphqlResponse<T> = response.json().await.map_err(|err| {
                    SnapshotError::MalformedResponse(format!("can't decode response: {err}"))
                })?;
                unwrap_response(body)
            }
            code => Err(SnapshotError::Transport(format!(
                "{} returned {:?}",
                self.endpoint, code
            ))),
        }
    }
}

impl PageFetcher for GraphqlClient {
    async fn fetch_page(&mut self, cursor: Option<&str>) -> SnapshotResult<ObjectsPage> {
        tracing::debug!("requesting coin objects after {:?}", cursor);
        self.post(
            COIN_OBJECTS_QUERY,
            json!({
                "type": self.object_type(),
                "first": self.page_size,
                "after": cursor,
            }),
        )
        .await
    }
}

impl MetadataFetcher for GraphqlClient {
    async fn fetch_decimals(&mut self) -> SnapshotResult<Option<u32>> {
        let data: CoinMetadataData = self
            .post(
                COIN_METADATA_QUERY,
                json!({ "coinType": self.coin_type }),
            )
            .await?;
        Ok(decimals_from_metadata(data))
    }
}

fn decimals_from_metadata(data: CoinMetadataData) -> Option<u32> {
    data.coin_metadata
        .and_then(|metadata| metadata.decimals)
        .and_then(|decimals| decimals.as_u64())
        .and_then(|decimals| u32::try_from(decimals).ok())
}

pub fn coin_object_type(coin_type: &str) -> String {
    format!("0x2::coin::Coin<{coin_type}>")
}

fn unwrap_response<T>(body: GraphqlResponse<T>) -> SnapshotResult<T> {
    if !body.errors.is_empty() {
        let messages: Vec<_> = body.errors.into_iter().map(|err| err.message).collect();
        return Err(SnapshotError::Transport(format!(
            "graphql errors: {}",
            messages.join("; ")
        )));
    }
    body.data
        .ok_or_else(|| SnapshotError::MalformedResponse("response has no data".to_string()))
}
