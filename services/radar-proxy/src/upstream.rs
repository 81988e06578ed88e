//! Upstream WMS access.
//!
//! `MapSource` is the seam between request handling and the remote map
//! service; `WmsClient` is the real implementation over a shared
//! `reqwest::Client`. No request is retried.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use image::RgbaImage;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, instrument};

use tile_common::{AreaConfig, BoundingBox, ProxyError, ProxyResult};
use wms_protocol::{capabilities_query, parse_time_dimension, GetMapRequest};

use crate::metrics::{record_upstream, UpstreamOp};

/// Longest upstream error body kept in an error message.
const MAX_ERROR_BODY: usize = 512;

/// A remote map service that renders tiles and lists available frames.
#[async_trait]
pub trait MapSource: Send + Sync {
    /// Fetch a 256x256 tile of `layer` covering `bbox`.
    async fn fetch_tile(
        &self,
        layer: &AreaConfig,
        bbox: &BoundingBox,
        time: Option<&str>,
    ) -> ProxyResult<RgbaImage>;

    /// List the frame timestamps the service advertises for `layer`, oldest first.
    async fn fetch_capabilities(&self, layer: &AreaConfig) -> ProxyResult<Vec<String>>;
}

/// WMS 1.3.0 client.
pub struct WmsClient {
    client: Client,
}

impl WmsClient {
    /// Create a client whose requests are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Reject non-200 responses, keeping a prefix of the body for diagnostics.
    async fn check_status(response: Response) -> ProxyResult<Response> {
        let status = response.status();
        if status == StatusCode::OK {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ProxyError::UpstreamStatus {
            code: status.as_u16(),
            body: truncate_body(body),
        })
    }
}

#[async_trait]
impl MapSource for WmsClient {
    #[instrument(skip(self, layer, bbox), fields(layer = %layer.layer_name))]
    async fn fetch_tile(
        &self,
        layer: &AreaConfig,
        bbox: &BoundingBox,
        time: Option<&str>,
    ) -> ProxyResult<RgbaImage> {
        let request = GetMapRequest::tile(layer.layer_name, *bbox, time);
        let started = Instant::now();

        let result = async {
            let response = self
                .client
                .get(layer.base_url)
                .query(&request.query_pairs())
                .send()
                .await
                .map_err(|e| ProxyError::UpstreamUnavailable(e.to_string()))?;
            let response = Self::check_status(response).await?;
            let body = response
                .bytes()
                .await
                .map_err(|e| ProxyError::UpstreamUnavailable(e.to_string()))?;
            decode_tile(&body)
        }
        .await;

        record_upstream(UpstreamOp::GetMap, outcome_label(&result), started.elapsed());
        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "GetMap finished"
        );
        result
    }

    #[instrument(skip(self, layer), fields(layer = %layer.layer_name))]
    async fn fetch_capabilities(&self, layer: &AreaConfig) -> ProxyResult<Vec<String>> {
        let started = Instant::now();

        let result = async {
            let response = self
                .client
                .get(layer.base_url)
                .query(&capabilities_query()[..])
                .send()
                .await
                .map_err(|e| ProxyError::UpstreamUnavailable(e.to_string()))?;
            let response = Self::check_status(response).await?;
            let xml = response
                .text()
                .await
                .map_err(|e| ProxyError::UpstreamUnavailable(e.to_string()))?;
            parse_time_dimension(&xml).map_err(|e| ProxyError::CapabilitiesParse(e.to_string()))
        }
        .await;

        record_upstream(
            UpstreamOp::GetCapabilities,
            outcome_label(&result),
            started.elapsed(),
        );
        result
    }
}

/// Decode an upstream image body into RGBA8.
pub fn decode_tile(body: &[u8]) -> ProxyResult<RgbaImage> {
    image::load_from_memory(body)
        .map(|img| img.to_rgba8())
        .map_err(|e| ProxyError::Decode(e.to_string()))
}

fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    body.trim().to_string()
}

fn outcome_label<T>(result: &ProxyResult<T>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(ProxyError::UpstreamUnavailable(_)) => "unavailable",
        Err(ProxyError::UpstreamStatus { .. }) => "status",
        Err(_) => "invalid",
    }
}
