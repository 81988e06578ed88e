//! Tests for the WMS client against a local stand-in map server.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Extension, Query};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use image::{Rgba, RgbaImage};

use radar_proxy::compositor::encode_png;
use radar_proxy::upstream::{MapSource, WmsClient};
use tile_common::{tile_to_bbox, AreaConfig, ProxyError};

type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

const CAPABILITIES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<WMS_Capabilities version="1.3.0" xmlns="http://www.opengis.net/wms">
  <Capability>
    <Layer>
      <Layer queryable="1">
        <Name>conus_bref_qcd</Name>
        <Dimension name="time" units="ISO8601">2025-06-01T12:00:00Z,2025-06-01T12:02:00Z</Dimension>
      </Layer>
    </Layer>
  </Capability>
</WMS_Capabilities>"#;

async fn ok_handler(
    Extension(seen): Extension<Seen>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let request = params.get("REQUEST").cloned().unwrap_or_default();
    seen.lock().unwrap().push(params);

    if request == "GetCapabilities" {
        return ([(header::CONTENT_TYPE, "text/xml")], CAPABILITIES).into_response();
    }
    let tile = RgbaImage::from_pixel(256, 256, Rgba([0, 200, 0, 255]));
    let png = encode_png(&tile).unwrap();
    ([(header::CONTENT_TYPE, "image/png")], png).into_response()
}

async fn error_handler() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
}

async fn exception_handler() -> Response {
    (
        [(header::CONTENT_TYPE, "application/vnd.ogc.se_xml")],
        "<ServiceExceptionReport><ServiceException>Could not find layer</ServiceException></ServiceExceptionReport>",
    )
        .into_response()
}

async fn slow_handler() -> Response {
    tokio::time::sleep(Duration::from_secs(5)).await;
    (StatusCode::OK, "late").into_response()
}

/// Start the stand-in server and return its address and the recorded queries.
async fn spawn_server() -> (SocketAddr, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/ok/ows", get(ok_handler))
        .route("/error/ows", get(error_handler))
        .route("/exception/ows", get(exception_handler))
        .route("/slow/ows", get(slow_handler))
        .layer(Extension(seen.clone()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, seen)
}

fn layer(addr: SocketAddr, path: &str) -> AreaConfig {
    AreaConfig {
        base_url: Box::leak(format!("http://{}/{}/ows", addr, path).into_boxed_str()),
        layer_name: "conus_bref_qcd",
    }
}

fn client() -> WmsClient {
    WmsClient::new(Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn test_fetch_tile_sends_getmap_parameters() {
    let (addr, seen) = spawn_server().await;
    let bbox = tile_to_bbox(79, 98, 8);

    let tile = client()
        .fetch_tile(&layer(addr, "ok"), &bbox, Some("2025-06-01T12:02:00Z"))
        .await
        .unwrap();
    assert_eq!(tile.dimensions(), (256, 256));
    assert_eq!(tile.get_pixel(0, 0), &Rgba([0, 200, 0, 255]));

    let seen = seen.lock().unwrap();
    let params = &seen[0];
    assert_eq!(params["SERVICE"], "WMS");
    assert_eq!(params["VERSION"], "1.3.0");
    assert_eq!(params["REQUEST"], "GetMap");
    assert_eq!(params["FORMAT"], "image/png");
    assert_eq!(params["TRANSPARENT"], "true");
    assert_eq!(params["LAYERS"], "conus_bref_qcd");
    assert_eq!(params["STYLES"], "");
    assert_eq!(params["WIDTH"], "256");
    assert_eq!(params["HEIGHT"], "256");
    assert_eq!(params["CRS"], "EPSG:3857");
    assert_eq!(params["BBOX"], bbox.to_wms_string());
    assert_eq!(params["TIME"], "2025-06-01T12:02:00Z");
}

#[tokio::test]
async fn test_fetch_tile_without_time() {
    let (addr, seen) = spawn_server().await;

    client()
        .fetch_tile(&layer(addr, "ok"), &tile_to_bbox(0, 0, 0), None)
        .await
        .unwrap();

    assert!(!seen.lock().unwrap()[0].contains_key("TIME"));
}

#[tokio::test]
async fn test_fetch_tile_status_error() {
    let (addr, _) = spawn_server().await;

    let err = client()
        .fetch_tile(&layer(addr, "error"), &tile_to_bbox(0, 0, 0), None)
        .await
        .unwrap_err();

    match err {
        ProxyError::UpstreamStatus { code, body } => {
            assert_eq!(code, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_tile_undecodable_body() {
    let (addr, _) = spawn_server().await;

    let err = client()
        .fetch_tile(&layer(addr, "exception"), &tile_to_bbox(0, 0, 0), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ProxyError::Decode(_)));
}

#[tokio::test]
async fn test_fetch_tile_times_out() {
    let (addr, _) = spawn_server().await;
    let client = WmsClient::new(Duration::from_millis(200)).unwrap();

    let err = client
        .fetch_tile(&layer(addr, "slow"), &tile_to_bbox(0, 0, 0), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ProxyError::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn test_connection_refused_is_unavailable() {
    // Bind and drop to get a port with nothing listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client()
        .fetch_capabilities(&layer(addr, "ok"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProxyError::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn test_fetch_capabilities() {
    let (addr, seen) = spawn_server().await;

    let times = client()
        .fetch_capabilities(&layer(addr, "ok"))
        .await
        .unwrap();
    assert_eq!(times, vec!["2025-06-01T12:00:00Z", "2025-06-01T12:02:00Z"]);

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0]["REQUEST"], "GetCapabilities");
    assert_eq!(seen[0]["VERSION"], "1.3.0");
}

#[tokio::test]
async fn test_capabilities_without_dimension() {
    let (addr, _) = spawn_server().await;

    // The exception document parses as XML but has no time dimension.
    let err = client()
        .fetch_capabilities(&layer(addr, "exception"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProxyError::CapabilitiesParse(_)));
}
