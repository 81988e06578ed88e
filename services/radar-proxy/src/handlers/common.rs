//! Response helpers shared by the handlers.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use tile_common::ProxyError;

/// Plain-text error response with the status for the error's kind.
pub fn error_response(err: &ProxyError) -> Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        err.to_string(),
    )
        .into_response()
}

/// PNG tile response.
pub fn png_response(png: Vec<u8>) -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, "image/png")], png).into_response()
}
