use axum::{
    extract::Extension,
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use prometheus::Registry;
use tracing::error;

#[utoipa::path(
    get,
    path= "/metrics",
    responses (
        (status = 200, description = "Prometheus text exposition", body = String, content_type = "text/plain"),
        (status = 500, description = "Metrics could not be encoded", body = String),
    ),
    tag= "metrics"
)]
pub async fn metrics(Extension(registry): Extension<Registry>) -> Response {
    match crate::metrics::render(&registry) {
        Ok(body) => (
            StatusCode::OK,
            [(CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            body,
        )
            .into_response(),
        Err(err) => {
            error!("Failed to encode metrics: {err:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to encode metrics".to_string(),
            )
                .into_response()
        }
    }
}
