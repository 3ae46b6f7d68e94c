use poem::http::StatusCode;
use poem::{handler, IntoResponse};

#[handler]
pub async fn get_health() -> impl IntoResponse {
    StatusCode::NO_CONTENT.with_header("Cache-Control", "no-store")
}
