use poem::http::{HeaderValue, StatusCode};
use poem::web::{Data, Json, Query};
use poem::{handler, IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;

use crate::garage::{GarageError, GarageLoader};
use crate::prelude::*;
use crate::wargaming::Realm;

pub const PARTIAL_DATA_HEADER: &str = "X-Partial-Data";

#[derive(Deserialize)]
pub struct TanksQuery {
    username: String,
    server: Realm,
}

/// Fetches the player's garage with the vehicle details.
#[handler]
#[instrument(skip_all, level = "info")]
pub async fn get_tanks(
    Query(query): Query<TanksQuery>,
    loader: Data<&Arc<GarageLoader>>,
) -> Result<Response> {
    if query.username.trim().is_empty() {
        return Ok(Json(json!({"message": "The username is required"}))
            .with_status(StatusCode::BAD_REQUEST)
            .into_response());
    }

    let response = match loader.load(query.server, &query.username).await {
        Ok(garage) => {
            let mut response = Json(garage.vehicles).into_response();
            if garage.completeness.is_partial() {
                response
                    .headers_mut()
                    .insert(PARTIAL_DATA_HEADER, HeaderValue::from_static("true"));
            }
            response
        }
        Err(
            error @ (GarageError::Upstream(wargaming::Error::AccountNotFound { .. })
            | GarageError::NoVehicles
            | GarageError::NoDetails),
        ) => {
            info!(username = query.username.as_str(), "{:#}", error);
            Json(json!({"message": error.to_string()}))
                .with_status(StatusCode::NOT_FOUND)
                .into_response()
        }
        Err(error) => {
            error!(username = query.username.as_str(), "failed to load the garage: {:#}", error);
            Json(json!({"error": error.to_string()}))
                .with_status(StatusCode::INTERNAL_SERVER_ERROR)
                .into_response()
        }
    };
    Ok(response)
}
