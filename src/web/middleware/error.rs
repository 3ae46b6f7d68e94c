use poem::error::{MethodNotAllowedError, NotFoundError, ParseQueryError};
use poem::http::StatusCode;
use poem::web::Json;
use poem::{Endpoint, IntoResponse, Middleware, Request, Response, Result};
use serde_json::json;

use crate::prelude::*;

/// Renders the errors which escaped the handlers as JSON.
pub struct ErrorMiddleware;

impl<E: Endpoint<Output = Response>> Middleware<E> for ErrorMiddleware {
    type Output = ErrorMiddlewareImpl<E>;

    fn transform(&self, ep: E) -> Self::Output {
        ErrorMiddlewareImpl { ep }
    }
}

pub struct ErrorMiddlewareImpl<E> {
    ep: E,
}

#[poem::async_trait]
impl<E: Endpoint<Output = Response>> Endpoint for ErrorMiddlewareImpl<E> {
    type Output = Response;

    async fn call(&self, request: Request) -> Result<Self::Output> {
        let method = request.method().clone();
        let uri = request.uri().clone();
        let response = match self.ep.call(request).await {
            Ok(response) => response,
            Err(error) if error.is::<NotFoundError>() => {
                info!(?method, ?uri, "{:#}", error);
                Json(json!({"message": "Not found"}))
                    .with_status(StatusCode::NOT_FOUND)
                    .into_response()
            }
            Err(error) if error.is::<MethodNotAllowedError>() => {
                info!(?method, ?uri, "{:#}", error);
                StatusCode::METHOD_NOT_ALLOWED.into_response()
            }
            Err(error) if error.is::<ParseQueryError>() => {
                info!(?method, ?uri, "{:#}", error);
                Json(json!({"message": error.to_string()}))
                    .with_status(StatusCode::BAD_REQUEST)
                    .into_response()
            }
            Err(error) => {
                error!(?method, ?uri, "{:#}", error);
                Json(json!({"error": error.to_string()}))
                    .with_status(StatusCode::INTERNAL_SERVER_ERROR)
                    .into_response()
            }
        };
        Ok(response)
    }
}
