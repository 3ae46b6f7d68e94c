//! HTTP API serving the garages.

use std::net::IpAddr;
use std::str::FromStr;

use poem::listener::TcpListener;
use poem::middleware::{CatchPanic, Tracing};
use poem::{get, Endpoint, EndpointExt, Response, Route, Server};

use crate::garage::GarageLoader;
use crate::opts::WebOpts;
use crate::prelude::*;
use crate::web::middleware::{
    ErrorMiddleware, SecurityHeadersMiddleware, SentryMiddleware, TimeItMiddleware,
};

mod middleware;
mod views;

pub async fn run(opts: &WebOpts) -> Result {
    let loader = Arc::new(GarageLoader::from_opts(&opts.upstream)?);
    let app = create_app(loader);
    info!(host = opts.host.as_str(), port = opts.port, "listening…");
    Server::new(TcpListener::bind((IpAddr::from_str(&opts.host)?, opts.port)))
        .run(app)
        .await?;
    Ok(())
}

pub fn create_app(loader: Arc<GarageLoader>) -> impl Endpoint<Output = Response> {
    Route::new()
        .at("/api/tanks", get(views::tanks::get_tanks))
        .at("/api/getRandomTanks", get(views::tanks::get_tanks))
        .at("/health", get(views::health::get_health))
        .data(loader)
        .with(Tracing)
        .with(CatchPanic::new())
        .with(ErrorMiddleware)
        .with(TimeItMiddleware)
        .with(SecurityHeadersMiddleware)
        .with(SentryMiddleware)
}

#[cfg(test)]
mod tests {
    use poem::http::StatusCode;
    use poem::test::{TestClient, TestResponse};
    use serde_json::Value;

    use super::*;
    use crate::garage::fixtures::FixtureUpstream;
    use crate::garage::{BatchOptions, FetchOptions};
    use crate::web::views::tanks::PARTIAL_DATA_HEADER;

    fn test_client(upstream: &Arc<FixtureUpstream>) -> TestClient<impl Endpoint> {
        let options = FetchOptions {
            batching: BatchOptions {
                delay: StdDuration::ZERO,
                ..Default::default()
            },
            ..Default::default()
        };
        let loader = GarageLoader::new(upstream.clone(), options);
        TestClient::new(create_app(Arc::new(loader)))
    }

    fn garage() -> FixtureUpstream {
        FixtureUpstream::default()
            .with_account("Tanker", 42)
            .with_owned_pages(0, &[50, 12])
            .with_details(1..=62)
    }

    async fn json(response: TestResponse) -> Result<Value> {
        response
            .0
            .into_body()
            .into_json()
            .await
            .map_err(|error| anyhow!("{:#}", error))
    }

    #[tokio::test]
    async fn get_tanks_ok() -> Result {
        let upstream = Arc::new(garage());
        let response = test_client(&upstream)
            .get("/api/tanks?username=Tanker&server=eu")
            .send()
            .await;
        response.assert_status_is_ok();
        assert!(response.0.headers().get(PARTIAL_DATA_HEADER).is_none());

        let body = json(response).await?;
        let vehicles = body.as_array().ok_or_else(|| anyhow!("expected an array"))?;
        assert_eq!(vehicles.len(), 62);
        assert_eq!(vehicles[0]["tank_id"], 1);
        assert!(vehicles[0]["name"].is_string());
        assert!(vehicles[0]["statistics"]["battles"].is_number());
        Ok(())
    }

    #[tokio::test]
    async fn get_random_tanks_alias_ok() {
        let upstream = Arc::new(garage());
        test_client(&upstream)
            .get("/api/getRandomTanks?username=tanker&server=eu")
            .send()
            .await
            .assert_status_is_ok();
    }

    #[tokio::test]
    async fn get_tanks_partial_ok() -> Result {
        let upstream = Arc::new(garage().with_failing_tank_id(55));
        let response = test_client(&upstream)
            .get("/api/tanks?username=Tanker&server=eu")
            .send()
            .await;
        response.assert_status_is_ok();
        response.assert_header(PARTIAL_DATA_HEADER, "true");
        assert_eq!(json(response).await?.as_array().map(Vec::len), Some(50));
        Ok(())
    }

    #[tokio::test]
    async fn account_not_found_ok() -> Result {
        let upstream = Arc::new(garage());
        let response = test_client(&upstream)
            .get("/api/tanks?username=Nobody&server=eu")
            .send()
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert!(json(response).await?["message"].is_string());
        assert_eq!(upstream.n_page_calls(), 0);
        assert_eq!(upstream.n_detail_calls(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn no_details_ok() -> Result {
        let upstream = Arc::new(
            FixtureUpstream::default()
                .with_account("Tanker", 42)
                .with_owned_pages(0, &[3]),
        );
        let response = test_client(&upstream)
            .get("/api/tanks?username=Tanker&server=eu")
            .send()
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(json(response).await?["message"], "No tank details found");
        Ok(())
    }

    #[tokio::test]
    async fn blank_username_fails() {
        let upstream = Arc::new(garage());
        test_client(&upstream)
            .get("/api/tanks?username=%20&server=eu")
            .send()
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(upstream.n_search_calls(), 0);
    }

    #[tokio::test]
    async fn invalid_server_fails() {
        let upstream = Arc::new(garage());
        let client = test_client(&upstream);
        client
            .get("/api/tanks?username=Tanker&server=moon")
            .send()
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        client
            .get("/api/tanks?username=Tanker")
            .send()
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_ok() {
        let upstream = Arc::new(garage());
        test_client(&upstream)
            .get("/health")
            .send()
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn unknown_path_ok() {
        let upstream = Arc::new(garage());
        test_client(&upstream)
            .get("/api/unknown")
            .send()
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
