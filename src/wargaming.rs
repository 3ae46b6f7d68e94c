use std::collections::HashMap;
use std::num::NonZeroU32;

use async_trait::async_trait;
use clap::{crate_name, crate_version};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use itertools::Itertools;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use self::error::*;
pub use self::models::*;
use self::response::Response;
use crate::prelude::*;

pub mod error;
pub mod models;
pub mod response;

/// Encyclopedia fields which end up in the joined vehicles.
const VEHICLE_FIELDS: &str = "tank_id,name,short_name,nation,tier,type,is_premium,images";

/// The three upstream calls the garage pipeline is built upon.
///
/// Owned vehicles and vehicle details are returned as raw JSON records,
/// the pipeline decides which of them are well-formed.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// See <https://developers.wargaming.net/reference/all/wot/account/list/>.
    async fn search_accounts(
        &self,
        realm: Realm,
        nickname: &str,
    ) -> StdResult<Vec<FoundAccount>, Error>;

    /// See <https://developers.wargaming.net/reference/all/wot/account/tanks/>.
    async fn get_owned_vehicles_page(
        &self,
        realm: Realm,
        account_id: AccountId,
        limit: usize,
        page_no: u32,
    ) -> StdResult<Vec<Value>, Error>;

    /// See <https://developers.wargaming.net/reference/all/wot/encyclopedia/vehicles/>.
    async fn get_vehicle_details(
        &self,
        realm: Realm,
        tank_ids: &[TankId],
    ) -> StdResult<Vec<Value>, Error>;
}

#[derive(Clone)]
pub struct WargamingApi {
    application_id: Arc<String>,
    client: reqwest::Client,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,

    /// Overrides the realm API host, the endpoint paths are joined to it.
    base_url: Option<Url>,
}

impl WargamingApi {
    pub fn new(
        application_id: &str,
        timeout: StdDuration,
        requests_per_second: NonZeroU32,
    ) -> Result<WargamingApi> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(concat!(crate_name!(), "/", crate_version!()))
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .context("failed to build the API client")?;
        Ok(Self {
            application_id: Arc::new(application_id.to_string()),
            client,
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(requests_per_second))),
            base_url: None,
        })
    }

    /// Sends all the requests to the base URL regardless of the realm.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    #[instrument(level = "debug", skip_all, fields(realm = realm.to_str(), path = path))]
    async fn call<T: DeserializeOwned>(
        &self,
        realm: Realm,
        path: &str,
        params: &[(&str, &str)],
    ) -> StdResult<T, Error> {
        let mut url = match &self.base_url {
            Some(base_url) => base_url.join(path),
            None => Url::parse(&format!("https://{}/wot/{}", realm.api_host(), path)),
        }
        .map_err(|error| Error::UpstreamUnavailable(error.to_string()))?;
        url.query_pairs_mut()
            .append_pair("application_id", &self.application_id)
            .extend_pairs(params);

        self.limiter.until_ready().await;
        let start_instant = Instant::now();
        debug!(?params, "sending…");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!(%status, elapsed = %format_elapsed(start_instant), "received");
        if !status.is_success() {
            return Err(Error::UpstreamUnavailable(format!("status {}", status)));
        }
        response.json::<Response<T>>().await?.into()
    }
}

#[async_trait]
impl Upstream for WargamingApi {
    async fn search_accounts(
        &self,
        realm: Realm,
        nickname: &str,
    ) -> StdResult<Vec<FoundAccount>, Error> {
        self.call(realm, "account/list/", &[("search", nickname), ("limit", "100")])
            .await
    }

    async fn get_owned_vehicles_page(
        &self,
        realm: Realm,
        account_id: AccountId,
        limit: usize,
        page_no: u32,
    ) -> StdResult<Vec<Value>, Error> {
        let account_id = account_id.to_string();
        let limit = limit.to_string();
        let page_no = page_no.to_string();
        let mut data = self
            .call::<HashMap<String, Option<Vec<Value>>>>(
                realm,
                "account/tanks/",
                &[
                    ("account_id", account_id.as_str()),
                    ("limit", limit.as_str()),
                    ("page_no", page_no.as_str()),
                ],
            )
            .await?;
        Ok(data.remove(&account_id).flatten().unwrap_or_default())
    }

    async fn get_vehicle_details(
        &self,
        realm: Realm,
        tank_ids: &[TankId],
    ) -> StdResult<Vec<Value>, Error> {
        let tank_id = tank_ids.iter().join(",");
        let data = self
            .call::<HashMap<String, Value>>(
                realm,
                "encyclopedia/vehicles/",
                &[("tank_id", tank_id.as_str()), ("fields", VEHICLE_FIELDS)],
            )
            .await?;
        Ok(data.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use poem::endpoint::{make, make_sync};
    use poem::http::StatusCode;
    use poem::listener::{Acceptor, Listener, TcpListener};
    use poem::{Endpoint, IntoResponse, Request, Server};

    use super::*;

    /// Serves the endpoint on a random local port and points the API there.
    async fn serve(endpoint: impl Endpoint + 'static, timeout: StdDuration) -> Result<WargamingApi> {
        let acceptor = TcpListener::bind("127.0.0.1:0").into_acceptor().await?;
        let addr = acceptor
            .local_addr()
            .first()
            .and_then(|addr| addr.as_socket_addr().copied())
            .ok_or_else(|| anyhow!("the listener has no local address"))?;
        tokio::spawn(Server::new_with_acceptor(acceptor).run(endpoint));
        let api = WargamingApi::new("test", timeout, NonZeroU32::new(100).unwrap())?
            .with_base_url(Url::parse(&format!("http://{}/wot/", addr))?);
        Ok(api)
    }

    fn query(request: &Request) -> HashMap<String, String> {
        request.params().unwrap_or_default()
    }

    #[tokio::test]
    async fn search_accounts_ok() -> Result {
        let api = serve(
            make_sync(|request| {
                let query = query(&request);
                assert_eq!(request.uri().path(), "/wot/account/list/");
                assert_eq!(query["application_id"], "test");
                assert_eq!(query["search"], "Sleepy Tanker");
                assert_eq!(query["limit"], "100");
                // language=JSON
                r#"{"status":"ok","meta":{"count":1},"data":[{"nickname":"Sleepy_Tanker","account_id":42}]}"#
            }),
            StdDuration::from_secs(5),
        )
        .await?;
        let accounts = api.search_accounts(Realm::Europe, "Sleepy Tanker").await?;
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].nickname, "Sleepy_Tanker");
        assert_eq!(accounts[0].account_id, 42);
        Ok(())
    }

    #[tokio::test]
    async fn get_owned_vehicles_page_ok() -> Result {
        let api = serve(
            make_sync(|request| {
                let query = query(&request);
                assert_eq!(request.uri().path(), "/wot/account/tanks/");
                assert_eq!(query["limit"], "50");
                assert_eq!(query["page_no"], "2");
                match query["account_id"].as_str() {
                    // language=JSON
                    "42" => r#"{"status":"ok","data":{"42":[{"tank_id":1},{"tank_id":17}]}}"#,
                    // language=JSON
                    "43" => r#"{"status":"ok","data":{"43":null}}"#,
                    // language=JSON
                    _ => r#"{"status":"ok","data":{}}"#,
                }
            }),
            StdDuration::from_secs(5),
        )
        .await?;
        let vehicles = api.get_owned_vehicles_page(Realm::Europe, 42, 50, 2).await?;
        assert_eq!(vehicles.len(), 2);
        assert_eq!(vehicles[1]["tank_id"], 17);
        assert!(api.get_owned_vehicles_page(Realm::Europe, 43, 50, 2).await?.is_empty());
        assert!(api.get_owned_vehicles_page(Realm::Europe, 44, 50, 2).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn get_vehicle_details_ok() -> Result {
        let api = serve(
            make_sync(|request| {
                let query = query(&request);
                assert_eq!(request.uri().path(), "/wot/encyclopedia/vehicles/");
                assert_eq!(query["tank_id"], "1,17");
                assert_eq!(query["fields"], VEHICLE_FIELDS);
                // language=JSON
                r#"{"status":"ok","data":{"1":{"tank_id":1,"name":"MS-1"},"17":null}}"#
            }),
            StdDuration::from_secs(5),
        )
        .await?;
        let details = api.get_vehicle_details(Realm::Europe, &[1, 17]).await?;
        assert_eq!(details.len(), 2);
        assert_eq!(details.iter().filter(|details| details.is_null()).count(), 1);
        assert!(details.iter().any(|details| details["name"] == "MS-1"));
        Ok(())
    }

    #[tokio::test]
    async fn status_error_fails() -> Result {
        let api = serve(
            make_sync(|_| {
                // language=JSON
                r#"{"status":"error","error":{"message":"INVALID_APPLICATION_ID","code":407}}"#
            }),
            StdDuration::from_secs(5),
        )
        .await?;
        let result = api.search_accounts(Realm::Europe, "Tanker").await;
        assert!(
            matches!(result, Err(Error::UpstreamUnavailable(message)) if message.starts_with("INVALID_APPLICATION_ID"))
        );
        Ok(())
    }

    #[tokio::test]
    async fn non_success_status_fails() -> Result {
        let api = serve(
            make_sync(|_| StatusCode::SERVICE_UNAVAILABLE.into_response()),
            StdDuration::from_secs(5),
        )
        .await?;
        let result = api.get_vehicle_details(Realm::Europe, &[1]).await;
        assert!(matches!(result, Err(Error::UpstreamUnavailable(message)) if message.contains("503")));
        Ok(())
    }

    #[tokio::test]
    async fn malformed_body_fails() -> Result {
        let api = serve(make_sync(|_| "<html>Maintenance</html>"), StdDuration::from_secs(5)).await?;
        let result = api.get_owned_vehicles_page(Realm::Europe, 42, 50, 1).await;
        assert!(matches!(result, Err(Error::UpstreamUnavailable(_))));
        Ok(())
    }

    #[tokio::test]
    async fn timeout_fails() -> Result {
        let api = serve(
            make(|_| async {
                tokio::time::sleep(StdDuration::from_secs(10)).await;
                // language=JSON
                r#"{"status":"ok","data":[]}"#
            }),
            StdDuration::from_millis(200),
        )
        .await?;
        let start_instant = Instant::now();
        let result = api.search_accounts(Realm::Europe, "Tanker").await;
        assert!(matches!(result, Err(Error::Timeout)));
        assert!(start_instant.elapsed() < StdDuration::from_secs(5));
        Ok(())
    }
}
