use std::collections::BTreeMap;

use poem::{Endpoint, Middleware, Request, Result};
use serde::Deserialize;
use serde_json::Value;

/// Tags the Sentry events with the request being handled.
pub struct SentryMiddleware;

impl<E: Endpoint> Middleware<E> for SentryMiddleware {
    type Output = SentryMiddlewareImpl<E>;

    fn transform(&self, ep: E) -> Self::Output {
        SentryMiddlewareImpl { ep }
    }
}

pub struct SentryMiddlewareImpl<E> {
    ep: E,
}

#[poem::async_trait]
impl<E: Endpoint> Endpoint for SentryMiddlewareImpl<E> {
    type Output = E::Output;

    async fn call(&self, request: Request) -> Result<Self::Output> {
        sentry::configure_scope(|scope| {
            scope.set_tag("request.path", request.uri().path());
            scope.set_context("garage", sentry::protocol::Context::Other(garage_context(&request)));
        });
        self.ep.call(request).await
    }
}

/// Only the lookup parameters, the rest of the query may be anything.
#[derive(Deserialize, Default)]
struct GarageParams {
    username: Option<String>,
    server: Option<String>,
}

fn garage_context(request: &Request) -> BTreeMap<String, Value> {
    let params = request.params::<GarageParams>().unwrap_or_default();
    let mut context = BTreeMap::new();
    if let Some(username) = params.username {
        context.insert("username".to_string(), username.into());
    }
    if let Some(server) = params.server {
        context.insert("server".to_string(), server.into());
    }
    context
}
