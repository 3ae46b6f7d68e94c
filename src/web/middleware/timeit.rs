use poem::{Endpoint, Middleware, Request, Response, Result};

use crate::prelude::*;

pub struct TimeItMiddleware;

impl<E: Endpoint<Output = Response>> Middleware<E> for TimeItMiddleware {
    type Output = TimeItMiddlewareImpl<E>;

    fn transform(&self, ep: E) -> Self::Output {
        TimeItMiddlewareImpl { ep }
    }
}

pub struct TimeItMiddlewareImpl<E> {
    ep: E,
}

#[poem::async_trait]
impl<E: Endpoint<Output = Response>> Endpoint for TimeItMiddlewareImpl<E> {
    type Output = Response;

    async fn call(&self, request: Request) -> Result<Self::Output> {
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        let start_instant = Instant::now();
        let response = self.ep.call(request).await?;
        info!(
            %method,
            path = path.as_str(),
            status = response.status().as_u16(),
            elapsed = %format_elapsed(start_instant),
            "handled"
        );
        Ok(response)
    }
}
