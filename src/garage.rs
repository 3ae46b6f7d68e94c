//! Account garage: fetching, joining, filtering, and picking the vehicles.

use futures::{Stream, StreamExt};
use itertools::Itertools;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::time::timeout_at;

pub use self::batcher::*;
pub use self::filter::*;
pub use self::join::*;
pub use self::paginator::*;
pub use self::resolver::*;
pub use self::vehicle::*;
use crate::opts::UpstreamOpts;
use crate::prelude::*;
use crate::wargaming::{AccountId, Realm, Upstream, WargamingApi};

pub mod batcher;
pub mod filter;
pub mod join;
pub mod paginator;
pub mod resolver;
pub mod roulette;
pub mod vehicle;

#[cfg(test)]
pub mod fixtures;

pub type Deadline = tokio::time::Instant;

/// Tells whether some pages or batches have been lost on the way.
#[derive(Serialize, Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Completeness {
    #[default]
    Complete,

    Partial,
}

impl Completeness {
    #[must_use]
    pub const fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Complete, Self::Complete) => Self::Complete,
            _ => Self::Partial,
        }
    }

    pub const fn is_partial(self) -> bool {
        matches!(self, Self::Partial)
    }
}

pub struct Collected<T> {
    pub items: Vec<T>,
    pub completeness: Completeness,
}

/// Drains the page or batch stream until it ends or the deadline passes.
///
/// Errors are logged and mark the result as partial.
async fn collect<T>(
    stream: impl Stream<Item = StdResult<Vec<T>, wargaming::Error>>,
    deadline: Option<Deadline>,
) -> Collected<T> {
    let mut stream = Box::pin(stream);
    let mut items = Vec::new();
    let mut completeness = Completeness::Complete;
    loop {
        let next = match deadline {
            Some(deadline) => match timeout_at(deadline, stream.next()).await {
                Ok(next) => next,
                Err(_) => {
                    warn!(n_items = items.len(), "the time budget is exhausted");
                    completeness = Completeness::Partial;
                    break;
                }
            },
            None => stream.next().await,
        };
        match next {
            Some(Ok(chunk)) => items.extend(chunk),
            Some(Err(error)) => {
                warn!(n_items = items.len(), "skipping: {:#}", error);
                completeness = Completeness::Partial;
            }
            None => break,
        }
    }
    Collected {
        items,
        completeness,
    }
}

/// Parses the records which are objects of the expected shape, drops the others.
fn parse_well_formed<T: DeserializeOwned>(records: Vec<Value>) -> Vec<T> {
    records
        .into_iter()
        .filter(|record| !record.is_null())
        .filter_map(|record| match serde_json::from_value(record) {
            Ok(item) => Some(item),
            Err(error) => {
                warn!("malformed record: {:#}", error);
                None
            }
        })
        .collect()
}

#[derive(Copy, Clone, Debug, Default)]
pub struct FetchOptions {
    pub pagination: PaginationOptions,
    pub batching: BatchOptions,

    /// Total time budget of a single garage load.
    pub budget: Option<StdDuration>,
}

#[derive(Debug, thiserror::Error)]
pub enum GarageError {
    #[error(transparent)]
    Upstream(#[from] wargaming::Error),

    #[error("No tanks found for this account")]
    NoVehicles,

    #[error("No tank details found")]
    NoDetails,
}

pub struct Garage {
    pub account_id: AccountId,
    pub vehicles: Vec<JoinedVehicle>,
    pub completeness: Completeness,
}

/// Resolves the account, fetches its vehicles and their details, and joins them.
pub struct GarageLoader {
    upstream: Arc<dyn Upstream>,
    options: FetchOptions,
}

impl GarageLoader {
    pub fn new(upstream: Arc<dyn Upstream>, options: FetchOptions) -> Self {
        Self { upstream, options }
    }

    pub fn from_opts(opts: &UpstreamOpts) -> Result<Self> {
        let application_id = opts
            .application_id
            .as_deref()
            .ok_or_else(|| anyhow!("the application ID is required to fetch the vehicles"))?;
        let api = WargamingApi::new(
            application_id,
            opts.fetch.request_timeout,
            opts.fetch.requests_per_second,
        )?;
        let options = FetchOptions {
            pagination: PaginationOptions {
                page_size: opts.fetch.page_size,
                first_page: opts.fetch.first_page,
                max_pages: opts.fetch.max_pages,
            },
            batching: BatchOptions {
                batch_size: opts.fetch.detail_batch_size,
                delay: opts.fetch.batch_delay,
                n_retries: opts.fetch.detail_retries,
            },
            budget: opts.fetch.budget,
        };
        Ok(Self::new(Arc::new(api), options))
    }

    #[instrument(level = "info", skip_all, fields(realm = realm.to_str(), nickname = nickname))]
    pub async fn load(&self, realm: Realm, nickname: &str) -> StdResult<Garage, GarageError> {
        let start_instant = Instant::now();
        let deadline = self.options.budget.map(|budget| Deadline::now() + budget);
        let upstream = self.upstream.as_ref();

        let account_id = resolve_account(upstream, realm, nickname).await?;

        let owned = collect_owned_vehicles(
            owned_vehicle_pages(upstream, realm, account_id, self.options.pagination),
            deadline,
        )
        .await;
        if owned.items.is_empty() {
            return Err(GarageError::NoVehicles);
        }

        let tank_ids = owned.items.iter().map(|vehicle| vehicle.tank_id).unique().collect_vec();
        let details = collect_vehicle_details(
            vehicle_detail_batches(upstream, realm, &tank_ids, self.options.batching),
            deadline,
        )
        .await;

        let vehicles = join_vehicles(owned.items, details.items);
        if vehicles.is_empty() {
            return Err(GarageError::NoDetails);
        }

        let completeness = owned.completeness.and(details.completeness);
        info!(
            account_id,
            n_vehicles = vehicles.len(),
            ?completeness,
            elapsed = %format_elapsed(start_instant),
            "loaded"
        );
        Ok(Garage {
            account_id,
            vehicles,
            completeness,
        })
    }
}
