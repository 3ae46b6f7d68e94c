use futures::{stream, Stream, StreamExt};
use tokio::time::sleep;

use crate::garage::{collect, parse_well_formed, Collected, Deadline};
use crate::helpers::backoff::Backoff;
use crate::prelude::*;
use crate::wargaming::{Error, Realm, TankId, Upstream, VehicleDetail};

const INITIAL_RETRY_DELAY_MILLIS: u64 = 500;
const MAX_RETRY_DELAY_MILLIS: u64 = 8000;

#[derive(Copy, Clone, Debug)]
pub struct BatchOptions {
    pub batch_size: usize,

    /// Pause between the consecutive batches.
    pub delay: StdDuration,

    /// Number of retries of a failed batch before it gets skipped.
    pub n_retries: u32,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: 50,
            delay: StdDuration::from_secs(1),
            n_retries: 0,
        }
    }
}

/// Lazily fetches the vehicle details batch by batch.
///
/// Every batch yields its own result, a failed batch does not end the stream.
pub fn vehicle_detail_batches<'a>(
    upstream: &'a dyn Upstream,
    realm: Realm,
    tank_ids: &'a [TankId],
    options: BatchOptions,
) -> impl Stream<Item = StdResult<Vec<VehicleDetail>, Error>> + Send + 'a {
    stream::iter(tank_ids.chunks(options.batch_size.max(1)).enumerate()).then(
        move |(batch_index, batch)| async move {
            if batch_index != 0 && !options.delay.is_zero() {
                sleep(options.delay).await;
            }
            let details = fetch_batch(upstream, realm, batch, options.n_retries).await?;
            debug!(batch_index, n_requested = batch.len(), n_details = details.len(), "fetched the batch");
            Ok(details)
        },
    )
}

async fn fetch_batch(
    upstream: &dyn Upstream,
    realm: Realm,
    batch: &[TankId],
    n_retries: u32,
) -> StdResult<Vec<VehicleDetail>, Error> {
    let mut backoff = Backoff::new(INITIAL_RETRY_DELAY_MILLIS, MAX_RETRY_DELAY_MILLIS);
    loop {
        match upstream.get_vehicle_details(realm, batch).await {
            Ok(records) => break Ok(parse_well_formed(records)),
            Err(error) if backoff.n_attempts() <= n_retries => {
                let delay = backoff.next();
                warn!(n_attempts = backoff.n_attempts(), ?delay, "retrying the batch: {:#}", error);
                sleep(delay).await;
            }
            Err(error) => break Err(error),
        }
    }
}

/// Unions the successful batches, the failed ones are skipped.
#[instrument(level = "info", skip_all)]
pub async fn collect_vehicle_details(
    batches: impl Stream<Item = StdResult<Vec<VehicleDetail>, Error>>,
    deadline: Option<Deadline>,
) -> Collected<VehicleDetail> {
    let collected = collect(batches, deadline).await;
    info!(n_details = collected.items.len(), ?collected.completeness, "collected");
    collected
}
