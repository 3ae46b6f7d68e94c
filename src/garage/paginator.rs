use futures::{stream, Stream};

use crate::garage::{collect, parse_well_formed, Collected, Deadline};
use crate::prelude::*;
use crate::wargaming::{AccountId, Error, OwnedVehicle, Realm, Upstream};

#[derive(Copy, Clone, Debug)]
pub struct PaginationOptions {
    pub page_size: usize,
    pub first_page: u32,

    /// Hard stop for an upstream which ignores the page number.
    pub max_pages: u32,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            page_size: 50,
            first_page: 0,
            max_pages: 100,
        }
    }
}

/// Lazily fetches the owned vehicles page by page.
///
/// The stream ends after a page which is empty or has a number of well-formed records
/// other than the page size, after `max_pages` pages, and right after the first error.
pub fn owned_vehicle_pages(
    upstream: &dyn Upstream,
    realm: Realm,
    account_id: AccountId,
    options: PaginationOptions,
) -> impl Stream<Item = StdResult<Vec<OwnedVehicle>, Error>> + Send + '_ {
    let end_page = options.first_page.saturating_add(options.max_pages);
    stream::unfold(Some(options.first_page), move |page_no| async move {
        let page_no = page_no?;
        if page_no >= end_page {
            warn!(account_id, page_no, options.max_pages, "too many pages, stopping");
            return None;
        }

        let records = match upstream
            .get_owned_vehicles_page(realm, account_id, options.page_size, page_no)
            .await
        {
            Ok(records) => records,
            Err(error) => return Some((Err(error), None)),
        };
        let n_records = records.len();
        let page: Vec<OwnedVehicle> = parse_well_formed(records);
        debug!(account_id, page_no, n_records, n_valid = page.len(), "fetched the page");
        if page.is_empty() {
            return None;
        }

        let next_page_no = (page.len() == options.page_size).then_some(page_no + 1);
        Some((Ok(page), next_page_no))
    })
}

/// Concatenates the pages, an error truncates the result instead of discarding it.
#[instrument(level = "info", skip_all)]
pub async fn collect_owned_vehicles(
    pages: impl Stream<Item = StdResult<Vec<OwnedVehicle>, Error>>,
    deadline: Option<Deadline>,
) -> Collected<OwnedVehicle> {
    let collected = collect(pages, deadline).await;
    info!(n_vehicles = collected.items.len(), ?collected.completeness, "collected");
    collected
}
