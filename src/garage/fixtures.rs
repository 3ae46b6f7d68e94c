//! In-memory upstream for the tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::prelude::*;
use crate::wargaming::{AccountId, Error, FoundAccount, Realm, TankId, Upstream};

pub enum Page {
    Records(Vec<Value>),
    Unavailable,
    Timeout,
}

#[derive(Default)]
pub struct FixtureUpstream {
    accounts: Vec<FoundAccount>,
    is_search_failing: bool,
    pages: HashMap<u32, Page>,
    details: HashMap<TankId, Value>,
    failing_tank_ids: HashSet<TankId>,
    n_flaky_detail_calls: usize,

    n_search_calls: AtomicUsize,
    n_page_calls: AtomicUsize,
    n_detail_calls: AtomicUsize,
    requested_batches: Mutex<Vec<Vec<TankId>>>,
}

pub fn owned_record(tank_id: TankId) -> Value {
    json!({
        "statistics": {"wins": tank_id % 7, "battles": tank_id % 100},
        "mark_of_mastery": 0,
        "tank_id": tank_id,
    })
}

pub fn detail_record(
    tank_id: TankId,
    tier: i32,
    nation: &str,
    type_: &str,
    is_premium: bool,
) -> Value {
    json!({
        "tank_id": tank_id,
        "name": format!("Tank #{}", tank_id),
        "short_name": format!("T{}", tank_id),
        "nation": nation,
        "tier": tier,
        "type": type_,
        "is_premium": is_premium,
    })
}

impl FixtureUpstream {
    pub fn with_account(mut self, nickname: &str, account_id: AccountId) -> Self {
        self.accounts.push(FoundAccount {
            nickname: nickname.to_string(),
            account_id,
        });
        self
    }

    pub fn with_failing_search(mut self) -> Self {
        self.is_search_failing = true;
        self
    }

    pub fn with_page(mut self, page_no: u32, page: Page) -> Self {
        self.pages.insert(page_no, page);
        self
    }

    /// Adds the consecutive pages of the specified sizes, tank IDs are numbered from `1`.
    pub fn with_owned_pages(mut self, first_page: u32, page_sizes: &[usize]) -> Self {
        let mut tank_id = 0;
        for (page_no, page_size) in (first_page..).zip(page_sizes) {
            let records = (0..*page_size)
                .map(|_| {
                    tank_id += 1;
                    owned_record(tank_id)
                })
                .collect();
            self.pages.insert(page_no, Page::Records(records));
        }
        self
    }

    pub fn with_detail(mut self, tank_id: TankId, detail: Value) -> Self {
        self.details.insert(tank_id, detail);
        self
    }

    /// Adds generated details for the tank IDs.
    pub fn with_details(mut self, tank_ids: impl IntoIterator<Item = TankId>) -> Self {
        const NATIONS: [&str; 4] = ["ussr", "germany", "usa", "france"];
        const TYPES: [&str; 5] = ["lightTank", "mediumTank", "heavyTank", "AT-SPG", "SPG"];
        for tank_id in tank_ids {
            let index = tank_id as usize;
            let detail = detail_record(
                tank_id,
                tank_id % 10 + 1,
                NATIONS[index % NATIONS.len()],
                TYPES[index % TYPES.len()],
                tank_id % 3 == 0,
            );
            self.details.insert(tank_id, detail);
        }
        self
    }

    /// Any detail batch containing the tank ID fails.
    pub fn with_failing_tank_id(mut self, tank_id: TankId) -> Self {
        self.failing_tank_ids.insert(tank_id);
        self
    }

    /// The first `n` detail calls fail.
    pub fn with_flaky_detail_calls(mut self, n: usize) -> Self {
        self.n_flaky_detail_calls = n;
        self
    }

    pub fn n_search_calls(&self) -> usize {
        self.n_search_calls.load(Ordering::SeqCst)
    }

    pub fn n_page_calls(&self) -> usize {
        self.n_page_calls.load(Ordering::SeqCst)
    }

    pub fn n_detail_calls(&self) -> usize {
        self.n_detail_calls.load(Ordering::SeqCst)
    }

    pub fn requested_batches(&self) -> Vec<Vec<TankId>> {
        self.requested_batches.lock().map(|batches| batches.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Upstream for FixtureUpstream {
    async fn search_accounts(
        &self,
        _realm: Realm,
        nickname: &str,
    ) -> StdResult<Vec<FoundAccount>, Error> {
        self.n_search_calls.fetch_add(1, Ordering::SeqCst);
        if self.is_search_failing {
            return Err(Error::UpstreamUnavailable("status 503 Service Unavailable".into()));
        }
        let nickname = nickname.to_lowercase();
        Ok(self
            .accounts
            .iter()
            .filter(|account| account.nickname.to_lowercase().starts_with(&nickname))
            .cloned()
            .collect())
    }

    async fn get_owned_vehicles_page(
        &self,
        _realm: Realm,
        _account_id: AccountId,
        _limit: usize,
        page_no: u32,
    ) -> StdResult<Vec<Value>, Error> {
        self.n_page_calls.fetch_add(1, Ordering::SeqCst);
        match self.pages.get(&page_no) {
            Some(Page::Records(records)) => Ok(records.clone()),
            Some(Page::Unavailable) => Err(Error::UpstreamUnavailable("status 502".into())),
            Some(Page::Timeout) => Err(Error::Timeout),
            None => Ok(Vec::new()),
        }
    }

    async fn get_vehicle_details(
        &self,
        _realm: Realm,
        tank_ids: &[TankId],
    ) -> StdResult<Vec<Value>, Error> {
        let n_calls = self.n_detail_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut batches) = self.requested_batches.lock() {
            batches.push(tank_ids.to_vec());
        }
        if n_calls < self.n_flaky_detail_calls
            || tank_ids.iter().any(|tank_id| self.failing_tank_ids.contains(tank_id))
        {
            return Err(Error::UpstreamUnavailable("REQUEST_LIMIT_EXCEEDED (407)".into()));
        }
        Ok(tank_ids
            .iter()
            .map(|tank_id| self.details.get(tank_id).cloned().unwrap_or(Value::Null))
            .collect())
    }
}
