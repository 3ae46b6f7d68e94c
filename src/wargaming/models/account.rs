use serde::Deserialize;

use crate::wargaming::models::AccountId;

/// Search accounts item.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FoundAccount {
    pub nickname: String,
    pub account_id: AccountId,
}
