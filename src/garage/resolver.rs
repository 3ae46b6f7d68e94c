use crate::prelude::*;
use crate::wargaming::{AccountId, Error, Realm, Upstream};

/// Resolves the nickname to the account ID.
///
/// An exact case-insensitive nickname match is preferred over the search order.
/// Any failure, including the failed search call, results in [`Error::AccountNotFound`].
#[instrument(level = "info", skip_all, fields(realm = realm.to_str(), nickname = nickname))]
pub async fn resolve_account(
    upstream: &dyn Upstream,
    realm: Realm,
    nickname: &str,
) -> StdResult<AccountId, Error> {
    let nickname = nickname.trim();
    if nickname.is_empty() {
        return Err(Error::account_not_found(nickname));
    }

    let accounts = upstream
        .search_accounts(realm, nickname)
        .await
        .map_err(|error| {
            warn!("search has failed: {:#}", error);
            Error::AccountNotFound {
                nickname: nickname.to_string(),
                source: Some(Box::new(error)),
            }
        })?;
    let account = accounts
        .iter()
        .find(|account| account.nickname.eq_ignore_ascii_case(nickname))
        .or_else(|| accounts.first())
        .ok_or_else(|| Error::account_not_found(nickname))?;

    info!(account.account_id, %account.nickname, n_found = accounts.len(), "resolved");
    Ok(account.account_id)
}
