use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::wargaming::models::TankId;

/// Vehicle owned by an account, as returned by `account/tanks`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OwnedVehicle {
    pub tank_id: TankId,

    /// Not all the endpoints return it, the encyclopedia value wins anyway.
    #[serde(default)]
    pub is_premium: Option<bool>,

    #[serde(default)]
    pub statistics: OwnedStatistics,

    #[serde(default)]
    pub mark_of_mastery: i32,

    /// The rest of the record, passed through as is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct OwnedStatistics {
    #[serde(default)]
    pub battles: i32,

    #[serde(default)]
    pub wins: i32,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
