use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::wargaming::{
    Nation, OwnedStatistics, OwnedVehicle, TankId, TankType, VehicleDetail, VehicleImages,
};

/// Owned vehicle merged with its encyclopedia details.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct JoinedVehicle {
    pub tank_id: TankId,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,

    pub nation: Nation,
    pub tier: i32,

    #[serde(rename = "type")]
    pub type_: TankType,

    pub is_premium: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<VehicleImages>,

    #[serde(default)]
    pub statistics: OwnedStatistics,

    #[serde(default)]
    pub mark_of_mastery: i32,

    /// Other owned record fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Keys the typed fields serialize to, they shadow the passed-through ones.
const KNOWN_KEYS: [&str; 10] = [
    "tank_id",
    "name",
    "short_name",
    "nation",
    "tier",
    "type",
    "is_premium",
    "images",
    "statistics",
    "mark_of_mastery",
];

impl JoinedVehicle {
    /// Merges the two halves, the detail side wins on the shared fields.
    pub fn new(owned: OwnedVehicle, detail: VehicleDetail) -> Self {
        debug_assert_eq!(owned.tank_id, detail.tank_id);
        let mut extra = owned.extra;
        extra.retain(|key, _| !KNOWN_KEYS.contains(&key.as_str()));
        Self {
            tank_id: detail.tank_id,
            name: detail.name,
            short_name: detail.short_name,
            nation: detail.nation,
            tier: detail.tier,
            type_: detail.type_,
            is_premium: detail.is_premium.or(owned.is_premium).unwrap_or_default(),
            images: detail.images,
            statistics: owned.statistics,
            mark_of_mastery: owned.mark_of_mastery,
            extra,
        }
    }
}

impl Display for JoinedVehicle {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{} (tier {} {} {}{}, {} battles) #{}",
            self.name,
            self.tier,
            self.nation,
            self.type_,
            if self.is_premium { ", premium" } else { "" },
            self.statistics.battles,
            self.tank_id,
        )
    }
}
