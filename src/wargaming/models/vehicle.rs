use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::prelude::*;
use crate::wargaming::models::{Nation, TankId};

/// Vehicle from the encyclopedia («tankopedia»).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VehicleDetail {
    pub tank_id: TankId,
    pub name: String,

    #[serde(default)]
    pub short_name: Option<String>,

    pub nation: Nation,
    pub tier: i32,

    #[serde(rename = "type")]
    pub type_: TankType,

    #[serde(default)]
    pub is_premium: Option<bool>,

    #[serde(default)]
    pub images: Option<VehicleImages>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct VehicleImages {
    #[serde(default)]
    pub small_icon: Option<String>,

    #[serde(default)]
    pub contour_icon: Option<String>,

    #[serde(default)]
    pub big_icon: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Copy, Ord, Eq, PartialEq, PartialOrd, Hash)]
pub enum TankType {
    #[serde(rename = "lightTank")]
    Light,

    #[serde(rename = "mediumTank")]
    Medium,

    #[serde(rename = "heavyTank")]
    Heavy,

    #[serde(rename = "AT-SPG")]
    AT,

    #[serde(rename = "SPG")]
    Spg,

    #[serde(other, rename = "unknown")]
    Unknown,
}

impl TankType {
    pub const fn to_str(self) -> &'static str {
        match self {
            Self::Light => "lightTank",
            Self::Medium => "mediumTank",
            Self::Heavy => "heavyTank",
            Self::AT => "AT-SPG",
            Self::Spg => "SPG",
            Self::Unknown => "unknown",
        }
    }
}

impl FromStr for TankType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "lightTank" | "light" | "lt" => Ok(Self::Light),
            "mediumTank" | "medium" | "mt" => Ok(Self::Medium),
            "heavyTank" | "heavy" | "ht" => Ok(Self::Heavy),
            "AT-SPG" | "at-spg" | "td" => Ok(Self::AT),
            "SPG" | "spg" | "arty" => Ok(Self::Spg),
            _ => Err(anyhow!("`{}` is not a known vehicle type", value)),
        }
    }
}

impl Display for TankType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.to_str())
    }
}
