use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Game server, the API host depends on it.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Realm {
    #[default]
    #[serde(rename = "na")]
    NorthAmerica,

    #[serde(rename = "eu")]
    Europe,

    #[serde(rename = "ru")]
    Russia,

    #[serde(rename = "asia")]
    Asia,
}

impl Realm {
    pub const fn to_str(self) -> &'static str {
        match self {
            Self::NorthAmerica => "na",
            Self::Europe => "eu",
            Self::Russia => "ru",
            Self::Asia => "asia",
        }
    }

    pub const fn api_host(self) -> &'static str {
        match self {
            Self::NorthAmerica => "api.worldoftanks.com",
            Self::Europe => "api.worldoftanks.eu",
            Self::Russia => "api.worldoftanks.ru",
            Self::Asia => "api.worldoftanks.asia",
        }
    }
}

impl FromStr for Realm {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "na" => Ok(Self::NorthAmerica),
            "eu" => Ok(Self::Europe),
            "ru" => Ok(Self::Russia),
            "asia" => Ok(Self::Asia),
            _ => Err(anyhow!("`{}` is not a known server", value)),
        }
    }
}

impl Display for Realm {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.to_str())
    }
}
