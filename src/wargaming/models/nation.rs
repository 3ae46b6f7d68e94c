use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

#[derive(Serialize, Deserialize, Clone, Debug, Copy, Ord, Eq, PartialEq, PartialOrd, Hash)]
pub enum Nation {
    #[serde(rename = "usa")]
    Usa,

    #[serde(rename = "ussr")]
    Ussr,

    #[serde(rename = "germany")]
    Germany,

    #[serde(rename = "uk")]
    Uk,

    #[serde(rename = "china")]
    China,

    #[serde(rename = "japan")]
    Japan,

    #[serde(rename = "france")]
    France,

    #[serde(rename = "sweden")]
    Sweden,

    #[serde(rename = "czech", alias = "czechoslovakia")]
    Czech,

    #[serde(rename = "poland")]
    Poland,

    #[serde(rename = "italy")]
    Italy,

    #[serde(other, rename = "other")]
    Other,
}

impl Nation {
    pub const fn to_str(self) -> &'static str {
        match self {
            Self::Usa => "usa",
            Self::Ussr => "ussr",
            Self::Germany => "germany",
            Self::Uk => "uk",
            Self::China => "china",
            Self::Japan => "japan",
            Self::France => "france",
            Self::Sweden => "sweden",
            Self::Czech => "czech",
            Self::Poland => "poland",
            Self::Italy => "italy",
            Self::Other => "other",
        }
    }
}

impl FromStr for Nation {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "usa" => Ok(Self::Usa),
            "ussr" => Ok(Self::Ussr),
            "germany" => Ok(Self::Germany),
            "uk" => Ok(Self::Uk),
            "china" => Ok(Self::China),
            "japan" => Ok(Self::Japan),
            "france" => Ok(Self::France),
            "sweden" => Ok(Self::Sweden),
            "czech" | "czechoslovakia" => Ok(Self::Czech),
            "poland" => Ok(Self::Poland),
            "italy" => Ok(Self::Italy),
            _ => Err(anyhow!("`{}` is not a known nation", value)),
        }
    }
}

impl Display for Nation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.to_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_czech_alias_ok() -> Result {
        assert_eq!(serde_json::from_str::<Nation>(r#""czech""#)?, Nation::Czech);
        assert_eq!(serde_json::from_str::<Nation>(r#""czechoslovakia""#)?, Nation::Czech);
        Ok(())
    }

    #[test]
    fn deserialize_unknown_ok() -> Result {
        assert_eq!(serde_json::from_str::<Nation>(r#""merc""#)?, Nation::Other);
        Ok(())
    }
}
