use std::fmt::{Display, Formatter};

use serde::Deserialize;

use crate::wargaming::Error;

/// Generic Wargaming.net API response.
#[derive(Deserialize, Debug)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response<T> {
    Ok { data: T },
    Error { error: ErrorBody },
}

impl<T> From<Response<T>> for Result<T, Error> {
    fn from(response: Response<T>) -> Self {
        match response {
            Response::Ok { data } => Ok(data),
            Response::Error { error } => Err(Error::UpstreamUnavailable(error.to_string())),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Message,

    #[serde(default)]
    pub code: Option<u16>,

    #[serde(default)]
    pub field: Option<String>,
}

impl Display for ErrorBody {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.message.to_str())?;
        if let Some(code) = self.code {
            write!(formatter, " ({})", code)?;
        }
        if let Some(field) = &self.field {
            write!(formatter, " in `{}`", field)?;
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, PartialEq, Eq, Default)]
pub enum Message {
    #[serde(rename = "NOT_ENOUGH_SEARCH_LENGTH")]
    NotEnoughSearchLength,

    #[serde(rename = "INVALID_SEARCH")]
    InvalidSearch,

    #[serde(rename = "SEARCH_NOT_SPECIFIED")]
    SearchNotSpecified,

    #[serde(rename = "ACCOUNT_ID_NOT_SPECIFIED")]
    AccountIdNotSpecified,

    #[serde(rename = "REQUEST_LIMIT_EXCEEDED")]
    RequestLimitExceeded,

    #[serde(rename = "APPLICATION_IS_BLOCKED")]
    ApplicationIsBlocked,

    #[serde(rename = "INVALID_APPLICATION_ID")]
    InvalidApplicationId,

    #[serde(rename = "INVALID_IP_ADDRESS")]
    InvalidIpAddress,

    #[serde(rename = "SOURCE_NOT_AVAILABLE")]
    SourceNotAvailable,

    #[default]
    #[serde(other)]
    Other,
}

impl Message {
    pub const fn to_str(&self) -> &'static str {
        match self {
            Self::NotEnoughSearchLength => "NOT_ENOUGH_SEARCH_LENGTH",
            Self::InvalidSearch => "INVALID_SEARCH",
            Self::SearchNotSpecified => "SEARCH_NOT_SPECIFIED",
            Self::AccountIdNotSpecified => "ACCOUNT_ID_NOT_SPECIFIED",
            Self::RequestLimitExceeded => "REQUEST_LIMIT_EXCEEDED",
            Self::ApplicationIsBlocked => "APPLICATION_IS_BLOCKED",
            Self::InvalidApplicationId => "INVALID_APPLICATION_ID",
            Self::InvalidIpAddress => "INVALID_IP_ADDRESS",
            Self::SourceNotAvailable => "SOURCE_NOT_AVAILABLE",
            Self::Other => "UNKNOWN_ERROR",
        }
    }
}
