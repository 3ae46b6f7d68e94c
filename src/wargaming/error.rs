/// Failures of the upstream API.
///
/// Partially fetched data is not an error: see [`crate::garage::Completeness`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("account not found: `{nickname}`")]
    AccountNotFound {
        nickname: String,

        #[source]
        source: Option<Box<Error>>,
    },

    #[error("the API is unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("the API has timed out")]
    Timeout,
}

impl Error {
    pub fn account_not_found(nickname: impl Into<String>) -> Self {
        Self::AccountNotFound {
            nickname: nickname.into(),
            source: None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            // The URL contains the application ID.
            Self::UpstreamUnavailable(error.without_url().to_string())
        }
    }
}
