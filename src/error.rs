use thiserror::Error;

/// Why a Garmin Connect login did not produce a session.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("network error during login: {0}")]
    Network(#[from] reqwest::Error),
    #[error("credentials rejected by Garmin Connect")]
    Rejected,
    #[error("unexpected login response: {0}")]
    UnexpectedResponse(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error while fetching activities: {0}")]
    Network(#[from] reqwest::Error),
    #[error("activity request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to parse activity list: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no activities found")]
    NoActivities,
}

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("Failed to authenticate")]
    Auth(#[source] AuthError),
    #[error(transparent)]
    Display(#[from] anyhow::Error),
}
