mod garmin;

pub use garmin::GarminClient;

use crate::config::Credentials;
use crate::error::{AuthError, FetchError};
use crate::models::ActivityRecord;

/// A remote source of logged runs.
#[allow(async_fn_in_trait)]
pub trait ActivitySource {
    async fn authenticate(&self, credentials: &Credentials) -> Result<(), AuthError>;

    /// The most recent run.
    async fn get_latest(&self) -> Result<ActivityRecord, FetchError>;

    /// Runs in the current calendar week, oldest first. May be empty.
    async fn get_week(&self) -> Result<Vec<ActivityRecord>, FetchError>;
}
