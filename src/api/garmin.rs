use crate::api::ActivitySource;
use crate::config::Credentials;
use crate::error::{AuthError, FetchError};
use crate::models::{ActivityRecord, GarminActivity};
use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, REFERER, USER_AGENT};

const SSO_BASE: &str = "https://sso.garmin.com/sso";
const CONNECT_BASE: &str = "https://connect.garmin.com/modern";
const ACTIVITY_SEARCH_PATH: &str = "/proxy/activitylist-service/activities/search/activities";
const ACTIVITY_TYPE: &str = "running";
const WEEK_LIMIT: u32 = 100;

/// Session against Garmin Connect. Login cookies are kept by the client's
/// cookie store, so a single instance must be used for login and queries.
pub struct GarminClient {
    client: reqwest::Client,
}

impl GarminClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(Self::build_headers())
            .timeout(std::time::Duration::from_secs(120)) // 2 minute timeout
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    fn build_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static("Mozilla/5.0 (compatible; runpi)"),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers
    }

    fn signin_params() -> [(&'static str, &'static str); 4] {
        [
            ("service", CONNECT_BASE),
            ("gauthHost", SSO_BASE),
            ("clientId", "GarminConnect"),
            ("embed", "true"),
        ]
    }

    /// Sign in through the SSO form and trade the issued service ticket for a
    /// Connect session.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let signin_url = format!("{}/signin", SSO_BASE);

        debug!("Fetching sign-in page");
        let response = self
            .client
            .get(&signin_url)
            .query(&Self::signin_params())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::UnexpectedResponse(format!(
                "sign-in page returned status {}",
                status
            )));
        }
        let page = response.text().await?;
        let csrf = extract_csrf(&page).ok_or_else(|| {
            AuthError::UnexpectedResponse("sign-in page has no CSRF token".to_string())
        })?;

        debug!("Submitting credentials");
        let response = self
            .client
            .post(&signin_url)
            .query(&Self::signin_params())
            .header(REFERER, signin_url.as_str())
            .form(&[
                ("username", username),
                ("password", password),
                ("embed", "true"),
                ("_csrf", csrf.as_str()),
            ])
            .send()
            .await?;
        let status = response.status();
        if status.is_server_error() {
            return Err(AuthError::UnexpectedResponse(format!(
                "sign-in returned status {}",
                status
            )));
        }
        let body = response.text().await?;
        let ticket = extract_ticket(&body).ok_or(AuthError::Rejected)?;

        debug!("Exchanging service ticket");
        let response = self
            .client
            .get(format!("{}/", CONNECT_BASE))
            .query(&[("ticket", ticket.as_str())])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::UnexpectedResponse(format!(
                "ticket exchange returned status {}",
                status
            )));
        }

        info!("Logged in to Garmin Connect");
        Ok(())
    }

    async fn search(&self, params: &[(&str, String)]) -> Result<Vec<GarminActivity>, FetchError> {
        let url = format!("{}{}", CONNECT_BASE, ACTIVITY_SEARCH_PATH);
        debug!("Searching activities with {:?}", params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .header("NK", "NT")
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                body: response_text.chars().take(500).collect(),
            });
        }

        Ok(serde_json::from_str(&response_text)?)
    }

    pub async fn latest(&self) -> Result<ActivityRecord, FetchError> {
        let activities = self
            .search(&[
                ("activityType", ACTIVITY_TYPE.to_string()),
                ("start", "0".to_string()),
                ("limit", "1".to_string()),
            ])
            .await?;

        let latest = activities.first().ok_or(FetchError::NoActivities)?;
        debug!(
            "Latest activity is {} ({:?}, started {:?})",
            latest.activity_id,
            latest.activity_name,
            latest.start_time_local
        );
        Ok(ActivityRecord::from(latest))
    }

    pub async fn week(&self) -> Result<Vec<ActivityRecord>, FetchError> {
        let (start, end) = week_bounds(Local::now().date_naive());
        let mut activities = self
            .search(&[
                ("activityType", ACTIVITY_TYPE.to_string()),
                ("startDate", start.format("%Y-%m-%d").to_string()),
                ("endDate", end.format("%Y-%m-%d").to_string()),
                ("start", "0".to_string()),
                ("limit", WEEK_LIMIT.to_string()),
            ])
            .await?;

        // The service lists newest first.
        activities.reverse();
        activities.retain(is_run);
        info!("Found {} activities since {}", activities.len(), start);
        Ok(activities.iter().map(ActivityRecord::from).collect())
    }
}

impl ActivitySource for GarminClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<(), AuthError> {
        self.login(&credentials.username, &credentials.password).await
    }

    async fn get_latest(&self) -> Result<ActivityRecord, FetchError> {
        self.latest().await
    }

    async fn get_week(&self) -> Result<Vec<ActivityRecord>, FetchError> {
        self.week().await
    }
}

fn is_run(activity: &GarminActivity) -> bool {
    activity
        .activity_type
        .as_ref()
        .map_or(true, |t| t.type_key == ACTIVITY_TYPE)
}

/// Monday of the week containing `today`, and `today`.
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let since_monday = today.weekday().num_days_from_monday() as i64;
    (today - chrono::Duration::days(since_monday), today)
}

/// Pulls the `_csrf` hidden input value out of the sign-in form.
fn extract_csrf(html: &str) -> Option<String> {
    let input_idx = html.find("name=\"_csrf\"")?;
    let after_input = &html[input_idx..];
    let value_idx = after_input.find("value=\"")?;
    let value = &after_input[value_idx + 7..];
    let end = value.find('"')?;
    Some(value[..end].to_string())
}

/// Pulls the service ticket (`ST-...`) out of the sign-in response.
fn extract_ticket(html: &str) -> Option<String> {
    let ticket_idx = html.find("ticket=")?;
    let ticket: String = html[ticket_idx + 7..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if ticket.is_empty() {
        None
    } else {
        Some(ticket)
    }
}
