use crate::api::ActivitySource;
use crate::config::Credentials;
use crate::error::ConnectError;
use crate::format::{format_distance, format_duration, format_pace};
use crate::models::WeekSummary;
use crate::ui::{DisplaySession, Surface};
use anyhow::{Context, Result};
use log::{info, warn};

const NO_RUNS_THIS_WEEK: &str = "You've not ran this week. Go for a run!";

/// Column where the value half of each row starts.
const VALUE_COLUMN: usize = 8;

pub struct App<S: Surface, A: ActivitySource> {
    display: DisplaySession<S>,
    activities: A,
}

impl<S: Surface, A: ActivitySource> App<S, A> {
    /// Logs in, reporting progress on the display.
    pub async fn connect(
        mut display: DisplaySession<S>,
        activities: A,
        credentials: &Credentials,
    ) -> Result<Self, ConnectError> {
        display.message("Authenticating with Garmin Connect", 0)?;

        match activities.authenticate(credentials).await {
            Ok(()) => {
                display.message("Authenticated", 0)?;
                Ok(Self {
                    display,
                    activities,
                })
            }
            Err(e) => {
                display.message("Failed to authenticate", 0)?;
                display.release()?;
                warn!("Authentication failed: {}", e);
                Err(ConnectError::Auth(e))
            }
        }
    }

    pub async fn update(&mut self) -> Result<()> {
        self.display.clear()?;
        self.display.home()?;

        self.do_latest().await?;
        self.do_week().await?;
        Ok(())
    }

    /// Runs `update` and releases the display whatever the outcome.
    pub async fn run(mut self) -> Result<()> {
        let result = self.update().await;
        self.display.release()?;
        result
    }

    async fn do_latest(&mut self) -> Result<()> {
        let latest = self
            .activities
            .get_latest()
            .await
            .context("Failed to fetch latest activity")?;

        self.display.write("Latest:")?;
        self.display.write_at(
            0,
            VALUE_COLUMN,
            &format_distance(latest.distance_short, &latest.short_unit),
        )?;
        self.display
            .write_at(1, 0, &format_duration(&latest.duration))?;
        self.display.write_at(
            1,
            VALUE_COLUMN,
            &format_pace(&latest.pace, &latest.pace_unit),
        )?;
        Ok(())
    }

    async fn do_week(&mut self) -> Result<()> {
        let week = self
            .activities
            .get_week()
            .await
            .context("Failed to fetch this week's activities")?;

        let Some(summary) = WeekSummary::calculate(&week) else {
            info!("No runs this week");
            return self.display.message(NO_RUNS_THIS_WEEK, 2);
        };

        self.display.write_at(2, 0, "Week:")?;
        self.display.write_at(
            2,
            VALUE_COLUMN,
            &format_distance(summary.distance_short, &summary.short_unit),
        )?;
        self.display
            .write_at(3, 0, &format_duration(&summary.duration))?;
        self.display.write_at(
            3,
            VALUE_COLUMN,
            &format_pace(&summary.pace, &summary.pace_unit),
        )?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_display(self) -> DisplaySession<S> {
        self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuthError, FetchError};
    use crate::models::ActivityRecord;
    use crate::ui::{Geometry, LcdState};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FakeSource {
        latest: Option<ActivityRecord>,
        week: Vec<ActivityRecord>,
    }

    impl FakeSource {
        fn new(latest: Option<ActivityRecord>, week: Vec<ActivityRecord>) -> Self {
            Self { latest, week }
        }
    }

    impl ActivitySource for FakeSource {
        async fn authenticate(&self, credentials: &Credentials) -> Result<(), AuthError> {
            if credentials.password == "secret" {
                Ok(())
            } else {
                Err(AuthError::Rejected)
            }
        }

        async fn get_latest(&self) -> Result<ActivityRecord, FetchError> {
            self.latest.clone().ok_or(FetchError::NoActivities)
        }

        async fn get_week(&self) -> Result<Vec<ActivityRecord>, FetchError> {
            Ok(self.week.clone())
        }
    }

    fn credentials(password: &str) -> Credentials {
        Credentials {
            username: "alice".to_string(),
            password: password.to_string(),
        }
    }

    async fn connected(source: FakeSource) -> App<LcdState, FakeSource> {
        let display = DisplaySession::init(LcdState::default()).unwrap();
        App::connect(display, source, &credentials("secret"))
            .await
            .unwrap()
    }

    fn lines(app: App<LcdState, FakeSource>) -> Vec<String> {
        app.into_display().into_surface().lines()
    }

    #[tokio::test]
    async fn test_connect_shows_authenticated() {
        let app = connected(FakeSource::new(None, vec![])).await;
        assert_eq!(lines(app)[0].trim_end(), "Authenticated");
    }

    #[tokio::test]
    async fn test_connect_failure() {
        let display = DisplaySession::init(LcdState::default()).unwrap();
        let source = FakeSource::new(None, vec![]);
        let result = App::connect(display, source, &credentials("wrong")).await;

        let err = result.err().unwrap();
        assert!(matches!(err, ConnectError::Auth(AuthError::Rejected)));
        assert_eq!(err.to_string(), "Failed to authenticate");
    }

    /// An LCD shared between the display session and a watcher.
    #[derive(Clone, Default)]
    struct SharedLcd {
        state: Rc<RefCell<LcdState>>,
        releases: Rc<RefCell<usize>>,
    }

    impl Surface for SharedLcd {
        fn init(&mut self, geometry: Geometry, backlight: bool) -> Result<()> {
            self.state.borrow_mut().init(geometry, backlight)
        }
        fn clear(&mut self) -> Result<()> {
            self.state.borrow_mut().clear()
        }
        fn home(&mut self) -> Result<()> {
            self.state.borrow_mut().home()
        }
        fn set_cursor_position(&mut self, line: usize, column: usize) -> Result<()> {
            self.state.borrow_mut().set_cursor_position(line, column)
        }
        fn write(&mut self, text: &str) -> Result<()> {
            self.state.borrow_mut().write(text)
        }
        fn message(&mut self, text: &str) -> Result<()> {
            self.state.borrow_mut().message(text)
        }
        fn release(&mut self) -> Result<()> {
            *self.releases.borrow_mut() += 1;
            Ok(())
        }
    }

    /// Rejects every login and remembers what the display showed meanwhile.
    struct WatchingSource {
        lcd: SharedLcd,
        seen_during_login: Rc<RefCell<Vec<String>>>,
    }

    impl ActivitySource for WatchingSource {
        async fn authenticate(&self, _credentials: &Credentials) -> Result<(), AuthError> {
            *self.seen_during_login.borrow_mut() = self.lcd.state.borrow().lines();
            Err(AuthError::Rejected)
        }

        async fn get_latest(&self) -> Result<ActivityRecord, FetchError> {
            Err(FetchError::NoActivities)
        }

        async fn get_week(&self) -> Result<Vec<ActivityRecord>, FetchError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_connect_failure_messages_on_display() {
        let lcd = SharedLcd::default();
        let display = DisplaySession::init(lcd.clone()).unwrap();
        let source = WatchingSource {
            lcd: lcd.clone(),
            seen_during_login: Rc::default(),
        };

        let result = App::connect(display, source, &credentials("secret")).await;
        assert!(matches!(result, Err(ConnectError::Auth(AuthError::Rejected))));

        let lines = lcd.state.borrow().lines();
        assert_eq!(lines[0], "Failed to authentica");
        assert_eq!(lines[1].trim_end(), "te");
        assert_eq!(*lcd.releases.borrow(), 1);
    }

    #[tokio::test]
    async fn test_connect_shows_progress_before_login() {
        let lcd = SharedLcd::default();
        let display = DisplaySession::init(lcd.clone()).unwrap();
        let seen_during_login: Rc<RefCell<Vec<String>>> = Rc::default();
        let source = WatchingSource {
            lcd: lcd.clone(),
            seen_during_login: Rc::clone(&seen_during_login),
        };

        let _ = App::connect(display, source, &credentials("secret")).await;

        let seen = seen_during_login.borrow();
        assert_eq!(seen[0], "Authenticating with ");
        assert_eq!(seen[1].trim_end(), "Garmin Connect");
    }

    #[tokio::test]
    async fn test_run_releases_display_after_failed_update() {
        let lcd = SharedLcd::default();
        let display = DisplaySession::init(lcd.clone()).unwrap();
        let app = App {
            display,
            activities: FakeSource::new(None, vec![]),
        };

        assert!(app.run().await.is_err());
        assert_eq!(*lcd.releases.borrow(), 1);
    }

    #[tokio::test]
    async fn test_update_full_display() {
        // 5.02 km in 25:07, then a week of 5.02 km and 10.0 km.
        let latest = ActivityRecord::new(5.02, 1507);
        let week = vec![latest.clone(), ActivityRecord::new(10.0, 3665)];
        let mut app = connected(FakeSource::new(Some(latest), week)).await;

        app.update().await.unwrap();

        assert_eq!(
            lines(app),
            vec![
                "Latest: 5.02 km     ",
                "0:25:7  5:00 min/km ",
                "Week:   15.02 km    ",
                "1:26:12 5:44 min/km ",
            ]
        );
    }

    #[tokio::test]
    async fn test_week_aggregation() {
        let latest = ActivityRecord::new(1.0, 60);
        let week = vec![ActivityRecord::new(1.0, 60), ActivityRecord::new(2.0, 120)];
        let mut app = connected(FakeSource::new(Some(latest), week)).await;

        app.update().await.unwrap();

        let lines = lines(app);
        assert_eq!(lines[2], "Week:   3.0 km      ");
        assert_eq!(lines[3], "0:03:0  1:00 min/km ");
    }

    #[tokio::test]
    async fn test_empty_week_shows_encouragement() {
        let latest = ActivityRecord::new(3.0, 900);
        let mut app = connected(FakeSource::new(Some(latest), vec![])).await;

        app.update().await.unwrap();

        let lines = lines(app);
        assert_eq!(lines[0], "Latest: 3.0 km      ");
        assert_eq!(lines[1], "0:15:0  5:00 min/km ");
        assert_eq!(lines[2], "You've not ran this ");
        assert_eq!(lines[3], "week. Go for a run! ");
    }

    #[tokio::test]
    async fn test_no_latest_activity_is_an_error() {
        let mut app = connected(FakeSource::new(None, vec![])).await;
        let err = app.update().await.unwrap_err();
        assert!(err
            .downcast_ref::<FetchError>()
            .map(|e| matches!(e, FetchError::NoActivities))
            .unwrap_or(false));
    }
}
