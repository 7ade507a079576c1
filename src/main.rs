mod api;
mod app;
mod config;
mod error;
mod format;
mod models;
mod ui;

use anyhow::{Context, Result};
use app::App;
use config::Credentials;
use error::ConnectError;
use log::{debug, error};
use ui::{DisplaySession, TerminalLcd};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    // Load configuration
    let config_path = config::default_path()?;
    debug!("Reading credentials from {}", config_path.display());
    let credentials = match Credentials::load(&config_path) {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("{:?}", e);
            exit_with(&e.to_string());
        }
    };

    // Initialize display and log in
    let display = DisplaySession::init(TerminalLcd::inline()?)
        .context("Failed to initialize display")?;
    let client = api::GarminClient::new()?;

    let app = match App::connect(display, client, &credentials).await {
        Ok(app) => app,
        Err(ConnectError::Auth(e)) => {
            error!("{}", e);
            exit_with("Failed to authenticate");
        }
        Err(e) => return Err(e.into()),
    };

    app.run().await
}

fn exit_with(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}
