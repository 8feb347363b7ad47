//! Load and display the undone tasks of a Google account.
//!
//! The OAuth access token (with the `tasks` and `calendar.events` scopes) is read from the
//! `TASKBOARD_ACCESS_TOKEN` environment variable.

use std::sync::Arc;

use taskboard::client::GoogleClient;
use taskboard::config::ACCESS_TOKEN_ENV;
use taskboard::synchronizer::LoadOutcome;
use taskboard::{GoogleSynchronizer, Session};

#[tokio::main]
async fn main() {
    env_logger::init();

    let session = match std::env::var(ACCESS_TOKEN_ENV) {
        Ok(token) => Arc::new(Session::signed_in(token)),
        Err(_) => {
            log::warn!("{} is not set, the widget will stay signed out", ACCESS_TOKEN_ENV);
            Arc::new(Session::new())
        },
    };

    let client = GoogleClient::new(session.clone());
    let synchronizer = GoogleSynchronizer::new(client.clone(), client, session);

    match synchronizer.load().await {
        LoadOutcome::Failed => log::error!("Unable to load the tasks"),
        outcome => log::info!("Load finished: {:?}", outcome),
    }
    taskboard::utils::print_view(&synchronizer.view());
}
