use std::time::{Duration, Instant};

use crate::{
    analyzer::AnalysisClient,
    cli::{client, spinner},
    error, info,
    management::SessionManager,
    success,
    types::Session,
    warning,
};

/// Connects a Spotify account through the service's browser login.
///
/// Opens `<api>/login` in the default browser, then polls `/health` once per
/// second for up to 60 seconds until the service reports a connected account.
/// The profile is fetched best-effort and the session is cached locally.
pub async fn auth() {
    let client = client();
    let login_url = client.login_url();

    if webbrowser::open(&login_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            login_url
        )
    }

    let pb = spinner("Waiting for the Spotify login to complete...");
    let connected = wait_for_login(&client).await;
    pb.finish_and_clear();

    if !connected {
        error!("Authentication failed or timed out.");
    }

    let profile = match client.profile().await {
        Ok(profile) => Some(profile),
        Err(e) => {
            warning!("Logged in, but the profile could not be loaded: {}", e);
            None
        }
    };

    let manager = SessionManager::new(Session::logged_in(profile));
    if let Err(e) = manager.persist().await {
        error!("Failed to save session to cache: {}", e);
    }

    match &manager.current_session().profile {
        Some(profile) => success!("Logged in as {}.", profile.label()),
        None => success!("Authentication successful!"),
    }
}

async fn wait_for_login(client: &AnalysisClient) -> bool {
    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        if let Ok(health) = client.health().await {
            if health.spotify_connected {
                return true;
            }
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    false
}

/// Logs out on the service and forgets the cached session.
pub async fn logout() {
    let client = client();
    if let Err(e) = client.logout().await {
        warning!("Service logout failed: {}", e.user_message());
    }

    let mut manager = SessionManager::load_or_default().await;
    if let Err(e) = manager.clear().await {
        error!("Failed to remove cached session: {}", e);
    }
    info!("Logged out.");
}
