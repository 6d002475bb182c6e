//! # CLI Module
//!
//! User-facing commands of genrecli. Each command wires the engine to the
//! terminal: it builds an [`AnalysisClient`], drives the relevant engine
//! component and renders the outcome with the logging macros and `tabled`.
//!
//! ## Commands
//!
//! - [`auth`] / [`logout`] - connect or forget the Spotify account on the service
//! - [`analyze`] - analyse liked songs or a playlist, then show the result
//! - [`history`] - list past analyses
//! - [`result`] - show the genre breakdown of one analysis
//! - [`select`] - interactive selection session over one analysis
//! - [`playlist`] - one-shot playlist creation from flags
//!
//! ## Error Handling
//!
//! One-shot commands end with `error!` (exit code 1) when their action
//! failed. The interactive session reports every failure with `warning!`
//! and keeps running so the user can retry.
//!
//! ## Usage Patterns
//!
//! ```bash
//! genrecli auth
//! genrecli analyze liked
//! genrecli analyze playlist https://open.spotify.com/playlist/37i9dQZF1DX0XUsuxWHRQd
//! genrecli playlist <ANALYSIS_ID> --genre rock --exclude 4uLU6hMCjMI75M1A2tKUQC
//! genrecli playlist <ANALYSIS_ID> --all
//! genrecli select <ANALYSIS_ID>
//! ```

mod analyze;
mod auth;
mod history;
mod playlist;
mod result;
mod select;

pub use analyze::analyze;
pub use auth::auth;
pub use auth::logout;
pub use history::history;
pub use playlist::playlist;
pub use result::result;
pub use select::select;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{analyzer::AnalysisClient, error};

fn client() -> AnalysisClient {
    match AnalysisClient::from_env() {
        Ok(client) => client,
        Err(e) => error!("Cannot create HTTP client. Err: {}", e),
    }
}

fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
