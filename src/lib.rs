//! Genre Analysis CLI Library
//!
//! This library talks to a genre-analysis service for Spotify libraries. It
//! submits liked songs or a playlist for analysis, loads the genre breakdown
//! of the result, lets the user refine which tracks go where, and turns that
//! selection into playlist-creation requests.
//!
//! # Modules
//!
//! - `analyzer` - HTTP client for the analysis service
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `engine` - Analysis submission, breakdown loading and playlist assembly
//! - `error` - Error taxonomy shared by every layer
//! - `management` - Persisted session bootstrap data
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use genrecli::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> genrecli::Res<()> {
//!     config::load_env().await?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod management;
pub mod types;
pub mod utils;

/// A convenient Result type alias for CLI-level glue that may fail.
///
/// Uses a boxed dynamic error trait object so that configuration, cache and
/// analyzer errors can all be propagated with `?`. The engine itself returns
/// the typed [`error::AnalyzerError`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Submitting analysis...");
/// info!("Found {} genres", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only used at the boundary of one-shot subcommands. Nothing below the
/// `cli` module calls it.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable failures: the user may simply retry the action.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a dimmed diagnostic line when `GENRECLI_DEBUG` is enabled.
///
/// Secondary telemetry only. Output never influences control flow.
#[macro_export]
macro_rules! debug {
  ($($arg:tt)*) => ({
    if $crate::config::debug_enabled() {
      use colored::Colorize;
      eprintln!("[{}] {}", "~".dimmed(), std::format!($($arg)*).dimmed());
    }
  })
}
