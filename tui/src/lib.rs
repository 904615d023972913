// Forbid accidental stdout/stderr writes in the *library* portion of the TUI.
// The terminal is in raw mode while the app runs.
#![deny(clippy::print_stdout, clippy::print_stderr)]

use color_eyre::eyre::Result;
use color_eyre::eyre::WrapErr;
use srcview_backend_client::BackendClient;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod app;
mod app_event;
mod app_event_sender;
pub mod bindings;
mod cli;
pub mod config;
pub mod elements;
mod external;
mod hint_bar;
mod interactive;
pub mod menu;
pub mod menus;
pub mod navigation;
mod render;
mod search_view;
mod source_view;
mod summary_view;
mod text_formatting;
mod tui;

pub use cli::Cli;

use crate::app::App;
use crate::config::Config;
use crate::config::ConfigOverrides;

const LOG_FILE_NAME: &str = "srcview.log";
const DEFAULT_LOG_FILTER: &str = "srcview_tui=info,srcview_backend_client=info";

pub async fn run_main(cli: Cli) -> Result<()> {
    let config = Config::load(ConfigOverrides {
        config_path: cli.config,
        server_url: cli.server,
        vcs_link: cli.vcs_link,
    })
    .wrap_err("failed to load configuration")?;

    let _log_guard = init_logging(&config)?;
    info!(server = %config.server_url, "starting srcview");

    let client = BackendClient::new(&config.server_url)
        .wrap_err_with(|| format!("invalid server url {}", config.server_url))?;

    let mut terminal = tui::init()?;
    let result = App::run(&mut terminal, client, config, cli.link).await;
    tui::restore()?;
    result
}

/// Logs go to a file; the terminal belongs to the UI. `RUST_LOG` overrides
/// the default filter.
fn init_logging(config: &Config) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&config.log_dir)
        .wrap_err_with(|| format!("failed to create {}", config.log_dir.display()))?;
    let file_appender = tracing_appender::rolling::never(&config.log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);

    // A second init (as in tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(file_layer).try_init();
    Ok(guard)
}
