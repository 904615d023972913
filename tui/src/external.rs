use tracing::info;
use tracing::warn;

/// Open `url` in the system browser. Failures are logged, never fatal.
pub(crate) fn open_url(url: &str) {
    match webbrowser::open(url) {
        Ok(()) => info!(url, "opened in browser"),
        Err(err) => warn!(url, %err, "failed to open browser"),
    }
}
