use crate::{
    api::{ApiConfig, ApiError, config::DEFAULT_TIMEOUT_MS},
    app::App,
};
use std::{env, path::PathBuf, time::Duration};

/// Directory under `$HOME` used when no state directory is given.
pub const STATE_DIR_NAME: &str = ".geminis";

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub timeout: Duration,
    pub state_dir: PathBuf,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            state_dir: default_state_dir(),
        }
    }

    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(&self.api_url).with_timeout(self.timeout)
    }

    /// Wires the application over the state directory.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn app(&self) -> Result<App, ApiError> {
        App::open(self.api_config(), &self.state_dir)
    }
}

/// `$HOME/.geminis`, or `.geminis` in the working directory without a home.
#[must_use]
pub fn default_state_dir() -> PathBuf {
    env::var_os("HOME").map_or_else(
        || PathBuf::from(STATE_DIR_NAME),
        |home| PathBuf::from(home).join(STATE_DIR_NAME),
    )
}
