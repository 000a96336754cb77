use std::path::Path;

use envconfig::Envconfig;

use crate::error::ExchangeError;

/// Settings for a workload identity exchange.
///
/// The AAD pod identity webhook injects `AZURE_CLIENT_ID` from the service
/// account annotation and `TOKEN_FILE_PATH` pointing at the projected service
/// account token. Both default to empty and are only checked when an exchange
/// runs, so an unset `TOKEN_FILE_PATH` surfaces as a file read failure.
#[derive(Envconfig, Clone, Debug)]
pub struct ExchangeConfig {
    #[envconfig(from = "AZURE_CLIENT_ID", default = "")]
    pub client_id: String,

    #[envconfig(from = "TOKEN_FILE_PATH", default = "")]
    pub token_file_path: String,
}

impl ExchangeConfig {
    pub fn new(client_id: impl Into<String>, token_file_path: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            token_file_path: token_file_path.into(),
        }
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ExchangeError> {
        Ok(Self::init_from_env()?)
    }

    pub fn token_file_path(&self) -> &Path {
        Path::new(&self.token_file_path)
    }
}
