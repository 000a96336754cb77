use std::{io, path::PathBuf};

use azure_core::error::ErrorKind;

/// Failure of a single credential exchange.
///
/// None of these are retried; the caller decides whether to run the whole
/// exchange again.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("failed to load exchange configuration: {0}")]
    Configuration(#[from] envconfig::Error),

    #[error("failed to read service account token from '{}': {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create confidential creds: {0}")]
    CredentialConstruction(String),

    #[error("failed to create confidential client app: {0}")]
    ClientConstruction(#[source] azure_core::Error),

    #[error("failed to get token: {0}")]
    TokenAcquisition(#[source] azure_core::Error),
}

impl ExchangeError {
    pub(crate) fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn client(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::ClientConstruction(azure_core::Error::with_message_fn(
            ErrorKind::Credential,
            || message,
        ))
    }
}

impl From<ExchangeError> for azure_core::Error {
    fn from(err: ExchangeError) -> Self {
        match err {
            ExchangeError::ClientConstruction(inner) | ExchangeError::TokenAcquisition(inner) => {
                inner
            }
            other => azure_core::Error::new(ErrorKind::Credential, other),
        }
    }
}
