use std::{fmt, fs, io, path::Path};

use crate::error::ExchangeError;

/// Service account token projected into the pod.
///
/// The file content is kept verbatim. It is re-read on every exchange since
/// the kubelet rotates the token in place.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedAssertion(String);

impl SignedAssertion {
    pub fn new(assertion: impl Into<String>) -> Self {
        Self(assertion.into())
    }

    /// Reads the assertion from `path`.
    pub fn read(path: &Path) -> Result<Self, ExchangeError> {
        if path.as_os_str().is_empty() {
            return Err(ExchangeError::file_read(
                path,
                io::Error::new(io::ErrorKind::NotFound, "token file path is not set"),
            ));
        }
        let token = fs::read_to_string(path).map_err(|x| ExchangeError::file_read(path, x))?;
        if token.is_empty() {
            return Err(ExchangeError::file_read(
                path,
                io::Error::new(io::ErrorKind::InvalidData, "token file is empty"),
            ));
        }
        log::debug!("read {} byte assertion from {}", token.len(), path.display());
        Ok(Self(token))
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SignedAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SignedAssertion(<REDACTED>)")
    }
}

/// Confidential client credential backed by a signed assertion.
#[derive(Debug, Clone)]
pub struct AssertionCredential {
    assertion: SignedAssertion,
}

impl AssertionCredential {
    pub fn from_assertion(assertion: SignedAssertion) -> Result<Self, ExchangeError> {
        if assertion.secret().trim().is_empty() {
            return Err(ExchangeError::CredentialConstruction(
                "assertion does not contain a token".to_owned(),
            ));
        }
        Ok(Self { assertion })
    }

    pub fn assertion(&self) -> &SignedAssertion {
        &self.assertion
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_read_keeps_content_verbatim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"header.payload.signature\n").unwrap();
        let assertion = SignedAssertion::read(file.path()).unwrap();
        assert_eq!(assertion.secret(), "header.payload.signature\n");
    }

    #[test]
    fn test_read_sees_rotated_token() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"first").unwrap();
        assert_eq!(SignedAssertion::read(file.path()).unwrap().secret(), "first");

        std::fs::write(file.path(), "second").unwrap();
        assert_eq!(SignedAssertion::read(file.path()).unwrap().secret(), "second");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("azure-identity-token");
        let err = SignedAssertion::read(&path).unwrap_err();
        match err {
            ExchangeError::FileRead { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_read_empty_path() {
        let err = SignedAssertion::read(Path::new("")).unwrap_err();
        assert!(matches!(err, ExchangeError::FileRead { .. }));
    }

    #[test]
    fn test_read_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = SignedAssertion::read(file.path()).unwrap_err();
        assert!(matches!(err, ExchangeError::FileRead { .. }));
    }

    #[test]
    fn test_debug_is_redacted() {
        let assertion = SignedAssertion::new("header.payload.signature");
        assert!(!format!("{assertion:?}").contains("payload"));
    }

    #[test]
    fn test_credential_rejects_blank_assertion() {
        let err = AssertionCredential::from_assertion(SignedAssertion::new(" \n")).unwrap_err();
        assert!(matches!(err, ExchangeError::CredentialConstruction(_)));

        let credential =
            AssertionCredential::from_assertion(SignedAssertion::new("a.b.c")).unwrap();
        assert_eq!(credential.assertion().secret(), "a.b.c");
    }
}
