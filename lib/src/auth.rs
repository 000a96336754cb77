use async_trait::async_trait;
use azure_core::{
    credentials::{AccessToken, Secret, TokenCredential, TokenRequestOptions},
    error::{Error, ErrorKind},
    http::{
        Context, Request,
        policies::{Policy, PolicyResult},
    },
};
use std::sync::Arc;
use time::OffsetDateTime;

use crate::scope::normalize_scope;

/// Supplies the current OAuth access token.
pub trait OAuthTokenProvider {
    fn oauth_token(&self) -> &str;
}

/// Outcome of a token acquisition.
#[derive(Debug, Clone)]
pub struct AuthResult {
    access_token: Secret,
    expires_on: OffsetDateTime,
    granted_scopes: Vec<String>,
    declined_scopes: Vec<String>,
}

impl AuthResult {
    pub fn new(
        access_token: impl Into<Secret>,
        expires_on: OffsetDateTime,
        granted_scopes: Vec<String>,
        declined_scopes: Vec<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            expires_on,
            granted_scopes,
            declined_scopes,
        }
    }

    pub fn expires_on(&self) -> OffsetDateTime {
        self.expires_on
    }

    pub fn granted_scopes(&self) -> &[String] {
        &self.granted_scopes
    }

    pub fn declined_scopes(&self) -> &[String] {
        &self.declined_scopes
    }

    pub fn is_expired(&self) -> bool {
        self.expires_on <= OffsetDateTime::now_utc()
    }

    fn grants(&self, scope: &str) -> bool {
        let scope = normalize_scope(scope);
        self.granted_scopes.iter().any(|x| *x == scope)
    }
}

impl OAuthTokenProvider for AuthResult {
    fn oauth_token(&self) -> &str {
        self.access_token.secret()
    }
}

/// Decorates outgoing requests with the bearer token of an [`AuthResult`].
///
/// Usable as an `azure_core` pipeline policy, as a [`TokenCredential`] for
/// Azure SDK clients, or through [`BearerAuthorizer::header_value`] for any
/// other HTTP client.
#[derive(Debug, Clone)]
pub struct BearerAuthorizer {
    result: Arc<AuthResult>,
}

impl BearerAuthorizer {
    pub fn new(result: AuthResult) -> Self {
        Self {
            result: Arc::new(result),
        }
    }

    pub fn auth_result(&self) -> &AuthResult {
        &self.result
    }

    /// Value of the `authorization` header.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.oauth_token())
    }
}

impl OAuthTokenProvider for BearerAuthorizer {
    fn oauth_token(&self) -> &str {
        self.result.oauth_token()
    }
}

#[async_trait]
impl Policy for BearerAuthorizer {
    async fn send(
        &self,
        ctx: &Context,
        request: &mut Request,
        next: &[Arc<dyn Policy>],
    ) -> PolicyResult {
        request.insert_header("authorization", self.header_value());
        next[0].send(ctx, request, &next[1..]).await
    }
}

// Only the token acquired at exchange time is available: other scopes and
// expired tokens need a new exchange.
#[async_trait]
impl TokenCredential for BearerAuthorizer {
    async fn get_token(
        &self,
        scopes: &[&str],
        _options: Option<TokenRequestOptions<'_>>,
    ) -> azure_core::Result<AccessToken> {
        if let Some(scope) = scopes.iter().find(|x| !self.result.grants(x)) {
            let scope = scope.to_string();
            let granted = self.result.granted_scopes.clone();
            return Err(Error::with_message_fn(ErrorKind::Credential, move || {
                format!("token was not issued for {scope}, granted scopes are {granted:?}")
            }));
        }
        if self.result.is_expired() {
            let expires_on = self.result.expires_on;
            return Err(Error::with_message_fn(ErrorKind::Credential, move || {
                format!("token expired at {expires_on}")
            }));
        }
        Ok(AccessToken::new(
            self.result.access_token.clone(),
            self.result.expires_on,
        ))
    }
}

#[cfg(test)]
mod tests {
    use time::Duration;

    use super::*;

    fn result() -> AuthResult {
        result_expiring_at(OffsetDateTime::now_utc() + Duration::hours(1))
    }

    fn result_expiring_at(expires_on: OffsetDateTime) -> AuthResult {
        AuthResult::new(
            "eyJ0eXAiOiJKV1QifQ.e30.sig".to_owned(),
            expires_on,
            vec!["https://vault.azure.net/.default".to_owned()],
            vec![],
        )
    }

    #[test]
    fn test_authorizer_returns_token() {
        let authorizer = BearerAuthorizer::new(result());
        assert_eq!(authorizer.oauth_token(), "eyJ0eXAiOiJKV1QifQ.e30.sig");
        assert_eq!(authorizer.header_value(), "Bearer eyJ0eXAiOiJKV1QifQ.e30.sig");
        assert_eq!(
            authorizer.auth_result().granted_scopes(),
            ["https://vault.azure.net/.default"]
        );
        assert!(authorizer.auth_result().declined_scopes().is_empty());
    }

    #[test]
    fn test_debug_hides_token() {
        let authorizer = BearerAuthorizer::new(result());
        assert!(!format!("{authorizer:?}").contains("eyJ0eXAiOiJKV1QifQ"));
    }

    #[tokio::test]
    async fn test_token_credential() {
        let expires_on = OffsetDateTime::now_utc() + Duration::hours(1);
        let authorizer = BearerAuthorizer::new(result_expiring_at(expires_on));
        let token = authorizer
            .get_token(&["https://vault.azure.net/.default"], None)
            .await
            .unwrap();
        assert_eq!(token.token.secret(), "eyJ0eXAiOiJKV1QifQ.e30.sig");
        assert_eq!(token.expires_on, expires_on);

        // resource form of the same audience
        let token = authorizer
            .get_token(&["https://vault.azure.net/"], None)
            .await
            .unwrap();
        assert_eq!(token.token.secret(), "eyJ0eXAiOiJKV1QifQ.e30.sig");
    }

    #[tokio::test]
    async fn test_token_credential_rejects_other_scope() {
        let authorizer = BearerAuthorizer::new(result());
        let err = authorizer
            .get_token(&["https://storage.azure.com/.default"], None)
            .await
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Credential));
        assert!(err.to_string().contains("https://storage.azure.com/.default"));

        let err = authorizer
            .get_token(
                &[
                    "https://vault.azure.net/.default",
                    "https://storage.azure.com/.default",
                ],
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Credential));
    }

    #[tokio::test]
    async fn test_token_credential_rejects_expired_token() {
        let authorizer = BearerAuthorizer::new(result_expiring_at(OffsetDateTime::UNIX_EPOCH));
        assert!(authorizer.auth_result().is_expired());
        let err = authorizer
            .get_token(&["https://vault.azure.net/.default"], None)
            .await
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Credential));
        assert!(err.to_string().contains("expired"));
    }
}
