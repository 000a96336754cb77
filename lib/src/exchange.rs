use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use azure_core::error::ErrorKind;
use url::Url;

use crate::{
    assertion::{AssertionCredential, SignedAssertion},
    auth::{AuthResult, BearerAuthorizer},
    config::ExchangeConfig,
    error::ExchangeError,
    identity::AzureIdentityProvider,
    scope::normalize_scope,
};

const AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Confidential client application for one tenant.
#[derive(Debug, Clone)]
pub struct ConfidentialClient {
    client_id: String,
    tenant_id: String,
    authority: Url,
    credential: AssertionCredential,
}

impl ConfidentialClient {
    pub fn new(
        client_id: &str,
        tenant_id: &str,
        credential: AssertionCredential,
    ) -> Result<Self, ExchangeError> {
        if client_id.is_empty() {
            return Err(ExchangeError::client("client id is not set"));
        }
        validate_tenant_id(tenant_id)?;
        let authority = Url::parse(&format!("{AUTHORITY_HOST}/{tenant_id}/oauth2/token"))
            .map_err(|x| {
                ExchangeError::ClientConstruction(azure_core::Error::new(
                    ErrorKind::DataConversion,
                    x,
                ))
            })?;
        Ok(Self {
            client_id: client_id.to_owned(),
            tenant_id: tenant_id.to_owned(),
            authority,
            credential,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Tenant authority the client identifies with.
    ///
    /// Used for validation and logs only. The token endpoint itself is chosen
    /// by the [`IdentityProvider`]; `azure_identity` posts to
    /// `{cloud authority host}/{tenant}/oauth2/v2.0/token`.
    pub fn authority(&self) -> &Url {
        &self.authority
    }

    // Skips local validation so the identity library's own checks can be
    // exercised.
    #[cfg(test)]
    pub(crate) fn unchecked(
        client_id: &str,
        tenant_id: &str,
        credential: AssertionCredential,
    ) -> Self {
        Self {
            client_id: client_id.to_owned(),
            tenant_id: tenant_id.to_owned(),
            authority: Url::parse(AUTHORITY_HOST).unwrap(),
            credential,
        }
    }

    pub fn credential(&self) -> &AssertionCredential {
        &self.credential
    }

    pub fn assertion(&self) -> &SignedAssertion {
        self.credential.assertion()
    }
}

fn validate_tenant_id(tenant_id: &str) -> Result<(), ExchangeError> {
    if tenant_id.is_empty() {
        return Err(ExchangeError::client("tenant id is not set"));
    }
    if !tenant_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
    {
        return Err(ExchangeError::client(format!(
            "invalid tenant id: {tenant_id}"
        )));
    }
    Ok(())
}

/// Exchanges the client's assertion for an access token.
///
/// Implementations must not serve tokens from a cache.
#[async_trait]
pub trait IdentityProvider: Send + Sync + Debug {
    async fn acquire_token(
        &self,
        client: &ConfidentialClient,
        scopes: &[&str],
    ) -> Result<AuthResult, ExchangeError>;
}

/// Turns a workload identity token into a bearer authorizer.
#[derive(Debug, Clone)]
pub struct CredentialExchanger {
    config: ExchangeConfig,
    provider: Arc<dyn IdentityProvider>,
}

impl CredentialExchanger {
    pub fn new(config: ExchangeConfig) -> Self {
        Self::with_provider(config, Arc::new(AzureIdentityProvider::default()))
    }

    pub fn with_provider(config: ExchangeConfig, provider: Arc<dyn IdentityProvider>) -> Self {
        Self { config, provider }
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Requests a new token for `resource` in `tenant_id`.
    ///
    /// The token file is re-read and a token is requested from AAD on every
    /// call.
    pub async fn acquire_bearer_authorizer(
        &self,
        tenant_id: &str,
        resource: &str,
    ) -> Result<BearerAuthorizer, ExchangeError> {
        let assertion = SignedAssertion::read(self.config.token_file_path())?;
        let credential = AssertionCredential::from_assertion(assertion)?;
        let client = ConfidentialClient::new(&self.config.client_id, tenant_id, credential)?;

        let scope = normalize_scope(resource);
        log::debug!(
            "requesting token for {} in authority {} as {}",
            scope,
            client.authority(),
            client.client_id()
        );
        let result = self.provider.acquire_token(&client, &[&scope]).await?;
        log::info!(
            "acquired token for {} expiring at {}",
            scope,
            result.expires_on()
        );
        Ok(BearerAuthorizer::new(result))
    }
}

/// Reads `AZURE_CLIENT_ID` and `TOKEN_FILE_PATH` from the environment and
/// exchanges the token file for a bearer authorizer.
pub async fn acquire_bearer_authorizer(
    tenant_id: &str,
    resource: &str,
) -> Result<BearerAuthorizer, ExchangeError> {
    let config = ExchangeConfig::from_env()?;
    CredentialExchanger::new(config)
        .acquire_bearer_authorizer(tenant_id, resource)
        .await
}
