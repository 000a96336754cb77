use async_trait::async_trait;
use azure_core::{
    credentials::TokenCredential,
    http::{ClientMethodOptions, ClientOptions},
};
use azure_identity::{ClientAssertion, ClientAssertionCredential, ClientAssertionCredentialOptions};

use crate::{
    assertion::AssertionCredential,
    auth::AuthResult,
    error::ExchangeError,
    exchange::{ConfidentialClient, IdentityProvider},
};

/// [`IdentityProvider`] backed by `azure_identity`.
///
/// A new `ClientAssertionCredential` is built for every request so its
/// token cache never serves a previous token.
#[derive(Debug, Clone, Default)]
pub struct AzureIdentityProvider {
    client_options: ClientOptions,
}

impl AzureIdentityProvider {
    pub fn new(client_options: ClientOptions) -> Self {
        Self { client_options }
    }
}

#[async_trait]
impl IdentityProvider for AzureIdentityProvider {
    async fn acquire_token(
        &self,
        client: &ConfidentialClient,
        scopes: &[&str],
    ) -> Result<AuthResult, ExchangeError> {
        let options = ClientAssertionCredentialOptions {
            client_options: self.client_options.clone(),
            ..Default::default()
        };
        let credential = ClientAssertionCredential::new(
            client.tenant_id().to_owned(),
            client.client_id().to_owned(),
            client.credential().clone(),
            Some(options),
        )
        .map_err(ExchangeError::ClientConstruction)?;

        let token = credential
            .get_token(scopes, None)
            .await
            .inspect_err(|x| log::error!("token request for {scopes:?} failed: {x}"))
            .map_err(ExchangeError::TokenAcquisition)?;

        // AAD only returns the token and its lifetime; the requested scopes
        // are what was granted.
        Ok(AuthResult::new(
            token.token,
            token.expires_on,
            scopes.iter().map(ToString::to_string).collect(),
            Vec::new(),
        ))
    }
}

#[async_trait]
impl ClientAssertion for AssertionCredential {
    async fn secret(&self, _options: Option<ClientMethodOptions<'_>>) -> azure_core::Result<String> {
        Ok(self.assertion().secret().to_owned())
    }
}
