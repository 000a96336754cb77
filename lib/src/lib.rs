//! # workload-identity-auth
//!
//! Exchange an Azure workload identity federated token for an AAD access
//! token and hand it to an HTTP client as a bearer authorizer.
//!
//! The AAD pod identity webhook projects a signed service account token into
//! the pod and points `TOKEN_FILE_PATH` at it. [`acquire_bearer_authorizer`]
//! reads that file, builds a confidential client for the tenant with the token
//! as its client assertion and requests an access token for the resource.
//!
//! ## Using `CredentialExchanger`
//!
//! - [`ExchangeConfig`]: client id and token file path, either explicit or
//!   loaded from the environment.
//! - [`IdentityProvider`]: the token request itself. [`AzureIdentityProvider`]
//!   uses `azure_identity`; tests can substitute their own.
//! - [`BearerAuthorizer`]: the result. It is an `azure_core` pipeline policy, a
//!   `TokenCredential`, and exposes the raw `authorization` header value.
//!
//! ### Minimal example
//!
//! ```no_run
//! use workload_identity_auth::{CredentialExchanger, ExchangeConfig, OAuthTokenProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExchangeConfig::new(
//!         "00000000-0000-0000-0000-000000000000",
//!         "/var/run/secrets/azure/tokens/azure-identity-token",
//!     );
//!     let exchanger = CredentialExchanger::new(config);
//!     let authorizer = exchanger
//!         .acquire_bearer_authorizer("contoso.onmicrosoft.com", "https://vault.azure.net")
//!         .await?;
//!     println!("token expires at {}", authorizer.auth_result().expires_on());
//!     let _ = authorizer.oauth_token();
//!     Ok(())
//! }
//! ```
//!
//! ### Environment variables
//!
//! - `AZURE_CLIENT_ID`: client id of the federated application.
//! - `TOKEN_FILE_PATH`: path of the projected service account token.
//!
//! Every call re-reads the token file and requests a new token. Nothing is
//! cached.
//!
mod assertion;
mod auth;
mod config;
mod error;
mod exchange;
mod identity;
mod scope;

pub use assertion::{AssertionCredential, SignedAssertion};
pub use auth::{AuthResult, BearerAuthorizer, OAuthTokenProvider};
pub use config::ExchangeConfig;
pub use envconfig::Envconfig;
pub use error::ExchangeError;
pub use exchange::{
    ConfidentialClient, CredentialExchanger, IdentityProvider, acquire_bearer_authorizer,
};
pub use identity::AzureIdentityProvider;
pub use scope::normalize_scope;
