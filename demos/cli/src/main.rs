use anyhow::{Context, Result, bail};
use clap::{Parser, arg, command};
use std::time::Duration;
use url::Url;
use workload_identity_auth::{
    BearerAuthorizer, CredentialExchanger, ExchangeConfig, OAuthTokenProvider,
};

#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "Exchange the workload identity token file for an AAD access token."
)]
struct Arguments {
    #[arg(short, long, env = "AZURE_TENANT_ID")]
    tenant_id: String,

    #[arg(short, long)]
    resource: String,

    /// Send a GET request to this URL with the bearer token instead of printing it.
    #[arg(short, long)]
    url: Option<Url>,

    /// Give up on the token request after this many seconds.
    #[arg(long, value_name = "SECONDS", default_value_t = 30)]
    timeout: u64,
}

fn check_status(url: &Url, status: reqwest::StatusCode) -> Result<()> {
    if !status.is_success() {
        bail!("GET {url} failed with {status}");
    }
    Ok(())
}

async fn call(authorizer: &BearerAuthorizer, url: Url) -> Result<()> {
    let response = reqwest::Client::new()
        .get(url.clone())
        .header("authorization", authorizer.header_value())
        .send()
        .await?;
    let status = response.status();
    log::info!("GET {url} returned {status}");
    println!("{status}");
    println!("{}", response.text().await?);
    check_status(&url, status)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Arguments::parse();
    let config = ExchangeConfig::from_env()?;
    log::debug!("using {config:?}");

    let exchanger = CredentialExchanger::new(config);
    let authorizer = tokio::time::timeout(
        Duration::from_secs(args.timeout),
        exchanger.acquire_bearer_authorizer(&args.tenant_id, &args.resource),
    )
    .await
    .context("timed out waiting for the token")??;

    let result = authorizer.auth_result();
    log::info!(
        "Token expires at {} with scopes {:?}",
        result.expires_on(),
        result.granted_scopes()
    );

    match args.url {
        Some(url) => call(&authorizer, url).await?,
        None => println!("{}", authorizer.oauth_token()),
    }
    Ok(())
}
