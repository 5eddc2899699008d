//! Automated login example.
//!
//! Logs in with the credentials file (or reuses today's cached token) and
//! prints the account profile.
//!
//! Run with: cargo run --example auto_login -- credentials.toml access_token.txt

use fyers_autologin::client::DEFAULT_TOKEN_FILE;
use fyers_autologin::{BrokerHandler, ClientConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> fyers_autologin::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "fyers_autologin=info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let credentials_file = args.next().unwrap_or_else(|| "credentials.toml".to_string());
    let token_file = args
        .next()
        .unwrap_or_else(|| DEFAULT_TOKEN_FILE.to_string());

    let handler = BrokerHandler::from_file(
        &credentials_file,
        ClientConfig::default().with_token_file(&token_file),
    )?;

    let client = handler.instance().await?;
    println!("Access token ready in {}", token_file);

    let profile = client.profile().await?;
    println!(
        "Logged in as {} ({})",
        profile.fy_id,
        profile.name.as_deref().unwrap_or("no name")
    );

    Ok(())
}
