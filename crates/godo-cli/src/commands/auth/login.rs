use anyhow::Context;
use godo_remote::oauth::OAuthClient;
use godo_store::TokenStore;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthLoginArgs;
use crate::output::output;

#[derive(Serialize)]
struct AuthLoginResponse {
    authenticated: bool,
    token_path: String,
    expires_at: Option<String>,
    refreshable: bool,
}

pub async fn handle(
    args: &AuthLoginArgs,
    flags: &GlobalFlags,
    config: &godo_config::GodoConfig,
) -> anyhow::Result<()> {
    if !config.google.is_configured() {
        anyhow::bail!(
            "auth login: GODO_GOOGLE__CLIENT_ID and GODO_GOOGLE__CLIENT_SECRET are not configured"
        );
    }

    let oauth = OAuthClient::new(&config.google);
    let code = match &args.code {
        Some(code) => code.clone(),
        None => prompt_for_code(&oauth).await?,
    };

    let token = oauth
        .exchange_code(&code)
        .await
        .context("authorization code was not accepted")?;
    let store = TokenStore::new(config.google.token_path_buf());
    store.save(&token)?;

    output(
        &AuthLoginResponse {
            authenticated: true,
            token_path: store.path().display().to_string(),
            expires_at: token.expiry.map(|at| at.to_rfc3339()),
            refreshable: token.refresh_token.is_some(),
        },
        flags.format,
    )
}

async fn prompt_for_code(oauth: &OAuthClient) -> anyhow::Result<String> {
    let state = format!("godo-{}", chrono::Utc::now().timestamp());
    eprintln!("Open this URL in your browser and authorize godo:\n");
    eprintln!("  {}\n", oauth.authorization_url(&state));
    eprintln!("Paste the `code` parameter from the redirect URL:");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let line = lines
        .next_line()
        .await
        .context("failed to read authorization code")?
        .unwrap_or_default();
    let code = line.trim();
    if code.is_empty() {
        anyhow::bail!("auth login: no authorization code entered");
    }
    Ok(code.to_string())
}
