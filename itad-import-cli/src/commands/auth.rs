use chrono::Utc;
use itad_import_client::{
    Credentials, Pkce, authorization_url, exchange_code, generate_state, parse_callback, store,
};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::spinner::with_spinner;

/// Authorization-code login with PKCE. The user opens the printed URL and
/// pastes back the address the browser was redirected to.
pub(crate) fn run_login(quiet: bool) -> Result<(), CliError> {
    let creds = Credentials::load();
    let config = creds.oauth_config()?;

    let pkce = Pkce::generate();
    let state = generate_state();
    let url = authorization_url(&config, &state, &pkce.challenge)?;

    println!("Open this URL in your browser and approve access:");
    println!();
    println!("  {}", url.if_supports_color(Stdout, |t| t.cyan()));
    println!();
    println!(
        "{}",
        format!(
            "You will be sent to {}. The page may not load; copy the full address from the browser.",
            config.redirect_uri
        )
        .if_supports_color(Stdout, |t| t.dimmed()),
    );

    let callback = super::prompt_line("Redirected URL: ")
        .filter(|line| !line.is_empty())
        .ok_or_else(|| CliError::other("No redirect URL entered"))?;
    let code = parse_callback(&callback, &state)?;

    let rt = super::runtime()?;
    let token = rt.block_on(with_spinner(
        quiet,
        "Exchanging authorization code...",
        exchange_code(&config, &code, &pkce.verifier),
    ))?;

    let mut tokens = store::load_session().unwrap_or_else(|e| {
        log::warn!("Replacing unreadable session file: {}", e);
        Default::default()
    });
    tokens.set_access_token(&token, Utc::now());
    let path = store::save_session(&tokens)?;

    log::info!(
        "{} Logged in to IsThereAnyDeal",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
    );
    log::debug!("Session stored in {}", path.display());
    if let Some(expires) = tokens.expires_at {
        log::info!("  Token expires {}", expires.format("%Y-%m-%d %H:%M UTC"));
    }
    Ok(())
}

/// Forget the access token and the sync profile token.
pub(crate) fn run_logout() -> Result<(), CliError> {
    if store::clear_session()? {
        log::info!(
            "{} Logged out",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!("Not logged in.");
    }
    Ok(())
}

pub(crate) fn run_status() -> Result<(), CliError> {
    let tokens = store::load_session()?;
    let creds = Credentials::load();

    log::info!(
        "{}",
        "IsThereAnyDeal Session".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    match (tokens.access_token(), tokens.expires_at) {
        (Some(_), Some(expires)) => log::info!(
            "  Login:     {} (until {})",
            "logged in".if_supports_color(Stdout, |t| t.green()),
            expires.format("%Y-%m-%d %H:%M UTC"),
        ),
        (Some(_), None) => log::info!(
            "  Login:     {}",
            "logged in".if_supports_color(Stdout, |t| t.green()),
        ),
        (None, Some(_)) => log::info!(
            "  Login:     {}",
            "expired, run 'itad-import login'".if_supports_color(Stdout, |t| t.yellow()),
        ),
        (None, None) => log::info!(
            "  Login:     {}",
            "not logged in".if_supports_color(Stdout, |t| t.yellow()),
        ),
    }

    if tokens.sync_token().is_some() {
        log::info!(
            "  Sync:      {}",
            "linked".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Sync:      {}",
            "not linked".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    if creds.api_key.is_some() {
        log::info!(
            "  API key:   {}",
            "set".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  API key:   {}",
            "missing, run 'itad-import config setup'".if_supports_color(Stdout, |t| t.yellow()),
        );
    }

    Ok(())
}
