use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use itad_import_client::{CredentialSource, Credentials, DEFAULT_REDIRECT_URI};

use crate::CliError;

fn mask_value(s: &str) -> String {
    let prefix: String = s.chars().take(2).collect();
    if s.chars().count() <= 2 {
        "****".to_string()
    } else {
        format!("{}****", prefix)
    }
}

/// Show current credentials and their sources.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = itad_import_client::config_path();
    let sources = itad_import_client::credential_sources();
    let creds = Credentials::load();

    log::info!(
        "{}",
        "IsThereAnyDeal Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    match &path {
        Some(p) if p.exists() => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    crate::log_blank();

    let shown = |source: &CredentialSource, value: Option<&str>, is_secret: bool| match source {
        CredentialSource::Missing => None,
        _ => value.map(|v| if is_secret { mask_value(v) } else { v.to_string() }),
    };

    let fields: &[(&str, &CredentialSource, Option<String>)] = &[
        (
            "client_id",
            &sources.client_id,
            shown(&sources.client_id, creds.client_id.as_deref(), false),
        ),
        (
            "client_secret",
            &sources.client_secret,
            shown(&sources.client_secret, creds.client_secret.as_deref(), true),
        ),
        (
            "api_key",
            &sources.api_key,
            shown(&sources.api_key, creds.api_key.as_deref(), true),
        ),
        (
            "redirect_uri",
            &sources.redirect_uri,
            shown(&sources.redirect_uri, Some(creds.redirect_uri.as_str()), false),
        ),
    ];

    for (name, source, value) in fields {
        let source_str = format!("({})", source);
        match value {
            Some(v) => {
                log::info!(
                    "  {} {} {}",
                    format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
                    v,
                    source_str.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
            None => {
                log::info!(
                    "  {} {} {}",
                    format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
                    "not set".if_supports_color(Stdout, |t| t.yellow()),
                    source_str.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
        }
    }

    Ok(())
}

/// Interactively set up credentials.
pub(crate) fn run_config_setup() -> Result<(), CliError> {
    println!(
        "{}",
        "IsThereAnyDeal Credential Setup".if_supports_color(Stdout, |t| t.bold()),
    );
    println!(
        "  {}",
        "Register an app at https://isthereanydeal.com/apps/my/ to get these values."
            .if_supports_color(Stdout, |t| t.dimmed()),
    );
    println!();

    let existing = Credentials::load();

    let read_field = |name: &str, current: Option<&str>| -> Option<String> {
        let prompt = match current {
            Some(def) => format!("  {} [{}]: ", name, def),
            None => format!("  {}: ", name),
        };
        super::prompt_line(&prompt)
            .filter(|v| !v.is_empty())
            .or_else(|| current.map(str::to_string))
    };

    let client_id = read_field("client_id", existing.client_id.as_deref());
    let client_secret = read_field("client_secret", existing.client_secret.as_deref());
    let api_key = read_field("api_key", existing.api_key.as_deref());
    let redirect_uri = read_field("redirect_uri", Some(existing.redirect_uri.as_str()))
        .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string());

    for (name, value) in [
        ("client_id", &client_id),
        ("client_secret", &client_secret),
        ("api_key", &api_key),
    ] {
        if value.is_none() {
            println!(
                "    {}",
                format!("{} left empty; some commands will not work until it is set.", name)
                    .if_supports_color(Stdout, |t| t.yellow()),
            );
        }
    }

    let creds = Credentials {
        client_id,
        client_secret,
        api_key,
        redirect_uri,
    };

    let path = itad_import_client::save_to_file(&creds)
        .map_err(|e| CliError::config(format!("Failed to save credentials: {}", e)))?;

    println!();
    log::info!(
        "{} Credentials saved to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );

    Ok(())
}

/// Print the credentials file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    match itad_import_client::config_path() {
        Some(path) => log::info!("{}", path.display()),
        None => {
            return Err(CliError::config("Could not determine config directory"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_keeps_two_chars() {
        assert_eq!(mask_value("abcdef"), "ab****");
        assert_eq!(mask_value("ab"), "****");
        assert_eq!(mask_value(""), "****");
        assert_eq!(mask_value("äöü"), "äö****");
    }
}
