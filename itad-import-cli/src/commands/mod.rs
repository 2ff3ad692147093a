pub(crate) mod auth;
pub(crate) mod collection;
pub(crate) mod config;
pub(crate) mod curate;
pub(crate) mod import;
pub(crate) mod parse;
pub(crate) mod search;
pub(crate) mod sync;

use std::io::{Read, Write};
use std::path::Path;

use itad_import_client::{ApiError, Credentials, ItadClient, SessionTokens, store};
use itad_import_core::{PurchaseRecord, load_purchases};

use crate::CliError;
use crate::cli_types::{CurateArgs, InputArgs};

/// Single-threaded runtime; remote calls are strictly sequential.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::runtime(format!("Failed to create tokio runtime: {}", e)))
}

/// Raw export text from a file, stdin, or the cache.
pub(crate) fn read_input(input: &InputArgs) -> Result<String, CliError> {
    if input.cached {
        return store::load_cached_input()?.ok_or_else(|| {
            CliError::other("No cached export yet. Run 'itad-import parse <FILE>' first")
        });
    }

    match input.file.as_deref() {
        Some(_) if reads_stdin(input) => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            CliError::other(format!("Cannot read {}: {}", path.display(), e))
        }),
        None => Err(CliError::other(
            "No export given. Pass a file, '-' for stdin, or --cached",
        )),
    }
}

fn reads_stdin(input: &InputArgs) -> bool {
    !input.cached && input.file.as_deref() == Some(Path::new("-"))
}

/// Prompts read stdin too, so an export piped in leaves nothing to answer them.
/// Such runs must skip every prompt.
pub(crate) fn check_prompts(input: &InputArgs, curate: &CurateArgs) -> Result<(), CliError> {
    if reads_stdin(input) && (curate.interactive || !curate.yes) {
        return Err(CliError::other(
            "The export is read from stdin, so prompts cannot be answered. \
             Pass --yes without --interactive, or give the export as a file",
        ));
    }
    Ok(())
}

/// Parse the export and remember it for `--cached`.
pub(crate) fn load_records(input: &InputArgs) -> Result<Vec<PurchaseRecord>, CliError> {
    let raw = read_input(input)?;
    let records = load_purchases(&raw)?;

    if !input.cached {
        match store::cache_input(&raw) {
            Ok(path) => log::debug!("Cached export at {}", path.display()),
            Err(e) => log::warn!("Could not cache export: {}", e),
        }
    }

    Ok(records)
}

/// Client built from the configured credentials and any stored login.
pub(crate) fn open_client(require_login: bool) -> Result<(ItadClient, SessionTokens), CliError> {
    let creds = Credentials::load();
    let tokens = store::load_session()?;
    let client = ItadClient::from_credentials(&creds, tokens.access_token().map(String::from))?;

    if require_login && !client.is_authenticated() {
        return Err(ApiError::Unauthenticated.into());
    }
    Ok((client, tokens))
}

/// Print `prompt` and read one line. `None` on end of input.
pub(crate) fn prompt_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = std::io::stdout().flush();

    let mut input = String::new();
    match std::io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim().to_string()),
    }
}

/// Yes/no question defaulting to no.
pub(crate) fn confirm(question: &str) -> bool {
    match prompt_line(&format!("{} [y/N]: ", question)) {
        Some(answer) => matches!(answer.to_lowercase().as_str(), "y" | "yes"),
        None => {
            log::warn!("No answer on stdin; treating it as no");
            false
        }
    }
}
