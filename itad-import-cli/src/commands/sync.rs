use itad_import_client::{ItadClient, SessionTokens, link_profile, store, sync_category};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::cli_types::{CurateArgs, InputArgs};
use crate::commands::curate::{curate, match_records};
use crate::spinner::with_spinner;

/// Parse, match, curate, then replace the linked category with the selection.
pub(crate) fn run_sync(input: &InputArgs, args: &CurateArgs, quiet: bool) -> Result<(), CliError> {
    super::check_prompts(input, args)?;
    let records = super::load_records(input)?;
    let (client, mut tokens) = super::open_client(true)?;
    let rt = super::runtime()?;

    let mut session = match_records(&rt, &client, records, quiet)?;
    curate(&mut session, args)?;

    log::warn!(
        "{}",
        "Sync replaces the whole Epic category on IsThereAnyDeal. \
         Games synced earlier that are not in this selection will be removed."
            .if_supports_color(Stdout, |t| t.yellow()),
    );
    log::info!("{} games will be synced.", session.confirmed().len());
    if !args.yes && !super::confirm("Replace the category?") {
        log::info!("Aborted.");
        return Ok(());
    }

    if tokens.sync_token().is_none() {
        log::info!("Sync profile not linked yet; linking now.");
        rt.block_on(link_and_store(&client, &mut tokens, quiet))?;
    }

    let ticket = session.begin_commit()?;
    let outcome = rt.block_on(with_spinner(
        quiet,
        "Syncing category...",
        sync_category(&client, tokens.sync_token(), session.confirmed()),
    ))?;
    session.finish(ticket, outcome)?;

    log::info!(
        "{} Category synced: {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        outcome,
    );
    Ok(())
}

/// Link the sync profile and store its token.
pub(crate) fn run_link(quiet: bool) -> Result<(), CliError> {
    let (client, mut tokens) = super::open_client(true)?;
    let rt = super::runtime()?;

    rt.block_on(link_and_store(&client, &mut tokens, quiet))?;

    log::info!(
        "{} Sync profile linked",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
    );
    Ok(())
}

async fn link_and_store(
    client: &ItadClient,
    tokens: &mut SessionTokens,
    quiet: bool,
) -> Result<(), CliError> {
    let token = with_spinner(quiet, "Linking sync profile...", link_profile(client)).await?;
    tokens.sync_token = Some(token);
    let path = store::save_session(tokens)?;
    log::debug!("Stored sync token in {}", path.display());
    Ok(())
}
