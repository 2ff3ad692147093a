use itad_import_client::add_to_collection;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::cli_types::{CurateArgs, InputArgs};
use crate::commands::curate::{curate, match_records};
use crate::spinner::with_spinner;

/// Parse, match, curate, then add the selection to the collection.
pub(crate) fn run_import(input: &InputArgs, args: &CurateArgs, quiet: bool) -> Result<(), CliError> {
    super::check_prompts(input, args)?;
    let records = super::load_records(input)?;
    let (client, _) = super::open_client(true)?;
    let rt = super::runtime()?;

    let mut session = match_records(&rt, &client, records, quiet)?;
    curate(&mut session, args)?;

    let ids: Vec<String> = session
        .confirmed()
        .iter()
        .filter_map(|m| m.catalog_id.clone())
        .collect();

    log::info!("{} games will be added to your collection.", ids.len());
    if !args.yes && !super::confirm("Continue?") {
        log::info!("Aborted.");
        return Ok(());
    }

    let ticket = session.begin_commit()?;
    let outcome = rt.block_on(with_spinner(
        quiet,
        "Adding to collection...",
        add_to_collection(&client, &ids),
    ))?;
    session.finish(ticket, outcome)?;

    log::info!(
        "{} Collection updated: {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        outcome,
    );
    Ok(())
}
