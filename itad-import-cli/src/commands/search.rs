use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::spinner::with_spinner;

/// Search the catalog, e.g. to look up a title the importer could not match.
pub(crate) fn run_search(title: &str, limit: usize, quiet: bool) -> Result<(), CliError> {
    let (client, _) = super::open_client(false)?;
    let rt = super::runtime()?;

    let results = rt.block_on(with_spinner(
        quiet,
        format!("Searching for \"{}\"...", title),
        client.search_games(title, limit),
    ))?;

    if results.is_empty() {
        log::info!("No results for \"{}\"", title);
        return Ok(());
    }

    for result in &results {
        let kind = result.kind.as_deref().unwrap_or("game");
        log::info!(
            "  {}  {} {}",
            result.id.if_supports_color(Stdout, |t| t.dimmed()),
            result.title,
            format!("({})", kind).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}
