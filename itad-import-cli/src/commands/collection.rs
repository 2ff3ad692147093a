use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::spinner::with_spinner;

pub(crate) fn run_games(quiet: bool) -> Result<(), CliError> {
    let (client, _) = super::open_client(true)?;
    let rt = super::runtime()?;

    let games = rt.block_on(with_spinner(
        quiet,
        "Loading collection...",
        client.list_collection(),
    ))?;

    log::info!(
        "{}",
        format!("{} games in collection", games.len()).if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();
    for game in &games {
        log::info!(
            "  {}  {}",
            game.id.if_supports_color(Stdout, |t| t.dimmed()),
            game.title.as_deref().unwrap_or("(untitled)"),
        );
    }
    Ok(())
}

pub(crate) fn run_groups(quiet: bool) -> Result<(), CliError> {
    let (client, _) = super::open_client(true)?;
    let rt = super::runtime()?;

    let groups = rt.block_on(with_spinner(quiet, "Loading groups...", client.list_groups()))?;

    if groups.is_empty() {
        log::info!("No collection groups.");
        return Ok(());
    }
    for group in &groups {
        let visibility = if group.public { "public" } else { "private" };
        log::info!(
            "  {:>5}  {} {}",
            group.id,
            group.title,
            format!("({})", visibility).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}

pub(crate) fn run_new_group(title: &str, public: bool, quiet: bool) -> Result<(), CliError> {
    let (client, _) = super::open_client(true)?;
    let rt = super::runtime()?;

    let group = rt.block_on(with_spinner(
        quiet,
        "Creating group...",
        client.create_group(title, public),
    ))?;

    log::info!(
        "{} Created group {} (id {})",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        group.title.if_supports_color(Stdout, |t| t.cyan()),
        group.id,
    );
    Ok(())
}
