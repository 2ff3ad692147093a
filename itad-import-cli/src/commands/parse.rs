use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::cli_types::InputArgs;

/// Parse the export and list the purchases found.
pub(crate) fn run_parse(input: &InputArgs) -> Result<(), CliError> {
    let records = super::load_records(input)?;

    log::info!(
        "{} {} purchases",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        records.len(),
    );
    crate::log_blank();

    for record in &records {
        let date = record
            .purchased_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".to_string());
        log::info!(
            "  {}  {}  {}  {}",
            date.if_supports_color(Stdout, |t| t.dimmed()),
            record.title,
            record.price,
            record.offer_id.if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    Ok(())
}
