//! Shared match and curate steps for `import` and `sync`.

use itad_import_client::{ItadClient, resolve};
use itad_import_core::{ImportSession, PurchaseRecord, ResolvedMatch, Selection};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::cli_types::CurateArgs;
use crate::commands::prompt_line;
use crate::spinner::with_spinner;

/// Load `records` into a fresh session and resolve them against the catalog.
pub(crate) fn match_records(
    rt: &tokio::runtime::Runtime,
    client: &ItadClient,
    records: Vec<PurchaseRecord>,
    quiet: bool,
) -> Result<ImportSession, CliError> {
    let mut session = ImportSession::new();
    let ticket = session.load(records)?;

    let msg = format!("Looking up {} games on IsThereAnyDeal...", session.records().len());
    let resolution = rt.block_on(with_spinner(quiet, msg, resolve(client, session.records())))?;

    let matches = resolution.matches_for(session.records());
    session.apply_resolution(ticket, matches)?;
    Ok(session)
}

/// Show the matches, apply `--exclude` and optional interactive edits, then
/// freeze the selection.
pub(crate) fn curate(session: &mut ImportSession, args: &CurateArgs) -> Result<(), CliError> {
    print_selection(session.selection());

    let selection = session.selection_mut()?;
    apply_excludes(selection, &args.exclude);

    if args.interactive {
        edit_interactively(selection);
    }

    session.confirm()?;
    Ok(())
}

pub(crate) fn print_selection(selection: &Selection) {
    let via_title = selection
        .matched()
        .filter(|(_, m)| m.method == Some(itad_import_core::LookupMethod::Title))
        .count();

    log::info!(
        "{} purchases: {} matched ({} by title), {} unmatched",
        selection.len(),
        selection.matched_count().if_supports_color(Stdout, |t| t.green()),
        via_title,
        selection.unmatched_count().if_supports_color(Stdout, |t| t.yellow()),
    );
    crate::log_blank();

    for (index, entry) in selection.matches().iter().enumerate() {
        log::info!("{}", format_entry(index, entry));
    }
    crate::log_blank();
}

fn format_entry(index: usize, entry: &ResolvedMatch) -> String {
    let mark = if entry.selected { "[x]" } else { "[ ]" };
    match (&entry.catalog_id, entry.method) {
        (Some(id), Some(method)) => format!(
            "  {} {:>3}. {}  {}",
            mark,
            index + 1,
            entry.source_title,
            format!("{} via {}", id, method).if_supports_color(Stdout, |t| t.dimmed()),
        ),
        (Some(id), None) => format!("  {} {:>3}. {}  {}", mark, index + 1, entry.source_title, id),
        (None, _) => format!(
            "  {} {:>3}. {}  {}",
            mark,
            index + 1,
            entry.source_title,
            "no match".if_supports_color(Stdout, |t| t.yellow()),
        ),
    }
}

/// Deselect the entries whose offer id is listed.
pub(crate) fn apply_excludes(selection: &mut Selection, exclude: &[String]) {
    for offer_id in exclude {
        match selection.position(offer_id) {
            Some(index) if selection.matches()[index].selected => {
                selection.toggle(index);
                log::debug!("Excluded {}", offer_id);
            }
            Some(_) => {}
            None => log::warn!("--exclude: no purchase with offer id {}", offer_id),
        }
    }
}

/// One line of input in the interactive editor.
#[derive(Debug, PartialEq, Eq)]
enum Edit {
    Toggle(Vec<usize>),
    SelectAll,
    SelectNone,
    Done,
    Invalid(String),
}

/// Parse an editor command. Entry numbers are 1-based as printed.
fn parse_edit(line: &str, len: usize) -> Edit {
    let line = line.trim();
    match line.to_lowercase().as_str() {
        "" | "done" | "d" => return Edit::Done,
        "a" | "all" => return Edit::SelectAll,
        "n" | "none" => return Edit::SelectNone,
        _ => {}
    }

    let mut indices = Vec::new();
    for token in line.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        match token.parse::<usize>() {
            Ok(n) if (1..=len).contains(&n) => indices.push(n - 1),
            _ => return Edit::Invalid(token.to_string()),
        }
    }
    Edit::Toggle(indices)
}

fn edit_interactively(selection: &mut Selection) {
    loop {
        let Some(line) = prompt_line(
            "Toggle by number (e.g. 3 7), 'a' select all matched, 'n' none, Enter when done: ",
        ) else {
            log::warn!("No more input; keeping the current selection");
            return;
        };

        match parse_edit(&line, selection.len()) {
            Edit::Done => return,
            Edit::SelectAll => selection.select_all_matched(),
            Edit::SelectNone => selection.deselect_all(),
            Edit::Toggle(indices) => {
                for index in indices {
                    selection.toggle(index);
                }
            }
            Edit::Invalid(token) => {
                log::warn!("Not an entry number: {}", token);
                continue;
            }
        }

        for (index, entry) in selection.matches().iter().enumerate() {
            log::info!("{}", format_entry(index, entry));
        }
        log::info!("{} selected", selection.selected_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itad_import_core::{LookupMethod, Price};

    fn selection() -> Selection {
        let record = |title: &str, offer: &str| PurchaseRecord {
            title: title.into(),
            offer_id: offer.into(),
            order_id: None,
            purchased_at: None,
            price: Price::default(),
        };
        Selection::new(vec![
            ResolvedMatch::new(&record("Alpha", "A"), Some("1".into()), Some(LookupMethod::OfferId)),
            ResolvedMatch::unmatched(&record("Beta", "B")),
            ResolvedMatch::new(&record("Gamma", "C"), Some("3".into()), Some(LookupMethod::Title)),
        ])
    }

    #[test]
    fn parse_edit_commands() {
        assert_eq!(parse_edit("", 3), Edit::Done);
        assert_eq!(parse_edit(" A ", 3), Edit::SelectAll);
        assert_eq!(parse_edit("none", 3), Edit::SelectNone);
        assert_eq!(parse_edit("1 3", 3), Edit::Toggle(vec![0, 2]));
        assert_eq!(parse_edit("2,3", 3), Edit::Toggle(vec![1, 2]));
    }

    #[test]
    fn parse_edit_rejects_out_of_range() {
        assert_eq!(parse_edit("0", 3), Edit::Invalid("0".into()));
        assert_eq!(parse_edit("1 4", 3), Edit::Invalid("4".into()));
        assert_eq!(parse_edit("x", 3), Edit::Invalid("x".into()));
    }

    #[test]
    fn excludes_deselect_by_offer_id() {
        let mut selection = selection();
        apply_excludes(&mut selection, &["C".into(), "B".into(), "missing".into()]);

        let selected: Vec<bool> = selection.matches().iter().map(|m| m.selected).collect();
        assert_eq!(selected, vec![true, false, false]);
    }

    #[test]
    fn format_entry_marks_state() {
        let selection = selection();
        let line = format_entry(1, &selection.matches()[1]);
        assert!(line.contains("[ ]"));
        assert!(line.contains("2. Beta"));
        assert!(line.contains("no match"));

        let line = format_entry(0, &selection.matches()[0]);
        assert!(line.starts_with("  [x]"));
    }
}
