//! Plain-text rendering of the shell views.

use std::io::{self, Write};

use crate::domain::ports::{Navigator, SessionStore, UserDirectory};
use crate::domain::{EditBuffer, StatusMessage, UserRecord, UsersViewModel};

/// Prompt printed whenever the login route becomes active.
pub const LOGIN_PROMPT: &str = "Not signed in. Use `login <token> [--ttl <secs>]` or `quit`.";

/// Print the page header, the filtered records, and any edit in progress.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn render_users<D, S, N>(
    out: &mut impl Write,
    view: &UsersViewModel<D, S, N>,
) -> io::Result<()>
where
    D: UserDirectory + ?Sized + 'static,
    S: SessionStore + ?Sized,
    N: Navigator + ?Sized,
{
    let loading = if view.is_loading() { " (loading)" } else { "" };
    writeln!(
        out,
        "Users - page {} of {}{loading}",
        view.page(),
        view.total_pages()
    )?;
    if !view.search_term().is_empty() {
        writeln!(out, "Filter: \"{}\"", view.search_term())?;
    }

    let rows = view.projection();
    if rows.is_empty() {
        writeln!(out, "  (no users)")?;
    }
    for record in rows {
        render_record(out, record)?;
    }
    render_edit(out, view.edit_buffer())
}

/// Print the status banner, if there is one.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn render_status(out: &mut impl Write, status: Option<&StatusMessage>) -> io::Result<()> {
    match status {
        Some(status) => writeln!(out, "{status}"),
        None => Ok(()),
    }
}

fn render_record(out: &mut impl Write, record: &UserRecord) -> io::Result<()> {
    writeln!(
        out,
        "  {:>4}  {:<28} {}",
        record.id.get(),
        record.display_name(),
        record.email
    )
}

/// Print the edit in progress, if there is one.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn render_edit(out: &mut impl Write, edit: &EditBuffer) -> io::Result<()> {
    let EditBuffer::Editing { target, fields } = edit else {
        return Ok(());
    };
    writeln!(
        out,
        "Editing #{target}: first=\"{}\" last=\"{}\" email=\"{}\" (`set`, then `save`)",
        fields.first_name, fields.last_name, fields.email
    )
}
