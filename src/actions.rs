use crate::config::Config;
use crate::error::{NotesError, ValidationError};
use crate::prompt::{flash_warning, prompt, prompt_yesno};
use crate::providers::provider::NotesProvider;
use crate::render::Row;
use crate::store::NoteStore;

use anyhow::Result;
use log::{debug, error};
use std::io::{Stdin, Stdout};
use termion::raw::RawTerminal;

/// What to tell the user when a store operation is refused or fails.
pub fn failure_message(err: &NotesError) -> String {
    match err {
        NotesError::Validation(ValidationError::EmptyTitle) => {
            String::from("Note title empty. Nothing was saved.")
        }
        NotesError::Validation(ValidationError::EmptyDescription) => {
            String::from("Note description empty. Nothing was saved.")
        }
        NotesError::NotFound { id } => {
            format!("Note {} no longer exists on the server. Refresh to update.", id)
        }
        NotesError::Remote(remote) => format!("Could not reach the notes server: {}", remote),
    }
}

fn report<W: std::io::Write>(stdout: &mut W, config: &Config, err: &NotesError) -> Result<()> {
    match err {
        NotesError::Validation(_) => debug!("{}", err),
        _ => error!("{}", err),
    }
    flash_warning(stdout, &failure_message(err), config.get_flash_duration())
}

pub fn refresh_notes<P: NotesProvider>(
    store: &mut NoteStore<P>,
    config: &Config,
    stdout: &mut RawTerminal<Stdout>,
) -> Result<()> {
    if let Err(err) = store.refresh() {
        report(stdout, config, &err)?;
    }
    Ok(())
}

pub fn create_note<P: NotesProvider>(
    store: &mut NoteStore<P>,
    config: &Config,
    stdout: &mut RawTerminal<Stdout>,
    stdin: &Stdin,
) -> Result<()> {
    let title = prompt(stdout, stdin, "Title: ", None)?;
    // Bail before asking for a description that could never be saved.
    if title.is_empty() {
        return report(stdout, config, &ValidationError::EmptyTitle.into());
    }
    let description = prompt(stdout, stdin, "Description: ", None)?;

    if let Err(err) = store.add(&title, &description) {
        report(stdout, config, &err)?;
    }
    Ok(())
}

/// Ask before deleting the selected row.
pub fn delete_note<P: NotesProvider>(
    store: &mut NoteStore<P>,
    selected: &Row,
    config: &Config,
    stdout: &mut RawTerminal<Stdout>,
    stdin: &Stdin,
) -> Result<()> {
    let affirmative = prompt_yesno(
        stdout,
        stdin,
        &format!("Are you sure you want to delete '{}'?", selected.title),
    )?;
    if !affirmative {
        return Ok(());
    }

    if let Err(err) = store.remove(&selected.id) {
        report(stdout, config, &err)?;
    }
    Ok(())
}

/// Prompt for a new search query. An empty answer clears the search.
pub fn search_notes(
    current_query: &str,
    stdout: &mut RawTerminal<Stdout>,
    stdin: &Stdin,
) -> Result<String> {
    let query = prompt(stdout, stdin, "Search: ", Some(current_query))?;
    debug!("search query set to {:?}", query);
    Ok(query)
}
