mod actions;
mod config;
mod error;
mod navigation_state;
mod note_entry;
mod prompt;
mod providers;
mod render;
mod search;
mod store;

use crate::config::{default_config_path, Command, Config};
use crate::navigation_state::NavigationState;
use crate::prompt::clear;
use crate::providers::http_provider::HttpNotesProvider;
use crate::providers::provider::NotesProvider;
use crate::render::{DisplayList, Footer, TableDisplay};
use crate::store::{NoteStore, StoreEvent};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::cell::RefCell;
use std::io::{stdin, stdout, Stdin, Stdout, Write};
use std::path::PathBuf;
use std::rc::Rc;
use termion::cursor;
use termion::event::Key;
use termion::input::TermRead;
use termion::raw::{IntoRawMode, RawTerminal};

// Header plus three footer lines.
const CHROME_ROWS: u16 = 4;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Notes resource URL, overriding `endpoint` from the config file
    #[arg(long)]
    endpoint: Option<String>,

    /// Config file to read instead of ~/.noteconfig
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the notes and exit
    #[arg(short, long)]
    list: bool,

    /// Only list notes matching this text
    #[arg(short, long, requires = "list")]
    search: Option<String>,

    /// Create a note with this title; the trailing words are its description
    #[arg(short, long, conflicts_with_all = ["list", "delete"])]
    title: Option<String>,

    /// Delete the note with this id and exit
    #[arg(short, long, conflicts_with = "list")]
    delete: Option<String>,

    /// Print a default config file and exit
    #[arg(long)]
    print_config: bool,

    #[arg(last = true)]
    description: Vec<String>,
}

type StatusLine = Rc<RefCell<Option<String>>>;

fn draw_screen<W: Write>(
    stdout: &mut W,
    list: &DisplayList,
    state: &NavigationState,
    footer: &Footer,
) -> Result<()> {
    let (_, h) = termion::terminal_size()?;
    let table = TableDisplay::new(list, state);
    write!(
        stdout,
        "{hide}{table}{footer}",
        hide = cursor::Hide,
        table = table.draw(),
        footer = table.draw_footer(footer, h),
    )?;
    stdout.flush()?;
    Ok(())
}

fn show_notes_navigation<P: NotesProvider>(
    store: &mut NoteStore<P>,
    status: &StatusLine,
    stdout: &mut RawTerminal<Stdout>,
    stdin: &Stdin,
    config: &Config,
) -> Result<()> {
    let (_, h) = termion::terminal_size()?;
    let mut state = NavigationState::new(h.saturating_sub(CHROME_ROWS));
    let mut query = String::new();
    let help = config.get_keys().help();

    actions::refresh_notes(store, config, stdout)?;
    let mut list = DisplayList::project(store.notes(), &query);
    state.set_list_size(list.showing as u16);

    loop {
        let status_line = status.borrow().clone();
        let footer = Footer {
            query: &query,
            last_synced: store.last_synced(),
            status: status_line.as_deref(),
            help: &help,
        };
        draw_screen(stdout, &list, &state, &footer)?;

        let key = match stdin.keys().next() {
            Some(key) => key.context("Error evaluating keystroke event")?,
            None => break,
        };
        let command = match key {
            Key::Char(c) => config.get_keys().command_for(c),
            Key::Down => Some(Command::Down),
            Key::Up => Some(Command::Up),
            Key::Ctrl('c') => Some(Command::Quit),
            _ => None,
        };

        match command {
            Some(Command::Down) => state.increment_selected_index(1),
            Some(Command::Up) => state.decrement_selected_index(1),
            Some(Command::NewNote) => actions::create_note(store, config, stdout, stdin)?,
            Some(Command::DeleteNote) => {
                if let Some(row) = list.row(state.get_selected_index()) {
                    actions::delete_note(store, row, config, stdout, stdin)?;
                }
            }
            Some(Command::Search) => {
                query = actions::search_notes(&query, stdout, stdin)?;
                state.reset();
            }
            Some(Command::Refresh) => actions::refresh_notes(store, config, stdout)?,
            Some(Command::Quit) => break,
            None => {}
        }

        list = DisplayList::project(store.notes(), &query);
        state.set_list_size(list.showing as u16);
    }

    Ok(())
}

fn print_list<W: Write>(out: &mut W, list: &DisplayList) -> Result<()> {
    for row in &list.rows {
        writeln!(out, "{}\t{}\t{}", row.id, row.title, row.description)?;
    }
    writeln!(out, "{}", list.counters())?;
    Ok(())
}

fn run_once<P: NotesProvider, W: Write>(
    store: &mut NoteStore<P>,
    args: &Args,
    out: &mut W,
) -> Result<bool> {
    if let Some(id) = &args.delete {
        store
            .remove(id)
            .with_context(|| format!("could not delete note {}", id))?;
        writeln!(out, "Deleted {}", id)?;
    } else if let Some(title) = &args.title {
        let description = args.description.join(" ");
        let note = store
            .add(title, &description)
            .context("could not create note")?;
        writeln!(out, "{}", note.id)?;
    } else if args.list {
        store.refresh().context("could not fetch notes")?;
        let query = args.search.as_deref().unwrap_or("");
        print_list(out, &DisplayList::project(store.notes(), query))?;
    } else {
        return Ok(false);
    }

    Ok(true)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", toml::to_string(&Config::generate())?);
        return Ok(());
    }

    let config_file = match &args.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let mut config = Config::load(&config_file)?;
    config.override_endpoint(args.endpoint.clone());

    simple_logging::log_to_file(config.get_log_file(), config.get_log_level())
        .with_context(|| format!("could not open log file {}", config.get_log_file()))?;

    let provider = HttpNotesProvider::new(config.get_endpoint()?, config.get_request_timeout())
        .context("could not build HTTP client")?;
    info!("using notes endpoint {}", provider.base_url());

    let status: StatusLine = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&status);
    let mut store = NoteStore::new(provider).with_listener(Box::new(move |event: &StoreEvent| {
        info!("{}", event);
        *sink.borrow_mut() = Some(event.to_string());
    }));

    if run_once(&mut store, &args, &mut stdout())? {
        return Ok(());
    }

    let mut stdout = stdout()
        .into_raw_mode()
        .context("Could not open stdout. Something went very wrong")?;
    let stdin = stdin();

    let result = show_notes_navigation(&mut store, &status, &mut stdout, &stdin, &config);
    clear(&mut stdout)?;
    stdout.flush()?;
    result
}
