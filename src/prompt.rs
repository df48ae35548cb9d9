use anyhow::{Context, Result};
use std::io::{BufRead, Stdin, Stdout, Write};
use std::thread;
use std::time::Duration;
use termion::cursor;
use termion::event::Key;
use termion::input::TermRead;
use termion::raw::RawTerminal;

pub fn clear<W: Write>(stdout: &mut W) -> Result<()> {
    write!(
        stdout,
        "{}{}{}",
        termion::clear::All,
        cursor::Goto(1, 1),
        cursor::Show
    )?;

    Ok(())
}

/// Read a line in cooked mode so the user can edit what they type.
/// `current` is shown after the label, e.g. the active search query.
pub fn prompt(
    stdout: &mut RawTerminal<Stdout>,
    stdin: &Stdin,
    label: &str,
    current: Option<&str>,
) -> Result<String> {
    stdout.suspend_raw_mode()?;
    clear(stdout)?;
    if let Some(current) = current.filter(|c| !c.is_empty()) {
        writeln!(stdout, "(currently \"{}\")", current)?;
    }
    write!(stdout, "{}", label)?;
    stdout.flush()?;

    let answer = read_answer(&mut stdin.lock());
    stdout.activate_raw_mode()?;
    answer
}

/// One line of input with its line ending removed. Other whitespace is kept
/// as typed.
pub fn read_answer<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut buffer = String::new();
    reader
        .read_line(&mut buffer)
        .context("could not read from stdin")?;
    Ok(buffer.trim_end_matches(['\n', '\r']).to_string())
}

pub fn prompt_yesno(stdout: &mut RawTerminal<Stdout>, stdin: &Stdin, question: &str) -> Result<bool> {
    clear(stdout)?;
    write!(stdout, "{} [y/N] ", question)?;
    stdout.flush()?;

    for event in stdin.keys() {
        let key = event.with_context(|| "Error evaluating keystroke event")?;
        let value = match key {
            Key::Char('y') | Key::Char('Y') => true,
            Key::Char('n') | Key::Char('N') | Key::Char('\n') | Key::Esc => false,
            _ => continue,
        };

        return Ok(value);
    }

    Ok(false)
}

/// Show `warning_text` on a cleared screen for `duration`.
pub fn flash_warning<W: Write>(stdout: &mut W, warning_text: &str, duration: Duration) -> Result<()> {
    clear(stdout)?;
    write!(stdout, "{}", warning_text)?;
    stdout.flush()?;
    thread::sleep(duration);
    Ok(())
}
