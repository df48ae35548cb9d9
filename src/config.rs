use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use log::LevelFilter;
use toml::Table;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = ".noteconfig";

fn _expand_homedir(path: String) -> Result<String> {
    if path.starts_with('~') {
        let home_dir = home::home_dir().context("could not evaluate home directory")?;
        let home_dir = home_dir
            .to_str()
            .context("home directory is not valid unicode")?;
        Ok(path.replacen('~', home_dir, 1))
    } else {
        Ok(path)
    }
}

/// `~/.noteconfig`
pub fn default_config_path() -> Result<PathBuf> {
    let mut config_file = home::home_dir().context("unable to find home directory")?;
    config_file.push(DEFAULT_CONFIG_FILE);
    Ok(config_file)
}

/// Everything a key press can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Down,
    Up,
    NewNote,
    DeleteNote,
    Search,
    Refresh,
    Quit,
}

/// The single place keys are bound to commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    bindings: Vec<(char, Command)>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            bindings: vec![
                ('j', Command::Down),
                ('k', Command::Up),
                ('n', Command::NewNote),
                ('D', Command::DeleteNote),
                ('/', Command::Search),
                ('r', Command::Refresh),
                ('q', Command::Quit),
            ],
        }
    }
}

impl KeyBindings {
    const NAMES: [(&'static str, Command); 7] = [
        ("down", Command::Down),
        ("up", Command::Up),
        ("new_note", Command::NewNote),
        ("delete_note", Command::DeleteNote),
        ("search", Command::Search),
        ("refresh", Command::Refresh),
        ("quit", Command::Quit),
    ];

    fn from_table(keys: &Table) -> Result<Self> {
        let mut bindings = KeyBindings::default();

        for (name, value) in keys {
            let command = Self::NAMES
                .iter()
                .find(|(known, _)| *known == name.as_str())
                .map(|(_, command)| *command)
                .ok_or_else(|| anyhow!("unknown key binding '{}'", name))?;

            let key = value
                .as_str()
                .context(format!("key binding '{}' must be a string", name))?;
            let mut chars = key.chars();
            let key = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => bail!("key binding '{}' must be a single character", name),
            };

            for binding in bindings.bindings.iter_mut() {
                if binding.1 == command {
                    binding.0 = key;
                }
            }
        }

        let mut keys: Vec<char> = bindings.bindings.iter().map(|(key, _)| *key).collect();
        keys.sort_unstable();
        keys.dedup();
        if keys.len() != bindings.bindings.len() {
            bail!("two commands are bound to the same key");
        }

        Ok(bindings)
    }

    pub fn command_for(&self, key: char) -> Option<Command> {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, command)| *command)
    }

    pub fn key_for(&self, command: Command) -> char {
        self.bindings
            .iter()
            .find(|(_, bound)| *bound == command)
            .map(|(key, _)| *key)
            .unwrap_or(' ')
    }

    pub fn help(&self) -> String {
        format!(
            "New note [{}]; Delete note [{}]; Search [{}]; Refresh [{}]; Quit [{}]",
            self.key_for(Command::NewNote),
            self.key_for(Command::DeleteNote),
            self.key_for(Command::Search),
            self.key_for(Command::Refresh),
            self.key_for(Command::Quit),
        )
    }
}

pub struct Config {
    endpoint: Option<String>,
    request_timeout: Duration,
    log_file: String,
    log_level: LevelFilter,
    flash_duration: Duration,
    keys: KeyBindings,
}

impl Config {
    pub fn new(config: Table) -> Result<Self> {
        let endpoint = match config.get("endpoint") {
            Some(value) => Some(
                value
                    .as_str()
                    .context("endpoint must be a string")?
                    .to_owned(),
            ),
            None => None,
        };

        let default_timeout = Value::Integer(10);
        let request_timeout = config
            .get("request_timeout_secs")
            .unwrap_or(&default_timeout)
            .as_integer()
            .filter(|secs| *secs > 0)
            .context("request_timeout_secs must be a positive integer")?;

        let default_log_file = Value::String("~/.remote_notes.log".to_string());
        let log_file = config
            .get("log_file")
            .unwrap_or(&default_log_file)
            .as_str()
            .context("log_file must be a string")?;

        let default_log_level = Value::String("info".to_string());
        let log_level = config
            .get("log_level")
            .unwrap_or(&default_log_level)
            .as_str()
            .context("log_level must be a string")?;
        let log_level = log_level
            .parse::<LevelFilter>()
            .with_context(|| format!("unknown log_level '{}'", log_level))?;

        let default_flash = Value::Integer(1000);
        let flash_duration = config
            .get("flash_duration_ms")
            .unwrap_or(&default_flash)
            .as_integer()
            .filter(|ms| *ms >= 0)
            .context("flash_duration_ms must be a non-negative integer")?;

        let keys = match config.get("keys") {
            Some(keys) => KeyBindings::from_table(keys.as_table().context("keys must be a table")?)?,
            None => KeyBindings::default(),
        };

        Ok(Config {
            endpoint,
            request_timeout: Duration::from_secs(request_timeout as u64),
            log_file: _expand_homedir(log_file.to_owned())?,
            log_level,
            flash_duration: Duration::from_millis(flash_duration as u64),
            keys,
        })
    }

    /// Read and parse a TOML config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let table = match std::fs::read_to_string(path) {
            Ok(contents) => contents
                .parse::<Table>()
                .context("Unable to parse config file. Make sure it is valid toml.")?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Table::new(),
            Err(err) => {
                return Err(err).with_context(|| format!("could not read {}", path.display()))
            }
        };

        Config::new(table)
    }

    pub fn generate() -> Table {
        let mut table = Table::new();
        table.insert(
            String::from("endpoint"),
            Value::String(String::from("https://crudcrud.com/api/<your-token>/notes")),
        );
        table.insert(String::from("request_timeout_secs"), Value::Integer(10));
        table.insert(
            String::from("log_file"),
            Value::String(String::from("~/.remote_notes.log")),
        );
        table.insert(String::from("log_level"), Value::String(String::from("info")));
        table.insert(String::from("flash_duration_ms"), Value::Integer(1000));

        let mut keys = Table::new();
        let defaults = KeyBindings::default();
        for (name, command) in KeyBindings::NAMES {
            keys.insert(
                name.to_string(),
                Value::String(defaults.key_for(command).to_string()),
            );
        }
        table.insert(String::from("keys"), Value::Table(keys));

        table
    }

    /// A command line endpoint wins over the file.
    pub fn override_endpoint(&mut self, endpoint: Option<String>) {
        if endpoint.is_some() {
            self.endpoint = endpoint;
        }
    }

    pub fn get_endpoint(&self) -> Result<&str> {
        self.endpoint
            .as_deref()
            .filter(|endpoint| !endpoint.is_empty())
            .context("no endpoint configured. Set `endpoint` in ~/.noteconfig or pass --endpoint")
    }

    pub fn get_request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn get_log_file(&self) -> &str {
        &self.log_file
    }

    pub fn get_log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn get_flash_duration(&self) -> Duration {
        self.flash_duration
    }

    pub fn get_keys(&self) -> &KeyBindings {
        &self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Config> {
        Config::new(source.parse::<Table>().unwrap())
    }

    #[test]
    fn empty_table_uses_defaults() {
        let config = Config::new(Table::new()).unwrap();
        assert!(config.get_endpoint().is_err());
        assert_eq!(config.get_request_timeout(), Duration::from_secs(10));
        assert_eq!(config.get_log_level(), LevelFilter::Info);
        assert_eq!(config.get_flash_duration(), Duration::from_millis(1000));
        assert!(config.get_log_file().ends_with(".remote_notes.log"));
        assert!(!config.get_log_file().starts_with('~'));
        assert_eq!(config.get_keys(), &KeyBindings::default());
    }

    #[test]
    fn reads_every_setting() {
        let config = parse(
            r#"
            endpoint = "http://localhost:3000/notes"
            request_timeout_secs = 3
            log_file = "/tmp/notes.log"
            log_level = "debug"
            flash_duration_ms = 0

            [keys]
            quit = "x"
            down = "J"
            "#,
        )
        .unwrap();

        assert_eq!(config.get_endpoint().unwrap(), "http://localhost:3000/notes");
        assert_eq!(config.get_request_timeout(), Duration::from_secs(3));
        assert_eq!(config.get_log_file(), "/tmp/notes.log");
        assert_eq!(config.get_log_level(), LevelFilter::Debug);
        assert_eq!(config.get_flash_duration(), Duration::ZERO);
        assert_eq!(config.get_keys().command_for('x'), Some(Command::Quit));
        assert_eq!(config.get_keys().command_for('q'), None);
        assert_eq!(config.get_keys().command_for('J'), Some(Command::Down));
        assert_eq!(config.get_keys().command_for('k'), Some(Command::Up));
    }

    #[test]
    fn cli_endpoint_overrides_file() {
        let mut config = parse(r#"endpoint = "http://a/notes""#).unwrap();
        config.override_endpoint(None);
        assert_eq!(config.get_endpoint().unwrap(), "http://a/notes");
        config.override_endpoint(Some(String::from("http://b/notes")));
        assert_eq!(config.get_endpoint().unwrap(), "http://b/notes");
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(parse("request_timeout_secs = 0").is_err());
        assert!(parse(r#"log_level = "loud""#).is_err());
        assert!(parse("endpoint = 5").is_err());
        assert!(parse("[keys]\nquit = \"qq\"").is_err());
        assert!(parse("[keys]\njump = \"g\"").is_err());
        assert!(parse("[keys]\nquit = \"j\"").is_err());
    }

    #[test]
    fn generated_config_round_trips() {
        let generated = toml::to_string(&Config::generate()).unwrap();
        let config = parse(&generated).unwrap();
        assert_eq!(config.get_keys(), &KeyBindings::default());
        assert!(config.get_endpoint().is_ok());
    }

    #[test]
    fn help_lists_bound_keys() {
        let help = KeyBindings::default().help();
        assert!(help.contains("New note [n]"));
        assert!(help.contains("Quit [q]"));
    }
}
