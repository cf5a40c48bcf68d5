//! User configuration: server, export and display settings plus keybindings.
//!
//! Stored as TOML at `$XDG_CONFIG_HOME/review-browser/config.toml`
//! (default `~/.config/review-browser/config.toml`).

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server address used when nothing else is configured.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5001/";

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions in the browser view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Reload,
    NextPage,
    NextSentiment,
    PrevSentiment,
    FocusSearch,
    Export,
    ScrollUp,
    ScrollDown,
    ShowHelp,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the help popup).
    pub const ALL: &[Action] = &[
        Action::Reload,
        Action::NextPage,
        Action::NextSentiment,
        Action::PrevSentiment,
        Action::FocusSearch,
        Action::Export,
        Action::ScrollUp,
        Action::ScrollDown,
        Action::ShowHelp,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::Reload => "Reload Reviews",
            Action::NextPage => "Next Page",
            Action::NextSentiment => "Next Sentiment",
            Action::PrevSentiment => "Prev Sentiment",
            Action::FocusSearch => "Search Similar Words",
            Action::Export => "Export Reviews",
            Action::ScrollUp => "Scroll Up",
            Action::ScrollDown => "Scroll Down",
            Action::ShowHelp => "Show Controls",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the `[bindings]` table.
    fn config_key(self) -> &'static str {
        match self {
            Action::Reload => "reload",
            Action::NextPage => "next_page",
            Action::NextSentiment => "next_sentiment",
            Action::PrevSentiment => "prev_sentiment",
            Action::FocusSearch => "focus_search",
            Action::Export => "export",
            Action::ScrollUp => "scroll_up",
            Action::ScrollDown => "scroll_down",
            Action::ShowHelp => "show_help",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  SHIFT is ignored for printable
    /// keys and back-tab, where it is already part of the key code.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = match event.code {
            KeyCode::Char(_) | KeyCode::BackTab => KeyModifiers::CONTROL | KeyModifiers::ALT,
            _ => KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT,
        };
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    fn modifier_prefix(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s
    }

    /// User-friendly display string (e.g. `"Alt+↓"`, `"Ctrl+r"`, `"n"`).
    pub fn display(&self) -> String {
        let key = match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            other => config_name(other),
        };
        format!("{}{key}", self.modifier_prefix())
    }

    /// Serialise to config-file format (e.g. `"Alt+Down"`, `"Ctrl+r"`, `"n"`).
    fn to_config_string(&self) -> String {
        format!("{}{}", self.modifier_prefix(), config_name(self.code))
    }

    /// Parse a key string like `"Ctrl+r"`, `"Alt+Up"`, `"n"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.trim().to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let key_part = key_part.trim();
        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            // Keep the original case so `N` and `n` stay distinct.
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

fn config_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Up => "Up".into(),
        KeyCode::Down => "Down".into(),
        KeyCode::Left => "Left".into(),
        KeyCode::Right => "Right".into(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::BackTab => "BackTab".into(),
        KeyCode::Backspace => "Backspace".into(),
        KeyCode::Delete => "Delete".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PageUp".into(),
        KeyCode::PageDown => "PageDown".into(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

// ───────────────────────────────────────── config ────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("serialising config: {0}")]
    Serialise(#[from] toml::ser::Error),
}

/// On-disk shape.  Every field is optional so partial files work.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ConfigFile {
    server_url: Option<String>,
    export_dir: Option<PathBuf>,
    top_words_limit: Option<u32>,
    raw_text: Option<bool>,
    bindings: BTreeMap<String, Vec<String>>,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the review server.
    pub server_url: String,
    /// Where exported review files are saved.
    pub export_dir: PathBuf,
    /// Sent as `limit` to `/top_words` when set.
    pub top_words_limit: Option<u32>,
    /// Show server text verbatim instead of stripping control characters.
    pub raw_text: bool,
    pub bindings: HashMap<Action, Vec<KeyBind>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            export_dir: PathBuf::from("."),
            top_words_limit: None,
            raw_text: false,
            bindings: Self::default_bindings(),
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(Reload, vec![KeyBind::new(Char('r'), n)]);
        m.insert(NextPage, vec![KeyBind::new(Char('n'), n), KeyBind::new(Right, n)]);
        m.insert(NextSentiment, vec![KeyBind::new(Char('s'), n), KeyBind::new(Tab, n)]);
        m.insert(PrevSentiment, vec![KeyBind::new(Char('S'), n), KeyBind::new(BackTab, n)]);
        m.insert(FocusSearch, vec![KeyBind::new(Char('/'), n)]);
        m.insert(Export, vec![KeyBind::new(Char('e'), n)]);
        m.insert(ScrollUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(ScrollDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(ShowHelp, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Format the binding list for a given action (e.g. `"n/→"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}: next page | {}: filter | {}: search | {}: export | {}: help",
            self.short_binding(Action::NextPage),
            self.short_binding(Action::NextSentiment),
            self.short_binding(Action::FocusSearch),
            self.short_binding(Action::Export),
            self.short_binding(Action::ShowHelp),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from the default location, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("{err}; using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_file(file))
    }

    fn from_file(file: ConfigFile) -> Self {
        let defaults = Self::default();
        let mut bindings = defaults.bindings;

        for (key, values) in file.bindings {
            let Some(action) = Action::from_config_key(&key) else {
                tracing::warn!("unknown action `{key}` in [bindings]");
                continue;
            };
            let parsed: Vec<KeyBind> = values.iter().filter_map(|v| KeyBind::parse(v)).collect();
            if parsed.len() != values.len() {
                tracing::warn!("ignoring unparseable keys for `{key}`: {values:?}");
            }
            if !parsed.is_empty() {
                bindings.insert(action, parsed);
            }
        }

        Self {
            server_url: file.server_url.unwrap_or(defaults.server_url),
            export_dir: file.export_dir.unwrap_or(defaults.export_dir),
            top_words_limit: file.top_words_limit,
            raw_text: file.raw_text.unwrap_or(defaults.raw_text),
            bindings,
        }
    }

    /// Persist current config to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, self.serialise()?).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    fn serialise(&self) -> Result<String, ConfigError> {
        let bindings = Action::ALL
            .iter()
            .filter_map(|&action| {
                let binds = self.bindings.get(&action)?;
                let keys = binds.iter().map(|b| b.to_config_string()).collect();
                Some((action.config_key().to_string(), keys))
            })
            .collect();
        let file = ConfigFile {
            server_url: Some(self.server_url.clone()),
            export_dir: Some(self.export_dir.clone()),
            top_words_limit: self.top_words_limit,
            raw_text: Some(self.raw_text),
            bindings,
        };
        Ok(format!(
            "# review-browser configuration\n\n{}",
            toml::to_string_pretty(&file)?
        ))
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/review-browser/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("review-browser").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[rstest]
    #[case("Ctrl+r", KeyCode::Char('r'), KeyModifiers::CONTROL)]
    #[case("Alt+Down", KeyCode::Down, KeyModifiers::ALT)]
    #[case("N", KeyCode::Char('N'), KeyModifiers::NONE)]
    #[case("space", KeyCode::Char(' '), KeyModifiers::NONE)]
    #[case("F5", KeyCode::F(5), KeyModifiers::NONE)]
    fn parses_key_strings(#[case] raw: &str, #[case] code: KeyCode, #[case] mods: KeyModifiers) {
        assert_eq!(KeyBind::parse(raw), Some(KeyBind::new(code, mods)));
    }

    #[test]
    fn rejects_unknown_modifier() {
        assert_eq!(KeyBind::parse("Hyper+x"), None);
    }

    #[test]
    fn shifted_character_matches_plain_binding() {
        let config = AppConfig::default();
        assert_eq!(
            config.match_key(key(KeyCode::Char('S'), KeyModifiers::SHIFT)),
            Some(Action::PrevSentiment)
        );
        assert_eq!(
            config.match_key(key(KeyCode::Char('n'), KeyModifiers::NONE)),
            Some(Action::NextPage)
        );
        assert_eq!(config.match_key(key(KeyCode::Char('n'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "server_url = \"http://reviews.local:8080/\"\n\n[bindings]\nnext_page = [\"Ctrl+n\", \"bogus+key\"]\nnot_an_action = [\"x\"]\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.server_url, "http://reviews.local:8080/");
        assert_eq!(config.export_dir, PathBuf::from("."));
        assert!(!config.raw_text);
        assert_eq!(
            config.bindings[&Action::NextPage],
            vec![KeyBind::new(KeyCode::Char('n'), KeyModifiers::CONTROL)]
        );
        assert_eq!(config.display_bindings(Action::Quit), "q");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "server_url = [").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.top_words_limit = Some(25);
        config.raw_text = true;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.top_words_limit, Some(25));
        assert!(loaded.raw_text);
        assert_eq!(loaded.bindings, config.bindings);
    }
}
