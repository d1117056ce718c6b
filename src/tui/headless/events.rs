//! Event DSL parser for headless mode.
//!
//! Parses event strings like "key:f5", "type:SELECT 1", "wait:100ms" into
//! executable events. Events are separated by newlines or commas; a comma only
//! separates events when the text after it starts a new event, so
//! `type:SELECT 1, 2` types the whole query.

use super::HeadlessState;
use crate::error::{ScratchError, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fmt;
use std::time::Duration;

/// Event type names accepted before the first colon.
const EVENT_TYPES: &[&str] = &["key", "type", "wait", "resize", "snapshot", "assert"];

/// An assertion to check against the screen or state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assertion {
    /// Screen contains text (case-insensitive).
    Contains(String),
    /// Screen contains text (case-sensitive).
    ContainsExact(String),
    /// Screen does not contain text.
    NotContains(String),
    /// Screen matches regex pattern.
    Matches(String),
    /// State field equals value.
    StateEquals { field: String, value: String },
    /// State field comparison (>=, <=, >, <).
    StateCompare {
        field: String,
        op: String,
        value: String,
    },
}

impl Assertion {
    /// Checks the assertion against the screen and a state snapshot.
    pub fn check(&self, screen: &str, state: &HeadlessState) -> bool {
        match self {
            Self::Contains(text) => screen.to_lowercase().contains(&text.to_lowercase()),
            Self::ContainsExact(text) => screen.contains(text),
            Self::NotContains(text) => !screen.to_lowercase().contains(&text.to_lowercase()),
            Self::Matches(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(screen))
                .unwrap_or(false),
            Self::StateEquals { field, value } => {
                state.field(field).as_deref() == Some(value.as_str())
            }
            Self::StateCompare { field, op, value } => {
                compare_values(state.field(field).as_deref(), op, value)
            }
        }
    }
}

/// Compares values using the given operator.
fn compare_values(actual: Option<&str>, op: &str, expected: &str) -> bool {
    let Some(actual) = actual else {
        return false;
    };

    if let (Ok(a), Ok(e)) = (actual.parse::<i64>(), expected.parse::<i64>()) {
        return match op {
            ">=" => a >= e,
            "<=" => a <= e,
            ">" => a > e,
            "<" => a < e,
            _ => false,
        };
    }

    false
}

/// A parsed event that can be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press event.
    Key(KeyEvent),
    /// Type text into the focused panel.
    Type(String),
    /// Wait for a duration.
    Wait(Duration),
    /// Resize the terminal.
    Resize(u16, u16),
    /// Take a named snapshot.
    Snapshot(String),
    /// Assert something about the screen or state.
    Assert(Assertion),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => {
                let mut parts = Vec::new();
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    parts.push("ctrl".to_string());
                }
                if key.modifiers.contains(KeyModifiers::ALT) {
                    parts.push("alt".to_string());
                }
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    parts.push("shift".to_string());
                }
                parts.push(key_code_to_string(&key.code));
                write!(f, "key:{}", parts.join("+"))
            }
            Self::Type(text) => write!(f, "type:{text}"),
            Self::Wait(d) => write!(f, "wait:{}ms", d.as_millis()),
            Self::Resize(w, h) => write!(f, "resize:{w}x{h}"),
            Self::Snapshot(name) => write!(f, "snapshot:{name}"),
            Self::Assert(a) => match a {
                Assertion::Contains(t) => write!(f, "assert:contains:{t}"),
                Assertion::ContainsExact(t) => write!(f, "assert:contains-exact:{t}"),
                Assertion::NotContains(t) => write!(f, "assert:not-contains:{t}"),
                Assertion::Matches(p) => write!(f, "assert:matches:{p}"),
                Assertion::StateEquals { field, value } => {
                    write!(f, "assert:state:{field}={value}")
                }
                Assertion::StateCompare { field, op, value } => {
                    write!(f, "assert:state:{field}{op}{value}")
                }
            },
        }
    }
}

fn key_code_to_string(code: &KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => "backtab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        KeyCode::F(n) => format!("f{n}"),
        _ => "unknown".to_string(),
    }
}

/// True if `segment` begins with a known `type:` prefix.
fn starts_event(segment: &str) -> bool {
    segment
        .trim_start()
        .split_once(':')
        .is_some_and(|(kind, _)| EVENT_TYPES.contains(&kind.trim().to_lowercase().as_str()))
}

/// Splits a line on the commas that begin a new event.
fn split_events(line: &str) -> Vec<String> {
    let mut events: Vec<String> = Vec::new();
    for segment in line.split(',') {
        match events.last_mut() {
            Some(current) if !starts_event(segment) => {
                current.push(',');
                current.push_str(segment);
            }
            _ => events.push(segment.to_string()),
        }
    }
    events
}

/// Parser for the event DSL.
#[derive(Debug, Default)]
pub struct EventParser;

impl EventParser {
    /// Creates a new event parser.
    pub fn new() -> Self {
        Self
    }

    /// Parses all events from an input string.
    pub fn parse_all(&self, input: &str) -> Result<Vec<Event>> {
        let mut events = Vec::new();

        for line in input.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            for part in split_events(line) {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }
                events.push(self.parse_one(part)?);
            }
        }

        Ok(events)
    }

    /// Parses a single event string.
    pub fn parse_one(&self, input: &str) -> Result<Event> {
        let input = input.trim();

        let (event_type, value) = match input.split_once(':') {
            Some((t, v)) => (t.trim().to_lowercase(), v),
            None => {
                return Err(ScratchError::config(format!(
                    "Invalid event syntax: '{input}'. Expected format: type:value"
                )));
            }
        };

        match event_type.as_str() {
            "key" => self.parse_key(value.trim()),
            // Leading spaces are part of the typed text
            "type" => Ok(Event::Type(value.to_string())),
            "wait" => self.parse_wait(value.trim()),
            "resize" => self.parse_resize(value.trim()),
            "snapshot" => Ok(Event::Snapshot(value.trim().to_string())),
            "assert" => self.parse_assert(value.trim()),
            _ => Err(ScratchError::config(format!(
                "Unknown event type: '{event_type}'. Valid types: {}",
                EVENT_TYPES.join(", ")
            ))),
        }
    }

    /// Parses a key event like "enter", "ctrl+r", "shift+tab".
    fn parse_key(&self, value: &str) -> Result<Event> {
        // A lone "+" is the plus key, not a separator
        let (modifier_part, key_str) = match value.rsplit_once('+') {
            Some((mods, "")) => (mods.strip_suffix('+').unwrap_or(""), "+"),
            Some((mods, key)) => (mods, key),
            None => ("", value),
        };

        let mut modifiers = KeyModifiers::empty();
        for part in modifier_part.split('+').filter(|p| !p.is_empty()) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => {
                    return Err(ScratchError::config(format!(
                        "Unknown modifier: '{part}'. Valid modifiers: ctrl, alt, shift"
                    )));
                }
            }
        }

        let mut code = self.parse_key_code(key_str)?;
        if code == KeyCode::Tab && modifiers.contains(KeyModifiers::SHIFT) {
            code = KeyCode::BackTab;
        }

        Ok(Event::Key(KeyEvent::new(code, modifiers)))
    }

    /// Parses a key code string into a KeyCode.
    fn parse_key_code(&self, s: &str) -> Result<KeyCode> {
        let s_lower = s.to_lowercase();

        if let Some(n) = s_lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            if (1..=12).contains(&n) {
                return Ok(KeyCode::F(n));
            }
        }

        let code = match s_lower.as_str() {
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "backspace" | "bs" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => {
                        return Err(ScratchError::config(format!(
                            "Unknown key: '{s}'. Use single characters or named keys like enter, tab, f5"
                        )));
                    }
                }
            }
        };

        Ok(code)
    }

    /// Parses a wait duration like "100ms", "2s", or just "100" (defaults to ms).
    fn parse_wait(&self, value: &str) -> Result<Event> {
        let value = value.to_lowercase();
        let invalid = || ScratchError::config(format!("Invalid duration: '{value}'"));

        let duration = if let Some(ms) = value.strip_suffix("ms") {
            Duration::from_millis(ms.parse().map_err(|_| invalid())?)
        } else if let Some(secs) = value.strip_suffix('s') {
            Duration::from_secs(secs.parse().map_err(|_| invalid())?)
        } else {
            Duration::from_millis(value.parse().map_err(|_| invalid())?)
        };

        Ok(Event::Wait(duration))
    }

    /// Parses a resize event like "120x40".
    fn parse_resize(&self, value: &str) -> Result<Event> {
        let (width, height) = value.split_once('x').ok_or_else(|| {
            ScratchError::config(format!(
                "Invalid resize format: '{value}'. Expected WIDTHxHEIGHT"
            ))
        })?;

        let width: u16 = width
            .parse()
            .map_err(|_| ScratchError::config(format!("Invalid width: '{width}'")))?;
        let height: u16 = height
            .parse()
            .map_err(|_| ScratchError::config(format!("Invalid height: '{height}'")))?;

        Ok(Event::Resize(width, height))
    }

    /// Parses an assertion like "contains:hello" or "state:focus=Editor".
    fn parse_assert(&self, value: &str) -> Result<Event> {
        let (assert_type, rest) = match value.split_once(':') {
            Some((t, r)) => (t.trim().to_lowercase(), r.trim()),
            None => {
                return Err(ScratchError::config(format!(
                    "Invalid assertion syntax: '{value}'. Expected assert:type:value"
                )));
            }
        };

        let assertion = match assert_type.as_str() {
            "contains" => Assertion::Contains(rest.to_string()),
            "contains-exact" => Assertion::ContainsExact(rest.to_string()),
            "not-contains" => Assertion::NotContains(rest.to_string()),
            "matches" => Assertion::Matches(rest.to_string()),
            "state" => self.parse_state_assertion(rest)?,
            _ => {
                return Err(ScratchError::config(format!(
                    "Unknown assertion type: '{assert_type}'. Valid types: contains, contains-exact, not-contains, matches, state"
                )));
            }
        };

        Ok(Event::Assert(assertion))
    }

    /// Parses a state assertion like "focus=Editor" or "row_count>=2".
    fn parse_state_assertion(&self, value: &str) -> Result<Assertion> {
        // The field name never contains operator characters, so the first
        // operator found starts the comparison.
        let Some(pos) = value.find(['>', '<', '=']) else {
            return Err(ScratchError::config(format!(
                "Invalid state assertion: '{value}'. Expected field=value or field>=value"
            )));
        };

        let field = value[..pos].trim().to_string();
        let rest = &value[pos..];
        let op = [">=", "<=", ">", "<", "="]
            .into_iter()
            .find(|op| rest.starts_with(op))
            .unwrap_or("=");
        let expected = rest[op.len()..].trim().to_string();

        Ok(if op == "=" {
            Assertion::StateEquals {
                field,
                value: expected,
            }
        } else {
            Assertion::StateCompare {
                field,
                op: op.to_string(),
                value: expected,
            }
        })
    }
}
