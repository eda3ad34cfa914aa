//! Keybindings with context-aware key parsing and lookup
//!
//! Each primitive part reads keys in its own [`KeyContext`]: the trigger
//! control, the open popup surface, or a radio group option. Commands are
//! plain strings (see [`commands`]) so users can rebind them from config.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::hash::Hash;

use crate::error::PrimitiveError;

/// Trait for keybinding contexts
pub trait BindingContext: Clone + Copy + Eq + Hash {
    /// Get the context name as a string (for config file lookup)
    fn name(&self) -> &'static str;

    /// Parse a context from its name
    fn from_name(name: &str) -> Option<Self>;

    /// Get all possible context values (for iteration/config loading)
    fn all() -> &'static [Self];
}

/// Where a key press happened
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyContext {
    /// The control that opens the popup
    Trigger,
    /// The open popup surface
    Surface,
    /// A focused radio option
    Radio,
}

impl BindingContext for KeyContext {
    fn name(&self) -> &'static str {
        match self {
            KeyContext::Trigger => "trigger",
            KeyContext::Surface => "surface",
            KeyContext::Radio => "radio",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "trigger" => Some(KeyContext::Trigger),
            "surface" => Some(KeyContext::Surface),
            "radio" => Some(KeyContext::Radio),
            _ => None,
        }
    }

    fn all() -> &'static [Self] {
        &[KeyContext::Trigger, KeyContext::Surface, KeyContext::Radio]
    }
}

/// Command names understood by the coordinators
pub mod commands {
    /// Trigger: open and activate the first item
    pub const OPEN_FIRST: &str = "open_first";
    /// Trigger: open and activate the last item
    pub const OPEN_LAST: &str = "open_last";
    /// Surface / radio: next item
    pub const NEXT: &str = "next";
    /// Surface / radio: previous item
    pub const PREVIOUS: &str = "previous";
    /// Surface: first item
    pub const FIRST: &str = "first";
    /// Surface: last item
    pub const LAST: &str = "last";
    /// Surface: activate the active item and close
    pub const ACTIVATE: &str = "activate";
    /// Surface: close and return focus to the trigger
    pub const CLOSE: &str = "close";
    /// Surface: swallow tab navigation while open
    pub const TRAP_FOCUS: &str = "trap_focus";
    /// Radio: check the focused option
    pub const SELECT: &str = "select";
}

/// Keybindings configuration with context support
#[derive(Debug, Clone)]
pub struct Keybindings<C: BindingContext> {
    /// Global keybindings - checked as fallback for all contexts
    global: HashMap<String, Vec<String>>,
    /// Context-specific keybindings
    contexts: HashMap<C, HashMap<String, Vec<String>>>,
}

impl<C: BindingContext> Default for Keybindings<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: BindingContext> Serialize for Keybindings<C> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(1 + self.contexts.len()))?;
        map.serialize_entry("global", &self.global)?;
        for (context, bindings) in &self.contexts {
            map.serialize_entry(context.name(), bindings)?;
        }
        map.end()
    }
}

impl<'de, C: BindingContext> Deserialize<'de> for Keybindings<C> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: HashMap<String, HashMap<String, Vec<String>>> =
            HashMap::deserialize(deserializer)?;

        let mut keybindings = Keybindings::new();

        for (context_name, bindings) in raw {
            if context_name == "global" {
                keybindings.global = bindings;
            } else if let Some(context) = C::from_name(&context_name) {
                keybindings.contexts.insert(context, bindings);
            } else {
                tracing::warn!(context = %context_name, "Ignoring unknown keybinding context");
            }
        }

        Ok(keybindings)
    }
}

impl<C: BindingContext> Keybindings<C> {
    /// Create a new empty keybindings configuration
    pub fn new() -> Self {
        Self {
            global: HashMap::new(),
            contexts: HashMap::new(),
        }
    }

    /// Add a global keybinding
    pub fn add_global(&mut self, command: impl Into<String>, keys: Vec<String>) {
        self.global.insert(command.into(), keys);
    }

    /// Add a context-specific keybinding
    pub fn add(&mut self, context: C, command: impl Into<String>, keys: Vec<String>) {
        self.contexts
            .entry(context)
            .or_default()
            .insert(command.into(), keys);
    }

    /// Get bindings for a specific context
    pub fn get_context_bindings(&self, context: C) -> Option<&HashMap<String, Vec<String>>> {
        self.contexts.get(&context)
    }

    /// Get global bindings
    pub fn global_bindings(&self) -> &HashMap<String, Vec<String>> {
        &self.global
    }

    /// Get command name for a key event in the given context
    ///
    /// First checks context-specific bindings, then falls back to global
    pub fn get_command(&self, key: KeyEvent, context: C) -> Option<&str> {
        if let Some(context_bindings) = self.contexts.get(&context) {
            if let Some(cmd) = Self::match_key_in_bindings(key, context_bindings) {
                return Some(cmd);
            }
        }

        Self::match_key_in_bindings(key, &self.global)
    }

    fn match_key_in_bindings(
        key: KeyEvent,
        bindings: &HashMap<String, Vec<String>>,
    ) -> Option<&str> {
        for (command, keys) in bindings {
            for key_str in keys {
                if let Some(parsed_key) = parse_key_string(key_str) {
                    // Character keys compare case-insensitively; shift is
                    // implied by the character itself
                    let (codes_match, modifiers) = match (&parsed_key.code, &key.code) {
                        (KeyCode::Char(c1), KeyCode::Char(c2)) => (
                            c1.to_lowercase().eq(c2.to_lowercase()),
                            key.modifiers - KeyModifiers::SHIFT,
                        ),
                        _ => (parsed_key.code == key.code, key.modifiers),
                    };

                    if codes_match && parsed_key.modifiers == modifiers {
                        return Some(command.as_str());
                    }
                }
            }
        }
        None
    }

    /// Get the first keybinding string for a command in the given context
    pub fn get_first_keybinding(&self, command: &str, context: C) -> Option<String> {
        if let Some(keys) = self
            .contexts
            .get(&context)
            .and_then(|bindings| bindings.get(command))
        {
            if let Some(first) = keys.first() {
                return Some(first.clone());
            }
        }

        self.global
            .get(command)
            .and_then(|keys| keys.first().cloned())
    }

    /// Check that every bound key string parses
    pub fn validate(&self) -> Result<(), PrimitiveError> {
        let all = self
            .global
            .iter()
            .chain(self.contexts.values().flat_map(|bindings| bindings.iter()));
        for (command, keys) in all {
            if let Some(bad) = keys.iter().find(|k| parse_key_string(k).is_none()) {
                return Err(PrimitiveError::InvalidKey {
                    command: command.clone(),
                    key: bad.clone(),
                });
            }
        }
        Ok(())
    }

    /// Merge user config onto defaults - user config overrides defaults
    pub fn merge(mut defaults: Self, user: Self) -> Self {
        for (key, value) in user.global {
            defaults.global.insert(key, value);
        }

        for (context, bindings) in user.contexts {
            let entry = defaults.contexts.entry(context).or_default();
            for (key, value) in bindings {
                entry.insert(key, value);
            }
        }

        defaults
    }
}

impl Keybindings<KeyContext> {
    /// The standard WAI-ARIA menu button / listbox / radio group bindings
    pub fn defaults() -> Self {
        use commands::*;

        let keys = |ks: &[&str]| ks.iter().map(|k| k.to_string()).collect::<Vec<_>>();
        let mut bindings = Self::new();

        bindings.add(KeyContext::Trigger, OPEN_FIRST, keys(&["enter", "space", "down"]));
        bindings.add(KeyContext::Trigger, OPEN_LAST, keys(&["up"]));

        bindings.add(KeyContext::Surface, NEXT, keys(&["down"]));
        bindings.add(KeyContext::Surface, PREVIOUS, keys(&["up"]));
        bindings.add(KeyContext::Surface, FIRST, keys(&["home", "pageup"]));
        bindings.add(KeyContext::Surface, LAST, keys(&["end", "pagedown"]));
        bindings.add(KeyContext::Surface, ACTIVATE, keys(&["enter", "space"]));
        bindings.add(KeyContext::Surface, CLOSE, keys(&["esc"]));
        bindings.add(KeyContext::Surface, TRAP_FOCUS, keys(&["tab", "shift+tab"]));

        bindings.add(KeyContext::Radio, NEXT, keys(&["down", "right"]));
        bindings.add(KeyContext::Radio, PREVIOUS, keys(&["up", "left"]));
        bindings.add(KeyContext::Radio, SELECT, keys(&["space"]));

        bindings
    }
}

/// Parse a key string like "q", "esc", "ctrl+p", "shift+tab" into a KeyEvent
pub fn parse_key_string(key_str: &str) -> Option<KeyEvent> {
    let key_str = key_str.trim().to_lowercase();

    if key_str.is_empty() {
        return None;
    }

    if key_str == "shift+tab" || key_str == "backtab" {
        return Some(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
    }

    // "+" on its own is a character, not a separator
    if key_str == "+" {
        return Some(KeyEvent::new(KeyCode::Char('+'), KeyModifiers::empty()));
    }

    let parts: Vec<&str> = key_str.split('+').collect();
    let mut modifiers = KeyModifiers::empty();
    let key_part = parts.last()?.trim();

    for part in &parts[..parts.len() - 1] {
        match part.trim() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" => modifiers |= KeyModifiers::ALT,
            _ => return None,
        }
    }

    let code = match key_part {
        "esc" | "escape" => KeyCode::Esc,
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "delete" => KeyCode::Delete,
        "space" => KeyCode::Char(' '),
        c if c.chars().count() == 1 => KeyCode::Char(c.chars().next()?),
        _ => return None,
    };

    Some(KeyEvent::new(code, modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn test_parse_simple_key() {
        let result = parse_key_string("q").unwrap();
        assert_eq!(result.code, KeyCode::Char('q'));
        assert_eq!(result.modifiers, KeyModifiers::empty());
    }

    #[test]
    fn test_parse_named_keys() {
        assert_eq!(parse_key_string("esc").unwrap().code, KeyCode::Esc);
        assert_eq!(parse_key_string("space").unwrap().code, KeyCode::Char(' '));
        assert_eq!(parse_key_string("PageDown").unwrap().code, KeyCode::PageDown);
    }

    #[test]
    fn test_parse_modifiers() {
        let result = parse_key_string("ctrl+p").unwrap();
        assert_eq!(result.code, KeyCode::Char('p'));
        assert!(result.modifiers.contains(KeyModifiers::CONTROL));

        let result = parse_key_string("shift+tab").unwrap();
        assert_eq!(result.code, KeyCode::BackTab);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_key_string("").is_none());
        assert!(parse_key_string("hyper+x").is_none());
        assert!(parse_key_string("notakey").is_none());
    }

    #[test]
    fn test_default_trigger_bindings() {
        let bindings = Keybindings::defaults();
        for code in [KeyCode::Enter, KeyCode::Char(' '), KeyCode::Down] {
            assert_eq!(
                bindings.get_command(press(code), KeyContext::Trigger),
                Some(commands::OPEN_FIRST)
            );
        }
        assert_eq!(
            bindings.get_command(press(KeyCode::Up), KeyContext::Trigger),
            Some(commands::OPEN_LAST)
        );
        assert_eq!(
            bindings.get_command(press(KeyCode::Esc), KeyContext::Trigger),
            None
        );
    }

    #[test]
    fn test_default_surface_bindings() {
        let bindings = Keybindings::defaults();
        let cmd = |code| bindings.get_command(press(code), KeyContext::Surface);

        assert_eq!(cmd(KeyCode::Home), Some(commands::FIRST));
        assert_eq!(cmd(KeyCode::PageUp), Some(commands::FIRST));
        assert_eq!(cmd(KeyCode::End), Some(commands::LAST));
        assert_eq!(cmd(KeyCode::PageDown), Some(commands::LAST));
        assert_eq!(cmd(KeyCode::Tab), Some(commands::TRAP_FOCUS));
        assert_eq!(cmd(KeyCode::Char('a')), None);

        let back_tab = KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(
            bindings.get_command(back_tab, KeyContext::Surface),
            Some(commands::TRAP_FOCUS)
        );
    }

    #[test]
    fn test_global_fallback() {
        let mut bindings: Keybindings<KeyContext> = Keybindings::new();
        bindings.add_global(commands::CLOSE, vec!["q".to_string()]);
        assert_eq!(
            bindings.get_command(press(KeyCode::Char('Q')), KeyContext::Radio),
            Some(commands::CLOSE)
        );
    }

    #[test]
    fn test_merge_overrides() {
        let mut user: Keybindings<KeyContext> = Keybindings::new();
        user.add(KeyContext::Surface, commands::NEXT, vec!["j".to_string()]);

        let merged = Keybindings::merge(Keybindings::defaults(), user);
        assert_eq!(
            merged.get_command(press(KeyCode::Char('j')), KeyContext::Surface),
            Some(commands::NEXT)
        );
        assert_eq!(
            merged.get_command(press(KeyCode::Down), KeyContext::Surface),
            None
        );
        assert_eq!(
            merged.get_command(press(KeyCode::Up), KeyContext::Surface),
            Some(commands::PREVIOUS)
        );
    }

    #[test]
    fn test_deserialize_and_validate() {
        let bindings: Keybindings<KeyContext> =
            serde_json::from_str(r#"{"surface": {"close": ["esc", "ctrl+c"]}, "bogus": {}}"#)
                .unwrap();
        assert!(bindings.validate().is_ok());
        assert!(bindings.get_context_bindings(KeyContext::Surface).is_some());

        let bad: Keybindings<KeyContext> =
            serde_json::from_str(r#"{"trigger": {"open_first": ["wat"]}}"#).unwrap();
        assert!(matches!(
            bad.validate(),
            Err(PrimitiveError::InvalidKey { key, .. }) if key == "wat"
        ));
    }

    #[test]
    fn test_first_keybinding() {
        let bindings = Keybindings::defaults();
        let first = bindings.get_first_keybinding(commands::LAST, KeyContext::Surface);
        assert_eq!(first.as_deref(), Some("end"));
    }
}
