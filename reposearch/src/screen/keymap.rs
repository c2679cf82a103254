use crate::{screen::command::Command, utils::any::Any};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use serde::{de::Error, Deserialize, Deserializer};
use std::collections::HashMap;

/// Which part of the screen has focus, and so which bindings apply.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Context {
    #[default]
    Input,
    Results,
}

#[derive(Deserialize)]
pub struct KeyBinding {
    #[serde(deserialize_with = "KeyBinding::deserialize_keys", rename(deserialize = "keys"))]
    events: Vec<Event>,

    #[serde(flatten)]
    command: Command,

    #[serde(default = "KeyBinding::default_contexts")]
    contexts: Vec<Context>,
}

impl KeyBinding {
    const MISSING_KEY_ERROR_MESSAGE: &'static str = "No key was provided";
    const UNKNOWN_KEY_ERROR_MESSAGE: &'static str = "Unknown key was provided";

    // NOTE: each individual key_str must be of the form
    // [ctrl +] [shift +] [alt +] (<special-key> | <single-character>)
    // where <special-key> is one of the special keys listed below
    fn deserialize_key<'de, D: Deserializer<'de>>(key_str: &str) -> Result<Event, D::Error> {
        let mut modifiers = KeyModifiers::NONE;
        let mut substrs = key_str.split('+').peekable();

        for (name, modifier) in [
            ("ctrl", KeyModifiers::CONTROL),
            ("shift", KeyModifiers::SHIFT),
            ("alt", KeyModifiers::ALT),
        ] {
            if substrs.next_if_eq(&name).is_some() {
                modifiers.insert(modifier);
            }
        }

        let Some(substr) = substrs.next() else {
            return D::Error::custom(Self::MISSING_KEY_ERROR_MESSAGE).err();
        };

        if substrs.next().is_some() {
            return D::Error::custom(Self::UNKNOWN_KEY_ERROR_MESSAGE).err();
        }

        let code = match substr {
            "backspace" => KeyCode::Backspace,
            "enter" => KeyCode::Enter,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            "tab" => KeyCode::Tab,
            "delete" => KeyCode::Delete,
            "esc" => KeyCode::Esc,
            _ => {
                let mut chars = substr.chars();
                let Some(chr) = chars.next() else {
                    return D::Error::custom(Self::MISSING_KEY_ERROR_MESSAGE).err();
                };
                let None = chars.next() else {
                    return D::Error::custom(Self::UNKNOWN_KEY_ERROR_MESSAGE).err();
                };

                KeyCode::Char(chr)
            }
        };

        Event::Key(KeyEvent::new(code, modifiers)).ok()
    }

    fn deserialize_keys<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Event>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(String::as_str)
            .map(Self::deserialize_key::<D>)
            .collect()
    }

    fn default_contexts() -> Vec<Context> {
        std::vec![Context::Input]
    }
}

pub struct Keymap {
    value: HashMap<u64, Command>,
}

impl Keymap {
    pub fn new(key_bindings: Vec<KeyBinding>) -> Self {
        let mut value = HashMap::new();

        for key_binding in key_bindings {
            for context in key_binding.contexts {
                let key = Self::key(context, &key_binding.events);

                value.insert(key, key_binding.command.clone());
            }
        }

        Self { value }
    }

    fn key(context: Context, events: &[Event]) -> u64 {
        (context, events).hashcode()
    }

    pub fn get<'a>(&'a self, context: Context, events: &'a [Event]) -> (Context, Result<&'a Command, &'a [Event]>) {
        let key = Self::key(context, events);

        match self.value.get(&key) {
            Some(command) => (context, command.ok()),
            None => (context, events.err()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Context, KeyBinding, Keymap};
    use crate::screen::command::Command;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

    fn keymap(yaml: &str) -> Keymap {
        Keymap::new(serde_yaml::from_str::<Vec<KeyBinding>>(yaml).unwrap())
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> [Event; 1] {
        [Event::Key(KeyEvent::new(code, modifiers))]
    }

    #[test]
    fn resolves_bindings_per_context() {
        let keymap = keymap(
            r"
            - keys: [enter]
              command: search
            - keys: [ctrl+c]
              command: quit
              contexts: [input, results]
            - keys: [j]
              command: scroll_down
              args: { count: 1 }
              contexts: [results]
            ",
        );
        let enter = key(KeyCode::Enter, KeyModifiers::NONE);
        let ctrl_c = key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let j = key(KeyCode::Char('j'), KeyModifiers::NONE);

        assert_eq!(keymap.get(Context::Input, &enter).1, Ok(&Command::Search));
        assert_eq!(keymap.get(Context::Results, &enter).1, Err(&enter[..]));
        assert_eq!(keymap.get(Context::Input, &ctrl_c).1, Ok(&Command::Quit));
        assert_eq!(keymap.get(Context::Results, &ctrl_c).1, Ok(&Command::Quit));
        assert_eq!(keymap.get(Context::Results, &j).1, Ok(&Command::ScrollDown { count: 1 }));
        assert_eq!(keymap.get(Context::Input, &j).1, Err(&j[..]));
    }

    #[test]
    fn parses_modifier_prefixes() {
        let keymap = keymap(
            r"
            - keys: [ctrl+shift+alt+x]
              command: clear
            ",
        );
        let modifiers = KeyModifiers::CONTROL | KeyModifiers::SHIFT | KeyModifiers::ALT;

        assert_eq!(
            keymap.get(Context::Input, &key(KeyCode::Char('x'), modifiers)).1,
            Ok(&Command::Clear)
        );
    }

    #[test]
    fn rejects_malformed_keys() {
        for keys in ["[ctrl+]", "[xy]", "[ctrl+a+b]"] {
            let yaml = std::format!("- keys: {keys}\n  command: quit\n");

            assert!(serde_yaml::from_str::<Vec<KeyBinding>>(&yaml).is_err(), "{keys}");
        }
    }
}
