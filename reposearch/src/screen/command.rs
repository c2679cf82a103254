use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "command", content = "args")]
pub enum Command {
    Clear,
    DeleteBackward,
    Quit,
    ScrollDown { count: u16 },
    ScrollUp { count: u16 },
    Search,
    ToggleFocus,
}
