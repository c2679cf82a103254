pub mod color_scheme;
pub mod command;
pub mod keymap;
pub mod render;
pub mod screen;
pub mod state;
pub mod terminal;
