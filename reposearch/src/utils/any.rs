use crate::screen::color_scheme::Spec;
use ratatui::{layout::Rect, style::Styled, text::Text, widgets::Paragraph};
use serde::Deserialize;
use serde_yaml::Error as SerdeYamlError;
use std::{
    borrow::Borrow,
    fmt::Display,
    fs::File,
    hash::{DefaultHasher, Hash, Hasher},
    io::{Error as IoError, Write},
    path::Path,
    sync::Arc,
};

pub trait Any: Sized {
    fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn color<T>(self, spec: &Spec) -> T
    where
        Self: Styled<Item = T>,
    {
        let style = self.style().fg(spec.fg).bg(spec.bg);

        self.set_style(style)
    }

    fn create(&self) -> Result<File, IoError>
    where
        Self: AsRef<Path>,
    {
        File::create(self)
    }

    fn deserialize_from_yaml<'a, T: Deserialize<'a>>(&'a self) -> Result<T, SerdeYamlError>
    where
        Self: AsRef<str>,
    {
        serde_yaml::from_str(self.as_ref())
    }

    fn err<T>(self) -> Result<T, Self> {
        Err(self)
    }

    fn error<T, E: Display>(self) -> Option<T>
    where
        Self: Into<Result<T, E>>,
    {
        match self.into() {
            Ok(ok) => ok.some(),
            Err(error) => tracing::error!(%error).with(None),
        }
    }

    fn hashcode(&self) -> u64
    where
        Self: Hash,
    {
        let mut hasher = DefaultHasher::new();

        self.hash(&mut hasher);

        hasher.finish()
    }

    fn mem_take(&mut self) -> Self
    where
        Self: Default,
    {
        std::mem::take(self)
    }

    fn none<T>(&self) -> Option<T> {
        None
    }

    fn ok<E>(self) -> Result<Self, E> {
        Ok(self)
    }

    fn paragraph<'a>(self) -> Paragraph<'a>
    where
        Self: Into<Text<'a>>,
    {
        Paragraph::new(self)
    }

    fn read_to_string(&self) -> Result<String, IoError>
    where
        Self: AsRef<Path>,
    {
        std::fs::read_to_string(self)
    }

    fn rect(&self) -> Rect
    where
        Self: Borrow<(u16, u16)>,
    {
        let (width, height) = *Borrow::<(u16, u16)>::borrow(self);

        Rect::new(0, 0, width, height)
    }

    fn row_at(self, x: u16, y: u16) -> Rect
    where
        Self: Into<u16>,
    {
        Rect::new(x, y, self.into(), 1)
    }

    fn some(self) -> Option<Self> {
        Some(self)
    }

    fn unit(self) {}

    fn warn<T, E: Display>(self) -> Option<T>
    where
        Self: Into<Result<T, E>>,
    {
        match self.into() {
            Ok(value) => value.some(),
            Err(error) => tracing::warn!(%error).none(),
        }
    }

    fn with<T>(&self, value: T) -> T {
        value
    }

    fn write_all_and_flush(&mut self, bytes: &[u8]) -> Result<(), IoError>
    where
        Self: Write,
    {
        self.write_all(bytes)?;
        self.flush()?;

        ().ok()
    }
}

impl<T> Any for T {}
