use crate::utils::any::Any;
use parking_lot::Mutex;
use std::{
    io::{Error as IoError, Write},
    sync::Arc,
};

// NOTE: the ratatui backend writes into one handle while the terminal keeps another, so a finished frame can be
// drained and forwarded to stdout in a single write
#[derive(Clone, Default)]
pub struct Bytes {
    value: Arc<Mutex<Vec<u8>>>,
}

impl Bytes {
    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.value.lock())
    }
}

impl Write for Bytes {
    fn write(&mut self, buf: &[u8]) -> Result<usize, IoError> {
        self.value.lock().extend_from_slice(buf);

        buf.len().ok()
    }

    fn flush(&mut self) -> Result<(), IoError> {
        ().ok()
    }
}
