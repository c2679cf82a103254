pub mod any;
pub mod bytes;
