#[macro_use]
pub mod error;
pub mod bitmap;
pub mod encoding;
pub mod position;
pub mod ranges;
pub mod stream;
