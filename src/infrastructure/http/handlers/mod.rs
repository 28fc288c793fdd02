//! HTTP Handlers

mod dispatch;
mod download;
mod form;
mod ping;

pub use dispatch::*;
pub use download::*;
pub use ping::*;
