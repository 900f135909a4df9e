//! HTTP Handlers

mod generate;
mod model;
mod page;
mod ping;

pub use generate::*;
pub use model::*;
pub use page::*;
pub use ping::*;
