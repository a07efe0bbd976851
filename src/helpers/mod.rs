//! Helper functions shared by the templates and the generator

mod date;
mod url;

pub use date::*;
pub use url::*;
