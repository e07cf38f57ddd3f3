#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::struct_excessive_bools
)]
mod caption;
mod history;

pub use caption::*;
pub use history::*;
