#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::struct_excessive_bools
)]

mod load_settings;
mod raw_settings;
mod settings;

pub use load_settings::*;
pub use raw_settings::*;
pub use settings::*;
