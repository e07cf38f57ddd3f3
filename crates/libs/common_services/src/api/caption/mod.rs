pub mod error;
pub mod interfaces;
pub mod normalizer;
pub mod service;
pub mod styles;
