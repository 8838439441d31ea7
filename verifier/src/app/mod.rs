//! Application configuration

pub mod options;
pub mod settings;
