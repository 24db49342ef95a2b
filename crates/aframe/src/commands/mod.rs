//! Command handlers

pub mod build;
pub mod create;
pub mod deploy;
pub mod serve;
pub mod version;
