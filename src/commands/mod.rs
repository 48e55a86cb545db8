//! CLI commands

pub mod edit;
pub mod export;
pub mod init;
pub mod list;
pub mod new;
pub mod search;
pub mod show;
pub mod stats;
