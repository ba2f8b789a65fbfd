//! CLI subcommand implementations.

pub mod compare;
pub mod entries;
pub mod export;
pub mod flavors;
pub mod recaps;
pub mod reset;
pub mod settings;
pub mod stats;
pub mod status;
pub mod timeline;
pub mod util;
