//! CLI subcommand implementations.

pub mod edit;
pub mod list;
pub mod report;
pub mod resume;
pub mod start;
pub mod stop;
pub mod sync;
pub mod util;
