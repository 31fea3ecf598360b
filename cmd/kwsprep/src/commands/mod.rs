//! CLI commands module.

mod augment;
mod balance;
mod config;
mod partition;
mod run;
mod util;

pub use augment::AugmentCommand;
pub use balance::BalanceCommand;
pub use config::ConfigCommand;
pub use partition::PartitionCommand;
pub use run::RunCommand;

// Re-export utils for use in commands
pub(crate) use util::*;
