//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Commands that touch the network,
//! the filesystem, or a package manager take those as injected capabilities
//! so tests can substitute in-memory versions.

pub mod add;
pub mod diff;
pub mod dispatcher;
pub mod init;
pub mod list;

pub use add::{AddCommand, AddOptions, AddOutcome, Installer};
pub use diff::{unified_diff, DiffCommand};
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
pub use init::InitCommand;
pub use list::ListCommand;
