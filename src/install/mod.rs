//! Putting a resolved set into the project.
//!
//! - [`target`] decides where each file goes and whether it conflicts
//! - [`writer`] writes the accepted targets
//! - [`package_manager`] and [`deps`] install runtime packages

pub mod deps;
pub mod package_manager;
pub mod target;
pub mod writer;

pub use deps::{
    install_dependencies, install_dev_dependencies, CommandRunner, InstallReport, SystemRunner,
};
pub use package_manager::{PackageManager, PACKAGE_MANAGER_ENV};
pub use target::{common_root, destination_for, resolve_targets, FileTarget, TargetKind};
pub use writer::{write, Decision, FsWriter, MemoryWriter, ProjectWriter, WriteReport};
