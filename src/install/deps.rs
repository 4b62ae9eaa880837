//! Runtime dependency installation.

use std::path::Path;

use crate::error::{Result, StencilError};
use crate::install::package_manager::PackageManager;
use crate::registry::DependencySet;
use crate::shell::{display_command, execute, CommandOptions};

/// Runs a program to completion and returns its exit code.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<Option<i32>>;
}

/// Runs commands as real subprocesses with inherited output.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<Option<i32>> {
        let options = CommandOptions {
            cwd: Some(cwd.to_path_buf()),
            ..Default::default()
        };
        Ok(execute(program, args, &options)?.exit_code)
    }
}

/// What an install pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallReport {
    /// There was nothing to install.
    Nothing,
    /// The package manager ran once and succeeded.
    Installed {
        command: String,
        packages: Vec<String>,
    },
}

/// Install `deps` with a single package manager call.
///
/// An empty set runs nothing. A non-zero exit is `InstallFailed`.
pub fn install_dependencies(
    deps: &DependencySet,
    project_root: &Path,
    package_manager: PackageManager,
    runner: &dyn CommandRunner,
) -> Result<InstallReport> {
    let args = package_manager.add_args(deps.as_slice());
    run_install(deps, args, project_root, package_manager, runner)
}

/// Install `deps` as development dependencies, also in one call.
pub fn install_dev_dependencies(
    deps: &DependencySet,
    project_root: &Path,
    package_manager: PackageManager,
    runner: &dyn CommandRunner,
) -> Result<InstallReport> {
    let args = package_manager.add_dev_args(deps.as_slice());
    run_install(deps, args, project_root, package_manager, runner)
}

fn run_install(
    deps: &DependencySet,
    args: Vec<String>,
    project_root: &Path,
    package_manager: PackageManager,
    runner: &dyn CommandRunner,
) -> Result<InstallReport> {
    if deps.is_empty() {
        return Ok(InstallReport::Nothing);
    }

    let program = package_manager.program();
    let command = display_command(program, &args);
    tracing::info!("Installing {} package(s) with {}", deps.len(), package_manager);

    match runner.run(program, &args, project_root)? {
        Some(0) => Ok(InstallReport::Installed {
            command,
            packages: deps.as_slice().to_vec(),
        }),
        code => Err(StencilError::InstallFailed { command, code }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRunner {
        calls: Mutex<Vec<(String, Vec<String>)>>,
        exit_code: Option<i32>,
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, program: &str, args: &[String], _cwd: &Path) -> Result<Option<i32>> {
            self.calls
                .lock()
                .unwrap()
                .push((program.to_string(), args.to_vec()));
            Ok(self.exit_code)
        }
    }

    #[test]
    fn empty_set_runs_nothing() {
        let runner = RecordingRunner::default();
        let report = install_dependencies(
            &DependencySet::new(),
            Path::new("/app"),
            PackageManager::Npm,
            &runner,
        )
        .unwrap();
        assert_eq!(report, InstallReport::Nothing);
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn one_call_with_deduplicated_packages() {
        let runner = RecordingRunner {
            exit_code: Some(0),
            ..Default::default()
        };
        let deps: DependencySet = ["clsx", "tailwind-merge", "clsx"].into_iter().collect();

        let report =
            install_dependencies(&deps, Path::new("/app"), PackageManager::Pnpm, &runner).unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "pnpm");
        assert_eq!(calls[0].1, vec!["add", "clsx", "tailwind-merge"]);
        assert_eq!(
            report,
            InstallReport::Installed {
                command: "pnpm add clsx tailwind-merge".to_string(),
                packages: vec!["clsx".to_string(), "tailwind-merge".to_string()],
            }
        );
    }

    #[test]
    fn dev_packages_use_the_dev_flag() {
        let runner = RecordingRunner {
            exit_code: Some(0),
            ..Default::default()
        };
        let deps: DependencySet = ["tw-animate-css"].into_iter().collect();

        let report =
            install_dev_dependencies(&deps, Path::new("/app"), PackageManager::Npm, &runner)
                .unwrap();

        assert_eq!(
            runner.calls.lock().unwrap()[0].1,
            vec!["install", "-D", "tw-animate-css"]
        );
        assert!(matches!(report, InstallReport::Installed { command, .. } if command == "npm install -D tw-animate-css"));
    }

    #[test]
    fn non_zero_exit_is_install_failure() {
        let runner = RecordingRunner {
            exit_code: Some(1),
            ..Default::default()
        };
        let deps: DependencySet = ["clsx"].into_iter().collect();

        let err = install_dependencies(&deps, Path::new("/app"), PackageManager::Npm, &runner)
            .unwrap_err();
        match err {
            StencilError::InstallFailed { command, code } => {
                assert_eq!(command, "npm install clsx");
                assert_eq!(code, Some(1));
            }
            other => panic!("expected InstallFailed, got {:?}", other),
        }
    }
}
