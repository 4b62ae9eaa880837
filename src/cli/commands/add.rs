//! Add command implementation.
//!
//! The `stencil add` command resolves the requested items with their
//! registry dependencies, transforms their files for the project, writes
//! them, and installs the packages they need.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::args::AddArgs;
use crate::config::{load_config, ProjectConfig};
use crate::error::Result;
use crate::install::{
    install_dependencies, install_dev_dependencies, resolve_targets, write, CommandRunner,
    Decision, FileTarget, FsWriter, InstallReport, PackageManager, ProjectWriter, SystemRunner,
    WriteReport,
};
use crate::registry::{
    resolve, Catalog, CatalogClient, DependencySet, ItemType, Sources, INDEX_ITEM,
};
use crate::shell::display_command;
use crate::transform::Pipeline;
use crate::ui::{Prompt, PromptOption, PromptType, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// Flags that shape an install run.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddOptions {
    pub overwrite: bool,
    pub yes: bool,
    pub skip_install: bool,
}

/// What an install run did.
#[derive(Debug, Clone, PartialEq)]
pub struct AddOutcome {
    /// Canonical names of every resolved item, in discovery order.
    pub resolved: Vec<String>,
    pub report: WriteReport,
    pub install: InstallReport,
    pub dev_install: InstallReport,
}

/// Everything an install run reads from and writes to.
pub struct Installer<'a> {
    pub config: &'a ProjectConfig,
    pub catalog: &'a dyn Catalog,
    pub writer: &'a dyn ProjectWriter,
    pub runner: &'a dyn CommandRunner,
}

impl Installer<'_> {
    /// Resolve, write, and install `names`.
    ///
    /// Returns `None` when the user declines to proceed.
    pub fn run(
        &self,
        names: &[String],
        options: AddOptions,
        ui: &mut dyn UserInterface,
    ) -> Result<Option<AddOutcome>> {
        let root = self.config.cwd();

        let mut spinner = ui.start_spinner("Resolving registry items...");
        let set = match resolve(names, self.config.style(), self.catalog) {
            Ok(set) => set,
            Err(e) => {
                spinner.finish_error("Could not resolve registry items");
                return Err(e);
            }
        };
        let resolved: Vec<String> = set.names().iter().map(|n| n.to_string()).collect();
        spinner.finish_success(&format!("Resolved {}", resolved.join(", ")));

        let targets = resolve_targets(&set, self.config, &Pipeline::standard(), self.writer)?;
        tracing::debug!("{} target(s) for {} item(s)", targets.len(), set.len());

        if !options.yes {
            let question = format!(
                "Add {} file(s) for {}?",
                targets.len(),
                resolved.join(", ")
            );
            let proceed = ui
                .prompt(&Prompt::confirm("proceed", question, true))?
                .as_bool()
                .unwrap_or(false);
            if !proceed {
                ui.message("Cancelled. Nothing was written.");
                return Ok(None);
            }
        }

        let decisions = self.decide_conflicts(&targets, options.overwrite, ui)?;
        let report = write(&targets, &decisions, self.writer)?;
        show_report(&report, root, ui);

        let package_manager = PackageManager::detect(root);
        let install = self.install(&set.dependencies(), false, package_manager, options, ui)?;
        let dev_install =
            self.install(&set.dev_dependencies(), true, package_manager, options, ui)?;

        Ok(Some(AddOutcome {
            resolved,
            report,
            install,
            dev_install,
        }))
    }

    /// Install one group of packages, or hint the command when skipping.
    fn install(
        &self,
        deps: &DependencySet,
        dev: bool,
        package_manager: PackageManager,
        options: AddOptions,
        ui: &mut dyn UserInterface,
    ) -> Result<InstallReport> {
        if deps.is_empty() {
            return Ok(InstallReport::Nothing);
        }
        let root = self.config.cwd();
        let kind = if dev { "dev dependencies" } else { "dependencies" };

        if options.skip_install {
            let args = if dev {
                package_manager.add_dev_args(deps.as_slice())
            } else {
                package_manager.add_args(deps.as_slice())
            };
            let command = display_command(package_manager.program(), &args);
            ui.show_hint(&format!("Install the {} with: {}", kind, command));
            return Ok(InstallReport::Nothing);
        }

        ui.message(&format!(
            "Installing {} with {}...",
            deps.as_slice().join(", "),
            package_manager
        ));
        let install = if dev {
            install_dev_dependencies(deps, root, package_manager, self.runner)?
        } else {
            install_dependencies(deps, root, package_manager, self.runner)?
        };
        if let InstallReport::Installed { packages, .. } = &install {
            let label = if dev { "dev package(s)" } else { "package(s)" };
            ui.success(&format!("Installed {} {}", packages.len(), label));
        }
        Ok(install)
    }

    /// Overwrite decisions for every conflicting target.
    fn decide_conflicts(
        &self,
        targets: &[FileTarget],
        overwrite: bool,
        ui: &mut dyn UserInterface,
    ) -> Result<HashMap<PathBuf, Decision>> {
        let mut decisions = HashMap::new();
        for target in targets.iter().filter(|t| t.conflict) {
            let decision = if overwrite {
                Decision::Overwrite
            } else {
                let question = format!(
                    "{} already exists and differs. Overwrite?",
                    target.display_path(self.config.cwd())
                );
                let accepted = ui
                    .prompt(&Prompt::confirm("overwrite", question, false))?
                    .as_bool()
                    .unwrap_or(false);
                if accepted {
                    Decision::Overwrite
                } else {
                    Decision::Skip
                }
            };
            decisions.insert(target.destination.clone(), decision);
        }
        Ok(decisions)
    }
}

fn show_report(report: &WriteReport, root: &Path, ui: &mut dyn UserInterface) {
    let rel = |path: &PathBuf| {
        path.strip_prefix(root)
            .unwrap_or(path)
            .display()
            .to_string()
    };
    for path in &report.created {
        ui.success(&format!("Created {}", rel(path)));
    }
    for path in &report.updated {
        ui.success(&format!("Updated {}", rel(path)));
    }
    for path in &report.unchanged {
        ui.message(&format!("Unchanged {}", rel(path)));
    }
    for path in &report.skipped {
        ui.warning(&format!(
            "Skipped {} (it already exists; pass --overwrite to replace it)",
            rel(path)
        ));
    }
}

/// The add command implementation.
pub struct AddCommand {
    project_root: PathBuf,
    args: AddArgs,
    catalog: Option<Arc<dyn Catalog>>,
    writer: Arc<dyn ProjectWriter>,
    runner: Arc<dyn CommandRunner>,
}

impl AddCommand {
    pub fn new(project_root: &Path, args: AddArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
            catalog: None,
            writer: Arc::new(FsWriter),
            runner: Arc::new(SystemRunner),
        }
    }

    /// Use `catalog` instead of the registries configured for the project.
    pub fn with_catalog(mut self, catalog: Arc<dyn Catalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_writer(mut self, writer: Arc<dyn ProjectWriter>) -> Self {
        self.writer = writer;
        self
    }

    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn args(&self) -> &AddArgs {
        &self.args
    }

    /// Names from the command line, or picked from the index interactively.
    fn requested_names(
        &self,
        catalog: &dyn Catalog,
        config: &ProjectConfig,
        ui: &mut dyn UserInterface,
    ) -> Result<Vec<String>> {
        if !self.args.names.is_empty() {
            return Ok(self.args.names.clone());
        }
        if !ui.is_interactive() {
            return Ok(Vec::new());
        }

        let options: Vec<PromptOption> = catalog
            .fetch_index(config.style())?
            .into_iter()
            .filter(|entry| entry.item_type == ItemType::Ui && entry.name != INDEX_ITEM)
            .map(|entry| {
                let label = match &entry.description {
                    Some(description) => format!("{} - {}", entry.name, description),
                    None => entry.name.clone(),
                };
                PromptOption::new(label, entry.name)
            })
            .collect();

        let answer = ui.prompt(&Prompt {
            key: "components".to_string(),
            question: "Which components would you like to add?".to_string(),
            prompt_type: PromptType::MultiSelect { options },
            default: None,
        })?;
        Ok(answer.as_strings())
    }
}

impl Command for AddCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_config(&self.project_root)?;

        let client;
        let catalog: &dyn Catalog = match &self.catalog {
            Some(catalog) => catalog.as_ref(),
            None => {
                client = CatalogClient::new(Sources::from_config(&config));
                &client
            }
        };

        let names = self.requested_names(catalog, &config, ui)?;
        if names.is_empty() {
            ui.error("No items to add. Pass one or more names, e.g. `stencil add button`.");
            return Ok(CommandResult::failure(1));
        }

        let installer = Installer {
            config: &config,
            catalog,
            writer: self.writer.as_ref(),
            runner: self.runner.as_ref(),
        };
        let options = AddOptions {
            overwrite: self.args.overwrite,
            yes: self.args.yes,
            skip_install: self.args.skip_install,
        };

        if let Some(outcome) = installer.run(&names, options, ui)? {
            ui.success(&format!(
                "Done. {} file(s) written, {} skipped.",
                outcome.report.written(),
                outcome.report.skipped.len()
            ));
        }
        Ok(CommandResult::success())
    }
}
