//! Diff command implementation.
//!
//! The `stencil diff <name>` command shows how the project's copy of an
//! item differs from what `add` would write today.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use similar::TextDiff;

use crate::cli::args::DiffArgs;
use crate::config::load_config;
use crate::error::{Result, StencilError};
use crate::install::{resolve_targets, FsWriter, ProjectWriter, TargetKind};
use crate::registry::{resolve, Catalog, CatalogClient, Sources};
use crate::transform::Pipeline;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The diff command implementation.
pub struct DiffCommand {
    project_root: PathBuf,
    args: DiffArgs,
    catalog: Option<Arc<dyn Catalog>>,
    writer: Arc<dyn ProjectWriter>,
}

impl DiffCommand {
    pub fn new(project_root: &Path, args: DiffArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
            catalog: None,
            writer: Arc::new(FsWriter),
        }
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn Catalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_writer(mut self, writer: Arc<dyn ProjectWriter>) -> Self {
        self.writer = writer;
        self
    }
}

impl Command for DiffCommand {
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

        let set = resolve(
            std::slice::from_ref(&self.args.name),
            config.style(),
            catalog,
        )?;
        let Some(requested) = set.items().first() else {
            return Ok(CommandResult::failure(1));
        };
        let name = requested.item.name.clone();

        let targets = resolve_targets(&set, &config, &Pipeline::standard(), self.writer.as_ref())?;
        let installed: Vec<_> = targets
            .iter()
            .filter(|t| t.kind == TargetKind::File && t.item == name && t.exists)
            .collect();
        if installed.is_empty() {
            ui.warning(&format!("{} is not installed in this project", name));
            return Ok(CommandResult::failure(1));
        }

        let mut changed = 0;
        for target in installed.iter().filter(|t| t.conflict) {
            let current = self.writer.read(&target.destination).map_err(StencilError::Io)?;
            let path = target.display_path(config.cwd());
            ui.show_diff(&unified_diff(&path, &current, &target.content));
            changed += 1;
        }

        if changed == 0 {
            ui.success(&format!("{} is up to date", name));
        } else {
            ui.message(&format!(
                "{} file(s) of {} differ from the registry",
                changed, name
            ));
            ui.show_hint(&format!(
                "Update them with: stencil add {} --overwrite",
                self.args.name
            ));
        }
        Ok(CommandResult::success())
    }
}

/// Unified diff from the project's copy to the registry version.
pub fn unified_diff(path: &str, current: &str, incoming: &str) -> String {
    TextDiff::from_lines(current, incoming)
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{}", path), &format!("b/{}", path))
        .to_string()
}
