//! List command implementation.
//!
//! The `stencil list` command prints the registry index for the project's
//! style.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::args::ListArgs;
use crate::config::load_config;
use crate::error::{Result, StencilError};
use crate::registry::{Catalog, CatalogClient, IndexEntry, ItemType, Sources};
use crate::ui::theme::StencilTheme;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    project_root: PathBuf,
    args: ListArgs,
    catalog: Option<Arc<dyn Catalog>>,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(project_root: &Path, args: ListArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
            catalog: None,
        }
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn Catalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ListArgs {
        &self.args
    }

    fn type_filter(&self) -> Result<Option<ItemType>> {
        let Some(raw) = self.args.item_type.as_deref() else {
            return Ok(None);
        };
        let wire = if raw.starts_with("registry:") {
            raw.to_string()
        } else {
            format!("registry:{}", raw)
        };
        wire.parse::<ItemType>()
            .map(Some)
            .map_err(|message| StencilError::ConfigValidationError { message })
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let filter = self.type_filter()?;
        let config = load_config(&self.project_root)?;

        let client;
        let catalog: &dyn Catalog = match &self.catalog {
            Some(catalog) => catalog.as_ref(),
            None => {
                client = CatalogClient::new(Sources::from_config(&config));
                &client
            }
        };

        let entries: Vec<IndexEntry> = catalog
            .fetch_index(config.style())?
            .into_iter()
            .filter(|entry| filter.map_or(true, |t| entry.item_type == t))
            .collect();

        if self.args.json {
            let json = serde_json::to_string_pretty(&entries)
                .map_err(|e| StencilError::Other(e.into()))?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        if entries.is_empty() {
            ui.message("No items found.");
            return Ok(CommandResult::success());
        }

        let theme = StencilTheme::new();
        let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
        ui.show_header(&format!("Items ({})", config.style()));
        for entry in &entries {
            let kind = entry.item_type.as_str().trim_start_matches("registry:");
            let mut line = format!(
                "  {}  {}",
                theme
                    .highlight
                    .apply_to(format!("{:<width$}", entry.name, width = width)),
                theme.dim.apply_to(format!("{:<9}", kind)),
            );
            if let Some(description) = &entry.description {
                line.push_str("  ");
                line.push_str(description);
            }
            ui.message(&line);
        }
        ui.message("");
        ui.message(&format!("{} item(s)", entries.len()));

        Ok(CommandResult::success())
    }
}
