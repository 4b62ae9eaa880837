//! Deciding where each file of a resolved set lands.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::{normalize_path, AliasKey, ProjectConfig};
use crate::error::{Result, StencilError};
use crate::install::writer::ProjectWriter;
use crate::registry::{ItemType, RegistryFile, RegistryItem, ResolvedSet};
use crate::transform::{merge_stylesheet, Pipeline};

/// Directories that move under `src/` in projects that have one.
const SRC_DIRS: [&str; 5] = ["app", "pages", "components", "lib", "hooks"];

/// How a target is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// A registry file copied into the project.
    File,
    /// The project stylesheet with theme variables merged in.
    StylesheetMerge,
}

/// One file to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct FileTarget {
    /// Name of the item that owns the file.
    pub item: String,
    /// Path of the file inside the registry.
    pub source_path: String,
    pub declared_type: ItemType,
    /// Absolute destination.
    pub destination: PathBuf,
    /// Content after transforms.
    pub content: String,
    pub exists: bool,
    /// The destination exists with different content.
    pub conflict: bool,
    /// The destination already holds exactly `content`.
    pub unchanged: bool,
    pub kind: TargetKind,
}

impl FileTarget {
    /// Project-relative destination for display.
    pub fn display_path(&self, root: &Path) -> String {
        self.destination
            .strip_prefix(root)
            .unwrap_or(&self.destination)
            .display()
            .to_string()
    }
}

/// Compute every target for `set`.
///
/// Files are transformed through `pipeline`. When the set carries theme
/// variables and the project stylesheet exists, a merge target for the
/// stylesheet is appended.
pub fn resolve_targets(
    set: &ResolvedSet,
    config: &ProjectConfig,
    pipeline: &Pipeline,
    writer: &dyn ProjectWriter,
) -> Result<Vec<FileTarget>> {
    let has_src = writer.exists(&config.cwd().join("src"));
    let mut targets: Vec<FileTarget> = Vec::new();
    let mut claimed: HashSet<PathBuf> = HashSet::new();

    for resolved in set.items() {
        let item = &resolved.item;
        let root = common_root(&item.files);

        for file in &item.files {
            let destination = destination_for(file, item, &root, config, has_src)?;
            if !claimed.insert(destination.clone()) {
                tracing::warn!(
                    "{} from '{}' targets an already claimed path; keeping the first",
                    file.path,
                    item.name
                );
                continue;
            }

            let content = pipeline.run(file, item, config, resolved.remote)?;
            targets.push(compare(
                FileTarget {
                    item: item.name.clone(),
                    source_path: file.path.clone(),
                    declared_type: file.file_type,
                    destination,
                    content,
                    exists: false,
                    conflict: false,
                    unchanged: false,
                    kind: TargetKind::File,
                },
                writer,
            ));
        }
    }

    let vars = set.css_vars();
    if !vars.is_empty() {
        let sheet = &config.resolved.tailwind_css;
        match writer.read(sheet) {
            Ok(_) if claimed.contains(&normalize_path(sheet)) => tracing::warn!(
                "{} is also written by a registry file; theme variables were not merged",
                sheet.display()
            ),
            Ok(existing) => {
                let merged = merge_stylesheet(sheet, &existing, &vars, config)?;
                targets.push(FileTarget {
                    item: set.names().join(", "),
                    source_path: config.tailwind().css.clone(),
                    declared_type: ItemType::Css,
                    destination: sheet.clone(),
                    unchanged: merged == existing,
                    content: merged,
                    exists: true,
                    conflict: false,
                    kind: TargetKind::StylesheetMerge,
                });
            }
            Err(_) => tracing::warn!(
                "Stylesheet {} not found; theme variables were not merged",
                sheet.display()
            ),
        }
    }

    Ok(targets)
}

fn compare(mut target: FileTarget, writer: &dyn ProjectWriter) -> FileTarget {
    if let Ok(existing) = writer.read(&target.destination) {
        target.exists = true;
        target.unchanged = existing == target.content;
        target.conflict = !target.unchanged;
    } else {
        target.exists = writer.exists(&target.destination);
    }
    target
}

/// Absolute destination of one file.
///
/// The destination is normalized and must stay inside the project root;
/// absolute targets and `..` segments that climb out of it are rejected.
pub fn destination_for(
    file: &RegistryFile,
    item: &RegistryItem,
    root: &str,
    config: &ProjectConfig,
    has_src: bool,
) -> Result<PathBuf> {
    let destination = normalize_path(&raw_destination(file, item, root, config, has_src)?);
    let project = normalize_path(config.cwd());
    if destination == project || !destination.starts_with(&project) {
        return Err(StencilError::Transform {
            path: file.path.clone(),
            message: format!(
                "destination {} is outside the project (item '{}')",
                destination.display(),
                item.name
            ),
        });
    }
    Ok(destination)
}

fn raw_destination(
    file: &RegistryFile,
    item: &RegistryItem,
    root: &str,
    config: &ProjectConfig,
    has_src: bool,
) -> Result<PathBuf> {
    let cwd = config.cwd();

    if let Some(target) = file.target.as_deref().filter(|t| !t.is_empty()) {
        if let Some(home_relative) = target.strip_prefix("~/") {
            return Ok(cwd.join(home_relative));
        }
        let target = target.trim_start_matches("./");
        let first = target.split('/').next().unwrap_or_default();
        if has_src && target.contains('/') && SRC_DIRS.contains(&first) {
            return Ok(cwd.join("src").join(target));
        }
        return Ok(cwd.join(target));
    }

    let base: PathBuf = match file.file_type {
        ItemType::Ui => config.resolved.require(AliasKey::Ui)?.to_path_buf(),
        ItemType::Lib => config.resolved.require(AliasKey::Lib)?.to_path_buf(),
        ItemType::Hook => config.resolved.require(AliasKey::Hooks)?.to_path_buf(),
        ItemType::Css => config
            .resolved
            .tailwind_css
            .parent()
            .unwrap_or(cwd)
            .to_path_buf(),
        ItemType::File => {
            return Err(StencilError::Transform {
                path: file.path.clone(),
                message: format!(
                    "files of type registry:file need a target (item '{}')",
                    item.name
                ),
            })
        }
        ItemType::Component
        | ItemType::Block
        | ItemType::Page
        | ItemType::Example
        | ItemType::Theme
        | ItemType::Style => config.resolved.require(AliasKey::Components)?.to_path_buf(),
    };

    Ok(base.join(relative_to_root(&file.path, root)))
}

/// Deepest directory shared by every file path of an item.
pub fn common_root(files: &[RegistryFile]) -> String {
    let mut dirs = files.iter().map(|f| {
        let mut parts: Vec<&str> = f.path.split('/').collect();
        parts.pop();
        parts
    });
    let Some(mut shared) = dirs.next() else {
        return String::new();
    };
    for parts in dirs {
        let len = shared
            .iter()
            .zip(&parts)
            .take_while(|(a, b)| a == b)
            .count();
        shared.truncate(len);
    }
    shared.join("/")
}

fn relative_to_root<'a>(path: &'a str, root: &str) -> &'a str {
    if root.is_empty() {
        return path;
    }
    path.strip_prefix(root)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(path)
}
