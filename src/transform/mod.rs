//! Source transforms applied to registry files before they are written.
//!
//! A [`Pipeline`] runs a fixed sequence of [`Transformer`]s over each
//! script file:
//! 1. [`imports::ImportRewriter`] maps registry import paths to project aliases
//! 2. [`prefix::PrefixInjector`] adds the Tailwind prefix to class lists
//! 3. [`directive::DirectiveAdjuster`] adds or removes `"use client"`
//!
//! Stylesheet merges go through [`css_vars::merge_css_vars`] instead. Every
//! step is idempotent: running it on its own output changes nothing.

pub mod css;
pub mod css_vars;
pub mod directive;
pub mod imports;
pub mod lexer;
pub mod prefix;

pub use css_vars::merge_css_vars;
pub use directive::DirectiveAdjuster;
pub use imports::ImportRewriter;
pub use prefix::PrefixInjector;

use std::path::Path;

use crate::config::ProjectConfig;
use crate::error::{Result, StencilError};
use crate::registry::{CssVars, RegistryFile, RegistryItem};

/// Extensions the script transforms apply to.
const SCRIPT_EXTENSIONS: [&str; 6] = ["ts", "tsx", "js", "jsx", "mjs", "cjs"];

/// Everything a transform may look at besides the source text.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    pub config: &'a ProjectConfig,
    pub item: &'a RegistryItem,
    pub file: &'a RegistryFile,
    /// The item came from outside the default registry.
    pub remote: bool,
}

/// One source-to-source step.
pub trait Transformer: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Transform `source`; errors are plain messages that the pipeline
    /// attaches the file path to.
    fn transform(&self, source: &str, ctx: &TransformContext<'_>) -> std::result::Result<String, String>;
}

/// An ordered list of transforms.
pub struct Pipeline {
    steps: Vec<Box<dyn Transformer>>,
}

impl Pipeline {
    /// Import rewrite, then prefix injection, then directive adjustment.
    pub fn standard() -> Self {
        Self {
            steps: vec![
                Box::new(ImportRewriter),
                Box::new(PrefixInjector),
                Box::new(DirectiveAdjuster),
            ],
        }
    }

    pub fn with_steps(steps: Vec<Box<dyn Transformer>>) -> Self {
        Self { steps }
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Transform one file of `item` for `config`.
    ///
    /// Stylesheets and non-script files are returned unchanged.
    pub fn run(
        &self,
        file: &RegistryFile,
        item: &RegistryItem,
        config: &ProjectConfig,
        remote: bool,
    ) -> Result<String> {
        let content = file.content.as_deref().ok_or_else(|| StencilError::Transform {
            path: file.path.clone(),
            message: format!("item '{}' ships this file without content", item.name),
        })?;

        if file.file_type.is_stylesheet() || !is_script(&file.path) {
            return Ok(content.to_string());
        }

        let ctx = TransformContext {
            config,
            item,
            file,
            remote,
        };
        let mut source = content.to_string();
        for step in &self.steps {
            source = step
                .transform(&source, &ctx)
                .map_err(|message| StencilError::Transform {
                    path: file.path.clone(),
                    message: format!("{}: {}", step.name(), message),
                })?;
        }
        tracing::debug!("Transformed {} ({})", file.path, item.name);
        Ok(source)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

/// Merge theme variables into a stylesheet at `path`.
pub fn merge_stylesheet(
    path: &Path,
    source: &str,
    vars: &CssVars,
    config: &ProjectConfig,
) -> Result<String> {
    merge_css_vars(source, vars, config.tailwind().css_variables).map_err(|message| {
        StencilError::Transform {
            path: path.display().to_string(),
            message,
        }
    })
}

fn is_script(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SCRIPT_EXTENSIONS.contains(&e))
}
