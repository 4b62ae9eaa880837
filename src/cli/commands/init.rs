//! Init command implementation.
//!
//! The `stencil init` command writes `components.json`, merges the base
//! color's theme variables into the global stylesheet, and installs the
//! style's `index` item (the `cn` helper and its packages).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::args::InitArgs;
use crate::config::{config_path, load_config, write_config, Aliases, ProjectConfig, RawConfig, TailwindConfig};
use crate::error::{Result, StencilError};
use crate::install::{CommandRunner, FsWriter, ProjectWriter, SystemRunner};
use crate::registry::{CatalogClient, Sources, INDEX_ITEM};
use crate::transform::merge_stylesheet;
use crate::ui::{Prompt, PromptOption, PromptType, UserInterface};

use super::add::{AddOptions, Installer};
use super::dispatcher::{Command, CommandResult};

const STYLES: [&str; 2] = ["new-york", "default"];
const BASE_COLORS: [&str; 5] = ["neutral", "gray", "zinc", "stone", "slate"];

const STYLESHEET_CANDIDATES: [&str; 5] = [
    "app/globals.css",
    "src/app/globals.css",
    "src/index.css",
    "src/styles/globals.css",
    "styles/globals.css",
];

const TAILWIND_CONFIG_CANDIDATES: [&str; 4] = [
    "tailwind.config.ts",
    "tailwind.config.js",
    "tailwind.config.mjs",
    "tailwind.config.cjs",
];

const NEXT_CONFIG_CANDIDATES: [&str; 3] = ["next.config.js", "next.config.mjs", "next.config.ts"];

/// Starting content for a stylesheet that does not exist yet.
const TAILWIND_DIRECTIVES: &str = "@tailwind base;\n@tailwind components;\n@tailwind utilities;\n";

/// The init command implementation.
pub struct InitCommand {
    project_root: PathBuf,
    args: InitArgs,
    sources: Option<Sources>,
    runner: Arc<dyn CommandRunner>,
}

impl InitCommand {
    pub fn new(project_root: &Path, args: InitArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
            sources: None,
            runner: Arc::new(SystemRunner),
        }
    }

    /// Fetch from `sources` instead of the registries configured for the project.
    pub fn with_sources(mut self, sources: Sources) -> Self {
        self.sources = Some(sources);
        self
    }

    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn args(&self) -> &InitArgs {
        &self.args
    }

    fn config_exists(&self) -> bool {
        config_path(&self.project_root).exists()
    }

    /// Build the configuration from flags, detection, and prompts.
    fn build_config(&self, ui: &mut dyn UserInterface) -> Result<RawConfig> {
        let root = &self.project_root;

        let style = match &self.args.style {
            Some(style) => style.clone(),
            None => self.select(ui, "style", "Which style would you like to use?", &STYLES)?,
        };
        let base_color = match &self.args.base_color {
            Some(color) => color.clone(),
            None => self.select(
                ui,
                "base-color",
                "Which color would you like to use as the base color?",
                &BASE_COLORS,
            )?,
        };
        let detected_css = first_existing(root, &STYLESHEET_CANDIDATES)
            .unwrap_or(STYLESHEET_CANDIDATES[0])
            .to_string();
        let css = match &self.args.css {
            Some(css) => css.clone(),
            None if self.args.yes => detected_css,
            None => ui
                .prompt(&Prompt {
                    key: "css".to_string(),
                    question: "Where is your global CSS file?".to_string(),
                    prompt_type: PromptType::Input,
                    default: Some(detected_css),
                })?
                .as_string(),
        };
        let css_variables = self.args.yes
            || ui
                .prompt(&Prompt::confirm(
                    "css-variables",
                    "Would you like to use CSS variables for theming?",
                    true,
                ))?
                .as_bool()
                .unwrap_or(true);

        let tsx = root.join("tsconfig.json").exists() || !root.join("jsconfig.json").exists();
        let rsc = first_existing(root, &NEXT_CONFIG_CANDIDATES).is_some()
            && (root.join("app").is_dir() || root.join("src/app").is_dir());

        Ok(RawConfig {
            schema: Some("https://ui.shadcn.com/schema.json".to_string()),
            style,
            tsx,
            rsc,
            tailwind: TailwindConfig {
                config: first_existing(root, &TAILWIND_CONFIG_CANDIDATES)
                    .unwrap_or_default()
                    .to_string(),
                css,
                base_color,
                css_variables,
                prefix: String::new(),
            },
            aliases: Aliases {
                components: "@/components".to_string(),
                utils: "@/lib/utils".to_string(),
                ui: None,
                lib: None,
                hooks: None,
            },
            registries: Default::default(),
        })
    }

    fn select(
        &self,
        ui: &mut dyn UserInterface,
        key: &str,
        question: &str,
        choices: &[&str],
    ) -> Result<String> {
        if self.args.yes {
            return Ok(choices[0].to_string());
        }
        let answer = ui.prompt(&Prompt {
            key: key.to_string(),
            question: question.to_string(),
            prompt_type: PromptType::Select {
                options: choices.iter().map(|c| PromptOption::new(*c, *c)).collect(),
            },
            default: Some(choices[0].to_string()),
        })?;
        Ok(answer.as_string())
    }

    /// Merge the base color's variables into the global stylesheet.
    fn apply_base_color(
        &self,
        config: &ProjectConfig,
        client: &CatalogClient,
        writer: &dyn ProjectWriter,
        ui: &mut dyn UserInterface,
    ) -> Result<()> {
        let color = config.tailwind().base_color.as_str();
        let base = client.fetch_base_color(color)?;
        let sheet = &config.resolved.tailwind_css;

        let existing = writer
            .read(sheet)
            .unwrap_or_else(|_| TAILWIND_DIRECTIVES.to_string());
        let merged = merge_stylesheet(sheet, &existing, &base.css_vars, config)?;
        if merged == existing && writer.exists(sheet) {
            ui.message(&format!("{} already has the {} theme", config.tailwind().css, color));
            return Ok(());
        }

        if let Some(parent) = sheet.parent() {
            writer
                .create_dir_all(parent)
                .map_err(|source| StencilError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        writer
            .write(sheet, &merged)
            .map_err(|source| StencilError::Write {
                path: sheet.clone(),
                source,
            })?;
        ui.success(&format!(
            "Added the {} theme to {}",
            color,
            config.tailwind().css
        ));
        Ok(())
    }
}

impl Command for InitCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.config_exists() && !self.args.force {
            ui.error("components.json already exists. Pass --force to replace it.");
            return Ok(CommandResult::failure(1));
        }

        ui.show_header("Setting up stencil");
        let raw = self.build_config(ui)?;
        write_config(&self.project_root, &raw)?;
        ui.success("Wrote components.json");

        let config = load_config(&self.project_root)?;
        let sources = self
            .sources
            .clone()
            .unwrap_or_else(|| Sources::from_config(&config));
        let client = CatalogClient::new(sources);
        let writer = FsWriter;

        if config.tailwind().css_variables {
            self.apply_base_color(&config, &client, &writer, ui)?;
        }

        let installer = Installer {
            config: &config,
            catalog: &client,
            writer: &writer,
            runner: self.runner.as_ref(),
        };
        let options = AddOptions {
            overwrite: self.args.force,
            yes: true,
            skip_install: self.args.skip_install,
        };
        installer.run(&[INDEX_ITEM.to_string()], options, ui)?;

        ui.success("Project initialized");
        ui.show_hint("Add components with: stencil add <name>");
        Ok(CommandResult::success())
    }
}

fn first_existing<'a>(root: &Path, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .find(|candidate| root.join(candidate).exists())
}

#[cfg(test)]
mod tests {
    use super::super::add::test_support::RecordingRunner;
    use super::*;
    use crate::config::load_raw_config;
    use crate::registry::RegistrySource;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    const INDEX: &str = r#"{
        "name": "index",
        "type": "registry:style",
        "dependencies": ["clsx", "tailwind-merge"],
        "files": [{
            "path": "lib/utils.ts",
            "type": "registry:lib",
            "content": "export function cn() {}\n"
        }]
    }"#;

    const NEUTRAL: &str = r#"{
        "cssVars": {
            "light": { "background": "0 0% 100%" },
            "dark": { "background": "0 0% 3.9%" }
        }
    }"#;

    /// A project with a tsconfig and a local registry next to it.
    fn setup() -> (TempDir, PathBuf, Sources) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("app");
        fs::create_dir_all(root.join("app")).unwrap();
        fs::write(
            root.join("tsconfig.json"),
            r#"{ "compilerOptions": { "paths": { "@/*": ["./*"] } } }"#,
        )
        .unwrap();
        fs::write(root.join("app/globals.css"), TAILWIND_DIRECTIVES).unwrap();

        let registry = temp.path().join("registry");
        fs::create_dir_all(registry.join("styles/new-york")).unwrap();
        fs::create_dir_all(registry.join("colors")).unwrap();
        fs::write(registry.join("styles/new-york/index.json"), INDEX).unwrap();
        fs::write(registry.join("colors/neutral.json"), NEUTRAL).unwrap();

        let sources = Sources::new(
            &root,
            RegistrySource::default_at(registry.to_str().unwrap(), None),
        );
        (temp, root, sources)
    }

    fn yes_args() -> InitArgs {
        InitArgs {
            yes: true,
            ..Default::default()
        }
    }

    #[test]
    fn init_writes_config_theme_and_utils() {
        let (_temp, root, sources) = setup();
        let runner = Arc::new(RecordingRunner::default());
        let mut ui = MockUI::new();

        let result = InitCommand::new(&root, yes_args())
            .with_sources(sources)
            .with_runner(runner.clone())
            .execute(&mut ui)
            .unwrap();
        assert!(result.success);

        let raw = load_raw_config(&root).unwrap();
        assert_eq!(raw.style, "new-york");
        assert_eq!(raw.tailwind.base_color, "neutral");
        assert_eq!(raw.tailwind.css, "app/globals.css");
        assert!(raw.tsx);

        let css = fs::read_to_string(root.join("app/globals.css")).unwrap();
        assert!(css.starts_with("@tailwind base;"));
        assert!(css.contains("--background: 0 0% 100%;"));
        assert!(css.contains("--background: 0 0% 3.9%;"));
        assert!(css.contains("@apply border-border;"));

        assert_eq!(
            fs::read_to_string(root.join("lib/utils.ts")).unwrap(),
            "export function cn() {}\n"
        );
        assert_eq!(
            runner.calls(),
            vec![(
                "npm".to_string(),
                vec![
                    "install".to_string(),
                    "clsx".to_string(),
                    "tailwind-merge".to_string()
                ]
            )]
        );
    }

    #[test]
    fn existing_config_needs_force() {
        let (_temp, root, sources) = setup();
        fs::write(root.join("components.json"), "{}").unwrap();
        let mut ui = MockUI::new();

        let result = InitCommand::new(&root, yes_args())
            .with_sources(sources)
            .execute(&mut ui)
            .unwrap();
        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("already exists"));
    }

    #[test]
    fn flags_and_prompts_shape_the_config() {
        let (_temp, root, _) = setup();
        let mut ui = MockUI::new();
        ui.set_prompt_response("base-color", "zinc");
        ui.set_prompt_response("css-variables", "no");

        let args = InitArgs {
            style: Some("default".to_string()),
            css: Some("src/index.css".to_string()),
            ..Default::default()
        };
        let raw = InitCommand::new(&root, args).build_config(&mut ui).unwrap();

        assert_eq!(raw.style, "default");
        assert_eq!(raw.tailwind.base_color, "zinc");
        assert_eq!(raw.tailwind.css, "src/index.css");
        assert!(!raw.tailwind.css_variables);
        assert_eq!(ui.prompts_shown(), &["base-color", "css-variables"]);
    }

    #[test]
    fn detects_javascript_and_next_projects() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("jsconfig.json"), "{}").unwrap();
        fs::write(temp.path().join("next.config.mjs"), "").unwrap();
        fs::write(temp.path().join("tailwind.config.js"), "").unwrap();
        fs::create_dir_all(temp.path().join("src/app")).unwrap();
        let mut ui = MockUI::new();

        let raw = InitCommand::new(temp.path(), yes_args())
            .build_config(&mut ui)
            .unwrap();
        assert!(!raw.tsx);
        assert!(raw.rsc);
        assert_eq!(raw.tailwind.config, "tailwind.config.js");
        assert!(ui.prompts_shown().is_empty());
    }
}
