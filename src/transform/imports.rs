//! Import-alias rewriting.
//!
//! Registry sources import each other through registry-internal paths such
//! as `@/registry/new-york/ui/button`. These are rewritten to the aliases the
//! project declares in `components.json`.

use super::lexer::{significant, splice, tokenize, Token, TokenKind};
use crate::config::ProjectConfig;
use super::{TransformContext, Transformer};

const REGISTRY_PREFIX: &str = "@/registry/";
const REMOTE_STYLE_PREFIX: &str = "@/registry/new-york/";
const UTILS_SPECIFIER: &str = "@/lib/utils";

/// Rewrites module specifiers in imports, re-exports, `import()` and `require()`.
pub struct ImportRewriter;

impl Transformer for ImportRewriter {
    fn name(&self) -> &'static str {
        "imports"
    }

    fn transform(&self, source: &str, ctx: &TransformContext<'_>) -> Result<String, String> {
        let tokens = tokenize(source);
        let sig = significant(&tokens);
        let mut edits = Vec::new();

        for (pos, &idx) in sig.iter().enumerate() {
            let token = tokens[idx];
            if token.kind != TokenKind::Str || !is_module_specifier(source, &tokens, &sig, pos) {
                continue;
            }

            let original = token.inner(source);
            let mut rewritten = rewrite_specifier(original, ctx);
            if rewritten == UTILS_SPECIFIER && imports_binding(source, &tokens, &sig, pos, "cn") {
                rewritten = ctx.config.aliases().utils.clone();
            }

            if rewritten != original {
                tracing::debug!("{}: {} -> {}", ctx.file.path, original, rewritten);
                let quote = &source[token.start..token.start + 1];
                edits.push((token.start, token.end, format!("{quote}{rewritten}{quote}")));
            }
        }

        Ok(splice(source, edits))
    }
}

/// Map one specifier to the project's aliases.
pub fn rewrite_specifier(specifier: &str, ctx: &TransformContext<'_>) -> String {
    let config = ctx.config;

    let specifier = if ctx.remote && specifier.starts_with("@/") {
        if under_project_alias(specifier, config) {
            return specifier.to_string();
        }
        specifier.replacen("@/", REMOTE_STYLE_PREFIX, 1)
    } else if specifier.starts_with("@/") {
        specifier.to_string()
    } else {
        return specifier.to_string();
    };

    let Some(rest) = specifier.strip_prefix(REGISTRY_PREFIX) else {
        let root = config
            .aliases()
            .components
            .split('/')
            .next()
            .unwrap_or("@");
        return format!("{}/{}", root, &specifier[2..]);
    };

    // `<style>/<area>/<tail>`
    let mut parts = rest.splitn(3, '/');
    let style = parts.next().unwrap_or_default();
    let area = parts.next();
    let tail = parts.next();

    let base = match area {
        Some("ui") => config.ui_alias(),
        Some("components") => config.aliases().components.clone(),
        Some("lib") => config.lib_alias(),
        Some("hooks") => config.hooks_alias(),
        _ => {
            tracing::trace!("{} has no known area under style {}", specifier, style);
            let after_style = rest.split_once('/').map(|(_, t)| t);
            return join(&config.aliases().components, after_style);
        }
    };
    join(&base, tail)
}

/// Whether `specifier` already points into one of the project's aliases.
fn under_project_alias(specifier: &str, config: &ProjectConfig) -> bool {
    let aliases = config.aliases();
    [
        config.ui_alias(),
        aliases.components.clone(),
        config.lib_alias(),
        config.hooks_alias(),
        aliases.utils.clone(),
    ]
    .iter()
    .any(|alias| {
        specifier
            .strip_prefix(alias.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

fn join(base: &str, tail: Option<&str>) -> String {
    match tail {
        Some(tail) if !tail.is_empty() => format!("{}/{}", base, tail),
        _ => base.to_string(),
    }
}

/// Whether the string at `sig[pos]` is the module specifier of an import form.
fn is_module_specifier(source: &str, tokens: &[Token], sig: &[usize], pos: usize) -> bool {
    let at = |back: usize| -> Option<&Token> {
        pos.checked_sub(back).map(|p| &tokens[sig[p]])
    };
    let not_member = |back: usize| !at(back).is_some_and(|t| t.is_punct(source, '.'));

    match at(1) {
        Some(t) if t.is_ident(source, "from") => not_member(2),
        Some(t) if t.is_ident(source, "import") => not_member(2),
        Some(t) if t.is_punct(source, '(') => at(2).is_some_and(|callee| {
            (callee.is_ident(source, "import") || callee.is_ident(source, "require"))
                && not_member(3)
        }),
        _ => false,
    }
}

/// Whether the import whose specifier sits at `sig[pos]` binds `name` in its
/// `{ ... }` clause.
fn imports_binding(source: &str, tokens: &[Token], sig: &[usize], pos: usize, name: &str) -> bool {
    let mut in_braces = false;
    for p in (0..pos).rev() {
        let t = &tokens[sig[p]];
        if t.is_ident(source, "import") || t.is_ident(source, "export") || t.is_punct(source, ';') {
            break;
        }
        if t.is_punct(source, '}') {
            in_braces = true;
        } else if t.is_punct(source, '{') {
            in_braces = false;
        } else if in_braces && t.is_ident(source, name) && p > 0 {
            // `cn as merge` binds cn; `merge as cn` does not.
            let prev = &tokens[sig[p - 1]];
            if prev.is_punct(source, ',') || prev.is_punct(source, '{') || prev.is_ident(source, "type") {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::{config_with, context, file, item};

    fn run(source: &str, remote: bool) -> String {
        let config = config_with(|_| {});
        let item = item();
        let file = file("ui/button.tsx");
        let ctx = context(&config, &item, &file, remote);
        ImportRewriter.transform(source, &ctx).unwrap()
    }

    #[test]
    fn registry_ui_import_goes_to_ui_alias() {
        assert_eq!(
            run(r#"import { Button } from "@/registry/new-york/ui/button""#, false),
            r#"import { Button } from "@/components/ui/button""#
        );
    }

    #[test]
    fn registry_areas_map_to_aliases() {
        let source = r#"import { useToast } from "@/registry/default/hooks/use-toast"
import { Chart } from "@/registry/default/components/chart"
import { helper } from "@/registry/default/lib/helper"
import { Demo } from "@/registry/default/example/demo""#;
        let expected = r#"import { useToast } from "@/hooks/use-toast"
import { Chart } from "@/components/chart"
import { helper } from "@/lib/helper"
import { Demo } from "@/components/example/demo""#;
        assert_eq!(run(source, false), expected);
    }

    #[test]
    fn other_at_imports_use_components_root() {
        let config = config_with(|raw| raw.aliases.components = "~/components".to_string());
        let item = item();
        let file = file("ui/button.tsx");
        let ctx = context(&config, &item, &file, false);
        assert_eq!(
            ImportRewriter
                .transform(r#"import x from "@/app/thing""#, &ctx)
                .unwrap(),
            r#"import x from "~/app/thing""#
        );
    }

    #[test]
    fn cn_import_goes_to_utils_alias() {
        let config = config_with(|raw| raw.aliases.utils = "@/shared/cn".to_string());
        let item = item();
        let file = file("ui/button.tsx");
        let ctx = context(&config, &item, &file, false);
        assert_eq!(
            ImportRewriter
                .transform(r#"import { cn } from "@/lib/utils""#, &ctx)
                .unwrap(),
            r#"import { cn } from "@/shared/cn""#
        );
        assert_eq!(
            ImportRewriter
                .transform(r#"import { other } from "@/lib/utils""#, &ctx)
                .unwrap(),
            r#"import { other } from "@/lib/utils""#
        );
    }

    #[test]
    fn dynamic_require_and_reexport_forms() {
        let source = r#"export { Button } from '@/registry/default/ui/button';
import "@/registry/default/ui/styles";
const lazy = import("@/registry/default/ui/dialog");
const card = require("@/registry/default/ui/card");"#;
        let out = run(source, false);
        assert!(out.contains("from '@/components/ui/button'"));
        assert!(out.contains(r#"import "@/components/ui/styles""#));
        assert!(out.contains(r#"import("@/components/ui/dialog")"#));
        assert!(out.contains(r#"require("@/components/ui/card")"#));
    }

    #[test]
    fn comments_and_plain_strings_are_untouched() {
        let source = r#"// import { Button } from "@/registry/default/ui/button"
const path = "@/registry/default/ui/button";
obj.from("@/registry/default/ui/button");"#;
        assert_eq!(run(source, false), source);
    }

    #[test]
    fn package_imports_are_untouched() {
        let source = r#"import * as React from "react""#;
        assert_eq!(run(source, false), source);
    }

    #[test]
    fn remote_items_read_at_imports_as_registry_paths() {
        assert_eq!(
            run(r#"import { Button } from "@/ui/button""#, true),
            r#"import { Button } from "@/components/ui/button""#
        );
        assert_eq!(
            run(r#"import { cn } from "@/lib/utils""#, true),
            r#"import { cn } from "@/lib/utils""#
        );
    }

    #[test]
    fn rewrite_is_idempotent() {
        let source = r#"import { Button } from "@/registry/new-york/ui/button"
import { cn } from "@/lib/utils""#;
        let once = run(source, false);
        assert_eq!(run(&once, false), once);
        let remote_once = run(source, true);
        assert_eq!(run(&remote_once, true), remote_once);
    }

    #[test]
    fn remote_rewrite_is_idempotent_with_custom_ui_alias() {
        let config = config_with(|raw| raw.aliases.ui = Some("@/design/primitives".to_string()));
        let item = item();
        let file = file("ui/button.tsx");
        let ctx = context(&config, &item, &file, true);
        let source = r#"import { Button } from "@/ui/button"
import { useMobile } from "@/hooks/use-mobile""#;

        let once = ImportRewriter.transform(source, &ctx).unwrap();
        assert!(once.contains(r#"from "@/design/primitives/button""#));
        let twice = ImportRewriter.transform(&once, &ctx).unwrap();
        assert_eq!(twice, once);
    }

    #[test]
    fn alias_prefix_needs_a_segment_boundary() {
        let config = config_with(|_| {});
        assert!(under_project_alias("@/components/ui/button", &config));
        assert!(under_project_alias("@/lib/utils", &config));
        assert!(!under_project_alias("@/components-extra/card", &config));
        assert!(!under_project_alias("@/ui/button", &config));
    }

    #[test]
    fn different_aliases_give_different_deterministic_results() {
        let item = item();
        let file = file("ui/button.tsx");
        let a = config_with(|_| {});
        let b = config_with(|raw| raw.aliases.ui = Some("@/design/primitives".to_string()));
        let source = r#"import { Button } from "@/registry/new-york/ui/button""#;

        let out_a = ImportRewriter
            .transform(source, &context(&a, &item, &file, false))
            .unwrap();
        let out_b = ImportRewriter
            .transform(source, &context(&b, &item, &file, false))
            .unwrap();
        assert_ne!(out_a, out_b);
        assert!(out_b.contains("@/design/primitives/button"));
        assert_eq!(
            out_a,
            ImportRewriter
                .transform(source, &context(&a, &item, &file, false))
                .unwrap()
        );
    }
}
