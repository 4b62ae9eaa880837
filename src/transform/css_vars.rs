//! Merging theme variables into the global stylesheet.
//!
//! Variables land in `:root` (light and theme) and `.dark` (dark) rules. An
//! existing top-level rule with that selector is reused; otherwise the rule
//! lives in the stylesheet's `@layer base`, which is created when missing.
//! Existing declarations are updated in place and unrelated rules are left
//! byte-for-byte alone.

use super::css::{indent_at, parse, statements, Block};
use super::lexer::splice;
use crate::registry::CssVars;

const BASE_LAYER: &str = "@layer base";

/// Utility classes the base layer applies when CSS variables are enabled.
const BASE_RULES: [(&str, &str); 2] = [
    ("*", "border-border"),
    ("body", "bg-background text-foreground"),
];

/// Merge `vars` into `source`.
///
/// With `base_rules`, also make sure `*` and `body` apply the border and
/// background utilities that the variables feed.
pub fn merge_css_vars(source: &str, vars: &CssVars, base_rules: bool) -> Result<String, String> {
    let mut css = source.to_string();

    let scopes = [
        (":root", &vars.theme),
        (":root", &vars.light),
        (".dark", &vars.dark),
    ];
    for (selector, map) in scopes {
        for (key, value) in map {
            css = set_var(&css, selector, key, value)?;
        }
    }

    if base_rules {
        css = ensure_base_rules(&css)?;
    }
    Ok(css)
}

fn set_var(css: &str, selector: &str, key: &str, value: &str) -> Result<String, String> {
    let name = format!("--{}", key.trim_start_matches("--"));
    let css = ensure_rule(css, selector)?;
    let blocks = parse(&css)?;
    let rule = locate_rule(&blocks, selector)
        .ok_or_else(|| format!("could not create a '{}' rule", selector))?;

    let stmts = statements(&css, rule);
    if let Some(existing) = stmts.iter().find(|s| s.name == name) {
        if css[existing.value_start..existing.value_end] == *value {
            return Ok(css);
        }
        return Ok(splice(
            &css,
            vec![(existing.value_start, existing.value_end, value.to_string())],
        ));
    }

    Ok(append_statement(&css, rule, &format!("{}: {}", name, value)))
}

fn ensure_rule(css: &str, selector: &str) -> Result<String, String> {
    let blocks = parse(css)?;
    if locate_rule(&blocks, selector).is_some() {
        return Ok(css.to_string());
    }

    let layer = blocks
        .iter()
        .filter(|b| b.prelude == BASE_LAYER)
        .find(|b| b.child(":root").is_some() || b.child(".dark").is_some())
        .or_else(|| blocks.iter().find(|b| b.prelude == BASE_LAYER));

    Ok(match layer {
        Some(layer) => insert_rule(css, layer, selector, &[]),
        None => append_layer(css, &[(selector, Vec::new())]),
    })
}

fn ensure_base_rules(css: &str) -> Result<String, String> {
    let blocks = parse(css)?;
    if BASE_RULES
        .iter()
        .all(|(selector, _)| locate_rule(&blocks, selector).is_none())
    {
        let rules: Vec<(&str, Vec<String>)> = BASE_RULES
            .iter()
            .map(|(selector, classes)| (*selector, vec![format!("@apply {}", classes)]))
            .collect();
        return Ok(append_layer(css, &rules));
    }

    let mut css = css.to_string();
    for (selector, classes) in BASE_RULES {
        let apply = format!("@apply {}", classes);
        let blocks = parse(&css)?;
        css = match locate_rule(&blocks, selector) {
            Some(rule) if css[rule.open + 1..rule.close].contains(classes) => continue,
            Some(rule) => append_statement(&css, rule, &apply),
            None => {
                let home = blocks.iter().find(|b| {
                    b.prelude == BASE_LAYER
                        && BASE_RULES.iter().any(|(s, _)| b.child(s).is_some())
                });
                match home {
                    Some(layer) => insert_rule(&css, layer, selector, &[apply]),
                    None => append_layer(&css, &[(selector, vec![apply])]),
                }
            }
        };
    }
    Ok(css)
}

/// The rule for `selector`: inside a base layer first, then at top level.
fn locate_rule<'a>(blocks: &'a [Block], selector: &str) -> Option<&'a Block> {
    blocks
        .iter()
        .filter(|b| b.prelude == BASE_LAYER)
        .find_map(|layer| layer.child(selector))
        .or_else(|| blocks.iter().find(|b| b.prelude == selector))
}

fn append_statement(css: &str, rule: &Block, statement: &str) -> String {
    let indent = format!("{}  ", indent_at(css, rule.start));
    let stmts = statements(css, rule);
    let edit = match stmts.last() {
        Some(last) if last.terminated => (last.end, format!("\n{}{};", indent, statement)),
        Some(last) => (last.value_end, format!(";\n{}{};", indent, statement)),
        None => (rule.open + 1, format!("\n{}{};", indent, statement)),
    };
    let mut out = splice(css, vec![(edit.0, edit.0, edit.1)]);
    if stmts.is_empty() && !css[rule.open + 1..rule.close].contains('\n') {
        // `a {}` → put the closing brace on its own line
        let close = rule.close + out.len() - css.len();
        out.insert_str(close, &format!("\n{}", indent_at(css, rule.start)));
    }
    out
}

fn insert_rule(css: &str, layer: &Block, selector: &str, body: &[String]) -> String {
    let indent = format!("{}  ", indent_at(css, layer.start));
    let at = layer
        .children
        .last()
        .map(|c| c.close + 1)
        .unwrap_or(layer.open + 1);

    let mut text = format!("\n{}{} {{\n", indent, selector);
    for statement in body {
        text.push_str(&format!("{}  {};\n", indent, statement));
    }
    text.push_str(&format!("{}}}", indent));
    if layer.children.is_empty() && !css[layer.open + 1..layer.close].contains('\n') {
        text.push('\n');
    }
    splice(css, vec![(at, at, text)])
}

fn append_layer(css: &str, rules: &[(&str, Vec<String>)]) -> String {
    let mut out = css.trim_end().to_string();
    if !out.is_empty() {
        out.push_str("\n\n");
    }
    out.push_str(BASE_LAYER);
    out.push_str(" {\n");
    for (selector, body) in rules {
        out.push_str(&format!("  {} {{\n", selector));
        for statement in body.iter() {
            out.push_str(&format!("    {};\n", statement));
        }
        out.push_str("  }\n");
    }
    out.push_str("}\n");
    out
}
