//! Styling-prefix injection for projects with a `tailwind.prefix`.

use super::lexer::{significant, splice, tokenize, Token, TokenKind};
use super::{TransformContext, Transformer};

/// Calls whose string arguments are class lists.
const CLASS_CALLS: [&str; 3] = ["cn", "cva", "clsx"];

/// Attributes whose string values are class lists.
const CLASS_ATTRS: [&str; 2] = ["className", "class"];

/// Prefixes utility classes in `className`/`class` attributes and in the
/// string arguments of `cn`, `cva` and `clsx`.
pub struct PrefixInjector;

impl Transformer for PrefixInjector {
    fn name(&self) -> &'static str {
        "prefix"
    }

    fn transform(&self, source: &str, ctx: &TransformContext<'_>) -> Result<String, String> {
        let prefix = ctx.config.tailwind().prefix.as_str();
        if prefix.is_empty() {
            return Ok(source.to_string());
        }

        let tokens = tokenize(source);
        let sig = significant(&tokens);
        let mut edits = Vec::new();
        // One entry per open bracket: whether it opened a class-list call.
        let mut stack: Vec<bool> = Vec::new();

        for (pos, &idx) in sig.iter().enumerate() {
            let token = tokens[idx];
            match token.kind {
                TokenKind::Punct if token.is_punct(source, '(') => {
                    let is_call = pos > 0 && {
                        let callee = tokens[sig[pos - 1]];
                        callee.kind == TokenKind::Ident
                            && CLASS_CALLS.contains(&callee.text(source))
                    };
                    stack.push(is_call);
                }
                TokenKind::Punct
                    if token.is_punct(source, '{') || token.is_punct(source, '[') =>
                {
                    stack.push(false);
                }
                TokenKind::Punct
                    if token.is_punct(source, ')')
                        || token.is_punct(source, '}')
                        || token.is_punct(source, ']') =>
                {
                    stack.pop();
                }
                TokenKind::Str => {
                    let in_call = stack.iter().any(|&c| c);
                    let in_attr = is_attribute_value(source, &tokens, &sig, pos);
                    if !(in_call && !is_object_key(source, &tokens, &sig, pos)) && !in_attr {
                        continue;
                    }
                    let classes = token.inner(source);
                    let prefixed = prefix_classes(classes, prefix);
                    if prefixed != classes {
                        let quote = &source[token.start..token.start + 1];
                        edits.push((token.start, token.end, format!("{quote}{prefixed}{quote}")));
                    }
                }
                _ => {}
            }
        }

        Ok(splice(source, edits))
    }
}

fn is_attribute_value(source: &str, tokens: &[Token], sig: &[usize], pos: usize) -> bool {
    pos >= 2
        && tokens[sig[pos - 1]].is_punct(source, '=')
        && CLASS_ATTRS.iter().any(|a| tokens[sig[pos - 2]].is_ident(source, a))
}

fn is_object_key(source: &str, tokens: &[Token], sig: &[usize], pos: usize) -> bool {
    let followed_by_colon = sig
        .get(pos + 1)
        .is_some_and(|&i| tokens[i].is_punct(source, ':'));
    let after_separator = pos > 0 && {
        let prev = tokens[sig[pos - 1]];
        prev.is_punct(source, '{') || prev.is_punct(source, ',')
    };
    followed_by_colon && after_separator
}

/// Prefix every class in a whitespace-separated list, keeping the spacing.
pub fn prefix_classes(classes: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(classes.len() + prefix.len() * 4);
    let mut word_start = None;
    for (i, ch) in classes.char_indices() {
        if ch.is_whitespace() {
            if let Some(start) = word_start.take() {
                out.push_str(&prefix_class(&classes[start..i], prefix));
            }
            out.push(ch);
        } else if word_start.is_none() {
            word_start = Some(i);
        }
    }
    if let Some(start) = word_start {
        out.push_str(&prefix_class(&classes[start..], prefix));
    }
    out
}

/// Prefix the utility part of one class: `hover:!-mt-2` → `hover:!-tw-mt-2`.
pub fn prefix_class(class: &str, prefix: &str) -> String {
    let split = last_variant_separator(class);
    let (variants, utility) = match split {
        Some(i) => class.split_at(i + 1),
        None => ("", class),
    };

    let (important, rest) = match utility.strip_prefix('!') {
        Some(rest) => ("!", rest),
        None => ("", utility),
    };
    let (negative, rest) = match rest.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rest),
    };

    if rest.is_empty() || rest.starts_with(prefix) {
        return class.to_string();
    }
    format!("{variants}{important}{negative}{prefix}{rest}")
}

/// Byte index of the last `:` outside `[...]`.
fn last_variant_separator(class: &str) -> Option<usize> {
    let mut depth = 0i32;
    let mut last = None;
    for (i, ch) in class.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth -= 1,
            ':' if depth == 0 => last = Some(i),
            _ => {}
        }
    }
    last
}
