//! `"use client"` directive handling.

use super::lexer::{tokenize, Token, TokenKind};
use super::{TransformContext, Transformer};

const CLIENT_DIRECTIVE: &str = "use client";

/// Removes the client directive from non-RSC projects, and adds it to RSC
/// projects for items marked `meta.client`.
pub struct DirectiveAdjuster;

impl Transformer for DirectiveAdjuster {
    fn name(&self) -> &'static str {
        "directive"
    }

    fn transform(&self, source: &str, ctx: &TransformContext<'_>) -> Result<String, String> {
        let tokens = tokenize(source);
        let directive = find_directive(source, &tokens);

        match (ctx.config.rsc(), directive) {
            (false, Some((start, end))) => {
                let mut out = String::with_capacity(source.len());
                out.push_str(&source[..start]);
                out.push_str(source[end..].trim_start_matches(['\r', '\n']));
                Ok(out)
            }
            (true, None) if ctx.item.needs_client_directive() => {
                Ok(format!("\"{}\"\n\n{}", CLIENT_DIRECTIVE, source))
            }
            _ => Ok(source.to_string()),
        }
    }
}

/// Byte range of a leading `"use client"` statement, including its `;`.
fn find_directive(source: &str, tokens: &[Token]) -> Option<(usize, usize)> {
    let mut significant = tokens.iter().filter(|t| !t.is_trivia());
    let first = significant.next()?;
    if first.kind != TokenKind::Str || first.inner(source) != CLIENT_DIRECTIVE {
        return None;
    }
    let end = match significant.next() {
        Some(next) if next.is_punct(source, ';') => next.end,
        _ => first.end,
    };
    Some((first.start, end))
}
