//! Span-based CSS block parsing.
//!
//! Only the block structure is parsed: each `prelude { ... }` with its byte
//! offsets and nested blocks, plus the `;`-separated statements directly
//! inside a block. Edits are made by splicing text at those offsets, so
//! formatting outside the edited spans is preserved.

/// A `prelude { body }` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Selector or at-rule text, whitespace-collapsed.
    pub prelude: String,
    /// Offset of the first prelude byte.
    pub start: usize,
    /// Offset of `{`.
    pub open: usize,
    /// Offset of `}`.
    pub close: usize,
    pub children: Vec<Block>,
}

impl Block {
    /// Direct child whose prelude equals `prelude`.
    pub fn child(&self, prelude: &str) -> Option<&Block> {
        self.children.iter().find(|c| c.prelude == prelude)
    }
}

/// A `;`-terminated statement directly inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Text before the first `:`, trimmed (`--radius`, `@apply x`).
    pub name: String,
    /// Offsets of the trimmed value after `:`; empty range when there is none.
    pub value_start: usize,
    pub value_end: usize,
    /// Offset just past the statement (after `;` when present).
    pub end: usize,
    pub terminated: bool,
}

/// Parse the top-level blocks of a stylesheet.
pub fn parse(source: &str) -> Result<Vec<Block>, String> {
    let bytes = source.as_bytes();
    let mut stack: Vec<Block> = Vec::new();
    let mut roots = Vec::new();
    let mut statement_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = match source[i + 2..].find("*/") {
                    Some(off) => i + 2 + off + 2,
                    None => return Err("unterminated comment".to_string()),
                };
                continue;
            }
            b'"' | b'\'' => {
                i = skip_string(bytes, i)?;
                continue;
            }
            b'{' => {
                let raw = &source[statement_start..i];
                let start = statement_start + (raw.len() - raw.trim_start().len());
                stack.push(Block {
                    prelude: collapse(strip_comments(raw).trim()),
                    start,
                    open: i,
                    close: i,
                    children: Vec::new(),
                });
                statement_start = i + 1;
            }
            b'}' => {
                let mut block = stack
                    .pop()
                    .ok_or_else(|| format!("unexpected '}}' at byte {}", i))?;
                block.close = i;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(block),
                    None => roots.push(block),
                }
                statement_start = i + 1;
            }
            b';' => statement_start = i + 1,
            _ => {}
        }
        i += 1;
    }

    if let Some(open) = stack.last() {
        return Err(format!("unclosed block '{}'", open.prelude));
    }
    Ok(roots)
}

/// Statements directly inside `block`, skipping nested blocks.
pub fn statements(source: &str, block: &Block) -> Vec<Statement> {
    let mut out = Vec::new();
    let mut segment_start = block.open + 1;
    let mut cursor = block.open + 1;
    let mut children = block.children.iter().peekable();

    let push = |from: usize, to: usize, terminated: bool, out: &mut Vec<Statement>| {
        let text = &source[from..to];
        if text.trim().is_empty() || strip_comments(text).trim().is_empty() {
            return;
        }
        let (name, value_start, value_end) = match text.find(':') {
            Some(colon) => {
                let value = &text[colon + 1..];
                let lead = value.len() - value.trim_start().len();
                let vs = from + colon + 1 + lead;
                (
                    strip_comments(&text[..colon]).trim().to_string(),
                    vs,
                    vs + value.trim().len(),
                )
            }
            None => (strip_comments(text).trim().to_string(), to, to),
        };
        out.push(Statement {
            name,
            value_start,
            value_end,
            end: if terminated { to + 1 } else { to },
            terminated,
        });
    };

    while cursor < block.close {
        if let Some(child) = children.peek() {
            if cursor == child.start {
                cursor = child.close + 1;
                segment_start = cursor;
                children.next();
                continue;
            }
        }
        match source.as_bytes()[cursor] {
            b';' => {
                push(segment_start, cursor, true, &mut out);
                segment_start = cursor + 1;
            }
            b'/' if source.as_bytes().get(cursor + 1) == Some(&b'*') => {
                if let Some(off) = source[cursor + 2..].find("*/") {
                    cursor += off + 4;
                    continue;
                }
            }
            _ => {}
        }
        cursor += 1;
    }
    push(segment_start, block.close, false, &mut out);
    out
}

/// Leading whitespace of the line containing `offset`.
pub fn indent_at(source: &str, offset: usize) -> &str {
    let line_start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line = &source[line_start..];
    &line[..line.len() - line.trim_start_matches([' ', '\t']).len()]
}

fn skip_string(bytes: &[u8], start: usize) -> Result<usize, String> {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return Ok(i + 1),
            _ => i += 1,
        }
    }
    Err(format!("unterminated string at byte {}", start))
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        rest = match rest[start + 2..].find("*/") {
            Some(end) => &rest[start + 2 + end + 2..],
            None => "",
        };
    }
    out.push_str(rest);
    out
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "@tailwind base;\n\n@layer base {\n  :root {\n    --radius: 0.5rem;\n    --background: white\n  }\n  .dark { --background: black; }\n}\n\nbody { margin: 0 }\n";

    #[test]
    fn parses_nested_blocks() {
        let blocks = parse(SHEET).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].prelude, "@layer base");
        assert_eq!(blocks[1].prelude, "body");

        let layer = &blocks[0];
        assert_eq!(layer.children.len(), 2);
        assert!(layer.child(":root").is_some());
        assert!(layer.child(".dark").is_some());
        assert_eq!(&SHEET[layer.start..layer.open], "@layer base ");
    }

    #[test]
    fn statements_report_names_and_values() {
        let blocks = parse(SHEET).unwrap();
        let root = blocks[0].child(":root").unwrap();
        let stmts = statements(SHEET, root);
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0].name, "--radius");
        assert_eq!(&SHEET[stmts[0].value_start..stmts[0].value_end], "0.5rem");
        assert!(stmts[0].terminated);
        assert_eq!(stmts[1].name, "--background");
        assert_eq!(&SHEET[stmts[1].value_start..stmts[1].value_end], "white");
        assert!(!stmts[1].terminated);
    }

    #[test]
    fn statements_skip_nested_blocks() {
        let blocks = parse(SHEET).unwrap();
        assert!(statements(SHEET, &blocks[0]).is_empty());
    }

    #[test]
    fn braces_in_comments_and_strings_are_ignored() {
        let sheet = "/* { */ a { content: \"}\"; }";
        let blocks = parse(sheet).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].prelude, "a");
    }

    #[test]
    fn unbalanced_braces_are_errors() {
        assert!(parse("a { b { }").is_err());
        assert!(parse("a { } }").is_err());
    }

    #[test]
    fn indent_of_line() {
        let blocks = parse(SHEET).unwrap();
        let root = blocks[0].child(":root").unwrap();
        assert_eq!(indent_at(SHEET, root.start), "  ");
    }
}
