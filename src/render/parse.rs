//! Template parsing.
//!
//! A template is plain text with `{{ ... }}` tags:
//!
//! ```text
//! {{ model.name }}                        escaped value
//! {{ model.nFriends | int }}              filtered value
//! {{ url_for "friends/:permalink" f.permalink }}
//! {{ absolute_url_for "simple" }}
//! {{ partial "card" friend }}             another template, unescaped
//! {{ for friend in model }} ... {{ end }}
//! ```

use std::fmt;
use std::mem;

use super::TemplateError;

/// Dotted variable path, e.g. `model.friends.0.name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarPath(Vec<String>);

impl VarPath {
    /// Segments are `[0-9A-Za-z_]+`; the first may not start with a digit.
    fn parse(s: &str) -> Option<Self> {
        let segments: Vec<String> = s.split('.').map(String::from).collect();
        let valid = segments.iter().all(|seg| {
            !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
        });
        (valid && is_identifier(&segments[0])).then_some(Self(segments))
    }

    pub fn root(&self) -> &str {
        &self.0[0]
    }

    pub fn rest(&self) -> &[String] {
        &self.0[1..]
    }
}

impl fmt::Display for VarPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Whether `s` is `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(s: &str) -> bool {
    let mut bytes = s.bytes();
    matches!(bytes.next(), Some(b) if b.is_ascii_alphabetic() || b == b'_')
        && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Argument of a route lookup tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Literal(String),
    Var(VarPath),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// Skip HTML escaping.
    Raw,
    /// Round a number and group its digits: `2000` -> `2,000`.
    Int,
}

impl Filter {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "raw" => Some(Self::Raw),
            "int" => Some(Self::Int),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Expr {
        path: VarPath,
        filters: Vec<Filter>,
    },
    UrlFor {
        absolute: bool,
        path: String,
        args: Vec<Arg>,
    },
    Partial {
        template: String,
        locals: Option<VarPath>,
    },
    For {
        var: String,
        iter: VarPath,
        body: Vec<Node>,
    },
}

/// A parsed template.
#[derive(Debug)]
pub struct Template {
    id: String,
    nodes: Vec<Node>,
}

/// A `{{ for }}` awaiting its `{{ end }}`.
struct OpenFor {
    var: String,
    iter: VarPath,
    line: usize,
    parent: Vec<Node>,
}

impl Template {
    pub fn parse(id: &str, source: &str) -> Result<Self, TemplateError> {
        let mut current = Vec::new();
        let mut open: Vec<OpenFor> = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                current.push(Node::Text(rest[..start].to_string()));
            }
            let line = line_at(source, offset + start);
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                return Err(TemplateError::UnclosedTag {
                    template: id.to_string(),
                    line,
                });
            };
            let tag = after[..end].trim();
            let invalid = |reason| TemplateError::InvalidTag {
                template: id.to_string(),
                line,
                tag: tag.to_string(),
                reason,
            };

            match parse_tag(tag).map_err(invalid)? {
                Tag::Node(node) => current.push(node),
                Tag::For { var, iter } => open.push(OpenFor {
                    var,
                    iter,
                    line,
                    parent: mem::take(&mut current),
                }),
                Tag::End => {
                    let Some(frame) = open.pop() else {
                        return Err(TemplateError::UnmatchedEnd {
                            template: id.to_string(),
                            line,
                        });
                    };
                    let body = mem::replace(&mut current, frame.parent);
                    current.push(Node::For {
                        var: frame.var,
                        iter: frame.iter,
                        body,
                    });
                }
            }

            let consumed = start + 2 + end + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }

        if !rest.is_empty() {
            current.push(Node::Text(rest.to_string()));
        }
        if let Some(frame) = open.pop() {
            return Err(TemplateError::UnclosedFor {
                template: id.to_string(),
                line: frame.line,
            });
        }

        Ok(Self {
            id: id.to_string(),
            nodes: current,
        })
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

/// 1-based line number of a byte offset.
fn line_at(source: &str, offset: usize) -> usize {
    source[..offset].matches('\n').count() + 1
}

// ============================================================================
// tags
// ============================================================================

enum Tag {
    Node(Node),
    For { var: String, iter: VarPath },
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Word(&'a str),
    Str(&'a str),
    Pipe,
}

fn tokenize(tag: &str) -> Result<Vec<Token<'_>>, &'static str> {
    let mut tokens = Vec::new();
    let mut chars = tag.char_indices().peekable();

    while let Some(&(i, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '|' {
            chars.next();
            tokens.push(Token::Pipe);
        } else if c == '"' {
            chars.next();
            let end = loop {
                match chars.next() {
                    Some((j, '"')) => break j,
                    Some(_) => {}
                    None => return Err("unterminated string literal"),
                }
            };
            tokens.push(Token::Str(&tag[i + 1..end]));
        } else {
            let mut end = tag.len();
            while let Some(&(j, c)) = chars.peek() {
                if c.is_whitespace() || c == '|' || c == '"' {
                    end = j;
                    break;
                }
                chars.next();
            }
            tokens.push(Token::Word(&tag[i..end]));
        }
    }

    Ok(tokens)
}

fn var(word: &str) -> Result<VarPath, &'static str> {
    VarPath::parse(word).ok_or("not a valid variable path")
}

fn parse_tag(tag: &str) -> Result<Tag, &'static str> {
    use Token::{Pipe, Str, Word};

    let tokens = tokenize(tag)?;
    let node = match tokens.as_slice() {
        [] => return Err("empty tag"),
        [Word("end")] => return Ok(Tag::End),
        [Word("for"), Word(name), Word("in"), Word(iter)] => {
            if !is_identifier(name) {
                return Err("loop variable must be an identifier");
            }
            return Ok(Tag::For {
                var: name.to_string(),
                iter: var(iter)?,
            });
        }
        [Word("for"), ..] => return Err("expected `for <name> in <variable>`"),
        [Word(cmd @ ("url_for" | "absolute_url_for")), Str(path), args @ ..] => {
            let args = args
                .iter()
                .map(|token| match token {
                    Str(s) => Ok(Arg::Literal(s.to_string())),
                    Word(w) => var(w).map(Arg::Var),
                    Pipe => Err("route lookups take no filters"),
                })
                .collect::<Result<_, _>>()?;
            Node::UrlFor {
                absolute: *cmd == "absolute_url_for",
                path: path.to_string(),
                args,
            }
        }
        [Word("url_for" | "absolute_url_for"), ..] => return Err("expected a quoted path"),
        [Word("partial"), Str(template)] => Node::Partial {
            template: template.to_string(),
            locals: None,
        },
        [Word("partial"), Str(template), Word(locals)] => Node::Partial {
            template: template.to_string(),
            locals: Some(var(locals)?),
        },
        [Word("partial"), ..] => return Err("expected `partial \"<template>\" [locals]`"),
        [Word(path), filters @ ..] => Node::Expr {
            path: var(path)?,
            filters: parse_filters(filters)?,
        },
        _ => return Err("expected a variable, `for`, `end`, `url_for` or `partial`"),
    };
    Ok(Tag::Node(node))
}

fn parse_filters(tokens: &[Token<'_>]) -> Result<Vec<Filter>, &'static str> {
    tokens
        .chunks(2)
        .map(|pair| match pair {
            [Token::Pipe, Token::Word(name)] => Filter::parse(name).ok_or("unknown filter"),
            _ => Err("expected `| <filter>`"),
        })
        .collect()
}
