//! Template evaluation against a [`RenderScope`].

use std::borrow::Cow;

use anyhow::{Context as _, Result};
use serde_json::Value;

use super::parse::{Arg, Filter, Node, Template, VarPath};
use super::{RenderScope, TemplateError};
use crate::database::kind_of;
use crate::utils::html::{escape, escape_attr};

static NULL: Value = Value::Null;

/// Render a parsed template to bytes.
pub fn render(template: &Template, scope: &RenderScope<'_>) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut eval = Eval {
        id: template.id(),
        scope,
        loops: Vec::new(),
    };
    eval.nodes(template.nodes(), &mut out)?;
    Ok(out)
}

struct Eval<'t, 's, 'a> {
    id: &'t str,
    scope: &'s RenderScope<'a>,
    /// Loop variables, innermost last.
    loops: Vec<(&'t str, &'a Value)>,
}

impl<'t, 'a> Eval<'t, '_, 'a> {
    fn nodes(&mut self, nodes: &'t [Node], out: &mut Vec<u8>) -> Result<()> {
        for node in nodes {
            match node {
                Node::Text(text) => out.extend_from_slice(text.as_bytes()),
                Node::Expr { path, filters } => {
                    let value = self.lookup(path)?;
                    write_value(out, &value, filters);
                }
                Node::UrlFor {
                    absolute,
                    path,
                    args,
                } => {
                    let args = args
                        .iter()
                        .map(|arg| self.arg(arg))
                        .collect::<Result<Vec<_>, _>>()?;
                    let routes = self.scope.routes;
                    let url = if *absolute {
                        routes.absolute_url_for(path, &args)
                    } else {
                        routes.url_for(path, &args).map(|href| href.to_string())
                    }
                    .with_context(|| format!("in template `{}`", self.id))?;
                    out.extend_from_slice(escape_attr(&url).as_bytes());
                }
                Node::Partial { template, locals } => {
                    let body = match locals {
                        None => self.scope.partial_bare(template)?,
                        Some(path) => match self.lookup(path)?.as_ref() {
                            Value::Object(locals) => self.scope.partial(template, locals)?,
                            Value::Null => self.scope.partial_bare(template)?,
                            other => {
                                return Err(TemplateError::InvalidLocals {
                                    template: self.id.to_string(),
                                    expr: path.to_string(),
                                    found: kind_of(other),
                                }
                                .into());
                            }
                        },
                    };
                    out.extend_from_slice(&body);
                }
                Node::For { var, iter, body } => {
                    let items: &'a [Value] = match self.lookup(iter)? {
                        Cow::Borrowed(Value::Array(items)) => items,
                        Cow::Borrowed(Value::Null) => &[],
                        other => {
                            return Err(TemplateError::NotIterable {
                                template: self.id.to_string(),
                                expr: iter.to_string(),
                                found: kind_of(&other),
                            }
                            .into());
                        }
                    };
                    for item in items {
                        self.loops.push((var.as_str(), item));
                        let result = self.nodes(body, out);
                        self.loops.pop();
                        result?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Resolve a variable path. Missing fields resolve to `null`; an unknown
    /// root name is an error.
    fn lookup(&self, path: &VarPath) -> Result<Cow<'a, Value>, TemplateError> {
        let root = path.root();
        let rest = path.rest();

        if let Some(&(_, value)) = self.loops.iter().rev().find(|(name, _)| *name == root) {
            return Ok(Cow::Borrowed(descend(value, rest)));
        }

        let scope = self.scope;
        let value = match root {
            "url" if rest.is_empty() => {
                return Ok(Cow::Owned(Value::String(scope.url.to_string())));
            }
            "url" => &NULL,
            "model" => descend(scope.model.unwrap_or(&NULL), rest),
            "locals" => match rest.split_first() {
                None => return Ok(Cow::Owned(Value::Object(scope.locals.clone()))),
                Some((key, rest)) => descend(scope.locals.get(key).unwrap_or(&NULL), rest),
            },
            name => match scope.globals.get(name) {
                Some(value) => descend(value, rest),
                None => {
                    return Err(TemplateError::UnknownVariable {
                        template: self.id.to_string(),
                        name: name.to_string(),
                    });
                }
            },
        };
        Ok(Cow::Borrowed(value))
    }

    /// A route parameter: a literal, or a variable holding a scalar.
    fn arg(&self, arg: &Arg) -> Result<String, TemplateError> {
        match arg {
            Arg::Literal(s) => Ok(s.clone()),
            Arg::Var(path) => {
                let value = self.lookup(path)?;
                match &*value {
                    Value::String(s) if !s.is_empty() => Ok(s.clone()),
                    Value::Number(n) => Ok(n.to_string()),
                    Value::Bool(b) => Ok(b.to_string()),
                    other => Err(TemplateError::InvalidArgument {
                        template: self.id.to_string(),
                        expr: path.to_string(),
                        found: kind_of(other),
                    }),
                }
            }
        }
    }
}

/// Follow object keys and numeric array indices.
fn descend<'v>(mut value: &'v Value, segments: &[String]) -> &'v Value {
    for segment in segments {
        let next = match value {
            Value::Object(map) => map.get(segment.as_str()),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        value = next.unwrap_or(&NULL);
    }
    value
}

fn write_value(out: &mut Vec<u8>, value: &Value, filters: &[Filter]) {
    let mut text: Cow<'_, str> = match value {
        Value::Null => Cow::Borrowed(""),
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    };
    let mut raw = false;

    for filter in filters {
        match filter {
            Filter::Raw => raw = true,
            Filter::Int => {
                if let Some(n) = value.as_f64() {
                    text = Cow::Owned(group_digits(n));
                }
            }
        }
    }

    if raw {
        out.extend_from_slice(text.as_bytes());
    } else {
        out.extend_from_slice(escape(&text).as_bytes());
    }
}

/// Round and insert thousands separators: `1234567.8` -> `1,234,568`.
fn group_digits(n: f64) -> String {
    let rounded = n.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
