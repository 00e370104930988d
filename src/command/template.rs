// src/command/template.rs

//! A deliberately small command template engine.
//!
//! Templates are plain shell command lines with `{{ ... }}` actions. Only a
//! fixed set of actions is understood:
//!
//! ```text
//! {{ .FilePath }}                      source file of a conversion
//! {{ .ResultFilePath }}                output file
//! {{ .FilesPaths }}                    merge inputs, joined by single spaces
//! {{ range $p := .FilesPaths }} {{ $p }} {{ end }}
//! ```
//!
//! Values are substituted verbatim (no shell quoting). Templates are parsed
//! once when the configuration is loaded; rendering only walks the parsed
//! nodes.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{Result, UnconvError};

static ACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(.*?)\s*\}\}").expect("action regex is valid"));

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^range\s+\$([A-Za-z_][A-Za-z0-9_]*)\s*:=\s*\.([A-Za-z_][A-Za-z0-9_]*)$")
        .expect("range regex is valid")
});

/// A named value a template may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FilePath,
    ResultFilePath,
    FilesPaths,
}

impl Field {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "FilePath" => Some(Field::FilePath),
            "ResultFilePath" => Some(Field::ResultFilePath),
            "FilesPaths" => Some(Field::FilesPaths),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::FilePath => "FilePath",
            Field::ResultFilePath => "ResultFilePath",
            Field::FilesPaths => "FilesPaths",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.name())
    }
}

/// A value bound to a [`Field`] at render time.
#[derive(Debug, Clone, Copy)]
pub enum Value<'a> {
    Str(&'a str),
    List(&'a [String]),
}

/// Data a template is rendered against.
pub trait TemplateData {
    /// Look up a field; `None` means this data has no such field.
    fn lookup(&self, field: Field) -> Option<Value<'_>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Text(String),
    Field(Field),
    Var(String),
    Range {
        var: String,
        field: Field,
        body: Vec<Node>,
    },
}

/// A parsed, immutable command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    source: String,
    nodes: Vec<Node>,
}

struct Frame {
    var: String,
    field: Field,
    body: Vec<Node>,
}

impl CommandTemplate {
    pub fn parse(source: &str) -> Result<Self> {
        let mut root: Vec<Node> = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut last = 0;

        for caps in ACTION_RE.captures_iter(source) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            push_text(source, current(&mut root, &mut stack), &source[last..whole.start()])?;
            last = whole.end();

            let action = &caps[1];
            if action == "end" {
                let frame = stack.pop().ok_or_else(|| {
                    template_error(source, "'{{ end }}' without a matching 'range'")
                })?;
                current(&mut root, &mut stack).push(Node::Range {
                    var: frame.var,
                    field: frame.field,
                    body: frame.body,
                });
            } else if let Some(range) = RANGE_RE.captures(action) {
                let field = parse_field(source, &range[2])?;
                stack.push(Frame {
                    var: range[1].to_string(),
                    field,
                    body: Vec::new(),
                });
            } else if let Some(name) = action.strip_prefix('.') {
                let field = parse_field(source, name)?;
                current(&mut root, &mut stack).push(Node::Field(field));
            } else if let Some(var) = action.strip_prefix('$') {
                if !stack.iter().any(|f| f.var == var) {
                    return Err(template_error(
                        source,
                        &format!("undefined variable '${var}'"),
                    ));
                }
                current(&mut root, &mut stack).push(Node::Var(var.to_string()));
            } else {
                return Err(template_error(
                    source,
                    &format!("unsupported action '{{{{ {action} }}}}'"),
                ));
            }
        }

        push_text(source, current(&mut root, &mut stack), &source[last..])?;

        if let Some(frame) = stack.last() {
            return Err(template_error(
                source,
                &format!("'range ${}' is never closed with '{{{{ end }}}}'", frame.var),
            ));
        }

        Ok(Self {
            source: source.to_string(),
            nodes: root,
        })
    }

    /// The template text as it was configured.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Every field referenced anywhere in the template.
    pub fn fields(&self) -> BTreeSet<Field> {
        let mut out = BTreeSet::new();
        collect_fields(&self.nodes, &mut out);
        out
    }

    pub fn render(&self, data: &dyn TemplateData) -> Result<String> {
        let mut out = String::with_capacity(self.source.len());
        let mut vars: Vec<(&str, &str)> = Vec::new();
        self.render_nodes(&self.nodes, data, &mut vars, &mut out)?;
        Ok(out)
    }

    fn render_nodes<'d>(
        &'d self,
        nodes: &'d [Node],
        data: &'d dyn TemplateData,
        vars: &mut Vec<(&'d str, &'d str)>,
        out: &mut String,
    ) -> Result<()> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Field(field) => match self.lookup(data, *field)? {
                    Value::Str(s) => out.push_str(s),
                    Value::List(items) => out.push_str(&items.join(" ")),
                },
                Node::Var(name) => {
                    let value = vars
                        .iter()
                        .rev()
                        .find(|(var, _)| *var == name.as_str())
                        .map(|(_, value)| *value)
                        .ok_or_else(|| {
                            template_error(&self.source, &format!("undefined variable '${name}'"))
                        })?;
                    out.push_str(value);
                }
                Node::Range { var, field, body } => {
                    let items = match self.lookup(data, *field)? {
                        Value::List(items) => items,
                        Value::Str(_) => {
                            return Err(template_error(
                                &self.source,
                                &format!("cannot range over {field}: not a list"),
                            ));
                        }
                    };
                    for item in items {
                        vars.push((var.as_str(), item.as_str()));
                        let rendered = self.render_nodes(body, data, vars, out);
                        vars.pop();
                        rendered?;
                    }
                }
            }
        }
        Ok(())
    }

    fn lookup<'d>(&self, data: &'d dyn TemplateData, field: Field) -> Result<Value<'d>> {
        data.lookup(field).ok_or_else(|| {
            template_error(&self.source, &format!("{field} is not available here"))
        })
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn current<'a>(root: &'a mut Vec<Node>, stack: &'a mut [Frame]) -> &'a mut Vec<Node> {
    match stack.last_mut() {
        Some(frame) => &mut frame.body,
        None => root,
    }
}

fn push_text(source: &str, nodes: &mut Vec<Node>, text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    // Only an unclosed `{{` is an error; a lone `}}` is plain text.
    if text.contains("{{") {
        return Err(template_error(
            source,
            &format!("unclosed '{{{{' near '{text}'"),
        ));
    }
    nodes.push(Node::Text(text.to_string()));
    Ok(())
}

fn parse_field(source: &str, name: &str) -> Result<Field> {
    Field::from_name(name)
        .ok_or_else(|| template_error(source, &format!("unknown placeholder '.{name}'")))
}

fn collect_fields(nodes: &[Node], out: &mut BTreeSet<Field>) {
    for node in nodes {
        match node {
            Node::Field(field) => {
                out.insert(*field);
            }
            Node::Range { field, body, .. } => {
                out.insert(*field);
                collect_fields(body, out);
            }
            Node::Text(_) | Node::Var(_) => {}
        }
    }
}

fn template_error(source: &str, msg: &str) -> UnconvError {
    UnconvError::Template(format!("{msg} in template '{source}'"))
}
