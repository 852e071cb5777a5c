//! Java source text helpers.

use std::collections::BTreeSet;

use crate::type_map::{escape_java, HostType};

/// A typed Java variable: a method parameter or a shape field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct JavaVar {
    pub name: String,
    pub host: HostType,
    /// The SQL placeholder this variable binds, if any.
    pub placeholder: String,
}

impl JavaVar {
    pub fn declaration(&self) -> String {
        format!("{} {}", self.host.java_name(), self.name)
    }
}

/// Sorted, de-duplicated imports.
#[derive(Debug, Clone, Default)]
pub(crate) struct Imports(BTreeSet<String>);

impl Imports {
    pub fn add(&mut self, import: &str) {
        self.0.insert(import.to_string());
    }

    pub fn add_hosts<'a>(&mut self, vars: impl IntoIterator<Item = &'a JavaVar>) {
        for var in vars {
            if let Some(import) = var.host.import() {
                self.add(import);
            }
        }
    }

    pub fn render(&self) -> String {
        self.0.iter().map(|i| format!("import {i};\n")).collect()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0.into_iter().collect()
    }
}

/// Prefixes every non-empty line with `levels` four-space indents.
pub(crate) fn indent(text: &str, levels: usize) -> String {
    let pad = "    ".repeat(levels);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::from("\n")
            } else {
                format!("{pad}{line}\n")
            }
        })
        .collect()
}

pub(crate) fn string_literal(text: &str) -> String {
    format!("\"{}\"", escape_java(text))
}

/// Comma-separated parameter declarations.
pub(crate) fn parameter_list(vars: &[JavaVar]) -> String {
    vars.iter()
        .map(JavaVar::declaration)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Declares `params` as a `MapSqlParameterSource` holding `bindings`
/// (placeholder, Java expression).
pub(crate) fn parameter_source(bindings: &[(String, String)]) -> String {
    if bindings.is_empty() {
        return String::from("MapSqlParameterSource params = new MapSqlParameterSource();\n");
    }
    let mut out = String::from("MapSqlParameterSource params = new MapSqlParameterSource()");
    for (placeholder, value) in bindings {
        out.push_str(&format!(
            "\n        .addValue({}, {value})",
            string_literal(placeholder)
        ));
    }
    out.push_str(";\n");
    out
}
