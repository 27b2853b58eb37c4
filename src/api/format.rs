//! Plain-text rendering of API records for the console.
//!
//! JSON output serializes the records directly; these helpers only cover the
//! human-readable form.

use serde::Serialize;
use serde_json::{Map, Value};

use super::districts::CenterNode;
use super::lookups::EnumTable;
use crate::nav::{NavItem, NavKind};

/// Column headers plus string cells, rendered with padded columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Table whose cells are the named camelCase fields of each record
    pub fn from_records<T: Serialize>(records: &[T], fields: &[&str]) -> Self {
        let mut table = Self::new(fields.iter().copied());
        for record in records {
            let value = serde_json::to_value(record).unwrap_or(Value::Null);
            let row = fields.iter().map(|f| cell(value.get(*f))).collect();
            table.rows.push(row);
        }
        table
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, c) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(c.chars().count());
                }
            }
        }

        let line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:<width$}", c, width = *w))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = vec![line(self.headers.as_slice())];
        out.push(widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "));
        out.extend(self.rows.iter().map(|r| line(r.as_slice())));
        out.join("\n")
    }
}

/// Single-line text for a JSON cell; null and missing render empty
pub fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(obj)) => obj
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| Value::Object(obj.clone()).to_string()),
        Some(other) => other.to_string(),
    }
}

/// Sidebar lines: titles as section headers, links indented with their path
pub fn menu_lines(items: &[NavItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| match item.kind {
            NavKind::Title => format!("[{}]", item.label),
            NavKind::Link => format!("  {:<20} {}", item.label, item.path.as_deref().unwrap_or("")),
        })
        .collect()
}

/// Indented health center hierarchy for one district
pub fn center_tree_lines(nodes: &[CenterNode]) -> Vec<String> {
    fn walk(node: &CenterNode, depth: usize, out: &mut Vec<String>) {
        let c = &node.center;
        out.push(format!("{}- {} ({}) [{}]", "  ".repeat(depth), c.name, c.code, c.center_type));
        for child in &node.children {
            walk(child, depth + 1, out);
        }
    }

    let mut out = Vec::new();
    for node in nodes {
        walk(node, 0, &mut out);
    }
    out
}

pub fn enum_table(table: &EnumTable) -> Table {
    let columns = table.columns();
    let mut out = Table::new(columns.iter().cloned());
    for row in &table.rows {
        let obj = row.as_object().cloned().unwrap_or_else(Map::new);
        out.push_row(columns.iter().map(|c| cell(obj.get(c))).collect());
    }
    out
}
