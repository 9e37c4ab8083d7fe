use serde::{Deserialize, Serialize};

/// Leading columns of every port table, before the discovered host columns.
pub const LEADING_COLUMNS: [&str; 3] = ["Port", "Protocol", "Connection"];

/// Literal shown where a host has no entry for a row's direction.
pub const PLACEHOLDER: &str = "-";

/// Icon token for a host status. The renderer decides how each looks.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Ok,
    Neutral,
    Warning,
}

/// One table cell: plain text, an icon token, or the placeholder for a missing host.
///
/// `Placeholder` carries the text to show so renderers need no builder options.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Cell {
    Text(String),
    Icon(Icon),
    Placeholder(String),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn placeholder() -> Self {
        Cell::Placeholder(PLACEHOLDER.to_string())
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Cell::Placeholder(_))
    }

    pub fn as_icon(&self) -> Option<Icon> {
        match self {
            Cell::Icon(i) => Some(*i),
            _ => None,
        }
    }

    /// Text to display, if any. Icons have none.
    pub fn display_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) | Cell::Placeholder(s) => Some(s),
            Cell::Icon(_) => None,
        }
    }
}

/// Pivot table for a single port.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PortTable {
    pub port: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl PortTable {
    /// Host columns discovered for this port, in header order.
    pub fn host_columns(&self) -> &[String] {
        let skip = LEADING_COLUMNS.len().min(self.header.len());
        &self.header[skip..]
    }

    /// True when the table has a header but no body rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
