use serde_json::{Map, Value};
use tracing::debug;

use crate::icon::icon_for_value;
use crate::names::{make_nice_name, unique_in_order};
use crate::types::{Cell, PortTable, LEADING_COLUMNS, PLACEHOLDER};

/// Direction tokens, in the order rows are emitted for a protocol.
pub const DIRECTIONS: [&str; 2] = ["inbound", "outbound"];

/// Builds one pivot table per port from a scan result.
///
/// A scan result maps port identifiers to a list of protocol records. Each record
/// maps a protocol name to optional `inbound`/`outbound` maps of host → status.
/// Host columns are discovered per port from the data itself.
///
/// The builder holds only presentation options, so one instance can be shared
/// and reused freely.
#[derive(Debug, Clone)]
pub struct PivotTableBuilder {
    abbreviations: bool,
    placeholder: String,
}

impl Default for PivotTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PivotTableBuilder {
    pub fn new() -> Self {
        Self {
            abbreviations: true,
            placeholder: PLACEHOLDER.to_string(),
        }
    }

    /// Upper-case known abbreviations (`tcp` → `TCP`) in protocol and direction names.
    pub fn abbreviations(mut self, on: bool) -> Self {
        self.abbreviations = on;
        self
    }

    /// Text used for host cells with no entry in a row's direction map.
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    /// Build tables for every port, in the result's key order.
    ///
    /// Anything other than a JSON object yields no tables.
    pub fn build(&self, scan_result: &Value) -> Vec<PortTable> {
        let Some(ports) = scan_result.as_object() else {
            debug!("scan result is not an object; nothing to tabulate");
            return Vec::new();
        };
        ports
            .iter()
            .map(|(port, entry)| self.build_port(port, entry))
            .collect()
    }

    /// Build the table for a single port entry.
    pub fn build_port(&self, port: &str, entry: &Value) -> PortTable {
        let protocols = protocols_of(entry);

        let hosts: Vec<&str> = unique_in_order(
            protocols
                .iter()
                .flat_map(|(_, body)| directions_of(body))
                .flat_map(|(_, map)| map.into_iter().flat_map(|m| m.keys().map(String::as_str))),
        );

        let mut header: Vec<String> = LEADING_COLUMNS.iter().map(|c| c.to_string()).collect();
        header.extend(hosts.iter().map(|h| h.to_string()));

        let mut rows = Vec::new();
        for (protocol, body) in &protocols {
            for (direction, map) in directions_of(body) {
                let mut row = Vec::with_capacity(header.len());
                row.push(Cell::text(port));
                row.push(Cell::Text(make_nice_name(protocol, self.abbreviations)));
                row.push(Cell::Text(make_nice_name(direction, self.abbreviations)));
                for host in &hosts {
                    match map.and_then(|m| m.get(*host)) {
                        Some(status) => row.push(Cell::Icon(icon_for_value(status))),
                        None => row.push(Cell::Placeholder(self.placeholder.clone())),
                    }
                }
                rows.push(row);
            }
        }

        debug!(port, hosts = hosts.len(), rows = rows.len(), "built port table");
        PortTable { port: port.to_string(), header, rows }
    }
}

/// Flatten a port entry into `(protocol, body)` pairs in input order.
///
/// An array holds protocol records; a bare object is a single record, which is how
/// the scan backend emits it. Any other shape has no protocols.
fn protocols_of(entry: &Value) -> Vec<(&str, &Value)> {
    let records: Vec<&Map<String, Value>> = match entry {
        Value::Array(items) => items.iter().filter_map(Value::as_object).collect(),
        Value::Object(record) => vec![record],
        _ => Vec::new(),
    };
    records
        .into_iter()
        .flat_map(|record| record.iter().map(|(name, body)| (name.as_str(), body)))
        .collect()
}

/// Directions present on a protocol body, in fixed order.
///
/// A present direction whose value is not an object still counts; it simply has no hosts.
fn directions_of(body: &Value) -> Vec<(&'static str, Option<&Map<String, Value>>)> {
    let Some(body) = body.as_object() else {
        return Vec::new();
    };
    DIRECTIONS
        .iter()
        .filter_map(|&d| body.get(d).map(|v| (d, v.as_object())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Icon;
    use serde_json::json;

    #[test]
    fn single_inbound_host() {
        let input = json!({"80": [{"tcp": {"inbound": {"10.0.0.1": "open"}}}]});
        let tables = PivotTableBuilder::new().build(&input);
        assert_eq!(tables.len(), 1);
        let t = &tables[0];
        assert_eq!(t.port, "80");
        assert_eq!(t.header, vec!["Port", "Protocol", "Connection", "10.0.0.1"]);
        assert_eq!(
            t.rows,
            vec![vec![
                Cell::text("80"),
                Cell::text("TCP"),
                Cell::text("Inbound"),
                Cell::Icon(Icon::Ok),
            ]]
        );
    }

    #[test]
    fn protocol_without_directions_has_no_rows() {
        let input = json!({"22": [{"tcp": {}}, {"udp": {"status": "open"}}]});
        let tables = PivotTableBuilder::new().build(&input);
        assert_eq!(tables[0].header.len(), 3);
        assert!(tables[0].is_empty());
    }

    #[test]
    fn non_object_direction_emits_placeholder_row() {
        let input = json!({"22": [
            {"tcp": {"inbound": {"a": "open"}}},
            {"udp": {"inbound": null}}
        ]});
        let t = &PivotTableBuilder::new().build(&input)[0];
        assert_eq!(t.rows.len(), 2);
        assert!(t.rows[1][3].is_placeholder());
    }

    #[test]
    fn non_object_result_is_empty() {
        let b = PivotTableBuilder::new();
        assert!(b.build(&json!([1, 2])).is_empty());
        assert!(b.build(&Value::Null).is_empty());
        assert!(b.build(&json!("80")).is_empty());
    }

    #[test]
    fn scalar_port_entry_gives_header_only() {
        let t = &PivotTableBuilder::new().build(&json!({"80": 5}))[0];
        assert_eq!(t.header, vec!["Port", "Protocol", "Connection"]);
        assert!(t.rows.is_empty());
    }

    #[test]
    fn custom_placeholder() {
        let input = json!({"80": [{"tcp": {"inbound": {"a": "open"}, "outbound": {"b": "open"}}}]});
        let t = &PivotTableBuilder::new().placeholder("n/a").build(&input)[0];
        assert_eq!(t.rows[0][4], Cell::Placeholder("n/a".into()));
        assert!(t.rows[0][4].is_placeholder());
        assert!(!t.rows[0][3].is_placeholder());
    }

    #[test]
    fn port_named_like_placeholder_is_text() {
        let input = json!({"-": [{"tcp": {"inbound": {"a": "open"}, "outbound": {"b": "open"}}}]});
        let t = &PivotTableBuilder::new().build(&input)[0];
        assert_eq!(t.rows[0][0], Cell::text("-"));
        assert!(!t.rows[0][0].is_placeholder());
        assert!(t.rows[0][4].is_placeholder());
    }
}
