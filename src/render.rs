use comfy_table::{presets::UTF8_FULL, Table};

use crate::names::make_nice_name;
use crate::types::{Cell, PortTable};

/// Render tables as an HTML fragment for the scan results panel.
///
/// When `host` is given and non-empty, a `<dl>` of host metadata precedes the tables.
pub fn render_html(tables: &[PortTable], host: Option<&[(String, String)]>) -> String {
    let mut out = String::new();
    if let Some(info) = host.filter(|h| !h.is_empty()) {
        out.push_str("<dl>");
        for (key, value) in info {
            out.push_str(&wrap(&escape(&make_nice_name(key, true)), "dt"));
            out.push_str(&wrap(&escape(value), "dd"));
        }
        out.push_str("</dl>");
    }
    for table in tables {
        out.push_str(&table_html(table));
    }
    out
}

/// Body shown in the results panel when no result could be fetched.
pub fn render_failure_html(message: &str) -> String {
    wrap(&escape(message), "p")
}

fn table_html(table: &PortTable) -> String {
    let header: String = table.header.iter().map(|c| wrap(&escape(c), "th")).collect();
    let body: String = table
        .rows
        .iter()
        .map(|row| {
            let cells: String = row.iter().map(|c| wrap(&cell_html(c), "td")).collect();
            wrap(&cells, "tr")
        })
        .collect();
    format!(
        "<table class=\"table table-hover\"><thead>{}</thead><tbody>{}</tbody></table>",
        wrap(&header, "tr"),
        body
    )
}

fn cell_html(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) | Cell::Placeholder(s) => escape(s),
        Cell::Icon(icon) => format!("<i class=\"{}\"> </i>", icon.css_class()),
    }
}

fn wrap(inner: &str, tag: &str) -> String {
    format!("<{tag}>{inner}</{tag}>")
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Render tables for a terminal, one boxed table per port.
pub fn render_terminal(tables: &[PortTable], host: Option<&[(String, String)]>) -> String {
    let mut out = String::new();
    if let Some(info) = host.filter(|h| !h.is_empty()) {
        let key_w = info
            .iter()
            .map(|(k, _)| make_nice_name(k, true).chars().count())
            .max()
            .unwrap_or(0);
        for (key, value) in info {
            out.push_str(&format!(
                "{:<key_w$}  {}\n",
                make_nice_name(key, true),
                value,
                key_w = key_w
            ));
        }
        out.push('\n');
    }
    for t in tables {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(t.header.clone());
        for row in &t.rows {
            table.add_row(row.iter().map(|c| match c {
                Cell::Text(s) | Cell::Placeholder(s) => s.clone(),
                Cell::Icon(i) => i.glyph().to_string(),
            }));
        }
        out.push_str(&format!("Port {}\n{}\n\n", t.port, table));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Icon;

    fn sample() -> PortTable {
        PortTable {
            port: "80".into(),
            header: vec!["Port".into(), "Protocol".into(), "Connection".into(), "a<b".into()],
            rows: vec![vec![
                Cell::text("80"),
                Cell::text("TCP"),
                Cell::text("Inbound"),
                Cell::Icon(Icon::Ok),
            ]],
        }
    }

    #[test]
    fn html_table_markup() {
        let html = render_html(&[sample()], None);
        assert!(html.starts_with("<table class=\"table table-hover\"><thead><tr><th>Port</th>"));
        assert!(html.contains("<th>a&lt;b</th>"));
        assert!(html.contains("<td><i class=\"icon-ok-sign\"> </i></td>"));
        assert!(!html.contains("<dl>"));
    }

    #[test]
    fn html_host_block_prettifies_keys_only() {
        let host = vec![("os_name".to_string(), "windows server".to_string())];
        let html = render_html(&[], Some(&host));
        assert_eq!(html, "<dl><dt>OS Name</dt><dd>windows server</dd></dl>");
    }

    #[test]
    fn empty_host_block_is_skipped() {
        assert_eq!(render_html(&[], Some(&[])), "");
    }

    #[test]
    fn failure_message() {
        assert_eq!(
            render_failure_html("Could not connect to server"),
            "<p>Could not connect to server</p>"
        );
    }

    #[test]
    fn placeholder_cells_show_their_text() {
        let mut t = sample();
        t.rows[0][3] = Cell::Placeholder("n/a".into());
        assert!(render_html(&[t.clone()], None).contains("<td>n/a</td>"));
        assert!(render_terminal(&[t], None).contains("n/a"));
    }

    #[test]
    fn terminal_host_block_aligns_non_ascii_keys() {
        let host = vec![
            ("größe".to_string(), "1".to_string()),
            ("os".to_string(), "2".to_string()),
        ];
        let text = render_terminal(&[], Some(&host));
        let lines: Vec<&str> = text.lines().take(2).collect();
        assert_eq!(lines, vec!["Größe  1", "OS     2"]);
    }

    #[test]
    fn terminal_shows_glyphs() {
        let text = render_terminal(&[sample()], None);
        assert!(text.starts_with("Port 80\n"));
        assert!(text.contains("✔"));
        assert!(text.contains("Inbound"));
    }
}
