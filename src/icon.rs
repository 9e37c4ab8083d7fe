use serde_json::Value;

use crate::types::Icon;

/// Map a raw status string to its icon. Total: unknown statuses fall back to `Warning`.
pub fn icon_for_status(status: &str) -> Icon {
    match status {
        "open" => Icon::Ok,
        "blocked" | "closed" => Icon::Neutral,
        "check firewall" => Icon::Warning,
        _ => Icon::Warning,
    }
}

/// Same as [`icon_for_status`] for a JSON value; non-strings get the fallback.
pub fn icon_for_value(status: &Value) -> Icon {
    match status {
        Value::String(s) => icon_for_status(s),
        _ => Icon::Warning,
    }
}

impl Icon {
    /// CSS class used by the web page's icon font.
    pub fn css_class(self) -> &'static str {
        match self {
            Icon::Ok => "icon-ok-sign",
            Icon::Neutral => "icon-minus-sign",
            Icon::Warning => "icon-warning-sign",
        }
    }

    /// Single-character glyph for terminal output.
    pub fn glyph(self) -> &'static str {
        match self {
            Icon::Ok => "✔",
            Icon::Neutral => "–",
            Icon::Warning => "⚠",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_statuses() {
        assert_eq!(icon_for_status("open"), Icon::Ok);
        assert_eq!(icon_for_status("blocked"), Icon::Neutral);
        assert_eq!(icon_for_status("closed"), Icon::Neutral);
        assert_eq!(icon_for_status("check firewall"), Icon::Warning);
    }

    #[test]
    fn unknown_statuses_fall_back_to_warning() {
        for s in ["filtered", "unknown", "", "OPEN", "open "] {
            assert_eq!(icon_for_status(s), Icon::Warning, "status {s:?}");
        }
    }

    #[test]
    fn non_string_values_fall_back() {
        assert_eq!(icon_for_value(&json!("open")), Icon::Ok);
        assert_eq!(icon_for_value(&json!(1)), Icon::Warning);
        assert_eq!(icon_for_value(&Value::Null), Icon::Warning);
    }

    #[test]
    fn css_classes() {
        assert_eq!(Icon::Ok.css_class(), "icon-ok-sign");
        assert_eq!(Icon::Neutral.css_class(), "icon-minus-sign");
        assert_eq!(Icon::Warning.css_class(), "icon-warning-sign");
    }
}
