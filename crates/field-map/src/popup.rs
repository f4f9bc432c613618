//! Feature popup content.

use geojson::JsonObject;
use serde_json::Value;

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One `key: value` line per property, joined with `<br />`.
pub fn popup_html(properties: &JsonObject) -> String {
    properties
        .iter()
        .map(|(key, value)| format!("{}: {}", escape_html(key), escape_html(&value_text(value))))
        .collect::<Vec<_>>()
        .join("<br />")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_popup_lines() {
        let html = popup_html(&props(json!({"NAME": "Plot A", "AREA": 12.5, "NOTE": null})));
        assert_eq!(html, "NAME: Plot A<br />AREA: 12.5<br />NOTE: null");
    }

    #[test]
    fn test_popup_escapes() {
        let html = popup_html(&props(json!({"<b>": "a & <script>"})));
        assert_eq!(html, "&lt;b&gt;: a &amp; &lt;script&gt;");
    }

    #[test]
    fn test_empty_properties() {
        assert_eq!(popup_html(&JsonObject::new()), "");
    }
}
