/// Escapar texto para insertarlo en HTML
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escapar un valor para un selector de atributo entre comillas dobles
pub fn escape_css_attr(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
        assert_eq!(escape_html("ITEM-00042"), "ITEM-00042");
    }

    #[test]
    fn escapes_css_attribute_values() {
        assert_eq!(escape_css_attr(r#"a"b\c"#), r#"a\"b\\c"#);
        assert_eq!(escape_css_attr("https://cdn/jsQR.min.js"), "https://cdn/jsQR.min.js");
    }
}
