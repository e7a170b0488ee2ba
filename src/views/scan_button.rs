// ============================================================================
// SCAN BUTTON VIEW - Botón "Scan" junto al valor de un campo Link
// ============================================================================

use crate::utils::html::escape_html;
use crate::utils::i18n::t;

/// Clase CSS que identifica los botones de escaneo
pub const SCAN_BUTTON_CLASS: &str = "scan-qr-code";

/// Formatear el valor de un campo añadiendo el botón de escaneo
///
/// Valor vacío → cadena vacía. `icon_html` lo aporta el host (puede ser "").
pub fn render_scan_button(value: &str, show_button: bool, icon_html: &str, lang: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    let mut html = escape_html(value);
    if show_button {
        html.push_str(&format!(
            r#" <button class="btn btn-xs btn-default {}" type="button">{} {}</button>"#,
            SCAN_BUTTON_CLASS,
            icon_html,
            escape_html(&t("scan", lang)),
        ));
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_renders_nothing() {
        assert_eq!(render_scan_button("", true, "", "EN"), "");
    }

    #[test]
    fn appends_button_after_escaped_value() {
        let html = render_scan_button("A<B", true, "<svg></svg>", "EN");
        assert!(html.starts_with("A&lt;B <button"));
        assert!(html.contains("scan-qr-code"));
        assert!(html.contains("<svg></svg> Scan</button>"));
    }

    #[test]
    fn button_can_be_disabled() {
        assert_eq!(render_scan_button("ITEM-1", false, "", "ES"), "ITEM-1");
    }
}
