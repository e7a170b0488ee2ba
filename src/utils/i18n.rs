// ============================================================================
// MÓDULO DE INTERNACIONALIZACIÓN
// ============================================================================

use std::collections::HashMap;

/// Obtener diccionario de traducciones para un idioma
fn get_translations(lang: &str) -> HashMap<&'static str, &'static str> {
    let mut translations = HashMap::new();
    let lang_upper = lang.to_uppercase();

    match lang_upper.as_str() {
        "ES" => {
            // Modal
            translations.insert("scan_qr_code", "Escanear código QR");
            translations.insert("close", "Cerrar");
            translations.insert("loading_decoder", "Cargando decodificador...");
            translations.insert("waiting_camera", "Esperando la cámara...");
            translations.insert("scanning", "Apunte la cámara al código QR");

            // Botón
            translations.insert("scan", "Escanear");

            // Notificaciones
            translations.insert("scan_success", "Código QR escaneado correctamente");
            translations.insert("camera_error_title", "Error de acceso a la cámara");
            translations.insert("camera_error_message", "Asegúrese de haber concedido permiso a la cámara e inténtelo de nuevo.");
            translations.insert("decoder_error_title", "Error del escáner");
            translations.insert("decoder_error_message", "No se pudo cargar el decodificador QR.");
        }
        "FR" => {
            // Modal
            translations.insert("scan_qr_code", "Scanner un QR code");
            translations.insert("close", "Fermer");
            translations.insert("loading_decoder", "Chargement du décodeur...");
            translations.insert("waiting_camera", "En attente de la caméra...");
            translations.insert("scanning", "Visez le QR code avec la caméra");

            // Bouton
            translations.insert("scan", "Scanner");

            // Notifications
            translations.insert("scan_success", "QR code scanné avec succès");
            translations.insert("camera_error_title", "Erreur d'accès à la caméra");
            translations.insert("camera_error_message", "Vérifiez que l'accès à la caméra est autorisé et réessayez.");
            translations.insert("decoder_error_title", "Erreur du scanner");
            translations.insert("decoder_error_message", "Impossible de charger le décodeur QR.");
        }
        _ => {
            // Modal
            translations.insert("scan_qr_code", "Scan QR Code");
            translations.insert("close", "Close");
            translations.insert("loading_decoder", "Loading decoder...");
            translations.insert("waiting_camera", "Waiting for camera...");
            translations.insert("scanning", "Point the camera at a QR code");

            // Button
            translations.insert("scan", "Scan");

            // Notifications
            translations.insert("scan_success", "QR Code scanned successfully");
            translations.insert("camera_error_title", "Camera Access Error");
            translations.insert("camera_error_message", "Please ensure camera permissions are granted and try again.");
            translations.insert("decoder_error_title", "Scanner Error");
            translations.insert("decoder_error_message", "The QR decoder could not be loaded.");
        }
    }

    translations
}

/// Función de traducción
///
/// # Arguments
/// * `key` - Clave de traducción
/// * `lang` - Idioma ("EN", "ES" o "FR")
///
/// # Returns
/// String traducida, la versión inglesa si el idioma no la tiene, o la clave
pub fn t(key: &str, lang: &str) -> String {
    if let Some(translation) = get_translations(lang).get(key) {
        return translation.to_string();
    }

    if let Some(translation) = get_translations("EN").get(key) {
        return translation.to_string();
    }

    // Fallback: devolver la clave si no hay traducción
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_known_keys() {
        assert_eq!(t("scan_success", "EN"), "QR Code scanned successfully");
        assert_eq!(t("close", "es"), "Cerrar");
        assert_eq!(t("scan", "FR"), "Scanner");
    }

    #[test]
    fn unknown_language_uses_english_and_unknown_key_is_echoed() {
        assert_eq!(t("camera_error_title", "DE"), "Camera Access Error");
        assert_eq!(t("no_such_key", "ES"), "no_such_key");
    }
}
