use serde::{Deserialize, Serialize};

/// URL por defecto de jsQR
pub const DEFAULT_DECODER_URL: &str = "https://cdn.jsdelivr.net/npm/jsqr@1.4.0/dist/jsQR.min.js";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub decoder_url: String,
    pub decoder_global: String,
    pub language: String,
    pub enable_logging: bool,
    pub camera_config: CameraConfig,
    pub ui_config: UIConfig,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            decoder_url: DEFAULT_DECODER_URL.to_string(),
            decoder_global: "jsQR".to_string(),
            language: "EN".to_string(),
            enable_logging: true,
            camera_config: CameraConfig::default(),
            ui_config: UIConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// "environment" = cámara trasera
    pub facing_mode: String,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            facing_mode: "environment".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UIConfig {
    pub show_scan_button: bool,
    pub toast_millis: u32,
    pub video_max_width_px: u32,
    pub trigger_selector: String,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            show_scan_button: true,
            toast_millis: 3000,
            video_max_width_px: 400,
            trigger_selector: ".scan-qr-code".to_string(),
        }
    }
}

impl ScannerConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            decoder_url: option_env!("QR_DECODER_URL")
                .unwrap_or(DEFAULT_DECODER_URL).to_string(),
            decoder_global: option_env!("QR_DECODER_GLOBAL")
                .unwrap_or("jsQR").to_string(),
            language: option_env!("QR_LANGUAGE")
                .unwrap_or("EN").to_uppercase(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            camera_config: CameraConfig {
                facing_mode: option_env!("QR_FACING_MODE")
                    .unwrap_or("environment").to_string(),
            },
            ui_config: UIConfig {
                show_scan_button: option_env!("QR_SHOW_SCAN_BUTTON")
                    .unwrap_or("true").parse().unwrap_or(true),
                toast_millis: option_env!("QR_TOAST_MILLIS")
                    .unwrap_or("3000").parse().unwrap_or(defaults.ui_config.toast_millis),
                ..defaults.ui_config
            },
        }
    }

    /// Verifica si el modo de logging está habilitado
    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }

    /// Sobrescribir la configuración con un JSON parcial (p.ej. desde la página)
    pub fn with_overrides(&self, json: &str) -> Result<Self, String> {
        let mut merged = serde_json::to_value(self)
            .map_err(|e| format!("Error serializando config: {}", e))?;
        let overrides: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| format!("JSON de config inválido: {}", e))?;
        merge_json(&mut merged, overrides);
        serde_json::from_value(merged).map_err(|e| format!("Config inválida: {}", e))
    }
}

fn merge_json(base: &mut serde_json::Value, overrides: serde_json::Value) {
    match (base, overrides) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overrides)) => {
            for (key, value) in overrides {
                merge_json(base.entry(key).or_insert(serde_json::Value::Null), value);
            }
        }
        (base, value) => *base = value,
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: ScannerConfig = ScannerConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_rear_camera_and_jsqr() {
        let config = ScannerConfig::default();
        assert_eq!(config.camera_config.facing_mode, "environment");
        assert_eq!(config.decoder_global, "jsQR");
        assert!(config.decoder_url.ends_with("jsQR.min.js"));
        assert!(config.ui_config.show_scan_button);
    }

    #[test]
    fn partial_json_overrides_only_given_fields() {
        let config = ScannerConfig::default()
            .with_overrides(r#"{"language": "ES", "ui_config": {"show_scan_button": false}}"#)
            .expect("valid overrides");

        assert_eq!(config.language, "ES");
        assert!(!config.ui_config.show_scan_button);
        assert_eq!(config.ui_config.toast_millis, 3000);
        assert_eq!(config.decoder_global, "jsQR");
    }

    #[test]
    fn invalid_override_is_rejected() {
        assert!(ScannerConfig::default().with_overrides("{not json").is_err());
        assert!(ScannerConfig::default()
            .with_overrides(r#"{"ui_config": {"toast_millis": "soon"}}"#)
            .is_err());
    }
}
