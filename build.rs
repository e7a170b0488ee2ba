use std::env;
use std::fs;
use std::path::Path;

/// Variables que lee `ScannerConfig::from_env` con option_env!
const CONFIG_KEYS: &[&str] = &[
    "QR_DECODER_URL",
    "QR_DECODER_GLOBAL",
    "QR_LANGUAGE",
    "QR_SHOW_SCAN_BUTTON",
    "QR_TOAST_MILLIS",
    "QR_FACING_MODE",
    "ENABLE_LOGGING",
];

fn main() {
    // Recompilar si cambia alguna variable de configuración del entorno
    for key in CONFIG_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
    }

    // Cargar variables desde .env si existe
    let env_file = Path::new(".env");
    if !env_file.exists() {
        println!("cargo:rerun-if-changed=build.rs");
        return;
    }
    println!("cargo:rerun-if-changed=.env");

    if let Ok(contents) = fs::read_to_string(env_file) {
        for line in contents.lines() {
            // Ignorar comentarios y líneas vacías
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Parsear KEY=VALUE
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim().trim_matches('"');

                // Solo claves conocidas, y sin pisar el entorno real
                if CONFIG_KEYS.contains(&key) && env::var(key).is_err() {
                    println!("cargo:rustc-env={}={}", key, value);
                }
            }
        }
    }

    println!("cargo:rerun-if-changed=build.rs");
}
