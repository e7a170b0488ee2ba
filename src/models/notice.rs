use serde::{Deserialize, Serialize};

/// Gravedad de una notificación
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    /// Indicador de color usado por el host ("green", "red")
    pub fn indicator(self) -> &'static str {
        match self {
            Severity::Success => "green",
            Severity::Error => "red",
        }
    }
}

/// Mensaje visible para el usuario
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Notice {
    pub title: Option<String>,
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            title: None,
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            message: message.into(),
            severity: Severity::Error,
        }
    }
}
