use serde::{Deserialize, Serialize};

/// Atributos del botón de escaneo que identifican el campo destino
pub const ATTR_CONTAINER: &str = "data-doctype";
pub const ATTR_RECORD: &str = "data-docname";
pub const ATTR_FIELD: &str = "data-fieldname";
/// Atributo del formulario que contiene el nombre del documento
pub const ATTR_RECORD_FALLBACK: &str = "data-name";

/// Campo de formulario donde se escribe el texto decodificado
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct TargetField {
    /// Tipo de documento (p.ej. "Item")
    pub container_id: String,
    /// Nombre del documento
    pub record_id: String,
    /// Nombre del campo
    pub field_id: String,
}

impl TargetField {
    pub fn new(
        container_id: impl Into<String>,
        record_id: impl Into<String>,
        field_id: impl Into<String>,
    ) -> Self {
        Self {
            container_id: container_id.into(),
            record_id: record_id.into(),
            field_id: field_id.into(),
        }
    }

    /// Construir desde los data-attributes del trigger.
    ///
    /// `lookup` recibe el nombre del atributo y devuelve su valor (ya buscado en
    /// el elemento o en el ancestro más cercano). Si falta alguno de los tres
    /// valores, o está vacío, no hay campo destino.
    pub fn from_attributes<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let container_id = non_empty(ATTR_CONTAINER)?;
        let record_id = non_empty(ATTR_RECORD).or_else(|| non_empty(ATTR_RECORD_FALLBACK))?;
        let field_id = non_empty(ATTR_FIELD)?;

        Some(Self {
            container_id,
            record_id,
            field_id,
        })
    }
}

impl std::fmt::Display for TargetField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}.{}", self.container_id, self.record_id, self.field_id)
    }
}
