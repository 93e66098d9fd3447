use serde::{Deserialize, Serialize};

use crate::domain::classification::Classification;

/// One entry of a batch result: either a classification tagged with the
/// original task text, or an error record for the line that failed.
///
/// Serialized untagged so the export matches the schema consumers already
/// read: `{"tarea": ..., "cuadrante": ...}` on success, `{"tarea": ...,
/// "error": ...}` on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchItem {
    Classified {
        tarea: String,
        #[serde(flatten)]
        classification: Classification,
    },
    Failed {
        tarea: String,
        error: String,
    },
}

impl BatchItem {
    pub fn tarea(&self) -> &str {
        match self {
            BatchItem::Classified { tarea, .. } => tarea,
            BatchItem::Failed { tarea, .. } => tarea,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::classification::{Energy, Quadrant};

    fn classified(tarea: &str) -> BatchItem {
        BatchItem::Classified {
            tarea: tarea.to_string(),
            classification: Classification {
                cuadrante: Quadrant::III,
                justificacion: "Urgente pero delegable".to_string(),
                recomendacion: "Delegar si es posible".to_string(),
                energia: Energy::Repetitive,
                bloque_sugerido: "Viernes por la tarde".to_string(),
                duracion_estimada: 30,
                subtareas: None,
            },
        }
    }

    #[test]
    fn json_export_round_trips() {
        let items = vec![
            classified("Responder correos"),
            BatchItem::Failed {
                tarea: "Tarea rara".to_string(),
                error: "respuesta no es JSON válido: hola".to_string(),
            },
        ];
        let json = serde_json::to_string_pretty(&items).unwrap();
        let decoded: Vec<BatchItem> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, items);
    }

    #[test]
    fn success_entry_flattens_classification_fields() {
        let json = serde_json::to_value(classified("Responder correos")).unwrap();
        assert_eq!(json["tarea"], "Responder correos");
        assert_eq!(json["cuadrante"], "III");
        assert_eq!(json["energia"], "Automática o repetitiva");
        assert!(json.get("classification").is_none());
        assert!(json.get("subtareas").is_none());
    }

    #[test]
    fn error_entry_keeps_original_text() {
        let json = serde_json::to_value(BatchItem::Failed {
            tarea: "Tarea B".to_string(),
            error: "timeout".to_string(),
        })
        .unwrap();
        assert_eq!(json["tarea"], "Tarea B");
        assert_eq!(json["error"], "timeout");
    }
}
