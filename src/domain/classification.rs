use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Parent duration above which the model is instructed to break the task
/// into subtasks.
pub const SUBTASK_THRESHOLD_MINUTES: u32 = 120;

const SLOT_MINUTES: u32 = 15;
const MAX_SUBTASK_MINUTES: u32 = 60;

/// Eisenhower quadrant: urgency × importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quadrant {
    I,
    II,
    III,
    IV,
}

impl Quadrant {
    pub fn label(&self) -> &'static str {
        match self {
            Quadrant::I => "Cuadrante I - Urgente e Importante",
            Quadrant::II => "Cuadrante II - No urgente pero Importante",
            Quadrant::III => "Cuadrante III - Urgente pero No importante",
            Quadrant::IV => "Cuadrante IV - No urgente ni importante",
        }
    }
}

/// Cognitive mode a task demands. Serialized values match the prompt
/// vocabulary verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Energy {
    #[serde(rename = "Alta concentración")]
    HighFocus,
    #[serde(rename = "Automática o repetitiva")]
    Repetitive,
    #[serde(rename = "Creativa o estratégica")]
    Creative,
}

impl Energy {
    pub fn label(&self) -> &'static str {
        match self {
            Energy::HighFocus => "Alta concentración",
            Energy::Repetitive => "Repetitiva o automática",
            Energy::Creative => "Creativa o estratégica",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub descripcion: String,
    pub duracion: u32,
}

/// Structured classification of one task. Field names match the JSON schema
/// the model is instructed to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub cuadrante: Quadrant,
    pub justificacion: String,
    pub recomendacion: String,
    pub energia: Energy,
    pub bloque_sugerido: String,
    pub duracion_estimada: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtareas: Option<Vec<Subtask>>,
}

impl Classification {
    /// Decodes a raw model reply into a validated record.
    ///
    /// Text that is not JSON at all fails with `MalformedResponse` carrying
    /// the raw reply; JSON that does not match the schema or violates the
    /// duration/subtask rules fails with `InvalidClassification`. Defaults
    /// are never substituted.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|_| AppError::MalformedResponse {
                raw: raw.to_string(),
            })?;
        let record: Classification = serde_json::from_value(value)
            .map_err(|err| AppError::InvalidClassification(err.to_string()))?;
        record.validate()?;
        Ok(record)
    }

    /// Checks the duration arithmetic the prompt instructs the model to
    /// respect. The model's compliance is a hint, not a guarantee.
    pub fn validate(&self) -> AppResult<()> {
        if self.duracion_estimada == 0 || self.duracion_estimada % SLOT_MINUTES != 0 {
            return Err(invalid(format!(
                "duracion_estimada must be a positive multiple of {SLOT_MINUTES}, got {}",
                self.duracion_estimada
            )));
        }

        let Some(subtareas) = &self.subtareas else {
            return Ok(());
        };

        if self.duracion_estimada <= SUBTASK_THRESHOLD_MINUTES {
            return Err(invalid(format!(
                "subtareas present but duracion_estimada is {} (threshold {SUBTASK_THRESHOLD_MINUTES})",
                self.duracion_estimada
            )));
        }
        if subtareas.len() < 2 || subtareas.len() > 4 {
            return Err(invalid(format!(
                "expected 2-4 subtareas, got {}",
                subtareas.len()
            )));
        }
        for sub in subtareas {
            if sub.duracion == 0
                || sub.duracion % SLOT_MINUTES != 0
                || sub.duracion > MAX_SUBTASK_MINUTES
            {
                return Err(invalid(format!(
                    "subtask duration must be a positive multiple of {SLOT_MINUTES} and at most {MAX_SUBTASK_MINUTES}, got {}",
                    sub.duracion
                )));
            }
        }

        // The prompt asks for a sum "approximately" equal to the parent;
        // allow one slot of drift per subtask.
        let total: u32 = subtareas.iter().map(|sub| sub.duracion).sum();
        let tolerance = SLOT_MINUTES * subtareas.len() as u32;
        if total.abs_diff(self.duracion_estimada) > tolerance {
            return Err(invalid(format!(
                "subtask durations sum to {total}, expected about {}",
                self.duracion_estimada
            )));
        }

        Ok(())
    }
}

fn invalid(message: String) -> AppError {
    AppError::InvalidClassification(message)
}
