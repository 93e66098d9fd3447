use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::classification::Classification;
use crate::error::{AppError, AppResult};
use crate::services::ClassifierService;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Instructional template sent with every task. Single source of truth for
/// the output schema, the enum vocabularies and the subtask rules.
const PROMPT_TEMPLATE: &str = r#"Eres un sistema inteligente de productividad que analiza tareas y las clasifica según la matriz de Eisenhower y el tipo de energía requerida.

Analiza la siguiente tarea ingresada por el usuario y responde en formato JSON estricto con la siguiente estructura:

{
  "cuadrante": "I | II | III | IV",
  "justificacion": "<Explicación clara del porqué se asigna al cuadrante>",
  "recomendacion": "<Consejo práctico sobre cómo actuar con esta tarea>",
  "energia": "Alta concentración | Automática o repetitiva | Creativa o estratégica",
  "bloque_sugerido": "<Ej. Martes en la mañana, Viernes por la tarde, justo después del almuerzo, etc.>",
  "duracion_estimada": <entero en minutos, múltiplo de 15>,
  "subtareas": [
    {"descripcion": "<texto>", "duracion": <minutos>},
    ...
  ]
}

Reglas adicionales para subtareas:
1. Solo incluye el campo `subtareas` si `duracion_estimada` > 120 min.
2. Genera 2-4 subtareas cuya suma sea aproximadamente la duración total.
3. Cada subtarea debe referirse explícitamente a la acción principal descrita en la tarea.
4. Usa verbos concretos: Analizar, Configurar, Modificar, Probar, Documentar, Desplegar.
5. Duración de cada subtarea <= 60 min y múltiplo de 15 min.
6. NO incluyas la tarea original en tu respuesta.

Definiciones:
- Cuadrante I: Urgente + Importante (crisis, entregas inmediatas)
- Cuadrante II: No urgente + Importante (estrategia, prevención, planeación)
- Cuadrante III: Urgente + No importante (interrupciones, cosas delegables)
- Cuadrante IV: No urgente + No importante (distracciones, cosas que se pueden eliminar)

- Alta concentración: tareas críticas, análisis profundo, decisiones importantes.
- Automática o repetitiva: correos, tareas administrativas o mecánicas.
- Creativa o estratégica: innovación, lluvia de ideas, diseño, planeación.

Devuelve además "duracion_estimada": número entero de minutos que tomaría la tarea (usa múltiplos de 15).

Tarea a analizar:
"{tarea}"
"#;

fn build_prompt(tarea: &str) -> String {
    PROMPT_TEMPLATE.replace("{tarea}", tarea)
}

pub struct OpenAiClient {
    http: Client,
    api_key: Option<String>,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: Option<String>, model: Option<String>) -> Self {
        Self {
            http: Client::new(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    fn api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration("OpenAI API key not configured".to_string()))
    }
}

#[async_trait]
impl ClassifierService for OpenAiClient {
    async fn classify(&self, tarea: &str) -> AppResult<Classification> {
        let api_key = self.api_key()?;
        let request_body = ChatCompletionRequest::json_object(&self.model, build_prompt(tarea));

        tracing::debug!(model = %self.model, "requesting classification");

        let response = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|err| AppError::LanguageModel(format!("failed to call OpenAI: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::LanguageModel(format!(
                "OpenAI responded with {status}: {body}"
            )));
        }

        let payload: ChatCompletionResponse = response.json().await.map_err(|err| {
            AppError::LanguageModel(format!("failed to parse OpenAI response: {err}"))
        })?;

        let raw = payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::LanguageModel("OpenAI response contained no choices".to_string())
            })?;

        Classification::parse(&raw)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

impl<'a> ChatCompletionRequest<'a> {
    /// Builds a single-user-message request asking for strict JSON output.
    /// The structured-output mode is a hint; the reply is still validated.
    fn json_object(model: &'a str, content: String) -> Self {
        Self {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content,
            }],
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        }
    }
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_the_task() {
        let prompt = build_prompt("Enviar reporte mensual");
        assert!(prompt.contains("\"Enviar reporte mensual\""));
        assert!(!prompt.contains("{tarea}"));
    }

    #[test]
    fn prompt_states_schema_and_subtask_rules() {
        let prompt = build_prompt("x");
        assert!(prompt.contains("\"cuadrante\": \"I | II | III | IV\""));
        assert!(prompt.contains("`subtareas` si `duracion_estimada` > 120"));
        assert!(prompt.contains("Analizar, Configurar, Modificar, Probar, Documentar, Desplegar"));
    }

    #[test]
    fn request_serializes_with_json_object_mode() {
        let request = ChatCompletionRequest::json_object(DEFAULT_MODEL, "hola".to_string());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["response_format"]["type"], "json_object");
    }

    #[test]
    fn missing_api_key_is_a_configuration_error() {
        let client = OpenAiClient::new(None, None);
        assert!(matches!(
            client.api_key(),
            Err(AppError::Configuration(_))
        ));
    }
}
