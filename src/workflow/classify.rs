use crate::domain::batch::BatchItem;
use crate::error::AppResult;
use crate::services::ClassifierService;

/// Classifies one task. Any failure propagates to the caller.
pub async fn classify_single(
    classifier: &dyn ClassifierService,
    tarea: &str,
) -> AppResult<BatchItem> {
    let classification = classifier.classify(tarea).await?;
    Ok(BatchItem::Classified {
        tarea: tarea.to_string(),
        classification,
    })
}

/// Classifies every non-empty line of a multi-line block, in order, one
/// request at a time. A failing line becomes an error record and the batch
/// continues; the output has exactly one entry per surviving line.
pub async fn classify_batch(classifier: &dyn ClassifierService, input: &str) -> Vec<BatchItem> {
    let mut items = Vec::new();

    for line in input.lines() {
        let tarea = line.trim();
        if tarea.is_empty() {
            continue;
        }
        match classifier.classify(tarea).await {
            Ok(classification) => items.push(BatchItem::Classified {
                tarea: tarea.to_string(),
                classification,
            }),
            Err(error) => {
                tracing::warn!(tarea, "classification failed: {error}");
                items.push(BatchItem::Failed {
                    tarea: tarea.to_string(),
                    error: error.to_string(),
                });
            }
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::domain::classification::{Classification, Energy, Quadrant};
    use crate::error::AppError;

    /// Fails any task containing "falla", classifies the rest.
    struct StubClassifier;

    #[async_trait]
    impl ClassifierService for StubClassifier {
        async fn classify(&self, tarea: &str) -> AppResult<Classification> {
            if tarea.contains("falla") {
                return Err(AppError::MalformedResponse {
                    raw: "no era JSON".to_string(),
                });
            }
            Ok(Classification {
                cuadrante: Quadrant::II,
                justificacion: format!("Clasificación de {tarea}"),
                recomendacion: "Agendar".to_string(),
                energia: Energy::Creative,
                bloque_sugerido: "Lunes en la mañana".to_string(),
                duracion_estimada: 60,
                subtareas: None,
            })
        }
    }

    #[tokio::test]
    async fn batch_skips_blank_lines_and_keeps_order() {
        let items = classify_batch(&StubClassifier, "Tarea A\n\nTarea B\n  \nTarea C").await;
        assert_eq!(items.len(), 3);
        assert_eq!(
            items.iter().map(|item| item.tarea()).collect::<Vec<_>>(),
            vec!["Tarea A", "Tarea B", "Tarea C"]
        );
    }

    #[tokio::test]
    async fn batch_isolates_failures() {
        let items = classify_batch(&StubClassifier, "Tarea A\nTarea que falla\nTarea C").await;
        assert_eq!(items.len(), 3);
        assert!(matches!(items[0], BatchItem::Classified { .. }));
        match &items[1] {
            BatchItem::Failed { tarea, error } => {
                assert_eq!(tarea, "Tarea que falla");
                assert!(!error.is_empty());
            }
            other => panic!("expected error record, got {other:?}"),
        }
        assert!(matches!(items[2], BatchItem::Classified { .. }));
    }

    #[tokio::test]
    async fn batch_of_blank_input_is_empty() {
        let items = classify_batch(&StubClassifier, "\n   \n\t\n").await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn single_propagates_failures() {
        let result = classify_single(&StubClassifier, "esto falla").await;
        assert!(matches!(result, Err(AppError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn single_tags_the_original_text() {
        let item = classify_single(&StubClassifier, "Enviar reporte mensual")
            .await
            .unwrap();
        assert_eq!(item.tarea(), "Enviar reporte mensual");
    }
}
