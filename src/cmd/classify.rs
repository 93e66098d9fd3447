use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;

use crate::context::AppContext;
use crate::domain::batch::BatchItem;
use crate::error::{AppError, AppResult};
use crate::workflow::classify::{classify_batch, classify_single};

#[derive(Args, Debug, Clone)]
pub struct ClassifyArgs {
    /// Task description to classify. Omit to read from --file or stdin.
    pub task: Option<String>,

    /// Treat the input as multiple tasks, one per line.
    #[arg(short, long)]
    pub multi: bool,

    /// Read the task text from a file.
    #[arg(short, long, conflicts_with = "task")]
    pub file: Option<PathBuf>,

    /// Print the result set as pretty JSON instead of the formatted view.
    #[arg(long)]
    pub json: bool,

    /// Also write the result set as pretty JSON to this path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn run(ctx: &AppContext, args: ClassifyArgs) -> AppResult<()> {
    let input = read_input(&args)?;

    // Rejected before any network call.
    if input.trim().is_empty() {
        eprintln!("Warning: escribe al menos una tarea.");
        return Ok(());
    }

    let items = if args.multi {
        classify_batch(ctx.classifier.as_ref(), &input).await
    } else {
        vec![classify_single(ctx.classifier.as_ref(), input.trim()).await?]
    };

    if args.json {
        println!("{}", to_pretty_json(&items)?);
    } else {
        for item in &items {
            render_item(item);
        }
    }

    if let Some(path) = &args.output {
        fs::write(path, to_pretty_json(&items)?)?;
        println!("Resultados guardados en {}", path.display());
    }

    Ok(())
}

fn read_input(args: &ClassifyArgs) -> AppResult<String> {
    if let Some(task) = &args.task {
        return Ok(task.clone());
    }
    if let Some(path) = &args.file {
        return Ok(fs::read_to_string(path)?);
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn to_pretty_json(items: &[BatchItem]) -> AppResult<String> {
    serde_json::to_string_pretty(items)
        .map_err(|err| AppError::Configuration(format!("failed to encode results: {err}")))
}

fn render_item(item: &BatchItem) {
    match item {
        BatchItem::Failed { tarea, error } => {
            eprintln!("Error con \u{ab}{tarea}\u{bb}: {error}");
        }
        BatchItem::Classified {
            tarea,
            classification,
        } => {
            println!("---");
            println!("Tarea: {tarea}");
            println!("Cuadrante: {}", classification.cuadrante.label());
            println!("Justificación: {}", classification.justificacion);
            println!("Recomendación: {}", classification.recomendacion);
            println!("Energía: {}", classification.energia.label());
            println!("Bloque sugerido: {}", classification.bloque_sugerido);
            println!("Duración estimada: {} min", classification.duracion_estimada);
            if let Some(subtareas) = &classification.subtareas {
                println!("Subtareas sugeridas:");
                for (index, sub) in subtareas.iter().enumerate() {
                    println!("  {}. {} ({} min)", index + 1, sub.descripcion, sub.duracion);
                }
            }
        }
    }
}
