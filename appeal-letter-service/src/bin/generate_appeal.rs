use anyhow::Context as _;
use appeal_letter_service::{
    AppealPipeline, DocumentKind, DocumentSet, GenerationRequest, GenerationVariant,
    OpenRouterProvider, ServiceConfig, UploadedDocument, config::LogFormat,
    telemetry::init_tracing,
};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Generate a medical claim appeal letter from local PDFs
#[derive(Parser, Debug)]
#[command(name = "generate_appeal", version)]
struct Args {
    /// Explanation of Benefits PDF
    #[arg(long)]
    eob: Option<PathBuf>,

    /// Medical records PDF
    #[arg(long)]
    medical_records: Option<PathBuf>,

    /// Denial letter PDF
    #[arg(long)]
    denial_letter: Option<PathBuf>,

    /// OpenRouter API key
    #[arg(long)]
    api_key: Option<String>,

    /// full | appeal_and_summary
    #[arg(long, value_parser = parse_variant)]
    variant: Option<GenerationVariant>,

    /// Directory that receives appeal_letter.txt
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Print the extracted text of each document and exit
    #[arg(long)]
    preview: bool,
}

fn parse_variant(raw: &str) -> Result<GenerationVariant, String> {
    GenerationVariant::parse(raw).ok_or_else(|| format!("unknown variant: {raw}"))
}

fn load(kind: DocumentKind, path: &Path) -> anyhow::Result<UploadedDocument> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| kind.field_name().to_string());
    Ok(UploadedDocument::new(kind, file_name, bytes))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = ServiceConfig::from_env();
    init_tracing(LogFormat::Pretty);

    let mut documents = DocumentSet::default();
    for (kind, path) in [
        (DocumentKind::Eob, &args.eob),
        (DocumentKind::MedicalRecords, &args.medical_records),
        (DocumentKind::DenialLetter, &args.denial_letter),
    ] {
        if let Some(path) = path {
            documents.insert(load(kind, path)?);
        }
    }

    let provider = Arc::new(OpenRouterProvider::new(config.agent_settings()));
    let pipeline = Arc::new(AppealPipeline::new(provider, config.variant));

    if args.preview {
        let previewer = pipeline.clone();
        let previews = tokio::task::spawn_blocking(move || previewer.preview(&documents))
            .await
            .context("preview worker failed")?;
        for preview in previews {
            println!("=== {} Preview ({}) ===", preview.document, preview.file_name);
            match (preview.text, preview.error) {
                (Some(text), _) => println!("{text}\n"),
                (None, Some(error)) => println!("Error: {error}\n"),
                (None, None) => println!(),
            }
        }
        return Ok(());
    }

    let report = pipeline
        .generate(GenerationRequest {
            credential: args.api_key,
            documents,
            variant: args.variant,
        })
        .await?;

    println!("=== Generated Appeal Letter ===\n{}\n", report.outputs.appeal_letter);
    println!("=== Medical Records Summary ===\n{}\n", report.outputs.medical_summary);
    if let Some(suggestions) = &report.outputs.rebuttal_suggestions {
        println!("=== Rebuttal Improvement Suggestions ===\n{suggestions}\n");
    }

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;
    let target = args.output_dir.join(&report.download.file_name);
    std::fs::write(&target, &report.download.content)
        .with_context(|| format!("writing {}", target.display()))?;
    println!("Appeal letter saved to {}", target.display());

    Ok(())
}
