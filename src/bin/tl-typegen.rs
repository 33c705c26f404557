use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use tl_typegen::{
    build_model, generate_from_path, Dialect, GenOptions, ResponseTypeSource, SchemaFormat,
    DEFAULT_SCHEMA_PATH,
};

/// Compile a TL schema into Flow or TypeScript type declarations.
#[derive(Parser, Debug)]
#[command(name = "tl-typegen", version, about)]
struct Cli {
    /// Schema file to compile.
    #[arg(default_value = DEFAULT_SCHEMA_PATH)]
    file: PathBuf,
    /// Emit TypeScript instead of Flow.
    #[arg(long)]
    ts: bool,
    /// Source format of the schema file.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,
    /// Where function response types come from.
    #[arg(long, value_enum)]
    response_types: Option<ResponseTypesArg>,
    /// JSON options file; command-line flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the parsed model as JSON instead of declarations.
    #[arg(long)]
    model: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Tl,
    CppHeader,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ResponseTypesArg {
    AnnotationOrCategory,
    ResultCategory,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let options = resolve_options(&cli)?;

    if cli.model {
        let source = std::fs::read_to_string(&cli.file)
            .map_err(|e| format!("failed to read '{}': {e}", cli.file.display()))?;
        let model = build_model(&source, options.schema_format);
        println!("{}", model.to_json_string(true).map_err(|e| e.to_string())?);
        return Ok(());
    }

    let generated = generate_from_path(&cli.file, &options)
        .map_err(|e| format!("failed to compile '{}': {e}", cli.file.display()))?;
    for diagnostic in &generated.diagnostics {
        tracing::warn!(kind = ?diagnostic.kind, "{diagnostic}");
    }
    print!("{}", generated.output);
    Ok(())
}

fn resolve_options(cli: &Cli) -> Result<GenOptions, String> {
    let mut options = match &cli.config {
        Some(path) => GenOptions::from_json_path(path).map_err(|e| e.to_string())?,
        None => GenOptions::default(),
    };

    if cli.ts {
        options.dialect = Dialect::TypeScript;
    }
    if let Some(format) = cli.format {
        options.schema_format = match format {
            FormatArg::Tl => SchemaFormat::Tl,
            FormatArg::CppHeader => SchemaFormat::CppHeader,
        };
    }
    if let Some(source) = cli.response_types {
        options.response_types = match source {
            ResponseTypesArg::AnnotationOrCategory => ResponseTypeSource::AnnotationOrCategory,
            ResponseTypesArg::ResultCategory => ResponseTypeSource::ResultCategory,
        };
    }
    Ok(options)
}
