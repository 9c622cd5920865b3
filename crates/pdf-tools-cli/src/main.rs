use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use pdf_arrange::{
    ArrangeError, ArrangeOptions, EditOp, ExportPlanner, PageCollection, RotationMode,
    SourceDocument, apply_script,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdft", about = "PDF tools CLI", version)]
struct Cli {
    /// Log every applied operation
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reorder, rotate and delete pages, then write a new PDF
    Arrange {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file (defaults to <input><suffix>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Edit operations applied in order (zero-based positions), e.g.
        /// move:0:3, rotate:2, rotate-ccw:2, delete:1, select:1,3,
        /// deselect:3, select-all, deselect-all, delete-selected, rotate-selected
        #[arg(long = "op", value_name = "OP")]
        ops: Vec<EditOp>,

        /// JSON options file
        #[arg(long)]
        config: Option<PathBuf>,

        /// How page rotation combines with rotation stored in the source
        #[arg(long, value_enum)]
        rotation_mode: Option<RotationModeArg>,

        /// Suffix for the default output file name
        #[arg(long)]
        suffix: Option<String>,

        /// Print the export plan only, don't write a PDF
        #[arg(long)]
        plan_only: bool,
    },

    /// Show page count of a PDF
    Info {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RotationModeArg {
    Relative,
    Absolute,
}

impl From<RotationModeArg> for RotationMode {
    fn from(arg: RotationModeArg) -> Self {
        match arg {
            RotationModeArg::Relative => Self::Relative,
            RotationModeArg::Absolute => Self::Absolute,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// Run `ops` in order, naming the failing operation (1-based) in the error
fn apply_ops(collection: &mut PageCollection, ops: &[EditOp]) -> Result<()> {
    match apply_script(collection, ops) {
        Err(ArrangeError::Script { index, source }) => {
            let label = ops
                .get(index)
                .map(|op| format!("Operation #{} ({}) failed", index + 1, op))
                .unwrap_or_else(|| format!("Operation #{} failed", index + 1));
            Err(anyhow::Error::new(*source).context(label))
        }
        other => other.map_err(Into::into),
    }
}

fn print_plan(collection: &PageCollection) -> Result<()> {
    let plan = ExportPlanner::plan(collection)?;
    println!("Export plan ({} pages):", plan.len());
    for (position, instruction) in plan.iter().enumerate() {
        println!(
            "  {:>4} ← source page {:>4}  rotation {}",
            position + 1,
            instruction.original_index + 1,
            instruction.rotation
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Arrange {
            input,
            output,
            ops,
            config,
            rotation_mode,
            suffix,
            plan_only,
        } => {
            let mut options = match &config {
                Some(path) => ArrangeOptions::load(path)
                    .await
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => ArrangeOptions::default(),
            };
            if let Some(mode) = rotation_mode {
                options.rotation_mode = mode.into();
            }
            if let Some(suffix) = suffix {
                options.output_suffix = suffix;
            }
            options.validate()?;

            let output = output.unwrap_or_else(|| options.default_output_path(&input));
            if output == input {
                bail!("Output path must differ from the input path");
            }

            let source = SourceDocument::load(&input)
                .await
                .with_context(|| format!("Failed to load {}", input.display()))?;
            let mut collection = source.new_collection()?;

            apply_ops(&mut collection, &ops)?;

            print_plan(&collection)?;
            if plan_only {
                return Ok(());
            }

            let bytes = pdf_arrange::export_pdf(&source, &collection, &options).await?;
            pdf_arrange::save_pdf(&bytes, &output).await?;
            println!(
                "Arranged {} of {} pages → {}",
                collection.len(),
                source.page_count(),
                output.display()
            );
        }

        Commands::Info { input } => {
            let source = SourceDocument::load(&input)
                .await
                .with_context(|| format!("Failed to load {}", input.display()))?;
            println!("{}: {} pages", input.display(), source.page_count());
        }
    }

    Ok(())
}
