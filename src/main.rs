use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use inkplot::{
    fit_view, init_logging_with, Config, HttpSubmitter, InputMode, LogFormat, PreviewMode,
    PreviewScene, ProgramSubmitter, Session, BUILD_DATE, VERSION,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "inkplot", version, about = "Handwriting strokes to pen-plotter G-code")]
struct Cli {
    /// Configuration file (.toml or .json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert captured strokes into a program
    Convert(ConvertArgs),
    /// Render a program file as an SVG preview
    Preview(PreviewArgs),
    /// Send a program file to the configured endpoint
    Submit(SubmitArgs),
    /// Write a default configuration file
    InitConfig {
        /// Target path, defaults to the user config directory
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print version and build information
    Version,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Stroke JSON file
    input: PathBuf,

    /// Program file to write; defaults to output_<millis>.gcode in the
    /// configured output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Input mode: single or document
    #[arg(short, long)]
    mode: Option<InputMode>,

    /// Seed for the layout jitter
    #[arg(long, value_parser = clap::value_parser!(u64).range(..=i64::MAX as u64))]
    seed: Option<u64>,

    /// Also write an SVG preview here
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Preview content: processed or program
    #[arg(long)]
    preview_mode: Option<PreviewMode>,

    /// Print the program to stdout instead of writing a file
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Submit the program to the configured endpoint
    #[arg(long)]
    submit: bool,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// Program file
    program: PathBuf,

    /// SVG file to write
    #[arg(short, long)]
    output: PathBuf,

    #[arg(long)]
    width: Option<f64>,

    #[arg(long)]
    height: Option<f64>,
}

#[derive(Args, Debug)]
struct SubmitArgs {
    /// Program file
    program: PathBuf,

    /// Endpoint URL, overrides the configuration
    #[arg(long)]
    endpoint: Option<String>,

    /// Timeout in milliseconds, overrides the configuration
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_logging_with(format)?;

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::InitConfig { path, force } => init_config(path, force),
        Command::Version => {
            println!("inkplot {} (built {})", VERSION, BUILD_DATE);
            Ok(())
        }
        command => {
            let config = Config::load_or_default(cli.config.as_deref())
                .context("Failed to load configuration")?;
            match command {
                Command::Convert(args) => convert(&config, args).await,
                Command::Preview(args) => preview(&config, args),
                Command::Submit(args) => submit(&config, args).await,
                Command::InitConfig { .. } | Command::Version => Ok(()),
            }
        }
    }
}

async fn convert(config: &Config, args: ConvertArgs) -> anyhow::Result<()> {
    let mut params = config.pipeline_params();
    if args.seed.is_some() {
        params.layout.seed = args.seed;
    }

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let mode = args.mode.unwrap_or(config.output.input_mode);

    let mut session = Session::new(params);
    session
        .load_json(&text, mode)
        .with_context(|| format!("Invalid {} input in {}", mode, args.input.display()))?;

    let Some(output) = session.output() else {
        bail!("Pipeline produced no output");
    };
    if !session.has_preview() {
        warn!("Input contains no drawable strokes");
    }
    let program = output.program.text();

    if args.stdout {
        print!("{}", program);
    } else if let Some(path) = &args.output {
        write_file(path, program)?;
        info!("Wrote program to {}", path.display());
    } else {
        fs::create_dir_all(&config.output.directory).with_context(|| {
            format!("Failed to create {}", config.output.directory.display())
        })?;
        session.save_program(&config.output.directory)?;
    }

    if let Some(path) = &args.preview {
        let mode = args.preview_mode.unwrap_or(config.output.preview_mode);
        let scene = PreviewScene::from_output(output, mode);
        write_svg(config, &scene, path, None, None)?;
    }

    if args.submit {
        let submitter = HttpSubmitter::from_settings(
            config.submission.endpoint.as_deref(),
            config.submission.timeout_ms,
        )?;
        let receipt = submitter.submit(program).await?;
        info!("Endpoint accepted program ({})", receipt.status);
    }

    Ok(())
}

fn preview(config: &Config, args: PreviewArgs) -> anyhow::Result<()> {
    let text = fs::read_to_string(&args.program)
        .with_context(|| format!("Failed to read {}", args.program.display()))?;
    let scene = PreviewScene::from_program_text(&text);
    if scene.is_empty() {
        warn!("{} contains no XY moves", args.program.display());
    }
    write_svg(config, &scene, &args.output, args.width, args.height)
}

async fn submit(config: &Config, args: SubmitArgs) -> anyhow::Result<()> {
    let program = fs::read_to_string(&args.program)
        .with_context(|| format!("Failed to read {}", args.program.display()))?;
    let endpoint = args.endpoint.or_else(|| config.submission.endpoint.clone());
    let timeout_ms = args.timeout_ms.unwrap_or(config.submission.timeout_ms);

    let submitter = HttpSubmitter::from_settings(endpoint.as_deref(), timeout_ms)?;
    let receipt = submitter
        .submit(&program)
        .await
        .with_context(|| format!("Failed to submit to {}", submitter.endpoint()))?;

    info!("Endpoint accepted program ({})", receipt.status);
    if !receipt.body.is_empty() {
        println!("{}", receipt.body);
    }
    Ok(())
}

fn init_config(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = match path {
        Some(path) => path,
        None => Config::default_path()?,
    };
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    Config::default()
        .save_to_file(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn write_svg(
    config: &Config,
    scene: &PreviewScene,
    path: &Path,
    width: Option<f64>,
    height: Option<f64>,
) -> anyhow::Result<()> {
    let width = width.unwrap_or(config.output.preview_width);
    let height = height.unwrap_or(config.output.preview_height);
    let view = fit_view(&scene.bounds(), width, height);
    write_file(path, &scene.to_svg(width, height, &view))?;
    info!("Wrote preview to {}", path.display());
    Ok(())
}

fn write_file(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
