use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rayon::prelude::*;

use podium::{
    ComposeRequest, EngineOpts, OutputFormat, OutputOptions, PosterEngine, ResizeFit,
    ResizeOptions,
};

#[derive(Parser, Debug)]
#[command(name = "podium", version, about = "Render tournament posters from templates")]
struct Cli {
    /// Extra template JSON files to register before running the command.
    #[arg(long = "template-file", global = true)]
    template_files: Vec<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one poster.
    Render(RenderArgs),
    /// Render a poster using each text field's placeholder.
    Preview(PreviewArgs),
    /// Render one poster per entry of a JSON array of data maps, in parallel.
    Batch(BatchArgs),
    /// List registered templates.
    Templates,
    /// Validate a template JSON file and print every issue.
    Validate {
        /// Template JSON file.
        file: PathBuf,
    },
    /// Load the bundled fonts and print the report.
    Fonts,
}

#[derive(Parser, Debug)]
struct OutputArgs {
    /// Output format (`png` or `jpeg`).
    #[arg(long, default_value = "png")]
    format: OutputFormat,

    /// JPEG quality, 1-100.
    #[arg(long)]
    quality: Option<u8>,

    /// Resize width.
    #[arg(long)]
    width: Option<u32>,

    /// Resize height.
    #[arg(long)]
    height: Option<u32>,

    /// Resize mode.
    #[arg(long, value_enum)]
    fit: Option<FitArg>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FitArg {
    Contain,
    Cover,
    Fill,
}

impl OutputArgs {
    fn to_options(&self) -> OutputOptions {
        let resize = (self.width.is_some() || self.height.is_some()).then(|| ResizeOptions {
            width: self.width,
            height: self.height,
            fit: self.fit.map(|f| match f {
                FitArg::Contain => ResizeFit::Contain,
                FitArg::Cover => ResizeFit::Cover,
                FitArg::Fill => ResizeFit::Fill,
            }),
        });
        OutputOptions {
            format: self.format,
            quality: self.quality,
            resize,
        }
    }
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Template id.
    #[arg(long)]
    template: String,

    /// Photo file.
    #[arg(long)]
    photo: PathBuf,

    /// JSON object mapping text field ids to values.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Single `key=value` text value; may be repeated and overrides `--data`.
    #[arg(long = "set", value_parser = parse_key_value)]
    set: Vec<(String, String)>,

    /// Output file.
    #[arg(long)]
    out: PathBuf,

    /// Fail on unregistered font families instead of falling back.
    #[arg(long, default_value_t = false)]
    strict_fonts: bool,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Template id.
    #[arg(long)]
    template: String,

    /// Photo file.
    #[arg(long)]
    photo: PathBuf,

    /// Output file.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Template id.
    #[arg(long)]
    template: String,

    /// Photo file shared by every poster.
    #[arg(long)]
    photo: PathBuf,

    /// JSON array of data objects.
    #[arg(long)]
    data: PathBuf,

    /// Output directory; posters are written as `poster-<index>.<ext>`.
    #[arg(long)]
    out_dir: PathBuf,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    #[command(flatten)]
    output: OutputArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Command::Validate { file } = &cli.cmd {
        return cmd_validate(file);
    }

    let (engine, report) = PosterEngine::with_bundled(EngineOpts::from_env())?;
    for file in &cli.template_files {
        let id = engine
            .templates()
            .register_template_file(file)
            .with_context(|| format!("register template '{}'", file.display()))?;
        tracing::info!(template = %id, "registered template file");
    }

    match cli.cmd {
        Command::Render(args) => cmd_render(&engine, args),
        Command::Preview(args) => cmd_preview(&engine, args),
        Command::Batch(args) => cmd_batch(&engine, args),
        Command::Templates => {
            for t in engine.templates().list_templates() {
                println!("{}\t{}\t{}", t.id, t.name, t.description);
            }
            Ok(())
        }
        Command::Fonts => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Command::Validate { .. } => Ok(()),
    }
}

fn cmd_render(engine: &PosterEngine, args: RenderArgs) -> anyhow::Result<()> {
    let photo = read_file(&args.photo)?;
    let mut data = match &args.data {
        Some(path) => read_json::<BTreeMap<String, String>>(path)?,
        None => BTreeMap::new(),
    };
    data.extend(args.set);

    let req = ComposeRequest::new(&args.template, &photo, &data)
        .with_output(args.output.to_options())
        .with_strict_fonts(args.strict_fonts || engine.opts().strict_fonts());
    let out = engine.compose_poster(&req)?;
    write_file(&args.out, &out.image_bytes)?;
    eprintln!(
        "wrote {} ({}x{}, {} bytes)",
        args.out.display(),
        out.metadata.width,
        out.metadata.height,
        out.metadata.byte_size
    );
    Ok(())
}

fn cmd_preview(engine: &PosterEngine, args: PreviewArgs) -> anyhow::Result<()> {
    let photo = read_file(&args.photo)?;
    let out = engine.preview_poster(&args.template, &photo, args.output.to_options())?;
    write_file(&args.out, &out.image_bytes)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_batch(engine: &PosterEngine, args: BatchArgs) -> anyhow::Result<()> {
    let photo = read_file(&args.photo)?;
    let rows: Vec<BTreeMap<String, String>> = read_json(&args.data)?;
    let output = args.output.to_options();
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let render_all = || -> Vec<anyhow::Result<PathBuf>> {
        rows.par_iter()
            .enumerate()
            .map(|(i, data)| {
                let req = ComposeRequest::new(&args.template, &photo, data).with_output(output);
                let out = engine
                    .compose_poster(&req)
                    .with_context(|| format!("poster {i}"))?;
                let path = args
                    .out_dir
                    .join(format!("poster-{i:04}.{}", output.format.extension()));
                write_file(&path, &out.image_bytes)?;
                Ok(path)
            })
            .collect()
    };

    let results = match args.threads {
        Some(n) => rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .context("build rayon pool")?
            .install(render_all),
        None => render_all(),
    };

    let mut failed = 0usize;
    for r in &results {
        match r {
            Ok(path) => eprintln!("wrote {}", path.display()),
            Err(e) => {
                failed += 1;
                eprintln!("error: {e:#}");
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} posters failed", results.len());
    }
    Ok(())
}

fn cmd_validate(file: &Path) -> anyhow::Result<()> {
    let value: serde_json::Value = read_json(file)?;
    match podium::validate_template(&value) {
        Ok(t) => {
            println!("{}: ok ({} photo, {} text fields)", t.id, t.photos.len(), t.text.len());
            Ok(())
        }
        Err(errs) => {
            for issue in errs.issues() {
                println!("{issue}");
            }
            anyhow::bail!("{} issue(s) in '{}'", errs.len(), file.display())
        }
    }
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    if k.trim().is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((k.trim().to_owned(), v.to_owned()))
}

fn read_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read '{}'", path.display()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse json '{}'", path.display()))
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}
