use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use layer_export::export::DEFAULT_DPI;
use layer_export::export::rasterize::INKSCAPE_ENV;
use layer_export::{
    ExportOptions, Exporter, InkscapeCli, InkscapeRasterizer, Progress, Rasterizer,
    ResvgRasterizer,
};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Export each layer of an Inkscape SVG, on top of its base layer, to PNG
#[derive(Parser, Debug)]
#[command(name = "layer-export", version)]
struct Cli {
    /// Input file to process
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Output directory (created if missing)
    #[arg(short, long, value_name = "OUTDIR")]
    output: PathBuf,

    /// Keep the intermediate SVG file of each layer
    #[arg(short, long = "keep-svg", alias = "keepsvg")]
    keep_svg: bool,

    /// Resolution in dpi, e.g. --dpi 90
    #[arg(short, long, default_value_t = DEFAULT_DPI)]
    dpi: u32,

    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,

    /// Only export these layers, e.g. --layers foo,bar,baz
    #[arg(short, long, value_delimiter = ',')]
    layers: Option<Vec<String>>,

    /// Renderer used to rasterize each layer
    #[arg(long, value_enum, default_value_t = RendererChoice::Inkscape)]
    renderer: RendererChoice,

    /// Inkscape executable
    #[arg(long, env = INKSCAPE_ENV, default_value = "inkscape")]
    inkscape: PathBuf,

    /// Command line dialect of the Inkscape executable
    #[arg(long, value_enum, default_value_t = CliChoice::Modern)]
    inkscape_cli: CliChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RendererChoice {
    /// External Inkscape process
    Inkscape,
    /// Built-in resvg renderer
    Resvg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliChoice {
    /// Inkscape 0.92 and older
    Legacy,
    /// Inkscape 1.x
    Modern,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn make_rasterizer(cli: &Cli) -> Box<dyn Rasterizer> {
    match cli.renderer {
        RendererChoice::Inkscape => {
            let dialect = match cli.inkscape_cli {
                CliChoice::Legacy => InkscapeCli::Legacy,
                CliChoice::Modern => InkscapeCli::Modern,
            };
            Box::new(InkscapeRasterizer::new(&cli.inkscape, dialect))
        }
        RendererChoice::Resvg => {
            let resources_dir = std::fs::canonicalize(&cli.input)
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()));
            Box::new(ResvgRasterizer::new(resources_dir))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let rasterizer = make_rasterizer(&cli);
    tracing::debug!("using {} renderer", rasterizer.name());

    let options = ExportOptions {
        source: cli.input,
        output_dir: cli.output,
        dpi: cli.dpi,
        keep_svg: cli.keep_svg,
        layers: cli.layers,
    };
    let source = options.source.clone();

    let exporter = Exporter::new(options, rasterizer).context("prepare output directory")?;

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} [{elapsed_precise}] {msg}")?
            .progress_chars("=> "),
    );

    let summary = exporter
        .run_with_progress(|progress| match progress {
            Progress::Started { total } => pb.set_length(total as u64),
            Progress::LayerDone(layer) => {
                pb.set_message(layer.label.clone());
                pb.inc(1);
            }
        })
        .with_context(|| format!("export layers of '{}'", source.display()))?;

    pb.finish_with_message(format!(
        "exported {} layers over '{}'",
        summary.exported.len(),
        summary.base.label
    ));
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    tracing::debug!("raw arguments: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(err) = run(cli) {
        tracing::error!("{:#}", err);
        process::exit(1);
    }
}
