use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "carousel", version)]
struct Cli {
    /// Editor config JSON (caps, quality, fonts, styling).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log more (repeat for debug output).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Turn command text into a document JSON.
    Parse(ParseArgs),
    /// Render one slide of a document as a PNG.
    Render(RenderArgs),
    /// Export a document as images, a zip bundle or a PDF.
    Export(ExportArgs),
    /// Print a share token for a document.
    Share(ShareArgs),
}

#[derive(Parser, Debug)]
struct ParseArgs {
    /// Input command text.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output document JSON path.
    #[arg(long)]
    out: PathBuf,

    /// Target platform for the new document.
    #[arg(long, default_value = "instagram")]
    platform: String,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Slide index (0-based). Defaults to the document's selection.
    #[arg(long)]
    slide: Option<usize>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output encoding.
    #[arg(long, value_enum, default_value_t = FormatChoice::Png)]
    format: FormatChoice,

    /// Directory the artifact is written into.
    #[arg(long)]
    out_dir: PathBuf,

    /// Export only the selected slide.
    #[arg(long)]
    current: bool,

    /// Worker threads for bulk export (defaults to the global pool).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct ShareArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Png,
    Jpeg,
    Pdf,
}

impl From<FormatChoice> for carousel::ExportFormat {
    fn from(choice: FormatChoice) -> Self {
        match choice {
            FormatChoice::Png => Self::Png,
            FormatChoice::Jpeg => Self::Jpeg,
            FormatChoice::Pdf => Self::Pdf,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = cli.config.as_deref();
    match cli.cmd {
        Command::Parse(args) => cmd_parse(args, config),
        Command::Render(args) => cmd_render(args, config),
        Command::Export(args) => cmd_export(args, config),
        Command::Share(args) => cmd_share(args, config),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn load_config(path: Option<&Path>, input: &Path) -> anyhow::Result<carousel::EditorConfig> {
    let config = match path {
        Some(p) => carousel::EditorConfig::from_path(p)?,
        None => {
            let assets_root = input.parent().unwrap_or_else(|| Path::new("."));
            carousel::EditorConfig::default().with_assets_root(assets_root)
        }
    };
    Ok(config)
}

fn open_session(config: Option<&Path>, doc_path: &Path) -> anyhow::Result<carousel::EditorSession> {
    let mut session = carousel::EditorSession::new(load_config(config, doc_path)?)?;
    let json = std::fs::read_to_string(doc_path)
        .with_context(|| format!("read document '{}'", doc_path.display()))?;
    let file = carousel::DocumentFile::from_json(&json)
        .with_context(|| format!("parse document '{}'", doc_path.display()))?;
    session.load_document(file)?;
    Ok(session)
}

fn cmd_parse(args: ParseArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read commands '{}'", args.in_path.display()))?;
    let platform: carousel::Platform = args.platform.parse()?;

    let mut session = carousel::EditorSession::new(load_config(config, &args.in_path)?)?;
    session.set_platform(platform, false)?;
    let outcome = session.apply_commands(&text, carousel::ApplyMode::Replace)?;

    let json = session.document_file().to_json()?;
    carousel::write_file(&args.out, json.as_bytes())?;

    eprintln!(
        "parsed {} slide(s) ({} dropped), wrote {}",
        outcome.added,
        outcome.dropped,
        args.out.display()
    );
    Ok(())
}

fn cmd_render(args: RenderArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let mut session = open_session(config, &args.in_path)?;
    if let Some(index) = args.slide {
        session.select_slide(index)?;
    }

    let (frame, report) = session.render_current()?;
    if report.background_fallback {
        tracing::warn!("background image unavailable, drew fallback fill");
    }
    if report.logo_skipped {
        tracing::warn!("logo unavailable, skipped");
    }

    let png = carousel::encode_png(&frame)?;
    let path = carousel::write_file(&args.out, &png)?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_export(args: ExportArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let session = open_session(config, &args.in_path)?;
    let format = args.format.into();

    let report = if args.current {
        session.export_current(format)?
    } else {
        let doc = session.document();
        session.exporter().with_threads(args.threads).export_all(
            &doc.slides,
            doc.platform,
            doc.platform_size(),
            format,
        )?
    };

    if let Some(notice) = report.notice {
        eprintln!("note: {notice}");
    }
    let path = report.artifact.write_into(&args.out_dir)?;
    eprintln!("wrote {} ({} page(s))", path.display(), report.pages);
    Ok(())
}

fn cmd_share(args: ShareArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let session = open_session(config, &args.in_path)?;
    println!("{}", session.encode_share_token()?);
    Ok(())
}
