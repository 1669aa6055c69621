use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "thumbnail", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Caption a random image for every line of a sentence file.
    Generate(GenerateArgs),
    /// Caption a single image.
    Caption(CaptionArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Directory of background images.
    #[arg(long)]
    images: PathBuf,

    /// Text file with one sentence per line (`\n` inserts a line break).
    #[arg(long)]
    sentences: PathBuf,

    /// TrueType/OpenType font file.
    #[arg(long)]
    font: PathBuf,

    /// Existing directory receiving `image_{i}.png`.
    #[arg(long)]
    output: PathBuf,

    /// Seed for image selection, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct CaptionArgs {
    /// Background image.
    #[arg(long)]
    image: PathBuf,

    /// Caption text (`\n` inserts a line break).
    #[arg(long)]
    text: String,

    /// TrueType/OpenType font file.
    #[arg(long)]
    font: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Draw the caption without the black outline.
    #[arg(long)]
    no_border: bool,
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
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Caption(args) => cmd_caption(args),
    }
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let opts = thumbnail::GenerateOpts {
        seed: args.seed,
        ..Default::default()
    };

    let written =
        thumbnail::generate_with(&args.images, &args.sentences, &args.font, &args.output, &opts)?;
    for path in &written {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn cmd_caption(args: CaptionArgs) -> anyhow::Result<()> {
    let img = image::open(&args.image)
        .with_context(|| format!("open image '{}'", args.image.display()))?
        .to_rgba8();
    let mut engine = thumbnail::TextLayoutEngine::from_file(&args.font)?;

    let mut opts = thumbnail::GenerateOpts::default();
    if args.no_border {
        opts.border_color = None;
    }

    let text = thumbnail::sentence_bank::unescape_line(&args.text);
    let captioned = thumbnail::caption_image(&img, &text, &mut engine, &opts)?;

    captioned
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
