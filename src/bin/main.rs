use clap::{Parser, Subcommand};
use crossterm::style::Stylize;
use phonemic_core::config::{AppConfig, DEFAULT_CONFIG_PATH};
use phonemic_core::core::types::Segment;
use phonemic_core::filler::Filler;
use phonemic_core::notes::JsonDeckStore;
use phonemic_core::PhonemicEngine;
use std::error::Error;
use std::io::{stdin, stdout, BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Fill your language cards with auto-generated data
#[derive(Parser, Debug)]
#[command(name = "phonemic_filler", version)]
struct Args {
    /// Config file path.
    #[arg(short = 'c', long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Log filter, e.g. `info` or `phonemic_core=debug`.
    #[arg(long, default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill images and transcriptions on the configured deck.
    Fill,
    /// Transcribe definitions read from stdin, one per line.
    Transcribe {
        /// Also print the recovered segments.
        #[arg(long)]
        segments: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log))
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(()) => {
            tracing::info!("done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "aborted");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let cfg = AppConfig::from_path(&args.config)?;
    let engine = cfg.phonemic.as_ref().map(PhonemicEngine::from_config).transpose()?;

    match args.command {
        Command::Fill => {
            let mut filler = Filler::new(JsonDeckStore::open(cfg.notes)?);
            if let Some(engine) = engine {
                filler = filler.with_engine(engine);
            }
            let report = filler.run()?;
            tracing::info!(
                notes = report.notes,
                images = report.images,
                transcriptions = report.transcriptions,
                "deck updated"
            );
        }
        Command::Transcribe { segments } => {
            let engine = engine.ok_or("transcription needs a `phonemic` config section")?;
            transcribe_stdin(&engine, segments)?;
        }
    }
    Ok(())
}

fn transcribe_stdin(engine: &PhonemicEngine, show_segments: bool) -> Result<(), Box<dyn Error>> {
    let out = stdout();
    let mut out = BufWriter::new(out.lock());

    for line in stdin().lock().lines() {
        let definition = line?;
        let definition = definition.trim_end();
        let segments = engine.segment(definition)?;
        if show_segments {
            print_segments(&mut out, &segments)?;
        }
        writeln!(out, "{}", engine.assemble(&segments))?;
        out.flush()?;
    }
    Ok(())
}

fn print_segments(out: &mut impl Write, segments: &[Segment]) -> std::io::Result<()> {
    for (i, segment) in segments.iter().enumerate() {
        if i != 0 {
            write!(out, "{}", " | ".dark_grey())?;
        }
        write!(out, "{}", segment.text.as_str().bold())?;
    }
    writeln!(out)
}
