use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use prompter_core::{content::extract_number, AppConfig, DurationMode, Locale};

mod commands;

#[derive(Parser)]
#[command(name = "prompter")]
#[command(author, version, about = "A terminal teleprompter with a synchronized editor view")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the prompter (default)
    Run(RunArgs),
    /// Show the effective configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct RunArgs {
    /// Text file to read from (defaults to a built-in sample)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Total run time in seconds, e.g. "90" or "90s"
    #[arg(short, long, value_parser = parse_seconds)]
    duration: Option<u64>,

    /// Scroll rate in lines per second, e.g. "1.5" or "2lps"; switches to speed mode
    #[arg(short, long, value_parser = parse_speed)]
    speed: Option<f64>,

    /// Interface language: "en" or "zh"
    #[arg(short, long, value_parser = parse_locale)]
    locale: Option<Locale>,

    /// Start playing right away
    #[arg(short, long)]
    play: bool,

    /// Hide the editor pane
    #[arg(long)]
    no_editor: bool,
}

impl RunArgs {
    /// Layer command-line overrides onto the loaded config
    fn apply(&self, config: &mut AppConfig) {
        if let Some(secs) = self.duration {
            config.playback.mode = DurationMode::Fixed;
            config.playback.duration_ms = secs.saturating_mul(1000);
        }
        if let Some(speed) = self.speed {
            config.playback.mode = DurationMode::Speed;
            config.playback.lines_per_second = speed;
        }
        if let Some(locale) = self.locale {
            config.general.locale = locale;
        }
        if self.play {
            config.playback.autoplay = true;
        }
        if self.no_editor {
            config.ui.show_editor = false;
        }
    }
}

fn parse_seconds(input: &str) -> Result<u64, String> {
    extract_number(input).ok_or_else(|| format!("no number in '{}'", input))
}

fn parse_speed(input: &str) -> Result<f64, String> {
    let leading: String = input
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    leading
        .parse::<f64>()
        .ok()
        .or_else(|| extract_number(input).map(|n| n as f64))
        .ok_or_else(|| format!("no number in '{}'", input))
}

fn parse_locale(input: &str) -> Result<Locale, String> {
    match input.trim().to_lowercase().as_str() {
        "en" | "english" => Ok(Locale::En),
        "zh" | "zh-hans" | "zh_hans" | "cn" | "简中" => Ok(Locale::ZhHans),
        other => Err(format!("unknown locale '{}', expected en or zh", other)),
    }
}

/// Send logs to the log file; stderr belongs to the terminal UI
fn init_file_logging(config: &AppConfig, filter: EnvFilter) -> Result<()> {
    let path = config.log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load()?;

    let filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );

    match cli.command {
        Some(Commands::Config { init }) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
                .init();
            commands::config::run(&config, init)
        }
        Some(Commands::Run(args)) => {
            args.apply(&mut config);
            init_file_logging(&config, filter)?;
            commands::run::run(config, args.file).await
        }
        None => {
            cli.run.apply(&mut config);
            init_file_logging(&config, filter)?;
            commands::run::run(config, cli.run.file).await
        }
    }
}
