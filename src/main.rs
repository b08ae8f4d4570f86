use clap::{Parser, Subcommand};
use rimagen::{
    config::Config,
    logger::{self, LogLevel, LoggerConfig},
    models::{ImageQuality, ImageStyle},
    AppController, GenerationRequest, ImageGenerationClient, Language, Notifier, Preferences,
    Severity, SubmitOutcome, Theme,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "rimagen")]
#[command(author, version, about = "Turn a text prompt into an image", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug logging with timings
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the preferences file
    #[arg(long, global = true)]
    store: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an image and save it
    Generate {
        /// What to draw (Arabic or English)
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
        /// API key; the saved key is used when omitted
        #[arg(short, long, env = "RIMAGEN_API_KEY")]
        key: Option<String>,
        #[arg(short, long, default_value = "realistic")]
        style: ImageStyle,
        #[arg(short, long, default_value = "high")]
        quality: ImageQuality,
        /// Ask services for an image without logos or watermarks
        #[arg(long)]
        remove_watermark: bool,
        /// Directory the image is written to
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Show or clear generated images
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Manage the saved API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Show or change the color theme (light, dark, toggle)
    Theme { value: Option<String> },

    /// Show or change the interface language (ar, en, toggle)
    Language { value: Option<String> },

    /// Forget the last prompt
    Reset,
}

#[derive(Subcommand)]
enum HistoryAction {
    List {
        /// Show at most this many entries
        #[arg(short, long)]
        limit: Option<usize>,
    },
    Clear,
}

#[derive(Subcommand)]
enum KeyAction {
    Set { key: String },
    Clear,
}

/// Prints notifications as they are raised.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Error | Severity::Warning => eprintln!("{} {}", severity.icon(), message),
            _ => println!("{} {}", severity.icon(), message),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LoggerConfig::development().with_level(LogLevel::Debug)
    } else {
        LoggerConfig::quiet()
    };
    logger::init_with_config(log_config)?;
    logger::log_startup_info("rimagen", env!("CARGO_PKG_VERSION"));
    if !dotenv_loaded {
        log::debug!("No .env file found, using process environment");
    }

    let mut config = Config::from_env();
    if let Some(path) = cli.store {
        config.store.path = Some(path);
    }
    logger::log_config_info(&config);

    let prefs = Preferences::open(&config.store)?;
    let client = ImageGenerationClient::from_config(&config)?;
    log::debug!("Backend chain: {}", client.backend_names().join(" → "));

    let controller = AppController::new(Arc::new(client), prefs, Arc::new(TerminalNotifier));

    match cli.command {
        Commands::Generate {
            prompt,
            key,
            style,
            quality,
            remove_watermark,
            out,
        } => {
            let restored = controller.restore();
            let api_key = key.or(restored.api_key).unwrap_or_default();
            let request = GenerationRequest::new(api_key, prompt.join(" "))
                .with_style(style)
                .with_quality(quality)
                .with_watermark_removal(remove_watermark);

            match controller.submit(request).await {
                SubmitOutcome::Completed(result) if result.success => {
                    if let Some(enhanced) = &result.enhanced_prompt {
                        println!("Enhanced prompt: {}", enhanced);
                    }
                    if let Some(backend) = &result.backend {
                        println!("Service: {}", backend);
                    }
                    let path = controller.download(&out).await?;
                    println!("{}", path.display());
                }
                _ => std::process::exit(1),
            }
        }

        Commands::History { action } => match action {
            HistoryAction::List { limit } => {
                let entries = controller.history();
                let shown = limit.unwrap_or(entries.len());
                for entry in entries.iter().take(shown) {
                    println!("{}  {}  {}", entry.timestamp, entry.id, entry.prompt);
                }
                if entries.is_empty() {
                    println!("(empty)");
                }
            }
            HistoryAction::Clear => controller.clear_history()?,
        },

        Commands::Key { action } => match action {
            KeyAction::Set { key } => {
                if !rimagen::models::is_valid_api_key(&key) {
                    let message = rimagen::MessageKey::InvalidApiKey.text(controller.language());
                    TerminalNotifier.notify(Severity::Error, message);
                    std::process::exit(1);
                }
                controller.preferences().set_api_key(&key)?;
                println!("API key saved");
            }
            KeyAction::Clear => {
                controller.preferences().clear_api_key()?;
                println!("API key removed");
            }
        },

        Commands::Theme { value } => match value.as_deref() {
            None => println!("{}", controller.view().appearance.theme),
            Some("toggle") => {
                controller.toggle_theme()?;
            }
            Some(raw) => controller.set_theme(raw.parse::<Theme>()?)?,
        },

        Commands::Language { value } => match value.as_deref() {
            None => println!("{}", controller.language()),
            Some("toggle") => {
                controller.toggle_language()?;
            }
            Some(raw) => controller.set_language(raw.parse::<Language>()?)?,
        },

        Commands::Reset => controller.reset(),
    }

    Ok(())
}
