use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use newscheck::analysis::ANALYSIS_FAILED_MESSAGE;
use newscheck::chat::{TelegramApi, TelegramBot, TelegramBotConfig};
use newscheck::{
    extract_verdict, format_verdict, AppConfig, FactCheckPipeline, GeminiClient, InputAssembler,
    InputAssemblerConfig, PromptTemplate,
};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "newscheck", version, about = "Fake news detector backed by Gemini with web search", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
    /// Overrides GEMINI_MODEL.
    #[arg(long, global = true)]
    model: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one claim and/or image and print the verdict.
    Check {
        #[arg(long)]
        text: Option<String>,
        /// Image file path or http(s) URL.
        #[arg(long)]
        image: Option<String>,
        /// Also print the raw model output and the parsed record.
        #[arg(long)]
        raw: bool,
    },
    /// Extract and format a saved model response (stdin when no file is given).
    Extract {
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long, default_value = "")]
        input_text: String,
    },
    /// Run the Telegram bot.
    Bot,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(model: Option<String>) -> anyhow::Result<AppConfig> {
    let config = AppConfig::from_env()?;
    Ok(match model {
        Some(model) => config.with_model(model),
        None => config,
    })
}

fn build_pipeline(config: &AppConfig) -> anyhow::Result<FactCheckPipeline<GeminiClient>> {
    let llm = GeminiClient::new(
        &config.api_base,
        &config.model,
        config.google_api_key()?,
        PromptTemplate::default(),
        config.llm_timeout,
    )?;
    let assembler =
        InputAssembler::new(InputAssemblerConfig::default().with_timeout(config.fetch_timeout))?;
    Ok(FactCheckPipeline::new(Arc::new(llm), assembler))
}

fn prompt_for_claim() -> anyhow::Result<String> {
    print!("Enter news article or claim (leave blank if in image): ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line).context("failed to read claim from stdin")?;
    Ok(line.trim().to_string())
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Check { text, image, raw } => {
            let config = load_config(cli.model)?;
            let pipeline = build_pipeline(&config)?;
            let text = match (text, &image) {
                (Some(text), _) => text,
                (None, Some(_)) => String::new(),
                (None, None) => prompt_for_claim()?,
            };

            let outcome = pipeline.check(&text, image.as_deref())?;
            if raw {
                println!("Raw model output:\n{}\n", outcome.raw_response);
                println!(
                    "Parsed verdict:\n{}\n",
                    serde_json::to_string_pretty(&outcome.record)?
                );
            }
            match outcome.usable_record() {
                Some(record) => println!("{}", format_verdict(record)),
                None => println!("{}", ANALYSIS_FAILED_MESSAGE),
            }
        }
        Commands::Extract { file, input_text } => {
            let raw = match &file {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("cannot read {:?}", path))?,
                None => {
                    let mut buf = String::new();
                    io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read response from stdin")?;
                    buf
                }
            };
            match extract_verdict(&raw, Some(input_text.trim())) {
                Some(record) if !record.is_empty() => println!("{}", format_verdict(&record)),
                _ => println!("{}", ANALYSIS_FAILED_MESSAGE),
            }
        }
        Commands::Bot => {
            let config = load_config(cli.model)?;
            let token = config.telegram_bot_token()?.to_string();
            let pipeline = build_pipeline(&config)?;
            let bot_config = TelegramBotConfig::default();
            let api = TelegramApi::new(token, bot_config.poll_timeout)?;
            info!(model = %config.model, "starting telegram bot");
            TelegramBot::new(api, pipeline, bot_config).run()?;
        }
    }

    Ok(())
}
