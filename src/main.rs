use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use wikichat::analytics::AnalyticsReport;
use wikichat::config::Config;
use wikichat::controller::ChatController;
use wikichat::conversation::{Mode, FALLBACK_REPLY};
use wikichat::logging;
use wikichat::services::{HttpServiceClient, ServiceClient};
use wikichat::ui::app::App;

/// Upper bound on waiting for log submissions when the TUI exits.
const LOG_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Parser)]
#[command(
    name = "wikichat",
    version,
    about = "Terminal chat client for a classifier / retriever / summarizer service chain"
)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Conversation mode, overriding chat.default_mode
    #[arg(long, value_enum, global = true)]
    mode: Option<ModeArg>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Send one message and print the reply
    Ask {
        text: String,
        /// Topic to search instead of classifying (repeatable)
        #[arg(long = "topic")]
        topics: Vec<String>,
    },
    /// Print usage analytics from the log service
    Analytics,
    /// Print the resolved configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Retrieval,
    Chitchat,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Retrieval => Mode::Retrieval,
            ModeArg::Chitchat => Mode::ChitChat,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        None => logging::init_file_logging(),
        Some(_) => logging::init_stderr_logging(),
    }

    let config = load_config(cli.config.as_deref())?;
    let mode = cli.mode.map(Mode::from).unwrap_or(config.chat.default_mode);

    match cli.command {
        None => run_interactive(config, mode),
        Some(Command::Ask { text, topics }) => run_ask(config, mode, &text, topics),
        Some(Command::Analytics) => run_analytics(config),
        Some(Command::Config) => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

fn build_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

fn build_services(config: &Config) -> Result<Arc<dyn ServiceClient>> {
    let client = HttpServiceClient::new(config.services.clone())
        .context("failed to build HTTP client")?;
    Ok(Arc::new(client))
}

fn run_interactive(config: Config, mode: Mode) -> Result<()> {
    let runtime = build_runtime()?;
    let services = build_services(&config)?;

    // Turns are spawned from the UI thread onto this runtime.
    let enter = runtime.enter();
    let mut app = App::new(ChatController::new(services, mode), config.chat.topics);
    let outcome = wikichat::ui::runtime::run(&mut app);
    drop(enter);
    outcome?;

    runtime.block_on(async {
        let flush = app.controller_mut().flush_logs();
        if tokio::time::timeout(LOG_FLUSH_TIMEOUT, flush).await.is_err() {
            tracing::warn!("Gave up waiting for log submissions");
        }
    });
    Ok(())
}

fn run_ask(config: Config, mode: Mode, text: &str, topics: Vec<String>) -> Result<()> {
    let runtime = build_runtime()?;
    let services = build_services(&config)?;

    let reply = runtime.block_on(async {
        let mut chat = ChatController::new(services, mode);
        if !topics.is_empty() {
            chat.set_topics(topics);
        }
        if chat.submit(text).is_none() {
            bail!("message is empty");
        }
        chat.settle().await;
        chat.flush_logs().await;
        let reply = chat
            .conversation()
            .last_bot_message()
            .map(|message| message.text.clone())
            .unwrap_or_default();
        Ok::<_, anyhow::Error>(reply)
    })?;

    println!("{}", reply);
    if reply == FALLBACK_REPLY {
        bail!("the request failed");
    }
    Ok(())
}

fn run_analytics(config: Config) -> Result<()> {
    let runtime = build_runtime()?;
    let services = build_services(&config)?;
    let log = runtime.block_on(services.fetch_analytics())?;
    print!("{}", format_report(&AnalyticsReport::from_log(&log)));
    Ok(())
}

fn format_report(report: &AnalyticsReport) -> String {
    let mut out = format!("Queries: {}\n", report.queries);

    if let Some(recent) = &report.recent {
        out.push_str(&format!("\nLatest query: {}\n", recent.query));
        out.push_str(&format!(
            "  classifier {:.3}s  retriever {:.3}s  summarizer {:.3}s\n",
            recent.timings.classifier, recent.timings.retriever, recent.timings.summarizer
        ));
        for (topic, probability) in &recent.topics {
            out.push_str(&format!("  {:<16} p={:.2}\n", topic, probability));
        }
    }

    if !report.average_probability.is_empty() {
        out.push_str("\nAverage probability per topic:\n");
        for (topic, mean) in &report.average_probability {
            out.push_str(&format!("  {:<16} {:.3}\n", topic, mean));
        }
    }

    if !report.document_counts.is_empty() {
        out.push_str("\nDocuments per topic:\n");
        for ((topic, count), (_, score)) in report
            .document_counts
            .iter()
            .zip(report.score_contribution.iter())
        {
            out.push_str(&format!(
                "  {:<16} {:>4}  ln(1+mean score) {:.3}\n",
                topic, count, score
            ));
        }
    }

    out
}
