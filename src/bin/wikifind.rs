//! CLI binary for wikifind.

use std::path::{Path, PathBuf};

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use wikifind::config::LoggingConfig;
use wikifind::messages::Messages;
use wikifind::session::parse_input;
use wikifind::{Action, AppConfig, Preferences, Presenter, Session, wikifind_dirs};
use wikifind_search::{Language, ResultView, SearchOrchestrator, WikipediaClient};

const HELP: &str = "\
Type a query and press Enter. Commands:
  :down / :up    move the suggestion highlight
  :pick [n]      search the highlighted (or n-th) suggestion
  :accept        search the \"did you mean\" recommendation
  :clear         clear the query
  :retry         run the current query again
  :lang <tag>    switch language (e.g. en, id)
  :help          show this help
  :quit          exit";

/// wikifind: search Wikipedia with client-side ranking and typo-tolerant suggestions.
#[derive(Parser)]
#[command(name = "wikifind", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Language to search (overrides the saved preference for this run).
    #[arg(short, long)]
    lang: Option<String>,

    /// Run a single search, print the result and exit.
    #[arg(short, long)]
    query: Option<String>,

    /// With --query, print the result view as JSON instead of text.
    #[arg(long, requires = "query")]
    json: bool,

    /// Log to stderr instead of the log file.
    #[arg(long)]
    log_stderr: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    let _log_guard = init_tracing(&config.logging, cli.log_stderr);

    let prefs_path = wikifind_dirs::preferences_file();
    let prefs = Preferences::load(&prefs_path);
    let language = match cli.lang.as_deref() {
        Some(tag) => Language::new(tag)?,
        None => prefs.language.clone(),
    };
    info!(%language, "wikifind starting");

    match cli.query {
        Some(query) => run_once(&config, &query, &language, cli.json).await,
        None => run_interactive(config, language, prefs, &prefs_path).await,
    }
}

/// Install the global subscriber. Logs go to a daily file unless disabled
/// or `force_stderr` is set. The returned guard flushes the file writer on drop.
fn init_tracing(logging: &LoggingConfig, force_stderr: bool) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    if logging.file && !force_stderr {
        let dir = wikifind_dirs::logs_dir();
        if std::fs::create_dir_all(&dir).is_ok() {
            let appender = tracing_appender::rolling::daily(dir, "wikifind.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_writer(writer)
                .with_ansi(false)
                .with_env_filter(filter)
                .init();
            return Some(guard);
        }
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
    None
}

async fn run_once(
    config: &AppConfig,
    query: &str,
    language: &Language,
    json: bool,
) -> anyhow::Result<()> {
    let view = wikifind_search::search(query, language, &config.search).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        let presenter = Presenter::new(config.search.clone());
        print!("{}", presenter.render(&view, language, None));
    }

    if matches!(view, ResultView::Failed { .. } | ResultView::TimedOut { .. }) {
        anyhow::bail!("search for {query:?} did not complete");
    }
    Ok(())
}

async fn run_interactive(
    config: AppConfig,
    language: Language,
    mut prefs: Preferences,
    prefs_path: &Path,
) -> anyhow::Result<()> {
    let (tx, mut views) = mpsc::unbounded_channel();
    let client = WikipediaClient::new(&config.search)?;
    let orchestrator = SearchOrchestrator::new(client, tx, config.search.clone())?;
    let presenter = Presenter::new(config.search);
    let mut session = Session::new(language);

    // Handle Ctrl+C
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, shutting down...");
            cancel_clone.cancel();
        }
    });

    let messages = Messages::for_language(session.language());
    println!("{} (wikifind v{})", messages.title(), env!("CARGO_PKG_VERSION"));
    println!("{}  [{}]  :help for commands\n", messages.prompt(), session.language());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match session.handle(parse_input(&line)) {
                    Action::Search(text) => {
                        // Runs after the quiet window; the view arrives on `views`.
                        let _ = orchestrator.on_query_changed(&text, session.language());
                    }
                    Action::Clear => {
                        let _ = orchestrator.on_query_changed("", session.language());
                    }
                    Action::Redraw => {
                        if let Some(view) = session.last_view() {
                            print!(
                                "{}",
                                presenter.render(view, session.language(), Some(session.cursor()))
                            );
                        }
                    }
                    Action::ChangeLanguage(language) => {
                        prefs.language = language.clone();
                        if let Err(e) = prefs.save(prefs_path) {
                            tracing::warn!(error = %e, "failed to save language preference");
                        }
                        println!("{}", Messages::for_language(&language).language_changed(&language));
                        if !session.query().is_empty() {
                            let _ = orchestrator.on_query_changed(session.query(), &language);
                        }
                    }
                    Action::Help => println!("{HELP}"),
                    Action::Quit => break,
                    Action::Notice(notice) => println!("{notice}"),
                }
            }
            Some(view) = views.recv() => {
                session.on_view(view);
                if let Some(view) = session.last_view() {
                    print!(
                        "{}",
                        presenter.render(view, session.language(), Some(session.cursor()))
                    );
                }
            }
        }
    }

    info!(
        state = %orchestrator.state(),
        cached = orchestrator.cache_len(),
        "wikifind shut down cleanly"
    );
    Ok(())
}
