//! Anasi CLI: narrative analysis client.
//!
//! Usage:
//!   anasi analyze [--text T | --file path] [--date D] [--language L] [--tab tab]
//!   anasi load <file.json> [--tab tab]
//!   anasi show [--entry id|n] [--tab tab] [--filter F] [--page N]
//!   anasi graph <kind> [--entry id|n] [--format text|json|dot]
//!   anasi history <list|show|clear>
//!   anasi morphology <word> [--language L]
//!   anasi pos [--text T | --entry id|n]

use anasi::history::HISTORY_CAP;
use anasi::view::{render_morphology, render_parts_of_speech, render_tab_bar};
use anasi::{
    render_tab, Config, GraphKind, HistoryEntry, HistoryStore, HttpClient, OpenStore, Session,
    SqliteHistoryStore, Submission, Tab,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "anasi", version, about = "Narrative analysis client")]
struct Cli {
    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Path to the history database
    #[arg(long, global = true)]
    history_db: Option<PathBuf>,
    /// Base URL of the analysis service
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit text for analysis (reads stdin when neither --text nor --file is given)
    Analyze {
        /// Text to analyze
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        /// Plain-text file to analyze
        #[arg(long)]
        file: Option<PathBuf>,
        /// Document date sent with the text
        #[arg(long)]
        date: Option<String>,
        /// Output language (defaults to the configured language)
        #[arg(long)]
        language: Option<String>,
        /// Tab to display
        #[arg(long, default_value = "summary")]
        tab: Tab,
    },
    /// Load a previously exported analysis (.json)
    Load {
        path: PathBuf,
        /// Tab to display
        #[arg(long, default_value = "summary")]
        tab: Tab,
    },
    /// Display a tab of a history entry
    Show {
        /// Entry id or 1-based position (default: most recent)
        #[arg(long)]
        entry: Option<String>,
        #[arg(long, default_value = "summary")]
        tab: Tab,
        /// Events tab filter
        #[arg(long)]
        filter: Option<String>,
        /// Events tab page
        #[arg(long)]
        page: Option<usize>,
    },
    /// Print a relationship graph of a history entry
    Graph {
        /// causation, entity-relations or event-relations
        kind: GraphKind,
        #[arg(long)]
        entry: Option<String>,
        #[arg(long, value_enum, default_value_t = GraphFormat::Text)]
        format: GraphFormat,
    },
    /// Manage the analysis history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Write a history entry's analysis as JSON
    Export {
        #[arg(long)]
        entry: Option<String>,
        /// Output file (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Morphological analysis of a word or selection
    Morphology {
        word: String,
        #[arg(long)]
        language: Option<String>,
    },
    /// Tag each token with its part of speech
    Pos {
        /// Text to tag (default: the entry's original text)
        #[arg(long, conflicts_with = "entry")]
        text: Option<String>,
        #[arg(long)]
        entry: Option<String>,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List stored analyses, newest first
    List,
    /// Show one entry's summary tab
    Show { entry: String },
    /// Delete all stored analyses
    Clear,
}

#[derive(Clone, Copy, ValueEnum)]
enum GraphFormat {
    Text,
    Json,
    Dot,
}

fn init_tracing(verbose: bool) {
    let directive = if verbose { "anasi=debug" } else { "anasi=info" };
    let filter = tracing_subscriber::EnvFilter::new(directive);
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<Config, String> {
    let mut config = Config::load_or_default(cli.config.as_deref()).map_err(|e| e.to_string())?;
    if let Some(db) = &cli.history_db {
        config.history_db = Some(db.clone());
    }
    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    Ok(config)
}

fn open_history(config: &Config) -> Result<Arc<SqliteHistoryStore>, String> {
    let path = config.history_db_path();
    let store = SqliteHistoryStore::open(&path)
        .map_err(|e| format!("Failed to open history database: {}", e))?
        .with_key(config.history_key.clone());
    Ok(Arc::new(store))
}

fn open_session(config: &Config, history: Arc<SqliteHistoryStore>) -> Result<Session, String> {
    let client = HttpClient::new(config.endpoints(), config.timeout())
        .map_err(|e| format!("Failed to create HTTP client: {}", e))?;
    Ok(Session::new(Arc::new(client))
        .with_history(history)
        .with_default_language(config.default_language.clone()))
}

/// Resolve an entry by id or 1-based position; the newest when `selector` is `None`.
fn find_entry(store: &dyn HistoryStore, selector: Option<&str>) -> Result<HistoryEntry, String> {
    let entries = store.load_all().map_err(|e| e.to_string())?;
    if entries.is_empty() {
        return Err("history is empty; run `anasi analyze` or `anasi load` first".to_string());
    }
    let Some(selector) = selector else {
        return Ok(entries[0].clone());
    };
    if let Ok(position) = selector.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|i| entries.get(i))
            .cloned()
            .ok_or_else(|| format!("no history entry at position {}", position));
    }
    entries
        .into_iter()
        .find(|e| e.id.to_string() == selector)
        .ok_or_else(|| format!("history entry '{}' not found", selector))
}

fn print_tab(session: &Session, tab: Tab) {
    session.select_tab(tab);
    let state = session.snapshot();
    let Some(result) = state.current.as_ref() else {
        return;
    };
    println!("{}\n", render_tab_bar(state.tabs.active()));
    print!("{}", render_tab(result, state.tabs.active(), &state.events_view));
}

fn read_input(text: Option<String>, file: Option<&Path>) -> Result<String, String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read '{}': {}", path.display(), e));
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| format!("cannot read stdin: {}", e))?;
    Ok(buf)
}

async fn cmd_analyze(
    session: &Session,
    input: String,
    date: Option<String>,
    language: Option<String>,
    tab: Tab,
) -> i32 {
    let mut submission = Submission::new(input, language.unwrap_or_default());
    if let Some(date) = date {
        submission = submission.with_doc_date(date);
    }
    match session.submit_text(submission).await {
        Ok(_) => {
            print_tab(session, tab);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

async fn cmd_load(session: &Session, path: &Path, tab: Tab) -> i32 {
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if !is_json {
        eprintln!("Error: please choose a JSON file to load ('{}')", path.display());
        return 1;
    }
    match session.load_file(path).await {
        Ok(_) => {
            print_tab(session, tab);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_show(
    session: &Session,
    store: &dyn HistoryStore,
    entry: Option<&str>,
    tab: Tab,
    filter: Option<String>,
    page: Option<usize>,
) -> i32 {
    let entry = match find_entry(store, entry) {
        Ok(entry) => entry,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    session.restore(&entry);
    if let Some(filter) = filter {
        session.set_events_filter(filter);
    }
    if let Some(page) = page {
        session.go_to_events_page(page);
    }
    print_tab(session, tab);
    0
}

fn cmd_graph(
    store: &dyn HistoryStore,
    entry: Option<&str>,
    kind: GraphKind,
    format: GraphFormat,
) -> i32 {
    let entry = match find_entry(store, entry) {
        Ok(entry) => entry,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let graph = kind.build(&entry.data);
    match format {
        GraphFormat::Text if graph.is_empty() => println!("{}", kind.empty_message()),
        GraphFormat::Text => print!("{}", graph.render_text()),
        GraphFormat::Dot => print!("{}", graph.to_dot(kind.id())),
        GraphFormat::Json => match serde_json::to_string_pretty(&graph) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        },
    }
    0
}

fn cmd_history_list(store: &dyn HistoryStore) -> i32 {
    let entries = match store.load_all() {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if entries.is_empty() {
        println!("No history yet.");
        return 0;
    }
    println!("{:>2}  {:<36}  {:<20}  {:<12}  {}", "#", "ID", "SAVED", "DOC DATE", "SUMMARY");
    println!("{}", "-".repeat(110));
    for (i, entry) in entries.iter().enumerate() {
        let summary = if entry.summary.is_empty() {
            entry.snippet.as_str()
        } else {
            entry.summary.as_str()
        };
        println!(
            "{:>2}  {:<36}  {:<20}  {:<12}  {}",
            i + 1,
            entry.id,
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.doc_date.as_deref().unwrap_or("-"),
            summary
        );
    }
    println!("\n{} of {} entries kept", entries.len(), HISTORY_CAP);
    0
}

fn cmd_history_clear(store: &dyn HistoryStore) -> i32 {
    match store.clear() {
        Ok(()) => {
            println!("History cleared");
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_export(store: &dyn HistoryStore, entry: Option<&str>, output: Option<&Path>) -> i32 {
    let entry = match find_entry(store, entry) {
        Ok(entry) => entry,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let json = match serde_json::to_string_pretty(&entry.data) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    match output {
        Some(path) => match std::fs::write(path, json) {
            Ok(()) => {
                println!("Exported analysis to {}", path.display());
                0
            }
            Err(e) => {
                eprintln!("Error: cannot write '{}': {}", path.display(), e);
                1
            }
        },
        None => {
            println!("{}", json);
            0
        }
    }
}

async fn cmd_morphology(session: &Session, word: &str, language: Option<&str>) -> i32 {
    match session.lookup_morphology(word, language).await {
        Ok(response) => {
            print!("{}", render_morphology(word, &response));
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

async fn cmd_pos(
    session: &Session,
    store: &dyn HistoryStore,
    text: Option<&str>,
    entry: Option<&str>,
) -> i32 {
    if text.is_none() {
        match find_entry(store, entry) {
            Ok(entry) => {
                session.restore(&entry);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    }
    match session.parts_of_speech(text).await {
        Ok(response) => {
            print!("{}", render_parts_of_speech(&response));
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let store = match open_history(&config) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let session = match open_session(&config, store.clone()) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Analyze {
            text,
            file,
            date,
            language,
            tab,
        } => match read_input(text, file.as_deref()) {
            Ok(input) => cmd_analyze(&session, input, date, language, tab).await,
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        Commands::Load { path, tab } => cmd_load(&session, &path, tab).await,
        Commands::Show {
            entry,
            tab,
            filter,
            page,
        } => cmd_show(&session, store.as_ref(), entry.as_deref(), tab, filter, page),
        Commands::Graph {
            kind,
            entry,
            format,
        } => cmd_graph(store.as_ref(), entry.as_deref(), kind, format),
        Commands::History { action } => match action {
            HistoryAction::List => cmd_history_list(store.as_ref()),
            HistoryAction::Show { entry } => {
                cmd_show(&session, store.as_ref(), Some(entry.as_str()), Tab::Summary, None, None)
            }
            HistoryAction::Clear => cmd_history_clear(store.as_ref()),
        },
        Commands::Export { entry, output } => {
            cmd_export(store.as_ref(), entry.as_deref(), output.as_deref())
        }
        Commands::Morphology { word, language } => {
            cmd_morphology(&session, &word, language.as_deref()).await
        }
        Commands::Pos { text, entry } => {
            cmd_pos(&session, store.as_ref(), text.as_deref(), entry.as_deref()).await
        }
    };
    std::process::exit(code);
}
