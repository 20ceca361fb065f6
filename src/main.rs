//! arbres binary entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{error, info};

mod catalog;
mod config;
mod tui;

use catalog::{CatalogClient, PhotoSection, TreeCard};
use config::Config;
use tui::App;

#[derive(Parser)]
#[command(name = "arbres")]
#[command(about = "Browse the Paris remarkable-trees open-data catalog from your terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    /// Run in CLI mode (print one page of results and exit, no TUI)
    #[arg(long, global = true)]
    pub cli: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the catalog
    Search {
        /// Free-text query; omit to list the catalog from the start
        query: Option<String>,
        /// Records per page
        #[arg(long)]
        rows: Option<usize>,
        /// Offset of the first record
        #[arg(long, default_value_t = 0)]
        start: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "arbres=info");
    }

    let cli = Cli::parse();

    // Load configuration; a bad configuration is fatal here and nowhere else
    let config = Config::from_env()?;
    config.validate()?;

    // CLI mode: plain output on stdout, logs on stderr
    if cli.cli {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();

        match cli.command {
            Some(command) => return handle_cli_command(command, &config).await,
            None => {
                eprintln!("Error: CLI mode requires a command, e.g. `arbres --cli search chêne`");
                std::process::exit(1);
            }
        }
    }

    // TUI mode: log to a file so the display stays clean
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting arbres TUI");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config)?;
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match result {
        Ok(()) => {
            info!("arbres exited cleanly");
            Ok(())
        }
        Err(e) => {
            error!("arbres exited with an error: {}", e);
            Err(e)
        }
    }
}

/// One-shot search without the TUI: fetch a single page and print it.
async fn handle_cli_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Search { query, rows, start } => {
            let mut config = config.clone();
            if let Some(rows) = rows {
                config.rows_per_page = rows;
            }
            config.validate()?;

            let client = CatalogClient::new(&config)?;
            let query = query.unwrap_or_default();
            let page = client.fetch_page(&query, start).await?;

            let displayed =
                std::cmp::min(start + config.rows_per_page, page.nhits);
            println!("Affichage de {} sur {} résultats", displayed, page.nhits);

            for record in &page.records {
                let card = TreeCard::from_record(record);
                println!("\n{}", card.title);
                match &card.photo {
                    PhotoSection::Link(url) => println!("  📷 Voir la photo: {}", url),
                    PhotoSection::Unavailable => println!("  🌳 Photo non disponible"),
                }
                for detail in &card.details {
                    println!("  {} {}: {}", detail.icon, detail.label, detail.value);
                }
            }

            Ok(())
        }
    }
}
