//! gazette-watch CLI
//!
//! Runs a keyword search over today's official bulletins.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use gazette_watch::{
    error::{AppError, Result},
    models::{Config, KeywordSet, SearchContext, SearchDates},
    pipeline::{self, SearchSession},
    utils::{HttpFetcher, Pdftotext},
};

/// gazette-watch - Official Bulletin Announcement Scanner
#[derive(Parser, Debug)]
#[command(
    name = "gazette-watch",
    version,
    about = "Scans BOE, BOC and the Canarian BOPs for relevant announcements"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search today's bulletins
    Search {
        /// Search as if today were this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Additional include keyword (repeatable)
        #[arg(short, long = "keyword")]
        keywords: Vec<String>,

        /// Additional exclude keyword (repeatable)
        #[arg(short, long = "exclude")]
        excludes: Vec<String>,

        /// Ignore the configured keyword lists
        #[arg(long)]
        no_defaults: bool,

        /// Write the HTML digest to this file
        #[arg(long)]
        html: Option<PathBuf>,

        /// Write the matched announcements as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,

        /// Mail the HTML digest to the configured recipients
        #[arg(long)]
        send: bool,
    },

    /// Show the configured keyword lists
    Keywords,

    /// Convert between BOC bulletin numbers and dates
    Calendar {
        /// Date to convert to a bulletin number
        #[arg(long, conflicts_with = "number")]
        date: Option<NaiveDate>,

        /// Bulletin number to convert to its publication date
        #[arg(long)]
        number: Option<u32>,
    },

    /// Validate configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Merge command-line keywords into a configured set.
fn extend_keywords(set: &mut KeywordSet, extra: Vec<String>) -> Result<()> {
    for keyword in extra {
        if !set.insert(keyword.clone())? {
            log::warn!("Keyword '{}' is already in the list", keyword);
        }
    }
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Search {
            date,
            keywords,
            excludes,
            no_defaults,
            html,
            json,
            send,
        } => {
            let dates = date.map_or_else(SearchDates::now, SearchDates::fixed);
            let mut ctx = SearchContext::from_config(&config, dates);
            if no_defaults {
                ctx.include = KeywordSet::new();
                ctx.exclude = KeywordSet::new();
            }
            extend_keywords(&mut ctx.include, keywords)?;
            extend_keywords(&mut ctx.exclude, excludes)?;
            if ctx.include.is_empty() {
                return Err(AppError::validation("No include keywords to search for"));
            }

            log::info!(
                "Searching bulletins for {} ({} keywords, {} exclusions)...",
                ctx.dates.canary,
                ctx.include.len(),
                ctx.exclude.len()
            );

            let fetcher = Arc::new(HttpFetcher::new(&config.http)?);
            let pdf = Arc::new(Pdftotext::new(&config.pdf.pdftotext));
            let mut session = SearchSession::from_config(&config, fetcher, pdf);
            let documents = session.search(&ctx).await?;

            let shown = ctx.dates.peninsula.format("%d/%m/%Y");
            if documents.is_empty() {
                println!("No se encontraron publicaciones relevantes para el {shown}");
                return Ok(());
            }

            log::info!("Found {} match(es) for {}.", documents.len(), shown);
            println!("{}", pipeline::render_table(documents));

            if let Some(path) = html {
                std::fs::write(&path, pipeline::render_digest(documents)?)?;
                log::info!("Digest saved to {}", path.display());
            }

            if let Some(path) = json {
                std::fs::write(&path, serde_json::to_string_pretty(documents)?)?;
                log::info!("Results saved to {}", path.display());
            }

            if send {
                send_digest(&config, documents, ctx.dates.canary).await?;
            }
        }

        Command::Keywords => {
            println!("Include keywords:");
            for keyword in config.keywords.include.iter() {
                println!("  {keyword}");
            }
            println!("Exclude keywords:");
            for keyword in config.keywords.exclude.iter() {
                println!("  {keyword}");
            }
        }

        Command::Calendar { date, number } => {
            let calendar = config.sources.boc.calendar();
            match (date, number) {
                (Some(date), _) => {
                    println!("BOC {} -> nº {}", date, calendar.number_for_date(date)?);
                }
                (None, Some(number)) => {
                    println!("BOC nº {} -> {}", number, calendar.date_for_number(number)?);
                }
                (None, None) => {
                    let today = SearchDates::now().canary;
                    println!("BOC {} -> nº {}", today, calendar.number_for_date(today)?);
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            match config.mail.validate() {
                Ok(()) => log::info!("✓ Mail settings OK"),
                Err(e) => log::warn!("Mail settings incomplete: {}", e),
            }
        }
    }

    Ok(())
}

#[cfg(feature = "mail")]
async fn send_digest(
    config: &Config,
    documents: &[gazette_watch::models::AnnouncementDocument],
    date: NaiveDate,
) -> Result<()> {
    let mailer = gazette_watch::services::SmtpMailer::from_config(&config.mail)?;
    match pipeline::send_digest(&mailer, &config.mail, documents, date).await {
        Ok(()) => {
            log::info!("✅ Correo enviado con éxito.");
            Ok(())
        }
        Err(e) => {
            log::error!("❌ Error al enviar el correo: {}", e);
            Err(e)
        }
    }
}

#[cfg(not(feature = "mail"))]
async fn send_digest(
    _config: &Config,
    _documents: &[gazette_watch::models::AnnouncementDocument],
    _date: NaiveDate,
) -> Result<()> {
    Err(AppError::config(
        "mail delivery is not available; rebuild with --features mail",
    ))
}
