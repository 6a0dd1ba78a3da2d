use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use log::{error, info};
use scraper::Html;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use schulnetz_plus::actions::{handle, ActionContext};
use schulnetz_plus::cli::{parse_request, Cli, Command, SourceArg};
use schulnetz_plus::utils::clipboard::SystemClipboard;
use schulnetz_plus::utils::export::{copy_grades_to_clipboard, download_grades_json};
use schulnetz_plus::utils::extract::{extract_grades, is_grades_page};
use schulnetz_plus::utils::page::{load_page, FileSource, HttpSource};
use schulnetz_plus::utils::report::render_summary;
use schulnetz_plus::utils::stats::summarize;

#[tokio::main]
async fn main() -> ExitCode {
    // Loads SCHULNETZ_URL / SCHULNETZ_COOKIE / GRADES_OUT_DIR from a `.env` file, if present.
    dotenv().ok();

    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    if TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto).is_err() {
        eprintln!("Logger already initialized");
    }

    let document = match fetch_document(&cli).await {
        Ok(document) => {
            info!("Grades page loaded");
            document
        }
        Err(e) => {
            error!("Error loading the grades page: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command, &document) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn fetch_document(cli: &Cli) -> Result<Html> {
    match cli.source()? {
        SourceArg::File(path) => load_page(&FileSource::new(path)).await,
        SourceArg::Url { url, cookie } => load_page(&HttpSource::new(&url, cookie.as_deref())?).await,
    }
}

// Executes one subcommand; `Ok(false)` means it ran but did not succeed.
fn run(command: Command, document: &Html) -> Result<bool> {
    match command {
        Command::Check => {
            let exists = is_grades_page(document);
            println!("{}", if exists { "grades page" } else { "not a grades page" });
            Ok(exists)
        }
        Command::Stats => {
            let Some(record) = extract_grades(document) else {
                error!("No data extracted, grades div not found");
                return Ok(false);
            };
            print!("{}", render_summary(&record, &summarize(&record.courses)));
            Ok(true)
        }
        Command::Download { out_dir } => {
            let record = extract_grades(document);
            match download_grades_json(record.as_ref(), &out_dir)? {
                Some(path) => {
                    println!("{}", path.display());
                    Ok(true)
                }
                None => Ok(false),
            }
        }
        Command::Copy => {
            let record = extract_grades(document);
            Ok(copy_grades_to_clipboard(record.as_ref(), &mut SystemClipboard))
        }
        Command::Handle { request, out_dir } => {
            let action = parse_request(&request)?;
            let mut clipboard = SystemClipboard;
            let mut ctx = ActionContext { out_dir, clipboard: &mut clipboard };
            let response = handle(action, document, &mut ctx);
            println!("{}", serde_json::to_string(&response)?);
            Ok(true)
        }
    }
}
