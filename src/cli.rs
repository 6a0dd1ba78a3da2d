use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};

use crate::actions::Action;

#[derive(Debug, Clone, Parser)]
#[command(name = "schulnetz-plus")]
#[command(about = "Reads the schulNetz grades page, computes plus points and exports the grades as JSON")]
pub struct Cli {
    /// Saved grades page, or `-` for stdin; takes precedence over --url
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// Address of the grades page
    #[arg(long, global = true, env = "SCHULNETZ_URL")]
    pub url: Option<String>,

    /// Session cookie of a logged-in browser, e.g. `PHPSESSID=...`
    #[arg(long, global = true, env = "SCHULNETZ_COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Tell whether the page is the grades page
    Check,
    /// Print plus points and subject averages
    Stats,
    /// Save the grades as grades_YYYY-MM-DD.json
    Download {
        #[arg(long, env = "GRADES_OUT_DIR", default_value = ".")]
        out_dir: PathBuf,
    },
    /// Copy the grades JSON to the clipboard
    Copy,
    /// Run one host request such as {"action":"checkPage"} and print the response
    Handle {
        request: String,
        #[arg(long, env = "GRADES_OUT_DIR", default_value = ".")]
        out_dir: PathBuf,
    },
}

// Where the page comes from, resolved from the flags.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceArg {
    File(PathBuf),
    Url { url: String, cookie: Option<String> },
}

impl Cli {
    pub fn source(&self) -> Result<SourceArg> {
        match (&self.file, &self.url) {
            (Some(path), _) => Ok(SourceArg::File(path.clone())),
            (None, Some(url)) => Ok(SourceArg::Url { url: url.clone(), cookie: self.cookie.clone() }),
            (None, None) => Err(anyhow!("No grades page given, use --file <PATH> or --url <URL> (or SCHULNETZ_URL)")),
        }
    }
}

pub fn parse_request(request: &str) -> Result<Action> {
    serde_json::from_str(request).map_err(|e| anyhow!("Invalid request {}: {}", request, e))
}
