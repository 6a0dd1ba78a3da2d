use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use reqwest::cookie::Jar;
use reqwest::Client;
use scraper::Html;
use tokio::io::AsyncReadExt;
use url::Url;

// The one place that knows where the grades page comes from. Everything
// downstream only sees a parsed document.
pub trait PageSource {
    fn fetch_html(&self) -> impl Future<Output = Result<String>> + Send;
}

// A saved copy of the page, or stdin when the path is `-`.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PageSource for FileSource {
    async fn fetch_html(&self) -> Result<String> {
        if self.path.as_os_str() == "-" {
            let mut html = String::new();
            tokio::io::stdin()
                .read_to_string(&mut html)
                .await
                .context("Failed to read the grades page from stdin")?;
            return Ok(html);
        }

        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read the grades page from {}", self.path.display()))
    }
}

// Fetches the live page with the session cookie of a logged-in browser.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: Url,
}

impl HttpSource {
    pub fn new(url: &str, cookie: Option<&str>) -> Result<Self> {
        let url = Url::parse(url).with_context(|| format!("Invalid grades page URL: {}", url))?;
        match url.scheme() {
            "http" | "https" => {}
            scheme => return Err(anyhow!("Unsupported URL scheme: {}", scheme)),
        }

        let jar = Jar::default();
        if let Some(cookie) = cookie {
            for pair in cookie.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                jar.add_cookie_str(pair, &url);
            }
        }

        let client = Client::builder()
            .cookie_provider(Arc::new(jar))
            .build()
            .context("Failed to build the client")?;

        Ok(Self { client, url })
    }
}

impl PageSource for HttpSource {
    async fn fetch_html(&self) -> Result<String> {
        info!("Requesting grades page {}", self.url);
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .context("Failed to send grades request")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Grades request failed with status {}", status));
        }

        response.text().await.context("Failed to read response text")
    }
}

pub async fn load_page<S: PageSource>(source: &S) -> Result<Html> {
    let html = source.fetch_html().await?;
    debug!("Loaded {} bytes of HTML", html.len());
    Ok(Html::parse_document(&html))
}
