//! Default port implementations: HTTP and file catalog sources, filesystem writes.

use crate::ports::{CatalogSource, WritePort};
use crate::settings::CatalogLocation;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::time::Duration;
use tracing::debug;
use ui5check_types::VERSION_OVERVIEW_URL;
use ui5check_types::overview::VersionOverview;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches the overview document over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("ui5check/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl CatalogSource for HttpCatalogSource {
    fn load_catalog(&self) -> anyhow::Result<VersionOverview> {
        debug!(url = %self.url, "fetching version overview");
        let resp = self
            .client
            .get(&self.url)
            .send()
            .with_context(|| format!("GET {}", self.url))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("GET {} returned {}", self.url, status);
        }

        resp.json::<VersionOverview>()
            .with_context(|| format!("parse version overview from {}", self.url))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the overview document from a local JSON file.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    pub path: Utf8PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }
}

impl CatalogSource for FileCatalogSource {
    fn load_catalog(&self) -> anyhow::Result<VersionOverview> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("read version overview {}", self.path))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("parse version overview {}", self.path))
    }

    fn describe(&self) -> String {
        self.path.to_string()
    }
}

/// In-memory catalog source for embedding and testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogSource {
    doc: VersionOverview,
}

impl InMemoryCatalogSource {
    pub fn new(doc: VersionOverview) -> Self {
        Self { doc }
    }
}

impl CatalogSource for InMemoryCatalogSource {
    fn load_catalog(&self) -> anyhow::Result<VersionOverview> {
        Ok(self.doc.clone())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

/// Build the source named by `location`.
pub fn catalog_source(location: &CatalogLocation) -> anyhow::Result<Box<dyn CatalogSource>> {
    Ok(match location {
        CatalogLocation::Url(url) if url.is_empty() => {
            Box::new(HttpCatalogSource::new(VERSION_OVERVIEW_URL)?)
        }
        CatalogLocation::Url(url) => Box::new(HttpCatalogSource::new(url.clone())?),
        CatalogLocation::File(path) => Box::new(FileCatalogSource::new(path.clone())),
    })
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        fs::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }
}
