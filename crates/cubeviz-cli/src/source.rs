//! Where cube data comes from

use anyhow::Context as _;
use cubeviz_store::{HttpStore, MemoryStore, RdfFormat, StoreClient};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// An RDF file loaded into memory, or a remote SPARQL endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// RDF file; the format follows from the extension
    File(PathBuf),
    /// SPARQL endpoint URL
    Endpoint(String),
}

impl Source {
    /// Connect a store client to this source
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed, its extension names no
    /// known RDF format, or the HTTP client cannot be built.
    pub async fn connect(&self) -> anyhow::Result<StoreClient> {
        match self {
            Self::File(path) => {
                let format = format_of(path)?;
                let data = tokio::fs::read(path)
                    .await
                    .with_context(|| format!("reading {}", path.display()))?;
                let store = MemoryStore::with_data(format, &data)
                    .with_context(|| format!("loading {}", path.display()))?;
                let triples = store.len().with_context(|| format!("reading {}", path.display()))?;
                tracing::info!(path = %path.display(), triples, "loaded RDF file");
                Ok(StoreClient::connected(Arc::new(store)))
            }
            Self::Endpoint(url) => {
                let store = HttpStore::new(url.as_str())
                    .with_context(|| format!("connecting to {url}"))?;
                tracing::info!(endpoint = %url, "using SPARQL endpoint");
                Ok(StoreClient::connected(Arc::new(store)))
            }
        }
    }
}

fn format_of(path: &Path) -> anyhow::Result<RdfFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(RdfFormat::from_extension)
        .with_context(|| format!("cannot tell the RDF format of {} from its extension", path.display()))
}
