use crate::error::FetchError;
use reqwest::blocking::Client;
use reqwest::Url;
use serde_json::Value;
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const LIST_ENDPOINT: &str = "video";

/// Where the raw video list comes from. The view-model only sees this trait,
/// so tests can hand it a canned batch. Records are checked field by field
/// later, so a source only guarantees a JSON array.
pub trait VideoSource {
    fn fetch(&self) -> Result<Vec<Value>, FetchError>;
}

/// Reads `GET <base>/video` from a running backend.
pub struct HttpSource {
    list_url: Url,
    client: Client,
}

impl HttpSource {
    pub fn new(base: &Url) -> Result<HttpSource, FetchError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        HttpSource::with_client(base, client)
    }

    /// `base` is treated as a directory even without a trailing '/'.
    pub fn with_client(base: &Url, client: Client) -> Result<HttpSource, FetchError> {
        if base.cannot_be_a_base() {
            return Err(FetchError::Base(base.to_string()));
        }
        let mut dir = base.clone();
        if !dir.path().ends_with('/') {
            let path = format!("{}/", dir.path());
            dir.set_path(&path);
        }
        let list_url = dir
            .join(LIST_ENDPOINT)
            .map_err(|e| FetchError::Base(format!("{}: {}", base, e)))?;
        Ok(HttpSource { list_url, client })
    }

    pub fn list_url(&self) -> &Url {
        &self.list_url
    }
}

impl VideoSource for HttpSource {
    fn fetch(&self) -> Result<Vec<Value>, FetchError> {
        debug!("GET {}", self.list_url);
        let res = self.client.get(self.list_url.clone()).send()?;

        if !res.status().is_success() {
            return Err(FetchError::Status(res.status()));
        }

        let videos = res.json::<Vec<Value>>()?;
        debug!("received {} records", videos.len());
        Ok(videos)
    }
}

/// Reads a saved copy of the `/video` response from disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> FileSource {
        FileSource {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl VideoSource for FileSource {
    fn fetch(&self) -> Result<Vec<Value>, FetchError> {
        debug!("reading video list from {}", self.path.display());
        let file = fs::File::open(&self.path).map_err(|source| FetchError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}
