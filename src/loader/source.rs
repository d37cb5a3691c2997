//! Places the post index can be fetched from

use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use ureq::Agent;

use super::LoadError;

/// Largest index body accepted over HTTP
pub const MAX_INDEX_BYTES: u64 = 64 * 1024 * 1024;

/// Raw response for the index request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    /// HTTP-style status code
    pub status: u16,
    /// Response body, empty on failure statuses
    pub body: String,
}

impl Fetched {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single read-only fetch of the post index
pub trait IndexSource: Send + Sync {
    /// Perform the request
    ///
    /// Failure statuses are returned as `Fetched`, only transport problems
    /// are errors.
    fn fetch(&self) -> Result<Fetched, LoadError>;

    /// Human readable location, for logs
    fn describe(&self) -> String;
}

impl<T: IndexSource + ?Sized> IndexSource for Box<T> {
    fn fetch(&self) -> Result<Fetched, LoadError> {
        (**self).fetch()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Fetch the index over HTTP
pub struct HttpSource {
    agent: Agent,
    url: String,
}

impl HttpSource {
    pub fn new(url: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            url: url.to_string(),
        }
    }
}

impl IndexSource for HttpSource {
    fn fetch(&self) -> Result<Fetched, LoadError> {
        let response = self
            .agent
            .get(&self.url)
            .call()
            .map_err(|e| LoadError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if !(200..300).contains(&status) {
            return Ok(Fetched {
                status,
                body: String::new(),
            });
        }

        let body = body_reader
            .with_config()
            .limit(MAX_INDEX_BYTES)
            .read_to_string()
            .map_err(|e| LoadError::Transport(e.to_string()))?;

        Ok(Fetched { status, body })
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Read the index from a public directory on disk
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl IndexSource for FileSource {
    fn fetch(&self) -> Result<Fetched, LoadError> {
        match std::fs::read_to_string(&self.path) {
            Ok(body) => Ok(Fetched::ok(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Fetched {
                status: 404,
                body: String::new(),
            }),
            Err(e) => Err(LoadError::Io(e)),
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// A response held in memory
#[derive(Debug, Clone)]
pub struct StaticSource {
    response: Fetched,
}

impl StaticSource {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            response: Fetched {
                status,
                body: body.into(),
            },
        }
    }
}

impl IndexSource for StaticSource {
    fn fetch(&self) -> Result<Fetched, LoadError> {
        Ok(self.response.clone())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}
