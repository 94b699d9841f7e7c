//! Resource retrieval: fetching bytes for a URL and resolving relative references
//! against a base URI.

use log::debug;
use reqwest::Url;
use std::any::Any;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use crate::errors::{ResourceError, Result};

/// Fetches the content of external resources by URL.
///
/// Failures (network, I/O, limits) belong to the implementation and are
/// reported through [`ResourceError`].
pub trait ResourceRetriever: fmt::Debug + Send + Sync {
    /// Opens a readable stream for the resource at `url`.
    ///
    /// Errors raised while reading the stream are plain `io::Error`s; use
    /// [`stream_limit_error`] to recognise a size limit hit mid-stream.
    fn get_input_stream_by_url(&self, url: &Url) -> Result<Box<dyn Read + Send>>;

    /// Reads the whole resource at `url` into memory.
    fn get_byte_array_by_url(&self, url: &Url) -> Result<Vec<u8>> {
        let mut stream = self.get_input_stream_by_url(url)?;
        let mut bytes = Vec::new();
        stream.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    /// Concrete type access, used to adjust a default retriever in place.
    fn as_any(&self) -> &dyn Any;
}

/// Retriever used when the caller does not supply one.
///
/// Handles `file:` URLs from the local filesystem and `http:`/`https:` URLs
/// through a blocking `reqwest` request.
#[derive(Debug, Clone, Default)]
pub struct DefaultResourceRetriever {
    resource_size_limit: Option<u64>,
}

impl DefaultResourceRetriever {
    pub fn new() -> Self {
        Default::default()
    }

    /// Maximum number of bytes a single resource may have. `None` means unlimited.
    pub fn resource_size_limit(&self) -> Option<u64> {
        self.resource_size_limit
    }

    pub fn set_resource_size_limit(&mut self, limit: Option<u64>) -> &mut Self {
        self.resource_size_limit = limit;
        self
    }

    fn check_declared_size(&self, url: &Url, declared: Option<u64>) -> Result<()> {
        match (self.resource_size_limit, declared) {
            (Some(limit), Some(len)) if len > limit => Err(ResourceError::SizeLimitExceeded {
                url: url.to_string(),
                limit,
            }),
            _ => Ok(()),
        }
    }

    fn limit_stream(&self, url: &Url, inner: Box<dyn Read + Send>) -> Box<dyn Read + Send> {
        match self.resource_size_limit {
            Some(limit) => Box::new(LimitedReader {
                inner,
                remaining: limit,
                limit,
                url: url.to_string(),
            }),
            None => inner,
        }
    }
}

impl ResourceRetriever for DefaultResourceRetriever {
    fn get_input_stream_by_url(&self, url: &Url) -> Result<Box<dyn Read + Send>> {
        debug!("Retrieving resource {}", url);
        match url.scheme() {
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| ResourceError::InvalidUrl(url.to_string()))?;
                let file = File::open(&path)?;
                self.check_declared_size(url, Some(file.metadata()?.len()))?;
                Ok(self.limit_stream(url, Box::new(file)))
            }
            "http" | "https" => {
                let response = reqwest::blocking::get(url.clone())?.error_for_status()?;
                self.check_declared_size(url, response.content_length())?;
                Ok(self.limit_stream(url, Box::new(response)))
            }
            other => Err(ResourceError::UnsupportedScheme(other.to_string())),
        }
    }

    fn get_byte_array_by_url(&self, url: &Url) -> Result<Vec<u8>> {
        let mut stream = self.get_input_stream_by_url(url)?;
        let mut bytes = Vec::new();
        stream.read_to_end(&mut bytes).map_err(|e| {
            match stream_limit_error(&e) {
                Some(hit) => ResourceError::SizeLimitExceeded {
                    url: hit.url.clone(),
                    limit: hit.limit,
                },
                None => ResourceError::Io(e),
            }
        })?;
        Ok(bytes)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Carried inside the `io::Error` a size-limited stream returns once it has
/// produced more than `limit` bytes.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{url} exceeds {limit} bytes")]
pub struct StreamLimitError {
    pub url: String,
    pub limit: u64,
}

/// Returns the size limit hit wrapped in `err`, if that is what `err` is.
pub fn stream_limit_error(err: &io::Error) -> Option<&StreamLimitError> {
    err.get_ref()
        .and_then(|inner| inner.downcast_ref::<StreamLimitError>())
}

/// Fails the read once more than `limit` bytes have been produced.
struct LimitedReader {
    inner: Box<dyn Read + Send>,
    remaining: u64,
    limit: u64,
    url: String,
}

impl Read for LimitedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        // One spare byte lets us tell "exactly at the limit" from "over it".
        let allowed = self.remaining.saturating_add(1);
        let max = buf.len().min(usize::try_from(allowed).unwrap_or(usize::MAX));
        let read = self.inner.read(&mut buf[..max])?;
        if read as u64 > self.remaining {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                StreamLimitError {
                    url: self.url.clone(),
                    limit: self.limit,
                },
            ));
        }
        self.remaining -= read as u64;
        Ok(read)
    }
}

/// Resolves references against a base URI.
#[derive(Debug, Clone)]
pub struct UriResolver {
    base: Url,
}

impl UriResolver {
    /// Builds a resolver for `base_uri`.
    ///
    /// An empty base resolves against the current working directory. A base that is
    /// not an absolute URL is treated as a filesystem path; existing directories get
    /// a trailing slash so that relative references land inside them.
    pub fn new(base_uri: &str) -> Result<Self> {
        Ok(UriResolver {
            base: Self::base_url_for(base_uri.trim())?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolves `reference` against the base URL. Absolute URLs are returned as-is.
    pub fn resolve_against_base(&self, reference: &str) -> Result<Url> {
        let reference = reference.trim();
        if let Some(url) = parse_absolute(reference) {
            return Ok(url);
        }
        self.base
            .join(reference)
            .map_err(|e| ResourceError::InvalidUrl(format!("{}: {}", reference, e)))
    }

    fn base_url_for(base_uri: &str) -> Result<Url> {
        if let Some(url) = parse_absolute(base_uri) {
            return Ok(url);
        }
        let cwd = std::env::current_dir()?;
        let path = if base_uri.is_empty() {
            cwd
        } else if Path::new(base_uri).is_absolute() {
            Path::new(base_uri).to_path_buf()
        } else {
            cwd.join(base_uri)
        };
        let url = if path.is_dir() || base_uri.is_empty() || base_uri.ends_with('/') {
            Url::from_directory_path(&path)
        } else {
            Url::from_file_path(&path)
        };
        url.map_err(|_| ResourceError::InvalidUrl(path.display().to_string()))
    }
}

/// Parses `value` as an absolute URL, rejecting single-letter schemes which are
/// Windows drive letters rather than URL schemes.
fn parse_absolute(value: &str) -> Option<Url> {
    Url::parse(value).ok().filter(|url| url.scheme().len() > 1)
}

/// Pairs a [`UriResolver`] with a [`ResourceRetriever`] so callers can fetch
/// resources by (possibly relative) reference.
#[derive(Debug, Clone)]
pub struct ResourceResolver {
    uri_resolver: UriResolver,
    retriever: Arc<dyn ResourceRetriever>,
}

impl ResourceResolver {
    pub fn new(base_uri: &str, retriever: Arc<dyn ResourceRetriever>) -> Result<Self> {
        Ok(ResourceResolver {
            uri_resolver: UriResolver::new(base_uri)?,
            retriever,
        })
    }

    pub fn resolve_against_base_uri(&self, reference: &str) -> Result<Url> {
        self.uri_resolver.resolve_against_base(reference)
    }

    pub fn retrieve_bytes(&self, reference: &str) -> Result<Vec<u8>> {
        let url = self.resolve_against_base_uri(reference)?;
        self.retriever.get_byte_array_by_url(&url)
    }

    pub fn retrieve_stream(&self, reference: &str) -> Result<Box<dyn Read + Send>> {
        let url = self.resolve_against_base_uri(reference)?;
        self.retriever.get_input_stream_by_url(&url)
    }

    pub fn retriever(&self) -> &Arc<dyn ResourceRetriever> {
        &self.retriever
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    /// Per-test directory under the system temp dir, removed on drop.
    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "svg-convert-props-{}-{}",
                name,
                std::process::id()
            ));
            fs::create_dir_all(&dir).expect("create scratch dir");
            ScratchDir(dir)
        }

        fn path(&self) -> &Path {
            &self.0
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_scratch_dir_is_removed_on_drop() {
        let dir = ScratchDir::new("cleanup");
        fs::write(dir.path().join("a.svg"), "<svg/>").unwrap();
        let path = dir.path().to_path_buf();
        drop(dir);
        assert!(!path.exists());
    }

    #[test]
    fn test_reads_file_url() {
        let dir = ScratchDir::new("read");
        let path = dir.path().join("circle.svg");
        fs::write(&path, "<svg/>").unwrap();

        let url = Url::from_file_path(&path).unwrap();
        let bytes = DefaultResourceRetriever::new()
            .get_byte_array_by_url(&url)
            .unwrap();
        assert_eq!(bytes, b"<svg/>");
    }

    #[test]
    fn test_size_limit_is_enforced() {
        let dir = ScratchDir::new("limit");
        let path = dir.path().join("big.bin");
        fs::write(&path, vec![0u8; 64]).unwrap();
        let url = Url::from_file_path(&path).unwrap();

        let mut retriever = DefaultResourceRetriever::new();
        retriever.set_resource_size_limit(Some(16));
        match retriever.get_byte_array_by_url(&url) {
            Err(ResourceError::SizeLimitExceeded { limit, .. }) => assert_eq!(limit, 16),
            other => panic!("expected size limit error, got {:?}", other.map(|b| b.len())),
        }

        retriever.set_resource_size_limit(Some(64));
        assert_eq!(retriever.get_byte_array_by_url(&url).unwrap().len(), 64);
    }

    #[test]
    fn test_limited_reader_rejects_overflowing_stream() {
        let mut reader = LimitedReader {
            inner: Box::new(io::Cursor::new(vec![1u8; 10])),
            remaining: 4,
            limit: 4,
            url: "mem:test".to_string(),
        };
        let mut out = Vec::new();
        let err = reader.read_to_end(&mut out).unwrap_err();
        assert_eq!(
            stream_limit_error(&err),
            Some(&StreamLimitError {
                url: "mem:test".to_string(),
                limit: 4,
            })
        );
        assert!(stream_limit_error(&io::Error::new(io::ErrorKind::Other, "boom")).is_none());
    }

    #[test]
    fn test_retrieve_stream_honours_limit() {
        let dir = ScratchDir::new("stream");
        fs::write(dir.path().join("small.svg"), "<svg/>").unwrap();
        fs::write(dir.path().join("big.bin"), vec![0u8; 64]).unwrap();

        let mut retriever = DefaultResourceRetriever::new();
        retriever.set_resource_size_limit(Some(16));
        let resolver =
            ResourceResolver::new(&dir.path().to_string_lossy(), Arc::new(retriever)).unwrap();

        let mut content = String::new();
        resolver
            .retrieve_stream("small.svg")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "<svg/>");

        match resolver.retrieve_stream("big.bin") {
            Err(ResourceError::SizeLimitExceeded { limit, .. }) => assert_eq!(limit, 16),
            Err(e) => panic!("expected size limit error, got {}", e),
            Ok(_) => panic!("expected size limit error, got a stream"),
        }
    }

    #[test]
    fn test_unsupported_scheme() {
        let url = Url::parse("ftp://example.com/a.png").unwrap();
        let result = DefaultResourceRetriever::new().get_input_stream_by_url(&url);
        assert!(matches!(result, Err(ResourceError::UnsupportedScheme(s)) if s == "ftp"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = ScratchDir::new("missing");
        let url = Url::from_file_path(dir.path().join("nope.svg")).unwrap();
        let result = DefaultResourceRetriever::new().get_byte_array_by_url(&url);
        assert!(matches!(result, Err(ResourceError::Io(_))));
    }

    #[test]
    fn test_resolves_relative_against_http_base() {
        let resolver = UriResolver::new("https://example.com/assets/logo.svg").unwrap();
        let url = resolver.resolve_against_base("img/bg.png").unwrap();
        assert_eq!(url.as_str(), "https://example.com/assets/img/bg.png");

        let absolute = resolver
            .resolve_against_base("http://other.org/x.png")
            .unwrap();
        assert_eq!(absolute.as_str(), "http://other.org/x.png");
    }

    #[test]
    fn test_empty_base_resolves_against_working_directory() {
        let resolver = UriResolver::new("").unwrap();
        let expected = Url::from_directory_path(std::env::current_dir().unwrap()).unwrap();
        assert_eq!(resolver.base_url(), &expected);
        assert_eq!(resolver.base_url().scheme(), "file");
    }

    #[test]
    fn test_directory_base_keeps_references_inside() {
        let dir = ScratchDir::new("base");
        fs::write(dir.path().join("pattern.svg"), "<svg/>").unwrap();

        let resolver =
            ResourceResolver::new(&dir.path().to_string_lossy(), Arc::new(DefaultResourceRetriever::new()))
                .unwrap();
        let url = resolver.resolve_against_base_uri("pattern.svg").unwrap();
        assert_eq!(url.to_file_path().unwrap(), dir.path().join("pattern.svg"));
        assert_eq!(resolver.retrieve_bytes("pattern.svg").unwrap(), b"<svg/>");
    }
}
