//! Image ingestion from paths, URLs, and in-memory buffers.
//!
//! URL sources pass a security gate before any network traffic: only `http`/`https` schemes, and
//! never loopback, unspecified, or link-local hosts. Fetching goes through the [`ImageFetcher`]
//! seam so transports can be swapped (and faked in tests).

use std::io::Read;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use url::{Host, Url};

use crate::assets::decode::{ImageMetadata, LoadedImage, decode_image, format_name};
use crate::foundation::config::EngineOpts;
use crate::foundation::error::{PosterError, PosterResult};

/// Where an image comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// Local file.
    Path(PathBuf),
    /// Remote `http(s)` resource.
    Url(String),
    /// Encoded bytes already in memory.
    Bytes(Vec<u8>),
}

impl ImageSource {
    /// Classify a textual reference: anything with a `scheme://` prefix is a URL, the rest a path.
    pub fn from_reference(reference: &str) -> Self {
        if reference.contains("://") {
            Self::Url(reference.to_owned())
        } else {
            Self::Path(PathBuf::from(reference))
        }
    }
}

/// Response head plus a streaming body, as returned by an [`ImageFetcher`].
pub struct FetchResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// Declared `Content-Length`, if any.
    pub content_length: Option<u64>,
    /// Unread body.
    pub body: Box<dyn Read + Send>,
}

impl std::fmt::Debug for FetchResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchResponse")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Transport used for URL image sources.
///
/// Implementations must honor `timeout` as a hard limit and report expiry as an
/// `ImageProcessing` error mentioning "timed out"; body reads past the deadline must fail with
/// [`std::io::ErrorKind::TimedOut`].
pub trait ImageFetcher: Send + Sync {
    /// Issue a GET for an already security-checked URL.
    fn fetch(&self, url: &Url, timeout: Duration) -> PosterResult<FetchResponse>;
}

/// `reqwest`-backed fetcher. Redirects are not followed, so a redirect cannot bypass the host
/// checks; a 3xx surfaces as a non-2xx failure.
#[derive(Default)]
pub struct HttpFetcher {
    client: OnceLock<Result<reqwest::blocking::Client, String>>,
}

impl HttpFetcher {
    /// Fetcher with a lazily built client.
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self) -> PosterResult<&reqwest::blocking::Client> {
        self.client
            .get_or_init(|| {
                reqwest::blocking::Client::builder()
                    .user_agent(concat!("podium/", env!("CARGO_PKG_VERSION")))
                    .redirect(reqwest::redirect::Policy::none())
                    .build()
                    .map_err(|e| e.to_string())
            })
            .as_ref()
            .map_err(|e| PosterError::image_processing(format!("http client: {e}")))
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, url: &Url, timeout: Duration) -> PosterResult<FetchResponse> {
        let resp = self
            .client()?
            .get(url.as_str())
            .timeout(timeout)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    PosterError::image_processing(format!(
                        "fetch '{url}' timed out after {}s",
                        timeout.as_secs()
                    ))
                } else {
                    PosterError::image_processing(format!("fetch '{url}': {e}"))
                }
            })?;

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        Ok(FetchResponse {
            status: resp.status().as_u16(),
            content_type,
            content_length: resp.content_length(),
            body: Box::new(TimeoutAwareBody(resp)),
        })
    }
}

struct TimeoutAwareBody(reqwest::blocking::Response);

impl Read for TimeoutAwareBody {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.0.read(buf).map_err(|e| {
            let timed_out = e
                .get_ref()
                .and_then(|inner| inner.downcast_ref::<reqwest::Error>())
                .is_some_and(reqwest::Error::is_timeout);
            if timed_out {
                std::io::Error::new(std::io::ErrorKind::TimedOut, e)
            } else {
                e
            }
        })
    }
}

/// Resolves [`ImageSource`]s into decoded images under a byte ceiling.
#[derive(Clone)]
pub struct ImageLoader {
    fetcher: Arc<dyn ImageFetcher>,
    timeout: Duration,
    max_bytes: u64,
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("timeout", &self.timeout)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

impl ImageLoader {
    /// Loader using [`HttpFetcher`] and the limits from `opts`.
    pub fn new(opts: &EngineOpts) -> Self {
        Self {
            fetcher: Arc::new(HttpFetcher::new()),
            timeout: opts.fetch_timeout,
            max_bytes: opts.max_image_bytes,
        }
    }

    /// Replace the URL transport.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn ImageFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Byte ceiling applied to every source.
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Load and decode an image.
    pub fn load_image(&self, source: &ImageSource) -> PosterResult<LoadedImage> {
        match source {
            ImageSource::Bytes(bytes) => {
                self.check_len(bytes.len() as u64, "image buffer")?;
                decode_image(bytes)
            }
            ImageSource::Path(path) => {
                let bytes = std::fs::read(path).map_err(|e| {
                    PosterError::invalid_input(format!("read image '{}': {e}", path.display()))
                })?;
                self.check_len(bytes.len() as u64, "image file")?;
                decode_image(&bytes)
            }
            ImageSource::Url(raw) => self.load_url(raw),
        }
    }

    /// Load `source` and report its dimensions and format.
    pub fn get_image_metadata(&self, source: &ImageSource) -> PosterResult<ImageMetadata> {
        let loaded = self.load_image(source)?;
        let format = loaded
            .format
            .ok_or_else(|| PosterError::invalid_input("image format could not be determined"))?;
        Ok(ImageMetadata {
            width: loaded.width(),
            height: loaded.height(),
            format: format_name(format),
        })
    }

    fn load_url(&self, raw: &str) -> PosterResult<LoadedImage> {
        let url = check_url_safety(raw)?;
        tracing::debug!(url = %url, timeout_s = self.timeout.as_secs(), "fetching image");

        let resp = self.fetcher.fetch(&url, self.timeout)?;
        if !(200..300).contains(&resp.status) {
            return Err(PosterError::image_processing(format!(
                "fetch '{url}': HTTP {}",
                resp.status
            )));
        }

        let is_image = resp
            .content_type
            .as_deref()
            .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
            .unwrap_or(false);
        if !is_image {
            return Err(PosterError::invalid_input(format!(
                "'{url}' is not an image (content type {})",
                resp.content_type.as_deref().unwrap_or("missing")
            )));
        }

        if let Some(declared) = resp.content_length {
            self.check_len(declared, "declared content length")?;
        }

        let mut bytes = Vec::new();
        resp.body
            .take(self.max_bytes.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::TimedOut {
                    PosterError::image_processing(format!(
                        "fetch '{url}' timed out after {}s",
                        self.timeout.as_secs()
                    ))
                } else {
                    PosterError::image_processing(format!("read body of '{url}': {e}"))
                }
            })?;
        self.check_len(bytes.len() as u64, "downloaded image")?;

        decode_image(&bytes)
    }

    pub(crate) fn check_len(&self, len: u64, what: &str) -> PosterResult<()> {
        if len > self.max_bytes {
            return Err(PosterError::invalid_input(format!(
                "{what} of {len} bytes exceeds byte limit of {}",
                self.max_bytes
            )));
        }
        Ok(())
    }
}

/// Parse `raw` and reject URLs that must never be fetched.
pub fn check_url_safety(raw: &str) -> PosterResult<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| PosterError::invalid_input(format!("invalid image URL '{raw}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(PosterError::invalid_input(format!(
            "unsupported URL scheme '{}' (only http and https are allowed)",
            url.scheme()
        )));
    }

    let blocked = match url.host() {
        None => {
            return Err(PosterError::invalid_input(format!("URL '{raw}' has no host")));
        }
        Some(Host::Domain(d)) => {
            let d = d.trim_end_matches('.').to_ascii_lowercase();
            d == "localhost" || d.ends_with(".localhost")
        }
        Some(Host::Ipv4(ip)) => is_blocked_ip(IpAddr::V4(ip)),
        Some(Host::Ipv6(ip)) => is_blocked_ip(IpAddr::V6(ip)),
    };
    if blocked {
        return Err(PosterError::invalid_input(format!(
            "URL host of '{raw}' is not allowed"
        )));
    }
    Ok(url)
}

fn is_blocked_ip(ip: IpAddr) -> bool {
    fn v4(ip: Ipv4Addr) -> bool {
        ip.is_loopback() || ip.is_unspecified() || ip.is_link_local()
    }
    fn v6(ip: Ipv6Addr) -> bool {
        if ip.is_loopback() || ip.is_unspecified() {
            return true;
        }
        // fe80::/10
        if (ip.segments()[0] & 0xffc0) == 0xfe80 {
            return true;
        }
        ip.to_ipv4_mapped().is_some_and(v4)
    }
    match ip {
        IpAddr::V4(ip) => v4(ip),
        IpAddr::V6(ip) => v6(ip),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
