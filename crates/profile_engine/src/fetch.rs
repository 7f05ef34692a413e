use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::decode::decode_text;
use crate::manifest::parse_manifest;
use crate::{FailureKind, FetchError, FetchedFile, Manifest};

/// Query parameter appended to defeat intermediate caches.
pub const CACHE_BUST_PARAM: &str = "t";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub manifest_url: String,
    /// Per-file documents live at `content_base_url` joined with the file name.
    pub content_base_url: String,
    pub connect_timeout: Duration,
    /// Upper bound for any single request, manifest or file.
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            manifest_url: "http://localhost:8080/files.json".to_string(),
            content_base_url: "http://localhost:8080/profile/".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            max_bytes: 1024 * 1024,
        }
    }
}

/// Where manifests and file bodies come from.
#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_manifest(&self, bypass_cache: bool) -> Result<Manifest, FetchError>;

    async fn fetch_file(&self, name: &str) -> Result<FetchedFile, FetchError>;
}

type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

pub struct ReqwestSource {
    settings: FetchSettings,
    client: reqwest::Client,
    manifest_url: Url,
    content_base: Url,
    clock: Clock,
}

impl ReqwestSource {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let manifest_url = parse_url(&settings.manifest_url)?;
        let content_base = parse_url(&settings.content_base_url)?;
        if content_base.cannot_be_a_base() {
            return Err(FetchError::new(
                FailureKind::InvalidUrl,
                format!("{content_base} cannot be a base url"),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            settings,
            client,
            manifest_url,
            content_base,
            clock: Arc::new(unix_millis),
        })
    }

    /// Replaces the clock used for cache-busting values.
    pub fn with_clock(mut self, clock: impl Fn() -> u64 + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn manifest_url(&self, bypass_cache: bool) -> Url {
        let mut url = self.manifest_url.clone();
        if bypass_cache {
            url.query_pairs_mut()
                .append_pair(CACHE_BUST_PARAM, &(self.clock)().to_string());
        }
        url
    }

    pub fn file_url(&self, name: &str) -> Url {
        let mut url = self.content_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(name);
        }
        url
    }

    async fn get(&self, url: Url) -> Result<(Vec<u8>, Option<String>), FetchError> {
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok((bytes, content_type))
    }
}

#[async_trait::async_trait]
impl ContentSource for ReqwestSource {
    async fn fetch_manifest(&self, bypass_cache: bool) -> Result<Manifest, FetchError> {
        let (bytes, _) = self.get(self.manifest_url(bypass_cache)).await?;
        parse_manifest(&bytes)
    }

    async fn fetch_file(&self, name: &str) -> Result<FetchedFile, FetchError> {
        let (bytes, content_type) = self.get(self.file_url(name)).await?;
        let content = decode_text(&bytes, content_type.as_deref())
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
        Ok(FetchedFile {
            name: name.to_string(),
            content,
        })
    }
}

fn parse_url(raw: &str) -> Result<Url, FetchError> {
    Url::parse(raw).map_err(|err| FetchError::new(FailureKind::InvalidUrl, format!("{raw}: {err}")))
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as u64)
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{FetchSettings, ReqwestSource};
    use crate::FailureKind;

    fn source(base: &str) -> ReqwestSource {
        let settings = FetchSettings {
            manifest_url: "http://example.test/files.json".to_string(),
            content_base_url: base.to_string(),
            ..FetchSettings::default()
        };
        ReqwestSource::new(settings).unwrap().with_clock(|| 1234)
    }

    #[test]
    fn cache_busting_only_when_requested() {
        let source = source("http://example.test/profile/");
        assert_eq!(
            source.manifest_url(false).as_str(),
            "http://example.test/files.json"
        );
        assert_eq!(
            source.manifest_url(true).as_str(),
            "http://example.test/files.json?t=1234"
        );
    }

    #[test]
    fn file_urls_are_joined_and_escaped() {
        let with_slash = source("http://example.test/profile/");
        let without_slash = source("http://example.test/profile");

        assert_eq!(
            with_slash.file_url("a.txt").as_str(),
            "http://example.test/profile/a.txt"
        );
        assert_eq!(
            without_slash.file_url("a.txt").as_str(),
            "http://example.test/profile/a.txt"
        );
        assert_eq!(
            with_slash.file_url("my notes#1.txt").as_str(),
            "http://example.test/profile/my%20notes%231.txt"
        );
    }

    #[test]
    fn invalid_urls_are_rejected() {
        let settings = FetchSettings {
            manifest_url: "not a url".to_string(),
            ..FetchSettings::default()
        };
        let err = ReqwestSource::new(settings).err().unwrap();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }
}
