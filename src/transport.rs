//! Upload transports
//!
//! The [`UploadHandler`] trait is the seam between the retry orchestrator
//! and the wire. The built-in [`HttpTransport`] sends one multipart request
//! per attempt and reports native progress; a caller-supplied handler
//! replaces it wholesale and owns its own progress reporting, if any.

use crate::error::{Result, UploaderError};
use crate::event::UploadProgress;
use crate::file::FileHandle;
use crate::options::UploadOptions;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use std::sync::Arc;

/// Progress callback invoked as the file body is written out
pub type ProgressFn = dyn Fn(UploadProgress) + Send + Sync;

/// A transport that can carry one file upload attempt
#[async_trait]
pub trait UploadHandler: Send + Sync {
    /// Perform a single upload attempt and return the parsed response body.
    ///
    /// `progress` is only supplied on the built-in transport path; custom
    /// handlers receive `None` and are not instrumented by the orchestrator.
    async fn upload(
        &self,
        file: &FileHandle,
        options: &UploadOptions,
        progress: Option<Arc<ProgressFn>>,
    ) -> Result<serde_json::Value>;
}

/// Frame size for the streamed file body; each frame advances progress once
const PROGRESS_FRAME_SIZE: usize = 64 * 1024;

/// The built-in multipart HTTP transport
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    fn file_part(file: &FileHandle, progress: Option<Arc<ProgressFn>>) -> Part {
        let total = file.size();
        let data = file.data().clone();

        let part = match progress {
            Some(callback) => {
                let frames = split_frames(&data);
                let mut loaded: u64 = 0;
                let stream = futures::stream::iter(frames.into_iter().map(move |frame| {
                    loaded += frame.len() as u64;
                    callback(UploadProgress::new(loaded, total));
                    Ok::<Bytes, std::io::Error>(frame)
                }));
                Part::stream_with_length(Body::wrap_stream(stream), total)
            }
            None => Part::bytes(data.to_vec()),
        };

        part.file_name(file.name().to_string())
    }
}

fn split_frames(data: &Bytes) -> Vec<Bytes> {
    let mut frames = Vec::with_capacity(data.len() / PROGRESS_FRAME_SIZE + 1);
    let mut offset = 0;
    while offset < data.len() {
        let end = (offset + PROGRESS_FRAME_SIZE).min(data.len());
        frames.push(data.slice(offset..end));
        offset = end;
    }
    frames
}

pub(crate) fn build_headers(options: &UploadOptions) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in &options.headers {
        let name = HeaderName::try_from(name.as_str()).map_err(|_| {
            UploaderError::invalid_parameter("headers", format!("invalid header name: {name}"))
        })?;
        let value = HeaderValue::try_from(value.as_str()).map_err(|_| {
            UploaderError::invalid_parameter("headers", format!("invalid header value for {name}"))
        })?;
        headers.insert(name, value);
    }
    Ok(headers)
}

#[async_trait]
impl UploadHandler for HttpTransport {
    async fn upload(
        &self,
        file: &FileHandle,
        options: &UploadOptions,
        progress: Option<Arc<ProgressFn>>,
    ) -> Result<serde_json::Value> {
        let url = options.url.as_deref().ok_or_else(|| {
            UploaderError::invalid_parameter("url", "no upload URL configured")
        })?;

        let mut form = Form::new().part("file", Self::file_part(file, progress));
        for (key, value) in &options.data {
            form = form.text(key.clone(), value.clone());
        }

        let headers = build_headers(options)?;

        log::debug!(
            "{} {} ({} bytes, {} extra fields)",
            options.effective_method(),
            url,
            file.size(),
            options.data.len()
        );

        let response = self
            .client
            .request(options.effective_method(), url)
            .headers(headers)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploaderError::transport(format!(
                "server responded with status {status}"
            )));
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str(&body)?;
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn file(content: &'static [u8]) -> FileHandle {
        FileHandle::new(
            "a.bin",
            content,
            Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
        )
    }

    #[test]
    fn test_split_frames_covers_all_bytes() {
        let data = Bytes::from(vec![7u8; PROGRESS_FRAME_SIZE * 2 + 10]);
        let frames = split_frames(&data);
        assert_eq!(frames.len(), 3);
        assert_eq!(
            frames.iter().map(|f| f.len()).sum::<usize>(),
            data.len()
        );
        assert_eq!(frames[2].len(), 10);
    }

    #[test]
    fn test_build_headers() {
        let options = UploadOptions::new()
            .header("x-token", "abc")
            .header("content-language", "en");
        let headers = build_headers(&options).unwrap();
        assert_eq!(headers.get("x-token").unwrap(), "abc");
        assert_eq!(headers.len(), 2);

        let options = UploadOptions::new().header("bad header", "x");
        assert!(build_headers(&options).is_err());
    }

    #[tokio::test]
    async fn test_upload_without_url_is_rejected() {
        let transport = HttpTransport::new();
        let result = transport
            .upload(&file(b"data"), &UploadOptions::new(), None)
            .await;

        match result.unwrap_err() {
            UploaderError::InvalidParameter { parameter, .. } => assert_eq!(parameter, "url"),
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }
}
