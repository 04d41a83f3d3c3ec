//! Per-upload options and option merging
//!
//! Every upload consults a merged view of the instance-wide default options
//! and the per-call options, with caller values taking precedence. Header
//! and data maps merge key-wise; merging is shallow, so a caller-provided
//! key replaces the default value for that key wholesale.

use reqwest::Method;
use std::collections::HashMap;

/// Options for a single upload request
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Destination URL
    pub url: Option<String>,

    /// HTTP method (default: POST)
    pub method: Option<Method>,

    /// Request headers
    pub headers: HashMap<String, String>,

    /// Extra form fields sent alongside the file
    pub data: HashMap<String, String>,
}

impl UploadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the destination URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the HTTP method
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Add a request header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add an extra form field
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Layer these options over `defaults`, caller values winning
    pub fn merged_over(&self, defaults: &UploadOptions) -> UploadOptions {
        let mut headers = defaults.headers.clone();
        headers.extend(self.headers.clone());

        let mut data = defaults.data.clone();
        data.extend(self.data.clone());

        UploadOptions {
            url: self.url.clone().or_else(|| defaults.url.clone()),
            method: self.method.clone().or_else(|| defaults.method.clone()),
            headers,
            data,
        }
    }

    /// Shallow-merge `other` into these options in place, `other` winning.
    /// Used for [`crate::Uploader::set_default_upload_options`].
    pub fn merge_from(&mut self, other: UploadOptions) {
        if other.url.is_some() {
            self.url = other.url;
        }
        if other.method.is_some() {
            self.method = other.method;
        }
        self.headers.extend(other.headers);
        self.data.extend(other.data);
    }

    /// The effective HTTP method
    pub fn effective_method(&self) -> Method {
        self.method.clone().unwrap_or(Method::POST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merged_over_caller_wins() {
        let defaults = UploadOptions::new()
            .url("/default")
            .method(Method::PUT)
            .header("x-token", "abc")
            .data("source", "defaults");

        let call = UploadOptions::new().url("/call").data("source", "call");

        let merged = call.merged_over(&defaults);
        assert_eq!(merged.url.as_deref(), Some("/call"));
        assert_eq!(merged.method, Some(Method::PUT));
        assert_eq!(merged.headers.get("x-token").unwrap(), "abc");
        assert_eq!(merged.data.get("source").unwrap(), "call");
    }

    #[test]
    fn test_merged_over_empty_call_keeps_defaults() {
        let defaults = UploadOptions::new().url("/a").header("x", "1");
        let merged = UploadOptions::new().merged_over(&defaults);
        assert_eq!(merged.url.as_deref(), Some("/a"));
        assert_eq!(merged.headers.get("x").unwrap(), "1");
    }

    #[test]
    fn test_merge_from() {
        let mut defaults = UploadOptions::new().url("/old").data("keep", "yes");
        defaults.merge_from(UploadOptions::new().url("/new").data("extra", "1"));

        assert_eq!(defaults.url.as_deref(), Some("/new"));
        assert_eq!(defaults.data.get("keep").unwrap(), "yes");
        assert_eq!(defaults.data.get("extra").unwrap(), "1");
    }

    #[test]
    fn test_effective_method_defaults_to_post() {
        assert_eq!(UploadOptions::new().effective_method(), Method::POST);
        assert_eq!(
            UploadOptions::new().method(Method::PATCH).effective_method(),
            Method::PATCH
        );
    }
}
