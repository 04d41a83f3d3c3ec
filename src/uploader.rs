//! The `Uploader` façade and the retry orchestrator
//!
//! One `Uploader` owns a configuration, a picker, a transport, a selection
//! cache, and an event bus. Each [`Uploader::upload`] call runs its own
//! independent retry loop; concurrent calls share only the cache, the
//! default options, and the listeners.

use crate::cache::FileCache;
use crate::config::UploaderConfig;
use crate::error::{Result, UploaderError};
use crate::event::{EventBus, SelectedFile, UploadEvent};
use crate::file::FileHandle;
use crate::options::UploadOptions;
use crate::picker::{FilePicker, FsFilePicker};
use crate::transport::{HttpTransport, ProgressFn, UploadHandler};
use bytesize::ByteSize;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Builder for [`Uploader`], for callers that need to swap the picker or
/// the transport
pub struct UploaderBuilder {
    config: UploaderConfig,
    picker: Option<Box<dyn FilePicker>>,
    handler: Option<Arc<dyn UploadHandler>>,
}

impl UploaderBuilder {
    pub fn new(config: UploaderConfig) -> Self {
        Self {
            config,
            picker: None,
            handler: None,
        }
    }

    /// Use a custom file picker
    pub fn picker(mut self, picker: impl FilePicker + 'static) -> Self {
        self.picker = Some(Box::new(picker));
        self
    }

    /// Replace the built-in transport with a custom upload handler.
    ///
    /// The orchestrator does not instrument a custom handler for progress;
    /// it is responsible for its own progress reporting, if any.
    pub fn handler(mut self, handler: impl UploadHandler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> Result<Uploader> {
        self.config.validate()?;

        let custom_handler = self.handler.is_some();
        Ok(Uploader {
            config: self.config,
            defaults: RwLock::new(UploadOptions::new()),
            cache: FileCache::new(),
            bus: Arc::new(EventBus::new()),
            picker: self.picker.unwrap_or_else(|| Box::new(FsFilePicker::default())),
            handler: self
                .handler
                .unwrap_or_else(|| Arc::new(HttpTransport::new())),
            custom_handler,
        })
    }
}

/// File selection and upload helper
pub struct Uploader {
    config: UploaderConfig,
    defaults: RwLock<UploadOptions>,
    cache: FileCache,
    bus: Arc<EventBus>,
    picker: Box<dyn FilePicker>,
    handler: Arc<dyn UploadHandler>,
    custom_handler: bool,
}

/// State of one upload call's retry loop
enum RetryState {
    Attempting,
    BackingOff {
        attempt: u32,
        error: UploaderError,
    },
    Succeeded(serde_json::Value),
    Exhausted(UploaderError),
}

impl Uploader {
    /// Create an uploader with the built-in transport and the default picker
    pub fn new(config: UploaderConfig) -> Result<Self> {
        UploaderBuilder::new(config).build()
    }

    /// Start building an uploader with a custom picker or transport
    pub fn builder(config: UploaderConfig) -> UploaderBuilder {
        UploaderBuilder::new(config)
    }

    pub fn config(&self) -> &UploaderConfig {
        &self.config
    }

    /// Subscribe to the event channel. The listener receives every event
    /// kind and can filter on [`UploadEvent::kind`].
    pub fn on<F>(&self, listener: F)
    where
        F: Fn(&UploadEvent) + Send + Sync + 'static,
    {
        self.bus.on(listener);
    }

    /// Shallow-merge `options` into the instance-wide defaults consulted by
    /// every subsequent upload
    pub fn set_default_upload_options(&self, options: UploadOptions) {
        self.defaults.write().unwrap().merge_from(options);
    }

    /// The current instance-wide default options
    pub fn default_upload_options(&self) -> UploadOptions {
        self.defaults.read().unwrap().clone()
    }

    /// Trigger the picker and run the selection path on its result.
    ///
    /// Returns the derived keys of the files that passed validation; the
    /// same outcome is observable via the `Selected` event.
    pub fn open_file_selector(&self) -> Result<Vec<String>> {
        let files = self.picker.pick(&self.config.accept, self.config.multiple)?;
        Ok(self.select_files(files))
    }

    /// Validate a selection, cache the survivors, and emit events.
    ///
    /// Files over the configured size limit are dropped; a batch containing
    /// at least one such file produces exactly one `Error` event. Every
    /// surviving file lands in the cache under its derived key, and a
    /// `Selected` event is emitted even when nothing survives.
    pub fn select_files(&self, files: Vec<FileHandle>) -> Vec<String> {
        let total = files.len();
        let accepted: Vec<FileHandle> = files
            .into_iter()
            .filter(|f| self.config.fits_size_limit(f.size()))
            .collect();

        if accepted.len() < total {
            let limit = self
                .config
                .max_size
                .map(|b| ByteSize::b(b).to_string())
                .unwrap_or_default();
            log::warn!(
                "selection dropped {} of {} files over the {} limit",
                total - accepted.len(),
                total,
                limit
            );
            self.bus.emit(&UploadEvent::Error {
                message: format!("some files exceed the maximum allowed size of {limit}"),
            });
        }

        let mut keys = Vec::with_capacity(accepted.len());
        let mut snapshots = Vec::with_capacity(accepted.len());
        for file in accepted {
            snapshots.push(SelectedFile::from(&file));
            keys.push(self.cache.insert(file));
        }

        log::debug!("selection cached {} file(s)", keys.len());
        self.bus.emit(&UploadEvent::Selected { files: snapshots });
        keys
    }

    /// Look up a previously selected file by derived key
    pub fn get_cached_file(&self, key: &str) -> Option<FileHandle> {
        self.cache.get(key)
    }

    /// Number of files currently cached
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// Upload one file, retrying failed attempts with linear backoff.
    ///
    /// Per-call `options` are layered over the instance-wide defaults. Each
    /// attempt races the transport against the configured timeout; a fired
    /// timer counts as a failed attempt and the late attempt is dropped. On
    /// success the file is removed from the cache and the parsed response is
    /// returned; once retries are exhausted the last error is returned
    /// wrapped in [`UploaderError::RetriesExhausted`].
    pub async fn upload(
        &self,
        file: &FileHandle,
        options: Option<UploadOptions>,
    ) -> Result<serde_json::Value> {
        let key = file.key();
        let merged = options
            .unwrap_or_default()
            .merged_over(&self.default_upload_options());

        let progress: Option<Arc<ProgressFn>> = if self.custom_handler {
            None
        } else {
            let bus = self.bus.clone();
            Some(Arc::new(move |p| {
                bus.emit(&UploadEvent::Progress(p));
            }))
        };

        let timeout = self.config.timeout_duration();
        let mut retries_used: u32 = 0;
        let mut state = RetryState::Attempting;

        loop {
            state = match state {
                RetryState::Attempting => {
                    log::debug!(
                        "uploading {} (attempt {}/{})",
                        file.name(),
                        retries_used + 1,
                        self.config.max_retries + 1
                    );

                    let attempt = self.handler.upload(file, &merged, progress.clone());
                    match tokio::time::timeout(timeout, attempt).await {
                        Ok(Ok(response)) => RetryState::Succeeded(response),
                        Ok(Err(error)) => self.after_failure(retries_used, error),
                        Err(_) => {
                            self.after_failure(retries_used, UploaderError::timeout(timeout.as_secs()))
                        }
                    }
                }
                RetryState::BackingOff { attempt, error } => {
                    self.bus.emit(&UploadEvent::Retry {
                        attempt,
                        error: error.to_string(),
                    });
                    let delay = Duration::from_millis(1000 * u64::from(attempt));
                    log::debug!(
                        "retrying {} in {}ms (retry {}/{})",
                        file.name(),
                        delay.as_millis(),
                        attempt,
                        self.config.max_retries
                    );
                    tokio::time::sleep(delay).await;
                    retries_used = attempt;
                    RetryState::Attempting
                }
                RetryState::Succeeded(response) => {
                    log::info!("uploaded {} ({} bytes)", file.name(), file.size());
                    self.cache.remove(&key);
                    self.bus.emit(&UploadEvent::Success {
                        response: response.clone(),
                    });
                    return Ok(response);
                }
                RetryState::Exhausted(error) => {
                    log::warn!("giving up on {}: {}", file.name(), error);
                    return Err(error);
                }
            };
        }
    }

    /// Decide what follows a failed attempt: another retry, or exhaustion
    fn after_failure(&self, retries_used: u32, error: UploaderError) -> RetryState {
        self.bus.emit(&UploadEvent::Error {
            message: error.to_string(),
        });

        if retries_used < self.config.max_retries {
            RetryState::BackingOff {
                attempt: retries_used + 1,
                error,
            }
        } else {
            RetryState::Exhausted(UploaderError::retries_exhausted(retries_used + 1, error))
        }
    }
}

impl std::fmt::Debug for Uploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Uploader")
            .field("config", &self.config)
            .field("cached", &self.cache.len())
            .field("custom_handler", &self.custom_handler)
            .finish()
    }
}
