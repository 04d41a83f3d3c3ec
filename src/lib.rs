//! uploadkit: file selection and HTTP upload in one configurable object
//!
//! An [`Uploader`] wires together a file picker, a size validator, a
//! selection cache keyed by name + size + last-modified, a retrying upload
//! orchestrator, and a lifecycle event channel. The built-in transport
//! sends a single multipart request per attempt; callers can swap in their
//! own [`UploadHandler`].
//!
//! ```no_run
//! use uploadkit::{Uploader, UploaderConfig, UploadOptions, FileHandle};
//!
//! # async fn example() -> uploadkit::Result<()> {
//! let uploader = Uploader::new(UploaderConfig::new().max_retries(2))?;
//! uploader.set_default_upload_options(UploadOptions::new().url("https://example.com/upload"));
//!
//! uploader.on(|event| println!("event: {}", event.kind()));
//!
//! let file = FileHandle::from_path("report.pdf")?;
//! let response = uploader.upload(&file, None).await?;
//! println!("server said: {response}");
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod event;
pub mod file;
pub mod options;
pub mod picker;
pub mod transport;
pub mod uploader;

pub use cache::FileCache;

pub use config::{UploaderConfig, DEFAULT_MAX_RETRIES, DEFAULT_MAX_SIZE, DEFAULT_TIMEOUT_SECS};

pub use error::{Result, UploaderError};

pub use event::{EventBus, EventKind, SelectedFile, UploadEvent, UploadProgress};

pub use file::FileHandle;

pub use options::UploadOptions;

pub use picker::{FilePicker, FsFilePicker};

pub use transport::{HttpTransport, ProgressFn, UploadHandler};

pub use uploader::{Uploader, UploaderBuilder};
