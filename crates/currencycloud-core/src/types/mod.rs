//! Validated configuration and identity types.
//!
//! Construction checks the format, so a held value is always usable.

mod base_url;
mod environment;
mod subject_id;

pub use base_url::BaseUrl;
pub use environment::Environments;
pub use subject_id::SubjectId;
