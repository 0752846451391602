//! Models

/// File related models
pub mod file;
/// Item related models
pub mod item;
/// Vault related models
pub mod vault;

pub use file::*;
pub use item::*;
pub use vault::*;

use hyper::StatusCode;

/// This is a wrapper to assist creating instances of `ConnectAPIError`
/// when the server gave no decodable error body.
#[derive(Debug)]
pub struct StatusWrapper {
    pub(crate) status: u16,
}

impl From<StatusWrapper> for String {
    fn from(val: StatusWrapper) -> Self {
        StatusCode::from_u16(val.status)
            .ok()
            .and_then(|status| status.canonical_reason())
            .map(str::to_string)
            .unwrap_or_else(|| format!("unexpected status {}", val.status))
    }
}
