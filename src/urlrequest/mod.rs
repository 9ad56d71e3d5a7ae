//! Request construction on top of DoH resolution.
//!
//! - [`bypass`]: rewrites a URL to target a resolved IP while keeping the
//!   original name in the `Host` header

pub mod bypass;

pub use bypass::{BypassRequestBuilder, BypassedRequest};
