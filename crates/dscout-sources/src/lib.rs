//! Source adapters for dscout.
//!
//! One adapter per platform, each translating that platform's response shape
//! into the common [`dscout_core::DemandSignal`] schema behind the
//! [`DemandSource`] trait. Adapters never panic past their boundary: every
//! transport, auth, throttle, or payload problem surfaces as a typed
//! [`SourceError`] for the batch runner to log and step over.

mod error;
mod http;
mod producthunt;
mod source;
mod v2ex;
mod zhihu;

pub use error::{SourceError, SourceErrorKind};
pub use producthunt::ProductHuntSource;
pub use source::{build_sources, DemandSource};
pub use v2ex::V2exSource;
pub use zhihu::ZhihuSource;
