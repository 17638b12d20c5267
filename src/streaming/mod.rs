//! Track streaming: range resolution and response framing.
//!
//! Two stages, both free of routing concerns:
//!
//! - [`range::resolve`] — pure translation of an optional `Range` header
//!   plus a total length into a byte interval and response class,
//! - [`responder::respond`] — framing of an opened resource and a resolved
//!   range into a 200/206/416 response with a streaming body.
//!
//! The `/music` route in [`crate::server`] glues the two together.

pub mod range;
pub mod responder;

pub use range::{resolve, RangeStatus, ResolvedRange};
pub use responder::respond;
