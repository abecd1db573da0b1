/// Remote data gateway module
///
/// Everything that talks to the photo server lives here. Each operation is
/// a single request/response cycle with no retry policy; failures surface
/// once to the caller.

pub mod client;

pub use client::{Gateway, GatewayError, UpdateRequest, UploadFields};
