//! These models represent the objects passed around by the agent
//!
//! The conversation is kept in these internal structs and only converted to a
//! provider's wire format (see `providers::utils`) at the moment of a request.
//! Responses are converted back immediately, so nothing outside the provider
//! module needs to know what the remote API looks like.
pub mod content;
pub mod message;
pub mod role;
pub mod tool;
