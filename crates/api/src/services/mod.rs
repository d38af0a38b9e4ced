//! External collaborator adapters.
//!
//! - [`media`] - Synchronous image-host relay on the upload critical path
//! - [`email`] - Fire-and-forget order notification mail

pub mod email;
pub mod media;

pub use email::EmailService;
pub use media::MediaRelayClient;
