//! Transport implementations.

#[cfg(feature = "ureq-transport")]
mod ureq_transport;
#[cfg(feature = "ureq-transport")]
pub use ureq_transport::UreqTransport;
