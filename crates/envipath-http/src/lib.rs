//! HTTP transport for the enviPath resource model.
//!
//! ```no_run
//! use envipath_http::{connect, ClientConfig};
//! use envipath_model::ResourceType;
//!
//! # fn main() -> anyhow::Result<()> {
//! let ep = connect(&ClientConfig::default())?;
//! let bbd = ep.package("https://envipath.org/package/32de3cf4-e3e6-4168-956e-32fa5ddb0ce1")?;
//! println!("{}", bbd.name()?);
//! for setting in ep.settings()? {
//!     println!("{setting}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;

pub use client::{connect, HttpFetcher};
pub use config::{ClientConfig, DEFAULT_HOST};
