//! Client for the IP Monster IP-geolocation API.
//!
//! ```no_run
//! # async fn run() -> Result<(), ipmonster::Error> {
//! use ipmonster::Options;
//!
//! ipmonster::configure(Options::new().api_key("your-key"));
//! let info = ipmonster::lookup("8.8.8.8", &Options::default()).await?;
//! println!("{info}");
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate tracing;

mod client;
pub mod config;
mod error;
pub mod trace;
mod validator;

pub use client::{IpMonster, batch_lookup, configure, lookup, user_agent};
pub use self::config::{ClientConfig, Options, Settings};
pub use error::{BatchError, Error, MAX_BATCH_SIZE};
pub use validator::{validate, validate_value};
