//! HDRProbe backend client.
//!
//! The [`Backend`] trait is the seam between the controller's requests and
//! the processing server. [`HttpBackend`] talks to the server's JSON API;
//! [`execute`] runs one controller request against any backend and turns
//! the result into the matching completion event.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod raster;

pub use backend::{execute, Backend};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use http::HttpBackend;
pub use raster::decode_data_url;
