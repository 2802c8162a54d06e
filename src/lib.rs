//! TP-Link router control client
//!
//! Talks to the router's web administration pages: PPPoE connect,
//! disconnect and reconnect, MAC clone, and WAN status scraping.

pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod parser;
pub mod router;

pub use error::{Result, RouterError};
pub use http::{HttpClient, Transport};
pub use models::{ConnectionMode, Credentials, LinkStatus, SecondaryConnection, WanConfig};
pub use router::Router;
