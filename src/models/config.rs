//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Settings needed to bind the HTTP server and open the database.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
}
