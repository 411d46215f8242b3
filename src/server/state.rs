//! Server state and configuration.

use std::path::PathBuf;

use crate::fonts::FontRegistry;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8001")
    pub listen_addr: String,
    /// Directory holding the available TTF/OTF fonts
    pub fonts_dir: PathBuf,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    /// Process-lifetime font cache, shared by every render.
    pub fonts: FontRegistry,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let fonts = FontRegistry::new(&config.fonts_dir);
        Self { config, fonts }
    }
}
