//! General application configuration.

use serde::{Deserialize, Serialize};

fn default_data_dir() -> String {
    ".qms".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Directory holding `sections.json` and `responses.json` for the file-backed API.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}
