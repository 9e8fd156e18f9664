use std::env;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:7171";
pub const DEFAULT_DEVICE_NAME: &str = "librespot-spotizerr";

const BASE_URL_VAR: &str = "SPOTIZERR_URL";
const DEVICE_NAME_VAR: &str = "SPOTIZERR_AUTH_DEVICE_NAME";
const CREDENTIALS_DIR_VAR: &str = "SPOTIZERR_AUTH_CREDENTIALS_DIR";

/// Defaults for the interactive run, overridable from the environment or a
/// `.env` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Offered at the base URL prompt when the user just presses enter.
    pub default_base_url: String,
    /// Name the Spotify Connect responder advertises on the network.
    pub device_name: String,
    /// Directory the capture library writes `credentials.json` into.
    pub credentials_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            default_base_url: DEFAULT_BASE_URL.to_string(),
            device_name: DEFAULT_DEVICE_NAME.to_string(),
            credentials_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    pub fn from_env() -> Settings {
        dotenvy::dotenv().ok();
        Settings::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Settings
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Settings {
            default_base_url: get(BASE_URL_VAR).unwrap_or(defaults.default_base_url),
            device_name: get(DEVICE_NAME_VAR).unwrap_or(defaults.device_name),
            credentials_dir: get(CREDENTIALS_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.credentials_dir),
        }
    }
}

/// Turns whatever was typed at the base URL prompt into the URL requests are
/// sent to.
pub fn normalize_base_url(input: &str, default: &str) -> String {
    let input = input.trim();
    let url = if input.is_empty() { default.trim() } else { input };

    let url = if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    };

    url.trim_end_matches('/').to_string()
}
