//! Per-bot environment overrides
//!
//! Each bot may ship a `.env` file next to its script. The file is located
//! from the first script-like argument of the bot's command, e.g.
//! `node bots/echo/index.js` reads `bots/echo/.env`. Missing files are not
//! an error; a bot without one simply inherits the launcher environment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::config::script_argument;
use crate::error::{LauncherError, LauncherResult};
use crate::traits::EnvLoader;

/// Environment key whose value becomes the bot's reported username
pub const USERNAME_KEY: &str = "BOT_USERNAME";

/// Env loader reading `.env` files with dotenv
#[derive(Debug, Clone, Copy, Default)]
pub struct DotenvLoader;

impl DotenvLoader {
    pub fn new() -> Self {
        Self
    }

    /// Location of the env file for a command, if it has a script argument
    pub fn env_path(command: &[String]) -> Option<PathBuf> {
        let script = Path::new(script_argument(command)?);
        let dir = script.parent().unwrap_or_else(|| Path::new(""));
        Some(dir.join(".env"))
    }
}

impl EnvLoader for DotenvLoader {
    fn load(&self, command: &[String]) -> LauncherResult<HashMap<String, String>> {
        let mut overrides = HashMap::new();

        let Some(path) = Self::env_path(command) else {
            return Ok(overrides);
        };
        if !path.is_file() {
            return Ok(overrides);
        }

        let env_error = |message: String| LauncherError::EnvFileError {
            path: path.display().to_string(),
            message,
        };

        let entries = dotenv::from_path_iter(&path).map_err(|e| env_error(e.to_string()))?;
        for entry in entries {
            let (key, value) = entry.map_err(|e| env_error(e.to_string()))?;
            overrides.insert(key, value);
        }

        Ok(overrides)
    }
}
