//! Launcher configuration file parsing
//!
//! One bot per line. Blank lines and lines starting with `#` are ignored.
//! A line may start with `(name)` to name the bot explicitly:
//!
//! ```text
//! # main bots
//! (echo) node bots/echo/index.js
//! python3 bots/weather.py --verbose
//! ```
//!
//! Unnamed bots are named after their script argument, or get a random
//! `bot-xxxxxx` name when no script can be found.

use rand::Rng;
use std::collections::HashSet;
use std::path::Path;

use crate::error::{LauncherError, LauncherResult};

/// One configured bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotSpec {
    pub name: String,
    /// Program followed by its arguments
    pub command: Vec<String>,
}

impl BotSpec {
    pub fn program(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or_default()
    }

    pub fn args(&self) -> &[String] {
        self.command.get(1..).unwrap_or_default()
    }
}

/// Read and parse the configuration file at `path`
///
/// A missing file is a `ConfigMissing` error; callers treat it as fatal.
pub fn load_config(path: &Path) -> LauncherResult<Vec<BotSpec>> {
    if !path.exists() {
        return Err(LauncherError::ConfigMissing {
            path: path.display().to_string(),
        });
    }

    let contents = std::fs::read_to_string(path).map_err(|e| LauncherError::ConfigRead {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    Ok(parse_config(&contents))
}

/// Parse configuration text into bot specs, assigning unique names
pub fn parse_config(contents: &str) -> Vec<BotSpec> {
    let mut taken = HashSet::new();
    let mut specs = Vec::new();

    for line in contents.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (explicit_name, command_text) = split_name(line);
        let command: Vec<String> = command_text.split_whitespace().map(str::to_string).collect();
        if command.is_empty() {
            tracing::warn!("Skipping configuration line without a command: {}", line);
            continue;
        }

        let base = explicit_name
            .map(str::to_string)
            .or_else(|| derive_name(&command))
            .unwrap_or_else(random_name);
        let name = unique_name(base, &mut taken);

        specs.push(BotSpec { name, command });
    }

    specs
}

/// Split an optional `(name)` prefix from the command text
fn split_name(line: &str) -> (Option<&str>, &str) {
    if let Some(rest) = line.strip_prefix('(') {
        if let Some(end) = rest.find(')') {
            let name = rest[..end].trim();
            let command = rest[end + 1..].trim();
            if !name.is_empty() {
                return (Some(name), command);
            }
            return (None, command);
        }
    }
    (None, line)
}

/// First argument that looks like a script path
pub fn script_argument(command: &[String]) -> Option<&str> {
    command
        .iter()
        .skip(1)
        .map(String::as_str)
        .find(|arg| !arg.starts_with('-') && (arg.contains('/') || arg.contains('\\') || has_extension(arg)))
}

fn has_extension(arg: &str) -> bool {
    Path::new(arg).extension().is_some()
}

/// Name a bot after its script; `bots/echo/index.js` becomes `echo`
fn derive_name(command: &[String]) -> Option<String> {
    let script = Path::new(script_argument(command)?);
    let stem = script.file_stem()?.to_str()?;

    if matches!(stem, "index" | "main" | "bot" | "__main__") {
        let parent = script.parent()?.file_name()?.to_str()?;
        return Some(parent.to_string());
    }
    Some(stem.to_string())
}

fn random_name() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..0x0100_0000);
    format!("bot-{suffix:06x}")
}

fn unique_name(base: String, taken: &mut HashSet<String>) -> String {
    let mut name = base.clone();
    let mut counter = 2;
    while taken.contains(&name) {
        name = format!("{base}-{counter}");
        counter += 1;
    }
    taken.insert(name.clone());
    name
}
