use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Result, bail};
use shared::config::client::Config;

/// Renders the default configuration in the given format (`yaml` or `json`).
///
/// # Errors
/// Returns an error if the format is unsupported or serialization fails.
pub fn render_config(format: &str) -> Result<(&'static str, String)> {
    let config = Config::with_defaults();
    match format {
        "yaml" => Ok(("config.yaml", serde_yml::to_string(&config)?)),
        "json" => Ok(("config.json", serde_json::to_string_pretty(&config)?)),
        _ => bail!("Unsupported format. Use 'yaml' or 'json'."),
    }
}

/// Writes the default configuration into `dir` and returns the file's path.
///
/// # Errors
/// Returns an error if the format is unsupported or writing the file fails.
pub fn write_config(dir: &Path, format: &str) -> Result<PathBuf> {
    let (file_name, serialized) = render_config(format)?;
    let path = dir.join(file_name);
    fs::write(&path, serialized)?;
    Ok(path)
}

/// Generates a configuration file in the current directory.
///
/// # Errors
/// Returns an error if the format is unsupported or writing the file fails.
pub fn generate_config(format: &str) -> Result<()> {
    let path = write_config(Path::new("."), format)?;
    let file_name = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();
    println!("Configuration file '{file_name}' generated successfully.");
    Ok(())
}
