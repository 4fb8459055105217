//! Configure command
//!
//! Prompts for host, token and production folder and stores them in the
//! config file.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use colored::*;

use crate::config::{Config, Settings, normalize_folder, normalize_host};

/// Prompt for each setting and save the result
pub fn handle_configure(config: &Config) -> Result<()> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();

    let settings = prompt_settings(&mut input, &mut output, &config.settings)?;
    settings
        .save(&config.path)
        .context("Failed to save configuration")?;

    println!(
        "{}",
        format!("✓ Configuration saved to {}", config.path.display())
            .green()
            .bold()
    );
    Ok(())
}

/// Ask for every setting, offering the current value as the default
pub fn prompt_settings(
    input: &mut impl BufRead,
    output: &mut impl Write,
    current: &Settings,
) -> Result<Settings> {
    let mut host = prompt(
        input,
        output,
        "Databricks host (e.g. https://my-org.cloud.databricks.com)",
        current.host.as_deref(),
    )?;
    if !host.starts_with("http") {
        writeln!(output, "{}", "The host must start with http:// or https://".yellow())?;
        host = prompt(input, output, "Databricks host", current.host.as_deref())?;
        if !host.starts_with("http") {
            bail!("invalid host '{}': must start with http", host);
        }
    }

    let token = prompt(
        input,
        output,
        "Databricks API token",
        current.token.as_deref(),
    )?;

    let prod_folder = prompt(
        input,
        output,
        "Production folder for libraries (e.g. /Shared/libraries)",
        current.prod_folder.as_deref(),
    )?;

    Ok(Settings {
        host: Some(normalize_host(&host)),
        token: Some(token),
        prod_folder: Some(normalize_folder(&prod_folder)),
    })
}

/// Read one line; an empty answer keeps `default`
fn prompt(
    input: &mut impl BufRead,
    output: &mut impl Write,
    label: &str,
    default: Option<&str>,
) -> Result<String> {
    match default {
        Some(default) => write!(output, "{} [{}]: ", label, default.dimmed())?,
        None => write!(output, "{}: ", label)?,
    }
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();

    match (answer.is_empty(), default) {
        (false, _) => Ok(answer.to_string()),
        (true, Some(default)) => Ok(default.to_string()),
        (true, None) => bail!("{} is required", label),
    }
}
