use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileSourcesConfig};
use super::models::AppConfig;
use crate::cli::GenerateArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use cellstack::engine::config::ConstraintsBuilder;
use std::path::Path;
use tracing::{debug, warn};

pub fn build_config(args: &GenerateArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };
    let config_dir = args.config.as_deref().and_then(Path::parent);

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let envelope = file_config.envelope.take().unwrap_or_default();
    let thickness = file_config.thickness.take().unwrap_or_default();

    let constraints = ConstraintsBuilder::new()
        .max_width(required(
            args.max_width.or(envelope.max_width),
            "envelope.max-width",
            "--max-width",
        )?)
        .max_length(required(
            args.max_length.or(envelope.max_length),
            "envelope.max-length",
            "--max-length",
        )?)
        .from_thickness(required(
            args.from_thickness.or(thickness.from),
            "thickness.from",
            "--from-thickness",
        )?)
        .to_thickness(required(
            args.to_thickness.or(thickness.to),
            "thickness.to",
            "--to-thickness",
        )?)
        .top_k(args.top_k.or(file_config.top_k).unwrap_or(defaults.top_k))
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    if constraints.thickness_range.is_inverted() {
        warn!(
            from = constraints.thickness_range.from,
            to = constraints.thickness_range.to,
            "Thickness range is inverted; no cell can qualify."
        );
    }

    let sources = collect_sources(args, file_config.sources.take(), config_dir)?;
    debug!(count = sources.len(), "Collected source entries.");

    Ok(AppConfig {
        sources,
        output: args.output.clone(),
        constraints,
    })
}

fn required<T>(value: Option<T>, key: &str, flag: &str) -> Result<T> {
    value.ok_or_else(|| {
        CliError::Config(format!(
            "A value for '{}' is required either in the config file or via {}.",
            key, flag
        ))
    })
}

/// Sources given on the command line (positional and `--source-list`) replace those from
/// the config file. Relative config-file paths resolve against the config file's directory.
fn collect_sources(
    args: &GenerateArgs,
    file_sources: Option<FileSourcesConfig>,
    config_dir: Option<&Path>,
) -> Result<Vec<String>> {
    let mut sources = args.sources.clone();

    if let Some(list_path) = &args.source_list {
        debug!("Reading source list from {:?}", list_path);
        let content = std::fs::read_to_string(list_path)?;
        sources.extend(parser::parse_source_list(&content));
    }

    if !sources.is_empty() {
        return Ok(sources);
    }

    let file_paths = file_sources.map(|s| s.paths).unwrap_or_default();
    Ok(file_paths
        .into_iter()
        .map(|entry| match config_dir {
            Some(dir) if !entry.trim().is_empty() && Path::new(&entry).is_relative() => {
                dir.join(&entry).to_string_lossy().to_string()
            }
            _ => entry,
        })
        .collect())
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value_str) =
            parser::parse_key_value(kv_pair).map_err(|e| CliError::Argument(e.to_string()))?;

        let invalid =
            || CliError::Config(format!("Invalid integer value for {}: {}", key, value_str));

        match key {
            "top-k" => {
                config.top_k = Some(value_str.parse().map_err(|_| invalid())?);
            }
            "envelope.max-width" => {
                config
                    .envelope
                    .get_or_insert_with(Default::default)
                    .max_width = Some(value_str.parse().map_err(|_| invalid())?);
            }
            "envelope.max-length" => {
                config
                    .envelope
                    .get_or_insert_with(Default::default)
                    .max_length = Some(value_str.parse().map_err(|_| invalid())?);
            }
            "thickness.from" => {
                config.thickness.get_or_insert_with(Default::default).from =
                    Some(value_str.parse().map_err(|_| invalid())?);
            }
            "thickness.to" => {
                config.thickness.get_or_insert_with(Default::default).to =
                    Some(value_str.parse().map_err(|_| invalid())?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
