use std::env;
use std::fs as stdfs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pagepilot_cli::PilotConfig;
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FORMAT_ENV: &str = "PAGEPILOT_LOG_FORMAT";

const LOCAL_ENV_PATH: &str = "config/local.env";

/// Exports `config/local.env` entries that the environment does not already set.
pub fn load_local_env_overrides() {
    let path = Path::new(LOCAL_ENV_PATH);
    if !path.exists() {
        return;
    }

    match stdfs::read_to_string(path) {
        Ok(contents) => {
            let mut applied = 0;
            for (key, value) in parse_env_file(&contents) {
                if env::var_os(&key).is_none() {
                    env::set_var(key, value);
                    applied += 1;
                }
            }
            info!(path = %path.display(), applied, "Loaded environment overrides");
        }
        Err(err) => {
            warn!(path = %path.display(), ?err, "failed to read local.env overrides");
        }
    }
}

/// `KEY=value` lines; blank lines and `#` comments are skipped.
fn parse_env_file(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .enumerate()
        .filter_map(|(idx, raw_line)| {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            match line.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    Some((key.trim().to_string(), unescape_value(value.trim())))
                }
                _ => {
                    warn!(line = idx + 1, "invalid local.env entry; skipping");
                    None
                }
            }
        })
        .collect()
}

pub fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    // stdout is reserved for command output.
    let json = env::var(LOG_FORMAT_ENV)
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    Ok(())
}

pub struct LoadedConfig {
    pub config: PilotConfig,
    pub path: PathBuf,
}

pub async fn load_config(config_path: Option<&PathBuf>) -> Result<LoadedConfig> {
    let config_path = match config_path {
        Some(path) => path.clone(),
        None => {
            // Priority: ./config/config.yaml > ~/.config/pagepilot/config.yaml
            let local_config = PathBuf::from("config/config.yaml");
            if local_config.exists() {
                local_config
            } else {
                let mut path = dirs::config_dir().context("Failed to get config directory")?;
                path.push("pagepilot");
                path.push("config.yaml");
                path
            }
        }
    };

    if config_path.exists() {
        let content = fs::read_to_string(&config_path)
            .await
            .context("Failed to read config file")?;

        let config = PilotConfig::from_yaml_str(&content).context("Failed to parse config file")?;
        let config = match config_path.parent() {
            Some(dir) => config.anchored_at(dir),
            None => config,
        };

        info!("Loaded configuration from: {}", config_path.display());
        Ok(LoadedConfig {
            config,
            path: config_path,
        })
    } else {
        warn!(
            "Config file not found, using defaults: {}",
            config_path.display()
        );
        Ok(LoadedConfig {
            config: PilotConfig::default(),
            path: config_path,
        })
    }
}

fn unescape_value(value: &str) -> String {
    match value.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
        Some(inner) => inner
            .replace("\\\"", "\"")
            .replace("\\n", "\n")
            .replace("\\t", "\t"),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn env_file_skips_comments_and_malformed_lines() {
        let parsed = parse_env_file("# comment\n\nRUST_LOG=debug\nnot a pair\n=orphan\nNAME = \"a b\"\n");
        assert_eq!(
            parsed,
            vec![
                ("RUST_LOG".to_string(), "debug".to_string()),
                ("NAME".to_string(), "a b".to_string()),
            ]
        );
    }

    #[test]
    fn quoted_env_values_are_unescaped() {
        assert_eq!(unescape_value(r#""a\"b\tc""#), "a\"b\tc");
        assert_eq!(unescape_value("plain"), "plain");
    }

    #[tokio::test]
    async fn config_file_anchors_template_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut file = stdfs::File::create(&path).unwrap();
        writeln!(file, "templates_path: templates.yaml\ntiming:\n  click_settle_ms: 0").unwrap();

        let loaded = load_config(Some(&path)).await.unwrap();

        assert_eq!(loaded.config.timing.click_settle_ms, 0);
        assert_eq!(
            loaded.config.templates_path,
            Some(dir.path().join("templates.yaml"))
        );
    }

    #[tokio::test]
    async fn missing_config_falls_back_to_defaults() {
        let path = PathBuf::from("/nonexistent/pagepilot/config.yaml");
        let loaded = load_config(Some(&path)).await.unwrap();
        assert_eq!(loaded.config, PilotConfig::default());
        assert_eq!(loaded.path, path);
    }
}
