use anyhow::{Context, Result};
use config::{Config, ConfigError, File};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{debug, info};

use crate::args::{Args, OutputFormat};
use crate::sheets::RangeConfig;

pub const DEFAULT_SHEET_NAME: &str = "PushSheet";

/// Columns covered by the sample rows: name, category, timestamp.
const COLUMNS: &str = "A:C";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Cfg {
    pub sheet_id: String,
    pub sheet_name: String,
    pub format: OutputFormat,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_json: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<String>,
}

impl Cfg {
    pub fn load(args: Args) -> Result<Self> {
        info!("Loading configuration from: {}", args.config);

        let mut cfg = Cfg::default();

        if std::path::Path::new(&args.config).exists() {
            let config = Config::builder()
                .add_source(File::with_name(&args.config).required(false))
                .build()
                .with_context(|| format!("Failed to parse config file {}", args.config))?;

            if let Ok(sheet_id) = config.get_string("sheet_id") {
                cfg.sheet_id = sheet_id;
            }
            if let Ok(sheet_name) = config.get_string("sheet_name") {
                cfg.sheet_name = sheet_name;
            }
            match config.get::<OutputFormat>("format") {
                Ok(format) => cfg.format = format,
                Err(ConfigError::NotFound(_)) => {}
                Err(e) => {
                    return Err(e).with_context(|| format!("Invalid format in {}", args.config))
                }
            }
            if let Ok(credentials_json) = config.get_string("credentials_json") {
                cfg.credentials_json = Some(credentials_json);
            }
            if let Ok(credentials_file) = config.get_string("credentials_file") {
                cfg.credentials_file = Some(credentials_file);
            }
            debug!("Loaded configuration from file");
        } else {
            debug!("Config file not found, using defaults");
        }

        cfg.apply_args(args);

        // Credentials stay out of the log.
        debug!(
            sheet_id = %cfg.sheet_id,
            sheet_name = %cfg.sheet_name,
            format = ?cfg.format,
            "Final configuration"
        );
        Ok(cfg)
    }

    /// Command line flags and their env fallbacks override the file.
    fn apply_args(&mut self, args: Args) {
        if let Some(sheet_id) = args.sheet_id {
            debug!("Overriding sheet_id from command line");
            self.sheet_id = sheet_id;
        }
        if let Some(sheet_name) = args.sheet_name {
            self.sheet_name = sheet_name;
        }
        if self.sheet_name.trim().is_empty() {
            self.sheet_name = DEFAULT_SHEET_NAME.to_string();
        }
        if let Some(format) = args.format {
            self.format = format;
        }
        if let Some(credentials_json) = args.credentials_json {
            self.credentials_json = Some(credentials_json);
        }
        if let Some(credentials_file) = args.credentials_file {
            self.credentials_file = Some(credentials_file);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sheet_id.trim().is_empty() {
            anyhow::bail!("sheet_id must be set (--sheet-id or GCP_SHEET_ID)");
        }

        let has_json = self
            .credentials_json
            .as_deref()
            .is_some_and(|json| !json.trim().is_empty());
        let has_file = self
            .credentials_file
            .as_deref()
            .is_some_and(|path| !path.is_empty());
        if !has_json && !has_file {
            anyhow::bail!(
                "credentials must be set (--credentials-json / GCP_CREDENTIALS_JSON or --credentials-file)"
            );
        }

        info!("Configuration validation passed");
        Ok(())
    }

    pub fn range_config(&self) -> RangeConfig {
        RangeConfig {
            sheet_id: self.sheet_id.clone(),
            range: column_range(&self.sheet_name),
        }
    }

    /// Returns the service account key material. Inline JSON wins over a file.
    pub async fn credentials(&self) -> Result<Vec<u8>> {
        if let Some(json) = self.credentials_json.as_deref().filter(|j| !j.trim().is_empty()) {
            return Ok(json.as_bytes().to_vec());
        }
        match self.credentials_file.as_deref() {
            Some(path) if !path.is_empty() => {
                debug!("Reading credentials from: {}", path);
                tokio::fs::read(path)
                    .await
                    .with_context(|| format!("Failed to read credentials file {}", path))
            }
            _ => anyhow::bail!("no credentials configured"),
        }
    }
}

impl Default for Cfg {
    fn default() -> Self {
        Self {
            sheet_id: String::new(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            format: OutputFormat::default(),
            credentials_json: None,
            credentials_file: None,
        }
    }
}

/// Builds the A1 range `<name>!A:C`, quoting names that are not plain identifiers.
pub fn column_range(sheet_name: &str) -> String {
    static PLAIN: OnceLock<Regex> = OnceLock::new();
    static QUOTED: OnceLock<Regex> = OnceLock::new();
    let plain = PLAIN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid regex"));
    let quoted = QUOTED.get_or_init(|| Regex::new(r"^'(?:[^']|'')+'$").expect("valid regex"));

    if plain.is_match(sheet_name) || quoted.is_match(sheet_name) {
        format!("{}!{}", sheet_name, COLUMNS)
    } else {
        format!("'{}'!{}", sheet_name.replace('\'', "''"), COLUMNS)
    }
}
