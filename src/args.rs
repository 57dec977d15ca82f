use clap::{Parser, ValueEnum};

#[derive(Parser, Debug, Default)]
#[command(name = "sheet_push")]
#[command(about = "A CLI tool that writes sample rows to a Google Sheets range and reads them back")]
#[command(version)]
pub struct Args {
    /// Google Sheets ID
    #[arg(long, env = "GCP_SHEET_ID", value_name = "SHEET_ID")]
    pub sheet_id: Option<String>,

    /// Sheet name, the range written is "<NAME>!A:C"
    #[arg(long, env = "GCP_SHEET_NAME", value_name = "NAME")]
    pub sheet_name: Option<String>,

    /// Service account key JSON
    #[arg(long, env = "GCP_CREDENTIALS_JSON", value_name = "JSON", hide_env_values = true)]
    pub credentials_json: Option<String>,

    /// Path to a service account key JSON file
    #[arg(long, env = "GCP_CREDENTIALS_FILE", value_name = "PATH")]
    pub credentials_file: Option<String>,

    /// How retrieved rows are printed
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Log level
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Path to config file
    #[arg(long, default_value = "config/config.toml")]
    pub config: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON array per row
    #[default]
    Json,
    /// One CSV record per row
    Csv,
}
