use async_trait::async_trait;
use google_sheets4::api::{ClearValuesRequest, Scope, ValueRange};
use google_sheets4::{hyper, hyper_rustls, Sheets};
use std::fmt;
use tracing::debug;

use crate::target::{DataTarget, Table};

pub type SheetsHub = Sheets<hyper_rustls::HttpsConnector<hyper::client::HttpConnector>>;

/// Values are stored exactly as sent, without formula or date parsing.
const VALUE_INPUT_OPTION: &str = "RAW";

/// A spreadsheet and the A1 range inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeConfig {
    pub sheet_id: String,
    pub range: String,
}

impl fmt::Display for RangeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sheet {} range {}", self.sheet_id, self.range)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Append,
    Clear,
    Get,
    Set,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Append => "append",
            Operation::Clear => "clear",
            Operation::Get => "get",
            Operation::Set => "set",
        })
    }
}

/// A failed call against the Sheets service.
#[derive(Debug, thiserror::Error)]
#[error("unable to {op} Google Sheets {range}")]
pub struct RemoteError {
    pub op: Operation,
    pub range: RangeConfig,
    #[source]
    pub source: google_sheets4::Error,
}

/// A connected spreadsheet range.
pub struct SheetRange {
    hub: SheetsHub,
    cfg: RangeConfig,
}

impl SheetRange {
    pub fn new(hub: SheetsHub, cfg: RangeConfig) -> Self {
        Self { hub, cfg }
    }

    fn error(&self, op: Operation) -> impl FnOnce(google_sheets4::Error) -> RemoteError + '_ {
        move |source| RemoteError {
            op,
            range: self.cfg.clone(),
            source,
        }
    }
}

fn value_range(table: Table) -> ValueRange {
    ValueRange {
        values: Some(table),
        ..ValueRange::default()
    }
}

/// Rows of a fetched range; the service omits `values` for an empty range.
fn rows(range: ValueRange) -> Table {
    range.values.unwrap_or_default()
}

#[async_trait]
impl DataTarget for SheetRange {
    type Error = RemoteError;

    async fn append(&self, table: Table) -> Result<(), RemoteError> {
        debug!("Appending {} rows to {}", table.len(), self.cfg);
        self.hub
            .spreadsheets()
            .values_append(value_range(table), &self.cfg.sheet_id, &self.cfg.range)
            .value_input_option(VALUE_INPUT_OPTION)
            .add_scope(Scope::Spreadsheet)
            .doit()
            .await
            .map_err(self.error(Operation::Append))?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), RemoteError> {
        debug!("Clearing {}", self.cfg);
        self.hub
            .spreadsheets()
            .values_clear(ClearValuesRequest::default(), &self.cfg.sheet_id, &self.cfg.range)
            .add_scope(Scope::Spreadsheet)
            .doit()
            .await
            .map_err(self.error(Operation::Clear))?;
        Ok(())
    }

    async fn get(&self) -> Result<Table, RemoteError> {
        debug!("Fetching rows from {}", self.cfg);
        let (_, values) = self
            .hub
            .spreadsheets()
            .values_get(&self.cfg.sheet_id, &self.cfg.range)
            .add_scope(Scope::Spreadsheet)
            .doit()
            .await
            .map_err(self.error(Operation::Get))?;

        let table = rows(values);
        debug!("Fetched {} rows", table.len());
        Ok(table)
    }

    async fn set(&self, table: Table) -> Result<(), RemoteError> {
        debug!("Setting {} rows in {}", table.len(), self.cfg);
        self.hub
            .spreadsheets()
            .values_update(value_range(table), &self.cfg.sheet_id, &self.cfg.range)
            .value_input_option(VALUE_INPUT_OPTION)
            .add_scope(Scope::Spreadsheet)
            .doit()
            .await
            .map_err(self.error(Operation::Set))?;
        Ok(())
    }
}
