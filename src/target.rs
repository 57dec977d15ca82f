use async_trait::async_trait;

/// A single cell. Strings and timestamps are sent as JSON strings.
pub type Cell = serde_json::Value;
pub type Row = Vec<Cell>;
pub type Table = Vec<Row>;

/// Generic functionality for modifying a tabular data target.
#[async_trait]
pub trait DataTarget {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Appends rows after the existing content.
    async fn append(&self, table: Table) -> Result<(), Self::Error>;

    /// Removes every value in the target.
    async fn clear(&self) -> Result<(), Self::Error>;

    /// Returns every row in the target, empty when there is no data.
    async fn get(&self) -> Result<Table, Self::Error>;

    /// Overwrites the target with `table`, starting at its first cell.
    async fn set(&self, table: Table) -> Result<(), Self::Error>;
}
