use anyhow::Result;
use csv::WriterBuilder;
use std::io::Write;

use crate::args::OutputFormat;
use crate::target::{Cell, Table};

pub const NO_DATA: &str = "No data found.";

/// Prints retrieved rows to a writer, usually stdout.
pub struct RowPrinter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> RowPrinter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn print(&mut self, rows: &Table) -> Result<()> {
        if rows.is_empty() {
            writeln!(self.out, "{}", NO_DATA)?;
            return Ok(());
        }

        match self.format {
            OutputFormat::Json => {
                for row in rows {
                    serde_json::to_writer(&mut self.out, row)?;
                    writeln!(self.out)?;
                }
            }
            OutputFormat::Csv => {
                // Rows from a sheet are ragged when trailing cells are empty.
                let mut writer = WriterBuilder::new()
                    .flexible(true)
                    .from_writer(&mut self.out);
                for row in rows {
                    writer.write_record(row.iter().map(cell_text))?;
                }
                writer.flush()?;
            }
        }

        self.out.flush()?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::String(s) => s.clone(),
        Cell::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn printed(format: OutputFormat, rows: &Table) -> String {
        let mut printer = RowPrinter::new(Vec::new(), format);
        printer.print(rows).unwrap();
        String::from_utf8(printer.into_inner()).unwrap()
    }

    fn sample() -> Table {
        vec![
            vec![json!("Physicist"), json!("Area of Research"), json!("Time Added")],
            vec![json!("Brian Greene"), json!("String Theory, etc"), json!(42)],
            vec![json!("Max Tegmark")],
        ]
    }

    #[test]
    fn json_prints_one_array_per_row() {
        assert_eq!(
            printed(OutputFormat::Json, &sample()),
            "[\"Physicist\",\"Area of Research\",\"Time Added\"]\n\
             [\"Brian Greene\",\"String Theory, etc\",42]\n\
             [\"Max Tegmark\"]\n"
        );
    }

    #[test]
    fn csv_quotes_and_allows_ragged_rows() {
        assert_eq!(
            printed(OutputFormat::Csv, &sample()),
            "Physicist,Area of Research,Time Added\n\
             Brian Greene,\"String Theory, etc\",42\n\
             Max Tegmark\n"
        );
    }

    #[test]
    fn empty_table_prints_no_data() {
        assert_eq!(printed(OutputFormat::Json, &Table::new()), "No data found.\n");
        assert_eq!(printed(OutputFormat::Csv, &Table::new()), "No data found.\n");
    }
}
