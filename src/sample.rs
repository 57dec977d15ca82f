use anyhow::Result;
use chrono::{DateTime, Local, SecondsFormat};
use serde_json::json;
use std::io::Write;
use tracing::info;

use crate::output::RowPrinter;
use crate::target::{Cell, DataTarget, Table};

fn timestamp_cell(at: DateTime<Local>) -> Cell {
    json!(at.to_rfc3339_opts(SecondsFormat::AutoSi, false))
}

/// Writes a header and two timestamped batches to `target`, then prints what it holds.
///
/// The first failing step aborts the run and its error is returned as is, so
/// callers can downcast it back to `T::Error`. Earlier steps are not undone.
pub async fn run_sample<T, C, W>(target: &T, mut clock: C, out: &mut RowPrinter<W>) -> Result<()>
where
    T: DataTarget,
    C: FnMut() -> DateTime<Local>,
    W: Write,
{
    // Clear the range and create the header
    target.clear().await?;
    let header: Table = vec![vec![
        json!("Physicist"),
        json!("Area of Research"),
        json!("Time Added"),
    ]];
    target.set(header).await?;
    info!("Wrote header row");

    let now = timestamp_cell(clock());
    let first_batch: Table = vec![
        vec![json!("Brian Greene"), json!("String Theory"), now.clone()],
        vec![json!("Max Tegmark"), json!("Mathematical Multiverse"), now],
    ];
    target.append(first_batch).await?;

    let now = timestamp_cell(clock());
    let second_batch: Table = vec![vec![
        json!("Sean Carroll"),
        json!("Everettian Many Worlds"),
        now,
    ]];
    target.append(second_batch).await?;
    info!("Appended 3 sample rows in 2 batches");

    let rows = target.get().await?;
    info!("Read back {} rows", rows.len());
    out.print(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::OutputFormat;
    use crate::target::testing::{FaultyTarget, InjectedFault, MemoryTarget};
    use chrono::{Duration, TimeZone};

    /// A clock that advances one second per call.
    fn ticking_clock() -> impl FnMut() -> DateTime<Local> {
        let mut at = Local.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        move || {
            at += Duration::seconds(1);
            at
        }
    }

    fn printer() -> RowPrinter<Vec<u8>> {
        RowPrinter::new(Vec::new(), OutputFormat::Json)
    }

    async fn assert_sample_rows(target: &MemoryTarget) {
        let rows = target.get().await.unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(
            rows[0],
            vec![json!("Physicist"), json!("Area of Research"), json!("Time Added")]
        );
        assert_eq!(rows[1][0], json!("Brian Greene"));
        assert_eq!(rows[2][0], json!("Max Tegmark"));
        assert_eq!(rows[3][0], json!("Sean Carroll"));
        assert_eq!(rows[1][2], rows[2][2]);
        assert_ne!(rows[2][2], rows[3][2]);
    }

    #[tokio::test]
    async fn writes_four_rows_to_empty_target() {
        let target = MemoryTarget::default();
        let mut out = printer();
        run_sample(&target, ticking_clock(), &mut out).await.unwrap();

        assert_sample_rows(&target).await;
        assert_eq!(
            target.calls(),
            vec!["clear", "set", "append", "append", "get", "get"]
        );

        let printed = String::from_utf8(out.into_inner()).unwrap();
        let lines: Vec<&str> = printed.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "[\"Physicist\",\"Area of Research\",\"Time Added\"]");
        assert!(lines[3].starts_with("[\"Sean Carroll\",\"Everettian Many Worlds\",\"2024-03-01T12:00:02"));
    }

    #[tokio::test]
    async fn clears_existing_content_first() {
        let target = MemoryTarget::with_rows(vec![
            vec![json!("stale"), json!("row"), json!("x")],
            vec![json!("another")],
            vec![json!("a"), json!("b"), json!("c"), json!("d")],
            vec![json!("e")],
            vec![json!("f")],
        ]);
        run_sample(&target, ticking_clock(), &mut printer()).await.unwrap();
        assert_sample_rows(&target).await;
    }

    #[tokio::test]
    async fn timestamps_are_rfc3339_strings() {
        let target = MemoryTarget::default();
        run_sample(&target, ticking_clock(), &mut printer()).await.unwrap();
        let rows = target.get().await.unwrap();
        let stamp = rows[1][2].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[tokio::test]
    async fn aborts_on_first_failure() {
        let cases = [
            ("clear", vec!["clear"]),
            ("set", vec!["clear", "set"]),
            ("append", vec!["clear", "set", "append"]),
            ("get", vec!["clear", "set", "append", "append", "get"]),
        ];
        for (fail_on, expected_calls) in cases {
            let target = FaultyTarget::new(fail_on);
            let mut out = printer();
            let err = run_sample(&target, ticking_clock(), &mut out)
                .await
                .unwrap_err();

            assert_eq!(err.downcast_ref::<InjectedFault>(), Some(&InjectedFault(fail_on)));
            assert_eq!(target.inner.calls(), expected_calls);
            assert!(out.into_inner().is_empty());
        }
    }
}
