//! Tabular export of resampled rows.

use std::io;

use candlewick_core::{OhlcvError, OutputBucket};

/// Write rows as CSV with a header in [`OutputBucket::COLUMNS`] order.
///
/// Missing values become empty fields. The header is written even when
/// `rows` is empty.
///
/// # Errors
/// Returns `Other` if serialization or the underlying writer fails.
pub fn write_csv<W: io::Write>(rows: &[OutputBucket], writer: W) -> Result<(), OhlcvError> {
    let mut w = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    w.write_record(OutputBucket::COLUMNS).map_err(csv_err)?;
    for row in rows {
        w.serialize(row).map_err(csv_err)?;
    }
    w.flush()
        .map_err(|e| OhlcvError::Other(format!("csv flush: {e}")))
}

fn csv_err(e: csv::Error) -> OhlcvError {
    OhlcvError::Other(format!("csv: {e}"))
}

/// Convert rows to a `polars` `DataFrame` with the CSV column names and order.
///
/// # Errors
/// Returns `Other` if polars rejects the columns.
#[cfg(feature = "dataframe")]
pub fn to_dataframe(rows: &[OutputBucket]) -> Result<polars::prelude::DataFrame, OhlcvError> {
    use candlewick_core::NumericColumn;
    use polars::prelude::{Column, DataFrame, NamedFrom};

    let text = |name: &str, f: fn(&OutputBucket) -> &str| {
        Column::new(
            name.into(),
            rows.iter().map(|r| f(r).to_string()).collect::<Vec<String>>(),
        )
    };
    let mut columns = vec![
        text("exchange_name", |r| r.exchange_name.as_str()),
        text("pair", |r| r.pair.as_str()),
        text("base", |r| r.base.as_str()),
        text("quote", |r| r.quote.as_str()),
    ];
    // COLUMNS[4..17] lines up with NumericColumn::ALL.
    for (name, col) in OutputBucket::COLUMNS[4..17].iter().zip(NumericColumn::ALL) {
        let values: Vec<Option<f64>> = rows.iter().map(|r| col.get(r)).collect();
        columns.push(Column::new((*name).into(), values));
    }
    let stamps: Vec<chrono::NaiveDateTime> = rows.iter().map(|r| r.timestamp).collect();
    columns.push(Column::new("timestamp".into(), stamps));

    DataFrame::new(columns).map_err(|e| OhlcvError::Other(format!("dataframe: {e}")))
}
