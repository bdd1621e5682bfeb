mod common;
use std::time::Duration;

use candlewick::{Candlewick, ExchangeId};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cw = Candlewick::builder()
        .with_client(ExchangeId::Upbit, common::upbit())
        .spot_source(common::spot_source())
        .page_delay(Duration::from_millis(100))
        .spot_max_attempts(5)
        .build()?;

    let report = cw
        .download()
        .exchange("upbit")
        .pair("BTC/KRW")
        .period("2024-03-01 00:00:00+00:00", "2024-03-01 23:00:00+00:00")
        .input_granularity("1h")
        .output_granularity_seconds(4 * 3_600)
        .run()
        .await?;

    println!("conversion: {:?}", report.conversion);
    if report.is_degraded() {
        println!("USDT columns use a single current spot price");
    }
    println!("rows: {}, rows with missing values: {}", report.rows.len(), report.missing_rows());
    for w in &report.warnings {
        eprintln!("- {w}");
    }

    candlewick::write_csv(&report.rows, std::io::stdout())?;
    Ok(())
}
