mod common;

use candlewick::{Candlewick, ExchangeId};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cw = Candlewick::builder()
        .with_client(ExchangeId::Upbit, common::upbit())
        .build()?;

    for pair in cw.find_pairs("upbit", "BTC").await? {
        println!("{pair}");
    }
    Ok(())
}
