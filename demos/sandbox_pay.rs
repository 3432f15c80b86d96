//! Create a sandbox payment.
//!
//! Reads `MMPAY_APP_ID`, `MMPAY_PUBLISHABLE_KEY`, `MMPAY_SECRET_KEY` and
//! `MMPAY_API_BASE_URL` from the environment or a `.env` file.
//!
//! ```bash
//! RUST_LOG=mmpay=debug cargo run --example sandbox_pay -- ORD-1001 2500
//! ```

use mmpay::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let order_id = args.next().unwrap_or_else(|| format!("ORD-{}", generate_nonce()));
    let amount: u64 = args.next().map(|a| a.parse::<u64>()).transpose()?.unwrap_or(1000);

    let client = MmPayClient::new(ClientConfig::from_env()?)?;

    let params = PayParams::new(
        order_id.clone(),
        amount,
        vec![PaymentItem::new("Sandbox item", amount, 1)],
    )
    .with_currency("MMK");

    println!("Creating sandbox payment {} for {}", order_id, amount);
    let payment = client.sandbox_pay(params).await?;

    println!("{}", serde_json::to_string_pretty(payment.as_map())?);

    Ok(())
}
