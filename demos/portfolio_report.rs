//! Log in, print holdings with day P/L, recent trades and related news.
//!
//! ```bash
//! STOCK_EMAIL=me@example.com STOCK_PASSWORD=secret \
//!     cargo run --example portfolio_report
//! ```
//!
//! The token is cached in `.stockstream-token`, so later runs skip the login.

use std::sync::Arc;

use stockstream_sdk::auth::FileCredentials;
use stockstream_sdk::client::StockClientBuilder;
use stockstream_sdk::error::SdkError;

const TOKEN_FILE: &str = ".stockstream-token";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let client = StockClientBuilder::from_env()
        .credentials(Arc::new(FileCredentials::new(TOKEN_FILE)))
        .build()?;

    if !client.auth().is_authenticated() {
        let email = std::env::var("STOCK_EMAIL")?;
        let password = std::env::var("STOCK_PASSWORD")?;
        if let Err(e) = client.auth().login(&email, &password).await {
            eprintln!("{}", e.user_message());
            return Ok(());
        }
    }

    let profile = match client.auth().profile().await {
        Ok(p) => p,
        Err(e @ SdkError::Auth(_)) => {
            eprintln!("{}", e.user_message());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    println!("{} <{}>", profile.username, profile.email);

    let valuation = client.portfolio().valuation().await?;
    println!(
        "\n{:<6} {:>8} {:>10} {:>12} {:>10} {:>8}",
        "SYMBOL", "QTY", "PRICE", "VALUE", "P/L", "P/L %"
    );
    for row in &valuation.holdings {
        let marker = if row.priced { "" } else { "  (no quote)" };
        println!(
            "{:<6} {:>8} {:>10} {:>12} {:>+10} {:>+7}%{}",
            row.symbol,
            row.quantity,
            row.current_price.round_dp(2),
            row.total_value.round_dp(2),
            row.profit_loss.round_dp(2),
            row.profit_loss_pct.round_dp(2),
            marker
        );
    }
    let s = &valuation.summary;
    println!(
        "{:<6} {:>8} {:>10} {:>12} {:>+10} {:>+7}%",
        "TOTAL",
        "",
        "",
        s.total_value.round_dp(2),
        s.total_profit_loss.round_dp(2),
        s.total_profit_loss_pct.round_dp(2)
    );

    let trades = client.trading().history().await?;
    println!("\nLast trades:");
    for t in trades.iter().rev().take(5) {
        println!(
            "  {} {:<4} {:<6} x{}",
            t.timestamp.format("%Y-%m-%d %H:%M"),
            t.action,
            t.symbol,
            t.quantity
        );
    }

    let symbols: Vec<_> = valuation.holdings.iter().map(|h| h.symbol.clone()).collect();
    if !symbols.is_empty() {
        match client.news().for_symbols(&symbols).await {
            Ok(articles) => {
                println!("\nNews:");
                for a in articles.iter().take(5) {
                    println!("  [{}] {} ({})", a.source, a.title, a.link);
                }
            }
            Err(e) => eprintln!("News unavailable: {}", e.user_message()),
        }
    }

    Ok(())
}
