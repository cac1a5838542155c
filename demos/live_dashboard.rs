//! Stream live prices for a symbol and switch to a second one halfway through.
//!
//! ```bash
//! STOCK_WS_URL=ws://localhost:8000/ws RUST_LOG=stockstream_sdk=debug \
//!     cargo run --example live_dashboard -- AAPL TSLA
//! ```

use std::time::Duration;

use stockstream_sdk::dashboard::{DashboardUpdate, LiveDashboard};
use stockstream_sdk::network::{DEFAULT_WS_URL, WS_URL_ENV};
use stockstream_sdk::shared::Symbol;
use stockstream_sdk::ws::WsConfig;

const TICKS_BEFORE_SWITCH: usize = 10;
const RUN_FOR: Duration = Duration::from_secs(120);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let first = args.next().map(Symbol::from).unwrap_or_default();
    let second = args.next().map(Symbol::from);

    let url = std::env::var(WS_URL_ENV).unwrap_or_else(|_| DEFAULT_WS_URL.to_string());
    let mut dashboard = LiveDashboard::mount(WsConfig::new(url), first).await?;

    let mut ticks = 0usize;
    let deadline = tokio::time::sleep(RUN_FOR);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            update = dashboard.next_update() => {
                let Some(update) = update else { break };
                match update {
                    DashboardUpdate::Status(state) => println!("[{}]", state),
                    DashboardUpdate::Tick { price, delta, len } => {
                        ticks += 1;
                        println!(
                            "{:<6} {:>12} {:>+10} ({} pts)",
                            dashboard.active_symbol(),
                            price.round_dp(2),
                            delta.round_dp(2),
                            len
                        );
                        if ticks == TICKS_BEFORE_SWITCH {
                            if let Some(next) = second.clone() {
                                println!("switching to {}", next);
                                dashboard.select_symbol(next);
                            }
                        }
                    }
                    DashboardUpdate::Movers { .. } => {
                        for m in dashboard.movers().movers() {
                            println!(
                                "  {:<6} {:<24} {:>10} {:>+7}% {:?}",
                                m.symbol,
                                m.display_name,
                                m.price.round_dp(2),
                                m.change_percent.round_dp(2),
                                m.direction
                            );
                        }
                    }
                }
            }
        }
    }

    dashboard.close().await;
    Ok(())
}
