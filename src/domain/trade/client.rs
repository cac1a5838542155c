//! Trading sub-client — buy, sell, history, trending.

use crate::client::StockClient;
use crate::domain::trade::{TradeAction, TradeRecord, TradeRequest};
use crate::error::SdkError;
use crate::shared::{ApiMessage, Symbol};

pub struct Trading<'a> {
    pub(crate) client: &'a StockClient,
}

impl<'a> Trading<'a> {
    pub async fn buy(&self, symbol: &Symbol, quantity: u32) -> Result<ApiMessage, SdkError> {
        self.execute(TradeAction::Buy, symbol, quantity).await
    }

    /// Sells fail with a `BadRequest` when fewer shares are held.
    pub async fn sell(&self, symbol: &Symbol, quantity: u32) -> Result<ApiMessage, SdkError> {
        self.execute(TradeAction::Sell, symbol, quantity).await
    }

    pub async fn execute(
        &self,
        action: TradeAction,
        symbol: &Symbol,
        quantity: u32,
    ) -> Result<ApiMessage, SdkError> {
        if quantity == 0 {
            return Err(SdkError::Validation(
                "Quantity must be greater than zero".to_string(),
            ));
        }
        self.client.require_auth()?;

        let request = TradeRequest {
            symbol: symbol.clone(),
            quantity,
        };
        let ack = self.client.http.trade(action, &request).await?;
        tracing::info!("{} {} x{}: {}", action, symbol, quantity, ack.message);
        Ok(ack)
    }

    /// Executed trades, oldest first. Entries that fail to parse are skipped.
    pub async fn history(&self) -> Result<Vec<TradeRecord>, SdkError> {
        self.client.require_auth()?;
        let resp = self.client.http.get_trade_history().await?;
        Ok(resp
            .trade_history
            .into_iter()
            .filter_map(|raw| match TradeRecord::try_from(raw) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Skipping trade record: {}", e);
                    None
                }
            })
            .collect())
    }

    /// Up to ten symbols the backend currently lists as trending.
    pub async fn trending(&self) -> Result<Vec<Symbol>, SdkError> {
        self.client.require_auth()?;
        Ok(self.client.http.get_trending().await?.trending_stocks)
    }
}
