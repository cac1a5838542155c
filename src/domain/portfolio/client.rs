//! Portfolio sub-client — holdings, quantity updates, valuation.

use crate::client::StockClient;
use crate::domain::portfolio::{
    aggregate_holdings, summarize, value_holding, Holding, PortfolioValuation, PortfolioValue,
};
use crate::domain::stock::Quote;
use crate::error::SdkError;
use crate::shared::{ApiMessage, Symbol};

pub struct Portfolio<'a> {
    pub(crate) client: &'a StockClient,
}

impl<'a> Portfolio<'a> {
    /// Current holdings, one entry per symbol.
    pub async fn holdings(&self) -> Result<Vec<Holding>, SdkError> {
        self.client.require_auth()?;
        let resp = self.client.http.get_portfolio().await?;
        Ok(aggregate_holdings(
            resp.portfolio.into_iter().map(Holding::from).collect(),
        ))
    }

    /// Overwrite the quantity held of `symbol`. The symbol must already be held.
    pub async fn update(&self, symbol: &Symbol, quantity: u32) -> Result<ApiMessage, SdkError> {
        self.client.require_auth()?;
        Ok(self.client.http.update_portfolio(symbol, quantity).await?)
    }

    /// Valuation computed by the server at current prices.
    pub async fn value(&self) -> Result<PortfolioValue, SdkError> {
        self.client.require_auth()?;
        Ok(self.client.http.get_portfolio_value().await?.into())
    }

    /// Day P/L per holding and overall, priced from live quotes.
    ///
    /// A holding whose quote fails is reported zeroed (`priced == false`)
    /// rather than failing the whole valuation.
    pub async fn valuation(&self) -> Result<PortfolioValuation, SdkError> {
        let holdings = self.holdings().await?;
        let mut rows = Vec::with_capacity(holdings.len());

        for holding in &holdings {
            let quote: Option<Quote> = match self.client.http.get_quote(&holding.symbol).await {
                Ok(resp) => Some(resp.into()),
                Err(e) => {
                    tracing::warn!("Quote for {} unavailable: {}", holding.symbol, e);
                    None
                }
            };
            rows.push(value_holding(holding, quote.as_ref()));
        }

        let summary = summarize(&rows);
        Ok(PortfolioValuation {
            holdings: rows,
            summary,
        })
    }
}
