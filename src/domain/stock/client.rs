//! Stocks sub-client — quotes, history, search.

use crate::client::StockClient;
use crate::domain::stock::{ClosePoint, ListedSymbol, Quote, SearchResult};
use crate::error::SdkError;
use crate::shared::Symbol;

/// Shortest query the search endpoint accepts.
pub const MIN_SEARCH_LEN: usize = 2;

pub struct Stocks<'a> {
    pub(crate) client: &'a StockClient,
}

impl<'a> Stocks<'a> {
    /// Current quote. Public endpoint, no token needed.
    pub async fn quote(&self, symbol: &Symbol) -> Result<Quote, SdkError> {
        let resp = self.client.http.get_quote(symbol).await?;
        Ok(resp.into())
    }

    /// Last month of daily closes, oldest first.
    pub async fn history(&self, symbol: &Symbol) -> Result<Vec<ClosePoint>, SdkError> {
        self.client.require_auth()?;
        let resp = self.client.http.get_history(symbol).await?;
        Ok(resp.data.into_iter().map(ClosePoint::from).collect())
    }

    /// Equity search by name or ticker.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SdkError> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_LEN {
            return Err(SdkError::Validation(format!(
                "Search query must be at least {} characters",
                MIN_SEARCH_LEN
            )));
        }
        let resp = self.client.http.search_stocks(query).await?;
        Ok(resp.results)
    }

    /// Symbols stored for an exchange (defaults to `US` server-side).
    pub async fn symbols(&self, exchange: Option<&str>) -> Result<Vec<ListedSymbol>, SdkError> {
        Ok(self.client.http.get_symbols(exchange).await?)
    }
}
