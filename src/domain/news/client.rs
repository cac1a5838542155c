//! News sub-client.

use crate::client::StockClient;
use crate::domain::news::NewsArticle;
use crate::error::SdkError;
use crate::shared::Symbol;

pub struct News<'a> {
    pub(crate) client: &'a StockClient,
}

impl<'a> News<'a> {
    /// Headlines whose title mentions any of `symbols`. Public endpoint.
    pub async fn for_symbols(&self, symbols: &[Symbol]) -> Result<Vec<NewsArticle>, SdkError> {
        if symbols.is_empty() {
            return Err(SdkError::Validation(
                "At least one symbol is required".to_string(),
            ));
        }
        let joined = symbols
            .iter()
            .map(Symbol::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let resp = self.client.http.get_news(&joined).await?;
        Ok(resp.into_iter().map(NewsArticle::from).collect())
    }
}
