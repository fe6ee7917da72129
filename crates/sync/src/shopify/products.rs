//! Catalog pagination for the Admin API.

use tracing::instrument;

use super::{
    ShopifyClient, ShopifyError,
    conversions::convert_catalog_page,
    queries::{MAX_PAGE_SIZE, PRODUCTS_EXPORT, PRODUCTS_EXPORT_QUERY, ProductsExportVariables},
    types::ProductsData,
};
use crate::export::CatalogPage;

impl ShopifyClient {
    /// Get one page of products with their variants.
    ///
    /// # Arguments
    ///
    /// * `search` - Product search expression
    /// * `after` - Cursor of the previous page, `None` for the first page
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, search))]
    pub async fn get_catalog_page(
        &self,
        search: &str,
        after: Option<&str>,
    ) -> Result<CatalogPage, ShopifyError> {
        let variables = ProductsExportVariables {
            first: MAX_PAGE_SIZE,
            after,
            query: search,
        };

        let data: ProductsData = self
            .execute(PRODUCTS_EXPORT, PRODUCTS_EXPORT_QUERY, variables)
            .await?;

        Ok(convert_catalog_page(data))
    }
}
