//! Location queries for the Admin API.

use tracing::instrument;

use super::{
    ShopifyClient, ShopifyError,
    conversions::convert_locations,
    queries::{GET_LOCATIONS, GET_LOCATIONS_QUERY},
    types::LocationsData,
};
use crate::location::Location;

impl ShopifyClient {
    /// Get up to 250 locations of the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_locations(&self) -> Result<Vec<Location>, ShopifyError> {
        let data: LocationsData = self
            .execute(GET_LOCATIONS, GET_LOCATIONS_QUERY, serde_json::json!({}))
            .await?;

        Ok(convert_locations(data))
    }
}
