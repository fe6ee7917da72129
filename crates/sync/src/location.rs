//! Location resolution by display name.

use replenish_core::LocationId;
use tracing::instrument;

use crate::shopify::{ShopifyClient, ShopifyError};

/// A store location as returned by the location enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
}

/// Anything that can enumerate the store's locations.
#[allow(async_fn_in_trait)]
pub trait LocationSource {
    /// Up to 250 locations, in the order the store returns them.
    async fn locations(&self) -> Result<Vec<Location>, ShopifyError>;
}

impl LocationSource for ShopifyClient {
    async fn locations(&self) -> Result<Vec<Location>, ShopifyError> {
        self.get_locations().await
    }
}

/// Resolve a location name to its ID.
///
/// Matching is exact and case-sensitive after trimming both sides; the first
/// matching location wins.
///
/// # Errors
///
/// Returns an error if the location query fails.
#[instrument(skip(source))]
pub async fn resolve_location_id<S: LocationSource>(
    source: &S,
    name: &str,
) -> Result<Option<LocationId>, ShopifyError> {
    let wanted = name.trim();
    let locations = source.locations().await?;

    Ok(locations
        .into_iter()
        .find(|location| location.name.trim() == wanted)
        .map(|location| location.id))
}

/// List every location name, for reporting a failed resolution.
///
/// Never fails: a query error is logged and yields an empty list.
#[instrument(skip(source))]
pub async fn list_location_names<S: LocationSource>(source: &S) -> Vec<String> {
    match source.locations().await {
        Ok(locations) => locations.into_iter().map(|location| location.name).collect(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to list locations");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct FakeLocations(Option<Vec<Location>>);

    impl LocationSource for FakeLocations {
        async fn locations(&self) -> Result<Vec<Location>, ShopifyError> {
            self.0.clone().ok_or(ShopifyError::MissingData)
        }
    }

    fn location(id: &str, name: &str) -> Location {
        Location {
            id: LocationId::new(id),
            name: name.to_string(),
        }
    }

    fn store() -> FakeLocations {
        FakeLocations(Some(vec![
            location("gid://shopify/Location/1", "Warehouse"),
            location("gid://shopify/Location/2", " Autospec 4x4 Penrith "),
            location("gid://shopify/Location/3", "Autospec 4x4 Penrith"),
        ]))
    }

    #[tokio::test]
    async fn test_resolve_trims_and_takes_first_match() {
        let id = resolve_location_id(&store(), "Autospec 4x4 Penrith  ")
            .await
            .unwrap();
        assert_eq!(id, Some(LocationId::new("gid://shopify/Location/2")));
    }

    #[tokio::test]
    async fn test_resolve_is_case_sensitive() {
        let id = resolve_location_id(&store(), "warehouse").await.unwrap();
        assert_eq!(id, None);
    }

    #[tokio::test]
    async fn test_resolve_propagates_errors() {
        let result = resolve_location_id(&FakeLocations(None), "Warehouse").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_names_degrades_to_empty() {
        assert!(list_location_names(&FakeLocations(None)).await.is_empty());
        assert_eq!(list_location_names(&store()).await.len(), 3);
    }
}
