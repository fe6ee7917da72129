//! `replenish locations`

use replenish_sync::{ShopifyClient, ShopifyError, SyncConfig};

/// Print every location name, one per line, marking the configured one.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the query fails.
#[allow(clippy::print_stdout)]
pub async fn run(config: &SyncConfig) -> Result<(), ShopifyError> {
    let client = ShopifyClient::new(&config.shopify)?;

    for location in client.get_locations().await? {
        let marker = if location.name.trim() == config.location_name {
            "*"
        } else {
            " "
        };
        println!("{marker} {}\t{}", location.name, location.id);
    }

    Ok(())
}
