//! Vault operations.

use crate::client::{require_id, title_filter, Client, HTTPClient};
use crate::error::ConnectResult;
use crate::models::VaultData;
use crate::resolve::{self, EntityKind};

/// Lists every vault the token can access.
pub async fn all<T: HTTPClient>(client: &Client<T>) -> ConnectResult<Vec<VaultData>> {
    client.get_json("/v1/vaults", None).await
}

/// Lists the vaults named `title`; zero or more.
pub async fn by_title<T: HTTPClient>(
    client: &Client<T>,
    title: &str,
) -> ConnectResult<Vec<VaultData>> {
    client
        .get_json(&format!("/v1/vaults?{}", title_filter(title)), None)
        .await
}

/// Fetches a vault by id.
pub async fn get<T: HTTPClient>(client: &Client<T>, vault_id: &str) -> ConnectResult<VaultData> {
    require_id(vault_id, "vault id")?;
    client
        .get_json(&format!("/v1/vaults/{}", vault_id), None)
        .await
}

/// Fetches the one vault named `title`.
///
/// Fails with [`NotFound`](crate::error::Error::NotFound) or
/// [`AmbiguousTitle`](crate::error::Error::AmbiguousTitle) unless exactly one
/// vault carries the title.
pub async fn get_by_title<T: HTTPClient>(
    client: &Client<T>,
    title: &str,
) -> ConnectResult<VaultData> {
    resolve::by_title(
        EntityKind::Vault,
        title,
        || by_title(client, title),
        |id| async move { get(client, &id).await },
    )
    .await
}
