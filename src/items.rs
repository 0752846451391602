//! Item operations.

use hyper::Method;

use crate::client::{require_id, title_filter, Client, HTTPClient};
use crate::error::ConnectResult;
use crate::models::Item;
use crate::resolve::{self, EntityKind};

/// Lists item summaries in a vault.
///
/// Summaries carry no sections or fields; use [`get`] for the full record.
pub async fn all<T: HTTPClient>(client: &Client<T>, vault_id: &str) -> ConnectResult<Vec<Item>> {
    require_id(vault_id, "vault id")?;
    client
        .get_json(&format!("/v1/vaults/{}/items", vault_id), None)
        .await
}

/// Lists summaries of the items titled `title` in a vault; zero or more.
pub async fn by_title<T: HTTPClient>(
    client: &Client<T>,
    vault_id: &str,
    title: &str,
) -> ConnectResult<Vec<Item>> {
    require_id(vault_id, "vault id")?;
    let path = format!("/v1/vaults/{}/items?{}", vault_id, title_filter(title));
    client.get_json(&path, None).await
}

/// Fetches the full item by id.
pub async fn get<T: HTTPClient>(
    client: &Client<T>,
    vault_id: &str,
    item_id: &str,
) -> ConnectResult<Item> {
    require_id(vault_id, "vault id")?;
    require_id(item_id, "item id")?;
    client
        .get_json(&format!("/v1/vaults/{}/items/{}", vault_id, item_id), None)
        .await
}

/// Fetches the one item titled `title` in a vault.
pub async fn get_by_title<T: HTTPClient>(
    client: &Client<T>,
    vault_id: &str,
    title: &str,
) -> ConnectResult<Item> {
    resolve::by_title(
        EntityKind::Item,
        title,
        || by_title(client, vault_id, title),
        |id| async move { get(client, vault_id, &id).await },
    )
    .await
}

/// Creates `item` in a vault and returns the server's copy, with its
/// assigned id and timestamps. `item` itself is left as is.
pub async fn add<T: HTTPClient>(
    client: &Client<T>,
    vault_id: &str,
    item: &Item,
) -> ConnectResult<Item> {
    require_id(vault_id, "vault id")?;
    item.validate_sections()?;
    client
        .send_json(
            Method::POST,
            &format!("/v1/vaults/{}/items", vault_id),
            item,
            None,
        )
        .await
}

/// Replaces the stored item with `item` and returns the server's copy.
pub async fn update<T: HTTPClient>(
    client: &Client<T>,
    vault_id: &str,
    item: &Item,
) -> ConnectResult<Item> {
    require_id(vault_id, "vault id")?;
    require_id(&item.id, "item id")?;
    item.validate_sections()?;
    client
        .send_json(
            Method::PUT,
            &format!("/v1/vaults/{}/items/{}", vault_id, item.id),
            item,
            None,
        )
        .await
}

/// Deletes an item.
pub async fn remove<T: HTTPClient>(
    client: &Client<T>,
    vault_id: &str,
    item_id: &str,
) -> ConnectResult<()> {
    require_id(vault_id, "vault id")?;
    require_id(item_id, "item id")?;
    client
        .delete(&format!("/v1/vaults/{}/items/{}", vault_id, item_id), None)
        .await
}
