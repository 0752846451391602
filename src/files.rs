//! File attachment operations.
//!
//! The files endpoints exist from server version 1.3.0 onwards; every call
//! here fails with [`VersionTooLow`](crate::error::Error::VersionTooLow)
//! against an older server.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hyper::Method;
use serde::Serialize;

use crate::client::{require_id, title_filter, Client, HTTPClient};
use crate::error::ConnectResult;
use crate::models::File;
use crate::resolve::{self, EntityKind};
use crate::version::{Version, FILES_MINIMUM_VERSION};

const MINIMUM: Option<Version> = Some(FILES_MINIMUM_VERSION);

fn files_path(vault_id: &str, item_id: &str) -> ConnectResult<String> {
    require_id(vault_id, "vault id")?;
    require_id(item_id, "item id")?;
    Ok(format!("/v1/vaults/{}/items/{}/files", vault_id, item_id))
}

/// Lists the files attached to an item.
pub async fn all<T: HTTPClient>(
    client: &Client<T>,
    vault_id: &str,
    item_id: &str,
) -> ConnectResult<Vec<File>> {
    let path = files_path(vault_id, item_id)?;
    client.get_json(&path, MINIMUM).await
}

/// Lists the files named `title` on an item; zero or more.
pub async fn by_title<T: HTTPClient>(
    client: &Client<T>,
    vault_id: &str,
    item_id: &str,
    title: &str,
) -> ConnectResult<Vec<File>> {
    let path = format!("{}?{}", files_path(vault_id, item_id)?, title_filter(title));
    client.get_json(&path, MINIMUM).await
}

/// Fetches a file record by id. The content is not included.
pub async fn get<T: HTTPClient>(
    client: &Client<T>,
    vault_id: &str,
    item_id: &str,
    file_id: &str,
) -> ConnectResult<File> {
    let path = files_path(vault_id, item_id)?;
    require_id(file_id, "file id")?;
    client
        .get_json(&format!("{}/{}", path, file_id), MINIMUM)
        .await
}

/// Fetches the one file named `title` on an item.
pub async fn get_by_title<T: HTTPClient>(
    client: &Client<T>,
    vault_id: &str,
    item_id: &str,
    title: &str,
) -> ConnectResult<File> {
    resolve::by_title(
        EntityKind::File,
        title,
        || by_title(client, vault_id, item_id, title),
        |id| async move { get(client, vault_id, item_id, &id).await },
    )
    .await
}

/// Downloads the bytes behind `file.content_path`.
///
/// `file` is not modified; attach the result with
/// [`File::with_content`] to keep it.
pub async fn content<T: HTTPClient>(client: &Client<T>, file: &File) -> ConnectResult<Vec<u8>> {
    require_id(&file.content_path, "file content path")?;
    client.get_bytes(&file.content_path, MINIMUM).await
}

#[derive(Serialize)]
struct Upload<'a> {
    name: &'a str,
    content: String,
}

/// Attaches `content` to an item under `name` and returns the new record.
pub async fn upload<T: HTTPClient>(
    client: &Client<T>,
    vault_id: &str,
    item_id: &str,
    name: &str,
    content: &[u8],
) -> ConnectResult<File> {
    let path = files_path(vault_id, item_id)?;
    let payload = Upload {
        name,
        content: STANDARD.encode(content),
    };
    client
        .send_json(Method::POST, &path, &payload, MINIMUM)
        .await
}

/// Deletes a file from an item.
pub async fn remove<T: HTTPClient>(
    client: &Client<T>,
    vault_id: &str,
    item_id: &str,
    file_id: &str,
) -> ConnectResult<()> {
    let path = files_path(vault_id, item_id)?;
    require_id(file_id, "file id")?;
    client.delete(&format!("{}/{}", path, file_id), MINIMUM).await
}
