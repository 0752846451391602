#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![forbid(unsafe_code)]
#![deny(unstable_features)]
#![warn(rust_2018_idioms, future_incompatible, nonstandard_style)]

//! onepassword-connect is a Rust client for the 1Password Connect server.
//!
//! # High-level features
//!
//! - Based on [`tokio`], [`hyper`] and [`hyper_rustls`] by default.
//! - [`hyper`] can be replaced using the [`HTTPClient`](client::HTTPClient) interface.
//! - Vaults, items and files can be looked up by title. A title that matches
//!   nothing fails with [`Error::NotFound`](error::Error::NotFound), a title
//!   shared by several entities fails with
//!   [`Error::AmbiguousTitle`](error::Error::AmbiguousTitle).
//! - Operations that need a newer server check the version it reports and
//!   fail with [`Error::VersionTooLow`](error::Error::VersionTooLow).
//!
//! ## Details
//!
//! - To create a Login item, make sure to use the Trait [`LoginItem`](models::item::LoginItem), so as to be able to call respective methods on [`ItemBuilder`](models::item::ItemBuilder).
//!
//!   ```
//!   # use onepassword_connect::{
//!   #    client::Client,
//!   #    models::item::{Item, ItemBuilder, ItemCategory, LoginItem},
//!   #    vaults,
//!   #    items,
//!   # };
//!   use onepassword_connect::error::ConnectResult;
//!
//!   async fn add_login_item(index: usize) -> ConnectResult<Item> {
//!        let client = Client::from_env()?;
//!
//!        let vaults = vaults::all(&client).await?;
//!        assert!(!vaults.is_empty());
//!
//!        let item = ItemBuilder::new(&vaults[index].id, ItemCategory::Login)
//!            .title("Secure server login")
//!            .username("Bob")
//!            .password("")
//!            .build()?;
//!
//!        items::add(&client, &vaults[index].id, &item).await
//!   }
//!   #
//!   # fn main() {}
//!   ```
//!
//! - Title lookups list with a server-side filter, then fetch the single
//!   match by id, so the returned record is always complete.
//!
//!   ```
//!   # use onepassword_connect::{client::Client, items};
//!   use onepassword_connect::error::{ConnectResult, Error};
//!
//!   async fn database_password(vault_id: &str) -> ConnectResult<Option<String>> {
//!        let client = Client::from_env()?;
//!
//!        match items::get_by_title(&client, vault_id, "Production DB").await {
//!            Ok(item) => Ok(item.get_value("password").map(str::to_string)),
//!            Err(Error::NotFound { .. }) => Ok(None),
//!            Err(err) => Err(err),
//!        }
//!   }
//!   #
//!   # fn main() {}
//!   ```
//!
//! # Examples
//!
//! Refer to `./demos`

pub mod client;
pub mod error;
pub mod files;
pub mod items;
pub mod models;
pub mod resolve;
pub mod vaults;
pub mod version;

#[cfg(test)]
mod testing;
