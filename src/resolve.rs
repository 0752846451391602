//! Title-based lookup shared by vaults, items and files.
//!
//! The server filters by title but neither enforces unique titles nor
//! returns complete records from a list call, so a lookup is two calls:
//! list with the title filter, then fetch the single match by id.

use std::fmt;
use std::future::Future;

use log::debug;

use crate::error::{ConnectResult, Error};

/// Kinds of entity that can be looked up by title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A vault; global scope.
    Vault,
    /// An item; scoped by vault.
    Item,
    /// A file; scoped by vault and item.
    File,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Vault => "vault",
            EntityKind::Item => "item",
            EntityKind::File => "file",
        })
    }
}

/// Anything with a server-assigned identifier.
pub trait Identified {
    /// The entity's identifier.
    fn id(&self) -> &str;
}

/// Resolves `title` to exactly one entity.
///
/// `list` must return the summaries matching `title` within the caller's
/// scope; `fetch` is called with the id of the single match and its result
/// is returned as is. `fetch` is never called unless exactly one summary
/// matched.
pub(crate) async fn by_title<S, T, L, LF, F, FF>(
    kind: EntityKind,
    title: &str,
    list: L,
    fetch: F,
) -> ConnectResult<T>
where
    S: Identified,
    L: FnOnce() -> LF,
    LF: Future<Output = ConnectResult<Vec<S>>>,
    F: FnOnce(String) -> FF,
    FF: Future<Output = ConnectResult<T>>,
{
    let mut matches = list().await?;

    match matches.len() {
        0 => Err(Error::NotFound {
            kind,
            title: title.to_string(),
        }),
        1 => {
            let id = matches.remove(0).id().to_string();
            debug!("resolved {} {:?} to {}", kind, title, id);
            fetch(id).await
        }
        count => Err(Error::AmbiguousTitle {
            kind,
            title: title.to_string(),
            count,
        }),
    }
}
