use chrono::{DateTime, Utc};

use serde::{Deserialize, Serialize};

use crate::resolve::Identified;

/// Defines a Vault object
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VaultData {
    /// The UUID of the vault.
    pub id: String,
    /// The name of the vault.
    #[serde(default)]
    pub name: String,
    /// The description of the vault.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The version of the vault metadata.
    #[serde(default)]
    pub attribute_version: u32,
    /// The version of the vault contents.
    #[serde(default)]
    pub content_version: u32,
    /// Number of active items in the vault.
    #[serde(default)]
    pub items: u32,
    /// The type of vault.
    #[serde(default)]
    pub r#type: String,
    /// Date and time when the vault was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Date and time when the vault or its contents were last changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identified for VaultData {
    fn id(&self) -> &str {
        &self.id
    }
}
