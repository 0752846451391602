use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ConnectResult, Error};
use crate::resolve::Identified;

/// Category of an item, which decides its built-in fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum ItemCategory {
    Login,
    Password,
    ApiCredential,
    Server,
    Database,
    CreditCard,
    Membership,
    Passport,
    SoftwareLicense,
    OutdoorLicense,
    SecureNote,
    WirelessRouter,
    BankAccount,
    DriverLicense,
    Identity,
    RewardProgram,
    Document,
    EmailAccount,
    SocialSecurityNumber,
    MedicalRecord,
    SshKey,
    /// Any category this crate does not know about.
    #[default]
    #[serde(other)]
    Custom,
}

/// Reference to the vault an item lives in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemVault {
    /// The UUID of the vault.
    pub id: String,
}

/// A URL attached to an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemUrl {
    /// Optional label shown next to the URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Whether this is the item's primary URL.
    #[serde(default)]
    pub primary: bool,
    /// The URL itself.
    pub href: String,
}

/// A named group of fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemSection {
    /// Section identifier, unique within the item.
    pub id: String,
    /// Section label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A field's pointer to the section it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionRef {
    /// Identifier of an [`ItemSection`] on the same item.
    pub id: String,
}

/// One value slot on an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemField {
    /// Field identifier.
    #[serde(default)]
    pub id: String,
    /// Field type, e.g. `STRING` or `CONCEALED`.
    #[serde(default = "default_field_type")]
    pub r#type: String,
    /// Built-in purpose, e.g. `USERNAME` or `PASSWORD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Field label.
    #[serde(default)]
    pub label: String,
    /// Field value; absent for generated fields until the server fills them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Ask the server to generate the value.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub generate: bool,
    /// Section this field belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<SectionRef>,
}

fn default_field_type() -> String {
    "STRING".to_string()
}

/// A secret record.
///
/// List endpoints return summaries of this shape with `sections` and
/// `fields` left empty; fetch the item by id for the full record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// The UUID of the item, empty until the server assigns one.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Item title. Not guaranteed unique by the server.
    #[serde(default)]
    pub title: String,
    /// Item category.
    #[serde(default)]
    pub category: ItemCategory,
    /// Vault the item belongs to.
    #[serde(default)]
    pub vault: ItemVault,
    /// Whether the item is marked as a favorite.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub favorite: bool,
    /// Item tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Item version, bumped by the server on every change.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub version: u32,
    /// URLs attached to the item.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<ItemUrl>,
    /// Sections, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<ItemSection>,
    /// Fields, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<ItemField>,
    /// Date and time when the item was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Date and time when the item was last changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn is_zero(v: &u32) -> bool {
    *v == 0
}

impl Item {
    /// Looks up a field value by label.
    ///
    /// `path` is either a bare label (`"password"`) or `section.label`
    /// (`"example.other"`). An empty section part (`".password"`) selects
    /// fields outside any section.
    pub fn get_value(&self, path: &str) -> Option<&str> {
        let (section_label, field_label) = match path.split_once('.') {
            Some((section, field)) if !field.contains('.') => (Some(section), field),
            _ => (None, path),
        };

        let section_ids: Option<Vec<&str>> = match section_label {
            None | Some("") => None,
            Some(label) => {
                let ids: Vec<&str> = self
                    .sections
                    .iter()
                    .filter(|s| s.label.as_deref() == Some(label))
                    .map(|s| s.id.as_str())
                    .collect();
                if ids.is_empty() {
                    return None;
                }
                Some(ids)
            }
        };

        self.fields
            .iter()
            .filter(|f| f.label == field_label)
            .find(|f| match (section_label, &section_ids, &f.section) {
                (None, _, _) => true,
                (Some(""), _, section) => section.is_none(),
                (Some(_), Some(ids), Some(section)) => ids.contains(&section.id.as_str()),
                _ => false,
            })
            .and_then(|f| f.value.as_deref())
    }

    /// Checks that every field's section reference names a section on this item.
    pub fn validate_sections(&self) -> ConnectResult<()> {
        for field in &self.fields {
            if let Some(section) = &field.section {
                if !self.sections.iter().any(|s| s.id == section.id) {
                    return Err(Error::InvalidItem(format!(
                        "field {:?} references unknown section {:?}",
                        field.label, section.id
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Identified for Item {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Assembles a new [`Item`] ready to be passed to [`items::add`](crate::items::add).
#[derive(Debug, Clone)]
pub struct ItemBuilder {
    item: Item,
}

impl ItemBuilder {
    /// Starts an item of `category` in the vault `vault_id`.
    pub fn new(vault_id: &str, category: ItemCategory) -> Self {
        Self {
            item: Item {
                category,
                vault: ItemVault {
                    id: vault_id.to_string(),
                },
                ..Item::default()
            },
        }
    }

    /// Sets the item title.
    pub fn title(mut self, title: &str) -> Self {
        self.item.title = title.to_string();
        self
    }

    /// Adds a tag.
    pub fn tag(mut self, tag: &str) -> Self {
        self.item.tags.push(tag.to_string());
        self
    }

    /// Adds a URL; the first one added becomes primary.
    pub fn url(mut self, href: &str) -> Self {
        let primary = self.item.urls.is_empty();
        self.item.urls.push(ItemUrl {
            label: None,
            primary,
            href: href.to_string(),
        });
        self
    }

    /// Adds a section and returns its generated id alongside the builder.
    pub fn section(mut self, label: &str) -> (Self, String) {
        let id = Uuid::new_v4().to_string();
        self.item.sections.push(ItemSection {
            id: id.clone(),
            label: Some(label.to_string()),
        });
        (self, id)
    }

    /// Adds an arbitrary field.
    pub fn field(mut self, field: ItemField) -> Self {
        self.item.fields.push(field);
        self
    }

    /// Validates and returns the assembled item.
    pub fn build(&self) -> ConnectResult<Item> {
        if self.item.vault.id.is_empty() {
            return Err(Error::MissingIdentifier("vault id"));
        }
        if self.item.title.is_empty() {
            return Err(Error::InvalidItem("title must not be empty".to_string()));
        }
        self.item.validate_sections()?;

        Ok(self.item.clone())
    }

    fn purpose_field(mut self, id: &str, r#type: &str, purpose: &str, value: &str) -> Self {
        self.item.fields.retain(|f| f.id != id);
        self.item.fields.push(ItemField {
            id: id.to_string(),
            r#type: r#type.to_string(),
            purpose: Some(purpose.to_string()),
            label: id.to_string(),
            value: (!value.is_empty()).then(|| value.to_string()),
            generate: value.is_empty(),
            section: None,
        });
        self
    }
}

/// Builder methods for `LOGIN` items.
pub trait LoginItem {
    /// Sets the username.
    fn username(self, username: &str) -> Self;
    /// Sets the password; an empty value asks the server to generate one.
    fn password(self, password: &str) -> Self;
}

impl LoginItem for ItemBuilder {
    fn username(self, username: &str) -> Self {
        self.purpose_field("username", "STRING", "USERNAME", username)
    }

    fn password(self, password: &str) -> Self {
        self.purpose_field("password", "CONCEALED", "PASSWORD", password)
    }
}

/// Builder methods for `API_CREDENTIAL` items.
pub trait ApiCredentialItem {
    /// Sets the credential and the item title; an empty `key` asks the
    /// server to generate one.
    fn api_key(self, key: &str, title: &str) -> Self;
}

impl ApiCredentialItem for ItemBuilder {
    fn api_key(mut self, key: &str, title: &str) -> Self {
        self.item.title = title.to_string();
        self.item.fields.retain(|f| f.id != "credential");
        self.item.fields.push(ItemField {
            id: "credential".to_string(),
            r#type: "CONCEALED".to_string(),
            purpose: None,
            label: "credential".to_string(),
            value: (!key.is_empty()).then(|| key.to_string()),
            generate: key.is_empty(),
            section: None,
        });
        self
    }
}
