use onepassword_connect::error::ConnectResult;
use onepassword_connect::{
    client::Client,
    items,
    models::item::{ApiCredentialItem, ItemBuilder, ItemCategory},
    vaults,
};

const SLEEP_DELAY: u64 = 4; // seconds

#[tokio::main]
async fn main() -> ConnectResult<()> {
    env_logger::init();

    let client = Client::from_env()?;

    let vaults = vaults::all(&client).await?;
    assert!(!vaults.is_empty());
    let vault_id = &vaults[0].id;

    let item = ItemBuilder::new(vault_id, ItemCategory::ApiCredential)
        .api_key("smelly-socks", "Dell XYZ")
        .build()?;

    let new_item = items::add(&client, vault_id, &item).await?;
    assert_eq!(new_item.title, "Dell XYZ");

    tokio::time::sleep(std::time::Duration::new(SLEEP_DELAY, 0)).await;

    // The title is only ours if nobody else picked it; get_by_title says so.
    let item = items::get_by_title(&client, vault_id, "Dell XYZ").await?;
    let fields: Vec<_> = item.fields.iter().filter(|f| f.value.is_some()).collect();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].r#type, "CONCEALED");
    assert_eq!(item.get_value("credential"), Some("smelly-socks"));

    // Just as a clean up measure, we remove the item created in the this example
    tokio::time::sleep(std::time::Duration::new(SLEEP_DELAY, 0)).await;

    items::remove(&client, vault_id, &new_item.id).await?;

    Ok(())
}
