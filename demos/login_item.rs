use onepassword_connect::error::ConnectResult;
use onepassword_connect::{
    client::Client,
    files, items,
    models::item::{ItemBuilder, ItemCategory, LoginItem},
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

    let item = ItemBuilder::new(vault_id, ItemCategory::Login)
        .title("Secure server login")
        .username("Bob")
        .password("")
        .tag("connect-sdk-rust")
        .build()?;

    let new_item = items::add(&client, vault_id, &item).await?;
    assert_eq!(new_item.title, "Secure server login");
    println!("created item {} at {:?}", new_item.id, new_item.created_at);

    tokio::time::sleep(std::time::Duration::new(SLEEP_DELAY, 0)).await;

    let file = files::upload(&client, vault_id, &new_item.id, "notes.txt", b"hello").await?;
    let content = files::content(&client, &file).await?;
    assert_eq!(content, b"hello");

    // Just as a clean up measure, we remove the item created in the this example
    tokio::time::sleep(std::time::Duration::new(SLEEP_DELAY, 0)).await;

    items::remove(&client, vault_id, &new_item.id).await?;

    Ok(())
}
