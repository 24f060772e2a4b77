//! Integration tests for saved addresses and the single-default invariant.

#![allow(clippy::unwrap_used)]

use dishdash_client::models::{Address, AddressChanges, NewAddress};
use dishdash_client::services::CheckoutRequest;
use dishdash_core::{MenuItemId, PaymentMethod, PhoneNumber};
use dishdash_integration_tests::TestContext;

fn new_address(name: &str, is_default: bool) -> NewAddress {
    NewAddress {
        name: name.to_owned(),
        address: format!("{name} Street 1"),
        phone: PhoneNumber::parse("0501234567").unwrap(),
        is_default,
    }
}

fn default_count(addresses: &[Address]) -> usize {
    addresses.iter().filter(|a| a.is_default).count()
}

#[tokio::test]
async fn test_exactly_one_default_through_mutations() {
    let ctx = TestContext::new().await;
    let repo = ctx.state.addresses();

    let home = repo.add(new_address("Home", false)).await.unwrap();
    assert!(home.is_default);

    let work = repo.add(new_address("Work", true)).await.unwrap();
    let gym = repo.add(new_address("Gym", false)).await.unwrap();
    assert_eq!(default_count(&repo.all().await), 1);
    assert_eq!(repo.default_address().await.unwrap().id, work.id);

    repo.set_default(&gym.id).await.unwrap();
    assert_eq!(default_count(&repo.all().await), 1);

    repo.remove(&gym.id).await.unwrap();
    let remaining = repo.all().await;
    assert_eq!(default_count(&remaining), 1);
    assert_eq!(repo.default_address().await.unwrap().id, home.id);

    repo.update(
        &work.id,
        AddressChanges {
            name: Some("Office".to_owned()),
            ..AddressChanges::default()
        },
    )
    .await
    .unwrap();

    let reopened = ctx.reopen().await;
    let stored = reopened.addresses().all().await;
    assert_eq!(stored.len(), 2);
    assert_eq!(default_count(&stored), 1);
    assert!(stored.iter().any(|a| a.name == "Office"));
}

#[tokio::test]
async fn test_removing_last_address_leaves_empty_list() {
    let ctx = TestContext::new().await;
    let only = ctx
        .state
        .addresses()
        .add(new_address("Home", false))
        .await
        .unwrap();
    ctx.state.addresses().remove(&only.id).await.unwrap();

    let reopened = ctx.reopen().await;
    assert!(reopened.addresses().all().await.is_empty());
    assert!(reopened.addresses().default_address().await.is_none());
}

#[tokio::test]
async fn test_stored_list_without_default_is_repaired_on_load() {
    let ctx = TestContext::new().await;
    std::fs::write(
        ctx.key_path("userAddresses"),
        r#"[
            {"id":"1","name":"A","address":"A St","phone":"0501234567","isDefault":false},
            {"id":"2","name":"B","address":"B St","phone":"0501234567","isDefault":false}
        ]"#,
    )
    .unwrap();

    let reopened = ctx.reopen().await;
    let addresses = reopened.addresses().all().await;
    assert_eq!(addresses.len(), 2);
    assert_eq!(default_count(&addresses), 1);
}

#[tokio::test]
async fn test_checkout_uses_default_address() {
    let ctx = TestContext::new().await;
    ctx.state
        .addresses()
        .add(new_address("Home", false))
        .await
        .unwrap();
    let item = ctx
        .state
        .catalog()
        .find_item_anywhere(&MenuItemId::new("gb-2"))
        .unwrap();
    ctx.state.cart().add(item, 1).await.unwrap();

    let order = ctx
        .state
        .checkout()
        .checkout(CheckoutRequest {
            phone: None,
            payment_method: PaymentMethod::Wallet,
            address: None,
        })
        .await
        .unwrap();
    assert_eq!(order.delivery_address, "Home Street 1");
    assert_eq!(order.phone.normalized(), "0501234567");
}
