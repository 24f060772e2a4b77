//! Saved address commands.

use dishdash_client::models::{AddressChanges, NewAddress};
use dishdash_client::state::AppState;
use dishdash_core::{AddressId, PhoneNumber};

use super::CommandError;

/// List saved addresses; the default is marked with `*`.
#[allow(clippy::print_stdout)]
pub async fn list(state: &AppState) {
    let addresses = state.addresses().all().await;
    if addresses.is_empty() {
        println!("No saved addresses");
        return;
    }
    for address in addresses {
        let marker = if address.is_default { '*' } else { ' ' };
        println!(
            "{marker} {:<14} {:<10} {}  ({})",
            address.id.as_str(),
            address.name,
            address.address,
            address.phone
        );
    }
}

/// Save a new address.
///
/// # Errors
///
/// Returns an error for an invalid phone number, blank fields, or a storage
/// failure.
#[allow(clippy::print_stdout)]
pub async fn add(
    state: &AppState,
    name: String,
    address: String,
    phone: &str,
    is_default: bool,
) -> Result<(), CommandError> {
    let phone = PhoneNumber::parse(phone)
        .map_err(|e| CommandError::InvalidArgument(format!("phone: {e}")))?;

    let saved = state
        .addresses()
        .add(NewAddress {
            name,
            address,
            phone,
            is_default,
        })
        .await?;

    println!(
        "Saved {} ({}){}",
        saved.name,
        saved.id,
        if saved.is_default { " as default" } else { "" }
    );
    Ok(())
}

/// Change fields of a saved address.
///
/// # Errors
///
/// Returns an error for an invalid phone number, an unknown ID, blank
/// fields, or a storage failure.
#[allow(clippy::print_stdout)]
pub async fn edit(
    state: &AppState,
    id: &str,
    name: Option<String>,
    address: Option<String>,
    phone: Option<&str>,
) -> Result<(), CommandError> {
    let phone = phone
        .map(PhoneNumber::parse)
        .transpose()
        .map_err(|e| CommandError::InvalidArgument(format!("phone: {e}")))?;

    let updated = state
        .addresses()
        .update(
            &AddressId::new(id),
            AddressChanges {
                name,
                address,
                phone,
            },
        )
        .await?;
    println!("Updated {} ({})", updated.name, updated.address);
    Ok(())
}

/// Delete an address.
///
/// # Errors
///
/// Returns an error if the address does not exist or cannot be saved.
#[allow(clippy::print_stdout)]
pub async fn remove(state: &AppState, id: &str) -> Result<(), CommandError> {
    state.addresses().remove(&AddressId::new(id)).await?;
    println!("Removed address {id}");
    Ok(())
}

/// Make an address the default.
///
/// # Errors
///
/// Returns an error if the address does not exist or cannot be saved.
#[allow(clippy::print_stdout)]
pub async fn set_default(state: &AppState, id: &str) -> Result<(), CommandError> {
    let address = state.addresses().set_default(&AddressId::new(id)).await?;
    println!("{} is now the default address", address.name);
    Ok(())
}
