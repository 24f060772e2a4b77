//! Location command.

use dishdash_client::state::AppState;
use dishdash_core::Coordinates;

use super::CommandError;

/// Reverse-geocode coordinates and save the result as the user's location.
///
/// # Errors
///
/// Returns an error for out-of-range coordinates or if the location cannot
/// be saved. Geocoding failures fall back to a placeholder address.
#[allow(clippy::print_stdout)]
pub async fn locate(state: &AppState, lat: f64, lon: f64) -> Result<(), CommandError> {
    let coordinates = Coordinates::new(lat, lon)
        .map_err(|e| CommandError::InvalidArgument(e.to_string()))?;

    let location = state.locate_and_save(coordinates).await?;
    match &location.city {
        Some(city) => println!("{} ({city})", location.address),
        None => println!("{}", location.address),
    }
    if location.is_fallback() {
        println!("Address lookup failed; saved coordinates only");
    }
    Ok(())
}
