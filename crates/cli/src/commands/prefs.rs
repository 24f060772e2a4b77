//! Preference commands.

use dishdash_client::state::AppState;
use dishdash_core::LanguageCode;

use super::CommandError;

/// Print every preference.
///
/// # Errors
///
/// Returns an error if a preference cannot be read.
#[allow(clippy::print_stdout)]
pub async fn show(state: &AppState) -> Result<(), CommandError> {
    let prefs = state.preferences().snapshot().await?;

    println!(
        "Language:           {}{}",
        prefs.app_language,
        if prefs.app_language.is_rtl() { " (rtl)" } else { "" }
    );
    println!(
        "Selected language:  {}",
        prefs
            .selected_language
            .as_ref()
            .map_or("-", LanguageCode::as_str)
    );
    println!("Seen onboarding:    {}", prefs.has_seen_onboarding);
    println!("Profile image:      {}", prefs.profile_image);
    match &prefs.location {
        Some(location) => println!(
            "Location:           {} ({:.4}, {:.4})",
            location.address, location.latitude, location.longitude
        ),
        None => println!("Location:           -"),
    }
    println!("Location confirmed: {}", prefs.location_confirmed);
    println!("Location selected:  {}", prefs.location_selection_completed);
    Ok(())
}

/// Switch the app language.
///
/// # Errors
///
/// Returns an error for an invalid code or a storage failure.
#[allow(clippy::print_stdout)]
pub async fn language(state: &AppState, code: &str) -> Result<(), CommandError> {
    let language = LanguageCode::parse(code)
        .map_err(|e| CommandError::InvalidArgument(e.to_string()))?;
    state.preferences().set_language(&language).await?;
    println!("Language set to {language}");
    Ok(())
}

/// Record whether onboarding has been seen.
///
/// # Errors
///
/// Returns an error if the flag cannot be saved.
pub async fn onboarded(state: &AppState, seen: bool) -> Result<(), CommandError> {
    state.preferences().set_seen_onboarding(seen).await?;
    Ok(())
}

/// Remove every preference.
///
/// # Errors
///
/// Returns an error if a key cannot be removed.
#[allow(clippy::print_stdout)]
pub async fn reset(state: &AppState) -> Result<(), CommandError> {
    state.preferences().reset().await?;
    println!("Preferences reset");
    Ok(())
}
