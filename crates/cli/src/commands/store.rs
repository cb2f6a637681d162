//! Store profile commands.

use storekeeper_merchant::profile::{ProfileEditor, ProfileForm};

use super::{Context, prompt_with_default};

/// Print the store profile.
pub async fn show(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let session = ctx.require_session()?;
    let editor = ProfileEditor::new(ctx.api.clone());

    let record = editor.load(session.store_id()).await?;
    println!("Store:    {}", record.name);
    println!("Owner:    {}", record.owner);
    println!("Username: {}", record.username);
    println!("Address:  {}", record.address.as_deref().unwrap_or("-"));
    println!("Phone:    {}", record.phone.as_deref().unwrap_or("-"));
    println!("Email:    {}", record.email.as_deref().unwrap_or("-"));
    println!("Category: {}", record.category.as_deref().unwrap_or("-"));
    println!("Active:   {}", record.is_active);
    match (&record.location_lat, &record.location_lng) {
        (Some(lat), Some(lng)) => println!("Location: {lat}, {lng}"),
        _ => println!("Location: -"),
    }
    Ok(())
}

/// Edit profile fields interactively; only changed fields are sent.
pub async fn edit(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let session = ctx.require_session()?;
    let editor = ProfileEditor::new(ctx.api.clone());

    let original = editor.load(session.store_id()).await?;
    let current = ProfileForm::from_record(&original);

    let form = ProfileForm {
        name: prompt_with_default("Name", &current.name)?,
        owner: prompt_with_default("Owner", &current.owner)?,
        address: prompt_with_default("Address", &current.address)?,
        phone: prompt_with_default("Phone", &current.phone)?,
        email: prompt_with_default("Email", &current.email)?,
        category: prompt_with_default("Category", &current.category)?,
        image: current.image.clone(),
        location_lat: current.location_lat.clone(),
        location_lng: current.location_lng.clone(),
    };

    match editor.save(session.store_id(), &original, &form).await? {
        Some(updated) => println!("Saved. Store is now \"{}\".", updated.name),
        None => println!("Nothing changed."),
    }
    Ok(())
}

/// Save the store's coordinates.
pub async fn set_location(
    ctx: &Context,
    lat: &str,
    lng: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = ctx.require_session()?;
    let editor = ProfileEditor::new(ctx.api.clone());

    let record = editor.save_location(session.store_id(), lat, lng).await?;
    println!(
        "Location saved: {}, {}",
        record.location_lat.as_deref().unwrap_or(lat),
        record.location_lng.as_deref().unwrap_or(lng)
    );
    Ok(())
}
