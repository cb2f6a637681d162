//! Product catalog commands.

use storekeeper_core::ProductId;
use storekeeper_merchant::catalog::{CatalogError, CatalogService, ProductDraft};

use super::{Context, prompt, prompt_with_default};

/// Print the store's products.
pub async fn list(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let session = ctx.require_session()?;
    let catalog = CatalogService::new(ctx.api.clone());

    let products = catalog.list(session.store_id()).await?;
    if products.is_empty() {
        println!("No products yet.");
        return Ok(());
    }

    for product in products {
        let category = product.category.as_deref().unwrap_or("-");
        println!(
            "{}  {:30}  {:>10}  {}",
            product.id, product.name, product.price, category
        );
    }
    Ok(())
}

/// Create a product from interactive prompts.
pub async fn add(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let session = ctx.require_session()?;
    let catalog = CatalogService::new(ctx.api.clone());

    let mut draft = ProductDraft {
        name: prompt("Name: ")?,
        description: prompt("Description (optional): ")?,
        price: prompt("Price: ")?,
        category: prompt("Category (optional): ")?,
        image: None,
    };
    attach_image(ctx, &mut draft).await?;

    match catalog.create(session.store_id(), &draft).await {
        Ok(product) => println!("Created product {}", product.id),
        Err(CatalogError::Invalid(errors)) => print_field_errors(&errors),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Edit an existing product from interactive prompts.
pub async fn update(ctx: &Context, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_session()?;
    let catalog = CatalogService::new(ctx.api.clone());
    let product_id = ProductId::new(id);

    let current = ctx.api.fetch_product(&product_id).await?;

    let mut draft = ProductDraft {
        name: prompt_with_default("Name", &current.name)?,
        description: prompt_with_default(
            "Description",
            current.description.as_deref().unwrap_or(""),
        )?,
        price: prompt_with_default("Price", &current.price.to_string())?,
        category: prompt_with_default("Category", current.category.as_deref().unwrap_or(""))?,
        image: current.image.clone(),
    };
    attach_image(ctx, &mut draft).await?;

    match catalog.update(&product_id, &draft).await {
        Ok(product) => println!("Updated product {}", product.id),
        Err(CatalogError::Invalid(errors)) => print_field_errors(&errors),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Delete a product.
pub async fn delete(ctx: &Context, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_session()?;
    let catalog = CatalogService::new(ctx.api.clone());

    catalog.delete(&ProductId::new(id)).await?;
    println!("Deleted product {id}");
    Ok(())
}

/// Optionally upload a local image file and attach the result to the draft.
async fn attach_image(
    ctx: &Context,
    draft: &mut ProductDraft,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = prompt("Image file (optional): ")?;
    if path.is_empty() {
        return Ok(());
    }

    let bytes = std::fs::read(&path)?;
    let name = std::path::Path::new(&path)
        .file_name()
        .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());

    let source = ctx.images.upload_or_fallback(&name, &bytes, &path).await;
    if source.is_fallback() {
        println!("Image upload failed; keeping the local reference instead.");
    }
    draft.image = Some(source.as_str().to_string());
    Ok(())
}

fn print_field_errors(errors: &[storekeeper_merchant::catalog::FieldError]) {
    for error in errors {
        println!("  {:?}: {}", error.field, error.message);
    }
}
