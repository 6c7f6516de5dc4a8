//! Subcommand handlers. Each one drives the same form orchestrators a UI
//! would, then prints a short plain-text result.

use std::path::PathBuf;

use anyhow::Context;
use atelier_client::forms::{CategoryForm, ProductForm, SettingsForm};
use atelier_client::AdminApi;
use atelier_core::draft::{ImageRef, ProductDraft};
use atelier_core::listing::SearchQuery;
use atelier_core::password::PasswordReset;

use crate::cli::{CategoryCmd, Cmd, ProductCmd, ProductFields, SettingsCmd};

pub async fn run(api: AdminApi, cmd: Cmd) -> anyhow::Result<()> {
    match cmd {
        Cmd::Login { email, password } => {
            api.login(&email, &password).await?;
            println!("Signed in as {email}.");
        }
        Cmd::Logout => {
            api.logout().await?;
            println!("Signed out.");
        }
        Cmd::ResetPassword {
            old,
            new_password,
            confirm,
        } => {
            let reset = PasswordReset {
                old_password: old,
                new_password,
                confirmation: confirm,
            };
            api.reset_password(&reset).await?;
            println!("Password changed. Sign in again with the new password.");
        }
        Cmd::Categories { cmd } => categories(api, cmd).await?,
        Cmd::Products { cmd } => products(api, cmd).await?,
        Cmd::Settings { cmd } => settings(api, cmd).await?,
    }
    Ok(())
}

async fn categories(api: AdminApi, cmd: CategoryCmd) -> anyhow::Result<()> {
    match cmd {
        CategoryCmd::List => {
            for category in api.categories().await? {
                println!(
                    "{:>5}  {}  {}",
                    category.id,
                    category.name,
                    category.image.as_deref().unwrap_or("-")
                );
            }
        }
        CategoryCmd::Create { name, image } => {
            let mut form = CategoryForm::create(api);
            form.draft.name = name;
            if let Some(path) = image {
                form.choose_image(&path).await?;
            }
            form.submit().await?;
            println!("Category created.");
        }
        CategoryCmd::Update { id, name, image } => {
            let mut form = CategoryForm::edit(api, id).await?;
            if let Some(name) = name {
                form.draft.name = name;
            }
            if let Some(path) = image {
                form.choose_image(&path).await?;
            }
            form.submit().await?;
            println!("Category {id} updated.");
        }
    }
    Ok(())
}

async fn products(api: AdminApi, cmd: ProductCmd) -> anyhow::Result<()> {
    match cmd {
        ProductCmd::Search {
            term,
            category,
            page,
        } => {
            let query = SearchQuery {
                term,
                category,
                page: page.max(1),
            };
            let result = api.search_products(&query).await?;
            for p in &result.products {
                println!(
                    "{:>5}  {:<30}  {:>10.2}  {}",
                    p.id,
                    p.name,
                    p.price,
                    if p.is_active { "available" } else { "hidden" }
                );
            }
            println!("page {} of {}", query.page, result.last_page);
        }
        ProductCmd::Show { id } => {
            let draft = api.product(id).await?;
            print_product(id, &draft);
        }
        ProductCmd::Create { fields } => {
            let mut form = ProductForm::create(api);
            apply_fields(form.draft_mut(), &fields)?;
            attach(&mut form, &fields.images).await;
            form.submit().await?;
            println!("Product created.");
        }
        ProductCmd::Update {
            id,
            fields,
            mut remove_images,
        } => {
            let mut form = ProductForm::edit(api, id).await?;
            apply_fields(form.draft_mut(), &fields)?;

            // Highest index first so earlier positions stay valid.
            remove_images.sort_unstable_by(|a, b| b.cmp(a));
            remove_images.dedup();
            for index in remove_images {
                if form.images().remove(index).is_none() {
                    anyhow::bail!("product {id} has no image at position {index}");
                }
            }

            attach(&mut form, &fields.images).await;
            form.submit().await?;
            println!("Product {id} updated.");
        }
        ProductCmd::ToggleStatus { id } => {
            let mut form = ProductForm::edit(api, id).await?;
            let message = form.toggle_status().await?;
            println!("{message}");
            println!(
                "Product {id} is now {}.",
                if form.displayed_status() { "available" } else { "hidden" }
            );
        }
    }
    Ok(())
}

async fn settings(api: AdminApi, cmd: SettingsCmd) -> anyhow::Result<()> {
    match cmd {
        SettingsCmd::Show => {
            let settings = api.settings().await?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsCmd::Update {
            facebook,
            instagram,
            whatsapp,
            contact_email,
            wholesale_at,
        } => {
            let mut form = SettingsForm::load(api).await?;
            let s = &mut form.settings;
            if let Some(v) = facebook {
                s.facebook = v;
            }
            if let Some(v) = instagram {
                s.instagram = v;
            }
            if let Some(v) = whatsapp {
                s.whatsapp = v;
            }
            if let Some(v) = contact_email {
                s.contact_us_email = v;
            }
            if let Some(v) = wholesale_at {
                s.wholesale_at = v;
            }
            form.save().await?;
            println!("Settings saved.");
        }
    }
    Ok(())
}

// ---- private helpers ----

fn apply_fields(draft: &mut ProductDraft, fields: &ProductFields) -> anyhow::Result<()> {
    if let Some(name) = &fields.name {
        draft.set_name(name.as_str());
    }
    if let Some(price) = fields.price {
        draft.set_price(price).context("invalid --price")?;
    }
    if let Some(description) = &fields.description {
        draft.set_description(description.as_str());
    }
    if !fields.categories.is_empty() {
        draft.categories.clear();
        draft.categories.extend(fields.categories.iter().copied());
    }
    if !fields.sizes.is_empty() {
        draft.set_sizes(fields.sizes.iter().copied());
    }
    if !fields.colors.is_empty() {
        let existing: Vec<String> = draft.available_colors().map(str::to_string).collect();
        for color in &existing {
            draft.remove_color(color);
        }
        for color in &fields.colors {
            draft.add_color(color);
        }
    }
    if let Some(enabled) = fields.custom_size {
        draft.set_custom_size_available(enabled);
    }
    Ok(())
}

/// Stage local files. Unreadable files are reported and skipped; the rest
/// are still attached.
async fn attach(form: &mut ProductForm, paths: &[PathBuf]) {
    if paths.is_empty() {
        return;
    }
    let report = form.attach_images(paths).await;
    for (path, err) in &report.failed {
        tracing::warn!(path = %path.display(), error = %err, "Skipping unreadable image");
        eprintln!("skipped {}: {err}", path.display());
    }
    tracing::debug!(added = report.added, "Images staged");
}

fn print_product(id: i64, draft: &ProductDraft) {
    println!("#{id} {}", draft.name);
    println!("  price:        {:.2}", draft.price());
    println!(
        "  status:       {}",
        if draft.status { "available" } else { "hidden" }
    );
    let categories: Vec<String> = draft.categories.iter().map(i64::to_string).collect();
    println!("  categories:   {}", categories.join(", "));
    let sizes: Vec<String> = draft.available_sizes().map(|s| s.to_string()).collect();
    println!("  sizes:        {}", sizes.join(", "));
    println!("  custom size:  {}", draft.custom_size_available);
    println!(
        "  colors:       {}",
        draft.available_colors().collect::<Vec<_>>().join(", ")
    );
    if !draft.description.is_empty() {
        println!("  description:  {}", draft.description);
    }
    for (index, image) in draft.images.iter().enumerate() {
        let id = match image {
            ImageRef::Persisted { id: Some(id), .. } => id.to_string(),
            _ => "-".to_string(),
        };
        println!("  image {index}:      [{id}] {}", image.display_url());
    }
    if let Some(server) = draft.server_fields() {
        if let Some(ulid) = &server.ulid {
            println!("  ulid:         {ulid}");
        }
        if let Some(count) = server.order_count {
            println!("  orders:       {count}");
        }
    }
}
