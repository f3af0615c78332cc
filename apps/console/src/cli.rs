use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use product_form::{FieldUpdate, FormEvent, TextField};
use shared::domain::MAX_SECONDARY_IMAGES;

use crate::config::Overrides;
use crate::controller::events::UserAction;
use crate::controller::orchestration::ConsoleDriver;

#[derive(Parser, Debug)]
#[command(name = "catalog-console", about = "Product catalog admin console")]
pub struct Cli {
    /// Config file; defaults to ./console.toml when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(long, global = true)]
    pub api_base: Option<String>,
    #[arg(long, global = true)]
    pub api_path: Option<String>,
    /// Session cookie file.
    #[arg(long, global = true)]
    pub cookie: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_base: self.api_base.clone(),
            api_path: self.api_path.clone(),
            cookie_path: self.cookie.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    List,
    Show {
        id: String,
    },
    Create(ProductEdits),
    Edit {
        id: String,
        #[command(flatten)]
        edits: ProductEdits,
    },
    Delete {
        id: String,
        /// Confirm without asking.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct ProductEdits {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub unit: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub content: Option<String>,
    #[arg(long)]
    pub origin_price: Option<String>,
    #[arg(long)]
    pub price: Option<String>,
    /// Main image URL.
    #[arg(long)]
    pub image_url: Option<String>,
    #[arg(long, conflicts_with = "disabled")]
    pub enabled: bool,
    #[arg(long)]
    pub disabled: bool,
    /// Secondary image URL, typed into the next blank slot. Repeatable.
    #[arg(long = "image", value_name = "URL")]
    pub images: Vec<String>,
    /// Overwrite slot N (1-based); an empty URL clears it.
    #[arg(long = "image-at", value_name = "N=URL", value_parser = parse_image_at)]
    pub image_at: Vec<(usize, String)>,
    #[arg(long)]
    pub add_image_slot: bool,
    /// Drop the last image slot. Repeat to drop more.
    #[arg(long, action = ArgAction::Count)]
    pub remove_image_slot: u8,
}

fn parse_image_at(raw: &str) -> Result<(usize, String), String> {
    let (index, url) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected N=URL, got '{raw}'"))?;
    let index: usize = index
        .trim()
        .parse()
        .map_err(|_| format!("invalid slot number '{index}'"))?;
    if index == 0 || index > MAX_SECONDARY_IMAGES {
        return Err(format!("slot number must be 1..={MAX_SECONDARY_IMAGES}"));
    }
    Ok((index - 1, url.to_string()))
}

/// Feeds the flags into the open form as individual form events.
pub fn apply_edits(driver: &mut ConsoleDriver, edits: ProductEdits) -> Result<()> {
    let text_fields = [
        (TextField::Title, edits.title),
        (TextField::Category, edits.category),
        (TextField::Unit, edits.unit),
        (TextField::Description, edits.description),
        (TextField::Content, edits.content),
        (TextField::OriginPrice, edits.origin_price),
        (TextField::Price, edits.price),
        (TextField::ImageUrl, edits.image_url),
    ];
    for (field, value) in text_fields {
        if let Some(value) = value {
            form_event(driver, FormEvent::SetField(FieldUpdate::Text(field, value)));
        }
    }
    if edits.enabled || edits.disabled {
        form_event(
            driver,
            FormEvent::SetField(FieldUpdate::Enabled(edits.enabled)),
        );
    }

    for (index, url) in edits.image_at {
        let len = driver.state().form.draft().images().len();
        if index >= len {
            bail!("image slot {} does not exist ({len} slots)", index + 1);
        }
        form_event(driver, FormEvent::SetImageAt { index, value: url });
    }

    for _ in 0..edits.remove_image_slot {
        if !driver.state().form.can_remove_image_slot() {
            bail!("no image slot left to remove");
        }
        form_event(driver, FormEvent::RemoveLastImageSlot);
    }

    if edits.add_image_slot {
        if !driver.state().form.can_add_image_slot() {
            bail!("cannot add an image slot: fill the last slot first or the list is full");
        }
        form_event(driver, FormEvent::AddImageSlot);
    }

    for url in edits.images {
        type_into_blank(driver, url)?;
    }

    Ok(())
}

fn type_into_blank(driver: &mut ConsoleDriver, url: String) -> Result<()> {
    let last_is_blank = driver
        .state()
        .form
        .draft()
        .images()
        .as_slice()
        .last()
        .is_some_and(String::is_empty);
    if !last_is_blank {
        if !driver.state().form.can_add_image_slot() {
            bail!("image list already holds {MAX_SECONDARY_IMAGES} URLs");
        }
        form_event(driver, FormEvent::AddImageSlot);
    }
    let index = driver.state().form.draft().images().len().saturating_sub(1);
    form_event(driver, FormEvent::SetImageAt { index, value: url });
    Ok(())
}

fn form_event(driver: &mut ConsoleDriver, event: FormEvent) {
    driver.act(UserAction::Form(event));
}
