use std::sync::Arc;

mod backend_bridge;
mod cli;
mod config;
mod controller;
mod ui;

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{CatalogClient, CatalogEndpoints, CookieFileStore, SessionStore};
use crossbeam_channel::bounded;
use shared::domain::ProductId;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::runtime::{spawn_backend_thread, BackendContext};
use crate::cli::{apply_edits, Cli, Command, ProductEdits};
use crate::controller::events::UserAction;
use crate::controller::orchestration::ConsoleDriver;
use crate::controller::reducer::SessionView;

const QUEUE_CAPACITY: usize = 64;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = config::load_settings(cli.config.as_deref())?;
    settings.apply_overrides(cli.overrides());

    let cookie_path = settings.resolved_cookie_path()?;
    tracing::debug!(cookie = %cookie_path.display(), api_base = %settings.api_base, "settings loaded");
    let session = Arc::new(CookieFileStore::new(cookie_path));

    if let Command::Logout = cli.command {
        session.clear().context("failed to remove session cookie")?;
        println!("Signed out.");
        return Ok(());
    }

    let endpoints = CatalogEndpoints::new(&settings.api_base, &settings.api_path)
        .context("set api_base/api_path in console.toml, the environment, or --api-base/--api-path")?;
    let http = reqwest::Client::builder()
        .timeout(settings.request_timeout())
        .build()
        .context("failed to build http client")?;
    let catalog = Arc::new(CatalogClient::with_http_client(
        http,
        endpoints,
        session.clone(),
    ));

    let (cmd_tx, cmd_rx) = bounded(QUEUE_CAPACITY);
    let (ui_tx, ui_rx) = bounded(QUEUE_CAPACITY);
    let worker = spawn_backend_thread(
        BackendContext {
            catalog,
            session,
        },
        cmd_rx,
        ui_tx,
    );

    let mut driver = ConsoleDriver::new(cmd_tx, ui_rx);
    let outcome = run(&mut driver, cli.command);

    drop(driver);
    if worker.join().is_err() {
        tracing::error!("backend worker panicked");
    }
    outcome
}

fn run(driver: &mut ConsoleDriver, command: Command) -> Result<()> {
    match command {
        Command::Login { username, password } => {
            driver.act(UserAction::SubmitLogin { username, password });
            driver.settle();
            print_notifications(driver);
            if !driver.state().is_signed_in() {
                bail!("sign-in failed");
            }
            if let SessionView::SignedIn { uid: Some(uid) } = &driver.state().session {
                println!("Signed in as {uid}.");
            }
            print_products(driver);
        }
        // Handled before the backend starts.
        Command::Logout => {}
        Command::List => {
            restore_session(driver)?;
            print_products(driver);
        }
        Command::Show { id } => {
            restore_session(driver)?;
            let id = known_product(driver, &id)?;
            driver.act(UserAction::OpenEdit(id));
            print_modal(driver);
            driver.act(UserAction::Dismiss);
        }
        Command::Create(edits) => {
            restore_session(driver)?;
            driver.act(UserAction::OpenCreate);
            submit(driver, edits)?;
        }
        Command::Edit { id, edits } => {
            restore_session(driver)?;
            let id = known_product(driver, &id)?;
            driver.act(UserAction::OpenEdit(id));
            submit(driver, edits)?;
        }
        Command::Delete { id, yes } => {
            restore_session(driver)?;
            let id = known_product(driver, &id)?;
            driver.act(UserAction::OpenDelete(id));
            print_modal(driver);
            if !yes {
                println!("Re-run with --yes to confirm.");
                driver.act(UserAction::Dismiss);
                return Ok(());
            }
            confirm(driver, "product was not deleted")?;
        }
    }
    Ok(())
}

fn restore_session(driver: &mut ConsoleDriver) -> Result<()> {
    driver.act(UserAction::RestoreSession);
    driver.settle();
    print_notifications(driver);
    if !driver.state().is_signed_in() {
        println!("{}", ui::render_login_prompt());
        bail!("not signed in");
    }
    Ok(())
}

fn known_product(driver: &ConsoleDriver, raw_id: &str) -> Result<ProductId> {
    let id = ProductId::from(raw_id);
    if driver.state().product(&id).is_none() {
        bail!("no product with id '{raw_id}'");
    }
    Ok(id)
}

fn submit(driver: &mut ConsoleDriver, edits: ProductEdits) -> Result<()> {
    if let Err(err) = apply_edits(driver, edits) {
        driver.act(UserAction::Dismiss);
        return Err(err);
    }
    print_modal(driver);
    confirm(driver, "product was not saved")
}

fn confirm(driver: &mut ConsoleDriver, failure: &str) -> Result<()> {
    driver.act(UserAction::Confirm);
    driver.settle();
    print_notifications(driver);

    if driver
        .state()
        .last_error
        .as_ref()
        .is_some_and(|err| err.requires_reauth())
    {
        println!("{}", ui::render_login_prompt());
    }
    if driver.state().is_open {
        bail!("{failure}");
    }
    print_products(driver);
    Ok(())
}

fn print_notifications(driver: &mut ConsoleDriver) {
    for notification in driver.state_mut().take_notifications() {
        println!("{}", ui::render_notification(&notification));
    }
}

fn print_modal(driver: &ConsoleDriver) {
    if let Some(body) = ui::render_modal(&driver.state().form) {
        println!("{body}");
    }
}

fn print_products(driver: &ConsoleDriver) {
    println!("{}", ui::render_product_table(&driver.state().products));
}
