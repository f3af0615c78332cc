//! Runtime bridge between the shell command queue and the catalog backend.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use chrono::DateTime;
use client_core::{CatalogHandle, SessionStore};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::{BackendCommand, SaveTarget};
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

#[derive(Clone)]
pub struct BackendContext {
    pub catalog: Arc<dyn CatalogHandle>,
    pub session: Arc<dyn SessionStore>,
}

/// Runs one command against the backend and reports its completion.
pub async fn execute(ctx: &BackendContext, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::Signin { username, password } => {
            let response = match ctx.catalog.signin(&username, &password).await {
                Ok(response) => response,
                Err(err) => {
                    return UiEvent::SigninFailed(UiError::from_catalog(UiErrorContext::Login, &err))
                }
            };
            let Some(expires_at) = DateTime::from_timestamp_millis(response.expired) else {
                return UiEvent::SigninFailed(UiError::from_message(
                    UiErrorContext::Login,
                    format!("invalid session expiry {}", response.expired),
                ));
            };
            if let Err(err) = ctx.session.set_token(&response.token, expires_at) {
                return UiEvent::SigninFailed(UiError::from_message(
                    UiErrorContext::Login,
                    err.to_string(),
                ));
            }
            UiEvent::SignedIn {
                uid: response.uid,
                expires_at,
            }
        }
        BackendCommand::CheckSession => match ctx.catalog.check_session().await {
            Ok(()) => UiEvent::SessionRestored,
            Err(err) => UiEvent::SessionRejected(UiError::from_catalog(
                UiErrorContext::SessionCheck,
                &err,
            )),
        },
        BackendCommand::ListProducts => match ctx.catalog.list().await {
            Ok(products) => UiEvent::ProductsLoaded(products),
            Err(err) => UiEvent::ProductsLoadFailed(UiError::from_catalog(
                UiErrorContext::LoadProducts,
                &err,
            )),
        },
        BackendCommand::SaveProduct { target, payload } => {
            let result = match &target {
                SaveTarget::Create => ctx.catalog.create(&payload).await,
                SaveTarget::Update(id) => ctx.catalog.update(id, &payload).await,
            };
            match result {
                Ok(ack) => UiEvent::ProductSaved {
                    message: ack.message.map(|message| message.to_string()),
                },
                Err(err) => UiEvent::ProductSaveFailed(UiError::from_catalog(
                    UiErrorContext::SaveProduct,
                    &err,
                )),
            }
        }
        BackendCommand::DeleteProduct { id } => match ctx.catalog.delete(&id).await {
            Ok(_) => UiEvent::ProductDeleted { id },
            Err(err) => UiEvent::ProductDeleteFailed(UiError::from_catalog(
                UiErrorContext::DeleteProduct,
                &err,
            )),
        },
    }
}

/// Starts the backend worker thread. It drains `cmd_rx` in order until the
/// shell drops its sender; in-flight calls always run to completion.
pub fn spawn_backend_thread(
    ctx: BackendContext,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            tracing::debug!("backend worker ready");
            while let Ok(cmd) = cmd_rx.recv() {
                let name = cmd.name();
                tracing::debug!(command = name, "processing backend command");
                let event = execute(&ctx, cmd).await;
                if ui_tx.send(event).is_err() {
                    tracing::warn!(command = name, "shell stopped listening; dropping result");
                    break;
                }
            }
            tracing::debug!("backend worker stopped");
        });
    })
}
