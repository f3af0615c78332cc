use super::*;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use client_core::{CatalogError, CatalogHandle, MemorySessionStore, SessionStore};
use crossbeam_channel::bounded;
use product_form::{FieldUpdate, FormEvent, FormPhase, TextField};
use shared::{
    domain::{ProductId, UserUid},
    error::{ApiError, ErrorCode},
    protocol::{AckResponse, Envelope, MessageText, ProductRecord, SigninResponse},
};

use crate::backend_bridge::runtime::{spawn_backend_thread, BackendContext};
use crate::controller::reducer::SessionView;

const TOKEN: &str = "tok-admin-1";

struct FakeCatalog {
    session: Arc<MemorySessionStore>,
    products: Mutex<Vec<ProductRecord>>,
    calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    fn new(session: Arc<MemorySessionStore>) -> Self {
        Self {
            session,
            products: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn require_session(&self) -> Result<(), CatalogError> {
        match self.session.token() {
            Some(token) if token == TOKEN => Ok(()),
            Some(_) => Err(CatalogError::Status {
                status: 403,
                source: ApiError::new(ErrorCode::Forbidden, "請重新登入"),
            }),
            None => Err(CatalogError::MissingSession),
        }
    }
}

#[async_trait]
impl CatalogHandle for FakeCatalog {
    async fn signin(
        &self,
        _username: &str,
        password: &str,
    ) -> Result<SigninResponse, CatalogError> {
        self.record("signin");
        if password != "secret" {
            return Err(CatalogError::Status {
                status: 400,
                source: ApiError::new(ErrorCode::Validation, "登入失敗"),
            });
        }
        Ok(SigninResponse {
            success: true,
            message: Some(MessageText::One("登入成功".to_string())),
            uid: UserUid::from("uid-1"),
            token: TOKEN.to_string(),
            expired: (Utc::now() + Duration::days(10)).timestamp_millis(),
        })
    }

    async fn check_session(&self) -> Result<(), CatalogError> {
        self.record("check");
        self.require_session()
    }

    async fn list(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        self.record("list");
        self.require_session()?;
        Ok(self.products.lock().unwrap().clone())
    }

    async fn create(&self, payload: &Envelope<ProductRecord>) -> Result<AckResponse, CatalogError> {
        self.record("create");
        self.require_session()?;
        if payload.data.title.is_empty() {
            return Err(CatalogError::Status {
                status: 400,
                source: ApiError::new(ErrorCode::Validation, "title 屬性不得為空"),
            });
        }
        let mut products = self.products.lock().unwrap();
        let mut created = payload.data.clone();
        created.id = ProductId::from(format!("p{}", products.len() + 1).as_str());
        products.push(created);
        Ok(AckResponse::default())
    }

    async fn update(
        &self,
        id: &ProductId,
        payload: &Envelope<ProductRecord>,
    ) -> Result<AckResponse, CatalogError> {
        self.record("update");
        self.require_session()?;
        let mut products = self.products.lock().unwrap();
        if let Some(existing) = products.iter_mut().find(|product| &product.id == id) {
            *existing = ProductRecord {
                id: id.clone(),
                ..payload.data.clone()
            };
        }
        Ok(AckResponse::default())
    }

    async fn delete(&self, id: &ProductId) -> Result<AckResponse, CatalogError> {
        self.record("delete");
        self.require_session()?;
        self.products.lock().unwrap().retain(|product| &product.id != id);
        Ok(AckResponse::default())
    }
}

fn start(session: Arc<MemorySessionStore>) -> (ConsoleDriver, Arc<FakeCatalog>) {
    let catalog = Arc::new(FakeCatalog::new(session.clone()));
    let (cmd_tx, cmd_rx) = bounded(16);
    let (ui_tx, ui_rx) = bounded(16);
    let ctx = BackendContext {
        catalog: catalog.clone(),
        session,
    };
    spawn_backend_thread(ctx, cmd_rx, ui_tx);
    (ConsoleDriver::new(cmd_tx, ui_rx), catalog)
}

fn signed_in_store() -> Arc<MemorySessionStore> {
    Arc::new(MemorySessionStore::with_token(
        TOKEN,
        Utc::now() + Duration::days(1),
    ))
}

fn set_title(driver: &mut ConsoleDriver, title: &str) {
    driver.act(UserAction::Form(FormEvent::SetField(FieldUpdate::Text(
        TextField::Title,
        title.to_string(),
    ))));
}

#[test]
fn login_stores_token_and_loads_products() {
    let session = Arc::new(MemorySessionStore::default());
    let (mut driver, catalog) = start(session.clone());

    driver.act(UserAction::SubmitLogin {
        username: "admin@example.com".to_string(),
        password: "secret".to_string(),
    });
    assert_eq!(driver.pending(), 1);
    driver.settle();

    assert_eq!(driver.pending(), 0);
    assert_eq!(session.token().as_deref(), Some(TOKEN));
    assert_eq!(
        driver.state().session,
        SessionView::SignedIn {
            uid: Some(UserUid::from("uid-1"))
        }
    );
    assert_eq!(*catalog.calls.lock().unwrap(), vec!["signin", "list"]);
    assert_eq!(
        driver.state_mut().take_notifications(),
        vec![Notification::welcome_back()]
    );
}

#[test]
fn failed_login_leaves_store_empty() {
    let session = Arc::new(MemorySessionStore::default());
    let (mut driver, catalog) = start(session.clone());

    driver.act(UserAction::SubmitLogin {
        username: "admin@example.com".to_string(),
        password: "wrong".to_string(),
    });
    driver.settle();

    assert!(session.token().is_none());
    assert!(!driver.state().is_signed_in());
    assert_eq!(*catalog.calls.lock().unwrap(), vec!["signin"]);
    let toasts = driver.state_mut().take_notifications();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].detail.as_deref(), Some("登入失敗"));
}

#[test]
fn restore_without_token_requires_reauth() {
    let (mut driver, catalog) = start(Arc::new(MemorySessionStore::default()));
    driver.act(UserAction::RestoreSession);
    driver.settle();

    assert!(!driver.state().is_signed_in());
    assert!(driver
        .state()
        .last_error
        .as_ref()
        .is_some_and(|err| err.requires_reauth()));
    assert_eq!(*catalog.calls.lock().unwrap(), vec!["check"]);
}

#[test]
fn create_edit_delete_round_through_backend() {
    let (mut driver, catalog) = start(signed_in_store());
    driver.act(UserAction::RestoreSession);
    driver.settle();
    assert!(driver.state().is_signed_in());
    assert!(driver.state().products.is_empty());

    driver.act(UserAction::OpenCreate);
    set_title(&mut driver, "Sencha");
    driver.act(UserAction::Form(FormEvent::AddImageSlot));
    driver.act(UserAction::Form(FormEvent::SetImageAt {
        index: 0,
        value: "https://img.example/1.png".to_string(),
    }));
    driver.act(UserAction::Confirm);
    driver.settle();

    assert!(!driver.state().is_open);
    let created = &driver.state().products[0];
    assert_eq!(created.title, "Sencha");
    assert_eq!(created.images_url, vec!["https://img.example/1.png".to_string()]);
    let id = created.id.clone();

    driver.act(UserAction::OpenEdit(id.clone()));
    assert_eq!(driver.state().form.phase(), FormPhase::Edit);
    set_title(&mut driver, "Sencha Premium");
    driver.act(UserAction::Confirm);
    driver.settle();
    assert_eq!(driver.state().products[0].title, "Sencha Premium");

    driver.act(UserAction::OpenDelete(id));
    driver.act(UserAction::Confirm);
    driver.settle();
    assert!(driver.state().products.is_empty());
    assert_eq!(
        *catalog.calls.lock().unwrap(),
        vec!["check", "list", "create", "list", "update", "list", "delete", "list"]
    );
}

#[test]
fn rejected_save_keeps_draft_for_correction() {
    let (mut driver, _catalog) = start(signed_in_store());
    driver.act(UserAction::OpenCreate);
    driver.act(UserAction::Confirm);
    driver.settle();

    assert!(driver.state().is_open);
    assert_eq!(driver.state().form.phase(), FormPhase::Create);
    let toasts = driver.state_mut().take_notifications();
    assert_eq!(toasts[0].detail.as_deref(), Some("title 屬性不得為空"));

    set_title(&mut driver, "Hojicha");
    driver.act(UserAction::Confirm);
    driver.settle();
    assert!(!driver.state().is_open);
    assert_eq!(driver.state().products.len(), 1);
}

#[test]
fn disconnected_queue_raises_backend_unavailable() {
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(1);
    drop(cmd_rx);
    let mut state = ConsoleState::default();

    assert!(!dispatch_backend_command(
        &cmd_tx,
        BackendCommand::ListProducts,
        &mut state
    ));
    assert_eq!(state.notifications[0].title, "Backend unavailable");
    assert_eq!(
        state.last_error.as_ref().map(|err| err.context()),
        Some(UiErrorContext::BackendStartup)
    );
}

#[test]
fn full_queue_is_reported_and_not_counted() {
    let (cmd_tx, _cmd_rx) = bounded::<BackendCommand>(1);
    let (_ui_tx, ui_rx) = bounded::<UiEvent>(1);
    let mut driver = ConsoleDriver::new(cmd_tx, ui_rx);

    driver.act(UserAction::RestoreSession);
    driver.act(UserAction::RestoreSession);

    assert_eq!(driver.pending(), 1);
    assert_eq!(
        driver.state().notifications[0].title,
        "Command queue is full; please retry"
    );
}
