//! Shell state and its transitions.
//!
//! Both reducers mutate [`ConsoleState`] in place and return the backend
//! commands the transition asks for; nothing here performs I/O.

use product_form::{FormState, ProductTemplate};
use shared::{
    domain::{FormMode, ProductId, UserUid},
    protocol::ProductRecord,
};
use tracing::{debug, info, warn};

use crate::backend_bridge::commands::{BackendCommand, SaveTarget};
use crate::controller::events::{Notification, UiError, UiEvent, UserAction};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionView {
    #[default]
    SignedOut,
    SignedIn {
        uid: Option<UserUid>,
    },
}

#[derive(Debug, Default)]
pub struct ConsoleState {
    pub session: SessionView,
    pub products: Vec<ProductRecord>,
    pub form: FormState,
    /// Modal visibility, owned by the shell rather than the form.
    pub is_open: bool,
    pub notifications: Vec<Notification>,
    pub last_error: Option<UiError>,
}

impl ConsoleState {
    pub fn is_signed_in(&self) -> bool {
        matches!(self.session, SessionView::SignedIn { .. })
    }

    pub fn product(&self, id: &ProductId) -> Option<&ProductRecord> {
        self.products.iter().find(|product| &product.id == id)
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn open(&mut self, mode: FormMode, template: ProductTemplate) {
        self.form.open(mode, template);
        self.is_open = true;
    }

    fn close(&mut self) {
        self.form.close();
        self.is_open = false;
    }

    fn record_failure(&mut self, err: UiError) {
        warn!(
            context = ?err.context(),
            category = ?err.category(),
            message = err.message(),
            "backend call failed"
        );
        self.last_error = Some(err);
    }
}

pub fn reduce_user_action(state: &mut ConsoleState, action: UserAction) -> Vec<BackendCommand> {
    match action {
        UserAction::SubmitLogin { username, password } => {
            vec![BackendCommand::Signin { username, password }]
        }
        UserAction::RestoreSession => vec![BackendCommand::CheckSession],
        UserAction::OpenCreate => {
            state.open(FormMode::Create, ProductTemplate::default());
            Vec::new()
        }
        UserAction::OpenEdit(id) => open_existing(state, FormMode::Edit, &id),
        UserAction::OpenDelete(id) => open_existing(state, FormMode::Delete, &id),
        UserAction::Form(event) => {
            state.form.apply(event);
            Vec::new()
        }
        UserAction::Confirm => confirm(state),
        UserAction::Dismiss => {
            state.close();
            Vec::new()
        }
    }
}

fn open_existing(state: &mut ConsoleState, mode: FormMode, id: &ProductId) -> Vec<BackendCommand> {
    let Some(template) = state.product(id).map(ProductTemplate::from) else {
        warn!(product_id = %id, "cannot open form for unknown product");
        return Vec::new();
    };
    state.open(mode, template);
    Vec::new()
}

fn confirm(state: &ConsoleState) -> Vec<BackendCommand> {
    if !state.is_open {
        return Vec::new();
    }
    let draft = state.form.draft();
    match state.form.mode() {
        Some(FormMode::Create) => vec![BackendCommand::SaveProduct {
            target: SaveTarget::Create,
            payload: state.form.to_submission_payload(),
        }],
        Some(FormMode::Edit) => vec![BackendCommand::SaveProduct {
            target: SaveTarget::Update(draft.id.clone()),
            payload: state.form.to_submission_payload(),
        }],
        Some(FormMode::Delete) => vec![BackendCommand::DeleteProduct {
            id: draft.id.clone(),
        }],
        None => Vec::new(),
    }
}

pub fn reduce_ui_event(state: &mut ConsoleState, event: UiEvent) -> Vec<BackendCommand> {
    match event {
        UiEvent::SignedIn { uid, expires_at } => {
            info!(%uid, %expires_at, "admin session started");
            state.session = SessionView::SignedIn { uid: Some(uid) };
            state.last_error = None;
            state.notifications.push(Notification::welcome_back());
            vec![BackendCommand::ListProducts]
        }
        UiEvent::SigninFailed(err) => {
            state.session = SessionView::SignedOut;
            state.notifications.push(Notification::signin_failed(&err));
            state.record_failure(err);
            Vec::new()
        }
        UiEvent::SessionRestored => {
            state.session = SessionView::SignedIn { uid: None };
            vec![BackendCommand::ListProducts]
        }
        UiEvent::SessionRejected(err) => {
            debug!(message = err.message(), "stored session not accepted");
            state.record_failure(err);
            Vec::new()
        }
        UiEvent::ProductsLoaded(products) => {
            debug!(count = products.len(), "product list refreshed");
            state.products = products;
            Vec::new()
        }
        UiEvent::ProductsLoadFailed(err) => {
            state.record_failure(err);
            Vec::new()
        }
        UiEvent::ProductSaved { message } => {
            if let Some(message) = message {
                debug!(%message, "backend acknowledged save");
            }
            state.notifications.push(Notification::saved());
            state.close();
            vec![BackendCommand::ListProducts]
        }
        UiEvent::ProductSaveFailed(err) => {
            state.notifications.push(Notification::save_failed(&err));
            state.record_failure(err);
            Vec::new()
        }
        UiEvent::ProductDeleted { id } => {
            info!(product_id = %id, "product removed");
            state.notifications.push(Notification::deleted());
            state.close();
            vec![BackendCommand::ListProducts]
        }
        UiEvent::ProductDeleteFailed(err) => {
            state.notifications.push(Notification::delete_failed(&err));
            state.record_failure(err);
            Vec::new()
        }
    }
}

#[cfg(test)]
#[path = "../tests/reducer_tests.rs"]
mod tests;
