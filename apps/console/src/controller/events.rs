//! Shell events, user actions, notifications and error modeling.

use chrono::{DateTime, Utc};
use client_core::CatalogError;
use product_form::FormEvent;
use shared::{
    domain::{ProductId, UserUid},
    error::ErrorCode,
    protocol::ProductRecord,
};

/// Completion of a backend command. Every queued command yields exactly one.
#[derive(Debug, Clone)]
pub enum UiEvent {
    SignedIn {
        uid: UserUid,
        expires_at: DateTime<Utc>,
    },
    SigninFailed(UiError),
    SessionRestored,
    SessionRejected(UiError),
    ProductsLoaded(Vec<ProductRecord>),
    ProductsLoadFailed(UiError),
    ProductSaved {
        message: Option<String>,
    },
    ProductSaveFailed(UiError),
    ProductDeleted {
        id: ProductId,
    },
    ProductDeleteFailed(UiError),
}

/// Input from the operator.
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    SubmitLogin { username: String, password: String },
    RestoreSession,
    OpenCreate,
    OpenEdit(ProductId),
    OpenDelete(ProductId),
    Form(FormEvent),
    Confirm,
    Dismiss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Login,
    SessionCheck,
    LoadProducts,
    SaveProduct,
    DeleteProduct,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_catalog(context: UiErrorContext, err: &CatalogError) -> Self {
        let category = match err {
            _ if err.is_unauthorized() => UiErrorCategory::Auth,
            CatalogError::Status { source, .. } if source.code == ErrorCode::Validation => {
                UiErrorCategory::Validation
            }
            CatalogError::Transport(_) => UiErrorCategory::Transport,
            CatalogError::InvalidBase { .. } | CatalogError::Decode(_) => {
                UiErrorCategory::Validation
            }
            _ => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context,
            message: err.user_message(),
        }
    }

    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("401")
            || message_lower.contains("403")
            || message_lower.contains("unauthorized")
            || message_lower.contains("session")
        {
            UiErrorCategory::Auth
        } else if message_lower.contains("invalid") || message_lower.contains("missing") {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("connection")
            || message_lower.contains("runtime")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn requires_reauth(&self) -> bool {
        self.category == UiErrorCategory::Auth
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPosition {
    TopEnd,
    Center,
}

/// Transient notification raised by a backend completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub position: ToastPosition,
    pub title: String,
    pub detail: Option<String>,
}

impl Notification {
    pub fn new(severity: Severity, position: ToastPosition, title: impl Into<String>) -> Self {
        Self {
            severity,
            position,
            title: title.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn welcome_back() -> Self {
        Self::new(Severity::Success, ToastPosition::TopEnd, "Welcome back")
    }

    pub fn signin_failed(err: &UiError) -> Self {
        Self::new(Severity::Error, ToastPosition::Center, "Sign-in failed")
            .with_detail(err.message())
    }

    pub fn saved() -> Self {
        Self::new(Severity::Success, ToastPosition::TopEnd, "Saved")
    }

    pub fn save_failed(err: &UiError) -> Self {
        Self::new(Severity::Error, ToastPosition::TopEnd, "Save failed")
            .with_detail(err.message())
    }

    pub fn deleted() -> Self {
        Self::new(Severity::Success, ToastPosition::TopEnd, "Deleted")
    }

    pub fn delete_failed(err: &UiError) -> Self {
        Self::new(Severity::Error, ToastPosition::TopEnd, "Delete failed")
            .with_detail(err.message())
    }
}
