//! Text rendering for the console: login prompt, product table, modal body and toasts.

pub mod modal;
pub mod table;
pub mod toast;

pub use modal::render_modal;
pub use table::render_product_table;
pub use toast::render_notification;

pub fn render_login_prompt() -> String {
    "Please sign in first: catalog-console login --username <email> --password <password>"
        .to_string()
}

/// Price cell text; NaN is what a non-numeric price was stored as.
pub fn format_price(value: f64) -> String {
    if value.is_nan() {
        "-".to_string()
    } else {
        value.to_string()
    }
}
