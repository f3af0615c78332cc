use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound on secondary image URLs carried by a product.
pub const MAX_SECONDARY_IMAGES: usize = 5;

/// Cookie that carries the admin session token.
pub const SESSION_COOKIE_NAME: &str = "hexToken";

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(ProductId);
id_newtype!(UserUid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    Create,
    Edit,
    Delete,
}

impl FormMode {
    pub fn label(self) -> &'static str {
        match self {
            FormMode::Create => "Create",
            FormMode::Edit => "Edit",
            FormMode::Delete => "Delete",
        }
    }
}
