//! In-memory product form: the draft being created, edited or deleted, and
//! the transition function that keeps its secondary image list well formed.

mod draft;
mod images;
mod machine;

pub use draft::{FieldInput, FieldName, FieldUpdate, FormError, ProductDraft, ProductTemplate, TextField};
pub use images::{ImageSlots, SlotChange};
pub use machine::{reduce, FormEvent, FormPhase, FormState};

#[cfg(test)]
#[path = "tests/machine_tests.rs"]
mod machine_tests;
