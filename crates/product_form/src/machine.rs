use std::mem;

use shared::{
    domain::FormMode,
    protocol::{Envelope, ProductRecord},
};
use tracing::debug;

use crate::{
    draft::{FieldUpdate, ProductDraft, ProductTemplate},
    images::SlotChange,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Closed,
    Create,
    Edit,
    Delete,
}

impl From<FormMode> for FormPhase {
    fn from(mode: FormMode) -> Self {
        match mode {
            FormMode::Create => FormPhase::Create,
            FormMode::Edit => FormPhase::Edit,
            FormMode::Delete => FormPhase::Delete,
        }
    }
}

impl FormPhase {
    pub fn mode(self) -> Option<FormMode> {
        match self {
            FormPhase::Closed => None,
            FormPhase::Create => Some(FormMode::Create),
            FormPhase::Edit => Some(FormMode::Edit),
            FormPhase::Delete => Some(FormMode::Delete),
        }
    }

    fn accepts_edits(self) -> bool {
        matches!(self, FormPhase::Create | FormPhase::Edit)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    Open {
        mode: FormMode,
        template: ProductTemplate,
    },
    SetField(FieldUpdate),
    SetImageAt {
        index: usize,
        value: String,
    },
    AddImageSlot,
    RemoveLastImageSlot,
    Close,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    phase: FormPhase,
    draft: ProductDraft,
}

/// Applies one event to the form.
///
/// Opening always rebuilds the draft from defaults plus the template, so
/// nothing carries over from a previous session. Field and image edits only
/// apply while creating or editing.
pub fn reduce(state: FormState, event: FormEvent) -> FormState {
    let FormState { phase, mut draft } = state;
    match event {
        FormEvent::Open { mode, template } => FormState {
            phase: mode.into(),
            draft: ProductDraft::from_template(template),
        },
        FormEvent::Close => FormState::default(),
        _ if !phase.accepts_edits() => {
            debug!(?phase, "ignoring form edit outside create/edit");
            FormState { phase, draft }
        }
        FormEvent::SetField(update) => {
            draft.apply(update);
            FormState { phase, draft }
        }
        FormEvent::SetImageAt { index, value } => {
            let change = draft.images_mut().set(index, value);
            if change != SlotChange::Replaced {
                debug!(index, ?change, len = draft.images().len(), "image slot write");
            }
            FormState { phase, draft }
        }
        FormEvent::AddImageSlot => {
            if !draft.images_mut().push_blank() {
                debug!("image slot list already full");
            }
            FormState { phase, draft }
        }
        FormEvent::RemoveLastImageSlot => {
            draft.images_mut().pop();
            FormState { phase, draft }
        }
    }
}

impl FormState {
    pub fn apply(&mut self, event: FormEvent) {
        *self = reduce(mem::take(self), event);
    }

    pub fn open(&mut self, mode: FormMode, template: ProductTemplate) {
        self.apply(FormEvent::Open { mode, template });
    }

    pub fn open_record(&mut self, mode: FormMode, record: &ProductRecord) {
        self.open(mode, ProductTemplate::from(record));
    }

    pub fn set_field(&mut self, update: FieldUpdate) {
        self.apply(FormEvent::SetField(update));
    }

    pub fn set_image_at(&mut self, index: usize, value: impl Into<String>) {
        self.apply(FormEvent::SetImageAt {
            index,
            value: value.into(),
        });
    }

    pub fn add_image_slot(&mut self) {
        self.apply(FormEvent::AddImageSlot);
    }

    pub fn remove_last_image_slot(&mut self) {
        self.apply(FormEvent::RemoveLastImageSlot);
    }

    pub fn close(&mut self) {
        self.apply(FormEvent::Close);
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn mode(&self) -> Option<FormMode> {
        self.phase.mode()
    }

    pub fn is_open(&self) -> bool {
        self.phase != FormPhase::Closed
    }

    pub fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    pub fn can_add_image_slot(&self) -> bool {
        self.phase.accepts_edits() && self.draft.images().can_add()
    }

    pub fn can_remove_image_slot(&self) -> bool {
        self.phase.accepts_edits() && self.draft.images().can_remove()
    }

    pub fn to_submission_payload(&self) -> Envelope<ProductRecord> {
        self.draft.to_submission_payload()
    }

    pub fn heading(&self) -> Option<String> {
        self.mode().map(|mode| format!("{} product", mode.label()))
    }

    pub fn delete_prompt(&self) -> Option<String> {
        (self.phase == FormPhase::Delete).then(|| format!("Delete \"{}\"?", self.draft.title))
    }
}
