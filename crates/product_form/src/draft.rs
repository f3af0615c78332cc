use std::str::FromStr;

use shared::{
    domain::ProductId,
    protocol::{coerce_number, Envelope, ProductRecord},
};
use thiserror::Error;

use crate::images::ImageSlots;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown product field '{0}'")]
    UnknownField(String),
    #[error("field '{field}' does not accept {given} input")]
    InputKindMismatch {
        field: &'static str,
        given: &'static str,
    },
}

/// Scalar fields edited as free text. Prices stay text until submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Title,
    Category,
    Unit,
    OriginPrice,
    Price,
    Description,
    Content,
    ImageUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldName {
    Text(TextField),
    IsEnabled,
}

impl FieldName {
    /// Wire name of the field, also used as the form input name.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::Text(TextField::Title) => "title",
            FieldName::Text(TextField::Category) => "category",
            FieldName::Text(TextField::Unit) => "unit",
            FieldName::Text(TextField::OriginPrice) => "origin_price",
            FieldName::Text(TextField::Price) => "price",
            FieldName::Text(TextField::Description) => "description",
            FieldName::Text(TextField::Content) => "content",
            FieldName::Text(TextField::ImageUrl) => "imageUrl",
            FieldName::IsEnabled => "is_enabled",
        }
    }

    pub fn is_checkbox(self) -> bool {
        matches!(self, FieldName::IsEnabled)
    }

    /// Pairs the field with an input, rejecting text for the checkbox and a
    /// checkbox state for text fields.
    pub fn bind(self, input: FieldInput) -> Result<FieldUpdate, FormError> {
        match (self, input) {
            (FieldName::Text(field), FieldInput::Text(value)) => Ok(FieldUpdate::Text(field, value)),
            (FieldName::IsEnabled, FieldInput::Checked(checked)) => Ok(FieldUpdate::Enabled(checked)),
            (field, FieldInput::Text(_)) => Err(FormError::InputKindMismatch {
                field: field.as_str(),
                given: "text",
            }),
            (field, FieldInput::Checked(_)) => Err(FormError::InputKindMismatch {
                field: field.as_str(),
                given: "checkbox",
            }),
        }
    }
}

impl FromStr for FieldName {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "title" => FieldName::Text(TextField::Title),
            "category" => FieldName::Text(TextField::Category),
            "unit" => FieldName::Text(TextField::Unit),
            "origin_price" => FieldName::Text(TextField::OriginPrice),
            "price" => FieldName::Text(TextField::Price),
            "description" => FieldName::Text(TextField::Description),
            "content" => FieldName::Text(TextField::Content),
            "imageUrl" => FieldName::Text(TextField::ImageUrl),
            "is_enabled" => FieldName::IsEnabled,
            other => return Err(FormError::UnknownField(other.to_string())),
        })
    }
}

/// Raw value coming from a form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    Text(String),
    Checked(bool),
}

impl FieldInput {
    /// Reads a control the way an input change handler does: checkbox
    /// controls report their checked state, everything else its raw value.
    pub fn from_control(value: &str, checked: bool, is_checkbox: bool) -> Self {
        if is_checkbox {
            FieldInput::Checked(checked)
        } else {
            FieldInput::Text(value.to_string())
        }
    }
}

/// A validated single-field edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Text(TextField, String),
    Enabled(bool),
}

impl FieldUpdate {
    pub fn parse(name: &str, input: FieldInput) -> Result<Self, FormError> {
        name.parse::<FieldName>()?.bind(input)
    }
}

/// Product being created, edited or confirmed for deletion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub id: ProductId,
    pub title: String,
    pub category: String,
    pub unit: String,
    pub description: String,
    pub content: String,
    pub origin_price: String,
    pub price: String,
    pub is_enabled: bool,
    pub image_url: String,
    images: ImageSlots,
}

/// Partial draft supplied when the form opens. `None` keeps the default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductTemplate {
    pub id: Option<ProductId>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub origin_price: Option<String>,
    pub price: Option<String>,
    pub is_enabled: Option<bool>,
    pub image_url: Option<String>,
    pub images_url: Option<Vec<String>>,
}

impl From<&ProductRecord> for ProductTemplate {
    fn from(record: &ProductRecord) -> Self {
        Self {
            id: Some(record.id.clone()),
            title: Some(record.title.clone()),
            category: Some(record.category.clone()),
            unit: Some(record.unit.clone()),
            description: Some(record.description.clone()),
            content: Some(record.content.clone()),
            origin_price: Some(number_text(record.origin_price)),
            price: Some(number_text(record.price)),
            is_enabled: Some(record.enabled()),
            image_url: Some(record.image_url.clone()),
            images_url: Some(record.images_url.clone()),
        }
    }
}

fn number_text(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

impl ProductDraft {
    /// Fresh default draft with the template's fields laid over it.
    pub fn from_template(template: ProductTemplate) -> Self {
        let defaults = Self::default();
        Self {
            id: template.id.unwrap_or(defaults.id),
            title: template.title.unwrap_or(defaults.title),
            category: template.category.unwrap_or(defaults.category),
            unit: template.unit.unwrap_or(defaults.unit),
            description: template.description.unwrap_or(defaults.description),
            content: template.content.unwrap_or(defaults.content),
            origin_price: template.origin_price.unwrap_or(defaults.origin_price),
            price: template.price.unwrap_or(defaults.price),
            is_enabled: template.is_enabled.unwrap_or(defaults.is_enabled),
            image_url: template.image_url.unwrap_or(defaults.image_url),
            images: template
                .images_url
                .map(ImageSlots::from_urls)
                .unwrap_or(defaults.images),
        }
    }

    pub fn images(&self) -> &ImageSlots {
        &self.images
    }

    pub(crate) fn images_mut(&mut self) -> &mut ImageSlots {
        &mut self.images
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Title => &self.title,
            TextField::Category => &self.category,
            TextField::Unit => &self.unit,
            TextField::OriginPrice => &self.origin_price,
            TextField::Price => &self.price,
            TextField::Description => &self.description,
            TextField::Content => &self.content,
            TextField::ImageUrl => &self.image_url,
        }
    }

    pub(crate) fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Enabled(checked) => self.is_enabled = checked,
            FieldUpdate::Text(field, value) => {
                let slot = match field {
                    TextField::Title => &mut self.title,
                    TextField::Category => &mut self.category,
                    TextField::Unit => &mut self.unit,
                    TextField::OriginPrice => &mut self.origin_price,
                    TextField::Price => &mut self.price,
                    TextField::Description => &mut self.description,
                    TextField::Content => &mut self.content,
                    TextField::ImageUrl => &mut self.image_url,
                };
                *slot = value;
            }
        }
    }

    /// Wire payload for create/update. Prices are coerced without
    /// validation, so non-numeric text is sent as `null`.
    pub fn to_submission_payload(&self) -> Envelope<ProductRecord> {
        Envelope {
            data: ProductRecord {
                id: self.id.clone(),
                title: self.title.clone(),
                category: self.category.clone(),
                origin_price: coerce_number(&self.origin_price),
                price: coerce_number(&self.price),
                unit: self.unit.clone(),
                description: self.description.clone(),
                content: self.content.clone(),
                is_enabled: u8::from(self.is_enabled),
                image_url: self.image_url.clone(),
                images_url: self.images.filled(),
            },
        }
    }
}
