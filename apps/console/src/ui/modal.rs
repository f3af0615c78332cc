use product_form::{FormPhase, FormState, TextField};

const FIELDS: [(&str, TextField); 8] = [
    ("Title", TextField::Title),
    ("Category", TextField::Category),
    ("Unit", TextField::Unit),
    ("Origin price", TextField::OriginPrice),
    ("Price", TextField::Price),
    ("Description", TextField::Description),
    ("Content", TextField::Content),
    ("Main image", TextField::ImageUrl),
];

/// Modal body for the current form, or `None` while closed.
pub fn render_modal(form: &FormState) -> Option<String> {
    let heading = form.heading()?;
    let mut lines = vec![format!("== {heading} ==")];

    if form.phase() == FormPhase::Delete {
        if let Some(prompt) = form.delete_prompt() {
            lines.push(prompt);
        }
        return Some(lines.join("\n"));
    }

    let draft = form.draft();
    for (label, field) in FIELDS {
        lines.push(format!("{label:<12} {}", draft.text(field)));
    }
    let enabled = if draft.is_enabled { "[x]" } else { "[ ]" };
    lines.push(format!("{:<12} {enabled}", "Enabled"));

    lines.push("Images:".to_string());
    for (index, url) in draft.images().as_slice().iter().enumerate() {
        let shown = if url.is_empty() { "(empty)" } else { url.as_str() };
        lines.push(format!("  [{}] {shown}", index + 1));
    }
    if form.can_add_image_slot() {
        lines.push("  + add image".to_string());
    }
    if form.can_remove_image_slot() {
        lines.push("  - remove image".to_string());
    }

    Some(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use product_form::ProductTemplate;
    use shared::domain::FormMode;

    #[test]
    fn closed_form_renders_nothing() {
        assert!(render_modal(&FormState::default()).is_none());
    }

    #[test]
    fn create_form_lists_fields_and_affordances() {
        let mut form = FormState::default();
        form.open(FormMode::Create, ProductTemplate::default());
        let body = render_modal(&form).unwrap_or_default();
        assert!(body.starts_with("== Create product =="));
        assert!(body.contains("Enabled      [ ]"));
        assert!(body.contains("+ add image"));
        assert!(!body.contains("- remove image"));

        form.add_image_slot();
        form.set_image_at(0, "https://img.example/a.png");
        let body = render_modal(&form).unwrap_or_default();
        assert!(body.contains("  [1] https://img.example/a.png"));
        assert!(body.contains("  [2] (empty)"));
        assert!(!body.contains("+ add image"));
        assert!(body.contains("- remove image"));
    }

    #[test]
    fn delete_form_shows_prompt_only() {
        let mut form = FormState::default();
        form.open(
            FormMode::Delete,
            ProductTemplate {
                title: Some("Sencha".to_string()),
                ..ProductTemplate::default()
            },
        );
        assert_eq!(
            render_modal(&form).as_deref(),
            Some("== Delete product ==\nDelete \"Sencha\"?")
        );
    }
}
