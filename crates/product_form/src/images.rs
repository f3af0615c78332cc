use shared::domain::MAX_SECONDARY_IMAGES;

/// Structural effect of a single slot write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotChange {
    Replaced,
    AppendedBlank,
    CollapsedBlank,
    OutOfRange,
}

/// Secondary image URLs as edited in the form, capped at
/// [`MAX_SECONDARY_IMAGES`] entries. Empty strings are blank input slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSlots(Vec<String>);

impl ImageSlots {
    /// Builds slots from stored URLs, keeping at most the first five.
    pub fn from_urls<I>(urls: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self(urls.into_iter().take(MAX_SECONDARY_IMAGES).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Writes `value` into slot `index` and applies at most one structural
    /// change: a blank is appended after a filled last slot while there is
    /// room, otherwise clearing a slot drops the trailing blank and any
    /// blanks stacked behind it, leaving at most one.
    ///
    /// Writing an empty value into a slot that is already empty changes
    /// nothing.
    pub fn set(&mut self, index: usize, value: String) -> SlotChange {
        let Some(slot) = self.0.get_mut(index) else {
            return SlotChange::OutOfRange;
        };
        let cleared = value.is_empty() && !slot.is_empty();
        let filled = !value.is_empty();
        *slot = value;

        let len = self.0.len();
        if filled && index + 1 == len && len < MAX_SECONDARY_IMAGES {
            self.0.push(String::new());
            SlotChange::AppendedBlank
        } else if cleared && len > 1 && self.0.last().is_some_and(String::is_empty) {
            self.0.pop();
            while self.0.len() > 1 && self.0.iter().rev().take(2).all(String::is_empty) {
                self.0.pop();
            }
            SlotChange::CollapsedBlank
        } else {
            SlotChange::Replaced
        }
    }

    /// Whether the "add image" affordance is shown: there is room and the
    /// last slot (if any) already holds a URL.
    pub fn can_add(&self) -> bool {
        self.0.len() < MAX_SECONDARY_IMAGES && self.0.last().map_or(true, |last| !last.is_empty())
    }

    pub fn can_remove(&self) -> bool {
        !self.0.is_empty()
    }

    /// Appends a blank slot. Returns `false` when the list is already full.
    pub fn push_blank(&mut self) -> bool {
        if self.0.len() >= MAX_SECONDARY_IMAGES {
            return false;
        }
        self.0.push(String::new());
        true
    }

    pub fn pop(&mut self) -> Option<String> {
        self.0.pop()
    }

    /// Non-empty URLs in order, as sent to the backend.
    pub fn filled(&self) -> Vec<String> {
        self.0.iter().filter(|url| !url.is_empty()).cloned().collect()
    }
}
