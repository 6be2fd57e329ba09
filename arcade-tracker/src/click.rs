/// The parts of a DOM element a click event needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name, any case (`a`, `BUTTON`, `div`).
    pub tag: String,
    pub id: Option<String>,
    /// Rendered text.
    pub text: Option<String>,
    /// Value of the `data-trackable` attribute, if present.
    pub trackable: Option<String>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_trackable(mut self, tag: impl Into<String>) -> Self {
        self.trackable = Some(tag.into());
        self
    }

    /// Anchors, buttons, and anything carrying `data-trackable`.
    pub fn is_trackable(&self) -> bool {
        self.tag.eq_ignore_ascii_case("a")
            || self.tag.eq_ignore_ascii_case("button")
            || self.trackable.is_some()
    }

    /// First non-empty of: text, id, `data-trackable`, upper-case tag name.
    pub fn label(&self) -> String {
        [&self.text, &self.id, &self.trackable]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .cloned()
            .unwrap_or_else(|| self.tag.to_ascii_uppercase())
    }
}

/// The element a click is attributed to: the clicked element or its closest
/// trackable ancestor. `path` runs from the clicked element up to the root.
pub fn click_target(path: &[Element]) -> Option<&Element> {
    path.iter().find(|el| el.is_trackable())
}
