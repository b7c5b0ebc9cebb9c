/// CSS `display` value applied to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Block,
    None,
}

impl Display {
    pub fn as_css(&self) -> &'static str {
        match self {
            Display::Block => "block",
            Display::None => "none",
        }
    }
}

/// Visibility of each item, by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilitySet {
    visible: Vec<bool>,
}

impl VisibilitySet {
    /// Every one of `len` items visible.
    pub fn all(len: usize) -> Self {
        Self {
            visible: vec![true; len],
        }
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Out-of-range indices are reported hidden.
    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.get(index).copied().unwrap_or(false)
    }

    pub fn display(&self, index: usize) -> Display {
        if self.is_visible(index) {
            Display::Block
        } else {
            Display::None
        }
    }

    pub fn visible_indices(&self) -> Vec<usize> {
        self.visible
            .iter()
            .enumerate()
            .filter_map(|(i, shown)| shown.then_some(i))
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|shown| **shown).count()
    }
}

/// Shows an item iff its lowercased text contains the lowercased query.
///
/// An empty query matches everything.
pub fn filter<S: AsRef<str>>(query: &str, items: &[S]) -> VisibilitySet {
    let needle = query.to_lowercase();
    VisibilitySet {
        visible: items
            .iter()
            .map(|item| item.as_ref().to_lowercase().contains(&needle))
            .collect(),
    }
}

/// A search input bound to a fixed set of items.
#[derive(Debug, Clone)]
pub struct ListFilter {
    items: Vec<String>,
    value: String,
    visibility: VisibilitySet,
}

impl ListFilter {
    /// Binds the filter to `items`; everything starts visible.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        let visibility = VisibilitySet::all(items.len());
        Self {
            items,
            value: String::new(),
            visibility,
        }
    }

    /// Handles one input event carrying the new value of the search box.
    pub fn on_input(&mut self, value: impl Into<String>) -> &VisibilitySet {
        self.value = value.into();
        self.visibility = filter(&self.value, &self.items[..]);
        &self.visibility
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Result of the last evaluation.
    pub fn visibility(&self) -> &VisibilitySet {
        &self.visibility
    }

    /// Texts of the items currently shown.
    pub fn visible_items(&self) -> Vec<&str> {
        self.visibility
            .visible_indices()
            .into_iter()
            .map(|i| self.items[i].as_str())
            .collect()
    }
}
