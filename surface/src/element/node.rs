use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::Content;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn generate_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

/// What an element is, as far as focus is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementKind {
    #[default]
    Container,
    Text,
    Button,
    Link,
    Input,
    Select,
    TextArea,
}

impl ElementKind {
    /// Interactive kinds take focus without an explicit tab index.
    pub fn is_interactive(self) -> bool {
        matches!(
            self,
            ElementKind::Button
                | ElementKind::Link
                | ElementKind::Input
                | ElementKind::Select
                | ElementKind::TextArea
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    // Identity
    pub id: String,
    pub kind: ElementKind,

    // Content
    pub content: Content,

    // Interaction
    /// Explicit tab index. `Some(n)` with `n >= 0` makes any element tabbable,
    /// a negative value makes it focusable only programmatically.
    pub tab_index: Option<i32>,
    /// Disabled elements never take focus.
    pub disabled: bool,

    // Custom data storage (action tags, test hooks, etc.)
    pub data: HashMap<String, String>,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            id: generate_id("el"),
            kind: ElementKind::Container,
            content: Content::None,
            tab_index: None,
            disabled: false,
            data: HashMap::new(),
        }
    }
}

impl Element {
    pub fn box_() -> Self {
        Self {
            id: generate_id("box"),
            ..Default::default()
        }
    }

    pub fn col() -> Self {
        Self {
            id: generate_id("col"),
            ..Default::default()
        }
    }

    pub fn row() -> Self {
        Self {
            id: generate_id("row"),
            ..Default::default()
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            id: generate_id("text"),
            kind: ElementKind::Text,
            content: Content::Text(content.into()),
            ..Default::default()
        }
    }

    pub fn button(label: impl Into<String>) -> Self {
        Self {
            id: generate_id("button"),
            kind: ElementKind::Button,
            content: Content::Text(label.into()),
            ..Default::default()
        }
    }

    pub fn link(label: impl Into<String>) -> Self {
        Self {
            id: generate_id("link"),
            kind: ElementKind::Link,
            content: Content::Text(label.into()),
            ..Default::default()
        }
    }

    /// Create a text input element.
    pub fn input(value: impl Into<String>) -> Self {
        Self {
            id: generate_id("input"),
            kind: ElementKind::Input,
            content: Content::Text(value.into()),
            ..Default::default()
        }
    }

    pub fn select() -> Self {
        Self {
            id: generate_id("select"),
            kind: ElementKind::Select,
            ..Default::default()
        }
    }

    pub fn textarea(value: impl Into<String>) -> Self {
        Self {
            id: generate_id("textarea"),
            kind: ElementKind::TextArea,
            content: Content::Text(value.into()),
            ..Default::default()
        }
    }

    // Identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn kind(mut self, kind: ElementKind) -> Self {
        self.kind = kind;
        self
    }

    // Interaction
    pub fn tab_index(mut self, index: i32) -> Self {
        self.tab_index = Some(index);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Whether Tab navigation and initial overlay focus may land here.
    pub fn is_tabbable(&self) -> bool {
        if self.disabled {
            return false;
        }
        match self.tab_index {
            Some(index) => index >= 0,
            None => self.kind.is_interactive(),
        }
    }

    /// Whether the element accepts programmatic focus.
    pub fn is_focusable(&self) -> bool {
        !self.disabled && (self.kind.is_interactive() || self.tab_index.is_some())
    }

    // Custom data
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn get_data(&self, key: &str) -> Option<&String> {
        self.data.get(key)
    }

    // Children
    pub fn child(mut self, child: Element) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            _ => self.content = Content::Children(vec![child]),
        }
        self
    }

    pub fn children(mut self, new_children: impl IntoIterator<Item = Element>) -> Self {
        match &mut self.content {
            Content::Children(children) => children.extend(new_children),
            _ => self.content = Content::Children(new_children.into_iter().collect()),
        }
        self
    }
}
