//! Headless document root: records classes, attributes and inline styles.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Mutex, PoisonError};

use revdash_app::ports::RenderEnvironment;

/// Point-in-time copy of a [`HeadlessDocument`]'s root element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSnapshot {
    pub classes: BTreeSet<String>,
    pub attributes: BTreeMap<String, String>,
    pub styles: BTreeMap<String, String>,
}

impl DocumentSnapshot {
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains(name)
    }
}

/// Renders the snapshot as the opening tag of the document root, with
/// classes, attributes and inline style in a stable order.
impl fmt::Display for DocumentSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<html")?;
        if !self.classes.is_empty() {
            let classes: Vec<&str> = self.classes.iter().map(String::as_str).collect();
            write!(f, " class=\"{}\"", classes.join(" "))?;
        }
        for (name, value) in &self.attributes {
            write!(f, " {name}=\"{value}\"")?;
        }
        if !self.styles.is_empty() {
            f.write_str(" style=\"")?;
            for (i, (property, value)) in self.styles.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{property}: {value};")?;
            }
            f.write_str("\"")?;
        }
        f.write_str(">")
    }
}

/// In-memory stand-in for a document root element.
#[derive(Debug, Default)]
pub struct HeadlessDocument {
    root: Mutex<DocumentSnapshot>,
}

impl HeadlessDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current root element state.
    #[must_use]
    pub fn snapshot(&self) -> DocumentSnapshot {
        self.root().clone()
    }

    fn root(&self) -> std::sync::MutexGuard<'_, DocumentSnapshot> {
        self.root.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RenderEnvironment for HeadlessDocument {
    fn set_class(&self, name: &str, enabled: bool) {
        let mut root = self.root();
        if enabled {
            root.classes.insert(name.to_string());
        } else {
            root.classes.remove(name);
        }
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.root()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn set_style_override(&self, property: &str, value: Option<&str>) {
        let mut root = self.root();
        match value {
            Some(value) => {
                root.styles.insert(property.to_string(), value.to_string());
            }
            None => {
                root.styles.remove(property);
            }
        }
    }
}
