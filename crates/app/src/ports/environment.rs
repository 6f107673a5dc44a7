//! Render environment port: the document root that styling rules read.

use std::sync::Arc;

/// Mutable view of the ambient rendering environment.
///
/// All operations are idempotent: setting a class that is already present,
/// or removing a style override that is absent, is a no-op.
pub trait RenderEnvironment: Send + Sync {
    /// Add (`enabled = true`) or remove a class marker.
    fn set_class(&self, name: &str, enabled: bool);

    /// Set an attribute to `value`.
    fn set_attribute(&self, name: &str, value: &str);

    /// Force a style property to `value`, or drop the override with `None`.
    fn set_style_override(&self, property: &str, value: Option<&str>);
}

impl<T: RenderEnvironment + ?Sized> RenderEnvironment for Arc<T> {
    fn set_class(&self, name: &str, enabled: bool) {
        (**self).set_class(name, enabled);
    }

    fn set_attribute(&self, name: &str, value: &str) {
        (**self).set_attribute(name, value);
    }

    fn set_style_override(&self, property: &str, value: Option<&str>) {
        (**self).set_style_override(property, value);
    }
}
