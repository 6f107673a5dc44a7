//! Environment reflector: writes the settings projection onto a
//! [`RenderEnvironment`].

use revdash_domain::environment::{
    ANIMATION_DURATION_PROPERTY, COLOR_SCHEME_ATTRIBUTE, COMPACT_CLASS, DARK_CLASS,
    EnvironmentProjection, SIDEBAR_COLLAPSED_CLASS,
};
use revdash_domain::settings::Settings;

use crate::ports::RenderEnvironment;

/// Applies [`EnvironmentProjection`]s to an environment.
pub struct EnvironmentReflector<E> {
    environment: E,
}

impl<E: RenderEnvironment> EnvironmentReflector<E> {
    pub fn new(environment: E) -> Self {
        Self { environment }
    }

    /// Project `settings` with the resolved dark flag and apply it.
    pub fn apply(&self, settings: &Settings, effective_dark: bool) {
        self.apply_projection(&EnvironmentProjection::new(settings, effective_dark));
    }

    /// Apply a projection. Deterministic: the same projection always leaves
    /// the environment in the same state.
    pub fn apply_projection(&self, projection: &EnvironmentProjection) {
        let env = &self.environment;
        env.set_class(DARK_CLASS, projection.dark);

        // Clear the other sizes before setting the current one.
        for stale in projection.stale_font_classes() {
            env.set_class(stale, false);
        }
        env.set_class(projection.font_size.class_name(), true);

        env.set_attribute(COLOR_SCHEME_ATTRIBUTE, projection.color_scheme.as_str());
        env.set_style_override(ANIMATION_DURATION_PROPERTY, projection.animation_duration);
        env.set_class(COMPACT_CLASS, projection.compact);
        env.set_class(SIDEBAR_COLLAPSED_CLASS, projection.sidebar_collapsed);

        tracing::trace!(?projection, "environment reflected");
    }

    /// Borrow the environment.
    pub fn environment(&self) -> &E {
        &self.environment
    }
}
