use std::sync::Arc;

use parking_lot::RwLock;

use crate::models::params::ShapingParameters;

/// Source of live shaping configuration.
///
/// The session takes a fresh snapshot per shaping pass, so settings
/// changes apply on the next buffer without restarting capture. Injected
/// explicitly rather than read from global state.
pub trait ShapingConfigProvider: Send + Sync {
    fn shaping_parameters(&self) -> ShapingParameters;
}

/// Fixed parameters are their own provider; handy for tests and for
/// callers with no settings UI.
impl ShapingConfigProvider for ShapingParameters {
    fn shaping_parameters(&self) -> ShapingParameters {
        *self
    }
}

/// Shared, mutable shaping configuration handle.
///
/// The settings layer keeps one clone and calls `set()` when the user
/// moves a slider; the session reads snapshots through the trait.
#[derive(Debug, Clone, Default)]
pub struct SharedShapingConfig {
    inner: Arc<RwLock<ShapingParameters>>,
}

impl SharedShapingConfig {
    pub fn new(params: ShapingParameters) -> Self {
        Self {
            inner: Arc::new(RwLock::new(params)),
        }
    }

    pub fn set(&self, params: ShapingParameters) {
        *self.inner.write() = params;
    }

    pub fn get(&self) -> ShapingParameters {
        *self.inner.read()
    }
}

impl ShapingConfigProvider for SharedShapingConfig {
    fn shaping_parameters(&self) -> ShapingParameters {
        self.get()
    }
}
