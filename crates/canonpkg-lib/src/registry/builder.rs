use std::sync::Arc;
use std::time::Duration;

use crate::discovery::PackageSource;
use crate::frontend::Frontend;

use super::Registry;

/// Configures a [`Registry`].
pub struct RegistryBuilder {
    source: Arc<dyn PackageSource>,
    wait_timeout: Option<Duration>,
}

impl RegistryBuilder {
    pub(super) fn new(source: Arc<dyn PackageSource>) -> Self {
        Self {
            source,
            wait_timeout: None,
        }
    }

    /// How long a caller waits for another caller's in-flight load of the
    /// same key. Unset means forever.
    pub fn wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Registry {
        Registry::from_parts(Frontend::new(self.source), self.wait_timeout)
    }
}
