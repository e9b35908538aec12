use std::sync::Arc;

use crate::gateway::{Gateway, GatewayError, GatewayResult};

pub type GatewayFactory = Arc<dyn Fn() -> Arc<dyn Gateway> + Send + Sync>;

/// Provider name to factory map, filled by explicit `register` calls at start-up.
#[derive(Clone, Default)]
pub struct GatewayRegistry {
    entries: Vec<(String, GatewayFactory)>,
}

impl GatewayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names compare ASCII case-insensitively.
    pub fn register<F>(&mut self, name: &str, factory: F) -> GatewayResult<()>
    where
        F: Fn() -> Arc<dyn Gateway> + Send + Sync + 'static,
    {
        if self.position(name).is_some() {
            return Err(GatewayError::DuplicateGateway(name.to_string()));
        }
        tracing::debug!(gateway = name, "registered gateway");
        self.entries.push((name.to_string(), Arc::new(factory)));
        Ok(())
    }

    pub fn create(&self, name: &str) -> GatewayResult<Arc<dyn Gateway>> {
        let idx = self
            .position(name)
            .ok_or_else(|| GatewayError::UnknownGateway(name.to_string()))?;
        Ok((self.entries[idx].1)())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n.eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Debug for GatewayRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
