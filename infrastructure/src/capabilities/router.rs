use super::ProcessGenerator;
use crate::config::FileCapabilityConfig;
use council_application::{CapabilityResolver, GatewayError, TextGenerator};
use council_domain::CapabilityRef;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Resolves capability names to generators.
///
/// Resolution order:
///  1. an exact route for the requested name
///  2. the default route, if one is set
///  3. `GatewayError::CapabilityNotFound`
#[derive(Default)]
pub struct CapabilityRouter {
    routes: HashMap<String, Arc<dyn TextGenerator>>,
    default_route: Option<String>,
}

impl CapabilityRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// One [`ProcessGenerator`] per `[capabilities.<name>]` table.
    pub fn from_config(capabilities: &BTreeMap<String, FileCapabilityConfig>) -> Self {
        capabilities
            .iter()
            .fold(Self::new(), |router, (name, config)| {
                router.with_route(
                    name.clone(),
                    Arc::new(ProcessGenerator::from_config(name.clone(), config)),
                )
            })
    }

    pub fn with_route(
        mut self,
        name: impl Into<String>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        self.routes.insert(name.into(), generator);
        self
    }

    /// Route unknown names to an existing route.
    pub fn with_default_route(mut self, name: impl Into<String>) -> Self {
        self.default_route = Some(name.into());
        self
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl CapabilityResolver for CapabilityRouter {
    fn resolve(&self, capability: &CapabilityRef) -> Result<Arc<dyn TextGenerator>, GatewayError> {
        if let Some(generator) = self.routes.get(capability.as_str()) {
            return Ok(Arc::clone(generator));
        }

        if let Some(default) = &self.default_route
            && let Some(generator) = self.routes.get(default)
        {
            debug!("No route for '{}', using default '{}'", capability, default);
            return Ok(Arc::clone(generator));
        }

        Err(GatewayError::CapabilityNotFound(capability.to_string()))
    }
}
