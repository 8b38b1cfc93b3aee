use crate::listener::Listener;
use mesh_control_plane_core::ResourceType;
use thiserror::Error;

/// A single mutation step over a listener under construction.
///
/// Configurers are value objects collected into a [`ListenerBuilder`], so a
/// pipeline can be inspected and tested without executing it.
pub trait ListenerConfigurer: Send + Sync {
    fn configure(&self, listener: &mut Listener) -> Result<(), ConfigurerError>;
}

/// An ordered sequence of configurers applied to one listener.
#[derive(Default)]
pub struct ListenerBuilder {
    configurers: Vec<Box<dyn ListenerConfigurer>>,
}

#[derive(Debug, Error)]
pub enum ConfigurerError {
    #[error("unexpected resource of type {found}, expected {expected}")]
    UnexpectedKind {
        expected: ResourceType,
        found: ResourceType,
    },
}

// === impl ListenerBuilder ===

impl ListenerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, configurer: impl ListenerConfigurer + 'static) -> Self {
        self.configurers.push(Box::new(configurer));
        self
    }

    /// Adds a configurer only when present; `None` registers nothing at all.
    pub fn add_opt(self, configurer: Option<impl ListenerConfigurer + 'static>) -> Self {
        match configurer {
            Some(configurer) => self.add(configurer),
            None => self,
        }
    }

    pub fn len(&self) -> usize {
        self.configurers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurers.is_empty()
    }

    /// Applies the configurers strictly in registration order.
    ///
    /// The listener is consumed: it is returned only when every configurer
    /// succeeded, so a partially mutated object is never observable. Later
    /// configurers may depend on mutations made by earlier ones, so steps
    /// run sequentially.
    pub fn build(&self, mut listener: Listener) -> Result<Listener, ConfigurerError> {
        for configurer in &self.configurers {
            configurer.configure(&mut listener)?;
        }
        Ok(listener)
    }
}
