//! Handler registry
//!
//! Provides [`HandlerRegistry`] for instantiating and looking up marker
//! handlers, and [`HandlerFactory`], the no-argument constructor a handler is
//! registered with.
//!
//! Discovery uses an explicit registration list ([`crate::handlers::builtin`])
//! instead of scanning for implementations. Extension handlers are added by
//! passing more factories to [`HandlerRegistry::from_factories`].

use crate::capability::{AnnotationHandler, ArgumentProvider, StepContributor};
use crate::error::{BoxError, ConstructionError};
use crate::handlers;
use crate::marker::MarkerCategory;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

type BuildFn<T> = Arc<dyn Fn() -> Result<Arc<dyn AnnotationHandler<T>>, BoxError> + Send + Sync>;

/// No-argument constructor for a handler
pub struct HandlerFactory<T> {
    name: String,
    build: BuildFn<T>,
}

impl<T: 'static> HandlerFactory<T> {
    /// Factory for a handler type constructed with `Default`
    #[must_use]
    pub fn of<H>() -> Self
    where
        H: AnnotationHandler<T> + Default + 'static,
    {
        Self {
            name: short_type_name::<H>().to_string(),
            build: Arc::new(|| Ok(Arc::new(H::default()) as Arc<dyn AnnotationHandler<T>>)),
        }
    }

    /// Factory from a fallible constructor
    pub fn new<F>(name: impl Into<String>, build: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn AnnotationHandler<T>>, BoxError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            build: Arc::new(build),
        }
    }

    /// Factory name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Instantiate the handler
    ///
    /// # Errors
    /// [`ConstructionError::HandlerInstantiation`] wrapping the constructor error.
    pub fn instantiate(&self) -> Result<Arc<dyn AnnotationHandler<T>>, ConstructionError> {
        (self.build)().map_err(|source| ConstructionError::HandlerInstantiation {
            handler: self.name.clone(),
            source,
        })
    }
}

impl<T> Clone for HandlerFactory<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            build: Arc::clone(&self.build),
        }
    }
}

impl<T> fmt::Debug for HandlerFactory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFactory").field("name", &self.name).finish()
    }
}

fn short_type_name<H>() -> &'static str {
    let full = std::any::type_name::<H>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Handlers indexed by the marker category they own
///
/// Iteration follows discovery order. A handler claiming a category that is
/// already owned replaces the earlier handler in place.
pub struct HandlerRegistry<T> {
    handlers: IndexMap<MarkerCategory, Arc<dyn AnnotationHandler<T>>>,
}

impl<T: 'static> HandlerRegistry<T> {
    /// Empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: IndexMap::new(),
        }
    }

    /// Registry with every built-in handler
    ///
    /// # Errors
    /// [`ConstructionError::HandlerInstantiation`] if a handler fails to construct.
    pub fn discover() -> Result<Self, ConstructionError> {
        Self::from_factories(&handlers::builtin())
    }

    /// Instantiate each factory in order and index the results
    ///
    /// # Errors
    /// The first [`ConstructionError`]; no partial registry is returned.
    pub fn from_factories(factories: &[HandlerFactory<T>]) -> Result<Self, ConstructionError> {
        let mut registry = Self::new();
        for factory in factories {
            let handler = factory.instantiate()?;
            registry.register(handler);
        }
        tracing::debug!("Registry built with {} handler(s)", registry.len());
        Ok(registry)
    }

    /// Index `handler` under its category
    pub fn register(&mut self, handler: Arc<dyn AnnotationHandler<T>>) {
        let category = handler.category();
        let name = handler.name();
        if let Some(previous) = self.handlers.insert(category, handler) {
            tracing::debug!(
                "Handler {} replaces {} for {}",
                name,
                previous.name(),
                category
            );
        }
    }

    /// Handler owning `category`
    #[inline]
    #[must_use]
    pub fn get(&self, category: MarkerCategory) -> Option<&Arc<dyn AnnotationHandler<T>>> {
        self.handlers.get(&category)
    }

    /// Check if a handler owns `category`
    #[inline]
    #[must_use]
    pub fn contains(&self, category: MarkerCategory) -> bool {
        self.handlers.contains_key(&category)
    }

    /// Read-only view of all handlers in discovery order
    #[inline]
    #[must_use]
    pub fn handlers(&self) -> &IndexMap<MarkerCategory, Arc<dyn AnnotationHandler<T>>> {
        &self.handlers
    }

    /// Iterate over handlers in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn AnnotationHandler<T>>> {
        self.handlers.values()
    }

    /// Handlers that contribute steps, in discovery order
    #[must_use]
    pub fn step_contributors(&self) -> Vec<&dyn StepContributor<T>> {
        self.handlers
            .values()
            .filter_map(|h| h.as_step_contributor())
            .collect()
    }

    /// Handlers that provide arguments, in discovery order
    #[must_use]
    pub fn argument_providers(&self) -> Vec<Arc<dyn ArgumentProvider<T>>> {
        self.handlers
            .values()
            .filter_map(|h| Arc::clone(h).into_argument_provider())
            .collect()
    }

    /// Get number of registered handlers
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<T: 'static> Default for HandlerRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for HandlerRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.handlers.iter().map(|(c, h)| (c, h.name())))
            .finish()
    }
}
