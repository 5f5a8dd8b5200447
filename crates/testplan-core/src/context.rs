//! Run context
//!
//! Typed key/value store scoped to one planning pass. The planner creates it
//! empty, handlers fill it while methods are dispatched, and step
//! contributors read it while building steps. It is never shared between
//! passes and is not thread-safe.

use crate::capability::ArgumentProvider;
use crate::class::MethodRef;
use crate::marker::MarkerCategory;
use std::any::Any;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Key under which the planner stores the argument-provider list
pub const ARGUMENT_PROVIDERS: ContextKey = ContextKey::Named(Cow::Borrowed("argument providers"));

/// Key into the run context
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContextKey {
    /// Methods registered for a marker category
    Category(MarkerCategory),
    /// Well-known or handler-defined string key
    Named(Cow<'static, str>),
}

impl ContextKey {
    /// Named key
    #[inline]
    #[must_use]
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Named(name.into())
    }
}

impl From<MarkerCategory> for ContextKey {
    fn from(category: MarkerCategory) -> Self {
        Self::Category(category)
    }
}

impl From<&'static str> for ContextKey {
    fn from(name: &'static str) -> Self {
        Self::Named(Cow::Borrowed(name))
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(category) => write!(f, "{category}"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Per-pass shared data store
pub struct RunContext<T> {
    data: HashMap<ContextKey, Box<dyn Any>>,
    _instance: PhantomData<fn(&mut T)>,
}

impl<T: 'static> RunContext<T> {
    /// Empty context
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            _instance: PhantomData,
        }
    }

    /// Store `value` under `key`, replacing any previous value
    pub fn put<V: Any>(&mut self, key: impl Into<ContextKey>, value: V) {
        self.data.insert(key.into(), Box::new(value));
    }

    /// Value under `key`, `None` when absent or of another type
    #[must_use]
    pub fn get<V: Any>(&self, key: &ContextKey) -> Option<&V> {
        self.data.get(key).and_then(|v| v.downcast_ref::<V>())
    }

    /// Mutable value under `key`
    pub fn get_mut<V: Any>(&mut self, key: &ContextKey) -> Option<&mut V> {
        self.data.get_mut(key).and_then(|v| v.downcast_mut::<V>())
    }

    /// Value under `key`, or `default` when absent
    #[must_use]
    pub fn get_or<'a, V: Any>(&'a self, key: &ContextKey, default: &'a V) -> &'a V {
        self.get(key).unwrap_or(default)
    }

    /// Whether anything is stored under `key`
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &ContextKey) -> bool {
        self.data.contains_key(key)
    }

    /// Number of keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the context is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append `method` to the list kept for `category`
    pub fn add_method(&mut self, category: MarkerCategory, method: MethodRef<T>) {
        let key = ContextKey::Category(category);
        if let Some(methods) = self.get_mut::<Vec<MethodRef<T>>>(&key) {
            methods.push(method);
            return;
        }
        if self.data.contains_key(&key) {
            tracing::warn!("Replacing non-method value stored under {}", key);
        }
        self.put(key, vec![method]);
    }

    /// Methods registered for `category` in insertion order; empty when none
    #[must_use]
    pub fn methods_for(&self, category: MarkerCategory) -> &[MethodRef<T>] {
        self.get::<Vec<MethodRef<T>>>(&ContextKey::Category(category))
            .map_or(&[][..], Vec::as_slice)
    }

    /// Argument providers stored under [`ARGUMENT_PROVIDERS`]; empty when none
    #[must_use]
    pub fn argument_providers(&self) -> &[Arc<dyn ArgumentProvider<T>>] {
        self.get::<Vec<Arc<dyn ArgumentProvider<T>>>>(&ARGUMENT_PROVIDERS)
            .map_or(&[][..], Vec::as_slice)
    }
}

impl<T: 'static> Default for RunContext<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RunContext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunContext")
            .field("keys", &self.data.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{MethodDecl, TestClass};

    fn class() -> TestClass<()> {
        TestClass::new("Dummy")
            .with_method(MethodDecl::instance("first", |_: &mut (), _| Ok(())))
            .with_method(MethodDecl::instance("second", |_: &mut (), _| Ok(())))
    }

    #[test]
    fn methods_for_unknown_category_is_empty() {
        let ctx: RunContext<()> = RunContext::new();
        assert!(ctx.methods_for(MarkerCategory::TestSetup).is_empty());
    }

    #[test]
    fn add_method_keeps_insertion_order() {
        let class = class();
        let mut ctx = RunContext::new();
        ctx.add_method(MarkerCategory::TestMethod, Arc::clone(&class.methods()[1]));
        ctx.add_method(MarkerCategory::TestMethod, Arc::clone(&class.methods()[0]));

        let names: Vec<&str> = ctx
            .methods_for(MarkerCategory::TestMethod)
            .iter()
            .map(|m| m.name())
            .collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[test]
    fn typed_put_and_get() {
        let mut ctx: RunContext<()> = RunContext::new();
        ctx.put("retries", 3_u32);

        assert_eq!(ctx.get::<u32>(&"retries".into()), Some(&3));
        assert_eq!(ctx.get::<String>(&"retries".into()), None);
        assert_eq!(*ctx.get_or(&"missing".into(), &7_u32), 7);
        assert!(ctx.contains(&ContextKey::named("retries")));
    }

    #[test]
    fn argument_providers_default_to_empty() {
        let ctx: RunContext<()> = RunContext::new();
        assert!(ctx.argument_providers().is_empty());
    }
}
