//! Test class descriptions
//!
//! A [`TestClass`] is the explicit stand-in for a reflected class: a name, an
//! optional no-argument constructor and the declared methods with their
//! markers. Method bodies are typed closures over the instance type `T`.

use crate::error::BoxError;
use crate::marker::{Marker, MarkerCategory};
use crate::value::{Args, ParamType};
use std::fmt;
use std::sync::Arc;

/// Result of invoking a method body
pub type MethodResult = Result<(), BoxError>;

/// Shared handle to a declared method
pub type MethodRef<T> = Arc<TestMethod<T>>;

type Constructor<T> = Arc<dyn Fn() -> Result<T, BoxError> + Send + Sync>;

/// Position of a method in its class's declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(pub usize);

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Callable part of a method
pub enum MethodBody<T> {
    /// Associated function; called without an instance
    Associated(Arc<dyn Fn(&Args) -> MethodResult + Send + Sync>),
    /// Method taking the test instance
    Instance(Arc<dyn Fn(&mut T, &Args) -> MethodResult + Send + Sync>),
}

impl<T> Clone for MethodBody<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Associated(f) => Self::Associated(Arc::clone(f)),
            Self::Instance(f) => Self::Instance(Arc::clone(f)),
        }
    }
}

/// Method declaration, frozen into a [`TestMethod`] when added to a class
pub struct MethodDecl<T> {
    name: String,
    params: Vec<ParamType>,
    markers: Vec<Marker>,
    body: MethodBody<T>,
}

impl<T> MethodDecl<T> {
    /// Declare an associated (static) function
    #[must_use]
    pub fn associated<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Args) -> MethodResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params: Vec::new(),
            markers: Vec::new(),
            body: MethodBody::Associated(Arc::new(body)),
        }
    }

    /// Declare an instance method
    #[must_use]
    pub fn instance<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut T, &Args) -> MethodResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params: Vec::new(),
            markers: Vec::new(),
            body: MethodBody::Instance(Arc::new(body)),
        }
    }

    /// Append a declared parameter
    #[inline]
    #[must_use]
    pub fn param(mut self, ty: ParamType) -> Self {
        self.params.push(ty);
        self
    }

    /// Append several declared parameters
    #[must_use]
    pub fn params(mut self, types: impl IntoIterator<Item = ParamType>) -> Self {
        self.params.extend(types);
        self
    }

    /// Attach a marker
    #[inline]
    #[must_use]
    pub fn marked(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }
}

/// A method as seen by handlers and plan steps
pub struct TestMethod<T> {
    id: MethodId,
    name: String,
    params: Vec<ParamType>,
    markers: Vec<Marker>,
    body: MethodBody<T>,
}

impl<T> TestMethod<T> {
    /// Declaration position within the class
    #[inline]
    #[must_use]
    pub fn id(&self) -> MethodId {
        self.id
    }

    /// Method name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameter types
    #[inline]
    #[must_use]
    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    /// Number of declared parameters
    #[inline]
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Markers in declaration order
    #[inline]
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// First marker of the given category
    #[must_use]
    pub fn marker(&self, category: MarkerCategory) -> Option<&Marker> {
        self.markers.iter().find(|m| m.category() == Some(category))
    }

    /// Priority of the `@Test` marker, if any
    #[must_use]
    pub fn priority(&self) -> Option<i32> {
        self.marker(MarkerCategory::TestMethod).and_then(Marker::priority)
    }

    /// Whether the method is called without an instance
    #[inline]
    #[must_use]
    pub fn is_static(&self) -> bool {
        matches!(self.body, MethodBody::Associated(_))
    }

    /// Callable body
    #[inline]
    #[must_use]
    pub fn body(&self) -> &MethodBody<T> {
        &self.body
    }

    /// Call the method; associated functions ignore `instance`
    ///
    /// # Errors
    /// Whatever the body returns.
    pub fn invoke(&self, instance: &mut T, args: &Args) -> MethodResult {
        match &self.body {
            MethodBody::Associated(f) => f(args),
            MethodBody::Instance(f) => f(instance, args),
        }
    }
}

impl<T> fmt::Debug for TestMethod<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestMethod")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("params", &self.params)
            .field("markers", &self.markers)
            .field("static", &self.is_static())
            .finish()
    }
}

/// Explicit description of a test class
pub struct TestClass<T> {
    name: String,
    constructor: Option<Constructor<T>>,
    methods: Vec<MethodRef<T>>,
}

impl<T> TestClass<T> {
    /// Empty class without a constructor
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constructor: None,
            methods: Vec::new(),
        }
    }

    /// Set the no-argument constructor
    #[must_use]
    pub fn with_constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn() -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(constructor));
        self
    }

    /// Use `T::default()` as the constructor
    #[must_use]
    pub fn with_default_constructor(self) -> Self
    where
        T: Default + 'static,
    {
        self.with_constructor(|| Ok(T::default()))
    }

    /// Declare a method; ids follow declaration order
    #[must_use]
    pub fn with_method(mut self, decl: MethodDecl<T>) -> Self {
        let id = MethodId(self.methods.len());
        self.methods.push(Arc::new(TestMethod {
            id,
            name: decl.name,
            params: decl.params,
            markers: decl.markers,
            body: decl.body,
        }));
        self
    }

    /// Class name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared methods in declaration order
    #[inline]
    #[must_use]
    pub fn methods(&self) -> &[MethodRef<T>] {
        &self.methods
    }

    /// Look up a method by name
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&MethodRef<T>> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Whether a no-argument constructor is declared
    #[inline]
    #[must_use]
    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// Run the constructor; `None` when the class declares none
    pub fn instantiate(&self) -> Option<Result<T, BoxError>> {
        self.constructor.as_ref().map(|c| c())
    }
}

impl<T> fmt::Debug for TestClass<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestClass")
            .field("name", &self.name)
            .field("constructor", &self.constructor.is_some())
            .field("methods", &self.methods)
            .finish()
    }
}

/// A type that describes itself as a test class
pub trait TestSuite: Sized + 'static {
    /// Class description used for planning and running
    fn test_class() -> TestClass<Self>;
}
