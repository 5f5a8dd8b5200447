//! Lifecycle markers attached to test-class methods
//!
//! A [`Marker`] is pure data: the category it belongs to plus whatever
//! parameter the category carries (a priority, a raw CSV string). Each
//! [`MarkerCategory`] is owned by exactly one handler in the registry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest accepted `@Test` priority
pub const MIN_PRIORITY: i32 = 1;

/// Highest accepted `@Test` priority
pub const MAX_PRIORITY: i32 = 10;

/// Priority used when a `@Test` marker does not declare one
pub const DEFAULT_PRIORITY: i32 = 5;

/// Semantic kind of a lifecycle marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MarkerCategory {
    /// Runs once before every test of the class (`@BeforeSuite`)
    SuiteSetup,
    /// Runs once after every test of the class (`@AfterSuite`)
    SuiteTeardown,
    /// Runs before each test (`@BeforeTest`)
    TestSetup,
    /// Runs after each test (`@AfterTest`)
    TestTeardown,
    /// A test method (`@Test`)
    TestMethod,
    /// Comma-separated call arguments for a test method (`@CsvSource`)
    CsvArguments,
}

impl MarkerCategory {
    /// Every category, in built-in discovery order
    pub const ALL: [MarkerCategory; 6] = [
        MarkerCategory::SuiteSetup,
        MarkerCategory::TestSetup,
        MarkerCategory::TestMethod,
        MarkerCategory::TestTeardown,
        MarkerCategory::SuiteTeardown,
        MarkerCategory::CsvArguments,
    ];

    /// Marker spelling used in diagnostics
    #[must_use]
    pub const fn marker_name(self) -> &'static str {
        match self {
            Self::SuiteSetup => "@BeforeSuite",
            Self::SuiteTeardown => "@AfterSuite",
            Self::TestSetup => "@BeforeTest",
            Self::TestTeardown => "@AfterTest",
            Self::TestMethod => "@Test",
            Self::CsvArguments => "@CsvSource",
        }
    }
}

impl fmt::Display for MarkerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker_name())
    }
}

/// A marker as declared on a method
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Marker {
    /// `@BeforeSuite`
    BeforeSuite,
    /// `@AfterSuite`
    AfterSuite,
    /// `@BeforeTest`
    BeforeTest,
    /// `@AfterTest`
    AfterTest,
    /// `@Test(priority = ..)`
    Test {
        /// Declared priority; validated against [`MIN_PRIORITY`]..=[`MAX_PRIORITY`] at registration
        priority: i32,
    },
    /// `@CsvSource("..")`
    CsvSource {
        /// Raw, unparsed comma-separated values
        values: String,
    },
    /// A marker no built-in handler knows about
    Custom {
        /// Marker name, used only for logging
        name: String,
    },
}

impl Marker {
    /// `@Test` with the default priority
    #[inline]
    #[must_use]
    pub fn test() -> Self {
        Self::Test {
            priority: DEFAULT_PRIORITY,
        }
    }

    /// `@Test` with an explicit priority
    #[inline]
    #[must_use]
    pub fn test_with_priority(priority: i32) -> Self {
        Self::Test { priority }
    }

    /// `@CsvSource` with the given raw values
    #[inline]
    #[must_use]
    pub fn csv(values: impl Into<String>) -> Self {
        Self::CsvSource {
            values: values.into(),
        }
    }

    /// A marker outside the built-in vocabulary
    #[inline]
    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom { name: name.into() }
    }

    /// Category this marker belongs to, `None` for custom markers
    #[must_use]
    pub fn category(&self) -> Option<MarkerCategory> {
        match self {
            Self::BeforeSuite => Some(MarkerCategory::SuiteSetup),
            Self::AfterSuite => Some(MarkerCategory::SuiteTeardown),
            Self::BeforeTest => Some(MarkerCategory::TestSetup),
            Self::AfterTest => Some(MarkerCategory::TestTeardown),
            Self::Test { .. } => Some(MarkerCategory::TestMethod),
            Self::CsvSource { .. } => Some(MarkerCategory::CsvArguments),
            Self::Custom { .. } => None,
        }
    }

    /// Priority carried by a `@Test` marker
    #[must_use]
    pub fn priority(&self) -> Option<i32> {
        match self {
            Self::Test { priority } => Some(*priority),
            _ => None,
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Test { priority } => write!(f, "@Test(priority = {priority})"),
            Self::CsvSource { values } => write!(f, "@CsvSource(\"{values}\")"),
            Self::Custom { name } => write!(f, "@{name}"),
            other => match other.category() {
                Some(category) => f.write_str(category.marker_name()),
                None => Ok(()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_test_priority() {
        assert_eq!(Marker::test().priority(), Some(DEFAULT_PRIORITY));
        assert_eq!(Marker::BeforeTest.priority(), None);
    }

    #[test]
    fn categories_map_one_to_one() {
        assert_eq!(Marker::BeforeSuite.category(), Some(MarkerCategory::SuiteSetup));
        assert_eq!(Marker::AfterSuite.category(), Some(MarkerCategory::SuiteTeardown));
        assert_eq!(Marker::csv("1").category(), Some(MarkerCategory::CsvArguments));
        assert_eq!(Marker::custom("Flaky").category(), None);
    }

    #[test]
    fn display_uses_marker_spelling() {
        assert_eq!(MarkerCategory::SuiteSetup.to_string(), "@BeforeSuite");
        assert_eq!(Marker::test_with_priority(7).to_string(), "@Test(priority = 7)");
        assert_eq!(Marker::AfterTest.to_string(), "@AfterTest");
        assert_eq!(Marker::csv("1, 2").to_string(), "@CsvSource(\"1, 2\")");
    }
}
