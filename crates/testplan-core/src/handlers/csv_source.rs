//! `@CsvSource` handler
//!
//! Parses the raw comma-separated string of a `@CsvSource` marker against the
//! method's declared parameter types when the method is registered, caches the
//! result and hands it out again as an [`ArgumentProvider`]. It contributes no
//! steps of its own: the method still needs `@Test` to run.

use crate::capability::{expect_category, AnnotationHandler, ArgumentProvider};
use crate::class::{MethodId, MethodRef};
use crate::context::RunContext;
use crate::error::RegistrationError;
use crate::marker::{Marker, MarkerCategory};
use crate::value::{ArgValue, ParamType};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Validates `@CsvSource` values and provides them as arguments
#[derive(Debug, Default)]
pub struct CsvSourceHandler {
    parsed: Mutex<HashMap<MethodId, Vec<ArgValue>>>,
}

impl CsvSourceHandler {
    /// Empty handler
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached arguments for the method with `id`
    #[must_use]
    pub fn cached(&self, id: MethodId) -> Option<Vec<ArgValue>> {
        self.parsed.lock().get(&id).cloned()
    }
}

/// Split a raw `@CsvSource` string into trimmed tokens
///
/// A source without a comma is a single token, so `""` yields `[""]`.
/// Trailing empty tokens are dropped: `"1,2,"` yields `["1", "2"]`.
/// Quoting is not supported.
#[must_use]
pub fn parse_csv(raw: &str) -> Vec<&str> {
    if !raw.contains(',') {
        return vec![raw.trim()];
    }
    let mut tokens: Vec<&str> = raw.split(',').map(str::trim).collect();
    while tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    tokens
}

fn coerce(
    method: &str,
    index: usize,
    token: &str,
    ty: &ParamType,
) -> Result<ArgValue, RegistrationError> {
    let invalid = |reason: String| RegistrationError::InvalidValue {
        method: method.to_string(),
        index,
        token: token.to_string(),
        ty: ty.clone(),
        reason,
    };

    match ty {
        ParamType::Int => token.parse().map(ArgValue::Int).map_err(|e| invalid(e.to_string())),
        ParamType::Long => token.parse().map(ArgValue::Long).map_err(|e| invalid(e.to_string())),
        ParamType::Float => token.parse().map(ArgValue::Float).map_err(|e| invalid(e.to_string())),
        ParamType::Bool => Ok(ArgValue::Bool(token.eq_ignore_ascii_case("true"))),
        ParamType::Text => Ok(ArgValue::Text(token.to_string())),
        ParamType::Other(_) => Err(RegistrationError::UnsupportedParameterType {
            method: method.to_string(),
            index,
            ty: ty.clone(),
        }),
    }
}

impl<T: 'static> AnnotationHandler<T> for CsvSourceHandler {
    fn category(&self) -> MarkerCategory {
        MarkerCategory::CsvArguments
    }

    fn name(&self) -> &'static str {
        "CsvSourceHandler"
    }

    fn handle(
        &self,
        method: &MethodRef<T>,
        marker: &Marker,
        ctx: &mut RunContext<T>,
    ) -> Result<(), RegistrationError> {
        expect_category(MarkerCategory::CsvArguments, method, marker)?;
        let Marker::CsvSource { values } = marker else {
            return Ok(());
        };

        if method.is_static() {
            return Err(RegistrationError::MustNotBeStatic {
                marker: MarkerCategory::CsvArguments,
                method: method.name().to_string(),
            });
        }

        let tokens = parse_csv(values);
        if tokens.len() != method.param_count() {
            return Err(RegistrationError::ArgumentCountMismatch {
                method: method.name().to_string(),
                values: tokens.len(),
                params: method.param_count(),
            });
        }

        let args = tokens
            .iter()
            .zip(method.params())
            .enumerate()
            .map(|(index, (token, ty))| coerce(method.name(), index, token, ty))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Parsed @CsvSource for {}: {} value(s)", method.name(), args.len());
        self.parsed.lock().insert(method.id(), args);
        ctx.add_method(MarkerCategory::CsvArguments, Arc::clone(method));
        Ok(())
    }

    fn into_argument_provider(self: Arc<Self>) -> Option<Arc<dyn ArgumentProvider<T>>> {
        Some(self)
    }
}

impl<T: 'static> ArgumentProvider<T> for CsvSourceHandler {
    fn arguments_for(&self, method: &MethodRef<T>, _ctx: &RunContext<T>) -> Option<Vec<ArgValue>> {
        self.cached(method.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{MethodDecl, TestClass};
    use pretty_assertions::assert_eq;

    fn method_with(params: Vec<ParamType>) -> MethodRef<()> {
        let class = TestClass::new("Csv")
            .with_method(MethodDecl::instance("target", |_: &mut (), _| Ok(())).params(params));
        Arc::clone(&class.methods()[0])
    }

    fn register(
        handler: &CsvSourceHandler,
        method: &MethodRef<()>,
        raw: &str,
    ) -> Result<(), RegistrationError> {
        let mut ctx = RunContext::new();
        handler.handle(method, &Marker::csv(raw), &mut ctx)
    }

    #[test]
    fn tokens_are_trimmed() {
        assert_eq!(parse_csv(" 1 ,two,  3"), vec!["1", "two", "3"]);
        assert_eq!(parse_csv("a,,b"), vec!["a", "", "b"]);
    }

    #[test]
    fn blank_source_is_one_empty_token() {
        assert_eq!(parse_csv(""), vec![""]);
        assert_eq!(parse_csv("   "), vec![""]);
    }

    #[test]
    fn trailing_empty_tokens_dropped() {
        assert_eq!(parse_csv("1,2,"), vec!["1", "2"]);
        assert_eq!(parse_csv("1, ,  , "), vec!["1"]);
        assert_eq!(parse_csv(",,"), Vec::<&str>::new());
        assert_eq!(parse_csv(",1"), vec!["", "1"]);
    }

    #[test]
    fn coerces_positionally() {
        let handler = CsvSourceHandler::new();
        let method = method_with(vec![
            ParamType::Int,
            ParamType::Text,
            ParamType::Float,
            ParamType::Bool,
        ]);

        register(&handler, &method, "42, hello, 2.5, true").unwrap();

        assert_eq!(
            handler.cached(method.id()),
            Some(vec![
                ArgValue::Int(42),
                ArgValue::Text("hello".into()),
                ArgValue::Float(2.5),
                ArgValue::Bool(true),
            ])
        );
    }

    #[test]
    fn long_and_lenient_bool() {
        let handler = CsvSourceHandler::new();
        let method = method_with(vec![ParamType::Long, ParamType::Bool, ParamType::Bool]);

        register(&handler, &method, "9000000000, TRUE, yes").unwrap();

        assert_eq!(
            handler.cached(method.id()),
            Some(vec![
                ArgValue::Long(9_000_000_000),
                ArgValue::Bool(true),
                ArgValue::Bool(false),
            ])
        );
    }

    #[test]
    fn count_mismatch_rejected() {
        let handler = CsvSourceHandler::new();
        let method = method_with(vec![ParamType::Int]);

        let err = register(&handler, &method, "1,2").unwrap_err();
        assert_eq!(
            err.to_string(),
            "@CsvSource values count (2) doesn't match method parameters count (1) in: target"
        );
        assert_eq!(handler.cached(method.id()), None);
    }

    #[test]
    #[allow(clippy::approx_constant)]
    fn mixed_source_resolves_exactly() {
        let handler = CsvSourceHandler::new();
        let method = method_with(vec![
            ParamType::Int,
            ParamType::Text,
            ParamType::Float,
            ParamType::Bool,
        ]);

        register(&handler, &method, "42, hello, 3.14, true").unwrap();

        assert_eq!(
            handler.cached(method.id()),
            Some(vec![
                ArgValue::Int(42),
                ArgValue::Text("hello".into()),
                ArgValue::Float(3.14),
                ArgValue::Bool(true),
            ])
        );
    }

    #[test]
    fn blank_source_is_one_text_value() {
        let handler = CsvSourceHandler::new();
        let method = method_with(vec![ParamType::Text]);
        register(&handler, &method, "").unwrap();
        assert_eq!(handler.cached(method.id()), Some(vec![ArgValue::Text(String::new())]));
    }

    #[test]
    fn blank_source_rejected_without_params() {
        let handler = CsvSourceHandler::new();
        let method = method_with(Vec::new());
        let err = register(&handler, &method, "").unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::ArgumentCountMismatch { values: 1, params: 0, .. }
        ));
        assert_eq!(handler.cached(method.id()), None);
    }

    #[test]
    fn unparsable_token_rejected() {
        let handler = CsvSourceHandler::new();
        let method = method_with(vec![ParamType::Int]);
        let err = register(&handler, &method, "forty-two").unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidValue { index: 0, .. }));
    }

    #[test]
    fn unsupported_type_rejected() {
        let handler = CsvSourceHandler::new();
        let method = method_with(vec![ParamType::Int, ParamType::other("Duration")]);
        let err = register(&handler, &method, "1, 5s").unwrap_err();
        assert!(matches!(err, RegistrationError::UnsupportedParameterType { index: 1, .. }));
    }

    #[test]
    fn static_method_rejected() {
        let class: TestClass<()> =
            TestClass::new("Csv").with_method(MethodDecl::associated("target", |_| Ok(())));
        let err = register(&CsvSourceHandler::new(), &class.methods()[0], "").unwrap_err();
        assert!(err.to_string().contains("must not be static"));
    }

    #[test]
    fn provides_cached_arguments() {
        let handler = Arc::new(CsvSourceHandler::new());
        let method = method_with(vec![ParamType::Int]);
        let mut ctx = RunContext::new();
        handler.handle(&method, &Marker::csv("7"), &mut ctx).unwrap();

        let shared: Arc<CsvSourceHandler> = Arc::clone(&handler);
        let provider = AnnotationHandler::<()>::into_argument_provider(shared).unwrap();
        assert_eq!(provider.arguments_for(&method, &ctx), Some(vec![ArgValue::Int(7)]));
        assert_eq!(ctx.methods_for(MarkerCategory::CsvArguments).len(), 1);
    }
}
