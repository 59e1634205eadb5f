//! strata_compiler: session orchestration.
//!
//! A [`Session`] owns the interner and the node arena, coordinates binding
//! and checking across all units, and hands back the merged, sorted
//! diagnostics. Parsing is an external collaborator; embedders construct
//! trees through the session's [`AstBuilder`].

mod corelib;

use strata_ast::builder::AstBuilder;
use strata_ast::types::NodeId;
use strata_binder::Binder;
use strata_checker::{CheckError, Checker};
use strata_core::intern::StringInterner;
use strata_diagnostics::DiagnosticCollection;
use thiserror::Error;
use tracing::{debug, info_span};

/// A session-level failure. Type errors are diagnostics, not `FatalError`s;
/// only structural misuse of the session surfaces here.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("session has no units to check")]
    NoUnits,
    #[error(transparent)]
    Check(#[from] CheckError),
}

/// The result of checking a session: the checker (for querying resolved
/// types) and everything it reported.
pub struct CheckedProgram {
    pub checker: Checker,
    pub diagnostics: DiagnosticCollection,
}

impl CheckedProgram {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// One compilation session over any number of units.
pub struct Session {
    interner: StringInterner,
    builder: AstBuilder,
    units: Vec<NodeId>,
}

impl Session {
    /// A session with the core library declared (`Number`, `String`,
    /// `Boolean`, `Array<T>`, `Object`).
    pub fn new() -> Self {
        let mut session = Self::with_empty_environment();
        let lib = corelib::core_library_unit(&mut session.builder);
        session.units.push(lib);
        session
    }

    /// A session with no global declarations at all.
    pub fn with_empty_environment() -> Self {
        let interner = StringInterner::new();
        let builder = AstBuilder::new(interner.clone());
        Self { interner, builder, units: Vec::new() }
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// The node builder for constructing unit trees in this session.
    pub fn builder(&mut self) -> &mut AstBuilder {
        &mut self.builder
    }

    /// Register a unit built through [`Session::builder`]. Units are bound
    /// and checked in registration order.
    pub fn add_unit(&mut self, unit: NodeId) {
        self.units.push(unit);
    }

    /// Bind and check every registered unit.
    pub fn check(self) -> Result<CheckedProgram, FatalError> {
        if self.units.is_empty() {
            return Err(FatalError::NoUnits);
        }
        let span = info_span!("session_check", units = self.units.len());
        let _guard = span.enter();

        let ast = self.builder.finish();
        let mut binder = Binder::new(self.interner.clone());
        for &unit in &self.units {
            binder.bind_unit(&ast, unit);
        }
        debug!(decls = binder.decl_count(), symbols = binder.symbol_count(), "binding complete");

        let mut checker = Checker::new(ast, binder);
        for &unit in &self.units {
            checker.check_unit(unit)?;
        }
        let diagnostics = checker.take_diagnostics();
        debug!(errors = diagnostics.error_count(), "checking complete");
        Ok(CheckedProgram { checker, diagnostics })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_session_is_fatal() {
        let session = Session::with_empty_environment();
        assert!(matches!(session.check(), Err(FatalError::NoUnits)));
    }

    #[test]
    fn test_core_library_checks_clean() {
        let session = Session::new();
        let program = session.check().unwrap();
        assert!(!program.has_errors());
    }

    #[test]
    fn test_string_members_from_core_library() {
        let mut session = Session::new();
        let b = session.builder();
        let init = b.str("abc");
        let s = b.var("s", None, Some(init));
        let s_ref = b.ident("s");
        let upper = b.member(s_ref, "toUpperCase");
        let call = b.call(upper, vec![]);
        let stmt = b.expr_stmt(call);
        let unit = b.unit("main", vec![s, stmt]);
        session.add_unit(unit);
        let program = session.check().unwrap();
        assert!(!program.has_errors(), "{:?}", program.diagnostics);
    }

    #[test]
    fn test_array_push_element_mismatch() {
        let mut session = Session::new();
        let b = session.builder();
        let one = b.num(1.0);
        let arr_init = b.array(vec![one]);
        let xs = b.var("xs", None, Some(arr_init));
        let xs_ref = b.ident("xs");
        let push = b.member(xs_ref, "push");
        let bad = b.str("two");
        let call = b.call(push, vec![bad]);
        let stmt = b.expr_stmt(call);
        let unit = b.unit("main", vec![xs, stmt]);
        session.add_unit(unit);
        let program = session.check().unwrap();
        assert!(program.has_errors());
    }
}
