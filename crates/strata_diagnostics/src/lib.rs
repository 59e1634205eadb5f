//! strata_diagnostics: diagnostic messages and collection.
//!
//! The checker never formats prose on its own: it selects a
//! [`DiagnosticMessage`] key from the [`messages`] catalog and supplies
//! positional arguments. Rendering to text happens here via `{0}`-style
//! substitution; richer presentation is left to embedding tools.

use strata_core::text::TextSpan;
use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Message,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Error => write!(f, "error"),
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Message => write!(f, "message"),
        }
    }
}

/// A message template with a stable code. `{0}`, `{1}`, ... are argument
/// placeholders.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// A realized diagnostic: message key applied to arguments, plus location.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Name of the source unit this diagnostic belongs to, if known.
    pub unit: Option<String>,
    pub span: Option<TextSpan>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
    /// Nested detail lines (e.g. the member that broke a base-type check),
    /// each with an indentation depth.
    pub details: Vec<(u32, String)>,
}

impl Diagnostic {
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            unit: None,
            span: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
            details: Vec::new(),
        }
    }

    pub fn with_location(unit: String, span: TextSpan, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            unit: Some(unit),
            span: Some(span),
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
            details: Vec::new(),
        }
    }

    /// Attach an indented detail line.
    pub fn with_detail(mut self, depth: u32, text: String) -> Self {
        self.details.push((depth, text));
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref unit) = self.unit {
            write!(f, "{}", unit)?;
            if let Some(span) = self.span {
                write!(f, "({})", span.start)?;
            }
            write!(f, ": ")?;
        }
        write!(f, "{} ST{}: {}", self.category, self.code, self.message_text)?;
        for (depth, line) in &self.details {
            write!(f, "\n{}{}", "  ".repeat(*depth as usize + 1), line)?;
        }
        Ok(())
    }
}

/// Substitute `{0}`, `{1}`, ... in `template` with `args`.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// Diagnostics accumulated over one compilation session.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self { diagnostics: Vec::new() }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Sort by unit, then by span start.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            let unit_cmp = a.unit.cmp(&b.unit);
            if unit_cmp != std::cmp::Ordering::Equal {
                return unit_cmp;
            }
            let a_pos = a.span.map(|s| s.start).unwrap_or(0);
            let b_pos = b.span.map(|s| s.start).unwrap_or(0);
            a_pos.cmp(&b_pos)
        });
    }
}

// ============================================================================
// Message catalog
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
    }

    // ========================================================================
    // Name resolution (1000-1099)
    // ========================================================================
    pub const CANNOT_FIND_NAME_0: DiagnosticMessage =
        diag!(1001, Error, "Cannot find name '{0}'.");
    pub const PROPERTY_0_DOES_NOT_EXIST_ON_TYPE_1: DiagnosticMessage =
        diag!(1002, Error, "Property '{0}' does not exist on type '{1}'.");
    pub const CANNOT_FIND_MODULE_0: DiagnosticMessage =
        diag!(1003, Error, "Cannot find module '{0}'.");
    pub const NAME_0_DOES_NOT_REFER_TO_A_TYPE: DiagnosticMessage =
        diag!(1004, Error, "Name '{0}' does not refer to a type.");
    pub const PROPERTY_0_IS_PRIVATE: DiagnosticMessage =
        diag!(1005, Error, "Property '{0}' is private and only accessible within its declaring class.");
    pub const DUPLICATE_IDENTIFIER_0: DiagnosticMessage =
        diag!(1006, Error, "Duplicate identifier '{0}'.");

    // ========================================================================
    // Type relations (1100-1199)
    // ========================================================================
    pub const TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1: DiagnosticMessage =
        diag!(1100, Error, "Type '{0}' is not assignable to type '{1}'.");
    pub const TYPE_0_IS_NOT_A_SUBTYPE_OF_TYPE_1: DiagnosticMessage =
        diag!(1101, Error, "Type '{0}' is not a subtype of type '{1}'.");
    pub const TYPE_0_IS_NOT_IDENTICAL_TO_TYPE_1: DiagnosticMessage =
        diag!(1102, Error, "Type '{0}' is not identical to type '{1}'.");
    pub const PROPERTY_0_IS_MISSING_IN_TYPE_1: DiagnosticMessage =
        diag!(1103, Error, "Property '{0}' is missing in type '{1}'.");
    pub const TYPES_OF_PROPERTY_0_ARE_INCOMPATIBLE: DiagnosticMessage =
        diag!(1104, Error, "Types of property '{0}' are incompatible.");
    pub const PROPERTY_0_HAS_DIFFERENT_VISIBILITY_IN_TYPES_1_AND_2: DiagnosticMessage =
        diag!(1105, Error, "Property '{0}' has conflicting visibility in types '{1}' and '{2}'.");
    pub const CALL_SIGNATURES_OF_TYPES_0_AND_1_ARE_INCOMPATIBLE: DiagnosticMessage =
        diag!(1106, Error, "Call signatures of types '{0}' and '{1}' are incompatible.");
    pub const CONSTRUCT_SIGNATURES_OF_TYPES_0_AND_1_ARE_INCOMPATIBLE: DiagnosticMessage =
        diag!(1107, Error, "Construct signatures of types '{0}' and '{1}' are incompatible.");
    pub const INDEX_SIGNATURES_OF_TYPES_0_AND_1_ARE_INCOMPATIBLE: DiagnosticMessage =
        diag!(1108, Error, "Index signatures of types '{0}' and '{1}' are incompatible.");

    // ========================================================================
    // Calls, overloads, generics (1200-1299)
    // ========================================================================
    pub const VALUE_OF_TYPE_0_IS_NOT_CALLABLE: DiagnosticMessage =
        diag!(1200, Error, "Value of type '{0}' is not callable. Did you mean to include 'new'?");
    pub const VALUE_OF_TYPE_0_IS_NOT_NEWABLE: DiagnosticMessage =
        diag!(1201, Error, "Value of type '{0}' is not newable.");
    pub const NO_MATCHING_SIGNATURE_FOR_CALL: DiagnosticMessage =
        diag!(1202, Error, "Supplied arguments do not match any signature of call target.");
    pub const AMBIGUOUS_CALL_EXPRESSION: DiagnosticMessage =
        diag!(1203, Error, "Ambiguous call expression - could not choose overload.");
    pub const EXPECTED_0_TYPE_ARGUMENTS_BUT_GOT_1: DiagnosticMessage =
        diag!(1204, Error, "Expected {0} type arguments, but got {1}.");
    pub const TYPE_0_DOES_NOT_SATISFY_CONSTRAINT_1_FOR_TYPE_PARAMETER_2: DiagnosticMessage =
        diag!(1205, Error, "Type '{0}' does not satisfy the constraint '{1}' for type parameter '{2}'.");
    pub const TYPE_0_IS_NOT_GENERIC: DiagnosticMessage =
        diag!(1206, Error, "Type '{0}' is not generic.");
    pub const ARGUMENT_OF_TYPE_0_IS_NOT_ASSIGNABLE_TO_PARAMETER_OF_TYPE_1: DiagnosticMessage =
        diag!(1207, Error, "Argument of type '{0}' is not assignable to parameter of type '{1}'.");

    // ========================================================================
    // Statement and expression rules (1300-1399)
    // ========================================================================
    pub const SUBSEQUENT_DECLARATIONS_OF_0_MUST_HAVE_TYPE_1_BUT_HERE_HAS_TYPE_2: DiagnosticMessage =
        diag!(1300, Error, "Subsequent variable declarations of '{0}' must have type '{1}', but here has type '{2}'.");
    pub const DERIVED_CLASS_CONSTRUCTOR_MUST_CONTAIN_SUPER_CALL: DiagnosticMessage =
        diag!(1301, Error, "Constructors for derived classes must contain a 'super' call.");
    pub const SUPER_CALL_MUST_BE_FIRST_STATEMENT_IN_CONSTRUCTOR: DiagnosticMessage =
        diag!(1302, Error, "A 'super' call must be the first statement in the constructor when a class contains initialized properties or has parameter properties.");
    pub const THIS_CANNOT_BE_REFERENCED_IN_MODULE_BODY: DiagnosticMessage =
        diag!(1303, Error, "'this' cannot be referenced in a module body.");
    pub const THIS_CANNOT_BE_REFERENCED_IN_PROPERTY_INITIALIZER: DiagnosticMessage =
        diag!(1304, Error, "'this' cannot be referenced in a class property initializer.");
    pub const THIS_CANNOT_BE_REFERENCED_IN_CONSTRUCTOR_ARGUMENTS: DiagnosticMessage =
        diag!(1305, Error, "'this' cannot be referenced in constructor arguments before the 'super' call.");
    pub const SUPER_PROPERTY_ACCESS_IS_ONLY_PERMITTED_IN_MEMBERS_OF_DERIVED_CLASSES: DiagnosticMessage =
        diag!(1306, Error, "'super' property access is permitted only in a constructor, instance member function, or instance member accessor of a derived class.");
    pub const SUPER_CALLS_ARE_ONLY_PERMITTED_IN_CONSTRUCTORS_OF_DERIVED_CLASSES: DiagnosticMessage =
        diag!(1307, Error, "Super calls are permitted only in constructors of derived classes.");
    pub const GETTER_AND_SETTER_TYPES_DO_NOT_AGREE: DiagnosticMessage =
        diag!(1308, Error, "'get' and 'set' accessors of '{0}' must have the same type.");
    pub const GETTER_AND_SETTER_VISIBILITY_DOES_NOT_AGREE: DiagnosticMessage =
        diag!(1309, Error, "'get' and 'set' accessors of '{0}' must have the same visibility.");
    pub const FUNCTION_0_DECLARED_A_NON_VOID_RETURN_TYPE_BUT_HAS_NO_RETURN_EXPRESSION: DiagnosticMessage =
        diag!(1310, Error, "Function '{0}' declared a non-void return type, but has no return expression.");
    pub const INVALID_ASSIGNMENT_TARGET: DiagnosticMessage =
        diag!(1311, Error, "Invalid left-hand side of assignment expression.");
    pub const OPERATOR_0_CANNOT_BE_APPLIED_TO_TYPES_1_AND_2: DiagnosticMessage =
        diag!(1312, Error, "Operator '{0}' cannot be applied to types '{1}' and '{2}'.");
    pub const ARITHMETIC_OPERAND_MUST_BE_OF_TYPE_ANY_NUMBER_OR_ENUM: DiagnosticMessage =
        diag!(1313, Error, "An arithmetic operand must be of type 'any', 'number', or an enum type.");
    pub const FOR_IN_INDEX_MUST_BE_OF_TYPE_STRING_NUMBER_OR_ANY: DiagnosticMessage =
        diag!(1314, Error, "The index of a 'for...in' statement must be of type 'string', 'number', or 'any'.");
    pub const LEFT_OPERAND_OF_IN_MUST_BE_STRING_NUMBER_OR_ANY: DiagnosticMessage =
        diag!(1315, Error, "The left operand of 'in' must be of type 'string', 'number', or 'any'.");
    pub const RIGHT_OPERAND_OF_IN_MUST_BE_AN_OBJECT_TYPE_PARAMETER_OR_ANY: DiagnosticMessage =
        diag!(1316, Error, "The right operand of 'in' must be of an object type, a type parameter, or 'any'.");
    pub const RIGHT_OPERAND_OF_INSTANCEOF_MUST_BE_AN_OBJECT_TYPE_OR_ANY: DiagnosticMessage =
        diag!(1317, Error, "The right operand of 'instanceof' must be of an object type or 'any'.");
    pub const THE_OPERAND_OF_AN_INCREMENT_OR_DECREMENT_OPERATOR_MUST_BE_A_REFERENCE: DiagnosticMessage =
        diag!(1318, Error, "The operand of an increment or decrement operator must be a variable, property, or indexer.");

    // ========================================================================
    // Inheritance and member checking (1400-1499)
    // ========================================================================
    pub const CLASS_0_INCORRECTLY_EXTENDS_BASE_CLASS_1: DiagnosticMessage =
        diag!(1400, Error, "Class '{0}' cannot extend class '{1}'.");
    pub const CLASS_0_INCORRECTLY_IMPLEMENTS_INTERFACE_1: DiagnosticMessage =
        diag!(1401, Error, "Class '{0}' declares interface '{1}' but does not implement it.");
    pub const INTERFACE_0_INCORRECTLY_EXTENDS_INTERFACE_1: DiagnosticMessage =
        diag!(1402, Error, "Interface '{0}' cannot extend interface '{1}'.");
    pub const CLASS_0_DEFINES_MEMBER_1_AS_A_DIFFERENT_KIND_THAN_BASE_TYPE_2: DiagnosticMessage =
        diag!(1403, Error, "Class '{0}' defines member '{1}' as a different member kind than base type '{2}'.");
    pub const A_CLASS_MAY_ONLY_EXTEND_ANOTHER_CLASS: DiagnosticMessage =
        diag!(1404, Error, "A class may only extend another class.");
    pub const A_CLASS_MAY_ONLY_IMPLEMENT_A_CLASS_OR_INTERFACE: DiagnosticMessage =
        diag!(1405, Error, "A class may only implement another class or interface.");
    pub const AN_INTERFACE_MAY_ONLY_EXTEND_A_CLASS_OR_INTERFACE: DiagnosticMessage =
        diag!(1406, Error, "An interface may only extend a class or another interface.");

    // ========================================================================
    // Privacy (1500-1599)
    // ========================================================================
    pub const PROPERTY_0_OF_EXPORTED_1_HAS_OR_IS_USING_PRIVATE_TYPE_2: DiagnosticMessage =
        diag!(1500, Error, "Property '{0}' of exported '{1}' has or is using private type '{2}'.");
    pub const PARAMETER_0_OF_EXPORTED_1_HAS_OR_IS_USING_PRIVATE_TYPE_2: DiagnosticMessage =
        diag!(1501, Error, "Parameter '{0}' of exported '{1}' has or is using private type '{2}'.");
    pub const RETURN_TYPE_OF_EXPORTED_0_HAS_OR_IS_USING_PRIVATE_TYPE_1: DiagnosticMessage =
        diag!(1502, Error, "Return type of exported '{0}' has or is using private type '{1}'.");
    pub const EXPORTED_VARIABLE_0_HAS_OR_IS_USING_PRIVATE_TYPE_1: DiagnosticMessage =
        diag!(1503, Error, "Exported variable '{0}' has or is using private type '{1}'.");
    pub const PROPERTY_0_OF_EXPORTED_1_IS_USING_INACCESSIBLE_MODULE_2: DiagnosticMessage =
        diag!(1504, Error, "Property '{0}' of exported '{1}' is using inaccessible module '{2}'.");
    pub const PARAMETER_0_OF_EXPORTED_1_IS_USING_INACCESSIBLE_MODULE_2: DiagnosticMessage =
        diag!(1505, Error, "Parameter '{0}' of exported '{1}' is using inaccessible module '{2}'.");
    pub const RETURN_TYPE_OF_EXPORTED_0_IS_USING_INACCESSIBLE_MODULE_1: DiagnosticMessage =
        diag!(1506, Error, "Return type of exported '{0}' is using inaccessible module '{1}'.");
    pub const EXPORTED_VARIABLE_0_IS_USING_INACCESSIBLE_MODULE_1: DiagnosticMessage =
        diag!(1507, Error, "Exported variable '{0}' is using inaccessible module '{1}'.");
    pub const EXTENDS_CLAUSE_OF_EXPORTED_0_HAS_OR_IS_USING_PRIVATE_TYPE_1: DiagnosticMessage =
        diag!(1508, Error, "Extends clause of exported '{0}' has or is using private type '{1}'.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        let text = format_message("Type '{0}' is not assignable to type '{1}'.", &["number", "string"]);
        assert_eq!(text, "Type 'number' is not assignable to type 'string'.");
    }

    #[test]
    fn test_collection_counts() {
        let mut diags = DiagnosticCollection::new();
        assert!(!diags.has_errors());
        diags.add(Diagnostic::new(&messages::CANNOT_FIND_NAME_0, &["x"]));
        assert!(diags.has_errors());
        assert_eq!(diags.error_count(), 1);
    }

    #[test]
    fn test_detail_rendering() {
        let d = Diagnostic::new(&messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1, &["A", "B"])
            .with_detail(0, "Property 'x' is missing in type 'A'.".to_string());
        let rendered = d.to_string();
        assert!(rendered.contains("ST1100"));
        assert!(rendered.contains("Property 'x' is missing"));
    }
}
