//! Forge Gate
//!
//! Static safety analysis for candidate skill sources. Four ordered checks,
//! each short-circuiting on the first failure: name must be a bare
//! identifier, source must compile, no import of a dangerous module, no
//! forbidden raw-text pattern. The gate never executes the candidate.
//!
//! Import analysis inspects string-literal import paths only; a path built
//! at runtime cannot be judged statically and passes through. The raw-text
//! scan backstops part of that hole at the cost of false positives inside
//! strings and comments.

use regex::Regex;
use rhai::{ASTNode, Engine, Expr, OptimizationLevel, Stmt, AST};
use tracing::debug;

use crate::types::{ActionError, SafetyVerdict};

/// Module names a skill may never import, judged against the first
/// `/`-separated segment of each import path.
const FORBIDDEN_MODULES: &[&str] = &["os", "subprocess", "sys"];

/// Patterns that reject a source wherever they appear, even inside string
/// literals or comments.
const FORBIDDEN_SOURCE_PATTERNS: &[&str] = &[
    // Recursive delete
    r"rm\s+-rf",
    // Filesystem format
    r"mkfs",
    // Fork bomb
    r":\(\)\{\s*:\|:&\s*\};:",
];

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Engine used for gate-time compiles only. Optimization is off: the
/// default `Simple` level folds constant branches, which would erase
/// imports nested inside them before the walk ever sees the tree.
fn vetting_engine() -> Engine {
    let mut engine = Engine::new();
    engine.set_optimization_level(OptimizationLevel::None);
    engine
}

/// A bare identifier: ASCII letters, digits and underscore, not starting
/// with a digit. Rejects empty names and path traversal before any
/// filesystem access happens.
pub fn is_bare_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Compile the source, preserving the parser's own message on failure.
fn check_syntax(engine: &Engine, source: &str) -> Result<AST, ActionError> {
    engine
        .compile(source)
        .map_err(|e| ActionError::Syntax(e.to_string()))
}

/// Walk the compiled tree and return the first forbidden module imported.
///
/// Covers imports at any nesting depth, including inside blocks and
/// function bodies. Only string-constant paths are judged.
fn find_forbidden_import(ast: &AST) -> Option<String> {
    let mut found: Option<String> = None;

    ast.walk(&mut |path| {
        if let Some(ASTNode::Stmt(Stmt::Import(target, ..))) = path.last() {
            if let Expr::StringConstant(module_path, ..) = &target.0 {
                let top = module_path.split('/').next().unwrap_or("");
                if FORBIDDEN_MODULES.contains(&top) {
                    found = Some(top.to_string());
                    return false;
                }
            }
        }
        true
    });

    found
}

/// Scan the raw source text for forbidden patterns.
fn find_forbidden_pattern(source: &str) -> Option<String> {
    let patterns: Vec<Regex> = FORBIDDEN_SOURCE_PATTERNS
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect();

    for pattern in &patterns {
        if pattern.is_match(source) {
            return Some(pattern.as_str().to_string());
        }
    }

    None
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the full gate over a candidate skill.
///
/// Pure and deterministic: no side effects, and the same input always
/// yields the same verdict. Compiles with its own unoptimized engine, not
/// the runtime one, so the import walk judges the source as written.
pub fn vet_skill(name: &str, source: &str) -> SafetyVerdict {
    if !is_bare_identifier(name) {
        return SafetyVerdict::deny(ActionError::InvalidIdentifier(name.to_string()));
    }

    let engine = vetting_engine();
    let ast = match check_syntax(&engine, source) {
        Ok(ast) => ast,
        Err(e) => return SafetyVerdict::deny(e),
    };

    if let Some(module) = find_forbidden_import(&ast) {
        return SafetyVerdict::deny(ActionError::ForbiddenImport(module));
    }

    if let Some(pattern) = find_forbidden_pattern(source) {
        return SafetyVerdict::deny(ActionError::ForbiddenPattern(pattern));
    }

    debug!("Forge gate passed for skill '{}'", name);
    SafetyVerdict::allow()
}
