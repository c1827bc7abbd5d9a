//! # Lightbox Evaluator
//!
//! Evaluates directive templates against a data context.
//!
//! The template grammar has three directives, resolved recursively:
//! `{if <expr>}...{/if}`, `{foreach <arrayKey> as <itemName>}...{/foreach}`,
//! and `{<expr>}` interpolation.
//!
//! ## Degradation contract
//!
//! `TemplateEngine::render` never fails. A directive whose expression cannot
//! be parsed or evaluated contributes empty output; the failure is logged
//! and rendering continues. A malformed fragment blanks only itself, never
//! the whole render.
//!
//! ## Scope contract
//!
//! Loop iterations evaluate against a derived child context with the
//! iteration binding shadowed over the parent scope. The parent context is
//! never mutated, so sibling iterations are isolated and bindings do not
//! leak past the loop body.

pub mod engine;
pub mod expression;
pub mod value;

#[cfg(test)]
mod tests_expressions;

#[cfg(test)]
mod tests_templates;

pub use engine::TemplateEngine;
pub use expression::{evaluate, EvalError, EvalResult};
pub use value::{Context, Value};
