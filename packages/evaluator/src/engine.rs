use crate::expression::evaluate;
use crate::value::{Context, Value};
use lightbox_parser::ast::Node;
use lightbox_parser::parse;
use tracing::{debug, instrument, warn};

/// Renders templates against a context by walking the parsed directive tree
/// once. Rendering never fails: a directive whose expression cannot be
/// evaluated contributes empty output and the failure is logged.
pub struct TemplateEngine;

impl TemplateEngine {
    #[instrument(skip_all, fields(template_len = template.len()))]
    pub fn render(template: &str, context: &Context) -> String {
        let nodes = parse(template);
        Self::render_nodes(&nodes, context)
    }

    /// Render an already-parsed directive tree
    pub fn render_nodes(nodes: &[Node], context: &Context) -> String {
        let mut out = String::new();
        for node in nodes {
            Self::render_node(node, context, &mut out);
        }
        out
    }

    fn render_node(node: &Node, context: &Context, out: &mut String) {
        match node {
            Node::Literal { text, .. } => out.push_str(text),

            Node::Conditional {
                condition, body, ..
            } => {
                let truthy = match evaluate(condition, context) {
                    Ok(value) => value.is_truthy(),
                    Err(err) => {
                        warn!(
                            error = %err,
                            condition = condition.as_str(),
                            "Conditional expression evaluation failed"
                        );
                        false
                    }
                };

                if truthy {
                    for child in body {
                        Self::render_node(child, context, out);
                    }
                }
            }

            Node::Loop {
                source,
                binding,
                body,
                ..
            } => {
                // The loop source is a direct context key, not a general
                // expression. Absent or non-array sources render empty.
                match context.get(source) {
                    Some(Value::Array(items)) => {
                        for item in items {
                            let child_context = context.with_binding(binding, item.clone());
                            for child in body {
                                Self::render_node(child, &child_context, out);
                            }
                        }
                    }
                    Some(other) => {
                        debug!(
                            source = source.as_str(),
                            kind = other.type_name(),
                            "Loop source is not an array"
                        );
                    }
                    None => {
                        debug!(source = source.as_str(), "Loop source missing from context");
                    }
                }
            }

            Node::Interpolation { expr, .. } => match evaluate(expr, context) {
                Ok(value) => out.push_str(&value.to_string()),
                Err(err) => {
                    warn!(
                        error = %err,
                        expression = expr.as_str(),
                        "Interpolation failed"
                    );
                }
            },
        }
    }
}
