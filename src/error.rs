//! Diagnostic error types for the model transformation.
//!
//! Recoverable import/export conditions (unknown templates, unknown relation
//! kinds, ambiguous super-classes) are not errors: they are logged and
//! skipped, per the additive failure semantics of the transformation. The
//! types here cover what genuinely aborts a call — unparseable documents,
//! unserializable output, unreadable hypergraph files — with miette
//! `#[diagnostic]` derives so users see codes and help text.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the modelgraph crate.
#[derive(Debug, Error, Diagnostic)]
pub enum ModelError {
    #[error("failed to parse component document: {source}")]
    #[diagnostic(
        code(modelgraph::document::parse),
        help(
            "The document must be valid YAML with the component-catalog \
             structure: domain, type, name and a versions list at the top \
             level. Check indentation and key spelling."
        )
    )]
    ParseDocument {
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to serialize component document: {source}")]
    #[diagnostic(code(modelgraph::document::serialize))]
    SerializeDocument {
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),
}

/// Errors of the hypergraph engine itself.
#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("failed to load hypergraph: {source}")]
    #[diagnostic(
        code(modelgraph::graph::load),
        help(
            "The hypergraph file is not a valid serialized graph. It must \
             have been written by this tool (or share its concepts/facts \
             layout); re-export it or start from a fresh graph."
        )
    )]
    Load {
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to serialize hypergraph: {source}")]
    #[diagnostic(code(modelgraph::graph::save))]
    Save {
        #[source]
        source: serde_yaml::Error,
    },
}

/// Convenience alias for functions returning modelgraph results.
pub type ModelResult<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_error_converts_to_model_error() {
        let source = serde_yaml::from_str::<u32>("not-a-number").unwrap_err();
        let err: ModelError = GraphError::Load { source }.into();
        assert!(matches!(err, ModelError::Graph(GraphError::Load { .. })));
    }

    #[test]
    fn parse_error_display_names_the_document() {
        let source = serde_yaml::from_str::<u32>("[").unwrap_err();
        let err = ModelError::ParseDocument { source };
        assert!(err.to_string().contains("component document"));
    }
}
