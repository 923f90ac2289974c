//! Error types for the stylesheet builder

use cascada_syntax::{NodeKind, Span};
use thiserror::Error;

/// Result type for build operations
pub type BuildResult<T> = Result<T, BuildError>;

/// A fatal failure of a build call. No partial AST is ever returned alongside one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("Unknown rule type: {kind}")]
    UnknownRuleKind { kind: NodeKind, span: Span },

    #[error("Unknown style declaration type: {kind}")]
    UnknownDeclarationKind { kind: NodeKind, span: Span },

    #[error("Unknown component value: <{token_kind}, {node_kind}> in `{snippet}`")]
    UnknownComponentValue {
        token_kind: &'static str,
        node_kind: NodeKind,
        snippet: String,
        span: Span,
    },

    #[error("Unsupported value part: {kind} `{snippet}`")]
    UnsupportedPrintPart {
        kind: NodeKind,
        snippet: String,
        span: Span,
    },

    #[error("Cannot trim whitespace from a value sequence of {len} whitespace-only parts")]
    MalformedValueSequence { len: usize, span: Option<Span> },

    #[error("Value nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize, span: Span },
}

impl BuildError {
    pub fn span(&self) -> Option<Span> {
        match self {
            BuildError::UnknownRuleKind { span, .. } => Some(*span),
            BuildError::UnknownDeclarationKind { span, .. } => Some(*span),
            BuildError::UnknownComponentValue { span, .. } => Some(*span),
            BuildError::UnsupportedPrintPart { span, .. } => Some(*span),
            BuildError::MalformedValueSequence { span, .. } => *span,
            BuildError::NestingTooDeep { span, .. } => Some(*span),
        }
    }
}

/// Failure to decode parser options
#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("Invalid parser options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pretty-print a build error with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub fn format_error(source: &str, filename: &str, error: &BuildError) -> String {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let span = error.span().unwrap_or(Span {
        start: source.len().saturating_sub(1),
        end: source.len(),
    });

    let label = match error {
        BuildError::UnknownRuleKind { .. } => "expected a style rule or an at-rule".to_string(),
        BuildError::UnknownDeclarationKind { .. } => {
            "expected a declaration or an at-rule".to_string()
        }
        BuildError::UnknownComponentValue { token_kind, .. } => {
            format!("{} cannot appear in a value", token_kind)
        }
        BuildError::UnsupportedPrintPart { kind, .. } => format!("cannot print {}", kind),
        BuildError::MalformedValueSequence { .. } => "value is empty".to_string(),
        BuildError::NestingTooDeep { .. } => "nesting limit reached here".to_string(),
    };

    let mut output = Vec::new();
    let report = Report::build(ReportKind::Error, filename, span.start)
        .with_message(error.to_string())
        .with_label(
            Label::new((filename, span.start..span.end))
                .with_color(Color::Red)
                .with_message(label),
        )
        .finish();

    if report
        .write((filename, Source::from(source)), &mut output)
        .is_err()
    {
        return error.to_string();
    }

    String::from_utf8(output).unwrap_or_else(|_| "Error formatting failed".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_kind() {
        let err = BuildError::UnknownRuleKind {
            kind: NodeKind::Declaration,
            span: Span::new(0, 3),
        };
        assert_eq!(err.to_string(), "Unknown rule type: DECLARATION");
        assert_eq!(err.span(), Some(Span::new(0, 3)));
    }

    #[test]
    fn test_component_value_error_carries_both_kinds() {
        let err = BuildError::UnknownComponentValue {
            token_kind: "URL",
            node_kind: NodeKind::Token,
            snippet: "url(a.png)".to_string(),
            span: Span::new(7, 17),
        };
        assert_eq!(
            err.to_string(),
            "Unknown component value: <URL, TOKEN> in `url(a.png)`"
        );
    }

    #[cfg(feature = "pretty-errors")]
    #[test]
    fn test_format_error_mentions_message() {
        let source = "a { b: [c] }";
        let err = BuildError::UnknownComponentValue {
            token_kind: "none",
            node_kind: NodeKind::Block,
            snippet: "[c]".to_string(),
            span: Span::new(7, 10),
        };
        let rendered = format_error(source, "test.css", &err);
        assert!(rendered.contains("Unknown component value"));
    }
}
