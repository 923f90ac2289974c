use crate::error::{BuildError, BuildResult};
use cascada_syntax::Node;

/// Strip leading and trailing whitespace nodes
///
/// An empty or whitespace-only sequence has nothing to keep and is rejected.
pub fn trim_whitespace(values: &[Node]) -> BuildResult<&[Node]> {
    let start = values.iter().position(|node| !node.is_whitespace());
    let end = values.iter().rposition(|node| !node.is_whitespace());

    match (start, end) {
        (Some(start), Some(end)) => Ok(&values[start..=end]),
        _ => Err(BuildError::MalformedValueSequence {
            len: values.len(),
            span: values
                .first()
                .zip(values.last())
                .map(|(first, last)| first.span().to(last.span())),
        }),
    }
}

/// Drop every whitespace node, then every comma
pub fn strip_whitespace_and_commas(values: &[Node]) -> Vec<&Node> {
    values
        .iter()
        .filter(|node| !node.is_whitespace())
        .filter(|node| !node.is_comma())
        .collect()
}
