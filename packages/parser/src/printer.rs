//! Render values back to CSS text

use crate::ast::ComponentValue;
use crate::error::{BuildError, BuildResult};
use cascada_syntax::Node;

/// Render built component values as CSS text
///
/// Every value prints its retained source. A function prints its name as
/// written, then `(`, its arguments and `)`, so a function built with split
/// arguments prints without its commas.
pub fn print_value(values: &[ComponentValue]) -> String {
    let mut output = String::new();
    write_values(&mut output, values);
    output
}

fn write_values(output: &mut String, values: &[ComponentValue]) {
    for value in values {
        output.push_str(value.source());
        if let ComponentValue::Function { args, .. } = value {
            output.push('(');
            write_values(output, args);
            output.push(')');
        }
    }
}

/// Render generic tree nodes as CSS text
///
/// Only tokens and functions are printable. Blocks, rules and declarations
/// fail with [`BuildError::UnsupportedPrintPart`].
pub fn print_nodes(nodes: &[Node]) -> BuildResult<String> {
    let mut output = String::new();
    write_nodes(&mut output, nodes)?;
    Ok(output)
}

fn write_nodes(output: &mut String, nodes: &[Node]) -> BuildResult<()> {
    for node in nodes {
        match node {
            Node::Token(token) => output.push_str(&token.source),
            Node::Function(function) => {
                output.push_str(&function.raw_name);
                output.push('(');
                write_nodes(output, &function.value)?;
                output.push(')');
            }
            other => {
                return Err(BuildError::UnsupportedPrintPart {
                    kind: other.kind(),
                    snippet: other.to_source(),
                    span: other.span(),
                })
            }
        }
    }
    Ok(())
}
