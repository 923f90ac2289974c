//! Stylesheet building end to end
//!
//! Covers:
//! - at-rules and style rules at the top level
//! - selector text
//! - declaration values and the important flag
//! - at-rules nested in rule bodies
//! - fatal errors for nodes that cannot appear where they are found

use cascada_parser::{
    parse, AtRule, BuildError, ComponentValue, CssGrammar, Declaration, DeclarationGrammar,
    Parser, ParserOptions, Rule, StylePropertyDeclaration, StyleRule,
};
use cascada_syntax::{
    parse_component_values, parse_list_of_declarations, parse_stylesheet, tokenize, BlockKind,
    Node, NodeKind, QualifiedRule, SimpleBlock, Span, Stylesheet,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

fn parse_default(source: &str) -> cascada_parser::StyleSheet {
    parse(source, ParserOptions::default()).unwrap()
}

fn only_style_rule(source: &str) -> StyleRule {
    let sheet = parse_default(source);
    assert_eq!(sheet.rules.len(), 1);

    match sheet.rules.into_iter().next() {
        Some(Rule::StyleRule(rule)) => rule,
        other => panic!("Expected StyleRule, got {:?}", other),
    }
}

#[test]
fn test_at_rule() {
    let sheet = parse_default("@media print {}");
    assert_eq!(sheet.rules.len(), 1);

    let Rule::AtRule(AtRule { name, value, .. }) = &sheet.rules[0] else {
        panic!("Expected AtRule");
    };
    assert_eq!(name, "media");
    assert!(value.is_some());
}

#[test]
fn test_at_rule_without_block() {
    let sheet = parse_default("@import 'a.css';");

    let Rule::AtRule(rule) = &sheet.rules[0] else {
        panic!("Expected AtRule");
    };
    assert_eq!(rule.name, "import");
    assert!(rule.value.is_none());
}

#[test]
fn test_style_rule_selector() {
    let rule = only_style_rule(".foo .bar {}");
    assert_eq!(rule.selectors, vec![".foo .bar".to_string()]);
    assert!(rule.body.is_empty());
}

#[test]
fn test_selector_list_stays_one_string() {
    let rule = only_style_rule("h1, h2 > a {}");
    assert_eq!(rule.selectors, vec!["h1, h2 > a".to_string()]);
}

#[test]
fn test_selector_keeps_leading_whitespace_only() {
    let prelude: Vec<Node> = tokenize("  a  ").into_iter().map(Node::Token).collect();
    let tree = Stylesheet {
        value: vec![Node::QualifiedRule(QualifiedRule {
            prelude,
            value: SimpleBlock {
                associated: BlockKind::Curly,
                value: Vec::new(),
                span: Span::new(5, 7),
            },
            span: Span::new(0, 7),
        })],
    };

    let sheet = Parser::default().build_stylesheet(&tree).unwrap();
    let Rule::StyleRule(rule) = &sheet.rules[0] else {
        panic!("Expected StyleRule");
    };
    assert_eq!(rule.selectors, vec!["  a".to_string()]);
}

#[test]
fn test_single_declaration() {
    let rule = only_style_rule("a { color: red; }");

    assert_eq!(rule.selectors, vec!["a".to_string()]);
    assert_eq!(
        rule.body,
        vec![Declaration::StylePropertyDeclaration(StylePropertyDeclaration {
            important: false,
            name: "color".to_string(),
            values: vec![ComponentValue::ident("red")],
        })]
    );
}

#[test]
fn test_multiple_component_values() {
    let rule = only_style_rule("a { color: red blue; }");

    assert_eq!(rule.selectors, vec!["a".to_string()]);
    assert_eq!(
        rule.body,
        vec![Declaration::StylePropertyDeclaration(StylePropertyDeclaration {
            important: false,
            name: "color".to_string(),
            values: vec![
                ComponentValue::ident("red"),
                ComponentValue::ws(),
                ComponentValue::ident("blue"),
            ],
        })]
    );
}

#[test]
fn test_value_trimmed_on_both_sides() {
    let rule = only_style_rule("a { margin:   0   auto   }");
    let property = rule.properties().next().unwrap();

    assert_eq!(
        property.values,
        vec![
            ComponentValue::number(0.0),
            ComponentValue::token("   "),
            ComponentValue::ident("auto"),
        ]
    );
}

#[test]
fn test_important_flag() {
    let rule = only_style_rule("a { color: red !important; width: 1px }");
    let properties: Vec<_> = rule.properties().collect();

    assert_eq!(properties.len(), 2);
    assert!(properties[0].important);
    assert_eq!(properties[0].values, vec![ComponentValue::ident("red")]);
    assert!(!properties[1].important);
    assert_eq!(properties[1].name, "width");
}

#[test]
fn test_nested_at_rule_in_body() {
    init_tracing();
    let rule = only_style_rule("a { color: red; @media print { color: blue } }");

    assert_eq!(rule.body.len(), 2);
    let Declaration::AtRule(nested) = &rule.body[1] else {
        panic!("Expected nested AtRule");
    };
    assert_eq!(nested.name, "media");
    assert_eq!(
        nested.value.as_ref().map(SimpleBlock::to_source),
        Some("{ color: blue }".to_string())
    );
}

#[test]
fn test_invalid_declarations_are_dropped() {
    let rule = only_style_rule("a { 12px; color: red; : nope }");
    let names: Vec<_> = rule.properties().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["color"]);
}

#[test]
fn test_rules_keep_source_order() {
    let sheet = parse_default("a {} @font-face {} b { x: y }");
    let kinds: Vec<_> = sheet
        .rules
        .iter()
        .map(|rule| match rule {
            Rule::StyleRule(_) => "style",
            Rule::AtRule(_) => "at",
        })
        .collect();

    assert_eq!(kinds, vec!["style", "at", "style"]);
    assert_eq!(sheet.style_rules().count(), 2);
}

#[test]
fn test_empty_source() {
    assert!(parse_default("").rules.is_empty());
    assert!(parse_default("  /* nothing */ ").rules.is_empty());
}

#[test]
fn test_unknown_rule_kind() {
    let tree = Stylesheet {
        value: parse_list_of_declarations("color: red"),
    };
    assert_eq!(tree.value[0].kind(), NodeKind::Declaration);

    let err = Parser::default().build_stylesheet(&tree).unwrap_err();
    assert!(matches!(
        err,
        BuildError::UnknownRuleKind {
            kind: NodeKind::Declaration,
            ..
        }
    ));
    assert_eq!(err.to_string(), "Unknown rule type: DECLARATION");
}

#[test]
fn test_unknown_rule_kind_after_valid_rule() {
    let mut tree = parse_stylesheet("a { b: c }");
    tree.value.extend(parse_component_values("x"));

    let result = Parser::default().build_stylesheet(&tree);
    assert!(matches!(
        result,
        Err(BuildError::UnknownRuleKind {
            kind: NodeKind::Token,
            ..
        })
    ));
}

/// Hands the block contents back unchanged so tokens reach the declaration builder
struct PassThroughGrammar;

impl DeclarationGrammar for PassThroughGrammar {
    fn consume_declarations(&self, values: &[Node]) -> Vec<Node> {
        values.to_vec()
    }
}

#[test]
fn test_unknown_declaration_kind() {
    let parser = Parser::with_grammar(ParserOptions::default(), PassThroughGrammar);
    let err = parser.parse("a { color }").unwrap_err();

    assert!(matches!(
        err,
        BuildError::UnknownDeclarationKind {
            kind: NodeKind::Token,
            ..
        }
    ));
    assert_eq!(err.to_string(), "Unknown style declaration type: TOKEN");
}

#[test]
fn test_css_grammar_is_the_default() {
    let values = parse_component_values(" a: b; c: d ");
    let nodes = CssGrammar.consume_declarations(&values);
    assert!(nodes.iter().all(|node| node.kind() == NodeKind::Declaration));
    assert_eq!(nodes.len(), 2);
}

#[test]
fn test_url_is_not_a_component_value() {
    let err = parse("a { background: url(a.png) }", ParserOptions::default()).unwrap_err();

    assert_eq!(
        err,
        BuildError::UnknownComponentValue {
            token_kind: "URL",
            node_kind: NodeKind::Token,
            snippet: "url(a.png)".to_string(),
            span: Span::new(16, 26),
        }
    );
}

#[test]
fn test_deeply_nested_value_fails_cleanly() {
    let depth = 20_000;
    let source = format!("a {{ b: {}1{} }}", "f(".repeat(depth), ")".repeat(depth));
    let err = parse(&source, ParserOptions::default()).unwrap_err();

    assert!(matches!(
        err,
        BuildError::NestingTooDeep {
            limit: cascada_syntax::MAX_NESTING_DEPTH,
            ..
        }
    ));
}

#[test]
fn test_empty_declaration_value_fails() {
    let err = parse("a { color: ; }", ParserOptions::default()).unwrap_err();
    assert!(matches!(err, BuildError::MalformedValueSequence { .. }));
}

#[test]
fn test_ast_serializes_with_type_tags() {
    let sheet = parse_default("a { color: red }");
    let json = serde_json::to_value(&sheet).unwrap();

    assert_eq!(json["type"], "StyleSheet");
    assert_eq!(json["rules"][0]["type"], "StyleRule");
    assert_eq!(json["rules"][0]["selectors"][0], "a");
    assert_eq!(
        json["rules"][0]["body"][0]["type"],
        "StylePropertyDeclaration"
    );
    assert_eq!(json["rules"][0]["body"][0]["values"][0]["name"], "red");
}

#[cfg(feature = "pretty-errors")]
#[test]
fn test_pretty_error_report() {
    let source = "a { background: url(a.png) }";
    let err = parse(source, ParserOptions::default()).unwrap_err();
    let report = cascada_parser::format_error(source, "style.css", &err);

    assert!(report.contains("Unknown component value"));
    assert!(report.contains("style.css"));
}
