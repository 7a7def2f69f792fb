/// parse document with structure like
/// ```text
/// title1
///   key1: value1, value2
///   key2: "value with spaces, and commas"
/// title2
///   key3: 3.5
/// ```
/// into `HashMap<String, HashMap<String, Option<Vec<Value>>>>`. Keys listed in a template but absent
/// from the document come out as `key: None`.
use crate::error::ConfigError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{alpha1, alphanumeric1, char, multispace0, space0},
    combinator::{map, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::Display;

pub type DocumentMap = HashMap<String, SectionMap>;
pub type SectionMap = HashMap<String, Option<Vec<Value>>>;

/// enum to represent different value types:
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    pub fn as_string(&self) -> Option<&String> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// integers are accepted where a float is expected: `x_range: -5, 5`
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

/// identifier: letters, digits and underscores, not starting with a digit
fn identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    map(parser, String::from).parse(input)
}

/// Parses a title and drops whatever whitespace follows it
fn parse_title(input: &str) -> IResult<&str, String> {
    let (input, result) = identifier(input)?;
    Ok((input.trim_start(), result))
}

fn parse_key(input: &str) -> IResult<&str, String> {
    identifier(input)
}

/// `"..."` keeps spaces and commas and is always a string
fn parse_quoted(input: &str) -> IResult<&str, Value> {
    let quoted = delimited(char('"'), take_while(|c: char| c != '"'), char('"'));
    map(quoted, |s: &str| Value::String(s.to_string())).parse(input)
}

fn parse_bare(input: &str) -> IResult<&str, Value> {
    // a bare value ends at a comma, whitespace, a semicolon or a quote
    let value_parser = take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\r' | '\n' | ';' | '"'));
    map(value_parser, |s: &str| {
        // Try parsing as different types in order
        if let Ok(val) = s.parse::<i64>() {
            Value::Integer(val)
        } else if let Ok(val) = s.parse::<f64>() {
            Value::Float(val)
        } else if let Ok(val) = s.parse::<bool>() {
            Value::Boolean(val)
        } else {
            Value::String(s.to_string())
        }
    })
    .parse(input)
}

fn parse_value(input: &str) -> IResult<&str, Value> {
    alt((parse_quoted, parse_bare)).parse(input)
}

fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let (input, _) = space0(input)?;
    let separator_coma = delimited(space0, tag(","), space0);
    separated_list0(separator_coma, parse_value).parse(input)
}

/// Parses a key-value pair where value is a list
fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    let mut parser = separated_pair(parse_key, colon_separator, parse_value_list);
    let (input, result) = parser.parse(input)?;
    Ok((input.trim_start(), result))
}

/// Parses a section with a title and one or more key-value pairs
fn parse_section(input: &str) -> IResult<&str, (String, HashMap<String, Vec<Value>>)> {
    let (input, _) = space0(input)?;
    let (input, title) = parse_title(input)?;
    let (input, _) = multispace0(input)?;
    let (input, pairs) = many1(terminated(parse_key_value_pair, space0)).parse(input)?;
    Ok((input, (title, pairs.into_iter().collect())))
}

/// Drops empty lines and comment lines (starting with //, #, %, or ;)
fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.starts_with(';')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the sections of a document that has already been stripped of comments
pub fn parse_document(input: &str) -> IResult<&str, DocumentMap> {
    let mut parser = many1(delimited(space0, parse_section, multispace0));
    let (input, sections) = parser.parse(input)?;

    let mut result = HashMap::new();
    for (title, section_map) in sections {
        let title_map: SectionMap = section_map
            .into_iter()
            .map(|(key, values)| (key, Some(values)))
            .collect();
        result.insert(title, title_map);
    }
    Ok((input, result))
}

/// Parses a whole task document. Comments are removed first; every title and key of
/// `template` is guaranteed to exist in the result (missing keys as `None`).
pub fn parse_document_as(
    input: &str,
    template: Option<&DocumentMap>,
) -> Result<DocumentMap, ConfigError> {
    let filtered = filter_comments(input);
    let (remaining, mut parsed) =
        parse_document(&filtered).map_err(|e| ConfigError::Syntax(format!("{:?}", e)))?;
    if !remaining.trim().is_empty() {
        return Err(ConfigError::Syntax(format!(
            "failed to parse entire document, remaining: '{}'",
            remaining
        )));
    }
    if let Some(template) = template {
        for (title, keys_map) in template {
            let section_map = parsed.entry(title.clone()).or_default();
            for key in keys_map.keys() {
                section_map.entry(key.clone()).or_insert(None);
            }
        }
    }
    Ok(parsed)
}

/// template of titles and keys with every value `None`
pub fn template_from(sections: &[(&str, &[&str])]) -> DocumentMap {
    sections
        .iter()
        .map(|(title, keys)| {
            let keys: SectionMap = keys.iter().map(|key| (key.to_string(), None)).collect();
            (title.to_string(), keys)
        })
        .collect()
}

/////////////////////////////TESTS////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_title() {
        let (remaining, title) = parse_title("function\n  expression: x").unwrap();
        assert_eq!(title, "function");
        assert_eq!(remaining, "expression: x");

        let (remaining, title) = parse_title("title_with_underscore key1: value1").unwrap();
        assert_eq!(title, "title_with_underscore");
        assert_eq!(remaining, "key1: value1");
    }

    #[test]
    fn test_parse_key() {
        let (remaining, key) = parse_key("x_range: -5, 5").unwrap();
        assert_eq!(key, "x_range");
        assert_eq!(remaining, ": -5, 5");
    }

    #[test]
    fn test_parse_value() {
        let (remaining, value) = parse_value("symbolic, next").unwrap();
        assert_eq!(value, Value::String("symbolic".to_string()));
        assert_eq!(remaining, ", next");

        let (_, value) = parse_value("-5, 5").unwrap();
        assert_eq!(value, Value::Integer(-5));

        let (_, value) = parse_value("1e-3").unwrap();
        assert_eq!(value, Value::Float(1e-3));

        let (_, value) = parse_value("false").unwrap();
        assert_eq!(value, Value::Boolean(false));

        let (remaining, value) = parse_value("\"2*x**2 + 4*x, 1\" tail").unwrap();
        assert_eq!(value, Value::String("2*x**2 + 4*x, 1".to_string()));
        assert_eq!(remaining, " tail");

        // a quoted number stays a string
        let (_, value) = parse_value("\"42\"").unwrap();
        assert_eq!(value, Value::String("42".to_string()));
    }

    #[test]
    fn test_parse_value_list() {
        let (remaining, values) = parse_value_list("function, 123, 45.67, true").unwrap();
        assert_eq!(
            values,
            vec![
                Value::String("function".to_string()),
                Value::Integer(123),
                Value::Float(45.67),
                Value::Boolean(true)
            ]
        );
        assert_eq!(remaining, "");

        let (_, values) = parse_value_list("").unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_parse_key_value_pair_stops_at_line_end() {
        let (remaining, (key, values)) =
            parse_key_value_pair("x_range: -5, 5\n  derivative_order: 2").unwrap();
        assert_eq!(key, "x_range");
        assert_eq!(values, vec![Value::Integer(-5), Value::Integer(5)]);
        assert_eq!(remaining, "derivative_order: 2");
    }

    #[test]
    fn test_parse_section() {
        let (remaining, (title, map)) =
            parse_section("plot\n  width: 800\n  height: 600\nlogging\n  loglevel: info").unwrap();
        assert_eq!(title, "plot");
        assert_eq!(map.get("width"), Some(&vec![Value::Integer(800)]));
        assert_eq!(map.get("height"), Some(&vec![Value::Integer(600)]));
        assert_eq!(remaining, "logging\n  loglevel: info");
    }

    #[test]
    fn test_parse_document_with_comments() {
        let doc = r#"
        // task for the visualizer
        function
          expression: "sin(x) * x"
          x_range: -3.5, 3.5
        # plot settings
        plot
          animate: true
        "#;
        let parsed = parse_document_as(doc, None).unwrap();
        assert_eq!(parsed.len(), 2);
        let function = &parsed["function"];
        assert_eq!(
            function["expression"],
            Some(vec![Value::String("sin(x) * x".to_string())])
        );
        assert_eq!(
            function["x_range"],
            Some(vec![Value::Float(-3.5), Value::Float(3.5)])
        );
        assert_eq!(parsed["plot"]["animate"], Some(vec![Value::Boolean(true)]));
    }

    #[test]
    fn test_parse_document_with_template() {
        let template = template_from(&[
            ("function", &["expression", "variable"][..]),
            ("logging", &["loglevel"][..]),
        ]);
        let parsed = parse_document_as("function\n expression: x", Some(&template)).unwrap();
        assert_eq!(parsed["function"]["variable"], None);
        assert_eq!(parsed["logging"]["loglevel"], None);
        assert_eq!(
            parsed["function"]["expression"],
            Some(vec![Value::String("x".to_string())])
        );
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(
            parse_document_as("", None),
            Err(ConfigError::Syntax(_))
        ));
        assert!(matches!(
            parse_document_as("function\n expression x", None),
            Err(ConfigError::Syntax(_))
        ));
        assert!(matches!(
            parse_document_as("function\n expression: \"unterminated", None),
            Err(ConfigError::Syntax(_))
        ));
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Integer(5).as_float(), Some(5.0));
        assert_eq!(Value::Float(0.5).as_integer(), None);
        assert_eq!(Value::Boolean(true).as_boolean(), Some(true));
        assert_eq!(Value::String("x".into()).as_string(), Some(&"x".to_string()));
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
    }
}
