//! Presentational node attributes
//!
//! Structural tree operations never look inside these; they are carried
//! through edits and serialization unchanged.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// A `#RRGGBB` color, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color(String);

fn hex_color_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("static color regex"))
}

impl Color {
    pub fn parse(s: &str) -> DomainResult<Self> {
        let s = s.trim();
        if hex_color_regex().is_match(s) {
            Ok(Self(s.to_ascii_lowercase()))
        } else {
            Err(DomainError::InvalidColor(s.to_string()))
        }
    }

    pub fn white() -> Self {
        Self("#ffffff".into())
    }

    pub fn black() -> Self {
        Self("#000000".into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Color {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which ends of the edge to a node carry an arrowhead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowType {
    #[default]
    None,
    /// Arrowhead at the child end
    To,
    /// Arrowhead at the parent end
    From,
    Both,
}

impl FromStr for ArrowType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "to" => Ok(Self::To),
            "from" => Ok(Self::From),
            "both" => Ok(Self::Both),
            _ => Err(DomainError::InvalidArrowType(s.to_string())),
        }
    }
}

impl fmt::Display for ArrowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::To => "to",
            Self::From => "from",
            Self::Both => "both",
        };
        f.write_str(s)
    }
}

/// Style of the edge connecting a node to its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineAttributes {
    pub line_color: Color,
    pub dashed_line: bool,
    pub arrow_type: ArrowType,
}

impl Default for LineAttributes {
    fn default() -> Self {
        Self {
            line_color: Color::black(),
            dashed_line: false,
            arrow_type: ArrowType::None,
        }
    }
}

impl LineAttributes {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Everything a renderer needs to draw a single node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeAttributes {
    pub value: String,
    pub background_color: Color,
    pub text_color: Color,
    pub node_width: u32,
    pub node_height: u32,
    pub line_attributes: LineAttributes,
}

impl Default for NodeAttributes {
    fn default() -> Self {
        Self {
            value: String::new(),
            background_color: Color::white(),
            text_color: Color::black(),
            node_width: 100,
            node_height: 50,
            line_attributes: LineAttributes::default(),
        }
    }
}

impl NodeAttributes {
    /// Default attributes labelled with `value`.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("#ffffff", "#ffffff")]
    #[case("#A1B2C3", "#a1b2c3")]
    #[case("  #000000 ", "#000000")]
    fn given_hex_color_when_parsing_then_normalizes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(Color::parse(input).unwrap().as_str(), expected);
    }

    #[rstest]
    #[case("red")]
    #[case("#fff")]
    #[case("#gggggg")]
    #[case("ffffff")]
    fn given_bad_color_when_parsing_then_rejects(#[case] input: &str) {
        assert!(matches!(
            Color::parse(input),
            Err(DomainError::InvalidColor(_))
        ));
    }

    #[test]
    fn given_attributes_when_serializing_then_uses_camel_case_keys() {
        let json = serde_json::to_value(NodeAttributes::with_value("x")).unwrap();
        assert_eq!(json["value"], "x");
        assert_eq!(json["backgroundColor"], "#ffffff");
        assert_eq!(json["nodeWidth"], 100);
        assert_eq!(json["lineAttributes"]["dashedLine"], false);
        assert_eq!(json["lineAttributes"]["arrowType"], "none");
    }

    #[test]
    fn given_arrow_names_when_parsing_then_round_trips_display() {
        for arrow in [ArrowType::None, ArrowType::To, ArrowType::From, ArrowType::Both] {
            assert_eq!(arrow.to_string().parse::<ArrowType>().unwrap(), arrow);
        }
        assert!("sideways".parse::<ArrowType>().is_err());
    }
}
