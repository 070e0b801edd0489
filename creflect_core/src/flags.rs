//! Name transforms requested by an annotation's flag list.
//!
//! A flag list such as `remove_prefix(TOK_), lowercase` is parsed once per
//! annotation into a [`FlagChain`], which is then applied to every
//! enumerator name of that annotation.

use crate::error::{CreflectError, Result};
use convert_case::{Case, Casing};
use tracing::trace;

/// Identifier styles accepted by the `case(...)` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStyle {
    Snake,
    UpperSnake,
    Kebab,
    Camel,
    Pascal,
    Title,
    Lower,
    Upper,
}

impl CaseStyle {
    fn parse(style: &str) -> Option<Self> {
        let style = match style {
            "snake" => CaseStyle::Snake,
            "upper_snake" => CaseStyle::UpperSnake,
            "kebab" => CaseStyle::Kebab,
            "camel" => CaseStyle::Camel,
            "pascal" => CaseStyle::Pascal,
            "title" => CaseStyle::Title,
            "lower" => CaseStyle::Lower,
            "upper" => CaseStyle::Upper,
            _ => return None,
        };
        Some(style)
    }

    fn convert(self, name: &str) -> String {
        match self {
            CaseStyle::Snake => name.to_case(Case::Snake),
            CaseStyle::UpperSnake => name.to_case(Case::UpperSnake),
            CaseStyle::Kebab => name.to_case(Case::Kebab),
            CaseStyle::Camel => name.to_case(Case::Camel),
            CaseStyle::Pascal => name.to_case(Case::Pascal),
            CaseStyle::Title => name.to_case(Case::Title),
            CaseStyle::Lower => name.to_case(Case::Lower),
            CaseStyle::Upper => name.to_case(Case::Upper),
        }
    }
}

/// A single text transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Empty flag; leaves the name untouched.
    Identity,
    RemovePrefix(String),
    RemoveSuffix(String),
    Lowercase,
    Uppercase,
    Case(CaseStyle),
}

impl Transform {
    /// Builds a transform from a flag name and its arguments. `line` is only
    /// used for error reporting.
    pub fn from_flag(name: &str, args: Option<&[String]>, line: usize) -> Result<Self> {
        let first_arg = |flag: &str| -> Result<String> {
            args.and_then(|a| a.first())
                .cloned()
                .ok_or_else(|| CreflectError::missing_flag_argument(flag, line))
        };

        match name {
            "" => Ok(Transform::Identity),
            "remove_prefix" => Ok(Transform::RemovePrefix(first_arg(name)?)),
            "remove_suffix" => Ok(Transform::RemoveSuffix(first_arg(name)?)),
            "lowercase" => Ok(Transform::Lowercase),
            "uppercase" => Ok(Transform::Uppercase),
            "case" => {
                let style = first_arg(name)?;
                CaseStyle::parse(&style)
                    .map(Transform::Case)
                    .ok_or_else(|| CreflectError::unknown_case_style(style, line))
            }
            other => Err(CreflectError::unsupported_flag(other, line)),
        }
    }

    pub fn apply(&self, name: &str) -> String {
        match self {
            Transform::Identity => name.to_string(),
            Transform::RemovePrefix(prefix) => {
                name.strip_prefix(prefix.as_str()).unwrap_or(name).to_string()
            }
            Transform::RemoveSuffix(suffix) => {
                name.strip_suffix(suffix.as_str()).unwrap_or(name).to_string()
            }
            Transform::Lowercase => name.to_lowercase(),
            Transform::Uppercase => name.to_uppercase(),
            Transform::Case(style) => style.convert(name),
        }
    }
}

/// Ordered transforms of one annotation; each output feeds the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagChain {
    transforms: Vec<Transform>,
}

impl FlagChain {
    /// Parses a flag list like `remove_prefix(TOK_), lowercase`.
    ///
    /// The list is split on every comma; parentheses do not group, so an
    /// argument list cannot hold a comma (`remove_prefix(A, B)` leaves the
    /// piece `B)`, an unsupported flag). Each piece is cut at its first `(`
    /// into a name and an argument; the argument loses one trailing `)`.
    /// Names and arguments are trimmed. An empty piece, including an entirely
    /// empty list, is the identity transform.
    pub fn parse(spec: &str, line: usize) -> Result<Self> {
        let mut transforms = Vec::new();

        for piece in spec.split(',') {
            let piece = piece.trim();
            let (name, args) = match piece.split_once('(') {
                Some((name, rest)) => {
                    let rest = rest.strip_suffix(')').unwrap_or(rest);
                    let args: Vec<String> =
                        rest.split(',').map(|arg| arg.trim().to_string()).collect();
                    (name.trim(), Some(args))
                }
                None => (piece, None),
            };

            trace!(flag = name, ?args, "parsed flag");
            transforms.push(Transform::from_flag(name, args.as_deref(), line)?);
        }

        Ok(Self { transforms })
    }

    pub fn apply(&self, name: &str) -> String {
        self.transforms
            .iter()
            .fold(name.to_string(), |acc, transform| transform.apply(&acc))
    }

    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    // ==================== Parsing Tests ====================

    #[test]
    fn test_empty_spec_is_single_identity() {
        let chain = FlagChain::parse("", 1).unwrap();
        assert_eq!(chain.transforms(), &[Transform::Identity]);
    }

    #[test]
    fn test_parse_remove_prefix() {
        let chain = FlagChain::parse("remove_prefix(FOO_)", 1).unwrap();
        assert_eq!(
            chain.transforms(),
            &[Transform::RemovePrefix("FOO_".to_string())]
        );
    }

    #[test]
    fn test_parse_trims_names_and_arguments() {
        let chain = FlagChain::parse(" remove_prefix( TOK_ ) ,  lowercase ", 1).unwrap();
        assert_eq!(
            chain.transforms(),
            &[
                Transform::RemovePrefix("TOK_".to_string()),
                Transform::Lowercase
            ]
        );
    }

    #[test]
    fn test_trailing_comma_adds_identity() {
        let chain = FlagChain::parse("lowercase,", 1).unwrap();
        assert_eq!(
            chain.transforms(),
            &[Transform::Lowercase, Transform::Identity]
        );
    }

    #[test]
    fn test_parse_case_style() {
        let chain = FlagChain::parse("case(pascal)", 1).unwrap();
        assert_eq!(chain.transforms(), &[Transform::Case(CaseStyle::Pascal)]);
    }

    #[test]
    fn test_unsupported_flag_is_error() {
        let err = FlagChain::parse("unsupported_flag", 7).unwrap_err();
        match err {
            CreflectError::UnsupportedFlag { flag, line } => {
                assert_eq!(flag, "unsupported_flag");
                assert_eq!(line, 7);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unsupported_flag_after_valid_one_is_error() {
        assert!(FlagChain::parse("lowercase, shout(x)", 1).is_err());
    }

    #[test]
    fn test_remove_prefix_without_arguments_is_error() {
        let err = FlagChain::parse("remove_prefix", 3).unwrap_err();
        assert!(matches!(err, CreflectError::MissingFlagArgument { .. }));
    }

    #[test]
    fn test_unknown_case_style_is_error() {
        let err = FlagChain::parse("case(sarcastic)", 3).unwrap_err();
        assert!(matches!(err, CreflectError::UnknownCaseStyle { .. }));
    }

    // ==================== Application Tests ====================

    #[test]
    fn test_remove_prefix_exact_match_only() {
        let t = Transform::RemovePrefix("FOO_".to_string());
        assert_eq!(t.apply("FOO_BAR"), "BAR");
        assert_eq!(t.apply("foo_BAR"), "foo_BAR");
        assert_eq!(t.apply("XFOO_BAR"), "XFOO_BAR");
    }

    #[test]
    fn test_empty_prefix_argument_is_noop() {
        let chain = FlagChain::parse("remove_prefix()", 1).unwrap();
        assert_eq!(chain.apply("NAME"), "NAME");
    }

    #[test]
    fn test_lowercase() {
        assert_eq!(Transform::Lowercase.apply("Baz"), "baz");
    }

    #[test]
    fn test_remove_suffix_and_uppercase() {
        let chain = FlagChain::parse("remove_suffix(_t), uppercase", 1).unwrap();
        assert_eq!(chain.apply("color_t"), "COLOR");
    }

    #[test]
    fn test_case_conversion() {
        let chain = FlagChain::parse("remove_prefix(TOKEN_), case(pascal)", 1).unwrap();
        assert_eq!(chain.apply("TOKEN_LEFT_PAREN"), "LeftParen");
        let chain = FlagChain::parse("case(kebab)", 1).unwrap();
        assert_eq!(chain.apply("LEFT_PAREN"), "left-paren");
    }

    #[test]
    fn test_chain_applies_left_to_right() {
        let strip_then_lower = FlagChain::parse("remove_prefix(FOO_), lowercase", 1).unwrap();
        assert_eq!(strip_then_lower.apply("FOO_BAR"), "bar");

        let lower_then_strip = FlagChain::parse("lowercase, remove_prefix(FOO_)", 1).unwrap();
        assert_eq!(lower_then_strip.apply("FOO_BAR"), "foo_bar");
    }

    #[test]
    fn test_comma_inside_arguments_splits_the_flag() {
        let err = FlagChain::parse("remove_prefix(A, B)", 4).unwrap_err();
        match err {
            CreflectError::UnsupportedFlag { flag, line } => {
                assert_eq!(flag, "B)");
                assert_eq!(line, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_identity_leaves_name_unchanged(name in "[A-Za-z_][A-Za-z0-9_]{0,24}") {
            prop_assert_eq!(Transform::Identity.apply(&name), name.clone());
            prop_assert_eq!(FlagChain::parse("", 1).unwrap().apply(&name), name);
        }

        #[test]
        fn prop_remove_prefix_idempotent(prefix in "[A-Z]{1,4}_", rest in "[a-z0-9][a-z0-9_]{0,20}") {
            let t = Transform::RemovePrefix(prefix.clone());
            let once = t.apply(&format!("{prefix}{rest}"));
            prop_assert_eq!(&once, &rest);
            prop_assert_eq!(t.apply(&once), once);
        }

        #[test]
        fn prop_lowercase_idempotent(name in "[A-Za-z0-9_ ]{0,32}") {
            let once = Transform::Lowercase.apply(&name);
            prop_assert_eq!(Transform::Lowercase.apply(&once), once.clone());
        }
    }
}
