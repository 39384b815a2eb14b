//! Named matchers for common grammar fragments
use super::combinator::Matcher;
use crate::tokens::{symbols, Category, Symbol, Value};

/// Names understood by [`Matcher::named`] besides arbitrary function names
pub const NAMED_MATCHERS: [&str; 27] = [
    "datetime",
    "numeric",
    "string",
    "boolean",
    "value",
    "addsub",
    "subtract",
    "anchored_minus",
    "muldiv",
    "pow",
    "mod",
    "boolean_operator",
    "comparison_operator",
    "comp_gt",
    "comp_lt",
    "open",
    "close",
    "comma",
    "non_group",
    "non_group_star",
    "non_close_plus",
    "arguments",
    "if",
    "round",
    "roundup",
    "rounddown",
    "not",
];

fn with_symbols(category: Category, names: &[Symbol]) -> Matcher {
    Matcher::new([category], names.iter().cloned().map(Value::Symbol))
}

impl Matcher {
    /// Matcher registered under `name`, or a function matcher for it
    pub fn named(name: &str) -> Matcher {
        match name {
            "datetime" => Matcher::datetime(),
            "numeric" => Matcher::numeric(),
            "string" => Matcher::string(),
            "boolean" => Matcher::boolean(),
            "value" => Matcher::value(),
            "addsub" => Matcher::addsub(),
            "subtract" => Matcher::subtract(),
            "anchored_minus" => Matcher::anchored_minus(),
            "muldiv" => Matcher::muldiv(),
            "pow" => Matcher::pow(),
            "mod" | "modulo" => Matcher::modulo(),
            "boolean_operator" => Matcher::boolean_operator(),
            "comparison_operator" => Matcher::comparison_operator(),
            "comp_gt" => Matcher::comp_gt(),
            "comp_lt" => Matcher::comp_lt(),
            "open" => Matcher::open(),
            "close" => Matcher::close(),
            "comma" => Matcher::comma(),
            "non_group" => Matcher::non_group(),
            "non_group_star" => Matcher::non_group_star(),
            "non_close_plus" => Matcher::non_close_plus(),
            "arguments" => Matcher::arguments(),
            other => Matcher::function(other),
        }
    }

    /// Function token with the given name, compared case-insensitively
    pub fn function(name: &str) -> Matcher {
        Matcher::new(
            [Category::Function],
            [Value::Symbol(Symbol::from_string(name.to_lowercase()))],
        )
    }

    pub fn datetime() -> Matcher {
        Matcher::category(Category::DateTime)
    }

    pub fn numeric() -> Matcher {
        Matcher::category(Category::Numeric)
    }

    pub fn string() -> Matcher {
        Matcher::category(Category::String)
    }

    pub fn boolean() -> Matcher {
        Matcher::category(Category::Boolean)
    }

    /// Any literal operand
    pub fn value() -> Matcher {
        Matcher::datetime() | Matcher::numeric() | Matcher::string() | Matcher::boolean()
    }

    pub fn addsub() -> Matcher {
        with_symbols(Category::ArithmeticOperator, &[symbols::ADD, symbols::SUBTRACT])
    }

    pub fn subtract() -> Matcher {
        with_symbols(Category::ArithmeticOperator, &[symbols::SUBTRACT])
    }

    pub fn anchored_minus() -> Matcher {
        Matcher::subtract().caret()
    }

    pub fn muldiv() -> Matcher {
        with_symbols(Category::ArithmeticOperator, &[symbols::MULTIPLY, symbols::DIVIDE])
    }

    pub fn pow() -> Matcher {
        with_symbols(Category::ArithmeticOperator, &[symbols::POW])
    }

    pub fn modulo() -> Matcher {
        with_symbols(Category::ArithmeticOperator, &[symbols::MOD])
    }

    pub fn boolean_operator() -> Matcher {
        Matcher::category(Category::BooleanOperator)
    }

    pub fn comparison_operator() -> Matcher {
        Matcher::category(Category::ComparisonOperator)
    }

    pub fn comp_gt() -> Matcher {
        with_symbols(Category::ComparisonOperator, &[symbols::GT, symbols::GE])
    }

    pub fn comp_lt() -> Matcher {
        with_symbols(Category::ComparisonOperator, &[symbols::LT, symbols::LE])
    }

    pub fn open() -> Matcher {
        with_symbols(Category::Grouping, &[symbols::OPEN])
    }

    pub fn close() -> Matcher {
        with_symbols(Category::Grouping, &[symbols::CLOSE])
    }

    pub fn comma() -> Matcher {
        with_symbols(Category::Grouping, &[symbols::COMMA])
    }

    pub fn non_group() -> Matcher {
        Matcher::category(Category::Grouping).invert()
    }

    pub fn non_group_star() -> Matcher {
        Matcher::non_group().star()
    }

    pub fn non_close_plus() -> Matcher {
        Matcher::close().invert().plus()
    }

    /// Comma-separated literal operands
    pub fn arguments() -> Matcher {
        (Matcher::value() | Matcher::comma()).plus()
    }

    pub fn r#if() -> Matcher {
        Matcher::function("if")
    }

    pub fn round() -> Matcher {
        Matcher::function("round")
    }

    pub fn roundup() -> Matcher {
        Matcher::function("roundup")
    }

    pub fn rounddown() -> Matcher {
        Matcher::function("rounddown")
    }

    pub fn not() -> Matcher {
        Matcher::function("not")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::Tokenizer;
    use crate::scanner::ScannerSet;
    use crate::tokens::Token;

    fn tokenize(input: &str) -> Vec<Token> {
        Tokenizer::with_scanners(ScannerSet::defaults())
            .tokenize(input)
            .unwrap()
    }

    #[test]
    fn test_value_matches_literals_only() {
        let value = Matcher::value();
        assert!(value.matches(Some(&Token::new(Category::Numeric, 8))));
        assert!(value.matches(Some(&Token::new(Category::String, "apricot"))));
        assert!(value.matches(Some(&Token::new(Category::Boolean, false))));
        assert!(!value.matches(Some(&Token::new(Category::Function, Symbol::new("round")))));
        assert!(!value.matches(Some(&Token::new(Category::Identifier, "hello"))));
    }

    #[test]
    fn test_arguments_match_comma_separated_values() {
        let stream = vec![
            Token::new(Category::Numeric, 1),
            Token::new(Category::Grouping, symbols::COMMA),
            Token::new(Category::Numeric, 2),
            Token::new(Category::Grouping, symbols::COMMA),
            Token::new(Category::Boolean, true),
            Token::new(Category::Grouping, symbols::COMMA),
            Token::new(Category::String, "olive"),
            Token::new(Category::Grouping, symbols::COMMA),
            Token::new(Category::Grouping, symbols::OPEN),
        ];

        let outcome = Matcher::arguments().match_tokens(&stream, 0);
        assert!(outcome.matched);
        assert_eq!(outcome.consumed(), 8);
        assert_eq!(outcome.tokens, &stream[..8]);
    }

    #[test]
    fn test_named_lookup() {
        assert_eq!(Matcher::named("addsub"), Matcher::addsub());
        assert_eq!(Matcher::named("mod"), Matcher::modulo());
        assert_eq!(Matcher::named("if"), Matcher::r#if());
        assert_eq!(Matcher::named("exp!"), Matcher::function("exp!"));
        assert_eq!(Matcher::named("ROUND"), Matcher::round());

        let shortcuts = ["if", "round", "roundup", "rounddown", "not"];
        for name in NAMED_MATCHERS {
            let matcher = Matcher::named(name);
            let is_function = matcher.is_leaf()
                && matcher.leaves()[0].categories() == [Category::Function];
            assert_eq!(is_function, shortcuts.contains(&name), "{}", name);
        }
    }

    #[test]
    fn test_anchored_minus_is_tagged() {
        assert!(Matcher::anchored_minus().is_caret());
        assert!(!Matcher::subtract().is_caret());
    }

    #[test]
    fn test_function_matchers_over_tokenized_input() {
        let tokens = tokenize("round(8.75, 1)");

        assert!(Matcher::round().match_tokens(&tokens, 0).matched);
        assert!(!Matcher::roundup().match_tokens(&tokens, 0).matched);
        assert!(Matcher::open().match_tokens(&tokens, 1).matched);

        let args = Matcher::arguments().match_tokens(&tokens, 2);
        assert!(args.matched);
        assert_eq!(args.consumed(), 3);
        assert!(Matcher::close().match_tokens(&tokens, 5).matched);

        let tokens = tokenize("NOT (x)");
        assert!(Matcher::not().match_tokens(&tokens, 0).matched);
    }

    #[test]
    fn test_grouping_matchers() {
        let tokens = tokenize("(1 + 2) * 3");

        let inner = Matcher::non_group_star().match_tokens(&tokens, 1);
        assert!(inner.matched);
        assert_eq!(inner.consumed(), 3);

        let until_close = Matcher::non_close_plus().match_tokens(&tokens, 0);
        assert_eq!(until_close.consumed(), 4);

        assert!(!Matcher::non_group().match_tokens(&tokens, 0).matched);
        assert!(Matcher::muldiv().match_tokens(&tokens, 5).matched);
    }

    #[test]
    fn test_comparison_groups() {
        let tokens = tokenize("a >= 1 and b < 2");
        assert!(Matcher::comp_gt().match_tokens(&tokens, 1).matched);
        assert!(Matcher::boolean_operator().match_tokens(&tokens, 3).matched);
        assert!(Matcher::comp_lt().match_tokens(&tokens, 5).matched);
        assert!(!Matcher::comp_gt().match_tokens(&tokens, 5).matched);
    }
}
