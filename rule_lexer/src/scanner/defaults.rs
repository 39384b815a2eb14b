//! Built-in scanners for the rules language
//!
//! Order matters: the tokenizer takes the first scanner that accepts the
//! input, so `datetime` must precede `numeric`, `negate` must precede
//! `arithmetic_operator`, and `function` must precede `identifier`.

use super::definition::{Conversion, Scanner};
use crate::tokens::{symbols, Category, Symbol, Token, Value};
use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::str::FromStr;

/// Keys of the built-in scanners in canonical order
pub const DEFAULT_KEYS: [&str; 17] = [
    "null",
    "whitespace",
    "datetime",
    "numeric",
    "hexadecimal",
    "double_quoted_string",
    "single_quoted_string",
    "negate",
    "boolean_operator",
    "arithmetic_operator",
    "grouping",
    "access",
    "case_statement",
    "comparison_operator",
    "boolean",
    "function",
    "identifier",
];

/// Built-in scanner for `key`; identifier case handling follows `case_sensitive`
pub fn builtin(key: &str, case_sensitive: bool) -> Option<Scanner> {
    let scanner = match key {
        "null" => null(),
        "whitespace" => whitespace(),
        "datetime" => datetime(),
        "numeric" => numeric(),
        "hexadecimal" => hexadecimal(),
        "double_quoted_string" => double_quoted_string(),
        "single_quoted_string" => single_quoted_string(),
        "negate" => negate(),
        "boolean_operator" => boolean_operator(),
        "arithmetic_operator" => arithmetic_operator(),
        "grouping" => grouping(),
        "access" => access(),
        "case_statement" => case_statement(),
        "comparison_operator" => comparison_operator(),
        "boolean" => boolean(),
        "function" => function(),
        "identifier" => identifier(case_sensitive),
        _ => return None,
    };
    Some(scanner)
}

// Built-in patterns are literals; a compile failure is a programming error
fn compiled(category: Category, pattern: &str) -> Scanner {
    Scanner::new(category, pattern).expect("built-in scanner pattern must compile")
}

fn symbol(symbol: Symbol) -> Result<Conversion, String> {
    Ok(Conversion::Value(Value::Symbol(symbol)))
}

fn unknown(kind: &str, raw: &str) -> Result<Conversion, String> {
    Err(format!("unknown {} '{}'", kind, raw))
}

pub fn null() -> Scanner {
    compiled(Category::Null, r"null\b").with_converter(|_| Ok(Value::Null.into()))
}

pub fn whitespace() -> Scanner {
    compiled(Category::Whitespace, r"\s+").with_converter(|_| Ok(Value::from(" ").into()))
}

pub fn datetime() -> Scanner {
    compiled(
        Category::DateTime,
        r"\d{2}(?:\d{2})?-\d{1,2}-\d{1,2}( \d{1,2}:\d{1,2}:\d{1,2})? ?(Z|([+-]\d{2}:?\d{2}))?",
    )
    .with_converter(convert_datetime)
}

pub fn numeric() -> Scanner {
    compiled(
        Category::Numeric,
        r"((?:\d+(\.\d+)?|\.\d+)(?:[eE][+-]?\d+)?)\b",
    )
    .with_converter(convert_numeric)
}

pub fn hexadecimal() -> Scanner {
    compiled(Category::Numeric, r"(0x[0-9a-f]+)\b").with_converter(convert_hexadecimal)
}

/// Hex digits after `0x`; values beyond `i64` become exact decimals
fn convert_hexadecimal(raw: &str) -> Result<Conversion, String> {
    let digits = &raw[2..];
    if let Ok(n) = i64::from_str_radix(digits, 16) {
        return Ok(Value::Integer(n).into());
    }

    BigInt::parse_bytes(digits.as_bytes(), 16)
        .map(|n| Value::Decimal(BigDecimal::from(n)).into())
        .ok_or_else(|| format!("invalid hexadecimal literal '{}'", raw))
}

pub fn double_quoted_string() -> Scanner {
    compiled(Category::String, r#""[^"]*""#).with_converter(|raw| Ok(Value::from(unquote(raw)).into()))
}

pub fn single_quoted_string() -> Scanner {
    compiled(Category::String, r"'[^']*'").with_converter(|raw| Ok(Value::from(unquote(raw)).into()))
}

fn unquote(raw: &str) -> &str {
    raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default()
}

/// Unary minus, only where a binary minus cannot appear
pub fn negate() -> Scanner {
    compiled(Category::ArithmeticOperator, "-")
        .with_converter(|_| symbol(symbols::NEGATE))
        .with_condition(|previous| match previous {
            None => true,
            Some(token) => {
                token.category().is_operator()
                    || token.value().is_symbol(&symbols::OPEN)
                    || token.value().is_symbol(&symbols::COMMA)
            }
        })
}

pub fn boolean_operator() -> Scanner {
    compiled(Category::BooleanOperator, r"(and|or|&&|\|\|)\s+").with_converter(|raw| {
        match raw.trim().to_lowercase().as_str() {
            "and" | "&&" => symbol(symbols::AND),
            "or" | "||" => symbol(symbols::OR),
            other => unknown("boolean operator", other),
        }
    })
}

pub fn arithmetic_operator() -> Scanner {
    compiled(Category::ArithmeticOperator, r"\^|\+|-|\*|/|%|\||&").with_converter(|raw| match raw {
        "^" => symbol(symbols::POW),
        "+" => symbol(symbols::ADD),
        "-" => symbol(symbols::SUBTRACT),
        "*" => symbol(symbols::MULTIPLY),
        "/" => symbol(symbols::DIVIDE),
        "%" => symbol(symbols::MOD),
        "|" => symbol(symbols::BITOR),
        "&" => symbol(symbols::BITAND),
        other => unknown("arithmetic operator", other),
    })
}

pub fn grouping() -> Scanner {
    compiled(Category::Grouping, r"\(|\)|,").with_converter(|raw| match raw {
        "(" => symbol(symbols::OPEN),
        ")" => symbol(symbols::CLOSE),
        "," => symbol(symbols::COMMA),
        other => unknown("grouping", other),
    })
}

pub fn access() -> Scanner {
    compiled(Category::Access, r"\[|\]").with_converter(|raw| match raw {
        "[" => symbol(symbols::LBRACKET),
        "]" => symbol(symbols::RBRACKET),
        other => unknown("access", other),
    })
}

pub fn case_statement() -> Scanner {
    compiled(Category::Case, r"(case|end|then|when|else)\b").with_converter(|raw| {
        match raw.to_lowercase().as_str() {
            "case" => symbol(symbols::OPEN),
            "end" => symbol(symbols::CLOSE),
            "then" => symbol(symbols::THEN),
            "when" => symbol(symbols::WHEN),
            "else" => symbol(symbols::ELSE),
            other => unknown("case keyword", other),
        }
    })
}

pub fn comparison_operator() -> Scanner {
    compiled(Category::ComparisonOperator, r"<=|>=|!=|<>|<|>|==|=").with_converter(|raw| {
        match raw {
            "<=" => symbol(symbols::LE),
            ">=" => symbol(symbols::GE),
            "!=" | "<>" => symbol(symbols::NE),
            "<" => symbol(symbols::LT),
            ">" => symbol(symbols::GT),
            "=" | "==" => symbol(symbols::EQ),
            other => unknown("comparison operator", other),
        }
    })
}

pub fn boolean() -> Scanner {
    compiled(Category::Boolean, r"(true|false)\b")
        .with_converter(|raw| Ok(Value::Boolean(raw.trim().eq_ignore_ascii_case("true")).into()))
}

/// Function call head: emits the function name and a synthetic `open`
pub fn function() -> Scanner {
    compiled(Category::Function, r"\w+!?\s*\(").with_converter(|raw| {
        let name = raw.strip_suffix('(').unwrap_or(raw);
        Ok(Conversion::Tokens(vec![
            Token::with_raw(
                Category::Function,
                Symbol::from_string(name.trim().to_lowercase()),
                name,
            ),
            Token::with_raw(Category::Grouping, symbols::OPEN, "("),
        ]))
    })
}

pub fn identifier(case_sensitive: bool) -> Scanner {
    compiled(Category::Identifier, r"[\w.]+\b").with_converter(move |raw| {
        let name = raw.trim();
        let name = if case_sensitive {
            name.to_string()
        } else {
            name.to_lowercase()
        };
        Ok(Value::String(name).into())
    })
}

/// Integers unless the text has a decimal point.
///
/// Exponent-only literals such as `1e5` keep their leading digits only.
fn convert_numeric(raw: &str) -> Result<Conversion, String> {
    if raw.contains('.') {
        let text = if raw.starts_with('.') {
            format!("0{}", raw)
        } else {
            raw.to_string()
        };
        return BigDecimal::from_str(&text)
            .map(|d| Value::Decimal(d).into())
            .map_err(|e| format!("invalid decimal literal: {}", e));
    }

    let end = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let digits = &raw[..end];

    match digits.parse::<i64>() {
        Ok(n) => Ok(Value::Integer(n).into()),
        Err(_) => BigDecimal::from_str(digits)
            .map(|d| Value::Decimal(d).into())
            .map_err(|e| format!("invalid numeric literal: {}", e)),
    }
}

static DATETIME_PARTS: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(
        r"^(\d{2}(?:\d{2})?)-(\d{1,2})-(\d{1,2})(?: (\d{1,2}):(\d{1,2}):(\d{1,2}))? ?(z|[+-]\d{2}:?\d{2})?$",
    )
    .case_insensitive(true)
    .build()
    .expect("date-time pattern must compile")
});

fn convert_datetime(raw: &str) -> Result<Conversion, String> {
    parse_datetime(raw).map(|dt| Value::DateTime(dt).into())
}

/// Parse a date-time literal.
///
/// Two-digit years below 69 are in the 2000s, the rest in the 1900s. A
/// literal without a zone is read in the local time zone.
pub fn parse_datetime(raw: &str) -> Result<DateTime<FixedOffset>, String> {
    let text = raw.trim();
    let caps = DATETIME_PARTS
        .captures(text)
        .ok_or_else(|| format!("unrecognized date-time '{}'", text))?;

    let number = |index: usize| -> Result<u32, String> {
        caps.get(index).map_or(Ok(0), |m| {
            m.as_str()
                .parse::<u32>()
                .map_err(|e| format!("invalid date-time field '{}': {}", m.as_str(), e))
        })
    };

    let year_text = caps.get(1).map_or("", |m| m.as_str());
    let mut year: i32 = year_text
        .parse()
        .map_err(|e| format!("invalid year '{}': {}", year_text, e))?;
    if year_text.len() == 2 {
        year += if year < 69 { 2000 } else { 1900 };
    }

    let date = NaiveDate::from_ymd_opt(year, number(2)?, number(3)?)
        .ok_or_else(|| format!("invalid date '{}'", text))?;
    let time = NaiveTime::from_hms_opt(number(4)?, number(5)?, number(6)?)
        .ok_or_else(|| format!("invalid time '{}'", text))?;
    let naive = date.and_time(time);

    match caps.get(7).map(|m| m.as_str()) {
        None => Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.fixed_offset())
            .ok_or_else(|| format!("'{}' does not exist in the local time zone", text)),
        Some(zone) if zone.eq_ignore_ascii_case("z") => Ok(Utc.from_utc_datetime(&naive).fixed_offset()),
        Some(zone) => parse_offset(zone)?
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| format!("invalid date-time '{}'", text)),
    }
}

/// `+hhmm` or `+hh:mm`
fn parse_offset(zone: &str) -> Result<FixedOffset, String> {
    let sign = if zone.starts_with('-') { -1 } else { 1 };
    let digits: Vec<char> = zone.chars().skip(1).filter(|c| *c != ':').collect();
    let field = |chars: &[char]| -> Result<i32, String> {
        chars
            .iter()
            .collect::<String>()
            .parse()
            .map_err(|e| format!("invalid zone '{}': {}", zone, e))
    };
    let (hours, minutes) = digits.split_at(digits.len().min(2));
    let hours = field(hours)?;
    let minutes = field(minutes)?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| format!("zone offset out of range '{}'", zone))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn scan_one(scanner: &Scanner, input: &str) -> Token {
        scanner
            .scan(input, None)
            .unwrap()
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> Value {
        Value::DateTime(
            Local
                .with_ymd_and_hms(y, m, d, h, min, s)
                .earliest()
                .unwrap()
                .fixed_offset(),
        )
    }

    #[test]
    fn test_every_default_key_has_a_scanner() {
        for key in DEFAULT_KEYS {
            assert!(builtin(key, false).is_some(), "missing {}", key);
        }
        assert!(builtin("fake", false).is_none());
    }

    #[test]
    fn test_null_literal() {
        let token = scan_one(&null(), "null");
        assert_eq!(token.category(), Category::Null);
        assert_eq!(token.value(), &Value::Null);
        assert_eq!(token.raw(), Some("null"));
    }

    #[test]
    fn test_whitespace() {
        let token = scan_one(&whitespace(), "    ");
        assert_eq!(token.value(), &Value::from(" "));
        assert_eq!(token.raw(), Some("    "));
    }

    #[test]
    fn test_datetime_local() {
        let token = scan_one(&datetime(), "2017-12-24 23:59:59");
        assert_eq!(token.category(), Category::DateTime);
        assert_eq!(token.value(), &local(2017, 12, 24, 23, 59, 59));
        assert_eq!(token.raw(), Some("2017-12-24 23:59:59"));
    }

    #[test]
    fn test_datetime_zones() {
        let utc = parse_datetime("2017-01-07 12:34:56 Z").unwrap();
        assert_eq!(utc.offset().local_minus_utc(), 0);
        assert_eq!(utc.hour(), 12);

        let east = parse_datetime("2017-01-08 1:2:3 +0800").unwrap();
        assert_eq!(east.offset().local_minus_utc(), 8 * 3600);
        assert_eq!((east.hour(), east.minute(), east.second()), (1, 2, 3));

        let west = parse_datetime("2017-01-08 1:2:3 -05:30").unwrap();
        assert_eq!(west.offset().local_minus_utc(), -(5 * 3600 + 30 * 60));
    }

    #[test]
    fn test_datetime_two_digit_years() {
        assert_eq!(parse_datetime("17-1-5").unwrap().year(), 2017);
        assert_eq!(parse_datetime("68-1-5").unwrap().year(), 2068);
        assert_eq!(parse_datetime("69-1-5").unwrap().year(), 1969);
        assert_eq!(parse_datetime("99-12-31").unwrap().year(), 1999);
    }

    #[test]
    fn test_invalid_calendar_date_is_rejected() {
        assert!(datetime().scan("2017-13-45", None).is_err());
    }

    #[test]
    fn test_numeric() {
        let token = scan_one(&numeric(), "2017");
        assert_eq!(token.value(), &Value::Integer(2017));
        assert_eq!(token.raw(), Some("2017"));

        let token = scan_one(&numeric(), ".5");
        assert_eq!(token.value(), &Value::Decimal(BigDecimal::from_str("0.5").unwrap()));
    }

    #[test]
    fn test_numeric_scientific_notation() {
        let expected = Value::Decimal(BigDecimal::from_str("6.02e23").unwrap());
        assert_eq!(scan_one(&numeric(), "6.02e23").value(), &expected);
        assert_eq!(scan_one(&numeric(), ".602E+24").value(), &expected);
    }

    #[test]
    fn test_exponent_without_decimal_point_keeps_leading_digits() {
        let token = scan_one(&numeric(), "1e5");
        assert_eq!(token.value(), &Value::Integer(1));
        assert_eq!(token.raw(), Some("1e5"));
    }

    #[test]
    fn test_integer_overflow_becomes_decimal() {
        let token = scan_one(&numeric(), "99999999999999999999");
        assert_eq!(
            token.value(),
            &Value::Decimal(BigDecimal::from_str("99999999999999999999").unwrap())
        );
    }

    #[test]
    fn test_hexadecimal_overflow_becomes_decimal() {
        let token = scan_one(&hexadecimal(), "0xFFFFFFFFFFFFFFFFFF");
        assert_eq!(
            token.value(),
            &Value::Decimal(BigDecimal::from_str("4722366482869645213695").unwrap())
        );

        let token = scan_one(&hexadecimal(), "0x7fffffffffffffff");
        assert_eq!(token.value(), &Value::Integer(i64::MAX));
    }

    #[test]
    fn test_numeric_rejects_hex_prefix() {
        assert_eq!(numeric().scan("0x80", None), Ok(None));
    }

    #[test]
    fn test_hexadecimal() {
        let token = scan_one(&hexadecimal(), "0xCaFe");
        assert_eq!(token.category(), Category::Numeric);
        assert_eq!(token.value(), &Value::Integer(51966));
        assert_eq!(token.raw(), Some("0xCaFe"));
    }

    #[test]
    fn test_quoted_strings() {
        let token = scan_one(&double_quoted_string(), "\"hello\"");
        assert_eq!(token.value(), &Value::from("hello"));
        assert_eq!(token.raw(), Some("\"hello\""));

        let token = scan_one(&single_quoted_string(), "'hello' world");
        assert_eq!(token.value(), &Value::from("hello"));

        assert_eq!(scan_one(&double_quoted_string(), "\"\"").value(), &Value::from(""));
    }

    #[test]
    fn test_negate_condition() {
        let scanner = negate();
        assert_eq!(scan_one(&scanner, "-1").value(), &Value::Symbol(symbols::NEGATE));

        let numeric = Token::with_raw(Category::Numeric, 2, "2");
        assert_eq!(scanner.scan("-1", Some(&numeric)), Ok(None));

        for previous in [
            Token::new(Category::ArithmeticOperator, symbols::ADD),
            Token::new(Category::ComparisonOperator, symbols::GT),
            Token::new(Category::BooleanOperator, symbols::AND),
            Token::new(Category::Grouping, symbols::OPEN),
            Token::new(Category::Grouping, symbols::COMMA),
            Token::new(Category::Case, symbols::OPEN),
        ] {
            assert!(scanner.scan("-1", Some(&previous)).unwrap().is_some());
        }

        let close = Token::new(Category::Grouping, symbols::CLOSE);
        assert_eq!(scanner.scan("-1", Some(&close)), Ok(None));
    }

    #[test]
    fn test_boolean_operator_requires_trailing_whitespace() {
        let token = scan_one(&boolean_operator(), "AND x");
        assert_eq!(token.value(), &Value::Symbol(symbols::AND));
        assert_eq!(token.raw(), Some("AND "));

        assert_eq!(scan_one(&boolean_operator(), "|| y").value(), &Value::Symbol(symbols::OR));
        assert_eq!(boolean_operator().scan("andover", None), Ok(None));
    }

    #[test]
    fn test_operator_tables() {
        assert_eq!(scan_one(&arithmetic_operator(), "^").value(), &Value::Symbol(symbols::POW));
        assert_eq!(scan_one(&arithmetic_operator(), "%").value(), &Value::Symbol(symbols::MOD));
        assert_eq!(scan_one(&comparison_operator(), "<>").value(), &Value::Symbol(symbols::NE));
        assert_eq!(scan_one(&comparison_operator(), "==").value(), &Value::Symbol(symbols::EQ));
        assert_eq!(scan_one(&comparison_operator(), "<=").value(), &Value::Symbol(symbols::LE));
        assert_eq!(scan_one(&grouping(), ",").value(), &Value::Symbol(symbols::COMMA));
        assert_eq!(scan_one(&access(), "]").value(), &Value::Symbol(symbols::RBRACKET));
    }

    #[test]
    fn test_case_keywords() {
        let token = scan_one(&case_statement(), "CASE x");
        assert_eq!(token.category(), Category::Case);
        assert_eq!(token.value(), &Value::Symbol(symbols::OPEN));
        assert_eq!(scan_one(&case_statement(), "end").value(), &Value::Symbol(symbols::CLOSE));
        assert_eq!(case_statement().scan("ending", None), Ok(None));
    }

    #[test]
    fn test_boolean_literals() {
        assert_eq!(scan_one(&boolean(), "TRUE").value(), &Value::Boolean(true));
        assert_eq!(scan_one(&boolean(), "false").value(), &Value::Boolean(false));
        assert_eq!(boolean().scan("true_lies", None), Ok(None));
    }

    #[test]
    fn test_function_emits_name_and_open() {
        let tokens = function().scan("Round (8.2)", None).unwrap().unwrap();
        assert_eq!(tokens.len(), 2);

        assert_eq!(tokens[0].category(), Category::Function);
        assert_eq!(tokens[0].value(), &Value::Symbol(Symbol::new("round")));
        assert_eq!(tokens[0].raw(), Some("Round "));
        assert_eq!(tokens[1], Token::new(Category::Grouping, symbols::OPEN));
        assert_eq!(tokens[1].raw(), Some("("));

        let tokens = function().scan("exp!(5)", None).unwrap().unwrap();
        assert_eq!(tokens[0].value(), &Value::Symbol(Symbol::new("exp!")));
    }

    #[test]
    fn test_identifier_case() {
        assert_eq!(scan_one(&identifier(false), "Sea_Monkeys").value(), &Value::from("sea_monkeys"));
        assert_eq!(scan_one(&identifier(true), "Sea_Monkeys").value(), &Value::from("Sea_Monkeys"));
        assert_eq!(scan_one(&identifier(false), "a.b.c + 1").value(), &Value::from("a.b.c"));
    }
}
