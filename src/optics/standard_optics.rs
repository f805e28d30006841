//! Standard optics that are commonly used.
//!
//! - [`identity`]: the neutral element of composition
//! - [`tuple_first`] / [`tuple_second`]: lenses into pairs
//! - [`add`]: a pure numeric iso
//! - [`parse_int`]: a fallible iso between text and integers
//! - [`iterating`]: an infinite fold over repeated applications of a step

use std::fmt;
use std::ops::{Add, ControlFlow, Sub};
use std::sync::Arc;

use super::capability::Capabilities;
use super::expression::Expression;
use super::fold::fold;
use super::iso::{fallible_iso, iso};
use super::optic::{IterateFn, Optic};
use super::sequence::Indexed;

// =============================================================================
// Identity and tuples
// =============================================================================

/// The identity optic: focuses on the whole source.
///
/// Composing with `identity` on either side never builds a composition node.
///
/// # Example
///
/// ```
/// use opticore::optics::{Context, compose, identity, tuple_first};
///
/// let first = compose(identity::<(i32, char)>(), tuple_first::<i32, i32, char>());
/// assert_eq!(first.to_string(), "TupleElement(0)");
/// assert_eq!(first.get(&Context::background(), &(3, 'x')).unwrap(), 3);
/// ```
pub fn identity<S>() -> Optic<(), S, S, S, S>
where
    S: Clone + 'static,
{
    iso("Identity", S::clone, |source: S| source)
        .with_index_lookup(|source, ()| Some(source.clone()))
        .into_identity()
}

fn tuple_element(position: usize) -> Expression {
    Expression::new("TupleElement").param(position)
}

/// A lens on the first element of a pair, indexed by position `0`.
pub fn tuple_first<A, B, C>() -> Optic<usize, (A, C), (B, C), A, B>
where
    A: Clone + 'static,
    B: 'static,
    C: 'static,
{
    let iterate: IterateFn<usize, (A, C), A> =
        Arc::new(|_, source, sink| sink(Ok(Indexed::new(0, source.0.clone()))));

    Optic::from_iterate(tuple_element(0), Capabilities::LENS, iterate)
        .with_modify_fn(Arc::new(|_, (first, rest), function| Ok((function(&0, first)?, rest))))
        .with_length(|_| 1)
        .with_index_lookup(|source, position| (*position == 0).then(|| source.0.clone()))
}

/// A lens on the second element of a pair, indexed by position `1`.
pub fn tuple_second<A, B, C>() -> Optic<usize, (C, A), (C, B), A, B>
where
    A: Clone + 'static,
    B: 'static,
    C: 'static,
{
    let iterate: IterateFn<usize, (C, A), A> =
        Arc::new(|_, source, sink| sink(Ok(Indexed::new(1, source.1.clone()))));

    Optic::from_iterate(tuple_element(1), Capabilities::LENS, iterate)
        .with_modify_fn(Arc::new(|_, (rest, second), function| Ok((rest, function(&1, second)?))))
        .with_length(|_| 1)
        .with_index_lookup(|source, position| (*position == 1).then(|| source.1.clone()))
}

// =============================================================================
// Numbers
// =============================================================================

/// A pure iso that adds `amount` on read and subtracts it on reverse.
///
/// # Example
///
/// ```
/// use opticore::optics::{Context, add};
///
/// let context = Context::background();
/// let plus_three = add(3);
/// assert_eq!(plus_three.get(&context, &4).unwrap(), 7);
/// assert_eq!(plus_three.reverse_get(&context, 7).unwrap(), 4);
/// assert_eq!(plus_three.to_string(), "Add(3)");
/// ```
pub fn add<N>(amount: N) -> Optic<(), N, N, N, N>
where
    N: Copy + Add<Output = N> + Sub<Output = N> + fmt::Display + Send + Sync + 'static,
{
    iso(
        Expression::new("Add").param(amount),
        move |value: &N| *value + amount,
        move |value: N| value - amount,
    )
}

/// Why [`parse_int`] rejected its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseIntErrorKind {
    /// The text is not an integer in the requested base.
    #[error("invalid syntax")]
    InvalidSyntax,
    /// The integer does not fit in the requested bit size.
    #[error("value out of range")]
    OutOfRange,
    /// The base is neither `0` nor within `2..=36`.
    #[error("invalid base {0}")]
    InvalidBase(u32),
    /// The bit size is larger than 64.
    #[error("invalid bit size {0}")]
    InvalidBitSize(u32),
}

/// A [`parse_int`] failure, rendered as `parsing "<input>": <kind>`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parsing {input:?}: {kind}")]
pub struct ParseIntError {
    /// The rejected text.
    pub input: String,
    /// What was wrong with it.
    pub kind: ParseIntErrorKind,
}

impl ParseIntError {
    fn new(input: &str, kind: ParseIntErrorKind) -> Self {
        Self {
            input: input.to_string(),
            kind,
        }
    }

    /// `input` is not an integer.
    pub fn invalid_syntax(input: &str) -> Self {
        Self::new(input, ParseIntErrorKind::InvalidSyntax)
    }

    /// `input` does not fit in the requested bit size.
    pub fn out_of_range(input: &str) -> Self {
        Self::new(input, ParseIntErrorKind::OutOfRange)
    }
}

/// A fallible iso between decimal (or other base) text and `i64`.
///
/// `base` is `0` or within `2..=36`. Base `0` reads the base from the prefix
/// (`0x`, `0o`, `0b`, or a leading `0` for octal, otherwise decimal) and
/// allows `_` between digits. `bit_size` limits the accepted range to that
/// of a signed integer of that many bits; `0` means 64.
///
/// The reverse direction formats in `base` (decimal for base `0`).
///
/// # Example
///
/// ```
/// use opticore::optics::{Context, parse_int};
///
/// let context = Context::background();
/// let hex = parse_int(16, 8);
///
/// assert_eq!(hex.get(&context, &"-7f".to_string()).unwrap(), -127);
/// assert_eq!(hex.reverse_get(&context, 255).unwrap(), "ff");
///
/// let error = hex.get(&context, &"80".to_string()).unwrap_err();
/// assert!(error.to_string().starts_with("parsing \"80\": value out of range"));
/// ```
pub fn parse_int(base: u32, bit_size: u32) -> Optic<(), String, String, i64, i64> {
    fallible_iso(
        Expression::new("ParseInt").param(base).param(bit_size),
        move |text: &String| parse_signed(text, base, bit_size),
        move |value: i64| {
            format_signed(value, base).ok_or_else(|| {
                ParseIntError::new(&value.to_string(), ParseIntErrorKind::InvalidBase(base))
            })
        },
    )
}

fn valid_base(base: u32) -> bool {
    base == 0 || (2..=36).contains(&base)
}

fn parse_signed(input: &str, base: u32, bit_size: u32) -> Result<i64, ParseIntError> {
    if !valid_base(base) {
        return Err(ParseIntError::new(input, ParseIntErrorKind::InvalidBase(base)));
    }
    let bits = match bit_size {
        0 => 64,
        1..=64 => bit_size,
        _ => return Err(ParseIntError::new(input, ParseIntErrorKind::InvalidBitSize(bit_size))),
    };

    let (negative, unsigned) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };
    let (radix, digits) = split_base(unsigned, base).ok_or_else(|| ParseIntError::invalid_syntax(input))?;
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(ParseIntError::invalid_syntax(input));
    }

    let magnitude = u64::from_str_radix(&digits, radix).map_err(|error| match error.kind() {
        std::num::IntErrorKind::PosOverflow => ParseIntError::out_of_range(input),
        _ => ParseIntError::invalid_syntax(input),
    })?;

    let limit = 1_i128 << (bits - 1);
    let value = if negative {
        -i128::from(magnitude)
    } else {
        i128::from(magnitude)
    };
    if value < -limit || value >= limit {
        return Err(ParseIntError::out_of_range(input));
    }
    i64::try_from(value).map_err(|_| ParseIntError::out_of_range(input))
}

/// Resolves the effective radix and returns the digits with underscores
/// removed, or `None` when underscores are misplaced.
fn split_base(text: &str, base: u32) -> Option<(u32, String)> {
    if base != 0 {
        return Some((base, text.to_string()));
    }

    let lower = text.to_ascii_lowercase();
    let (radix, rest, prefixed) = if lower.starts_with("0x") {
        (16, &text[2..], true)
    } else if lower.starts_with("0o") {
        (8, &text[2..], true)
    } else if lower.starts_with("0b") {
        (2, &text[2..], true)
    } else if text.len() > 1 && text.starts_with('0') {
        (8, &text[1..], true)
    } else {
        (10, text, false)
    };

    let mut previous_underscore = !prefixed;
    for character in rest.chars() {
        let underscore = character == '_';
        if underscore && previous_underscore {
            return None;
        }
        previous_underscore = underscore;
    }
    if previous_underscore && !rest.is_empty() {
        return None;
    }
    Some((radix, rest.replace('_', "")))
}

fn format_signed(value: i64, base: u32) -> Option<String> {
    let radix = match base {
        0 => 10,
        2..=36 => base,
        _ => return None,
    };

    let mut digits = Vec::new();
    let mut magnitude = value.unsigned_abs();
    loop {
        let digit = u32::try_from(magnitude % u64::from(radix)).unwrap_or_default();
        digits.extend(char::from_digit(digit, radix));
        magnitude /= u64::from(radix);
        if magnitude == 0 {
            break;
        }
    }
    if value < 0 {
        digits.push('-');
    }
    Some(digits.into_iter().rev().collect())
}

// =============================================================================
// Generators
// =============================================================================

/// An infinite fold over `start`, `step(start)`, `step(step(start))`, ...
/// indexed by position.
///
/// The fold never ends by itself: consume it with an early-terminating
/// operation, [`taking`](super::taking), or a [`Context`](super::Context)
/// deadline.
///
/// # Example
///
/// ```
/// use opticore::optics::{Context, iterating, taking};
///
/// let powers = taking(iterating(|value: &u64| value * 2), 5);
/// assert_eq!(powers.collect(&Context::background(), &1).unwrap(), vec![1, 2, 4, 8, 16]);
/// ```
pub fn iterating<A, F>(step: F) -> Optic<usize, A, A, A, A>
where
    A: Clone + 'static,
    F: Fn(&A) -> A + Send + Sync + 'static,
{
    fold("Iterating", move |start: &A, sink| {
        let mut current = start.clone();
        for position in 0_usize.. {
            let next = step(&current);
            sink(Ok(Indexed::new(position, current)))?;
            current = next;
        }
        ControlFlow::Continue(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::{Context, compose};
    use rstest::rstest;

    fn parse(text: &str, base: u32, bit_size: u32) -> Result<i64, ParseIntError> {
        parse_signed(text, base, bit_size)
    }

    // =========================================================================
    // parse_int
    // =========================================================================

    #[rstest]
    #[case("42", 10, 0, 42)]
    #[case("-42", 10, 0, -42)]
    #[case("+7", 10, 0, 7)]
    #[case("0x1F", 0, 0, 31)]
    #[case("0o17", 0, 0, 15)]
    #[case("0b101", 0, 0, 5)]
    #[case("017", 0, 0, 15)]
    #[case("0", 0, 0, 0)]
    #[case("1_000", 0, 0, 1000)]
    #[case("0x_ff", 0, 0, 255)]
    #[case("zz", 36, 0, 1295)]
    #[case("127", 10, 8, 127)]
    #[case("-128", 10, 8, -128)]
    #[case("-9223372036854775808", 10, 64, i64::MIN)]
    fn test_parse_accepts(
        #[case] text: &str,
        #[case] base: u32,
        #[case] bit_size: u32,
        #[case] expected: i64,
    ) {
        assert_eq!(parse(text, base, bit_size), Ok(expected));
    }

    #[rstest]
    #[case("", 10, 0, ParseIntErrorKind::InvalidSyntax)]
    #[case("two", 10, 0, ParseIntErrorKind::InvalidSyntax)]
    #[case("--1", 10, 0, ParseIntErrorKind::InvalidSyntax)]
    #[case("1_000", 10, 0, ParseIntErrorKind::InvalidSyntax)]
    #[case("1__0", 0, 0, ParseIntErrorKind::InvalidSyntax)]
    #[case("_1", 0, 0, ParseIntErrorKind::InvalidSyntax)]
    #[case("1_", 0, 0, ParseIntErrorKind::InvalidSyntax)]
    #[case("0x", 0, 0, ParseIntErrorKind::InvalidSyntax)]
    #[case("128", 10, 8, ParseIntErrorKind::OutOfRange)]
    #[case("-129", 10, 8, ParseIntErrorKind::OutOfRange)]
    #[case("9223372036854775808", 10, 0, ParseIntErrorKind::OutOfRange)]
    #[case("99999999999999999999", 10, 0, ParseIntErrorKind::OutOfRange)]
    #[case("1", 1, 0, ParseIntErrorKind::InvalidBase(1))]
    #[case("1", 10, 65, ParseIntErrorKind::InvalidBitSize(65))]
    fn test_parse_rejects(
        #[case] text: &str,
        #[case] base: u32,
        #[case] bit_size: u32,
        #[case] kind: ParseIntErrorKind,
    ) {
        assert_eq!(parse(text, base, bit_size).unwrap_err().kind, kind);
    }

    #[rstest]
    fn test_parse_error_message() {
        assert_eq!(
            ParseIntError::invalid_syntax("two").to_string(),
            "parsing \"two\": invalid syntax"
        );
        assert_eq!(
            ParseIntError::out_of_range("300").to_string(),
            "parsing \"300\": value out of range"
        );
    }

    #[rstest]
    #[case(255, 16, "ff")]
    #[case(-5, 2, "-101")]
    #[case(0, 0, "0")]
    #[case(i64::MIN, 10, "-9223372036854775808")]
    fn test_format(#[case] value: i64, #[case] base: u32, #[case] expected: &str) {
        assert_eq!(format_signed(value, base).as_deref(), Some(expected));
    }

    #[rstest]
    fn test_parse_int_is_fallible_iso() {
        let optic = parse_int(10, 0);
        assert_eq!(optic.to_string(), "ParseInt(10,0)");
        assert!(optic.capabilities().is_reversible());
        assert!(!optic.capabilities().is_pure());
        let context = Context::background();
        let bumped = optic.modify(&context, "41".to_string(), |value| value + 1).unwrap();
        assert_eq!(bumped, "42");
    }

    // =========================================================================
    // Others
    // =========================================================================

    #[rstest]
    fn test_identity_role() {
        let id = identity::<String>();
        assert!(id.is_identity());
        assert_eq!(id.capabilities(), Capabilities::ISO);
        let context = Context::background();
        assert_eq!(id.set(&context, "a".to_string(), "b".to_string()).unwrap(), "b");
    }

    #[rstest]
    fn test_tuple_elements() {
        let context = Context::background();
        let second = tuple_second::<i32, String, char>();
        assert_eq!(second.to_string(), "TupleElement(1)");
        let rebuilt = second.modify(&context, ('k', 4), |value| value.to_string()).unwrap();
        assert_eq!(rebuilt, ('k', "4".to_string()));
        let positioned = tuple_second::<i32, i32, char>().index(1);
        assert_eq!(positioned.get(&context, &('k', 4)).unwrap(), 4);
    }

    #[rstest]
    fn test_add_composes_additively() {
        let context = Context::background();
        let both = compose(add(2), add(3));
        assert_eq!(both.get(&context, &10).unwrap(), 15);
        assert_eq!(both.reverse_get(&context, 15).unwrap(), 10);
    }

    #[rstest]
    fn test_iterating_first() {
        let context = Context::background();
        let halves = iterating(|value: &u32| value / 2);
        assert_eq!(halves.get_first(&context, &40).unwrap(), Some(40));
        assert_eq!(halves.to_string(), "Iterating");
    }
}
