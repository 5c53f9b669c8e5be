//! # Latitude/Longitude Notation Parser
//!
//! This crate converts free-form textual coordinate pairs (for example
//! `45°12'30''N 73°5.4'W`, `-45.2083, -73.09` or `45 N 73 W`) into a
//! normalised internal representation, and re-renders that representation in
//! any of three canonical notations:
//!
//! 1. **Decimal degrees**: `45.208333°N`
//! 2. **Degrees and decimal minutes**: `45°12.500000'N`
//! 3. **Degrees, minutes and decimal seconds**: `45°12'30.0000''N`
//!
//! Conversion runs in five stages:
//!
//! 1. **Normalisation**: direction words (`north`, `West`, ...) collapse to
//!    single letters, prime-mark glyph variants collapse to the canonical `'`
//!    and `''` markers, and `degrees`/`deg`/`o` collapse to `°`. A string
//!    that mixes a bare `o` with an explicit `°` is rejected up front: `o`
//!    means East in some conventions and West in others, so the two marker
//!    styles cannot coexist.
//! 2. **Tokenisation**: the canonical string becomes a flat sequence of
//!    (integer, trailing marker) pairs.
//! 3. **Parsing**: a recursive-descent pass with explicit backtracking
//!    resolves each coordinate across three grammar levels
//!    (degrees → minutes → seconds).
//! 4. **Orientation**: embedded direction letters fix the lat/lon order and
//!    the per-axis sign; without letters, the caller's `lat_first` default
//!    decides the order.
//! 5. **Formatting**: the parsed pair re-renders in any of the notations
//!    above, with the hemisphere letter carrying the sign.
//!
//! ## Output
//! [`parse`] returns a `(latitude, longitude)` pair of strongly typed
//! [`Coordinate`] values. Errors are categorised in [`ErrorKind`] with
//! helpful context.
//!
//! ## Example
//! ```rust
//! use latlon_parser::parse;
//!
//! let (lat, lon) = parse("45°12'30''N 73°5'4''W", true).expect("valid coordinates");
//! assert!((lat.to_decimal() - 45.208333).abs() < 1e-6);
//! assert!((lon.to_decimal() + 73.084444).abs() < 1e-6);
//! ```

use core::fmt;
use once_cell::sync::Lazy;
use regex::Regex;

/// The canonical degree marker produced by normalisation.
const DEGREE_MARKER: char = '°';
/// The canonical minutes marker produced by normalisation.
const MINUTES_MARKER: char = '\'';
/// The canonical seconds marker produced by normalisation (two characters).
const SECONDS_MARKER: &str = "''";
/// Characters accepted as a decimal separator between two number runs.
const DECIMAL_SEPARATORS: [char; 2] = ['.', ','];
/// The recognised direction letters, in canonical lowercase form.
const DIRECTION_LETTERS: [char; 4] = ['n', 's', 'e', 'w'];

/// Ordered rewrite table applied by [`normalize`]. Direction words come
/// before any single-letter handling so that, e.g., the `o` inside `north`
/// is never mistaken for a degree marker.
static SUBSTITUTIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new("north").expect("valid regex"), "n"),
        (Regex::new("south").expect("valid regex"), "s"),
        (Regex::new("west").expect("valid regex"), "w"),
        (Regex::new("east").expect("valid regex"), "e"),
        (
            Regex::new(r#"seconds|sec|["“”‟]|[´`‘’‛][´`‘’‛]|[´`‘’‛] [´`‘’‛]"#)
                .expect("valid regex"),
            "''",
        ),
        (Regex::new("minutes|min|[´`‘’‛]").expect("valid regex"), "'"),
        (Regex::new("degrees|deg").expect("valid regex"), "°"),
    ]
});

/// A number run: optional minus sign, then digits. The trailing marker is
/// everything up to the next digit or minus.
static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(-?\d+)([^\d-]*)").expect("valid regex"));

/// Error type with granular categories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    AmbiguousDirectionMarker,
    UnrecognizedLetters,
    Parse,
    InconsistentOrder,
    CannotDetermineOrder,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::AmbiguousDirectionMarker => {
                f.write_str("conflicting degree marker conventions: bare 'o' alongside '°'")
            }
            ErrorKind::UnrecognizedLetters => {
                f.write_str("unrecognised letters that are neither markers nor direction letters")
            }
            ErrorKind::Parse => f.write_str("no grammar rule matches the remaining tokens"),
            ErrorKind::InconsistentOrder => {
                f.write_str("direction letters name the same axis twice")
            }
            ErrorKind::CannotDetermineOrder => {
                f.write_str("direction letters do not determine an axis order")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    fn new(kind: ErrorKind, context: impl Into<String>) -> Self {
        Self {
            kind,
            context: context.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} ({})", self.kind, self.context)
        }
    }
}

impl std::error::Error for Error {}

/// One scanned number and the marker text that follows it. The trailing run
/// may be empty (last token) and encodes which grammatical marker, if any,
/// follows the number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub value: i64,
    pub trailing: String,
}

/// The minutes field of a sexagesimal coordinate.
#[derive(Clone, Debug, PartialEq)]
pub enum Minute {
    /// Minutes with a fractional part and no seconds field.
    Decimal(f64),
    /// Whole minutes plus a seconds field. Both magnitudes are non-negative.
    Split { minutes: u32, seconds: f64 },
}

impl Minute {
    /// The value as decimal minutes, with any seconds field folded in.
    pub fn as_decimal(&self) -> f64 {
        match self {
            Minute::Decimal(value) => *value,
            Minute::Split { minutes, seconds } => *minutes as f64 + seconds / 60.0,
        }
    }
}

/// A parsed coordinate value for one axis.
///
/// In the `Sexagesimal` form the sign lives exclusively in `positive`;
/// `degrees` and the minutes/seconds magnitudes are always non-negative, so
/// formatted output never shows a minus sign on the degree field.
#[derive(Clone, Debug, PartialEq)]
pub enum Coordinate {
    PlainDecimal(f64),
    Sexagesimal {
        positive: bool,
        degrees: u32,
        minutes: Minute,
    },
}

/// A coordinate normalised to the full degrees/minutes/seconds triple.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dms {
    pub positive: bool,
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: f64,
}

/// Which axis a coordinate belongs to; selects the hemisphere letter pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn letter(self, positive: bool) -> char {
        match (self, positive) {
            (Axis::Latitude, true) => 'N',
            (Axis::Latitude, false) => 'S',
            (Axis::Longitude, true) => 'E',
            (Axis::Longitude, false) => 'W',
        }
    }
}

impl Coordinate {
    /// The value as signed decimal degrees.
    pub fn to_decimal(&self) -> f64 {
        match self {
            Coordinate::PlainDecimal(value) => *value,
            Coordinate::Sexagesimal {
                positive,
                degrees,
                minutes,
            } => {
                let sign = if *positive { 1.0 } else { -1.0 };
                sign * (*degrees as f64 + minutes.as_decimal() / 60.0)
            }
        }
    }

    /// Normalise to the full three-field form by successive floor/remainder
    /// splitting. A coordinate whose minutes are already split passes
    /// through unchanged.
    pub fn to_sexagesimal(&self) -> Dms {
        match self {
            Coordinate::PlainDecimal(value) => {
                let magnitude = value.abs();
                let degrees = magnitude.floor();
                let raw_minutes = (magnitude - degrees) * 60.0;
                let minutes = raw_minutes.floor();
                Dms {
                    positive: *value >= 0.0,
                    degrees: degrees as u32,
                    minutes: minutes as u32,
                    seconds: (raw_minutes - minutes) * 60.0,
                }
            }
            Coordinate::Sexagesimal {
                positive,
                degrees,
                minutes,
            } => match minutes {
                Minute::Split { minutes, seconds } => Dms {
                    positive: *positive,
                    degrees: *degrees,
                    minutes: *minutes,
                    seconds: *seconds,
                },
                Minute::Decimal(value) => {
                    let whole = value.floor();
                    Dms {
                        positive: *positive,
                        degrees: *degrees,
                        minutes: whole as u32,
                        seconds: (value - whole) * 60.0,
                    }
                }
            },
        }
    }

    /// Re-express as plain decimal degrees.
    pub fn as_decimal(&self) -> Coordinate {
        Coordinate::PlainDecimal(self.to_decimal())
    }

    /// Re-express as degrees plus decimal minutes.
    pub fn as_degree_minutes(&self) -> Coordinate {
        let dms = self.to_sexagesimal();
        Coordinate::Sexagesimal {
            positive: dms.positive,
            degrees: dms.degrees,
            minutes: Minute::Decimal(dms.minutes as f64 + dms.seconds / 60.0),
        }
    }

    /// Re-express as degrees, whole minutes and decimal seconds.
    pub fn as_degree_minutes_seconds(&self) -> Coordinate {
        let dms = self.to_sexagesimal();
        Coordinate::Sexagesimal {
            positive: dms.positive,
            degrees: dms.degrees,
            minutes: Minute::Split {
                minutes: dms.minutes,
                seconds: dms.seconds,
            },
        }
    }

    /// Render with the hemisphere letter for `axis`, in the field layout
    /// implied by the coordinate's shape. The one fractional field present
    /// is printed with fixed precision, wide enough that re-parsing the
    /// output recovers the value to within 1e-6 degrees.
    pub fn format(&self, axis: Axis) -> String {
        match self {
            Coordinate::PlainDecimal(value) => {
                format!("{:.6}°{}", value.abs(), axis.letter(*value >= 0.0))
            }
            Coordinate::Sexagesimal {
                positive,
                degrees,
                minutes: Minute::Decimal(minutes),
            } => format!("{degrees}°{minutes:.6}'{}", axis.letter(*positive)),
            Coordinate::Sexagesimal {
                positive,
                degrees,
                minutes: Minute::Split { minutes, seconds },
            } => format!(
                "{degrees}°{minutes}'{seconds:.4}''{}",
                axis.letter(*positive)
            ),
        }
    }

    fn negated(self) -> Coordinate {
        match self {
            Coordinate::PlainDecimal(value) => Coordinate::PlainDecimal(-value),
            Coordinate::Sexagesimal {
                positive,
                degrees,
                minutes,
            } => Coordinate::Sexagesimal {
                positive: !positive,
                degrees,
                minutes,
            },
        }
    }
}

/// Signed, letter-free rendering in the value's own shape.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::PlainDecimal(value) => write!(f, "{value:.6}°"),
            Coordinate::Sexagesimal {
                positive,
                degrees,
                minutes,
            } => {
                if !positive {
                    f.write_str("-")?;
                }
                match minutes {
                    Minute::Decimal(m) => write!(f, "{degrees}°{m:.6}'"),
                    Minute::Split { minutes, seconds } => {
                        write!(f, "{degrees}°{minutes}'{seconds:.4}''")
                    }
                }
            }
        }
    }
}

/// Strip the trailing hemisphere letter from a formatted decimal string,
/// prepending `-` if that letter was `S` or `W`. A string without a
/// hemisphere letter passes through unchanged.
pub fn to_signed_decimal_string(formatted: &str) -> String {
    let trimmed = formatted.trim_end();
    match trimmed.chars().last() {
        Some(letter @ ('N' | 'S' | 'E' | 'W')) => {
            let body = trimmed[..trimmed.len() - letter.len_utf8()]
                .trim_end()
                .trim_end_matches(DEGREE_MARKER);
            if matches!(letter, 'S' | 'W') {
                format!("-{body}")
            } else {
                body.to_string()
            }
        }
        _ => trimmed.to_string(),
    }
}

/// Rewrite a raw string into its canonical lexical form.
///
/// Case-folds, collapses direction words to single letters and marker glyph
/// variants to the canonical `°`/`'`/`''` set. Fails with
/// [`ErrorKind::AmbiguousDirectionMarker`] when a bare `o` and an explicit
/// `°` occur in the same string. Idempotent on its own output.
pub fn normalize(raw: &str) -> Result<String, Error> {
    let mut canonical = raw.to_lowercase();
    for (pattern, replacement) in SUBSTITUTIONS.iter() {
        canonical = pattern.replace_all(&canonical, *replacement).into_owned();
    }

    // A leftover 'o' would itself become a degree marker; it cannot coexist
    // with an explicit degree symbol in the same string.
    if canonical.contains('o') && canonical.contains(DEGREE_MARKER) {
        return Err(Error::new(ErrorKind::AmbiguousDirectionMarker, raw.trim()));
    }

    Ok(canonical.replace('o', "°"))
}

/// Scan a canonical string into tokens, left to right. Never fails; a
/// string with no digits yields an empty sequence.
pub fn tokenize(s: &str) -> Vec<Token> {
    TOKEN_PATTERN
        .captures_iter(s)
        .map(|caps| Token {
            // Digit runs too long for i64 saturate.
            value: caps[1].parse().unwrap_or(i64::MAX),
            trailing: caps[2].to_string(),
        })
        .collect()
}

fn render_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| format!("{}{}", t.value, t.trailing))
        .collect()
}

fn parse_error(tokens: &[Token]) -> Error {
    Error::new(ErrorKind::Parse, render_tokens(tokens))
}

/// The trailing run with whitespace and direction letters skipped. Any
/// other letter has already been rejected by the orientation scan, so what
/// remains starts with the grammatical marker, if there is one.
fn leading_marker(trailing: &str) -> &str {
    trailing.trim_start_matches(|c: char| c.is_whitespace() || DIRECTION_LETTERS.contains(&c))
}

fn non_negative(value: i64, tokens: &[Token]) -> Result<i64, Error> {
    if value < 0 {
        Err(parse_error(tokens))
    } else {
        Ok(value)
    }
}

/// Decimal fallback: the tokenizer splits a decimal number on its
/// separator, so rejoin the first two tokens' integer parts around a `.`
/// and parse the result as one float.
fn parse_decimal(tokens: &[Token]) -> Result<(f64, &[Token]), Error> {
    if tokens.len() < 2 {
        return Err(parse_error(tokens));
    }

    let literal = format!("{}.{}", tokens[0].value, tokens[1].value);
    let value = literal.parse::<f64>().map_err(|_| parse_error(tokens))?;
    Ok((value, &tokens[2..]))
}

/// Parse one coordinate from the front of the token sequence and return the
/// unconsumed remainder.
fn parse_coordinate(tokens: &[Token]) -> Result<(Coordinate, &[Token]), Error> {
    if tokens.is_empty() {
        return Err(parse_error(tokens));
    }

    // A bare trailing number with no marker is itself a complete value.
    if tokens.len() == 1 {
        return Ok((
            Coordinate::PlainDecimal(tokens[0].value as f64),
            &tokens[1..],
        ));
    }

    let marker = leading_marker(&tokens[0].trailing);
    if marker.starts_with(DECIMAL_SEPARATORS) {
        let (value, rest) = parse_decimal(tokens)?;
        return Ok((Coordinate::PlainDecimal(value), rest));
    }

    // Degrees, marked with ° or implied by a markerless number run.
    if marker.starts_with(DEGREE_MARKER) || marker.is_empty() {
        let head = &tokens[0];
        return Ok(match parse_minutes(&tokens[1..]) {
            Ok((minutes, rest)) => (
                Coordinate::Sexagesimal {
                    positive: head.value >= 0,
                    degrees: head.value.unsigned_abs() as u32,
                    minutes,
                },
                rest,
            ),
            // Nothing minute-shaped follows; the degree value alone is a
            // complete plain value.
            Err(_) => (Coordinate::PlainDecimal(head.value as f64), &tokens[1..]),
        });
    }

    Err(parse_error(tokens))
}

/// One grammar level down: minutes, optionally followed by seconds.
fn parse_minutes(tokens: &[Token]) -> Result<(Minute, &[Token]), Error> {
    if tokens.is_empty() {
        return Err(parse_error(tokens));
    }

    if tokens.len() == 1 {
        let value = non_negative(tokens[0].value, tokens)?;
        return Ok((Minute::Decimal(value as f64), &tokens[1..]));
    }

    let marker = leading_marker(&tokens[0].trailing);
    if marker.starts_with(DECIMAL_SEPARATORS) {
        let (value, rest) = parse_decimal(tokens)?;
        if value < 0.0 {
            return Err(parse_error(tokens));
        }
        return Ok((Minute::Decimal(value), rest));
    }

    if marker.starts_with(MINUTES_MARKER) || marker.is_empty() {
        let minutes = non_negative(tokens[0].value, tokens)? as u32;
        return Ok(match parse_seconds(&tokens[1..]) {
            Ok((seconds, rest)) => (Minute::Split { minutes, seconds }, rest),
            // No seconds follow; keep the minutes as a decimal value.
            Err(_) => (Minute::Decimal(minutes as f64), &tokens[1..]),
        });
    }

    Err(parse_error(tokens))
}

/// Terminal grammar level: a seconds value requires an explicit marker, a
/// decimal separator, or being the last token.
fn parse_seconds(tokens: &[Token]) -> Result<(f64, &[Token]), Error> {
    if tokens.is_empty() {
        return Err(parse_error(tokens));
    }

    if tokens.len() == 1 {
        let value = non_negative(tokens[0].value, tokens)?;
        return Ok((value as f64, &tokens[1..]));
    }

    let marker = leading_marker(&tokens[0].trailing);
    if marker.starts_with(DECIMAL_SEPARATORS) {
        let (value, rest) = parse_decimal(tokens)?;
        if value < 0.0 {
            return Err(parse_error(tokens));
        }
        return Ok((value, rest));
    }

    if marker.starts_with(SECONDS_MARKER) {
        let value = non_negative(tokens[0].value, tokens)?;
        return Ok((value as f64, &tokens[1..]));
    }

    Err(parse_error(tokens))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OrderPolicy {
    AsParsed,
    Swapped,
}

/// How the parsed pair maps onto (latitude, longitude): the axis order plus
/// a negation flag per parsed position. Negation applies before any swap,
/// so each direction letter acts on the coordinate it annotates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Orientation {
    order: OrderPolicy,
    negate_first: bool,
    negate_second: bool,
}

impl Orientation {
    fn apply(self, first: Coordinate, second: Coordinate) -> (Coordinate, Coordinate) {
        let first = if self.negate_first {
            first.negated()
        } else {
            first
        };
        let second = if self.negate_second {
            second.negated()
        } else {
            second
        };
        match self.order {
            OrderPolicy::AsParsed => (first, second),
            OrderPolicy::Swapped => (second, first),
        }
    }
}

/// Scan the canonical string's letters and derive the axis order and signs.
fn resolve_orientation(canonical: &str, lat_first: bool) -> Result<Orientation, Error> {
    let letters: Vec<char> = canonical.chars().filter(|c| c.is_alphabetic()).collect();
    let stray: String = letters
        .iter()
        .filter(|c| !DIRECTION_LETTERS.contains(c))
        .collect();
    if !stray.is_empty() {
        return Err(Error::new(ErrorKind::UnrecognizedLetters, stray));
    }

    // Every letter is now a direction letter.
    let quadrant = letters;
    match quadrant.len() {
        0 => Ok(Orientation {
            order: if lat_first {
                OrderPolicy::AsParsed
            } else {
                OrderPolicy::Swapped
            },
            negate_first: false,
            negate_second: false,
        }),
        2 => {
            let first_is_lat = matches!(quadrant[0], 'n' | 's');
            let second_is_lat = matches!(quadrant[1], 'n' | 's');
            let order = match (first_is_lat, second_is_lat) {
                (true, false) => OrderPolicy::AsParsed,
                (false, true) => OrderPolicy::Swapped,
                _ => {
                    return Err(Error::new(
                        ErrorKind::InconsistentOrder,
                        quadrant.iter().collect::<String>(),
                    ))
                }
            };
            Ok(Orientation {
                order,
                negate_first: matches!(quadrant[0], 's' | 'w'),
                negate_second: matches!(quadrant[1], 's' | 'w'),
            })
        }
        _ => Err(Error::new(
            ErrorKind::CannotDetermineOrder,
            quadrant.iter().collect::<String>(),
        )),
    }
}

/// Parse one line holding exactly two coordinate values into a
/// `(latitude, longitude)` pair.
///
/// `lat_first` decides the axis order only when the line carries no
/// direction letters. Each call is a pure function of its inputs; any
/// failure is local to this one line.
pub fn parse(input: &str, lat_first: bool) -> Result<(Coordinate, Coordinate), Error> {
    let canonical = normalize(input)?;
    let orientation = resolve_orientation(&canonical, lat_first)?;
    let tokens = tokenize(&canonical);

    let (first, rest) = parse_coordinate(&tokens)?;
    let (first, second) = if rest.is_empty() && tokens.len() == 2 {
        // A bare two-number line is a pair, never degrees-plus-minutes and
        // never one decimal split on its separator.
        (
            Coordinate::PlainDecimal(tokens[0].value as f64),
            Coordinate::PlainDecimal(tokens[1].value as f64),
        )
    } else {
        let (second, rest) = parse_coordinate(rest)?;
        if !rest.is_empty() {
            return Err(parse_error(rest));
        }
        (first, second)
    };

    Ok(orientation.apply(first, second))
}
