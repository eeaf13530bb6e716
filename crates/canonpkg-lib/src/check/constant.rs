//! Untyped constants: literal values and representability.

use canonpkg_core::BasicKind;

use crate::parser::cst::SyntaxKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum UntypedKind {
    Bool,
    Int,
    Rune,
    Float,
    String,
}

impl UntypedKind {
    /// Type an untyped constant takes when nothing else constrains it.
    pub fn default_type(self) -> BasicKind {
        match self {
            Self::Bool => BasicKind::Bool,
            Self::Int => BasicKind::Int,
            Self::Rune => BasicKind::Int32,
            Self::Float => BasicKind::Float64,
            Self::String => BasicKind::String,
        }
    }

    /// Inverse of [`Self::default_type`], for untyped constants of other packages.
    pub fn from_default(kind: BasicKind) -> Self {
        match kind {
            BasicKind::Bool => Self::Bool,
            BasicKind::Int32 => Self::Rune,
            BasicKind::Float32 | BasicKind::Float64 => Self::Float,
            BasicKind::String => Self::String,
            _ => Self::Int,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Bool => "untyped bool",
            Self::Int => "untyped int",
            Self::Rune => "untyped rune",
            Self::Float => "untyped float",
            Self::String => "untyped string",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ConstValue {
    Bool(bool),
    Int(i128),
    Float(f64),
    /// Go strings are byte sequences; escapes need not form UTF-8.
    String(Vec<u8>),
    /// Too large to track, or declared in another package.
    Unknown,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Constant {
    pub kind: UntypedKind,
    pub value: ConstValue,
}

impl Constant {
    pub fn new(kind: UntypedKind, value: ConstValue) -> Self {
        Self { kind, value }
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(UntypedKind::Bool, ConstValue::Bool(value))
    }

    /// Value of a literal token. `None` for malformed text.
    pub fn from_literal(kind: SyntaxKind, text: &str) -> Option<Self> {
        let constant = match kind {
            SyntaxKind::IntLit => {
                let value = int_value(text).map_or(ConstValue::Unknown, ConstValue::Int);
                Self::new(UntypedKind::Int, value)
            }
            SyntaxKind::FloatLit => {
                let value: f64 = text.replace('_', "").parse().ok()?;
                Self::new(UntypedKind::Float, ConstValue::Float(value))
            }
            SyntaxKind::StringLit => {
                Self::new(UntypedKind::String, ConstValue::String(string_bytes(text)?))
            }
            SyntaxKind::CharLit => {
                let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
                let rune = match units(inner)?.as_slice() {
                    [Unit::Byte(b)] => u32::from(*b),
                    [Unit::Char(c)] => u32::from(*c),
                    _ => return None,
                };
                Self::new(UntypedKind::Rune, ConstValue::Int(rune.into()))
            }
            _ => return None,
        };
        Some(constant)
    }

    /// `-c`. Values too large to track stay unknown.
    pub fn negate(self) -> Self {
        let value = match self.value {
            ConstValue::Int(v) => v.checked_neg().map_or(ConstValue::Unknown, ConstValue::Int),
            ConstValue::Float(f) => ConstValue::Float(-f),
            other => other,
        };
        Self { value, ..self }
    }

    /// Why this constant doesn't fit `target`, if it doesn't.
    pub fn representable(&self, target: BasicKind) -> Result<(), Unrepresentable> {
        match self.kind {
            UntypedKind::Bool if target == BasicKind::Bool => Ok(()),
            UntypedKind::String if target == BasicKind::String => Ok(()),
            UntypedKind::Int | UntypedKind::Rune | UntypedKind::Float if target.is_float() => Ok(()),
            UntypedKind::Int | UntypedKind::Rune | UntypedKind::Float if target.is_integer() => {
                let value = match self.value {
                    ConstValue::Int(v) => v,
                    ConstValue::Float(f) if f.fract() != 0.0 => {
                        return Err(Unrepresentable::Truncated);
                    }
                    ConstValue::Float(f) if f.abs() < 1e38 => f as i128,
                    ConstValue::Float(_) => return Err(Unrepresentable::Overflows),
                    _ => return Ok(()),
                };
                let (min, max) = integer_range(target);
                if value < min || value > max {
                    return Err(Unrepresentable::Overflows);
                }
                Ok(())
            }
            _ => Err(Unrepresentable::Mismatched),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Unrepresentable {
    Mismatched,
    Overflows,
    Truncated,
}

impl Unrepresentable {
    /// Suffix appended to "cannot use" messages.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Mismatched => "",
            Self::Overflows => " (overflows)",
            Self::Truncated => " (truncated)",
        }
    }
}

fn integer_range(kind: BasicKind) -> (i128, i128) {
    match kind {
        BasicKind::Int8 => (i8::MIN.into(), i8::MAX.into()),
        BasicKind::Int16 => (i16::MIN.into(), i16::MAX.into()),
        BasicKind::Int32 => (i32::MIN.into(), i32::MAX.into()),
        BasicKind::Uint8 => (0, u8::MAX.into()),
        BasicKind::Uint16 => (0, u16::MAX.into()),
        BasicKind::Uint32 => (0, u32::MAX.into()),
        BasicKind::Uint | BasicKind::Uint64 | BasicKind::Uintptr => (0, u64::MAX.into()),
        _ => (i64::MIN.into(), i64::MAX.into()),
    }
}

/// Integer literal value. `None` when it doesn't fit `i128`.
pub(crate) fn int_value(text: &str) -> Option<i128> {
    let digits = text.replace('_', "");
    let (radix, body) = match digits.get(..2) {
        Some("0x" | "0X") => (16, &digits[2..]),
        Some("0o" | "0O") => (8, &digits[2..]),
        Some("0b" | "0B") => (2, &digits[2..]),
        _ if digits.len() > 1 && digits.starts_with('0') => (8, &digits[1..]),
        _ => (10, digits.as_str()),
    };
    i128::from_str_radix(body, radix).ok()
}

/// Contents of a string literal as text, for import paths.
pub(crate) fn unquote(text: &str) -> Option<String> {
    String::from_utf8(string_bytes(text)?).ok()
}

/// Bytes of a string literal, raw or interpreted.
pub(crate) fn string_bytes(text: &str) -> Option<Vec<u8>> {
    if let Some(raw) = text.strip_prefix('`') {
        return raw.strip_suffix('`').map(|s| s.replace('\r', "").into_bytes());
    }
    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = Vec::with_capacity(inner.len());
    for unit in units(inner)? {
        match unit {
            Unit::Byte(b) => out.push(b),
            Unit::Char(c) => out.extend_from_slice(c.encode_utf8(&mut [0; 4]).as_bytes()),
        }
    }
    Some(out)
}

/// One decoded element of an interpreted literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Unit {
    /// Octal and `\x` escapes denote single bytes.
    Byte(u8),
    Char(char),
}

fn units(inner: &str) -> Option<Vec<Unit>> {
    let mut out = Vec::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(Unit::Char(c));
            continue;
        }
        let unit = match chars.next()? {
            'n' => Unit::Char('\n'),
            't' => Unit::Char('\t'),
            'r' => Unit::Char('\r'),
            'a' => Unit::Char('\u{7}'),
            'b' => Unit::Char('\u{8}'),
            'f' => Unit::Char('\u{c}'),
            'v' => Unit::Char('\u{b}'),
            c @ ('\\' | '\'' | '"') => Unit::Char(c),
            d @ '0'..='7' => {
                let high = d.to_digit(8)?;
                Unit::Byte(u8::try_from(high * 64 + digits(&mut chars, 2, 8)?).ok()?)
            }
            'x' => Unit::Byte(u8::try_from(digits(&mut chars, 2, 16)?).ok()?),
            'u' => Unit::Char(char::from_u32(digits(&mut chars, 4, 16)?)?),
            'U' => Unit::Char(char::from_u32(digits(&mut chars, 8, 16)?)?),
            _ => return None,
        };
        out.push(unit);
    }
    Some(out)
}

/// Exactly `count` digits in `radix`.
fn digits(chars: &mut std::str::Chars<'_>, count: usize, radix: u32) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..count {
        value = value * radix + chars.next()?.to_digit(radix)?;
    }
    Some(value)
}
