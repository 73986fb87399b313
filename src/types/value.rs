//! EXIF value types
//!
//! Two representations live here:
//! - [`RawValue`]: the untyped shape a codec hands over, checked only once
//!   at the boundary
//! - [`TagValue`]: the typed union a validated tag entry owns, one variant
//!   per wire type

use crate::types::ifd::ExifType;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt;

/// Unsigned rational number (RATIONAL)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    /// Numerator
    pub num: u32,
    /// Denominator, never zero once validated
    pub denom: u32,
}

impl Rational {
    /// Create a new rational
    pub fn new(num: u32, denom: u32) -> Self {
        Self { num, denom }
    }

    /// Get the value as a float
    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.denom as f64
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.denom)
    }
}

/// Signed rational number (SRATIONAL)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SRational {
    /// Numerator
    pub num: i32,
    /// Denominator, never zero once validated
    pub denom: i32,
}

impl SRational {
    /// Create a new signed rational
    pub fn new(num: i32, denom: i32) -> Self {
        Self { num, denom }
    }

    /// Get the value as a float
    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.denom as f64
    }
}

impl fmt::Display for SRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.denom)
    }
}

/// Untyped value as produced by a codec's decode step
///
/// A raw value carries a shape but no wire type. It becomes a [`TagValue`]
/// only after validation against the type the registry declares for its tag.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Decoded text
    Text(String),
    /// Uninterpreted bytes
    Bytes(Vec<u8>),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// (numerator, denominator) pair
    Rational(i64, i64),
    /// Ordered sequence of values
    Seq(Vec<RawValue>),
}

impl RawValue {
    /// Short description of the shape, used in validation messages
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Text(_) => "text",
            RawValue::Bytes(_) => "bytes",
            RawValue::Int(_) => "integer",
            RawValue::Float(_) => "float",
            RawValue::Rational(_, _) => "rational",
            RawValue::Seq(_) => "sequence",
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<&[u8]> for RawValue {
    fn from(b: &[u8]) -> Self {
        RawValue::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for RawValue {
    fn from(b: Vec<u8>) -> Self {
        RawValue::Bytes(b)
    }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        RawValue::Int(i)
    }
}

impl From<i32> for RawValue {
    fn from(i: i32) -> Self {
        RawValue::Int(i as i64)
    }
}

impl From<u32> for RawValue {
    fn from(i: u32) -> Self {
        RawValue::Int(i as i64)
    }
}

impl From<u16> for RawValue {
    fn from(i: u16) -> Self {
        RawValue::Int(i as i64)
    }
}

impl From<f64> for RawValue {
    fn from(f: f64) -> Self {
        RawValue::Float(f)
    }
}

impl From<(i64, i64)> for RawValue {
    fn from((num, denom): (i64, i64)) -> Self {
        RawValue::Rational(num, denom)
    }
}

impl From<Vec<(i64, i64)>> for RawValue {
    fn from(pairs: Vec<(i64, i64)>) -> Self {
        RawValue::Seq(pairs.into_iter().map(RawValue::from).collect())
    }
}

impl From<Vec<i64>> for RawValue {
    fn from(ints: Vec<i64>) -> Self {
        RawValue::Seq(ints.into_iter().map(RawValue::Int).collect())
    }
}

impl From<Vec<RawValue>> for RawValue {
    fn from(values: Vec<RawValue>) -> Self {
        RawValue::Seq(values)
    }
}

/// Validated tag value, one variant per wire type
///
/// Numeric variants hold one element for a scalar value and several for a
/// sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// ASCII text
    Ascii(String),
    /// BYTE values
    Byte(Vec<u8>),
    /// SHORT values
    Short(Vec<u16>),
    /// LONG values
    Long(Vec<u32>),
    /// RATIONAL values
    Rational(Vec<Rational>),
    /// SRATIONAL values
    SRational(Vec<SRational>),
    /// FLOAT values
    Float(Vec<f64>),
    /// UNDEFINED bytes
    Undefined(Vec<u8>),
}

impl TagValue {
    /// Get the wire type this value is shaped for
    pub fn exif_type(&self) -> ExifType {
        match self {
            TagValue::Ascii(_) => ExifType::Ascii,
            TagValue::Byte(_) => ExifType::Byte,
            TagValue::Short(_) => ExifType::Short,
            TagValue::Long(_) => ExifType::Long,
            TagValue::Rational(_) => ExifType::Rational,
            TagValue::SRational(_) => ExifType::SRational,
            TagValue::Float(_) => ExifType::Float,
            TagValue::Undefined(_) => ExifType::Undefined,
        }
    }

    /// Get the value as text, if it is an ASCII value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Ascii(s) => Some(s),
            _ => None,
        }
    }

    /// Get the raw bytes, if it is an UNDEFINED value
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            TagValue::Undefined(b) => Some(b),
            _ => None,
        }
    }

    /// Get the unsigned integers of a BYTE, SHORT or LONG value
    pub fn as_integers(&self) -> Option<Vec<u32>> {
        match self {
            TagValue::Byte(v) => Some(v.iter().map(|&x| x as u32).collect()),
            TagValue::Short(v) => Some(v.iter().map(|&x| x as u32).collect()),
            TagValue::Long(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Get RATIONAL or SRATIONAL values as signed (numerator, denominator) pairs
    pub fn as_rationals(&self) -> Option<Vec<(i64, i64)>> {
        match self {
            TagValue::Rational(v) => Some(
                v.iter()
                    .map(|r| (r.num as i64, r.denom as i64))
                    .collect(),
            ),
            TagValue::SRational(v) => Some(
                v.iter()
                    .map(|r| (r.num as i64, r.denom as i64))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Number of elements (characters are not counted for text)
    pub fn count(&self) -> usize {
        match self {
            TagValue::Ascii(_) => 1,
            TagValue::Byte(v) => v.len(),
            TagValue::Short(v) => v.len(),
            TagValue::Long(v) => v.len(),
            TagValue::Rational(v) => v.len(),
            TagValue::SRational(v) => v.len(),
            TagValue::Float(v) => v.len(),
            TagValue::Undefined(v) => v.len(),
        }
    }
}

/// Render a float the way a scalar is shown to users: shortest round-trip
/// digits, with a trailing `.0` kept on integral values.
pub(crate) fn float_to_string(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

fn write_elements<T, F>(f: &mut fmt::Formatter<'_>, items: &[T], mut each: F) -> fmt::Result
where
    F: FnMut(&T) -> String,
{
    match items {
        [single] => f.write_str(&each(single)),
        _ => {
            let parts: Vec<String> = items.iter().map(each).collect();
            write!(f, "[{}]", parts.join(", "))
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Ascii(s) => f.write_str(s),
            TagValue::Byte(v) => write_elements(f, v, |x| x.to_string()),
            TagValue::Short(v) => write_elements(f, v, |x| x.to_string()),
            TagValue::Long(v) => write_elements(f, v, |x| x.to_string()),
            TagValue::Rational(v) => write_elements(f, v, |x| x.to_string()),
            TagValue::SRational(v) => write_elements(f, v, |x| x.to_string()),
            TagValue::Float(v) => write_elements(f, v, |x| float_to_string(*x)),
            TagValue::Undefined(b) => write!(f, "<bytes: {}>", b.len()),
        }
    }
}

impl Serialize for TagValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        fn elements<S: Serializer, T: Serialize>(
            serializer: S,
            items: &[T],
        ) -> Result<S::Ok, S::Error> {
            match items {
                [single] => single.serialize(serializer),
                _ => {
                    let mut seq = serializer.serialize_seq(Some(items.len()))?;
                    for item in items {
                        seq.serialize_element(item)?;
                    }
                    seq.end()
                }
            }
        }

        match self {
            TagValue::Ascii(s) => serializer.serialize_str(s),
            TagValue::Byte(v) => elements(serializer, v),
            TagValue::Short(v) => elements(serializer, v),
            TagValue::Long(v) => elements(serializer, v),
            TagValue::Rational(v) => {
                let pairs: Vec<(u32, u32)> = v.iter().map(|r| (r.num, r.denom)).collect();
                elements(serializer, &pairs)
            }
            TagValue::SRational(v) => {
                let pairs: Vec<(i32, i32)> = v.iter().map(|r| (r.num, r.denom)).collect();
                elements(serializer, &pairs)
            }
            TagValue::Float(v) => elements(serializer, v),
            TagValue::Undefined(b) => b.serialize(serializer),
        }
    }
}

fn flatten<T, F>(items: &[T], mut to_raw: F) -> RawValue
where
    F: FnMut(&T) -> RawValue,
{
    match items {
        [single] => to_raw(single),
        _ => RawValue::Seq(items.iter().map(to_raw).collect()),
    }
}

impl From<&TagValue> for RawValue {
    fn from(value: &TagValue) -> Self {
        match value {
            TagValue::Ascii(s) => RawValue::Text(s.clone()),
            TagValue::Byte(v) => flatten(v, |&x| RawValue::Int(x as i64)),
            TagValue::Short(v) => flatten(v, |&x| RawValue::Int(x as i64)),
            TagValue::Long(v) => flatten(v, |&x| RawValue::Int(x as i64)),
            TagValue::Rational(v) => {
                flatten(v, |r| RawValue::Rational(r.num as i64, r.denom as i64))
            }
            TagValue::SRational(v) => {
                flatten(v, |r| RawValue::Rational(r.num as i64, r.denom as i64))
            }
            TagValue::Float(v) => flatten(v, |&x| RawValue::Float(x)),
            TagValue::Undefined(b) => RawValue::Bytes(b.clone()),
        }
    }
}

impl From<TagValue> for RawValue {
    fn from(value: TagValue) -> Self {
        RawValue::from(&value)
    }
}
