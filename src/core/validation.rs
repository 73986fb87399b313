//! Tag value validation
//!
//! Narrows an untyped [`RawValue`] into the [`TagValue`] variant of the wire
//! type the registry declares for a tag. Validation runs whenever a tag
//! entry is built, so a store never holds a value its codec could not encode.

use crate::core::error::{ExifError, ExifResult};
use crate::types::ifd::ExifType;
use crate::types::value::{RawValue, Rational, SRational, TagValue};

/// Validate `raw` against `declared` and convert it to its typed form
///
/// # Arguments
///
/// * `tag_id` - The tag id, reported in errors
/// * `name` - The registered tag name, reported in errors
/// * `declared` - The wire type registered for the tag
/// * `raw` - The value to check
pub fn validate(
    tag_id: u16,
    name: &str,
    declared: ExifType,
    raw: &RawValue,
) -> ExifResult<TagValue> {
    narrow(declared, raw).map_err(|detail| ExifError::TagType {
        tag_id,
        name: name.to_string(),
        exif_type: declared,
        detail,
    })
}

fn narrow(declared: ExifType, raw: &RawValue) -> Result<TagValue, String> {
    match declared {
        ExifType::Ascii => match raw {
            RawValue::Text(s) => Ok(TagValue::Ascii(s.clone())),
            other => Err(format!("expected text, got {}", other.kind())),
        },
        ExifType::Undefined => match raw {
            RawValue::Bytes(b) => Ok(TagValue::Undefined(b.clone())),
            other => Err(format!("expected bytes, got {}", other.kind())),
        },
        ExifType::Byte => {
            let ints = bounded_integers(declared, raw)?;
            Ok(TagValue::Byte(ints.into_iter().map(|i| i as u8).collect()))
        }
        ExifType::Short => {
            let ints = bounded_integers(declared, raw)?;
            Ok(TagValue::Short(ints.into_iter().map(|i| i as u16).collect()))
        }
        ExifType::Long => {
            let ints = bounded_integers(declared, raw)?;
            Ok(TagValue::Long(ints.into_iter().map(|i| i as u32).collect()))
        }
        ExifType::Rational => {
            let mut values = Vec::new();
            for (num, denom) in pairs(raw)? {
                check_denominator(denom)?;
                if num < 0 || denom < 0 {
                    return Err("RATIONAL values must be non-negative".to_string());
                }
                let (num, denom) = match (u32::try_from(num), u32::try_from(denom)) {
                    (Ok(num), Ok(denom)) => (num, denom),
                    _ => {
                        return Err(format!(
                            "rational {}/{} out of range for RATIONAL (0..={})",
                            num,
                            denom,
                            u32::MAX
                        ))
                    }
                };
                values.push(Rational::new(num, denom));
            }
            Ok(TagValue::Rational(values))
        }
        ExifType::SRational => {
            let mut values = Vec::new();
            for (num, denom) in pairs(raw)? {
                check_denominator(denom)?;
                let (num, denom) = match (i32::try_from(num), i32::try_from(denom)) {
                    (Ok(num), Ok(denom)) => (num, denom),
                    _ => {
                        return Err(format!(
                            "rational {}/{} out of range for SRATIONAL ({}..={})",
                            num,
                            denom,
                            i32::MIN,
                            i32::MAX
                        ))
                    }
                };
                values.push(SRational::new(num, denom));
            }
            Ok(TagValue::SRational(values))
        }
        ExifType::Float => Ok(TagValue::Float(floats(raw)?)),
    }
}

fn check_denominator(denom: i64) -> Result<(), String> {
    if denom == 0 {
        return Err("denominator cannot be zero".to_string());
    }
    Ok(())
}

/// A single integer or a sequence of integers
fn integers(raw: &RawValue) -> Result<Vec<i64>, String> {
    match raw {
        RawValue::Int(i) => Ok(vec![*i]),
        RawValue::Seq(items) => items
            .iter()
            .map(|item| match item {
                RawValue::Int(i) => Ok(*i),
                other => Err(format!("expected integer elements, got {}", other.kind())),
            })
            .collect(),
        other => Err(format!(
            "expected an integer or a sequence of integers, got {}",
            other.kind()
        )),
    }
}

fn bounded_integers(declared: ExifType, raw: &RawValue) -> Result<Vec<i64>, String> {
    let ints = integers(raw)?;
    let bound = declared.integer_bound().unwrap_or(u32::MAX as u64) as i64;
    if let Some(bad) = ints.iter().find(|&&i| i < 0 || i > bound) {
        return Err(format!(
            "value {} out of range for {} (0..={})",
            bad, declared, bound
        ));
    }
    Ok(ints)
}

/// Interpret a raw value as one (numerator, denominator) pair
fn pair(raw: &RawValue) -> Option<(i64, i64)> {
    match raw {
        RawValue::Rational(num, denom) => Some((*num, *denom)),
        RawValue::Seq(items) => match items.as_slice() {
            [RawValue::Int(num), RawValue::Int(denom)] => Some((*num, *denom)),
            _ => None,
        },
        _ => None,
    }
}

/// A single pair or a sequence of pairs
fn pairs(raw: &RawValue) -> Result<Vec<(i64, i64)>, String> {
    if let Some(single) = pair(raw) {
        return Ok(vec![single]);
    }
    match raw {
        RawValue::Seq(items) => items
            .iter()
            .map(|item| {
                pair(item).ok_or_else(|| {
                    format!(
                        "expected (numerator, denominator) elements, got {}",
                        item.kind()
                    )
                })
            })
            .collect(),
        other => Err(format!(
            "expected a (numerator, denominator) pair or a sequence of pairs, got {}",
            other.kind()
        )),
    }
}

fn floats(raw: &RawValue) -> Result<Vec<f64>, String> {
    let scalar = |item: &RawValue| match item {
        RawValue::Float(f) => Some(*f),
        RawValue::Int(i) => Some(*i as f64),
        _ => None,
    };
    if let Some(single) = scalar(raw) {
        return Ok(vec![single]);
    }
    match raw {
        RawValue::Seq(items) => items
            .iter()
            .map(|item| {
                scalar(item)
                    .ok_or_else(|| format!("expected numeric elements, got {}", item.kind()))
            })
            .collect(),
        other => Err(format!(
            "expected a number or a sequence of numbers, got {}",
            other.kind()
        )),
    }
}
