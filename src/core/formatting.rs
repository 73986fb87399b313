//! Human-readable rendering of tag values
//!
//! A [`ValueFormatter`] holds per-tag-name display rules. Tags without a rule
//! fall back to binary rendering for UNDEFINED bytes and to the value's
//! default string form otherwise. Rendering is display-only and never feeds
//! back into a stored value.

use crate::core::entry::TagEntry;
use crate::core::error::{ExifError, ExifResult};
use crate::core::registry::TagRegistry;
use crate::types::value::{float_to_string, TagValue};
use base64::Engine;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const BUILTIN_FORMATTING: &str = include_str!("../../conf/formatting.json");

/// Standard photographic shutter denominators, fastest first
const SHUTTER_DENOMINATORS: [i64; 13] = [8000, 4000, 2000, 1000, 500, 250, 125, 60, 30, 15, 8, 4, 2];

const SHUTTER_TOLERANCE: f64 = 1e-3;

/// How UNDEFINED bytes without a display rule are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryFormat {
    /// Byte-string literal, e.g. `b"\xff\xfe"`
    Bytes,
    /// `hex:` followed by lowercase hex digits
    Hex,
    /// `base64:` followed by standard base64
    Base64,
}

impl FromStr for BinaryFormat {
    type Err = ExifError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bytes" => Ok(BinaryFormat::Bytes),
            "hex" => Ok(BinaryFormat::Hex),
            "base64" => Ok(BinaryFormat::Base64),
            other => Err(ExifError::UnsupportedBinaryFormat(other.to_string())),
        }
    }
}

impl fmt::Display for BinaryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinaryFormat::Bytes => "bytes",
            BinaryFormat::Hex => "hex",
            BinaryFormat::Base64 => "base64",
        })
    }
}

/// Display kind of a rule, with the parameters it needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayKind {
    /// Rational as a decimal number, unit appended verbatim
    Decimal { unit: Option<String> },
    /// Rational reduced by its greatest common divisor, unit appended verbatim
    Fraction { unit: Option<String> },
    /// APEX aperture value as `f/N.N`
    FNumber,
    /// Rational as a whole percentage
    Percent,
    /// Default rendering prefixed with `+`
    ShowPlus,
    /// GPS degrees, minutes and seconds (or fractional minutes)
    Coordinates,
    /// Focal length range and aperture range
    LensInfo,
    /// Integer looked up in a label table
    Map { mapping: BTreeMap<i64, String> },
    /// APEX shutter speed as seconds
    ShutterSpeed,
}

impl DisplayKind {
    /// Configuration name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayKind::Decimal { .. } => "decimal",
            DisplayKind::Fraction { .. } => "fraction",
            DisplayKind::FNumber => "f_number",
            DisplayKind::Percent => "percent",
            DisplayKind::ShowPlus => "show_plus",
            DisplayKind::Coordinates => "coordinates",
            DisplayKind::LensInfo => "lens_info",
            DisplayKind::Map { .. } => "map",
            DisplayKind::ShutterSpeed => "shutter_speed",
        }
    }
}

/// Display rule for one tag name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRule {
    /// How the value is rendered
    pub kind: DisplayKind,
    /// Prefix `+` to renderings that carry no sign
    pub show_plus: bool,
}

impl DisplayRule {
    /// Create a rule without the `+` prefix
    pub fn new(kind: DisplayKind) -> Self {
        Self {
            kind,
            show_plus: false,
        }
    }

    /// Enable or disable the `+` prefix
    pub fn with_show_plus(mut self, show_plus: bool) -> Self {
        self.show_plus = show_plus;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum DisplayName {
    Decimal,
    Fraction,
    FNumber,
    Percent,
    ShowPlus,
    Coordinates,
    LensInfo,
    Map,
    ShutterSpeed,
}

/// One display rule as written in the formatting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatRuleConfig {
    display: DisplayName,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    mapping: Option<BTreeMap<i64, String>>,
    #[serde(default)]
    show_plus: bool,
}

/// Formatting configuration keyed by tag name
pub type FormattingConfig = BTreeMap<String, FormatRuleConfig>;

impl FormatRuleConfig {
    fn into_rule(self, tag: &str) -> ExifResult<DisplayRule> {
        let unit_allowed = matches!(self.display, DisplayName::Decimal | DisplayName::Fraction);
        if self.unit.is_some() && !unit_allowed {
            return Err(ExifError::Config(format!(
                "Rule for '{}' sets a unit, which only decimal and fraction use",
                tag
            )));
        }
        if self.mapping.is_some() && self.display != DisplayName::Map {
            return Err(ExifError::Config(format!(
                "Rule for '{}' sets a mapping, which only map uses",
                tag
            )));
        }

        let kind = match self.display {
            DisplayName::Decimal => DisplayKind::Decimal { unit: self.unit },
            DisplayName::Fraction => DisplayKind::Fraction { unit: self.unit },
            DisplayName::FNumber => DisplayKind::FNumber,
            DisplayName::Percent => DisplayKind::Percent,
            DisplayName::ShowPlus => DisplayKind::ShowPlus,
            DisplayName::Coordinates => DisplayKind::Coordinates,
            DisplayName::LensInfo => DisplayKind::LensInfo,
            DisplayName::Map => DisplayKind::Map {
                mapping: self.mapping.ok_or_else(|| {
                    ExifError::Config(format!("Map rule for '{}' has no mapping", tag))
                })?,
            },
            DisplayName::ShutterSpeed => DisplayKind::ShutterSpeed,
        };
        Ok(DisplayRule {
            kind,
            show_plus: self.show_plus,
        })
    }
}

/// Renders tag values according to per-tag display rules
#[derive(Debug, Clone, Default)]
pub struct ValueFormatter {
    rules: HashMap<String, DisplayRule>,
}

impl ValueFormatter {
    /// Create a formatter from already-built rules
    pub fn from_rules<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = (S, DisplayRule)>,
        S: Into<String>,
    {
        Self {
            rules: rules.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Build a formatter from a parsed configuration
    pub fn from_config(config: FormattingConfig) -> ExifResult<Self> {
        let mut rules = HashMap::with_capacity(config.len());
        for (tag, rule) in config {
            let rule = rule.into_rule(&tag)?;
            rules.insert(tag, rule);
        }
        log::debug!("Loaded {} display rules", rules.len());
        Ok(Self { rules })
    }

    /// Parse a formatter from its JSON configuration
    pub fn from_json_str(s: &str) -> ExifResult<Self> {
        let config: FormattingConfig = serde_json::from_str(s)?;
        Self::from_config(config)
    }

    /// Load a formatter from a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> ExifResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Load the display rules shipped with the crate
    pub fn builtin() -> ExifResult<Self> {
        Self::from_json_str(BUILTIN_FORMATTING)
    }

    /// Get the display rule for a tag name
    pub fn rule(&self, name: &str) -> Option<&DisplayRule> {
        self.rules.get(name)
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the formatter has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Render a value for the tag called `name`
    ///
    /// # Arguments
    ///
    /// * `name` - Registered tag name, used to look up the display rule
    /// * `value` - The value to render
    /// * `binary_format` - How UNDEFINED bytes without a rule are shown;
    ///   `None` shows only their length
    pub fn format(
        &self,
        name: &str,
        value: &TagValue,
        binary_format: Option<BinaryFormat>,
    ) -> ExifResult<String> {
        if let Some(rule) = self.rules.get(name) {
            return apply_rule(name, rule, value);
        }
        match value {
            TagValue::Undefined(bytes) => Ok(format_bytes(bytes, binary_format)),
            other => Ok(other.to_string()),
        }
    }

    /// Render a tag entry
    pub fn format_entry(
        &self,
        registry: &TagRegistry,
        entry: &TagEntry,
        binary_format: Option<BinaryFormat>,
    ) -> ExifResult<String> {
        let name = entry.name(registry)?;
        self.format(name, entry.value(), binary_format)
    }
}

fn apply_rule(name: &str, rule: &DisplayRule, value: &TagValue) -> ExifResult<String> {
    let fail = |detail: String| ExifError::Format {
        name: name.to_string(),
        detail,
    };
    let not_rational = || {
        fail(format!(
            "{} values cannot be shown as {}",
            value.exif_type(),
            rule.kind.as_str()
        ))
    };

    match &rule.kind {
        DisplayKind::Coordinates => {
            let pairs = numeric_pairs(value).ok_or_else(not_rational)?;
            let triple: [(i64, i64); 3] = pairs.try_into().map_err(|pairs: Vec<_>| {
                fail(format!("coordinates need 3 rationals, got {}", pairs.len()))
            })?;
            Ok(signed(rule, format_coordinates(&triple)))
        }
        DisplayKind::LensInfo => {
            let pairs = numeric_pairs(value).ok_or_else(not_rational)?;
            let quad: [(i64, i64); 4] = pairs.try_into().map_err(|pairs: Vec<_>| {
                fail(format!("lens info needs 4 rationals, got {}", pairs.len()))
            })?;
            Ok(signed(rule, format_lens_info(&quad)))
        }
        DisplayKind::Map { mapping } => {
            let ints = integers(value).ok_or_else(|| {
                fail(format!("{} values cannot be mapped", value.exif_type()))
            })?;
            let parts = ints
                .into_iter()
                .map(|i| {
                    format_map(i, mapping)
                        .map(|label| signed(rule, label.to_string()))
                        .ok_or_else(|| fail(format!("value {} has no mapping", i)))
                })
                .collect::<ExifResult<Vec<_>>>()?;
            Ok(join_elements(parts))
        }
        DisplayKind::ShowPlus => {
            let parts = element_strings(value)
                .into_iter()
                .map(|s| format!("+{}", s))
                .collect();
            Ok(join_elements(parts))
        }
        DisplayKind::Decimal { unit } => {
            if let TagValue::Float(floats) = value {
                let unit = unit.as_deref().unwrap_or("");
                let parts = floats
                    .iter()
                    .map(|&f| signed(rule, format!("{}{}", float_to_string(f), unit)))
                    .collect();
                return Ok(join_elements(parts));
            }
            each_pair(rule, value, not_rational, |pair| {
                format_decimal(pair, unit.as_deref())
            })
        }
        DisplayKind::Fraction { unit } => each_pair(rule, value, not_rational, |pair| {
            format_fraction(pair, unit.as_deref())
        }),
        DisplayKind::FNumber => each_pair(rule, value, not_rational, format_f_number),
        DisplayKind::Percent => each_pair(rule, value, not_rational, format_percent),
        DisplayKind::ShutterSpeed => each_pair(rule, value, not_rational, format_shutter_speed),
    }
}

/// Apply a rational handler to every element of a value
fn each_pair<E, F>(rule: &DisplayRule, value: &TagValue, not_rational: E, render: F) -> ExifResult<String>
where
    E: FnOnce() -> ExifError,
    F: Fn((i64, i64)) -> String,
{
    let pairs = numeric_pairs(value).ok_or_else(not_rational)?;
    let parts = pairs
        .into_iter()
        .map(|pair| signed(rule, render(pair)))
        .collect();
    Ok(join_elements(parts))
}

fn signed(rule: &DisplayRule, rendered: String) -> String {
    if rule.show_plus && !rendered.starts_with('-') && !rendered.starts_with('+') {
        format!("+{}", rendered)
    } else {
        rendered
    }
}

/// Rationals as pairs, integers as `(i, 1)`
fn numeric_pairs(value: &TagValue) -> Option<Vec<(i64, i64)>> {
    value.as_rationals().or_else(|| {
        value
            .as_integers()
            .map(|ints| ints.into_iter().map(|i| (i as i64, 1)).collect())
    })
}

fn integers(value: &TagValue) -> Option<Vec<i64>> {
    value
        .as_integers()
        .map(|ints| ints.into_iter().map(i64::from).collect())
}

fn element_strings(value: &TagValue) -> Vec<String> {
    match value {
        TagValue::Ascii(_) | TagValue::Undefined(_) => vec![value.to_string()],
        TagValue::Byte(v) => v.iter().map(|x| x.to_string()).collect(),
        TagValue::Short(v) => v.iter().map(|x| x.to_string()).collect(),
        TagValue::Long(v) => v.iter().map(|x| x.to_string()).collect(),
        TagValue::Rational(v) => v.iter().map(|x| x.to_string()).collect(),
        TagValue::SRational(v) => v.iter().map(|x| x.to_string()).collect(),
        TagValue::Float(v) => v.iter().map(|&x| float_to_string(x)).collect(),
    }
}

fn join_elements(mut parts: Vec<String>) -> String {
    if parts.len() == 1 {
        return parts.remove(0);
    }
    format!("[{}]", parts.join(", "))
}

fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a as i64
}

fn ratio((num, denom): (i64, i64)) -> f64 {
    num as f64 / denom as f64
}

/// Rational as a decimal number, e.g. `(3, 2)` as `1.5`
pub fn format_decimal(value: (i64, i64), unit: Option<&str>) -> String {
    format!("{}{}", float_to_string(ratio(value)), unit.unwrap_or(""))
}

/// Rational reduced to lowest terms, e.g. `(2, 4)` as `1/2`
pub fn format_fraction((num, denom): (i64, i64), unit: Option<&str>) -> String {
    let divisor = gcd(num, denom);
    let (num, denom) = if divisor == 0 {
        (num, denom)
    } else {
        (num / divisor, denom / divisor)
    };
    format!("{}/{}{}", num, denom, unit.unwrap_or(""))
}

/// APEX aperture value as an f-number, e.g. `(2, 1)` as `f/2.0`
pub fn format_f_number(value: (i64, i64)) -> String {
    let f_number = 2f64.powf(ratio(value)).sqrt();
    format!("f/{:.1}", f_number)
}

/// Rational as a whole percentage, e.g. `(1, 2)` as `50%`
pub fn format_percent(value: (i64, i64)) -> String {
    format!("{:.0}%", ratio(value) * 100.0)
}

/// GPS coordinate triple
///
/// Degrees and minutes come from the numerators of the first two rationals.
/// A third rational with denominator 1 is whole seconds (`1°2'3"`); any other
/// denominator is a fraction of a minute (`1°2.03'`).
pub fn format_coordinates(value: &[(i64, i64); 3]) -> String {
    let [(degrees, _), (minutes, _), seconds] = *value;
    if seconds.1 == 1 {
        format!("{}°{}'{}\"", degrees, minutes, seconds.0)
    } else {
        let fraction = float_to_string(ratio(seconds));
        format!("{}°{}{}'", degrees, minutes, fraction.trim_start_matches('0'))
    }
}

/// Lens specification: min and max focal length, then min and max APEX aperture
pub fn format_lens_info(value: &[(i64, i64); 4]) -> String {
    format!(
        "{} mm - {}; {} - {}",
        format_decimal(value[0], None),
        format_decimal(value[1], None),
        format_f_number(value[2]),
        format_f_number(value[3])
    )
}

/// Look up an integer in a label table
pub fn format_map(value: i64, mapping: &BTreeMap<i64, String>) -> Option<&str> {
    mapping.get(&value).map(|s| s.as_str())
}

/// APEX shutter speed value as seconds
///
/// Exposures of a second or longer are whole seconds (`2s`) or one decimal
/// (`1.5s`). Shorter ones snap to a standard shutter denominator when one is
/// within tolerance (`1/250s`), else to `1/N` with `N` rounded.
pub fn format_shutter_speed(value: (i64, i64)) -> String {
    let seconds = 2f64.powf(-ratio(value));
    if seconds >= 1.0 {
        if seconds.fract() == 0.0 {
            return format!("{}s", seconds as u64);
        }
        return format!("{:.1}s", seconds);
    }

    for denom in SHUTTER_DENOMINATORS {
        let num = seconds * denom as f64;
        let rounded = num.round();
        if rounded >= 1.0 && (rounded - num).abs() < SHUTTER_TOLERANCE {
            return format_fraction((rounded as i64, denom), Some("s"));
        }
    }

    format!("1/{}s", (1.0 / seconds).round() as u64)
}

/// Render raw bytes
///
/// Without a binary format only the length is shown, never the content.
pub fn format_bytes(bytes: &[u8], binary_format: Option<BinaryFormat>) -> String {
    match binary_format {
        None => format!("<bytes: {}>", bytes.len()),
        Some(BinaryFormat::Hex) => {
            let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
            format!("hex:{}", hex)
        }
        Some(BinaryFormat::Base64) => format!(
            "base64:{}",
            base64::engine::general_purpose::STANDARD.encode(bytes)
        ),
        Some(BinaryFormat::Bytes) => {
            let escaped: String = bytes
                .iter()
                .flat_map(|&b| std::ascii::escape_default(b))
                .map(char::from)
                .collect();
            format!("b\"{}\"", escaped)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::value::{Rational, SRational};

    fn rational(num: u32, denom: u32) -> TagValue {
        TagValue::Rational(vec![Rational::new(num, denom)])
    }

    fn formatter() -> ValueFormatter {
        ValueFormatter::from_json_str(
            r#"{
                "ExposureTime": {"display": "fraction", "unit": "s"},
                "FocalLength": {"display": "decimal", "unit": " mm"},
                "ApertureValue": {"display": "f_number"},
                "ShutterSpeedValue": {"display": "shutter_speed"},
                "Saturation": {"display": "percent"},
                "ExposureBiasValue": {"display": "decimal", "unit": " EV", "show_plus": true},
                "Offset": {"display": "show_plus"},
                "GPSLatitude": {"display": "coordinates"},
                "LensSpecification": {"display": "lens_info"},
                "Orientation": {"display": "map", "mapping": {"1": "Top-left", "6": "Right-top"}}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_format_fraction() {
        assert_eq!(format_fraction((1, 2), None), "1/2");
        assert_eq!(format_fraction((1, 2), Some("mm")), "1/2mm");
        assert_eq!(format_fraction((10, 1000), Some("s")), "1/100s");
        assert_eq!(format_fraction((-3, 6), None), "-1/2");
        assert_eq!(format_fraction((0, 0), None), "0/0");
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal((3, 2), None), "1.5");
        assert_eq!(format_decimal((72, 1), None), "72.0");
        assert_eq!(format_decimal((50, 1), Some(" mm")), "50.0 mm");
    }

    #[test]
    fn test_format_f_number() {
        assert_eq!(format_f_number((2, 1)), "f/2.0");
        assert_eq!(format_f_number((497, 100)), "f/5.6");
        assert_eq!(format_f_number((1, 2)), "f/1.2");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent((1, 2)), "50%");
        assert_eq!(format_percent((1, 1)), "100%");
    }

    #[test]
    fn test_format_shutter_speed() {
        assert_eq!(format_shutter_speed((0, 1)), "1s");
        assert_eq!(format_shutter_speed((-1, 1)), "2s");
        assert_eq!(format_shutter_speed((-232, 100)), "5.0s");
        assert_eq!(format_shutter_speed((-585, 1000)), "1.5s");
        assert_eq!(format_shutter_speed((1, 1)), "1/2s");
        assert_eq!(format_shutter_speed((3, 1)), "1/8s");
        assert_eq!(format_shutter_speed((8, 1)), "1/256s");
    }

    #[test]
    fn test_format_coordinates() {
        assert_eq!(format_coordinates(&[(1, 1), (2, 1), (3, 1)]), "1°2'3\"");
        assert_eq!(format_coordinates(&[(1, 1), (2, 1), (3, 100)]), "1°2.03'");
    }

    #[test]
    fn test_format_lens_info() {
        assert_eq!(
            format_lens_info(&[(24, 1), (70, 1), (297, 100), (497, 100)]),
            "24.0 mm - 70.0; f/2.8 - f/5.6"
        );
    }

    #[test]
    fn test_format_bytes() {
        let bytes = [0xff, 0xfe, 0xfd, 0xfc];
        assert_eq!(format_bytes(&bytes, None), "<bytes: 4>");
        assert_eq!(format_bytes(&bytes, Some(BinaryFormat::Hex)), "hex:fffefdfc");
        assert_eq!(format_bytes(&bytes, Some(BinaryFormat::Base64)), "base64://79/A==");
        assert_eq!(
            format_bytes(&bytes, Some(BinaryFormat::Bytes)),
            "b\"\\xff\\xfe\\xfd\\xfc\""
        );
        assert_eq!(format_bytes(b"0230", Some(BinaryFormat::Bytes)), "b\"0230\"");
        assert_eq!(format_bytes(&[], None), "<bytes: 0>");
    }

    #[test]
    fn test_binary_format_from_str() {
        assert_eq!("hex".parse::<BinaryFormat>().unwrap(), BinaryFormat::Hex);
        assert_eq!("base64".parse::<BinaryFormat>().unwrap(), BinaryFormat::Base64);
        assert_eq!("bytes".parse::<BinaryFormat>().unwrap(), BinaryFormat::Bytes);
        assert!(matches!(
            "octal".parse::<BinaryFormat>(),
            Err(ExifError::UnsupportedBinaryFormat(s)) if s == "octal"
        ));
    }

    #[test]
    fn test_format_with_rules() {
        let formatter = formatter();
        assert_eq!(
            formatter.format("ExposureTime", &rational(1, 100), None).unwrap(),
            "1/100s"
        );
        assert_eq!(
            formatter.format("FocalLength", &rational(50, 1), None).unwrap(),
            "50.0 mm"
        );
        assert_eq!(
            formatter.format("ApertureValue", &rational(497, 100), None).unwrap(),
            "f/5.6"
        );
        assert_eq!(
            formatter
                .format("Orientation", &TagValue::Short(vec![6]), None)
                .unwrap(),
            "Right-top"
        );
        assert_eq!(
            formatter
                .format("Saturation", &rational(1, 4), None)
                .unwrap(),
            "25%"
        );
    }

    #[test]
    fn test_format_show_plus() {
        let formatter = formatter();
        let bias = |num, denom| TagValue::SRational(vec![SRational::new(num, denom)]);
        assert_eq!(
            formatter.format("ExposureBiasValue", &bias(1, 3), None).unwrap(),
            "+0.3333333333333333 EV"
        );
        assert_eq!(
            formatter.format("ExposureBiasValue", &bias(-1, 2), None).unwrap(),
            "-0.5 EV"
        );
        assert_eq!(
            formatter.format("Offset", &TagValue::Short(vec![3]), None).unwrap(),
            "+3"
        );
    }

    #[test]
    fn test_format_element_wise() {
        let formatter = formatter();
        let value = TagValue::Rational(vec![Rational::new(1, 100), Rational::new(1, 50)]);
        assert_eq!(
            formatter.format("ExposureTime", &value, None).unwrap(),
            "[1/100s, 1/50s]"
        );
        let value = TagValue::Short(vec![1, 6]);
        assert_eq!(
            formatter.format("Orientation", &value, None).unwrap(),
            "[Top-left, Right-top]"
        );
    }

    #[test]
    fn test_format_coordinates_rule() {
        let formatter = formatter();
        let value = TagValue::Rational(vec![
            Rational::new(1, 1),
            Rational::new(2, 1),
            Rational::new(3, 100),
        ]);
        assert_eq!(formatter.format("GPSLatitude", &value, None).unwrap(), "1°2.03'");

        let short = TagValue::Rational(vec![Rational::new(1, 1)]);
        assert!(matches!(
            formatter.format("GPSLatitude", &short, None),
            Err(ExifError::Format { .. })
        ));
    }

    #[test]
    fn test_unmapped_value_is_an_error() {
        let formatter = formatter();
        let err = formatter
            .format("Orientation", &TagValue::Short(vec![9]), None)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot format tag 'Orientation': value 9 has no mapping"
        );
    }

    #[test]
    fn test_format_without_rule() {
        let formatter = formatter();
        assert_eq!(
            formatter
                .format("Make", &TagValue::Ascii("Canon".into()), Some(BinaryFormat::Hex))
                .unwrap(),
            "Canon"
        );
        let bytes = TagValue::Undefined(vec![0xff, 0xfe, 0xfd, 0xfc]);
        assert_eq!(
            formatter.format("MakerNote", &bytes, None).unwrap(),
            "<bytes: 4>"
        );
        assert_eq!(
            formatter
                .format("MakerNote", &bytes, Some(BinaryFormat::Base64))
                .unwrap(),
            "base64://79/A=="
        );
        assert_eq!(
            formatter
                .format("GPSVersionID", &TagValue::Byte(vec![2, 2, 0, 0]), None)
                .unwrap(),
            "[2, 2, 0, 0]"
        );
    }

    #[test]
    fn test_config_errors() {
        let result = ValueFormatter::from_json_str(r#"{"Orientation": {"display": "map"}}"#);
        assert!(matches!(result, Err(ExifError::Config(_))));

        let result =
            ValueFormatter::from_json_str(r#"{"FNumber": {"display": "f_number", "unit": "x"}}"#);
        assert!(matches!(result, Err(ExifError::Config(_))));

        let result = ValueFormatter::from_json_str(r#"{"FNumber": {"display": "stars"}}"#);
        assert!(matches!(result, Err(ExifError::ConfigParse(_))));
    }

    #[test]
    fn test_builtin_loads() {
        let formatter = ValueFormatter::builtin().unwrap();
        assert!(!formatter.is_empty());
        assert_eq!(
            formatter.rule("ExposureTime").map(|r| &r.kind),
            Some(&DisplayKind::Fraction {
                unit: Some("s".to_string())
            })
        );
    }

    #[test]
    fn test_from_rules() {
        let formatter = ValueFormatter::from_rules([(
            "ExposureTime",
            DisplayRule::new(DisplayKind::Fraction {
                unit: Some("s".to_string()),
            }),
        )]);
        assert_eq!(formatter.len(), 1);
        assert_eq!(
            formatter.format("ExposureTime", &rational(2, 500), None).unwrap(),
            "1/250s"
        );
    }
}
