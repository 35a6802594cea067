//! Attributes and trait-name conventions
//!
//! Template data names attribute purchases the way a GURPS sheet does:
//! `ST 17` sets a score, `ST +2` raises it. Leveled traits end in their level
//! (`Magery 3`, `Resistant to Disease (PM) +3`).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Primary and secondary attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Attribute {
    St,
    Dx,
    Iq,
    Ht,
    Hp,
    Will,
    Per,
    Fp,
    BasicSpeed,
    BasicMove,
}

impl Attribute {
    pub const COUNT: usize = 10;

    pub const ALL: [Attribute; Attribute::COUNT] = [
        Attribute::St,
        Attribute::Dx,
        Attribute::Iq,
        Attribute::Ht,
        Attribute::Hp,
        Attribute::Will,
        Attribute::Per,
        Attribute::Fp,
        Attribute::BasicSpeed,
        Attribute::BasicMove,
    ];

    /// Sheet abbreviation, case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Attribute::ALL
            .iter()
            .copied()
            .find(|attr| attr.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Attribute::St => "ST",
            Attribute::Dx => "DX",
            Attribute::Iq => "IQ",
            Attribute::Ht => "HT",
            Attribute::Hp => "HP",
            Attribute::Will => "Will",
            Attribute::Per => "Per",
            Attribute::Fp => "FP",
            Attribute::BasicSpeed => "Basic Speed",
            Attribute::BasicMove => "Basic Move",
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A trait name that sets or adjusts an attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeTrait {
    pub attribute: Attribute,
    pub value: f64,
    /// `ST +2` rather than `ST 12`
    pub relative: bool,
}

static ATTRIBUTE_TRAIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(ST|DX|IQ|HT|HP|Will|Per|FP|Basic Speed|Basic Move) ([+-])?(\d+(?:\.\d+)?)$")
        .expect("attribute trait pattern is valid")
});

static LEVELED_TRAIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?) \+?(\d+)$").expect("leveled trait pattern is valid"));

/// Parse `ST 14`, `IQ +1`, `Basic Speed +0.5`
pub fn parse_attribute_trait(name: &str) -> Option<AttributeTrait> {
    let caps = ATTRIBUTE_TRAIT.captures(name)?;
    let attribute = Attribute::from_name(caps.get(1)?.as_str())?;
    let magnitude: f64 = caps.get(3)?.as_str().parse().ok()?;
    let (value, relative) = match caps.get(2).map(|m| m.as_str()) {
        Some("-") => (-magnitude, true),
        Some(_) => (magnitude, true),
        None => (magnitude, false),
    };
    Some(AttributeTrait {
        attribute,
        value,
        relative,
    })
}

/// Split a leveled trait into base name and level: `Magery 3` → (`Magery`, 3)
pub fn parse_leveled_trait(name: &str) -> Option<(&str, i32)> {
    if parse_attribute_trait(name).is_some() {
        return None;
    }
    let caps = LEVELED_TRAIT.captures(name)?;
    let base = caps.get(1)?.as_str();
    let level = caps.get(2)?.as_str().parse().ok()?;
    Some((base, level))
}

/// Render an attribute value without a trailing `.0`
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
