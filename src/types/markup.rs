//! Markup records attached to declarations, members and enum constants.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Editor-facing component groups: group name to component names.
pub type ComponentGroups = BTreeMap<String, Vec<String>>;

/// A numeric markup value (`CT_MIN:` and friends).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Parse a number as written in markup.
    ///
    /// Accepts an optional sign, then `0x` hexadecimal, a decimal float
    /// (anything with `.` or an exponent) or a decimal integer.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };

        if let Some(hex) = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
        {
            let value = i64::from_str_radix(hex, 16).ok()?;
            return Some(Number::Int(if negative { -value } else { value }));
        }

        if digits.contains(&['.', 'e', 'E'][..]) {
            let value: f64 = text.parse().ok()?;
            return value.is_finite().then_some(Number::Float(value));
        }

        text.parse().ok().map(Number::Int)
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{}", v),
            Number::Float(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<Number> for serde_json::Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(v) => v.into(),
            Number::Float(v) => v.into(),
        }
    }
}

/// Boolean markup flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Hidden,
    EditorReadOnly,
    NoLoad,
    EmbedBlob,
    CopyBlob,
}

/// Free-text markup values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Label,
    Documentation,
    Units,
    ComponentName,
    Enum,
    Bits,
    LengthVar,
}

/// Numeric markup values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberField {
    Min,
    Max,
    SoftMin,
    SoftMax,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Markup collected from `CT_*` keys for one declaration, member or constant.
///
/// Serialized with the `CT_*` key names so the JSON dump matches what the
/// editor tooling reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markup {
    #[serde(rename = "CT_HIDDEN", skip_serializing_if = "is_false")]
    pub hidden: bool,
    #[serde(rename = "CT_EDITOR_READ_ONLY", skip_serializing_if = "is_false")]
    pub editor_read_only: bool,
    #[serde(rename = "CT_NO_LOAD", skip_serializing_if = "is_false")]
    pub no_load: bool,
    #[serde(rename = "CT_EMBED_BLOB", skip_serializing_if = "is_false")]
    pub embed_blob: bool,
    #[serde(rename = "CT_COPY_BLOB", skip_serializing_if = "is_false")]
    pub copy_blob: bool,

    #[serde(rename = "CT_LABEL", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "CT_DOCUMENTATION", skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(rename = "CT_UNITS", skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(rename = "CT_COMPONENT_NAME", skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    /// Enum whose constants are the exclusive values of an integer typedef.
    #[serde(rename = "CT_ENUM", skip_serializing_if = "Option::is_none")]
    pub enum_type: Option<String>,
    /// Enum whose constants are the bits of an integer typedef.
    #[serde(rename = "CT_BITS", skip_serializing_if = "Option::is_none")]
    pub bits: Option<String>,
    /// Member holding the element count of a pointer or fixed buffer.
    #[serde(rename = "CT_LENGTH_VAR", skip_serializing_if = "Option::is_none")]
    pub length_var: Option<String>,

    #[serde(rename = "CT_MIN", skip_serializing_if = "Option::is_none")]
    pub min: Option<Number>,
    #[serde(rename = "CT_MAX", skip_serializing_if = "Option::is_none")]
    pub max: Option<Number>,
    #[serde(rename = "CT_SOFT_MIN", skip_serializing_if = "Option::is_none")]
    pub soft_min: Option<Number>,
    #[serde(rename = "CT_SOFT_MAX", skip_serializing_if = "Option::is_none")]
    pub soft_max: Option<Number>,

    #[serde(rename = "CT_DEFAULT", skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(rename = "CT_OLD_NAMES", skip_serializing_if = "Vec::is_empty")]
    pub old_names: Vec<String>,

    /// Unrecognised `CT_*` keys. `CT_X: value` stores the text, a bare
    /// `CT_X` stores `true`.
    #[serde(rename = "CT_EXTENSIONS", skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::Hidden => self.hidden,
            Flag::EditorReadOnly => self.editor_read_only,
            Flag::NoLoad => self.no_load,
            Flag::EmbedBlob => self.embed_blob,
            Flag::CopyBlob => self.copy_blob,
        }
    }

    pub fn set_flag(&mut self, flag: Flag) {
        let slot = match flag {
            Flag::Hidden => &mut self.hidden,
            Flag::EditorReadOnly => &mut self.editor_read_only,
            Flag::NoLoad => &mut self.no_load,
            Flag::EmbedBlob => &mut self.embed_blob,
            Flag::CopyBlob => &mut self.copy_blob,
        };
        *slot = true;
    }

    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) {
        let slot = match field {
            TextField::Label => &mut self.label,
            TextField::Documentation => &mut self.documentation,
            TextField::Units => &mut self.units,
            TextField::ComponentName => &mut self.component_name,
            TextField::Enum => &mut self.enum_type,
            TextField::Bits => &mut self.bits,
            TextField::LengthVar => &mut self.length_var,
        };
        *slot = Some(value.into());
    }

    pub fn set_number(&mut self, field: NumberField, value: Number) {
        let slot = match field {
            NumberField::Min => &mut self.min,
            NumberField::Max => &mut self.max,
            NumberField::SoftMin => &mut self.soft_min,
            NumberField::SoftMax => &mut self.soft_max,
        };
        *slot = Some(value);
    }
}
