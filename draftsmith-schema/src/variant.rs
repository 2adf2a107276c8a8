//! UI variant normalization.
//!
//! Every editor surface that accepts a "visual variant" option routes it
//! through [`UiVariant::normalize`] before the value can influence styling.
//! This is the one place external, potentially untrusted configuration
//! crosses into the rendering layer; unrecognized input falls back to
//! `Standard` and is only noted for diagnostics — never an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Closed set of visual styles an input control can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiVariant {
    #[default]
    Standard,
    Material,
    Pill,
    Borderless,
    Underlined,
}

impl UiVariant {
    pub const ALL: [Self; 5] = [
        Self::Standard,
        Self::Material,
        Self::Pill,
        Self::Borderless,
        Self::Underlined,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Material => "material",
            Self::Pill => "pill",
            Self::Borderless => "borderless",
            Self::Underlined => "underlined",
        }
    }

    /// Canonicalize an arbitrary configuration value into a variant.
    ///
    /// Total over all inputs: non-strings and unrecognized names fall back
    /// to `Standard`. Matching is case-insensitive; the canonical lower-case
    /// form is returned.
    pub fn normalize(input: &Value) -> Self {
        let Some(s) = input.as_str() else {
            if !input.is_null() {
                debug!(?input, "non-string ui variant, using standard");
            }
            return Self::Standard;
        };
        match s.to_ascii_lowercase().parse() {
            Ok(variant) => variant,
            Err(_) => {
                debug!(value = %s, "unrecognized ui variant, using standard");
                Self::Standard
            }
        }
    }

    /// The CSS class selecting this variant's styling.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Standard => "input--standard",
            Self::Material => "input--material",
            Self::Pill => "input--pill",
            Self::Borderless => "input--borderless",
            Self::Underlined => "input--underlined",
        }
    }
}

impl fmt::Display for UiVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse — exact lower-case names only. Use
/// [`UiVariant::normalize`] for untrusted input.
impl FromStr for UiVariant {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "material" => Ok(Self::Material),
            "pill" => Ok(Self::Pill),
            "borderless" => Ok(Self::Borderless),
            "underlined" => Ok(Self::Underlined),
            _ => Err(()),
        }
    }
}
