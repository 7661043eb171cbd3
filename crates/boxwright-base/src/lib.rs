use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Guid(Uuid);

impl Guid {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for Guid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Guid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Length unit used by a configuration. The kernel always works in millimeters.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    #[default]
    Millimeter,
    Centimeter,
    Meter,
}

impl LengthUnit {
    /// Fixed factor converting a length in this unit to millimeters.
    pub const fn millimeters_per_unit(self) -> f64 {
        match self {
            Self::Millimeter => 1.0,
            Self::Centimeter => 10.0,
            Self::Meter => 1000.0,
        }
    }

    pub fn to_millimeters(self, value: f64) -> f64 {
        value * self.millimeters_per_unit()
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Millimeter => "mm",
            Self::Centimeter => "cm",
            Self::Meter => "m",
        }
    }
}

impl std::fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for LengthUnit {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "mm" | "millimeter" | "millimeters" => Ok(Self::Millimeter),
            "cm" | "centimeter" | "centimeters" => Ok(Self::Centimeter),
            "m" | "meter" | "meters" => Ok(Self::Meter),
            other => Err(Error::InvalidParameter(format!(
                "unknown length unit `{other}` (expected mm, cm or m)"
            ))),
        }
    }
}

/// Numeric tolerances, all in millimeters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    /// Slack for placement and coverage comparisons.
    pub linear: f64,
    /// Tolerance handed to the boolean operations.
    pub boolean: f64,
    /// Maximum chord deviation when tessellating for mesh export.
    pub tessellation: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            linear: 1.0e-6,
            boolean: 0.05,
            tessellation: 0.1,
        }
    }
}

impl Tolerance {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("linear", self.linear),
            ("boolean", self.boolean),
            ("tessellation", self.tessellation),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidParameter(format!(
                    "{name} tolerance must be > 0, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centimeters_scale_by_ten() {
        assert_eq!(LengthUnit::Centimeter.to_millimeters(10.5), 105.0);
        assert_eq!(LengthUnit::Millimeter.to_millimeters(2.0), 2.0);
        assert_eq!(LengthUnit::Meter.to_millimeters(0.25), 250.0);
    }

    #[test]
    fn parses_unit_names() -> Result<()> {
        assert_eq!("cm".parse::<LengthUnit>()?, LengthUnit::Centimeter);
        assert_eq!(" Millimeters ".parse::<LengthUnit>()?, LengthUnit::Millimeter);
        assert!("inch".parse::<LengthUnit>().is_err());
        Ok(())
    }

    #[test]
    fn default_tolerance_is_valid() -> Result<()> {
        Tolerance::default().validate()
    }

    #[test]
    fn zero_tolerance_is_rejected() {
        let tolerance = Tolerance {
            boolean: 0.0,
            ..Tolerance::default()
        };
        assert!(tolerance.validate().is_err());
    }
}
