//! Per-property role within a composite index
//!
//! A property is either ordered (with an optional direction) or
//! geospatial. Never both.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{IndexError, IndexResult};

/// Sort direction of an index column or query order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// Non-ordered index column mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Geospatial,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Geospatial => "geospatial",
        }
    }
}

/// Wire shape accepted when deserializing a `PropertySpec`.
#[derive(Deserialize)]
struct RawPropertySpec {
    name: String,
    #[serde(default)]
    direction: Option<Direction>,
    #[serde(default)]
    mode: Option<Mode>,
}

impl TryFrom<RawPropertySpec> for PropertySpec {
    type Error = IndexError;

    fn try_from(raw: RawPropertySpec) -> IndexResult<Self> {
        PropertySpec::try_new(raw.name, raw.direction, raw.mode)
    }
}

/// One property's role in an index: name plus direction or mode.
///
/// Equality, ordering and hashing are structural over
/// `(name, direction, mode)`; ordering sorts by name first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPropertySpec")]
pub struct PropertySpec {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    direction: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<Mode>,
}

impl PropertySpec {
    /// A property with neither direction nor mode
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: None,
            mode: None,
        }
    }

    pub fn with_direction(name: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: name.into(),
            direction: Some(direction),
            mode: None,
        }
    }

    pub fn asc(name: impl Into<String>) -> Self {
        Self::with_direction(name, Direction::Asc)
    }

    pub fn desc(name: impl Into<String>) -> Self {
        Self::with_direction(name, Direction::Desc)
    }

    pub fn geospatial(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: None,
            mode: Some(Mode::Geospatial),
        }
    }

    /// Builds a spec from loose parts, rejecting direction and mode together.
    pub fn try_new(
        name: impl Into<String>,
        direction: Option<Direction>,
        mode: Option<Mode>,
    ) -> IndexResult<Self> {
        let name = name.into();
        if direction.is_some() && mode.is_some() {
            return Err(IndexError::direction_and_mode(name));
        }
        Ok(Self {
            name,
            direction,
            mode,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn is_geospatial(&self) -> bool {
        self.mode == Some(Mode::Geospatial)
    }

    /// Fills in an ascending direction for plain ordered properties.
    pub fn with_default_direction(self) -> Self {
        if self.direction.is_none() && self.mode.is_none() {
            Self {
                direction: Some(Direction::Asc),
                ..self
            }
        } else {
            self
        }
    }

    /// Returns true if this (index) property can stand in for `other`
    /// (a required property).
    ///
    /// Names must match, neither side may carry a mode, and `other` either
    /// leaves the direction open or asks for exactly this one.
    pub fn satisfies(&self, other: &PropertySpec) -> bool {
        self.name == other.name
            && self.mode.is_none()
            && other.mode.is_none()
            && other.direction.map_or(true, |d| self.direction == Some(d))
    }
}

impl fmt::Display for PropertySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(direction) = self.direction {
            write!(f, " {}", direction.as_str())?;
        }
        if let Some(mode) = self.mode {
            write!(f, " {}", mode.as_str())?;
        }
        Ok(())
    }
}
