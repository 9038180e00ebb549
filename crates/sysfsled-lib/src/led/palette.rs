//! LED colour palette exposed on the bus.
//!
//! The kernel name carries a free-form colour word; only the colours of the
//! bus palette are published, everything else stays [`Palette::Unknown`].

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Palette {
    #[default]
    Unknown,
    Red,
    Green,
    Blue,
    Yellow,
    Amber,
    White,
}

/// Colour name with no palette entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidColor(pub String);

impl fmt::Display for InvalidColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid color: {:?} is not in the palette", self.0)
    }
}

impl std::error::Error for InvalidColor {}

impl Palette {
    /// Look up a colour name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Result<Self, InvalidColor> {
        match name.trim().to_lowercase().as_str() {
            "red" => Ok(Palette::Red),
            "green" => Ok(Palette::Green),
            "blue" => Ok(Palette::Blue),
            "yellow" => Ok(Palette::Yellow),
            "amber" => Ok(Palette::Amber),
            "white" => Ok(Palette::White),
            _ => Err(InvalidColor(name.into())),
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_known_colors() {
        assert_eq!(Palette::from_name("red").unwrap(), Palette::Red);
        assert_eq!(Palette::from_name("green").unwrap(), Palette::Green);
        assert_eq!(Palette::from_name("blue").unwrap(), Palette::Blue);
        assert_eq!(Palette::from_name("yellow").unwrap(), Palette::Yellow);
        assert_eq!(Palette::from_name("amber").unwrap(), Palette::Amber);
        assert_eq!(Palette::from_name("white").unwrap(), Palette::White);
    }

    #[test]
    fn from_name_case_insensitive() {
        assert_eq!(Palette::from_name("Blue").unwrap(), Palette::Blue);
        assert_eq!(Palette::from_name("  AMBER ").unwrap(), Palette::Amber);
    }

    #[test]
    fn from_name_unknown() {
        let err = Palette::from_name("purple").unwrap_err();
        assert_eq!(err, InvalidColor("purple".into()));
        assert!(err.to_string().contains("purple"));
    }

    #[test]
    fn from_name_empty() {
        assert!(Palette::from_name("").is_err());
    }

    #[test]
    fn unknown_is_default() {
        assert_eq!(Palette::default(), Palette::Unknown);
    }

    #[test]
    fn display_matches_variant() {
        assert_eq!(Palette::Amber.to_string(), "Amber");
    }
}
