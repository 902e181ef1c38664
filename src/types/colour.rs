//! Annotation colours.
//!
//! Metadata images are painted with saturated primary and secondary
//! colours. A channel counts as "high" when it exceeds half of its range,
//! so anti-aliased or slightly off-tone strokes still classify.

use std::fmt;

/// An RGBA colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Channel values above this are considered set.
const HALF_INTENSITY: u8 = 0x7f;

impl Colour {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully transparent colour.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);

    /// Read a colour from RGBA pixel bytes.
    pub fn from_rgba_bytes(bytes: &[u8]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// True when the alpha channel is nonzero.
    pub fn is_opaque(self) -> bool {
        self.a != 0
    }

    /// Annotation marker encoded by this colour, ignoring alpha.
    ///
    /// Black and white carry no annotation.
    pub fn marker(self) -> Option<Marker> {
        let r = self.r > HALF_INTENSITY;
        let g = self.g > HALF_INTENSITY;
        let b = self.b > HALF_INTENSITY;
        match (r, g, b) {
            (true, false, false) => Some(Marker::Red),
            (false, true, false) => Some(Marker::Green),
            (false, false, true) => Some(Marker::Blue),
            (true, true, false) => Some(Marker::Yellow),
            (false, true, true) => Some(Marker::Cyan),
            (true, false, true) => Some(Marker::Magenta),
            (false, false, false) | (true, true, true) => None,
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Annotation colour classes.
///
/// | colour  | meaning |
/// |---------|---------|
/// | red     | breakable (ghost collision when doubled) |
/// | green   | collectible (hidden collectible when doubled) |
/// | blue    | starting position or teleport station |
/// | yellow  | throwable spawn |
/// | cyan    | chain reaction trigger (terminal when doubled) |
/// | magenta | chain reaction effect (terminal when doubled) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_markers() {
        assert_eq!(Colour::RED.marker(), Some(Marker::Red));
        assert_eq!(Colour::GREEN.marker(), Some(Marker::Green));
        assert_eq!(Colour::BLUE.marker(), Some(Marker::Blue));
    }

    #[test]
    fn test_secondary_markers() {
        assert_eq!(Colour::YELLOW.marker(), Some(Marker::Yellow));
        assert_eq!(Colour::CYAN.marker(), Some(Marker::Cyan));
        assert_eq!(Colour::MAGENTA.marker(), Some(Marker::Magenta));
    }

    #[test]
    fn test_black_and_white_carry_nothing() {
        assert_eq!(Colour::BLACK.marker(), None);
        assert_eq!(Colour::WHITE.marker(), None);
        assert_eq!(Colour::TRANSPARENT.marker(), None);
    }

    #[test]
    fn test_half_intensity_threshold() {
        assert_eq!(Colour::rgb(0x80, 0x7f, 0x00).marker(), Some(Marker::Red));
        assert_eq!(Colour::rgb(0x7f, 0x00, 0x00).marker(), None);
    }

    #[test]
    fn test_marker_ignores_alpha() {
        assert_eq!(Colour::new(255, 0, 0, 0).marker(), Some(Marker::Red));
        assert!(!Colour::new(255, 0, 0, 0).is_opaque());
    }

    #[test]
    fn test_display() {
        assert_eq!(Colour::rgb(255, 0, 128).to_string(), "#FF0080");
        assert_eq!(Colour::new(0, 0, 0, 0).to_string(), "#00000000");
    }
}
