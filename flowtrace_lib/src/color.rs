/** ------------------------------------------------------------
 * Colors used to tell flows apart in timelines
 * ------------------------------------------------------------- */
use crate::errors::FlowtraceError;
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

#[rustfmt::skip]
const NAMED_COLORS: &[(&str, Rgb)] = &[
    ("red",          Rgb(255,   0,   0)),
    ("skyblue",      Rgb(135, 206, 235)),
    ("forestgreen",  Rgb( 34, 139,  34)),
    ("lightsalmon",  Rgb(255, 160, 122)),
    ("dodgerblue",   Rgb( 30, 144, 255)),
    ("darkseagreen", Rgb(143, 188, 143)),
    ("orchid",       Rgb(218, 112, 214)),
    ("white",        Rgb(255, 255, 255)),
    ("black",        Rgb(  0,   0,   0)),
];

impl Rgb {
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const SKYBLUE: Rgb = Rgb(135, 206, 235);
    pub const FORESTGREEN: Rgb = Rgb(34, 139, 34);
    pub const LIGHTSALMON: Rgb = Rgb(255, 160, 122);
    pub const DODGERBLUE: Rgb = Rgb(30, 144, 255);
    pub const DARKSEAGREEN: Rgb = Rgb(143, 188, 143);
    pub const ORCHID: Rgb = Rgb(218, 112, 214);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    pub fn from_name(name: &str) -> Option<Rgb> {
        NAMED_COLORS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|&(_, rgb)| rgb)
    }
}

impl From<Rgb> for RGBColor {
    fn from(Rgb(r, g, b): Rgb) -> Self {
        RGBColor(r, g, b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((name, _)) = NAMED_COLORS.iter().find(|(_, rgb)| rgb == self) {
            return f.write_str(name);
        }
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl FromStr for Rgb {
    type Err = FlowtraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FlowtraceError::InvalidColor(s.to_string());

        let Some(hex) = s.strip_prefix('#') else {
            return Rgb::from_name(s).ok_or_else(invalid);
        };
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };

        Ok(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = FlowtraceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_hex() {
        assert_eq!("skyblue".parse::<Rgb>().unwrap(), Rgb::SKYBLUE);
        assert_eq!("Orchid".parse::<Rgb>().unwrap(), Rgb::ORCHID);
        assert_eq!("#1e90ff".parse::<Rgb>().unwrap(), Rgb::DODGERBLUE);
        assert_eq!("#0a0B0c".parse::<Rgb>().unwrap(), Rgb(10, 11, 12));
    }

    #[test]
    fn rejects_unknown_colors() {
        for bad in ["mauve", "#12345", "#gg0000", "#1234567", ""] {
            assert!(bad.parse::<Rgb>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn display_prefers_names() {
        assert_eq!(Rgb::FORESTGREEN.to_string(), "forestgreen");
        assert_eq!(Rgb(1, 2, 3).to_string(), "#010203");
    }
}
