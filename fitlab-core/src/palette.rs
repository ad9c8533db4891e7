//! Named colours for figures.
//!
//! A small slice of the X11 colour table (the names the published figures
//! use) plus matplotlib's `brg` colour map.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

const NAMED: &[(&str, Rgb)] = &[
    ("black", Rgb(0, 0, 0)),
    ("blue4", Rgb(0, 0, 139)),
    ("crimson", Rgb(220, 20, 60)),
    ("darkorchid1", Rgb(191, 62, 255)),
    ("darkorchid2", Rgb(178, 58, 238)),
    ("darkorchid3", Rgb(154, 50, 205)),
    ("darkviolet", Rgb(148, 0, 211)),
    ("firebrick1", Rgb(255, 48, 48)),
    ("firebrick3", Rgb(205, 38, 38)),
    ("goldenrod1", Rgb(255, 193, 37)),
    ("grey50", Rgb(127, 127, 127)),
    ("indigo", Rgb(75, 0, 130)),
    ("maroon1", Rgb(255, 52, 179)),
    ("mediumblue", Rgb(0, 0, 205)),
    ("mediumorchid1", Rgb(224, 102, 255)),
    ("mediumpurple1", Rgb(171, 130, 255)),
    ("orange", Rgb(255, 165, 0)),
    ("orchid", Rgb(218, 112, 214)),
    ("red", Rgb(255, 0, 0)),
    ("royalblue2", Rgb(67, 110, 238)),
    ("violetred", Rgb(208, 32, 144)),
    ("violetred1", Rgb(255, 62, 150)),
];

/// Look up a colour by name (case-insensitive).
pub fn named(name: &str) -> Option<Rgb> {
    let name = name.to_ascii_lowercase();
    NAMED.iter().find(|(n, _)| *n == name).map(|(_, c)| *c)
}

/// All known colour names, sorted.
pub fn names() -> impl Iterator<Item = &'static str> {
    NAMED.iter().map(|(n, _)| *n)
}

/// matplotlib `brg`: blue at 0, red at 0.5, green at 1. Input is clamped.
pub fn brg(t: f64) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let (r, g, b) = if t <= 0.5 {
        (2.0 * t, 0.0, 1.0 - 2.0 * t)
    } else {
        (2.0 - 2.0 * t, 2.0 * t - 1.0, 0.0)
    };
    let to_u8 = |v: f64| (v * 255.0).round() as u8;
    Rgb(to_u8(r), to_u8(g), to_u8(b))
}
