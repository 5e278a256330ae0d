//! Deterministic cover gradients for entries without a cover image. The same
//! identifier and [`Palette`] always produce the same [`GradientDescriptor`],
//! on every platform and across runs.

use serde::Deserialize;
use std::convert::TryFrom;
use std::fmt;

/// The default violet palette. The darker shades keep white title text
/// legible on top of the gradient.
pub const VIOLET: [&str; 5] = [
    "#7c3aed", // violet-600
    "#6d28d9", // violet-700
    "#5b21b6", // violet-800
    "#4c1d95", // violet-900
    "#2e1065", // violet-950
];

const SEED: u32 = 5381;

/// Number of compass directions an angle can take, in 45 degree steps.
const DIRECTIONS: u64 = 8;

/// A two-color linear gradient. The descriptor is agnostic to any particular
/// gradient syntax; its [`fmt::Display`] implementation produces the CSS
/// `linear-gradient(...)` form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GradientDescriptor {
    pub color_a: String,
    pub color_b: String,

    /// One of 0, 45, 90, ..., 315.
    pub angle_degrees: u16,
}

impl fmt::Display for GradientDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "linear-gradient({}deg, {}, {})",
            self.angle_degrees, self.color_a, self.color_b
        )
    }
}

/// Derives the gradient for `id` from the [`VIOLET`] palette.
pub fn derive(id: &str) -> GradientDescriptor {
    derive_from(&VIOLET, id)
}

/// djb2 over the Unicode scalar values of `s`, wrapped to 32 bits. The result
/// is the magnitude of the hash read as a signed 32-bit integer, so it is at
/// most 2^31.
pub fn hash(s: &str) -> u32 {
    let h = s.chars().fold(SEED, |h, c| {
        (h << 5).wrapping_add(h).wrapping_add(c as u32)
    });
    (h as i32).unsigned_abs()
}

// `colors` must hold at least two distinct entries. Callers go through
// `VIOLET` or a validated `Palette`.
fn derive_from<S: AsRef<str>>(colors: &[S], id: &str) -> GradientDescriptor {
    let h = u64::from(hash(id));
    let n = colors.len() as u64;

    let color_a = colors[(h % n) as usize].as_ref();
    let mut color_b = colors[((h / n) % n) as usize].as_ref();
    if color_a == color_b {
        color_b = colors[((h + 1) % n) as usize].as_ref();
    }

    GradientDescriptor {
        color_a: color_a.to_owned(),
        color_b: color_b.to_owned(),
        angle_degrees: ((h / (n * n)) % DIRECTIONS * 45) as u16,
    }
}

/// An ordered set of colors to derive gradients from. A palette has at least
/// two entries and no duplicates, which is what guarantees that every derived
/// gradient has two distinct colors.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct Palette(Vec<String>);

impl Palette {
    /// Validates and constructs a palette. Order is significant: it decides
    /// which color each hash index selects.
    pub fn new(colors: Vec<String>) -> Result<Palette, PaletteError> {
        if colors.len() < 2 {
            return Err(PaletteError::TooFewColors(colors.len()));
        }
        for (i, color) in colors.iter().enumerate() {
            if colors[..i].contains(color) {
                return Err(PaletteError::DuplicateColor(color.clone()));
            }
        }
        Ok(Palette(colors))
    }

    pub fn colors(&self) -> &[String] {
        &self.0
    }

    /// Derives the gradient for `id` from this palette.
    pub fn derive(&self, id: &str) -> GradientDescriptor {
        derive_from(&self.0, id)
    }
}

impl Default for Palette {
    /// Returns the [`VIOLET`] palette.
    fn default() -> Self {
        Palette(VIOLET.iter().map(|c| (*c).to_owned()).collect())
    }
}

impl TryFrom<Vec<String>> for Palette {
    type Error = PaletteError;

    fn try_from(colors: Vec<String>) -> Result<Palette, PaletteError> {
        Palette::new(colors)
    }
}

/// Returned when a [`Palette`] can't guarantee two distinct colors.
#[derive(Debug, PartialEq, Eq)]
pub enum PaletteError {
    /// The palette has fewer than two colors.
    TooFewColors(usize),

    /// The palette lists the same color more than once.
    DuplicateColor(String),
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PaletteError::TooFewColors(n) => {
                write!(f, "palette needs at least 2 colors, found {}", n)
            }
            PaletteError::DuplicateColor(color) => {
                write!(f, "palette lists `{}` more than once", color)
            }
        }
    }
}

impl std::error::Error for PaletteError {}
