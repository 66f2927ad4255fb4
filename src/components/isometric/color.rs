use std::fmt;

use log::warn;

use super::depth::Face;

/// Neutral shade used when a node color cannot be parsed.
pub const FALLBACK: Rgb = Rgb::new(0x9e, 0x9e, 0x9e);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColorError {
	MissingHash,
	BadLength(usize),
	BadDigit(char),
}

impl fmt::Display for ColorError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ColorError::MissingHash => write!(f, "hex color must start with '#'"),
			ColorError::BadLength(n) => write!(f, "hex color has {n} digits, expected 3 or 6"),
			ColorError::BadDigit(c) => write!(f, "invalid hex digit {c:?}"),
		}
	}
}

impl std::error::Error for ColorError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Rgb {
	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	/// Parses `#rgb` or `#rrggbb`.
	pub fn parse_hex(input: &str) -> Result<Self, ColorError> {
		let digits = input.trim().strip_prefix('#').ok_or(ColorError::MissingHash)?;
		let mut values = Vec::with_capacity(6);
		for c in digits.chars() {
			values.push(c.to_digit(16).ok_or(ColorError::BadDigit(c))? as u8);
		}
		match values.as_slice() {
			[r, g, b] => Ok(Self::new(r * 17, g * 17, b * 17)),
			[r1, r0, g1, g0, b1, b0] => Ok(Self::new(r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0)),
			_ => Err(ColorError::BadLength(values.len())),
		}
	}

	/// Parses, logging and falling back to [`FALLBACK`] on malformed input.
	pub fn parse_or_fallback(input: &str) -> Self {
		Self::parse_hex(input).unwrap_or_else(|err| {
			warn!("color {input:?}: {err}, using fallback");
			FALLBACK
		})
	}

	/// Moves each channel toward 255 by `amount` of its headroom.
	pub fn lighten(self, amount: f64) -> Self {
		let amount = unit(amount);
		let ch = |c: u8| clamp_channel(c as f64 + (255.0 - c as f64) * amount);
		Self::new(ch(self.r), ch(self.g), ch(self.b))
	}

	/// Scales each channel toward 0 by `amount`.
	pub fn darken(self, amount: f64) -> Self {
		let amount = unit(amount);
		let ch = |c: u8| clamp_channel(c as f64 * (1.0 - amount));
		Self::new(ch(self.r), ch(self.g), ch(self.b))
	}

	/// Directional lighting: lit top, progressively darker walls.
	pub fn shade(self, face: Face) -> Self {
		match face {
			Face::Top => self.lighten(0.3),
			Face::Front => self,
			Face::Right => self.darken(0.2),
			Face::Left => self.darken(0.3),
			Face::Back => self.darken(0.4),
			Face::Bottom => self.darken(0.5),
		}
	}

	pub fn to_css(self) -> String {
		format!("rgb({}, {}, {})", self.r, self.g, self.b)
	}

	pub fn to_css_alpha(self, alpha: f64) -> String {
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, unit(alpha))
	}
}

fn unit(value: f64) -> f64 {
	if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

fn clamp_channel(value: f64) -> u8 {
	value.floor().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_long_and_short_hex() {
		assert_eq!(Rgb::parse_hex("#4285f4"), Ok(Rgb::new(0x42, 0x85, 0xf4)));
		assert_eq!(Rgb::parse_hex("#FFF"), Ok(Rgb::new(255, 255, 255)));
		assert_eq!(Rgb::parse_hex(" #000000 "), Ok(Rgb::new(0, 0, 0)));
	}

	#[test]
	fn malformed_colors_fall_back() {
		assert_eq!(Rgb::parse_hex("4285f4"), Err(ColorError::MissingHash));
		assert_eq!(Rgb::parse_hex("#12345"), Err(ColorError::BadLength(5)));
		assert_eq!(Rgb::parse_hex("#zz0000"), Err(ColorError::BadDigit('z')));
		assert_eq!(Rgb::parse_or_fallback("not a color"), FALLBACK);
	}

	#[test]
	fn lighten_and_darken_stay_in_range() {
		let c = Rgb::new(200, 100, 0);
		assert_eq!(c.lighten(0.5), Rgb::new(227, 177, 127));
		assert_eq!(c.darken(0.5), Rgb::new(100, 50, 0));
		assert_eq!(c.lighten(7.0), Rgb::new(255, 255, 255));
		assert_eq!(c.darken(-3.0), c);
		assert_eq!(Rgb::new(255, 255, 255).darken(1.0), Rgb::new(0, 0, 0));
	}

	#[test]
	fn walls_darken_front_to_back() {
		let base = Rgb::new(120, 180, 240);
		let luma = |c: Rgb| c.r as u32 + c.g as u32 + c.b as u32;
		let order = [Face::Top, Face::Front, Face::Right, Face::Left, Face::Back, Face::Bottom];
		for pair in order.windows(2) {
			assert!(luma(base.shade(pair[0])) > luma(base.shade(pair[1])));
		}
	}
}
