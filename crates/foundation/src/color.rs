/// Linear RGBA color with components in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    MissingHash(String),
    BadLength(String),
    BadDigit(String),
}

impl std::fmt::Display for ColorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorError::MissingHash(s) => write!(f, "color {s:?} must start with '#'"),
            ColorError::BadLength(s) => {
                write!(f, "color {s:?} must be #rrggbb or #rrggbbaa")
            }
            ColorError::BadDigit(s) => write!(f, "color {s:?} has a non-hex digit"),
        }
    }
}

impl std::error::Error for ColorError {}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a as f32,
            ..self
        }
    }

    /// Parses `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> Result<Self, ColorError> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(s.to_string()))?;
        if digits.len() != 6 && digits.len() != 8 {
            return Err(ColorError::BadLength(s.to_string()));
        }
        let channel = |i: usize| -> Result<f32, ColorError> {
            let byte = digits
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| ColorError::BadDigit(s.to_string()))?;
            Ok(byte as f32 / 255.0)
        };
        let a = if digits.len() == 8 { channel(6)? } else { 1.0 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// CSS `rgba(r,g,b,a)` string with clamped channels.
    pub fn css(self) -> String {
        let r = (self.r.clamp(0.0, 1.0) * 255.0).round() as u32;
        let g = (self.g.clamp(0.0, 1.0) * 255.0).round() as u32;
        let b = (self.b.clamp(0.0, 1.0) * 255.0).round() as u32;
        let a = self.a.clamp(0.0, 1.0);
        format!("rgba({r},{g},{b},{a})")
    }
}

#[cfg(test)]
mod tests {
    use super::{ColorError, Rgba};

    #[test]
    fn parses_hex() {
        let c = Rgba::from_hex("#00ff80").unwrap();
        assert_eq!(c.css(), "rgba(0,255,128,1)");
        let c = Rgba::from_hex("#ffffff00").unwrap();
        assert_eq!(c.a, 0.0);
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(matches!(Rgba::from_hex("00ff80"), Err(ColorError::MissingHash(_))));
        assert!(matches!(Rgba::from_hex("#0f8"), Err(ColorError::BadLength(_))));
        assert!(matches!(Rgba::from_hex("#00gg80"), Err(ColorError::BadDigit(_))));
    }

    #[test]
    fn css_clamps_alpha() {
        let c = Rgba::new(1.0, 0.0, 0.0, 1.0).with_alpha(1.7);
        assert_eq!(c.css(), "rgba(255,0,0,1)");
    }
}
