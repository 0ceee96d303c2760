use std::fmt;

use num_bigint::BigUint;

/// Label shown in place of a metric that could not be computed.
pub const ERROR_LABEL: &str = "Error";

/// Number of fraction digits in every rendered label.
pub const LABEL_PLACES: u8 = 2;

/// An unsigned on-chain quantity in base units together with its exponent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount {
    raw: BigUint,
    decimals: u8,
}

impl Amount {
    pub fn new(raw: BigUint, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    pub fn zero(decimals: u8) -> Self {
        Self::new(BigUint::default(), decimals)
    }

    /// Parse a base-unit amount written as a decimal integer string.
    pub fn parse(raw: &str, decimals: u8) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        BigUint::parse_bytes(raw.as_bytes(), 10).map(|raw| Self::new(raw, decimals))
    }

    /// Parse a `0x`-prefixed hex quantity as returned by JSON-RPC nodes.
    pub fn from_hex(quantity: &str, decimals: u8) -> Option<Self> {
        let digits = quantity
            .strip_prefix("0x")
            .or_else(|| quantity.strip_prefix("0X"))?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        BigUint::parse_bytes(digits.as_bytes(), 16).map(|raw| Self::new(raw, decimals))
    }

    pub fn raw(&self) -> &BigUint {
        &self.raw
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Re-express this amount with a larger exponent. Never loses precision;
    /// asking for fewer decimals than the current exponent returns a clone.
    pub fn rescale(&self, decimals: u8) -> Self {
        if decimals <= self.decimals {
            return self.clone();
        }
        let factor = pow10(u32::from(decimals - self.decimals));
        Self::new(&self.raw * factor, decimals)
    }

    pub fn add(&self, other: &Amount) -> Self {
        let decimals = self.decimals.max(other.decimals);
        let (a, b) = (self.rescale(decimals), other.rescale(decimals));
        Self::new(a.raw + b.raw, decimals)
    }

    /// `self - other`, clamped at zero.
    pub fn saturating_sub(&self, other: &Amount) -> Self {
        let decimals = self.decimals.max(other.decimals);
        let (a, b) = (self.rescale(decimals), other.rescale(decimals));
        if b.raw >= a.raw {
            return Self::zero(decimals);
        }
        Self::new(a.raw - b.raw, decimals)
    }

    /// Render with exactly `places` fraction digits, rounding half away from zero.
    pub fn to_fixed(&self, places: u8) -> String {
        let places_u32 = u32::from(places);
        let decimals = u32::from(self.decimals);

        let scaled = if decimals <= places_u32 {
            &self.raw * pow10(places_u32 - decimals)
        } else {
            let divisor = pow10(decimals - places_u32);
            let quotient = &self.raw / &divisor;
            let remainder = &self.raw % &divisor;
            if remainder * 2u32 >= divisor {
                quotient + 1u32
            } else {
                quotient
            }
        };

        if places == 0 {
            return scaled.to_string();
        }

        let unit = pow10(places_u32);
        let integer_part = &scaled / &unit;
        let fraction = (&scaled % &unit).to_string();
        format!(
            "{integer_part}.{fraction:0>width$}",
            width = usize::from(places)
        )
    }

    /// Render as a graph label.
    pub fn to_label(&self) -> String {
        self.to_fixed(LABEL_PLACES)
    }
}

/// Full-precision rendering with trailing fraction zeros trimmed.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.raw.to_string();
        let decimals = usize::from(self.decimals);

        if decimals == 0 {
            return f.write_str(&s);
        }

        let padded = if s.len() <= decimals {
            format!("{}{s}", "0".repeat(decimals - s.len() + 1))
        } else {
            s
        };
        let (integer_part, decimal_part) = padded.split_at(padded.len() - decimals);
        let trimmed = decimal_part.trim_end_matches('0');
        if trimmed.is_empty() {
            f.write_str(integer_part)
        } else {
            write!(f, "{integer_part}.{trimmed}")
        }
    }
}

/// 2^52: from here up every `f64` is a whole number.
const INTEGRAL_F64: f64 = 4_503_599_627_370_496.0;

fn pow10(exponent: u32) -> BigUint {
    BigUint::from(10u32).pow(exponent)
}

/// Render a floating-point metric as a label.
///
/// `None` and non-finite inputs yield [`ERROR_LABEL`]; everything else is
/// rounded half away from zero to two fraction digits.
pub fn format_number(amount: Option<f64>) -> String {
    match amount {
        Some(value) if value.is_finite() => {
            let rounded = if value.abs() >= INTEGRAL_F64 {
                value
            } else {
                (value * 100.0).round() / 100.0
            };
            // avoid "-0.00"
            let rounded = if rounded == 0.0 { 0.0 } else { rounded };
            format!("{rounded:.2}")
        }
        _ => ERROR_LABEL.to_string(),
    }
}
