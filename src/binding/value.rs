// Tue Jan 15 2026 - Alex

use std::fmt;

/// A value as handed across the host runtime boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Bytes(Vec<u8>),
}

impl HostValue {
    pub fn string(s: impl Into<String>) -> Self {
        HostValue::String(s.into())
    }

    pub fn bytes(data: Vec<u8>) -> Self {
        HostValue::Bytes(data)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            HostValue::Undefined => "undefined",
            HostValue::Null => "null",
            HostValue::Boolean(_) => "boolean",
            HostValue::Number(_) => "number",
            HostValue::String(_) => "string",
            HostValue::Bytes(_) => "bytes",
        }
    }

    /// Raw bytes of the value after the host's to-string coercion.
    pub fn to_host_bytes(&self) -> Vec<u8> {
        match self {
            HostValue::Bytes(b) => b.clone(),
            other => other.to_string().into_bytes(),
        }
    }
}

impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Undefined => write!(f, "undefined"),
            HostValue::Null => write!(f, "null"),
            HostValue::Boolean(b) => write!(f, "{}", b),
            HostValue::Number(n) => format_number(f, *n),
            HostValue::String(s) => write!(f, "{}", s),
            HostValue::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
        }
    }
}

fn format_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        return write!(f, "NaN");
    }
    if n.is_infinite() {
        return write!(f, "{}", if n > 0.0 { "Infinity" } else { "-Infinity" });
    }
    // covers -0 as well
    if n == 0.0 {
        return write!(f, "0");
    }
    if n < 0.0 {
        write!(f, "-")?;
    }

    // shortest round-trip digits and the decimal exponent of the first one
    let sci = format!("{:e}", n.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exp: i32 = exp.parse().unwrap_or(0);
    let k = digits.len() as i32;
    let point = exp + 1;

    if k <= point && point <= 21 {
        write!(f, "{}{}", digits, "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        write!(f, "{}.{}", int, frac)
    } else if -6 < point && point <= 0 {
        write!(f, "0.{}{}", "0".repeat((-point) as usize), digits)
    } else {
        let (lead, rest) = digits.split_at(1);
        if !rest.is_empty() {
            write!(f, "{}.{}", lead, rest)?;
        } else {
            write!(f, "{}", lead)?;
        }
        write!(f, "e{}{}", if exp < 0 { "-" } else { "+" }, exp.abs())
    }
}

impl From<&str> for HostValue {
    fn from(s: &str) -> Self {
        HostValue::String(s.to_string())
    }
}

impl From<String> for HostValue {
    fn from(s: String) -> Self {
        HostValue::String(s)
    }
}

impl From<f64> for HostValue {
    fn from(n: f64) -> Self {
        HostValue::Number(n)
    }
}

impl From<bool> for HostValue {
    fn from(b: bool) -> Self {
        HostValue::Boolean(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_string_coercion() {
        assert_eq!(HostValue::Undefined.to_string(), "undefined");
        assert_eq!(HostValue::Null.to_string(), "null");
        assert_eq!(HostValue::Boolean(true).to_string(), "true");
        assert_eq!(HostValue::Number(42.0).to_string(), "42");
        assert_eq!(HostValue::Number(-0.0).to_string(), "0");
        assert_eq!(HostValue::Number(1.5).to_string(), "1.5");
        assert_eq!(HostValue::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(HostValue::Number(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(HostValue::from("_Z1fv").to_string(), "_Z1fv");
    }

    #[test]
    fn test_number_exponent_forms() {
        assert_eq!(HostValue::Number(1e-7).to_string(), "1e-7");
        assert_eq!(HostValue::Number(1e21).to_string(), "1e+21");
        assert_eq!(HostValue::Number(1.5e300).to_string(), "1.5e+300");
        assert_eq!(HostValue::Number(-2.5e-10).to_string(), "-2.5e-10");
        assert_eq!(HostValue::Number(1e20).to_string(), "100000000000000000000");
        assert_eq!(HostValue::Number(0.000001).to_string(), "0.000001");
        assert_eq!(HostValue::Number(123.5).to_string(), "123.5");
        assert_eq!(HostValue::Number(-42.0).to_string(), "-42");
        assert_eq!(HostValue::Number(0.1).to_string(), "0.1");
    }

    #[test]
    fn test_bytes_pass_through_untouched() {
        let raw = vec![b'_', b'Z', 0, 0xff];
        assert_eq!(HostValue::bytes(raw.clone()).to_host_bytes(), raw);
        assert_eq!(HostValue::Number(7.0).to_host_bytes(), b"7".to_vec());
    }
}
