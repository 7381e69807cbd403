use std::fmt::Display;

use enum_as_inner::EnumAsInner;

/// A single datum value, either bound as a statement parameter or read back
/// from a result row.
#[derive(Debug, Clone, PartialEq, EnumAsInner)]
pub enum Datum {
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),

    Null,
}

impl Display for Datum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Datum::Int(v) => write!(f, "{}", v),
            Datum::Float(v) => write!(f, "{}", v),
            Datum::String(v) => write!(f, "{}", v),
            Datum::Boolean(v) => write!(f, "{}", if *v { "TRUE" } else { "FALSE" }),
            Datum::Null => write!(f, "NULL"),
        }
    }
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Datum::String(value.to_string())
    }
}

impl From<String> for Datum {
    fn from(value: String) -> Self {
        Datum::String(value)
    }
}

impl From<i64> for Datum {
    fn from(value: i64) -> Self {
        Datum::Int(value)
    }
}

impl Datum {
    /// Integer view of the value. DB2 returns `DECIMAL` identity values, which
    /// drivers commonly hand back as strings.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Datum::Int(v) => Some(*v),
            Datum::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            Datum::String(v) => {
                let v = v.trim();
                v.parse()
                    .ok()
                    .or_else(|| v.parse::<f64>().ok().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Datum;

    #[test]
    fn test_to_i64() {
        assert_eq!(Datum::Int(7).to_i64(), Some(7));
        assert_eq!(Datum::String(" 42 ".to_string()).to_i64(), Some(42));
        assert_eq!(Datum::String("42.0".to_string()).to_i64(), Some(42));
        assert_eq!(Datum::Float(1.5).to_i64(), None);
        assert_eq!(Datum::Null.to_i64(), None);
    }
}
