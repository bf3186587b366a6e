//! Declarative parameter schemas for scorers.
//!
//! A [`Params`] is an ordered set of [`ParamDef`]s. Schemas are composed with
//! [`Params::extend`]: a descriptor sharing a name with an existing one replaces
//! it in place, new descriptors are appended in declaration order.
//!
//! ```
//! use conscore::libs::params::*;
//!
//! let base = Params::new(vec![
//!     ParamDef::new("window_size", 2, "Residues on either side").validator(non_negative),
//!     ParamDef::new("normalize", false, "Return z-scores"),
//! ]);
//! let child = base.extend(vec![
//!     ParamDef::new("window_size", 3, "Residues on either side").validator(non_negative),
//!     ParamDef::new("gap_cutoff", 0.3, "Maximum gap fraction").validator(unit_interval),
//! ]);
//! assert_eq!(child.names(), vec!["window_size", "normalize", "gap_cutoff"]);
//!
//! let overrides = Overrides::from([("gap_cutoff".to_string(), ParamValue::from("0.5"))]);
//! let values = child.resolve(&overrides).unwrap();
//! assert_eq!(values.usize("window_size").unwrap(), 3);
//! assert_eq!(values.float("gap_cutoff").unwrap(), 0.5);
//! ```
use indexmap::IndexMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Int,
    Float,
    Bool,
    Str,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParamKind::Int => "int",
            ParamKind::Float => "float",
            ParamKind::Bool => "bool",
            ParamKind::Str => "str",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Int(_) => ParamKind::Int,
            ParamValue::Float(_) => ParamKind::Float,
            ParamValue::Bool(_) => ParamKind::Bool,
            ParamValue::Str(_) => ParamKind::Str,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Ints are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Converts the value to `kind`, or `None` if there is no sensible conversion.
    ///
    /// ```
    /// use conscore::libs::params::{ParamKind, ParamValue};
    /// assert_eq!(ParamValue::from("3").coerce(ParamKind::Int), Some(ParamValue::Int(3)));
    /// assert_eq!(ParamValue::Float(2.0).coerce(ParamKind::Int), Some(ParamValue::Int(2)));
    /// assert_eq!(ParamValue::Float(2.5).coerce(ParamKind::Int), None);
    /// assert_eq!(ParamValue::Int(1).coerce(ParamKind::Float), Some(ParamValue::Float(1.0)));
    /// assert_eq!(ParamValue::from("Yes").coerce(ParamKind::Bool), Some(ParamValue::Bool(true)));
    /// assert_eq!(ParamValue::from("maybe").coerce(ParamKind::Bool), None);
    /// assert_eq!(ParamValue::Bool(false).coerce(ParamKind::Str), Some(ParamValue::from("false")));
    /// ```
    pub fn coerce(&self, kind: ParamKind) -> Option<ParamValue> {
        match (kind, self) {
            (ParamKind::Int, ParamValue::Int(v)) => Some(ParamValue::Int(*v)),
            (ParamKind::Int, ParamValue::Float(v)) => {
                // i64::MAX as f64 rounds up to 2^63, which is already out of range
                if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 {
                    Some(ParamValue::Int(*v as i64))
                } else {
                    None
                }
            }
            (ParamKind::Int, ParamValue::Str(s)) => s.trim().parse::<i64>().ok().map(ParamValue::Int),

            (ParamKind::Float, ParamValue::Int(v)) => Some(ParamValue::Float(*v as f64)),
            (ParamKind::Float, ParamValue::Float(v)) => Some(ParamValue::Float(*v)),
            (ParamKind::Float, ParamValue::Str(s)) => {
                s.trim().parse::<f64>().ok().map(ParamValue::Float)
            }

            (ParamKind::Bool, ParamValue::Bool(v)) => Some(ParamValue::Bool(*v)),
            (ParamKind::Bool, ParamValue::Int(0)) => Some(ParamValue::Bool(false)),
            (ParamKind::Bool, ParamValue::Int(1)) => Some(ParamValue::Bool(true)),
            (ParamKind::Bool, ParamValue::Str(s)) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" => Some(ParamValue::Bool(true)),
                "false" | "no" | "0" => Some(ParamValue::Bool(false)),
                _ => None,
            },

            (ParamKind::Str, v) => Some(ParamValue::Str(v.to_string())),

            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Str(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

/// Predicate over an already coerced value.
pub type Validator = fn(&ParamValue) -> bool;

pub fn non_negative(v: &ParamValue) -> bool {
    v.as_float().is_some_and(|x| x.is_finite() && x >= 0.0)
}

pub fn positive(v: &ParamValue) -> bool {
    v.as_float().is_some_and(|x| x.is_finite() && x > 0.0)
}

/// `0 <= x <= 1`
pub fn unit_interval(v: &ParamValue) -> bool {
    v.as_float().is_some_and(|x| (0.0..=1.0).contains(&x))
}

/// One tunable parameter.
#[derive(Debug, Clone)]
pub struct ParamDef {
    pub name: &'static str,
    pub default: ParamValue,
    pub kind: ParamKind,
    pub validator: Option<Validator>,
    pub help: &'static str,
}

impl ParamDef {
    /// The kind is taken from the default.
    pub fn new(name: &'static str, default: impl Into<ParamValue>, help: &'static str) -> Self {
        let default = default.into();
        Self {
            name,
            kind: default.kind(),
            default,
            validator: None,
            help,
        }
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn kind(mut self, kind: ParamKind) -> Self {
        self.kind = kind;
        if let Some(default) = self.default.coerce(kind) {
            self.default = default;
        }
        self
    }

    /// Coerces and validates a caller supplied value.
    pub fn check(&self, raw: &ParamValue) -> Result<ParamValue, ParamError> {
        let value = raw.coerce(self.kind).ok_or_else(|| ParamError::InvalidType {
            name: self.name.to_string(),
            expected: self.kind,
            value: raw.to_string(),
        })?;

        if let Some(validator) = self.validator {
            if !validator(&value) {
                return Err(ParamError::InvalidValue {
                    name: self.name.to_string(),
                    value: value.to_string(),
                });
            }
        }

        Ok(value)
    }
}

/// Caller supplied name to raw value pairs.
pub type Overrides = IndexMap<String, ParamValue>;

/// Parses `name=value` from the command line. The value stays a string until
/// the schema coerces it.
///
/// ```
/// use conscore::libs::params::{parse_override, ParamValue};
/// assert_eq!(
///     parse_override("window_size=0").unwrap(),
///     ("window_size".to_string(), ParamValue::from("0"))
/// );
/// assert!(parse_override("window_size").is_err());
/// assert!(parse_override("=1").is_err());
/// ```
pub fn parse_override(s: &str) -> Result<(String, ParamValue), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), ParamValue::from(value.trim())))
        }
        _ => Err(format!("expected name=value, got '{}'", s)),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Params {
    defs: IndexMap<&'static str, ParamDef>,
}

impl Params {
    pub fn new(defs: impl IntoIterator<Item = ParamDef>) -> Self {
        Self::default().extend(defs)
    }

    /// A new schema: `self` with same-named descriptors replaced in place and
    /// new descriptors appended.
    pub fn extend(&self, defs: impl IntoIterator<Item = ParamDef>) -> Self {
        let mut merged = self.clone();
        for def in defs {
            merged.defs.insert(def.name, def);
        }
        merged
    }

    pub fn get(&self, name: &str) -> Option<&ParamDef> {
        self.defs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamDef> {
        self.defs.values()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.defs.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// One value per descriptor: the checked override when supplied, otherwise
    /// the default.
    pub fn resolve(&self, overrides: &Overrides) -> Result<ParamValues, ParamError> {
        let mut checked = IndexMap::new();
        for (name, raw) in overrides {
            let def = self.get(name).ok_or_else(|| ParamError::Unknown {
                name: name.to_string(),
            })?;
            checked.insert(def.name, def.check(raw)?);
        }

        let values = self
            .iter()
            .map(|def| {
                let value = checked
                    .swap_remove(def.name)
                    .unwrap_or_else(|| def.default.clone());
                (def.name, value)
            })
            .collect();

        Ok(ParamValues { values })
    }
}

/// Resolved values, in schema order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamValues {
    values: IndexMap<&'static str, ParamValue>,
}

impl ParamValues {
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.values.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    fn typed<T>(
        &self,
        name: &str,
        kind: ParamKind,
        f: impl Fn(&ParamValue) -> Option<T>,
    ) -> Result<T, ParamError> {
        let value = self.get(name).ok_or_else(|| ParamError::Unknown {
            name: name.to_string(),
        })?;
        f(value).ok_or_else(|| ParamError::InvalidType {
            name: name.to_string(),
            expected: kind,
            value: value.to_string(),
        })
    }

    pub fn int(&self, name: &str) -> Result<i64, ParamError> {
        self.typed(name, ParamKind::Int, ParamValue::as_int)
    }

    pub fn usize(&self, name: &str) -> Result<usize, ParamError> {
        let v = self.int(name)?;
        usize::try_from(v).map_err(|_| ParamError::InvalidValue {
            name: name.to_string(),
            value: v.to_string(),
        })
    }

    pub fn float(&self, name: &str) -> Result<f64, ParamError> {
        self.typed(name, ParamKind::Float, ParamValue::as_float)
    }

    pub fn bool(&self, name: &str) -> Result<bool, ParamError> {
        self.typed(name, ParamKind::Bool, ParamValue::as_bool)
    }

    pub fn str(&self, name: &str) -> Result<String, ParamError> {
        self.typed(name, ParamKind::Str, |v| v.as_str().map(str::to_string))
    }
}

/// A configuration that is built from a parameter schema.
pub trait WithParams: Sized {
    /// The effective schema, inherited descriptors included.
    fn params() -> Params;

    /// Reads typed fields out of resolved values.
    fn from_values(values: &ParamValues) -> Result<Self, ParamError>;

    fn with_params(overrides: &Overrides) -> Result<Self, ParamError> {
        let values = Self::params().resolve(overrides)?;
        Self::from_values(&values)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// Name not declared in the schema
    Unknown { name: String },
    /// Value can't be coerced to the declared kind
    InvalidType {
        name: String,
        expected: ParamKind,
        value: String,
    },
    /// Value rejected by the validator
    InvalidValue { name: String, value: String },
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamError::Unknown { name } => write!(f, "Unknown parameter '{}'", name),
            ParamError::InvalidType {
                name,
                expected,
                value,
            } => write!(
                f,
                "Invalid type for parameter '{}': expected {}, got '{}'",
                name, expected, value
            ),
            ParamError::InvalidValue { name, value } => {
                write!(f, "Invalid value for parameter '{}': {}", name, value)
            }
        }
    }
}

impl std::error::Error for ParamError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn grandparent() -> Params {
        Params::new(vec![
            ParamDef::new("window_size", 2, "").validator(non_negative),
            ParamDef::new("window_lambda", 0.5, "").validator(unit_interval),
            ParamDef::new("normalize", false, ""),
        ])
    }

    fn overrides(pairs: &[(&str, ParamValue)]) -> Overrides {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_extend_is_transitive() {
        let parent = grandparent().extend(vec![
            ParamDef::new("gap_cutoff", 0.3, "").validator(unit_interval),
            ParamDef::new("window_size", 3, "").validator(non_negative),
        ]);
        let child = parent.extend(vec![
            ParamDef::new("normalize", true, ""),
            ParamDef::new("count_gaps", true, ""),
        ]);

        assert_eq!(
            child.names(),
            vec![
                "window_size",
                "window_lambda",
                "normalize",
                "gap_cutoff",
                "count_gaps"
            ]
        );
        assert_eq!(child.get("window_size").unwrap().default, ParamValue::Int(3));
        assert_eq!(child.get("normalize").unwrap().default, ParamValue::Bool(true));

        // the parent is untouched
        assert_eq!(parent.len(), 4);
        assert_eq!(parent.get("normalize").unwrap().default, ParamValue::Bool(false));
    }

    #[test]
    fn test_resolve_defaults() {
        let values = grandparent().resolve(&Overrides::new()).unwrap();
        assert_eq!(values.names(), vec!["window_size", "window_lambda", "normalize"]);
        assert_eq!(values.usize("window_size").unwrap(), 2);
        assert_eq!(values.float("window_lambda").unwrap(), 0.5);
        assert!(!values.bool("normalize").unwrap());
    }

    #[test]
    fn test_resolve_overrides() {
        let values = grandparent()
            .resolve(&overrides(&[
                ("normalize", ParamValue::from("true")),
                ("window_lambda", ParamValue::Int(1)),
            ]))
            .unwrap();
        assert_eq!(values.usize("window_size").unwrap(), 2);
        assert_eq!(values.get("window_lambda"), Some(&ParamValue::Float(1.0)));
        assert!(values.bool("normalize").unwrap());
    }

    #[test]
    fn test_resolve_errors() {
        let params = grandparent();

        let err = params
            .resolve(&overrides(&[("window", ParamValue::Int(1))]))
            .unwrap_err();
        assert_eq!(
            err,
            ParamError::Unknown {
                name: "window".to_string()
            }
        );

        let err = params
            .resolve(&overrides(&[("window_size", ParamValue::from("two"))]))
            .unwrap_err();
        assert!(matches!(err, ParamError::InvalidType { expected: ParamKind::Int, .. }));

        let err = params
            .resolve(&overrides(&[("window_size", ParamValue::Int(-1))]))
            .unwrap_err();
        assert_eq!(
            err,
            ParamError::InvalidValue {
                name: "window_size".to_string(),
                value: "-1".to_string()
            }
        );

        let err = params
            .resolve(&overrides(&[("window_lambda", ParamValue::Float(1.5))]))
            .unwrap_err();
        assert!(matches!(err, ParamError::InvalidValue { .. }));
        assert_eq!(
            err.to_string(),
            "Invalid value for parameter 'window_lambda': 1.5"
        );
    }

    #[test]
    fn test_defaults_not_revalidated() {
        // a default that the validator would reject is still accepted as-is
        let params = Params::new(vec![ParamDef::new("odd", -1, "").validator(non_negative)]);
        let values = params.resolve(&Overrides::new()).unwrap();
        assert_eq!(values.int("odd").unwrap(), -1);
    }

    #[test]
    fn test_typed_getters() {
        let params = Params::new(vec![
            ParamDef::new("name", "blosum62", ""),
            ParamDef::new("n", 2, ""),
            ParamDef::new("x", 0.0, "").kind(ParamKind::Float),
        ]);
        let values = params
            .resolve(&overrides(&[("x", ParamValue::from("2"))]))
            .unwrap();
        assert_eq!(values.str("name").unwrap(), "blosum62");
        assert_eq!(values.float("n").unwrap(), 2.0);
        assert_eq!(values.float("x").unwrap(), 2.0);
        assert!(matches!(values.bool("n"), Err(ParamError::InvalidType { .. })));
        assert!(matches!(values.int("missing"), Err(ParamError::Unknown { .. })));
    }

    #[test]
    fn test_infinite_rejected() {
        let params = grandparent().extend(vec![
            ParamDef::new("pseudocount", 1e-7, "").validator(positive)
        ]);

        for name in ["pseudocount", "window_size"] {
            let err = params
                .resolve(&overrides(&[(name, ParamValue::from("inf"))]))
                .unwrap_err();
            match name {
                // "inf" is no integer
                "window_size" => assert!(matches!(err, ParamError::InvalidType { .. })),
                _ => assert_eq!(
                    err,
                    ParamError::InvalidValue {
                        name: name.to_string(),
                        value: "inf".to_string()
                    }
                ),
            }
        }

        assert!(!non_negative(&ParamValue::Float(f64::INFINITY)));
        assert!(!positive(&ParamValue::Float(f64::INFINITY)));
        assert!(!positive(&ParamValue::Float(f64::NAN)));
        assert!(positive(&ParamValue::Float(f64::MAX)));
    }

    #[test]
    fn test_float_to_int_range() {
        assert_eq!(ParamValue::Float(1e300).coerce(ParamKind::Int), None);
        assert_eq!(ParamValue::Float(-1e300).coerce(ParamKind::Int), None);
        assert_eq!(ParamValue::Float(i64::MAX as f64).coerce(ParamKind::Int), None);
        assert_eq!(
            ParamValue::Float(i64::MIN as f64).coerce(ParamKind::Int),
            Some(ParamValue::Int(i64::MIN))
        );
        assert_eq!(ParamValue::Float(3.0).coerce(ParamKind::Int), Some(ParamValue::Int(3)));

        let err = grandparent()
            .resolve(&overrides(&[("window_size", ParamValue::Float(1e300))]))
            .unwrap_err();
        assert!(matches!(err, ParamError::InvalidType { expected: ParamKind::Int, .. }));
    }

    #[test]
    fn test_kind_coerces_default() {
        let def = ParamDef::new("n", 2, "").kind(ParamKind::Str);
        assert_eq!(def.default, ParamValue::from("2"));

        let def = ParamDef::new("x", 2, "").kind(ParamKind::Float);
        assert_eq!(def.default, ParamValue::Float(2.0));

        // not coercible, the default is kept
        let def = ParamDef::new("flag", "maybe", "").kind(ParamKind::Bool);
        assert_eq!(def.default, ParamValue::from("maybe"));

        let params = Params::new(vec![ParamDef::new("n", 2, "").kind(ParamKind::Str)]);
        let values = params.resolve(&Overrides::new()).unwrap();
        assert_eq!(values.str("n").unwrap(), "2");
    }
}
