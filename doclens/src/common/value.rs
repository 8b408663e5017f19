use crate::collection::Document;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

/// 2^63, the first float above every `i64`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Compare two floats with proper NaN and total ordering.
#[inline]
fn num_cmp_float(a: f64, b: f64) -> Ordering {
    // NaN sorts above every other number
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Compare an integer with a float exactly, without rounding the integer.
fn num_cmp_int_float(i: i64, f: f64) -> Ordering {
    if f.is_nan() || f >= I64_BOUND {
        return Ordering::Less;
    }
    if f < -I64_BOUND {
        return Ordering::Greater;
    }

    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => num_cmp_float(whole, f),
        ordering => ordering,
    }
}

/// Total order over numbers of any width.
fn num_cmp(a: &Value, b: &Value) -> Ordering {
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(x), None) => num_cmp_int_float(x, b.numeric_f64()),
        (None, Some(y)) => num_cmp_int_float(y, a.numeric_f64()).reverse(),
        (None, None) => num_cmp_float(a.numeric_f64(), b.numeric_f64()),
    }
}

/// Represents a [Document] value.
///
/// Documents are schema-less, so a field can hold any of these variants and two
/// documents of the same collection may disagree on the variant for the same
/// field. Type dispatch (filters, schema inference) is done by matching on the
/// variant.
///
/// # Variants
/// - Null: absence of a value
/// - Bool: boolean true/false
/// - I32 / I64: integers (32 and 64 bit)
/// - F64: floating point number
/// - String: text value
/// - DateTime: UTC timestamp
/// - Document: nested document
/// - Array: ordered sequence of values
///
/// # Characteristics
/// - **Numeric equality across widths**: `I32(1) == I64(1) == F64(1.0)`
/// - **Total order**: values of different kinds order by kind
///   (null < numbers < strings < documents < arrays < booleans < timestamps)
/// - **JSON friendly**: serializes to plain JSON, timestamps as RFC 3339 strings
///
/// ```rust
/// use doclens::common::Value;
///
/// let v: Value = 42.into();
/// assert!(v.is_number());
/// assert_eq!(v, Value::from(42.0));
/// assert_eq!(v.type_name(), "int32");
/// ```
#[derive(Clone, Default)]
pub enum Value {
    /// Represents a null value.
    #[default]
    Null,
    /// Represents a boolean value.
    Bool(bool),
    /// Represents a signed 32-bit integer value.
    I32(i32),
    /// Represents a signed 64-bit integer value.
    I64(i64),
    /// Represents a 64-bit floating point value.
    F64(f64),
    /// Represents a string value.
    String(String),
    /// Represents a point in time.
    DateTime(DateTime<Utc>),
    /// Represents a nested document.
    Document(Document),
    /// Represents an array value.
    Array(Vec<Value>),
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_debug_string())
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if self.is_number() && other.is_number() {
            return num_cmp(self, other) == Ordering::Equal;
        }

        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Document(a), Value::Document(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.compare_same_kind(other) {
            Some(ordering) => ordering,
            None => match (self, other) {
                (Value::Document(a), Value::Document(b)) => a.cmp(b),
                (Value::Array(a), Value::Array(b)) => a.cmp(b),
                _ => self.kind_rank().cmp(&other.kind_rank()),
            },
        }
    }
}

impl Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.kind_rank().hash(state);
        match self {
            Value::Null => {}
            Value::Bool(v) => v.hash(state),
            // equal numbers of different widths must hash alike
            Value::I32(_) | Value::I64(_) | Value::F64(_) => match self.integral_i64() {
                Some(n) => n.hash(state),
                None => {
                    let n = self.numeric_f64();
                    let n = if n.is_nan() { f64::NAN } else { n };
                    n.to_bits().hash(state)
                }
            },
            Value::String(v) => v.hash(state),
            Value::DateTime(v) => v.hash(state),
            Value::Document(v) => v.hash(state),
            Value::Array(v) => v.hash(state),
        }
    }
}

impl Value {
    /// Creates a new [Value] from anything that converts into one.
    pub fn from<T: Into<Value>>(value: T) -> Value {
        value.into()
    }

    /// Creates a new [Value] from an [Option], mapping `None` to [Value::Null].
    pub fn from_option<T: Into<Value>>(value: Option<T>) -> Value {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }

    /// Creates a [Value::Array] from a vector of convertible values.
    pub fn from_vec<T: Into<Value>>(values: Vec<T>) -> Value {
        Value::Array(values.into_iter().map(|v| v.into()).collect())
    }

    /// Returns the short type tag of this value.
    ///
    /// The tags are the ones reported by schema inference:
    /// `null`, `boolean`, `int32`, `int64`, `double`, `string`, `date`,
    /// `document` and `array`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::I32(_) => "int32",
            Value::I64(_) => "int64",
            Value::F64(_) => "double",
            Value::String(_) => "string",
            Value::DateTime(_) => "date",
            Value::Document(_) => "document",
            Value::Array(_) => "array",
        }
    }

    /// Compares two values of the same kind.
    ///
    /// Numbers compare with numbers regardless of width, strings compare
    /// lexicographically, timestamps chronologically and booleans with
    /// `false < true`. Returns `None` when the kinds differ or are not ordered
    /// (documents, arrays, null against anything but null).
    pub fn compare_same_kind(&self, other: &Value) -> Option<Ordering> {
        if self.is_number() && other.is_number() {
            return Some(num_cmp(self, other));
        }

        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    #[inline]
    fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::I32(_) | Value::I64(_) | Value::F64(_) => 1,
            Value::String(_) => 2,
            Value::Document(_) => 3,
            Value::Array(_) => 4,
            Value::Bool(_) => 5,
            Value::DateTime(_) => 6,
        }
    }

    #[inline]
    // integers, and floats holding a whole number an i64 can represent
    fn integral_i64(&self) -> Option<i64> {
        match self {
            Value::F64(v) if v.fract() == 0.0 && *v >= -I64_BOUND && *v < I64_BOUND => {
                Some(*v as i64)
            }
            _ => self.as_i64(),
        }
    }

    fn numeric_f64(&self) -> f64 {
        match self {
            Value::I32(v) => *v as f64,
            Value::I64(v) => *v as f64,
            Value::F64(v) => *v,
            _ => f64::NAN,
        }
    }

    /// Returns the bool value if the [Value] is [Value::Bool].
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the integer value widened to `i64` for [Value::I32] and [Value::I64].
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I32(v) => Some(*v as i64),
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns any numeric value as `f64`.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        if self.is_number() {
            Some(self.numeric_f64())
        } else {
            None
        }
    }

    #[inline]
    pub fn as_string(&self) -> Option<&String> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_date_time(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::DateTime(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Checks if the [Value] is a number type.
    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::I32(_) | Value::I64(_) | Value::F64(_))
    }

    /// Checks if the [Value] is an integer type.
    #[inline]
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::I32(_) | Value::I64(_))
    }

    #[inline]
    pub fn is_decimal(&self) -> bool {
        matches!(self, Value::F64(_))
    }

    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    pub fn is_date_time(&self) -> bool {
        matches!(self, Value::DateTime(_))
    }

    #[inline]
    pub fn is_document(&self) -> bool {
        matches!(self, Value::Document(_))
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Converts the value into a `serde_json::Value`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(v) => serde_json::Value::Bool(*v),
            Value::I32(v) => serde_json::Value::from(*v),
            Value::I64(v) => serde_json::Value::from(*v),
            Value::F64(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(v) => serde_json::Value::String(v.clone()),
            Value::DateTime(v) => {
                serde_json::Value::String(v.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::Document(v) => v.to_json(),
            Value::Array(v) => serde_json::Value::Array(v.iter().map(|it| it.to_json()).collect()),
        }
    }

    fn to_debug_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(v) => format!("bool({})", v),
            Value::I32(v) => format!("i32({})", v),
            Value::I64(v) => format!("i64({})", v),
            Value::F64(v) => format!("f64({})", v),
            Value::String(v) => format!("string(\"{}\")", v),
            Value::DateTime(v) => format!("date({})", v.to_rfc3339()),
            Value::Document(v) => format!("document({:?})", v),
            Value::Array(v) => {
                let items = v.iter().map(|it| it.to_debug_string()).collect::<Vec<_>>();
                format!("array([{}])", items.join(", "))
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::I32(v) => serializer.serialize_i32(*v),
            Value::I64(v) => serializer.serialize_i64(*v),
            Value::F64(v) => serializer.serialize_f64(*v),
            Value::String(v) => serializer.serialize_str(v),
            Value::DateTime(v) => {
                serializer.serialize_str(&v.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::Document(v) => {
                let mut map = serializer.serialize_map(Some(v.size()))?;
                for (key, value) in v.iter() {
                    map.serialize_entry(&key, &value)?;
                }
                map.end()
            }
            Value::Array(v) => {
                let mut seq = serializer.serialize_seq(Some(v.len()))?;
                for value in v {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Ok(Value::from(json))
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    #[inline]
    fn from(value: i32) -> Self {
        Value::I32(value)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<u32> for Value {
    #[inline]
    fn from(value: u32) -> Self {
        Value::I64(value as i64)
    }
}

impl From<f32> for Value {
    #[inline]
    fn from(value: f32) -> Self {
        Value::F64(value as f64)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value)
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Value::Document(value)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        Value::from_option(value)
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Vec<T>) -> Self {
        Value::from_vec(value)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

/// JSON integers become [Value::I64] (or [Value::F64] when they do not fit),
/// other numbers [Value::F64], objects [Value::Document]. Strings are kept as
/// strings, even when they look like timestamps.
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(v) => Value::Bool(v),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::I64(i),
                None => Value::F64(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Document(Document::from_json_map(map)),
        }
    }
}

/// A macro to create a `Value` from a given expression.
///
/// ```rust
/// use doclens::common::Value;
/// use doclens::val;
///
/// assert_eq!(val!(42), Value::I32(42));
/// assert_eq!(val!("hello"), Value::String("hello".to_string()));
/// ```
#[macro_export]
macro_rules! val {
    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
