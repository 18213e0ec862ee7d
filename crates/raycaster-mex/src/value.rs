//! Host array model.
//!
//! Every argument and result crossing the gateway is a [`Value`]: a char row,
//! a double or uint8 matrix, a logical scalar, or a 1×1 struct with ordered
//! fields.

/// Column-major matrix of `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<T>,
}

impl<T> Matrix<T> {
    /// 1×N row vector.
    pub fn row(data: Vec<T>) -> Self {
        Self { rows: 1, cols: data.len(), data }
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Char(String),
    Double(Matrix<f64>),
    Uint8(Matrix<u8>),
    Logical(bool),
    /// 1×1 struct; field order is significant.
    Struct(Vec<(String, Value)>),
}

impl Value {
    pub fn scalar(v: f64) -> Self {
        Value::Double(Matrix::row(vec![v]))
    }

    pub fn row(data: Vec<f64>) -> Self {
        Value::Double(Matrix::row(data))
    }

    /// 1×4 uint8 `[R G B A]`.
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Value::Uint8(Matrix::row(vec![r, g, b, a]))
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Char(s.into())
    }

    pub fn numel(&self) -> usize {
        match self {
            Value::Char(s) => s.chars().count(),
            Value::Double(m) => m.numel(),
            Value::Uint8(m) => m.numel(),
            Value::Logical(_) | Value::Struct(_) => 1,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Double(_) | Value::Uint8(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Char(s) => Some(s),
            _ => None,
        }
    }

    /// Value of any 1×1 numeric or logical array.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Logical(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ if self.numel() != 1 => None,
            _ => self.as_numeric_scalar(),
        }
    }

    /// Like [`Value::as_scalar`] but rejects logicals.
    pub fn as_numeric_scalar(&self) -> Option<f64> {
        match self {
            Value::Double(m) if m.numel() == 1 => Some(m.data[0]),
            Value::Uint8(m) if m.numel() == 1 => Some(f64::from(m.data[0])),
            _ => None,
        }
    }

    /// Elements of a double array with exactly `N` elements.
    pub fn as_doubles<const N: usize>(&self) -> Option<[f64; N]> {
        match self {
            Value::Double(m) => m.data.as_slice().try_into().ok(),
            _ => None,
        }
    }

    /// Elements of a uint8 array with exactly `N` elements.
    pub fn as_bytes<const N: usize>(&self) -> Option<[u8; N]> {
        match self {
            Value::Uint8(m) => m.data.as_slice().try_into().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Logical(b) => Some(*b),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn field_names(&self) -> Vec<&str> {
        match self {
            Value::Struct(fields) => fields.iter().map(|(n, _)| n.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Logical(b)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::scalar(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_accept_numeric_and_logical() {
        assert_eq!(Value::scalar(3.5).as_scalar(), Some(3.5));
        assert_eq!(Value::Uint8(Matrix::row(vec![7])).as_scalar(), Some(7.0));
        assert_eq!(Value::Logical(true).as_scalar(), Some(1.0));
        assert_eq!(Value::Logical(true).as_numeric_scalar(), None);
        assert_eq!(Value::row(vec![1.0, 2.0]).as_scalar(), None);
        assert_eq!(Value::text("a").as_scalar(), None);
    }

    #[test]
    fn fixed_size_extraction_checks_count_and_class() {
        assert_eq!(Value::rgba(1, 2, 3, 4).as_bytes::<4>(), Some([1, 2, 3, 4]));
        assert_eq!(Value::rgba(1, 2, 3, 4).as_doubles::<4>(), None);
        assert_eq!(Value::row(vec![1.0, 2.0, 3.0]).as_doubles::<4>(), None);
        assert_eq!(Value::row(vec![0.0, 1.0]).as_doubles::<2>(), Some([0.0, 1.0]));
    }

    #[test]
    fn struct_fields_keep_order() {
        let v = Value::Struct(vec![
            ("B".into(), true.into()),
            ("A".into(), 2.0.into()),
        ]);
        assert_eq!(v.field_names(), ["B", "A"]);
        assert_eq!(v.field("A"), Some(&Value::scalar(2.0)));
        assert_eq!(v.field("C"), None);
    }
}
