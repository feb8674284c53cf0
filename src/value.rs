use std::rc::Rc;

///
/// Value
///
/// Concrete runtime values carried by constant nodes and produced by
/// partial evaluation. Deliberately small: only the shapes the rewrite
/// engine must understand to evaluate membership receivers. Richer host
/// payloads belong behind a thunk.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Text(String),
    List(Vec<Self>),
    /// Named-member object; the evaluation target of member access.
    Record(Vec<(String, Self)>),
    /// Opaque parameter holder produced by value boxing.
    Holder(Rc<HolderCell>),
}

impl Value {
    /// Build a record value from name/value pairs.
    #[must_use]
    pub fn record<N: Into<String>>(fields: impl IntoIterator<Item = (N, Self)>) -> Self {
        Self::Record(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

///
/// HolderCell
///
/// Single-field holder allocated per boxed value. Its only job is
/// indirection: downstream shape fingerprinting keys on the holder's
/// declaring type and the field-access node, never on this payload.
///

#[derive(Debug, Eq, PartialEq)]
pub struct HolderCell {
    pub value: Value,
}

impl HolderCell {
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self { value }
    }
}

///
/// TESTS
///
