//! Runtime values

use alloc::collections::btree_map;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::{ConversionError, ImmutableValueError};

/// Kind tag of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    String,
    Bytes,
    EnumSymbol,
    Sequence,
    Record,
    Map,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Bytes => "bytes",
            ValueKind::EnumSymbol => "enum symbol",
            ValueKind::Sequence => "sequence",
            ValueKind::Record => "record",
            ValueKind::Map => "map",
        };
        f.write_str(name)
    }
}

/// A dynamic host value.
///
/// Integers and floats are always carried at 64-bit width; narrowing to a 32-bit
/// wire type happens only when encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    EnumSymbol(String),
    Sequence(Sequence),
    Record(Record),
    Map(Map),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::EnumSymbol(_) => ValueKind::EnumSymbol,
            Value::Sequence(_) => ValueKind::Sequence,
            Value::Record(_) => ValueKind::Record,
            Value::Map(_) => ValueKind::Map,
        }
    }

    /// Build a record value from `(name, value)` pairs, keeping their order.
    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Record(fields.into_iter().collect())
    }

    /// Build a map value from `(key, value)` pairs.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(entries.into_iter().collect())
    }

    /// Build a sequence value.
    pub fn sequence<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Value::Sequence(items.into_iter().collect())
    }

    /// Helper to create an enum symbol value.
    pub fn symbol(name: impl Into<String>) -> Self {
        Value::EnumSymbol(name.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text of a `String` or `EnumSymbol` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::EnumSymbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Sequence> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Deep-freeze every container reachable from this value.
    ///
    /// Scalars are plain data and are left untouched.
    pub fn freeze(&mut self) {
        match self {
            Value::Sequence(s) => s.freeze(),
            Value::Record(r) => r.freeze(),
            Value::Map(m) => m.freeze(),
            _ => {}
        }
    }

    /// Whether this value is a frozen container. Scalars never report frozen.
    pub fn is_frozen(&self) -> bool {
        match self {
            Value::Sequence(s) => s.is_frozen(),
            Value::Record(r) => r.is_frozen(),
            Value::Map(m) => m.is_frozen(),
            _ => false,
        }
    }
}

// ============================================================================
// Containers
// ============================================================================

/// Ordered record fields. Field order is the order of first insertion.
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
    frozen: bool,
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
            frozen: false,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Bind `name` to `value`. An existing binding keeps its position.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: Value,
    ) -> Result<Option<Value>, ImmutableValueError> {
        self.check_mutable()?;
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Ok(Some(core::mem::replace(slot, value))),
            None => {
                self.fields.push((name, value));
                Ok(None)
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Result<Option<Value>, ImmutableValueError> {
        self.check_mutable()?;
        let index = self.fields.iter().position(|(n, _)| n == name);
        Ok(index.map(|i| self.fields.remove(i).1))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<Option<&mut Value>, ImmutableValueError> {
        self.check_mutable()?;
        Ok(self.fields.iter_mut().find(|(n, _)| n == name).map(|(_, v)| v))
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
        for (_, value) in &mut self.fields {
            value.freeze();
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn into_fields(self) -> Vec<(String, Value)> {
        self.fields
    }

    fn check_mutable(&self) -> Result<(), ImmutableValueError> {
        if self.frozen {
            return Err(ImmutableValueError::new("record"));
        }
        Ok(())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            let name = name.into();
            match record.fields.iter_mut().find(|(n, _)| *n == name) {
                Some((_, slot)) => *slot = value,
                None => record.fields.push((name, value)),
            }
        }
        record
    }
}

/// String-keyed map. Keys enumerate in sorted order.
#[derive(Debug, Clone, Default)]
pub struct Map {
    entries: BTreeMap<String, Value>,
    frozen: bool,
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    pub fn keys(&self) -> btree_map::Keys<'_, String, Value> {
        self.entries.keys()
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: Value,
    ) -> Result<Option<Value>, ImmutableValueError> {
        self.check_mutable()?;
        Ok(self.entries.insert(key.into(), value))
    }

    pub fn remove(&mut self, key: &str) -> Result<Option<Value>, ImmutableValueError> {
        self.check_mutable()?;
        Ok(self.entries.remove(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Result<Option<&mut Value>, ImmutableValueError> {
        self.check_mutable()?;
        Ok(self.entries.get_mut(key))
    }

    pub fn clear(&mut self) -> Result<(), ImmutableValueError> {
        self.check_mutable()?;
        self.entries.clear();
        Ok(())
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
        for value in self.entries.values_mut() {
            value.freeze();
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn into_entries(self) -> BTreeMap<String, Value> {
        self.entries
    }

    fn check_mutable(&self) -> Result<(), ImmutableValueError> {
        if self.frozen {
            return Err(ImmutableValueError::new("map"));
        }
        Ok(())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            frozen: false,
        }
    }
}

/// Ordered sequence of values.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    items: Vec<Value>,
    frozen: bool,
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            frozen: false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    pub fn push(&mut self, value: Value) -> Result<(), ImmutableValueError> {
        self.check_mutable()?;
        self.items.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Option<Value>, ImmutableValueError> {
        self.check_mutable()?;
        Ok(self.items.pop())
    }

    pub fn get_mut(&mut self, index: usize) -> Result<Option<&mut Value>, ImmutableValueError> {
        self.check_mutable()?;
        Ok(self.items.get_mut(index))
    }

    pub fn clear(&mut self) -> Result<(), ImmutableValueError> {
        self.check_mutable()?;
        self.items.clear();
        Ok(())
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
        for item in &mut self.items {
            item.freeze();
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }

    fn check_mutable(&self) -> Result<(), ImmutableValueError> {
        if self.frozen {
            return Err(ImmutableValueError::new("sequence"));
        }
        Ok(())
    }
}

impl FromIterator<Value> for Sequence {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
            frozen: false,
        }
    }
}

impl From<Vec<Value>> for Sequence {
    fn from(items: Vec<Value>) -> Self {
        Self { items, frozen: false }
    }
}

// ============================================================================
// From implementations
// ============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self { Value::Bool(v) }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self { Value::Int(i64::from(v)) }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self { Value::Int(v) }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self { Value::Float(f64::from(v)) }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self { Value::Float(v) }
}

impl From<String> for Value {
    fn from(v: String) -> Self { Value::String(v) }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self { Value::String(String::from(v)) }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self { Value::Bytes(v) }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self { Value::Bytes(v.to_vec()) }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self { Value::Sequence(Sequence::from(v)) }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self { Value::Record(v) }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self { Value::Map(v) }
}

impl From<Sequence> for Value {
    fn from(v: Sequence) -> Self { Value::Sequence(v) }
}

// ============================================================================
// TryFrom implementations
// ============================================================================

fn mismatch(expected: &str, got: &Value) -> ConversionError {
    ConversionError::TypeMismatch {
        expected: String::from(expected),
        got: format!("{}", got.kind()),
    }
}

impl TryFrom<Value> for bool {
    type Error = ConversionError;
    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::Bool(x) => Ok(x),
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = ConversionError;
    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::Int(x) => Ok(x),
            other => Err(mismatch("int", &other)),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = ConversionError;
    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::Float(x) => Ok(x),
            other => Err(mismatch("float", &other)),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = ConversionError;
    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::String(x) | Value::EnumSymbol(x) => Ok(x),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl TryFrom<Value> for Vec<u8> {
    type Error = ConversionError;
    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::Bytes(x) => Ok(x),
            other => Err(mismatch("bytes", &other)),
        }
    }
}

impl TryFrom<Value> for Record {
    type Error = ConversionError;
    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::Record(x) => Ok(x),
            other => Err(mismatch("record", &other)),
        }
    }
}

impl TryFrom<Value> for Map {
    type Error = ConversionError;
    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::Map(x) => Ok(x),
            other => Err(mismatch("map", &other)),
        }
    }
}

impl TryFrom<Value> for Sequence {
    type Error = ConversionError;
    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::Sequence(x) => Ok(x),
            other => Err(mismatch("sequence", &other)),
        }
    }
}

// ============================================================================
// FromValue trait - avoids coherence issues with TryFrom for Option<T>
// ============================================================================

/// Trait for converting from a Value.
///
/// This trait exists to avoid coherence issues with Rust's blanket
/// `impl<T, U> TryFrom<U> for T where U: Into<T>` when implementing
/// conversions for generic types like `Option<T>`.
pub trait FromValue: Sized {
    fn from_value(v: Value) -> Result<Self, ConversionError>;
}

impl<T: TryFrom<Value, Error = ConversionError>> FromValue for T {
    fn from_value(v: Value) -> Result<Self, ConversionError> {
        T::try_from(v)
    }
}

/// `Null` converts to `None`; anything else must convert to `T`.
impl<T: FromValue> FromValue for Option<T> {
    fn from_value(v: Value) -> Result<Self, ConversionError> {
        match v {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl Record {
    /// Take field `name` out of the record and convert it.
    ///
    /// A missing field converts like `Null`, so `Option<T>` fields may be absent.
    pub fn extract<T: FromValue>(&self, name: &str) -> Result<T, ConversionError> {
        let value = self.get(name).cloned().unwrap_or(Value::Null);
        match T::from_value(value) {
            Ok(v) => Ok(v),
            Err(_) if !self.contains(name) => Err(ConversionError::MissingField(String::from(name))),
            Err(e) => Err(ConversionError::FieldError(String::from(name), alloc::boxed::Box::new(e))),
        }
    }
}

impl Sequence {
    /// Convert every item, reporting the index of the first failure.
    pub fn extract_all<T: FromValue>(&self) -> Result<Vec<T>, ConversionError> {
        self.items
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, item)| {
                T::from_value(item).map_err(|e| ConversionError::IndexError(i, alloc::boxed::Box::new(e)))
            })
            .collect()
    }
}
