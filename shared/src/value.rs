// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT
use std::collections::BTreeMap;

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::address::{Address, ADDRESS_LEN};
use crate::econ::Amount;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("integer out of range")]
    OutOfRange,
}

/// A typed value passed as a parameter, returned from a method, carried in invocation
/// metadata, or logged in an event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(BigInt),
    Str(String),
    Bytes(Vec<u8>),
    Address(Address),
    List(Vec<Value>),
    Dict(BTreeMap<String, Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::Address(_) => "address",
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Size of the value in bytes, as charged for input and event data.
    pub fn encoded_len(&self) -> usize {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(i) => i.to_signed_bytes_be().len(),
            Value::Str(s) => s.len(),
            Value::Bytes(b) => b.len(),
            Value::Address(_) => ADDRESS_LEN,
            Value::List(l) => l.iter().map(Value::encoded_len).sum(),
            Value::Dict(d) => d.iter().map(|(k, v)| k.len() + v.encoded_len()).sum(),
        }
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::TypeMismatch {
            expected,
            found: self.type_name(),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => s.serialize_unit(),
            Value::Bool(b) => s.serialize_str(if *b { "0x1" } else { "0x0" }),
            Value::Int(i) => s.collect_str(&format_args!("{:#x}", i)),
            Value::Str(v) => s.serialize_str(v),
            Value::Bytes(b) => s.collect_str(&format_args!("0x{}", hex::encode(b))),
            Value::Address(a) => a.serialize(s),
            Value::List(l) => {
                let mut seq = s.serialize_seq(Some(l.len()))?;
                for v in l {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Value::Dict(d) => {
                let mut map = s.serialize_map(Some(d.len()))?;
                for (k, v) in d {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

macro_rules! impl_from {
    ($($t:ty => $variant:ident),* $(,)?) => {$(
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::$variant(v.into())
            }
        }
    )*};
}

impl_from! {
    bool => Bool,
    i32 => Int,
    i64 => Int,
    u64 => Int,
    BigInt => Int,
    String => Str,
    &str => Str,
    Vec<u8> => Bytes,
    Address => Address,
    Vec<Value> => List,
    BTreeMap<String, Value> => Dict,
}

impl From<Amount> for Value {
    fn from(v: Amount) -> Self {
        Value::Int(v.loops().clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl TryFrom<&Value> for bool {
    type Error = Error;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        match v {
            Value::Bool(b) => Ok(*b),
            other => Err(other.mismatch("bool")),
        }
    }
}

impl TryFrom<&Value> for BigInt {
    type Error = Error;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        match v {
            Value::Int(i) => Ok(i.clone()),
            other => Err(other.mismatch("int")),
        }
    }
}

impl TryFrom<&Value> for i64 {
    type Error = Error;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        match v {
            Value::Int(i) => i.to_i64().ok_or(Error::OutOfRange),
            other => Err(other.mismatch("int")),
        }
    }
}

impl TryFrom<&Value> for Amount {
    type Error = Error;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        BigInt::try_from(v).map(Amount::from)
    }
}

impl TryFrom<&Value> for String {
    type Error = Error;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        match v {
            Value::Str(s) => Ok(s.clone()),
            other => Err(other.mismatch("str")),
        }
    }
}

impl TryFrom<&Value> for Vec<u8> {
    type Error = Error;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        match v {
            Value::Bytes(b) => Ok(b.clone()),
            other => Err(other.mismatch("bytes")),
        }
    }
}

impl TryFrom<&Value> for Address {
    type Error = Error;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        match v {
            Value::Address(a) => Ok(*a),
            other => Err(other.mismatch("address")),
        }
    }
}

#[cfg(feature = "arb")]
impl quickcheck::Arbitrary for Value {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        fn leaf(g: &mut quickcheck::Gen) -> Value {
            match u8::arbitrary(g) % 6 {
                0 => Value::Null,
                1 => Value::Bool(bool::arbitrary(g)),
                2 => Value::Int(BigInt::arbitrary(g)),
                3 => Value::Str(String::arbitrary(g)),
                4 => Value::Bytes(Vec::arbitrary(g)),
                _ => Value::Address(Address::arbitrary(g)),
            }
        }
        match u8::arbitrary(g) % 8 {
            0 => Value::List((0..u8::arbitrary(g) % 4).map(|_| leaf(g)).collect()),
            1 => Value::Dict(
                (0..u8::arbitrary(g) % 4)
                    .map(|_| (String::arbitrary(g), leaf(g)))
                    .collect(),
            ),
            _ => leaf(g),
        }
    }
}
