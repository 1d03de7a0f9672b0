// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT
use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Length of an address body in bytes.
pub const BODY_LEN: usize = 20;

/// Length of the binary form (kind byte + body).
pub const ADDRESS_LEN: usize = BODY_LEN + 1;

const ACCOUNT_PREFIX: &str = "hx";
const CONTRACT_PREFIX: &str = "cx";

/// Address errors.
#[derive(Debug, PartialEq, Error)]
pub enum Error {
    #[error("unknown address prefix")]
    UnknownPrefix,
    #[error("invalid address length: {0}")]
    InvalidLength(usize),
    #[error("invalid hex body: {0}")]
    InvalidBody(#[from] hex::FromHexError),
    #[error("unknown address kind byte: {0:#04x}")]
    UnknownKind(u8),
}

/// Distinguishes externally owned accounts from deployed contracts.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Account = 0,
    Contract = 1,
}

/// An account (`hx...`) or contract (`cx...`) address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    kind: Kind,
    body: [u8; BODY_LEN],
}

impl Address {
    pub const fn new(kind: Kind, body: [u8; BODY_LEN]) -> Self {
        Self { kind, body }
    }

    pub const fn new_account(body: [u8; BODY_LEN]) -> Self {
        Self::new(Kind::Account, body)
    }

    pub const fn new_contract(body: [u8; BODY_LEN]) -> Self {
        Self::new(Kind::Contract, body)
    }

    /// Decodes the 21-byte binary form.
    pub fn from_bytes(bz: &[u8]) -> Result<Self, Error> {
        if bz.len() != ADDRESS_LEN {
            return Err(Error::InvalidLength(bz.len()));
        }
        let kind = match bz[0] {
            0 => Kind::Account,
            1 => Kind::Contract,
            other => return Err(Error::UnknownKind(other)),
        };
        let mut body = [0u8; BODY_LEN];
        body.copy_from_slice(&bz[1..]);
        Ok(Self { kind, body })
    }

    /// Encodes into the 21-byte binary form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bz = Vec::with_capacity(ADDRESS_LEN);
        bz.push(self.kind as u8);
        bz.extend_from_slice(&self.body);
        bz
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn body(&self) -> &[u8; BODY_LEN] {
        &self.body
    }

    pub fn is_contract(&self) -> bool {
        self.kind == Kind::Contract
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            Kind::Account => ACCOUNT_PREFIX,
            Kind::Contract => CONTRACT_PREFIX,
        };
        write!(f, "{}{}", prefix, hex::encode(self.body))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = if s.starts_with(ACCOUNT_PREFIX) {
            Kind::Account
        } else if s.starts_with(CONTRACT_PREFIX) {
            Kind::Contract
        } else {
            return Err(Error::UnknownPrefix);
        };
        let digits = &s[2..];
        if digits.len() != BODY_LEN * 2 {
            return Err(Error::InvalidLength(digits.len() / 2));
        }
        let mut body = [0u8; BODY_LEN];
        hex::decode_to_slice(digits, &mut body)?;
        Ok(Self { kind, body })
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(feature = "arb")]
impl quickcheck::Arbitrary for Address {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let mut body = [0u8; BODY_LEN];
        for b in body.iter_mut() {
            *b = u8::arbitrary(g);
        }
        if bool::arbitrary(g) {
            Address::new_contract(body)
        } else {
            Address::new_account(body)
        }
    }
}
