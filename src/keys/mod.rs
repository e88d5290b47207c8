// Copyright 2023 Fondazione LINKS

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

//     http://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Scheme-tagged key material. Every enum below wraps the concrete key of
//! one scheme and exports as a buffer whose first byte is the scheme code.

use crate::{
    backend::default_backend,
    bbs04::keys::{Bbs04GroupKey, Bbs04ManagerKey, Bbs04MemberKey},
    errors::Error,
    gl19::keys::{Gl19BlindingKey, Gl19ConverterKey, Gl19GroupKey, Gl19IssuerKey, Gl19MemberKey},
    ps16::keys::{Ps16GroupKey, Ps16ManagerKey, Ps16MemberKey},
    schemes::algorithms::SchemeVariant,
    utils::codec::{impl_hex_serde, kind, peek_kind, peek_scheme, Encodable},
};

fn mismatch(what: &str, expected: SchemeVariant, found: SchemeVariant) -> Error {
    Error::SchemeMismatchError(format!("{what} belongs to {found}, expected {expected}"))
}

/// Public parameters shared by every participant of a group.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GroupKey {
    Bbs04(Bbs04GroupKey),
    Ps16(Ps16GroupKey),
    Gl19(Gl19GroupKey),
}

impl GroupKey {

    pub fn scheme(&self) -> SchemeVariant {
        match self {
            GroupKey::Bbs04(_) => SchemeVariant::Bbs04,
            GroupKey::Ps16(_) => SchemeVariant::Ps16,
            GroupKey::Gl19(_) => SchemeVariant::Gl19,
        }
    }

    pub(crate) fn bbs04(&self) -> Result<&Bbs04GroupKey, Error> {
        match self {
            GroupKey::Bbs04(k) => Ok(k),
            other => Err(mismatch("group key", SchemeVariant::Bbs04, other.scheme())),
        }
    }

    pub(crate) fn ps16(&self) -> Result<&Ps16GroupKey, Error> {
        match self {
            GroupKey::Ps16(k) => Ok(k),
            other => Err(mismatch("group key", SchemeVariant::Ps16, other.scheme())),
        }
    }

    pub(crate) fn gl19(&self) -> Result<&Gl19GroupKey, Error> {
        match self {
            GroupKey::Gl19(k) => Ok(k),
            other => Err(mismatch("group key", SchemeVariant::Gl19, other.scheme())),
        }
    }
}

impl Encodable for GroupKey {
    fn to_bytes(&self) -> Vec<u8> {
        match self {
            GroupKey::Bbs04(k) => k.to_bytes(),
            GroupKey::Ps16(k) => k.to_bytes(),
            GroupKey::Gl19(k) => k.to_bytes(),
        }
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        match peek_scheme(bytes)? {
            SchemeVariant::Bbs04 => Bbs04GroupKey::from_bytes(bytes).map(GroupKey::Bbs04),
            SchemeVariant::Ps16 => Ps16GroupKey::from_bytes(bytes).map(GroupKey::Ps16),
            SchemeVariant::Gl19 => Gl19GroupKey::from_bytes(bytes).map(GroupKey::Gl19),
        }
    }
}

/// What an authority key may be used for.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AuthorityRole {
    /// Issues credentials and opens signatures (BBS04, PS16)
    IssuerOpener,
    /// Issues credentials only (GL19)
    Issuer,
    /// Converts blinded signatures (GL19)
    Converter,
}

impl AuthorityRole {
    pub fn can_issue(&self) -> bool {
        matches!(self, AuthorityRole::IssuerOpener | AuthorityRole::Issuer)
    }
}

/// Private key of an authority. The two GL19 keys share a scheme but
/// are distinct variants and are never accepted in place of each other.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ManagerKey {
    Bbs04(Bbs04ManagerKey),
    Ps16(Ps16ManagerKey),
    Gl19Issuer(Gl19IssuerKey),
    Gl19Converter(Gl19ConverterKey),
}

impl ManagerKey {

    pub fn scheme(&self) -> SchemeVariant {
        match self {
            ManagerKey::Bbs04(_) => SchemeVariant::Bbs04,
            ManagerKey::Ps16(_) => SchemeVariant::Ps16,
            ManagerKey::Gl19Issuer(_) | ManagerKey::Gl19Converter(_) => SchemeVariant::Gl19,
        }
    }

    pub fn role(&self) -> AuthorityRole {
        match self {
            ManagerKey::Bbs04(_) | ManagerKey::Ps16(_) => AuthorityRole::IssuerOpener,
            ManagerKey::Gl19Issuer(_) => AuthorityRole::Issuer,
            ManagerKey::Gl19Converter(_) => AuthorityRole::Converter,
        }
    }

    pub(crate) fn bbs04(&self) -> Result<&Bbs04ManagerKey, Error> {
        match self {
            ManagerKey::Bbs04(k) => Ok(k),
            other => Err(mismatch("manager key", SchemeVariant::Bbs04, other.scheme())),
        }
    }

    pub(crate) fn ps16(&self) -> Result<&Ps16ManagerKey, Error> {
        match self {
            ManagerKey::Ps16(k) => Ok(k),
            other => Err(mismatch("manager key", SchemeVariant::Ps16, other.scheme())),
        }
    }
}

impl Encodable for ManagerKey {
    fn to_bytes(&self) -> Vec<u8> {
        match self {
            ManagerKey::Bbs04(k) => k.to_bytes(),
            ManagerKey::Ps16(k) => k.to_bytes(),
            ManagerKey::Gl19Issuer(k) => k.to_bytes(),
            ManagerKey::Gl19Converter(k) => k.to_bytes(),
        }
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        match (peek_scheme(bytes)?, peek_kind(bytes)?) {
            (SchemeVariant::Bbs04, _) => Bbs04ManagerKey::from_bytes(bytes).map(ManagerKey::Bbs04),
            (SchemeVariant::Ps16, _) => Ps16ManagerKey::from_bytes(bytes).map(ManagerKey::Ps16),
            (SchemeVariant::Gl19, kind::CONVERTER_KEY) => Gl19ConverterKey::from_bytes(bytes).map(ManagerKey::Gl19Converter),
            (SchemeVariant::Gl19, _) => Gl19IssuerKey::from_bytes(bytes).map(ManagerKey::Gl19Issuer),
        }
    }
}

/// A member's signing credential, filled progressively by the join protocol.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MemberKey {
    Bbs04(Bbs04MemberKey),
    Ps16(Ps16MemberKey),
    Gl19(Gl19MemberKey),
}

impl MemberKey {

    /// An empty key, ready to be passed to the first member join step.
    pub fn new(scheme: SchemeVariant) -> Self {
        match scheme {
            SchemeVariant::Bbs04 => MemberKey::Bbs04(Bbs04MemberKey::default()),
            SchemeVariant::Ps16 => MemberKey::Ps16(Ps16MemberKey::default()),
            SchemeVariant::Gl19 => MemberKey::Gl19(Gl19MemberKey::default()),
        }
    }

    pub fn scheme(&self) -> SchemeVariant {
        match self {
            MemberKey::Bbs04(_) => SchemeVariant::Bbs04,
            MemberKey::Ps16(_) => SchemeVariant::Ps16,
            MemberKey::Gl19(_) => SchemeVariant::Gl19,
        }
    }

    /// Whether the join protocol has completed and the key can sign
    pub fn is_complete(&self) -> bool {
        match self {
            MemberKey::Bbs04(k) => k.is_complete(),
            MemberKey::Ps16(k) => k.is_complete(),
            MemberKey::Gl19(k) => k.is_complete(),
        }
    }

    pub(crate) fn bbs04(&self) -> Result<&Bbs04MemberKey, Error> {
        match self {
            MemberKey::Bbs04(k) => Ok(k),
            other => Err(mismatch("member key", SchemeVariant::Bbs04, other.scheme())),
        }
    }

    pub(crate) fn bbs04_mut(&mut self) -> Result<&mut Bbs04MemberKey, Error> {
        match self {
            MemberKey::Bbs04(k) => Ok(k),
            other => Err(mismatch("member key", SchemeVariant::Bbs04, other.scheme())),
        }
    }

    pub(crate) fn ps16(&self) -> Result<&Ps16MemberKey, Error> {
        match self {
            MemberKey::Ps16(k) => Ok(k),
            other => Err(mismatch("member key", SchemeVariant::Ps16, other.scheme())),
        }
    }

    pub(crate) fn ps16_mut(&mut self) -> Result<&mut Ps16MemberKey, Error> {
        match self {
            MemberKey::Ps16(k) => Ok(k),
            other => Err(mismatch("member key", SchemeVariant::Ps16, other.scheme())),
        }
    }

    pub(crate) fn gl19(&self) -> Result<&Gl19MemberKey, Error> {
        match self {
            MemberKey::Gl19(k) => Ok(k),
            other => Err(mismatch("member key", SchemeVariant::Gl19, other.scheme())),
        }
    }

    pub(crate) fn gl19_mut(&mut self) -> Result<&mut Gl19MemberKey, Error> {
        match self {
            MemberKey::Gl19(k) => Ok(k),
            other => Err(mismatch("member key", SchemeVariant::Gl19, other.scheme())),
        }
    }
}

impl Encodable for MemberKey {
    fn to_bytes(&self) -> Vec<u8> {
        match self {
            MemberKey::Bbs04(k) => k.to_bytes(),
            MemberKey::Ps16(k) => k.to_bytes(),
            MemberKey::Gl19(k) => k.to_bytes(),
        }
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        match peek_scheme(bytes)? {
            SchemeVariant::Bbs04 => Bbs04MemberKey::from_bytes(bytes).map(MemberKey::Bbs04),
            SchemeVariant::Ps16 => Ps16MemberKey::from_bytes(bytes).map(MemberKey::Ps16),
            SchemeVariant::Gl19 => Gl19MemberKey::from_bytes(bytes).map(MemberKey::Gl19),
        }
    }
}

/// Keypair under which a member blinds signatures before handing them to
/// the converter. May hold only the public half.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum BlindingKey {
    Gl19(Gl19BlindingKey),
}

impl BlindingKey {

    /// A fresh keypair for blinding signatures of the group behind `grpkey`.
    pub fn random(grpkey: &GroupKey) -> Result<BlindingKey, Error> {
        default_backend(grpkey.scheme()).blinding_key(&mut rand::thread_rng(), grpkey)
    }

    pub fn scheme(&self) -> SchemeVariant {
        match self {
            BlindingKey::Gl19(_) => SchemeVariant::Gl19,
        }
    }

    pub fn has_private(&self) -> bool {
        match self {
            BlindingKey::Gl19(k) => k.sk.is_some(),
        }
    }

    /// Copy holding only the public half
    pub fn public_key(&self) -> BlindingKey {
        match self {
            BlindingKey::Gl19(k) => BlindingKey::Gl19(k.public_key()),
        }
    }

    /// Hex export including the private half, when present
    pub fn export(&self) -> String {
        self.encode()
    }

    /// Hex export of the public half only
    pub fn export_pub(&self) -> String {
        self.public_key().encode()
    }

    pub(crate) fn gl19(&self) -> Result<&Gl19BlindingKey, Error> {
        match self {
            BlindingKey::Gl19(k) => Ok(k),
        }
    }
}

impl Encodable for BlindingKey {
    fn to_bytes(&self) -> Vec<u8> {
        match self {
            BlindingKey::Gl19(k) => k.to_bytes(),
        }
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        match peek_scheme(bytes)? {
            SchemeVariant::Gl19 => Gl19BlindingKey::from_bytes(bytes).map(BlindingKey::Gl19),
            other => Err(Error::DecodeError(format!("{other} has no blinding keys"))),
        }
    }
}

impl_hex_serde!(GroupKey);
impl_hex_serde!(ManagerKey);
impl_hex_serde!(MemberKey);
impl_hex_serde!(BlindingKey);
