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


use core::fmt;
use core::hash::{Hash, Hasher};
use crate::{
    errors::Error,
    schemes::{algorithms::SchemeVariant, generics::Proof},
    utils::codec::{impl_hex_serde, kind, peek_scheme, ByteReader, ByteWriter, Encodable},
};

/// Who signed, as recovered by opening or unblinding.
///
/// Two identities are equal when their canonical forms are; the optional
/// message recovered alongside is not compared.
#[derive(Clone, Debug)]
pub struct Identity {
    scheme: SchemeVariant,
    canonical: String,
    message: Option<String>,
}

impl Identity {

    pub fn new(scheme: SchemeVariant, canonical: String) -> Self {
        Self { scheme, canonical, message: None }
    }

    pub fn with_message(mut self, message: String) -> Self {
        self.message = Some(message);
        self
    }

    /// Identity of the member at `index` of the membership list
    pub(crate) fn from_index(scheme: SchemeVariant, index: u64) -> Self {
        Self::new(scheme, index.to_string())
    }

    pub fn scheme(&self) -> SchemeVariant {
        self.scheme
    }

    /// Canonical printable form
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for Identity {}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl Identity {
    fn write(&self, w: &mut ByteWriter) {
        w.bytes(self.canonical.as_bytes()).flag(self.message.is_some());
        if let Some(m) = &self.message {
            w.bytes(m.as_bytes());
        }
    }

    fn read(scheme: SchemeVariant, r: &mut ByteReader<'_>) -> Result<Self, Error> {
        let text = |b: Vec<u8>| String::from_utf8(b).map_err(|e| Error::DecodeError(e.to_string()));
        let canonical = text(r.bytes()?)?;
        let message = if r.flag()? { Some(text(r.bytes()?)?) } else { None };
        Ok(Self { scheme, canonical, message })
    }
}

impl Encodable for Identity {
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new(self.scheme, kind::IDENTITY);
        self.write(&mut w);
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let scheme = peek_scheme(bytes)?;
        let mut r = ByteReader::open(bytes, scheme, kind::IDENTITY)?;
        let id = Self::read(scheme, &mut r)?;
        r.finish()?;
        Ok(id)
    }
}

fn write_proof(w: &mut ByteWriter, proof: Option<&Proof>) {
    w.flag(proof.is_some());
    if let Some(p) = proof {
        w.bytes(&p.to_bytes());
    }
}

fn read_proof(r: &mut ByteReader<'_>) -> Result<Option<Proof>, Error> {
    if r.flag()? {
        Ok(Some(Proof::from_bytes(&r.bytes()?)?))
    } else {
        Ok(None)
    }
}

/// Signer index paired with an optional opening proof.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct IndexProof {
    scheme: SchemeVariant,
    index: Option<u64>,
    proof: Option<Proof>,
}

impl IndexProof {

    /// Fails unless at least one part is present and the proof was produced under `scheme`.
    pub fn new(scheme: SchemeVariant, index: Option<u64>, proof: Option<Proof>) -> Result<Self, Error> {
        if index.is_none() && proof.is_none() {
            return Err(Error::OpenError("an index proof needs an index or a proof".to_owned()));
        }
        if let Some(p) = &proof {
            scheme.expect(p.scheme(), "proof")?;
        }
        Ok(Self { scheme, index, proof })
    }

    pub fn scheme(&self) -> SchemeVariant {
        self.scheme
    }

    pub fn index(&self) -> Option<u64> {
        self.index
    }

    /// Identity of the opened signer, when the index is known
    pub fn identity(&self) -> Option<Identity> {
        self.index.map(|i| Identity::from_index(self.scheme, i))
    }

    pub fn proof(&self) -> Option<&Proof> {
        self.proof.as_ref()
    }
}

impl Encodable for IndexProof {
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new(self.scheme, kind::INDEX_PROOF);
        w.flag(self.index.is_some());
        if let Some(i) = self.index {
            w.u64(i);
        }
        write_proof(&mut w, self.proof.as_ref());
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let scheme = peek_scheme(bytes)?;
        let mut r = ByteReader::open(bytes, scheme, kind::INDEX_PROOF)?;
        let index = if r.flag()? { Some(r.u64()?) } else { None };
        let proof = read_proof(&mut r)?;
        r.finish()?;
        Self::new(scheme, index, proof).map_err(|e| Error::DecodeError(e.to_string()))
    }
}

/// Identity paired with an optional proof.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct IdProof {
    scheme: SchemeVariant,
    identity: Option<Identity>,
    proof: Option<Proof>,
}

impl IdProof {

    /// Fails unless at least one part is present and both parts carry the same scheme.
    pub fn new(identity: Option<Identity>, proof: Option<Proof>) -> Result<Self, Error> {
        let scheme = match (&identity, &proof) {
            (None, None) => return Err(Error::OpenError("an identity proof needs an identity or a proof".to_owned())),
            (Some(id), Some(p)) => {
                id.scheme().expect(p.scheme(), "proof")?;
                id.scheme()
            }
            (Some(id), None) => id.scheme(),
            (None, Some(p)) => p.scheme(),
        };
        Ok(Self { scheme, identity, proof })
    }

    pub fn scheme(&self) -> SchemeVariant {
        self.scheme
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn proof(&self) -> Option<&Proof> {
        self.proof.as_ref()
    }
}

impl Encodable for IdProof {
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new(self.scheme, kind::ID_PROOF);
        w.flag(self.identity.is_some());
        if let Some(id) = &self.identity {
            id.write(&mut w);
        }
        write_proof(&mut w, self.proof.as_ref());
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let scheme = peek_scheme(bytes)?;
        let mut r = ByteReader::open(bytes, scheme, kind::ID_PROOF)?;
        let identity = if r.flag()? { Some(Identity::read(scheme, &mut r)?) } else { None };
        let proof = read_proof(&mut r)?;
        r.finish()?;
        Self::new(identity, proof).map_err(|e| Error::DecodeError(e.to_string()))
    }
}

impl_hex_serde!(Identity);
impl_hex_serde!(IndexProof);
impl_hex_serde!(IdProof);
