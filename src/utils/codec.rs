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


use bls12_381_plus::{G1Affine, G1Projective, G2Affine, G2Projective, Scalar};
use elliptic_curve::group::Curve;
use crate::{errors::Error, schemes::algorithms::SchemeVariant};

/// Object kind tags, stored in the second byte of every exported buffer.
pub(crate) mod kind {
    pub const GROUP_KEY: u8 = 0x01;
    pub const GROUP_KEY_PARTIAL: u8 = 0x02;
    pub const OPENER_KEY: u8 = 0x03;
    pub const ISSUER_KEY: u8 = 0x04;
    pub const CONVERTER_KEY: u8 = 0x05;
    pub const MEMBER_KEY: u8 = 0x06;
    pub const SIGNATURE: u8 = 0x07;
    pub const BLINDED_SIGNATURE: u8 = 0x08;
    pub const CONVERTED_SIGNATURE: u8 = 0x09;
    pub const BLINDING_KEY: u8 = 0x0a;
    pub const BLINDING_KEY_PUBLIC: u8 = 0x0b;
    pub const PROOF: u8 = 0x0c;
    pub const GML: u8 = 0x0d;
    pub const IDENTITY: u8 = 0x0e;
    pub const INDEX_PROOF: u8 = 0x0f;
    pub const ID_PROOF: u8 = 0x10;
    pub const JOIN_MESSAGE: u8 = 0x11;
}

/// Byte and text export shared by every scheme-tagged object.
pub trait Encodable: Sized {
    fn to_bytes(&self) -> Vec<u8>;

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>;

    /// Lowercase hex form of [`Encodable::to_bytes`]
    fn encode(&self) -> String {
        hex::encode(self.to_bytes())
    }

    fn decode(text: &str) -> Result<Self, Error> {
        Self::from_bytes(&decode_text(text)?)
    }
}

/// Hex to bytes. Fails with [`Error::TextDecodeError`], never [`Error::DecodeError`].
pub fn decode_text(text: &str) -> Result<Vec<u8>, Error> {
    hex::decode(text.trim()).map_err(|e| Error::TextDecodeError(e.to_string()))
}

/// Scheme of an exported buffer, read from its first byte
pub fn peek_scheme(bytes: &[u8]) -> Result<SchemeVariant, Error> {
    let code = bytes.first().ok_or_else(|| Error::DecodeError("empty buffer".to_owned()))?;
    SchemeVariant::from_code(*code)
}

pub(crate) fn peek_kind(bytes: &[u8]) -> Result<u8, Error> {
    bytes.get(1).copied().ok_or_else(|| Error::DecodeError("missing object kind".to_owned()))
}

/// Serializes the type as its [`Encodable::encode`] string.
macro_rules! impl_hex_serde {
    ($t:ty) => {
        impl serde::Serialize for $t {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&$crate::utils::codec::Encodable::encode(self))
            }
        }

        impl<'de> serde::Deserialize<'de> for $t {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = <String as serde::Deserialize>::deserialize(deserializer)?;
                <$t as $crate::utils::codec::Encodable>::decode(&text).map_err(serde::de::Error::custom)
            }
        }
    };
}
pub(crate) use impl_hex_serde;

pub(crate) struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new(scheme: SchemeVariant, kind: u8) -> Self {
        Self { buf: vec![scheme.code(), kind] }
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    pub fn flag(&mut self, v: bool) -> &mut Self {
        self.u8(v as u8)
    }

    pub fn u64(&mut self, v: u64) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn scalar(&mut self, s: &Scalar) -> &mut Self {
        self.buf.extend_from_slice(&s.to_be_bytes());
        self
    }

    pub fn g1(&mut self, p: &G1Projective) -> &mut Self {
        self.buf.extend_from_slice(&p.to_affine().to_compressed());
        self
    }

    pub fn g2(&mut self, p: &G2Projective) -> &mut Self {
        self.buf.extend_from_slice(&p.to_affine().to_compressed());
        self
    }

    /// Length-prefixed byte string
    pub fn bytes(&mut self, b: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(&(b.len() as u32).to_be_bytes());
        self.buf.extend_from_slice(b);
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {

    /// Checks the two header bytes and positions the reader on the payload.
    pub fn open(bytes: &'a [u8], scheme: SchemeVariant, kind: u8) -> Result<Self, Error> {
        let found = peek_scheme(bytes)?;
        scheme.expect(found, "encoded object")?;
        let found_kind = peek_kind(bytes)?;
        if found_kind != kind {
            return Err(Error::DecodeError(format!("unexpected object kind {found_kind:#04x}, expected {kind:#04x}")));
        }
        Ok(Self { bytes, pos: 2 })
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let end = self.pos.checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| Error::DecodeError("buffer too short".to_owned()))?;
        let out = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    pub fn flag(&mut self) -> Result<bool, Error> {
        match self.u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::DecodeError(format!("invalid flag {other}"))),
        }
    }

    pub fn u64(&mut self) -> Result<u64, Error> {
        Ok(u64::from_be_bytes(self.array::<8>()?))
    }

    pub fn scalar(&mut self) -> Result<Scalar, Error> {
        let bytes = self.array::<{ Scalar::BYTES }>()?;
        Option::<Scalar>::from(Scalar::from_be_bytes(&bytes))
            .ok_or_else(|| Error::DecodeError("invalid scalar".to_owned()))
    }

    pub fn g1(&mut self) -> Result<G1Projective, Error> {
        let bytes = self.array::<{ G1Affine::COMPRESSED_BYTES }>()?;
        Option::<G1Affine>::from(G1Affine::from_compressed(&bytes))
            .map(G1Projective::from)
            .ok_or_else(|| Error::DecodeError("invalid G1 point".to_owned()))
    }

    pub fn g2(&mut self) -> Result<G2Projective, Error> {
        let bytes = self.array::<{ G2Affine::COMPRESSED_BYTES }>()?;
        Option::<G2Affine>::from(G2Affine::from_compressed(&bytes))
            .map(G2Projective::from)
            .ok_or_else(|| Error::DecodeError("invalid G2 point".to_owned()))
    }

    pub fn bytes(&mut self) -> Result<Vec<u8>, Error> {
        let len = u32::from_be_bytes(self.array::<4>()?) as usize;
        Ok(self.take(len)?.to_vec())
    }

    /// Fails if any payload byte was left unread.
    pub fn finish(self) -> Result<(), Error> {
        if self.pos != self.bytes.len() {
            return Err(Error::DecodeError(format!("{} trailing bytes", self.bytes.len() - self.pos)));
        }
        Ok(())
    }
}
