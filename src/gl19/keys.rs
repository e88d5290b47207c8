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


use bls12_381_plus::{G1Projective, G2Projective, Scalar};
use crate::{errors::Error, schemes::algorithms::SchemeVariant, utils::codec::{kind, peek_kind, ByteReader, ByteWriter, Encodable}};

const SCHEME: SchemeVariant = SchemeVariant::Gl19;

/// Public parameters contributed by the converter
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Gl19ConverterParams {
    /// `g^csk`, under which signature pseudonyms are encrypted
    pub cpk: G1Projective,
    /// `g^esk`, under which `h^y` is escrowed
    pub epk: G1Projective,
}

/// GL19 group key. Partial (no converter parameters) between the issuer's
/// first setup phase and the converter's phase.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Gl19GroupKey {
    pub g1: G1Projective,
    pub g: G1Projective,
    pub h: G1Projective,
    pub h1: G1Projective,
    pub h2: G1Projective,
    pub h3: G1Projective,
    pub g2: G2Projective,
    /// `g2^isk`
    pub ipk: G2Projective,
    pub converter: Option<Gl19ConverterParams>,
}

impl Gl19GroupKey {

    pub fn is_complete(&self) -> bool {
        self.converter.is_some()
    }

    pub(crate) fn converter_params(&self) -> Result<&Gl19ConverterParams, Error> {
        self.converter.as_ref()
            .ok_or_else(|| Error::SchemeMismatchError("the GL19 group key lacks the converter parameters".to_owned()))
    }

    /// Whether both keys carry the same issuer parameters
    pub fn same_issuer(&self, other: &Gl19GroupKey) -> bool {
        self.g1 == other.g1
            && self.g == other.g
            && self.h == other.h
            && self.h1 == other.h1
            && self.h2 == other.h2
            && self.h3 == other.h3
            && self.g2 == other.g2
            && self.ipk == other.ipk
    }
}

impl Encodable for Gl19GroupKey {
    fn to_bytes(&self) -> Vec<u8> {
        let k = if self.is_complete() { kind::GROUP_KEY } else { kind::GROUP_KEY_PARTIAL };
        let mut w = ByteWriter::new(SCHEME, k);
        w.g1(&self.g1).g1(&self.g).g1(&self.h).g1(&self.h1).g1(&self.h2).g1(&self.h3)
            .g2(&self.g2)
            .g2(&self.ipk);
        if let Some(c) = &self.converter {
            w.g1(&c.cpk).g1(&c.epk);
        }
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let complete = peek_kind(bytes)? == kind::GROUP_KEY;
        let k = if complete { kind::GROUP_KEY } else { kind::GROUP_KEY_PARTIAL };
        let mut r = ByteReader::open(bytes, SCHEME, k)?;
        let mut key = Self {
            g1: r.g1()?,
            g: r.g1()?,
            h: r.g1()?,
            h1: r.g1()?,
            h2: r.g1()?,
            h3: r.g1()?,
            g2: r.g2()?,
            ipk: r.g2()?,
            converter: None,
        };
        if complete {
            key.converter = Some(Gl19ConverterParams { cpk: r.g1()?, epk: r.g1()? });
        }
        r.finish()?;
        Ok(key)
    }
}

/// The issuer's key. Only used for join.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Gl19IssuerKey {
    pub isk: Scalar,
}

impl Encodable for Gl19IssuerKey {
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new(SCHEME, kind::ISSUER_KEY);
        w.scalar(&self.isk);
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut r = ByteReader::open(bytes, SCHEME, kind::ISSUER_KEY)?;
        let key = Self { isk: r.scalar()? };
        r.finish()?;
        Ok(key)
    }
}

/// The converter's key. Only used for convert.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Gl19ConverterKey {
    pub csk: Scalar,
    pub esk: Scalar,
}

impl Encodable for Gl19ConverterKey {
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new(SCHEME, kind::CONVERTER_KEY);
        w.scalar(&self.csk).scalar(&self.esk);
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut r = ByteReader::open(bytes, SCHEME, kind::CONVERTER_KEY)?;
        let key = Self { csk: r.scalar()?, esk: r.scalar()? };
        r.finish()?;
        Ok(key)
    }
}

/// Member secret `y` with its public `H = h1^y`
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Gl19Secret {
    pub y: Scalar,
    pub H: G1Projective,
}

/// `A = (g1 * H * h2^s * h3^d)^(1/(isk + x))`, where `d` hashes the expiration `l`
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Gl19Credential {
    pub A: G1Projective,
    pub x: Scalar,
    pub s: Scalar,
    pub l: u64,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Gl19MemberKey {
    pub secret: Option<Gl19Secret>,
    pub credential: Option<Gl19Credential>,
}

impl Gl19MemberKey {

    pub fn is_complete(&self) -> bool {
        self.secret.is_some() && self.credential.is_some()
    }

    /// Expiration of the credential, in unix seconds
    pub fn expiration(&self) -> Option<u64> {
        self.credential.as_ref().map(|c| c.l)
    }
}

impl Encodable for Gl19MemberKey {
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new(SCHEME, kind::MEMBER_KEY);
        w.flag(self.secret.is_some());
        if let Some(secret) = &self.secret {
            w.scalar(&secret.y).g1(&secret.H);
        }
        w.flag(self.credential.is_some());
        if let Some(cred) = &self.credential {
            w.g1(&cred.A).scalar(&cred.x).scalar(&cred.s).u64(cred.l);
        }
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut r = ByteReader::open(bytes, SCHEME, kind::MEMBER_KEY)?;
        let secret = if r.flag()? {
            Some(Gl19Secret { y: r.scalar()?, H: r.g1()? })
        } else {
            None
        };
        let credential = if r.flag()? {
            Some(Gl19Credential { A: r.g1()?, x: r.scalar()?, s: r.scalar()?, l: r.u64()? })
        } else {
            None
        };
        r.finish()?;
        Ok(Self { secret, credential })
    }
}

/// ElGamal keypair `pk = g^sk` under which blinded signatures travel.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Gl19BlindingKey {
    pub pk: G1Projective,
    pub sk: Option<Scalar>,
}

impl Gl19BlindingKey {

    pub fn public_key(&self) -> Self {
        Self { pk: self.pk, sk: None }
    }

    pub(crate) fn private_key(&self) -> Result<&Scalar, Error> {
        self.sk.as_ref()
            .ok_or_else(|| Error::UnblindError("unblinding requires the private blinding key".to_owned()))
    }
}

impl Encodable for Gl19BlindingKey {
    fn to_bytes(&self) -> Vec<u8> {
        let k = if self.sk.is_some() { kind::BLINDING_KEY } else { kind::BLINDING_KEY_PUBLIC };
        let mut w = ByteWriter::new(SCHEME, k);
        w.g1(&self.pk);
        if let Some(sk) = &self.sk {
            w.scalar(sk);
        }
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let full = peek_kind(bytes)? == kind::BLINDING_KEY;
        let k = if full { kind::BLINDING_KEY } else { kind::BLINDING_KEY_PUBLIC };
        let mut r = ByteReader::open(bytes, SCHEME, k)?;
        let pk = r.g1()?;
        let sk = if full { Some(r.scalar()?) } else { None };
        r.finish()?;
        Ok(Self { pk, sk })
    }
}
