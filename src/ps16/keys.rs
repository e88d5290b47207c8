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
use crate::{errors::Error, schemes::algorithms::SchemeVariant, utils::codec::{kind, ByteReader, ByteWriter, Encodable}};

const SCHEME: SchemeVariant = SchemeVariant::Ps16;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Ps16GroupKey {
    pub g: G1Projective,
    pub gg: G2Projective,
    /// `gg^x`
    pub X: G2Projective,
    /// `gg^y`
    pub Y: G2Projective,
}

impl Encodable for Ps16GroupKey {
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new(SCHEME, kind::GROUP_KEY);
        w.g1(&self.g).g2(&self.gg).g2(&self.X).g2(&self.Y);
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut r = ByteReader::open(bytes, SCHEME, kind::GROUP_KEY)?;
        let key = Self { g: r.g1()?, gg: r.g2()?, X: r.g2()?, Y: r.g2()? };
        r.finish()?;
        Ok(key)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Ps16ManagerKey {
    pub x: Scalar,
    pub y: Scalar,
}

impl Encodable for Ps16ManagerKey {
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new(SCHEME, kind::OPENER_KEY);
        w.scalar(&self.x).scalar(&self.y);
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut r = ByteReader::open(bytes, SCHEME, kind::OPENER_KEY)?;
        let key = Self { x: r.scalar()?, y: r.scalar()? };
        r.finish()?;
        Ok(key)
    }
}

/// PS signature `(sigma1, sigma2)` on the member's `sk`
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Ps16Credential {
    pub sigma1: G1Projective,
    pub sigma2: G1Projective,
}

/// A PS16 member key: `sk` is chosen on the member's first step and the
/// credential arrives on the last one.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Ps16MemberKey {
    pub sk: Option<Scalar>,
    pub credential: Option<Ps16Credential>,
}

impl Ps16MemberKey {
    pub fn is_complete(&self) -> bool {
        self.sk.is_some() && self.credential.is_some()
    }
}

impl Encodable for Ps16MemberKey {
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new(SCHEME, kind::MEMBER_KEY);
        w.flag(self.sk.is_some());
        if let Some(sk) = &self.sk {
            w.scalar(sk);
        }
        w.flag(self.credential.is_some());
        if let Some(cred) = &self.credential {
            w.g1(&cred.sigma1).g1(&cred.sigma2);
        }
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut r = ByteReader::open(bytes, SCHEME, kind::MEMBER_KEY)?;
        let sk = if r.flag()? { Some(r.scalar()?) } else { None };
        let credential = if r.flag()? {
            Some(Ps16Credential { sigma1: r.g1()?, sigma2: r.g1()? })
        } else {
            None
        };
        r.finish()?;
        Ok(Self { sk, credential })
    }
}
