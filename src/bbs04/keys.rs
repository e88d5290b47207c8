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

const SCHEME: SchemeVariant = SchemeVariant::Bbs04;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Bbs04GroupKey {
    pub g1: G1Projective,
    pub g2: G2Projective,
    pub h: G1Projective,
    /// `h^(1/xi1)`
    pub u: G1Projective,
    /// `h^(1/xi2)`
    pub v: G1Projective,
    /// `g2^gamma`
    pub w: G2Projective,
}

impl Encodable for Bbs04GroupKey {
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new(SCHEME, kind::GROUP_KEY);
        w.g1(&self.g1).g2(&self.g2).g1(&self.h).g1(&self.u).g1(&self.v).g2(&self.w);
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut r = ByteReader::open(bytes, SCHEME, kind::GROUP_KEY)?;
        let key = Self { g1: r.g1()?, g2: r.g2()?, h: r.g1()?, u: r.g1()?, v: r.g1()?, w: r.g2()? };
        r.finish()?;
        Ok(key)
    }
}

/// Opening key `(xi1, xi2)` and issuing key `gamma`
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Bbs04ManagerKey {
    pub xi1: Scalar,
    pub xi2: Scalar,
    pub gamma: Scalar,
}

impl Encodable for Bbs04ManagerKey {
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new(SCHEME, kind::OPENER_KEY);
        w.scalar(&self.xi1).scalar(&self.xi2).scalar(&self.gamma);
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut r = ByteReader::open(bytes, SCHEME, kind::OPENER_KEY)?;
        let key = Self { xi1: r.scalar()?, xi2: r.scalar()?, gamma: r.scalar()? };
        r.finish()?;
        Ok(key)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Bbs04Credential {
    pub x: Scalar,
    pub A: G1Projective,
}

/// A BBS04 member key. Empty until the member processes the manager's join message.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Bbs04MemberKey {
    pub credential: Option<Bbs04Credential>,
}

impl Bbs04MemberKey {
    pub fn is_complete(&self) -> bool {
        self.credential.is_some()
    }
}

impl Encodable for Bbs04MemberKey {
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new(SCHEME, kind::MEMBER_KEY);
        w.flag(self.credential.is_some());
        if let Some(cred) = &self.credential {
            w.scalar(&cred.x).g1(&cred.A);
        }
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut r = ByteReader::open(bytes, SCHEME, kind::MEMBER_KEY)?;
        let credential = if r.flag()? {
            Some(Bbs04Credential { x: r.scalar()?, A: r.g1()? })
        } else {
            None
        };
        r.finish()?;
        Ok(Self { credential })
    }
}
