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


use bls12_381_plus::{G1Projective, Scalar};
use crate::{errors::Error, schemes::algorithms::SchemeVariant, utils::codec::{kind, ByteReader, ByteWriter, Encodable}};

/// Linear encryption `(T1, T2, T3)` of the signer's `A`, with the
/// Fiat-Shamir challenge and responses of the proof of knowledge.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Bbs04Signature {
    pub T1: G1Projective,
    pub T2: G1Projective,
    pub T3: G1Projective,
    pub c: Scalar,
    pub s_alpha: Scalar,
    pub s_beta: Scalar,
    pub s_x: Scalar,
    pub s_delta1: Scalar,
    pub s_delta2: Scalar,
}

impl Encodable for Bbs04Signature {
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new(SchemeVariant::Bbs04, kind::SIGNATURE);
        w.g1(&self.T1).g1(&self.T2).g1(&self.T3)
            .scalar(&self.c)
            .scalar(&self.s_alpha)
            .scalar(&self.s_beta)
            .scalar(&self.s_x)
            .scalar(&self.s_delta1)
            .scalar(&self.s_delta2);
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut r = ByteReader::open(bytes, SchemeVariant::Bbs04, kind::SIGNATURE)?;
        let sig = Self {
            T1: r.g1()?,
            T2: r.g1()?,
            T3: r.g1()?,
            c: r.scalar()?,
            s_alpha: r.scalar()?,
            s_beta: r.scalar()?,
            s_x: r.scalar()?,
            s_delta1: r.scalar()?,
            s_delta2: r.scalar()?,
        };
        r.finish()?;
        Ok(sig)
    }
}
