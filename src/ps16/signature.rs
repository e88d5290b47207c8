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

/// A randomized credential `(sigma1, sigma2)` and a proof of knowledge of `sk`
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Ps16Signature {
    pub sigma1: G1Projective,
    pub sigma2: G1Projective,
    pub c: Scalar,
    pub s: Scalar,
}

impl Encodable for Ps16Signature {
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new(SchemeVariant::Ps16, kind::SIGNATURE);
        w.g1(&self.sigma1).g1(&self.sigma2).scalar(&self.c).scalar(&self.s);
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut r = ByteReader::open(bytes, SchemeVariant::Ps16, kind::SIGNATURE)?;
        let sig = Self { sigma1: r.g1()?, sigma2: r.g1()?, c: r.scalar()?, s: r.scalar()? };
        r.finish()?;
        Ok(sig)
    }
}
