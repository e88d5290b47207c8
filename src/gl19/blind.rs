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


use bls12_381_plus::G1Projective;
use crate::{errors::Error, schemes::{algorithms::SchemeVariant, generics::BlindStage}, utils::codec::{kind, peek_kind, ByteReader, ByteWriter, Encodable}};

/// A signature pseudonym and message digest encrypted under a blinding key.
///
/// Blinded: `(nym1, nym3)` is the pseudonym doubly encrypted under the
/// converter and blinding keys, `nym2` the blinding randomness.
/// Converted: `(nym1, nym2)` encrypts the batch-randomized pseudonym under
/// the blinding key only, and `nym3` is gone.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Gl19BlindSignature {
    pub stage: BlindStage,
    pub nym1: G1Projective,
    pub nym2: G1Projective,
    pub nym3: Option<G1Projective>,
    /// ElGamal encryption `(c1, c2)` of the hashed message
    pub c1: G1Projective,
    pub c2: G1Projective,
}

impl Encodable for Gl19BlindSignature {
    fn to_bytes(&self) -> Vec<u8> {
        let k = match self.stage {
            BlindStage::Blinded => kind::BLINDED_SIGNATURE,
            BlindStage::Converted => kind::CONVERTED_SIGNATURE,
        };
        let mut w = ByteWriter::new(SchemeVariant::Gl19, k);
        w.g1(&self.nym1).g1(&self.nym2);
        if let Some(nym3) = &self.nym3 {
            w.g1(nym3);
        }
        w.g1(&self.c1).g1(&self.c2);
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let stage = match peek_kind(bytes)? {
            kind::CONVERTED_SIGNATURE => BlindStage::Converted,
            _ => BlindStage::Blinded,
        };
        let k = match stage {
            BlindStage::Blinded => kind::BLINDED_SIGNATURE,
            BlindStage::Converted => kind::CONVERTED_SIGNATURE,
        };
        let mut r = ByteReader::open(bytes, SchemeVariant::Gl19, k)?;
        let nym1 = r.g1()?;
        let nym2 = r.g1()?;
        let nym3 = match stage {
            BlindStage::Blinded => Some(r.g1()?),
            BlindStage::Converted => None,
        };
        let sig = Self { stage, nym1, nym2, nym3, c1: r.g1()?, c2: r.g1()? };
        r.finish()?;
        Ok(sig)
    }
}
