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
use crate::{errors::Error, schemes::algorithms::SchemeVariant, spk::RepProof, utils::codec::{kind, ByteReader, ByteWriter, Encodable}};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Gl19Signature {
    /// `A^r1`
    pub AA: G1Projective,
    /// `AA^isk`, checked with a pairing against `ipk`
    pub A_: G1Projective,
    pub d: G1Projective,
    /// Pseudonym `(g^alpha, cpk^alpha * h^y)`, encrypted under the converter key
    pub nym1: G1Projective,
    pub nym2: G1Projective,
    /// `h^y` escrowed under `epk`
    pub ehy1: G1Projective,
    pub ehy2: G1Projective,
    pub pi: RepProof,
    /// Expiration of the signing credential, in unix seconds
    pub expiration: u64,
}

impl Encodable for Gl19Signature {
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new(SchemeVariant::Gl19, kind::SIGNATURE);
        w.g1(&self.AA).g1(&self.A_).g1(&self.d)
            .g1(&self.nym1).g1(&self.nym2)
            .g1(&self.ehy1).g1(&self.ehy2);
        self.pi.write(&mut w);
        w.u64(self.expiration);
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut r = ByteReader::open(bytes, SchemeVariant::Gl19, kind::SIGNATURE)?;
        let sig = Self {
            AA: r.g1()?,
            A_: r.g1()?,
            d: r.g1()?,
            nym1: r.g1()?,
            nym2: r.g1()?,
            ehy1: r.g1()?,
            ehy2: r.g1()?,
            pi: RepProof::read(&mut r)?,
            expiration: r.u64()?,
        };
        r.finish()?;
        Ok(sig)
    }
}
