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


use crate::{errors::Error, schemes::algorithms::SchemeVariant, spk::PairingProof, utils::codec::{kind, ByteReader, ByteWriter, Encodable}};

/// Proof that the opener knows `ttau` with `e(sigma1, ttau) = e(sigma2, gg) / e(sigma1, X)`,
/// bound to the opened signature and index.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Ps16OpenProof(pub PairingProof);

impl Encodable for Ps16OpenProof {
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new(SchemeVariant::Ps16, kind::PROOF);
        self.0.write(&mut w);
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut r = ByteReader::open(bytes, SchemeVariant::Ps16, kind::PROOF)?;
        let proof = PairingProof::read(&mut r)?;
        r.finish()?;
        Ok(Self(proof))
    }
}
