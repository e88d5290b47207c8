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


use bls12_381_plus::{G1Projective, G2Projective};
use crate::{errors::Error, schemes::algorithms::SchemeVariant, utils::codec::{impl_hex_serde, kind, peek_scheme, ByteReader, ByteWriter, Encodable}};

/// Tracing material stored for one member.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GmlEntry {
    /// The member's `A`
    Bbs04 { A: G1Projective },
    /// `tau = g^sk` and `ttau = Y^sk`
    Ps16 { tau: G1Projective, ttau: G2Projective },
    /// `H = h1^y` and the credential expiration
    Gl19 { H: G1Projective, expiration: u64 },
}

impl GmlEntry {
    pub fn scheme(&self) -> SchemeVariant {
        match self {
            GmlEntry::Bbs04 { .. } => SchemeVariant::Bbs04,
            GmlEntry::Ps16 { .. } => SchemeVariant::Ps16,
            GmlEntry::Gl19 { .. } => SchemeVariant::Gl19,
        }
    }
}

/// Group membership list: append-only, the position of an entry is the
/// index of the member it was added for.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Gml {
    scheme: SchemeVariant,
    entries: Vec<GmlEntry>,
}

impl Gml {

    pub fn new(scheme: SchemeVariant) -> Self {
        Self { scheme, entries: Vec::new() }
    }

    pub fn scheme(&self) -> SchemeVariant {
        self.scheme
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: u64) -> Option<&GmlEntry> {
        usize::try_from(index).ok().and_then(|i| self.entries.get(i))
    }

    pub fn entries(&self) -> &[GmlEntry] {
        &self.entries
    }

    /// Appends `entry` and returns its index
    pub(crate) fn push(&mut self, entry: GmlEntry) -> Result<u64, Error> {
        self.scheme.expect(entry.scheme(), "membership entry")?;
        self.entries.push(entry);
        Ok(self.entries.len() as u64 - 1)
    }
}

impl Encodable for Gml {
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new(self.scheme, kind::GML);
        w.u64(self.entries.len() as u64);
        for entry in &self.entries {
            match entry {
                GmlEntry::Bbs04 { A } => { w.g1(A); }
                GmlEntry::Ps16 { tau, ttau } => { w.g1(tau).g2(ttau); }
                GmlEntry::Gl19 { H, expiration } => { w.g1(H).u64(*expiration); }
            }
        }
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let scheme = peek_scheme(bytes)?;
        let mut r = ByteReader::open(bytes, scheme, kind::GML)?;
        let n = r.u64()?;
        let mut gml = Gml::new(scheme);
        for _ in 0..n {
            let entry = match scheme {
                SchemeVariant::Bbs04 => GmlEntry::Bbs04 { A: r.g1()? },
                SchemeVariant::Ps16 => GmlEntry::Ps16 { tau: r.g1()?, ttau: r.g2()? },
                SchemeVariant::Gl19 => GmlEntry::Gl19 { H: r.g1()?, expiration: r.u64()? },
            };
            gml.entries.push(entry);
        }
        r.finish()?;
        Ok(gml)
    }
}

impl_hex_serde!(Gml);
