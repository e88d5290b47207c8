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


//! Signatures of knowledge used by the schemes: discrete logarithm,
//! general representation over G1, and pre-images of the pairing
//! homomorphism `e(g, ·)` over G2.

use bls12_381_plus::{G1Projective, G2Projective, Gt, Scalar};
use group::Group;
use rand::RngCore;
use crate::{errors::Error, utils::{codec::{ByteReader, ByteWriter}, util::{pair, random_nonzero_scalar, Transcript}}};

const DLOG_DST: &[u8] = b"SPK_DLOG_";
const REP_DST: &[u8] = b"SPK_REP_";
const PAIRING_DST: &[u8] = b"SPK_PAIRING_G2_";

/// Proof of knowledge of `x` such that `G = g * x`
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DlogProof {
    pub c: Scalar,
    pub s: Scalar,
}

impl DlogProof {

    pub fn prove(rng: &mut dyn RngCore, G: &G1Projective, g: &G1Projective, x: &Scalar, msg: &[u8]) -> Result<Self, Error> {
        let r = random_nonzero_scalar(rng);
        let R = g * r;
        let c = Self::challenge(G, g, &R, msg)?;
        Ok(Self { c, s: r - c * x })
    }

    pub fn verify(&self, G: &G1Projective, g: &G1Projective, msg: &[u8]) -> Result<bool, Error> {
        let R = g * self.s + G * self.c;
        Ok(Self::challenge(G, g, &R, msg)? == self.c)
    }

    fn challenge(G: &G1Projective, g: &G1Projective, R: &G1Projective, msg: &[u8]) -> Result<Scalar, Error> {
        Transcript::new(msg).append_g1(g).append_g1(G).append_g1(R).challenge(DLOG_DST)
    }

    pub(crate) fn write(&self, w: &mut ByteWriter) {
        w.scalar(&self.c).scalar(&self.s);
    }

    pub(crate) fn read(r: &mut ByteReader<'_>) -> Result<Self, Error> {
        Ok(Self { c: r.scalar()?, s: r.scalar()? })
    }
}

/// Public statement of a representation proof: every `y[k]` is the sum of
/// `prods[k]` terms `g[j] * x[i]`, with the `(i, j)` pairs taken in order from `index`.
pub struct RepStatement<'a> {
    pub y: &'a [G1Projective],
    pub g: &'a [G1Projective],
    pub index: &'a [(usize, usize)],
    pub prods: &'a [usize],
}

impl RepStatement<'_> {

    fn check(&self, nx: usize) -> Result<(), Error> {
        if self.y.len() != self.prods.len() || self.prods.iter().sum::<usize>() != self.index.len() {
            return Err(Error::VerifyError("inconsistent representation statement".to_owned()));
        }
        if self.index.iter().any(|(i, j)| *i >= nx || *j >= self.g.len()) {
            return Err(Error::VerifyError("representation index out of range".to_owned()));
        }
        Ok(())
    }

    /// Evaluates every `y[k]` term list with the exponents produced by `x`.
    fn evaluate(&self, x: &[Scalar]) -> Vec<G1Projective> {
        let mut terms = self.index.iter();
        self.prods.iter()
            .map(|&n| {
                terms.by_ref().take(n)
                    .fold(G1Projective::identity(), |acc, &(i, j)| acc + self.g[j] * x[i])
            })
            .collect()
    }

    fn challenge(&self, commitments: &[G1Projective], msg: &[u8]) -> Result<Scalar, Error> {
        let mut t = Transcript::new(msg);
        self.y.iter().for_each(|y| { t.append_g1(y); });
        self.g.iter().for_each(|g| { t.append_g1(g); });
        self.index.iter().for_each(|(i, j)| { t.append_u64(*i as u64).append_u64(*j as u64); });
        commitments.iter().for_each(|p| { t.append_g1(p); });
        t.challenge(REP_DST)
    }
}

/// Proof of knowledge of the exponents of a [`RepStatement`]
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RepProof {
    pub c: Scalar,
    pub s: Vec<Scalar>,
}

impl RepProof {

    pub fn prove(rng: &mut dyn RngCore, statement: &RepStatement<'_>, x: &[Scalar], msg: &[u8]) -> Result<Self, Error> {
        statement.check(x.len()).map_err(|e| Error::SignError(e.to_string()))?;
        let r: Vec<Scalar> = (0..x.len()).map(|_| random_nonzero_scalar(rng)).collect();
        let commitments = statement.evaluate(&r);
        let c = statement.challenge(&commitments, msg)?;
        let s = r.iter().zip(x).map(|(r, x)| r - c * x).collect();
        Ok(Self { c, s })
    }

    pub fn verify(&self, statement: &RepStatement<'_>, msg: &[u8]) -> Result<bool, Error> {
        statement.check(self.s.len())?;
        let commitments: Vec<G1Projective> = statement.evaluate(&self.s).into_iter()
            .zip(statement.y)
            .map(|(p, y)| p + y * self.c)
            .collect();
        Ok(statement.challenge(&commitments, msg)? == self.c)
    }

    pub(crate) fn write(&self, w: &mut ByteWriter) {
        w.scalar(&self.c).u64(self.s.len() as u64);
        self.s.iter().for_each(|s| { w.scalar(s); });
    }

    pub(crate) fn read(r: &mut ByteReader<'_>) -> Result<Self, Error> {
        let c = r.scalar()?;
        let n = r.u64()?;
        if n > 64 {
            return Err(Error::DecodeError(format!("representation proof with {n} responses")));
        }
        let s = (0..n).map(|_| r.scalar()).collect::<Result<Vec<_>, _>>()?;
        Ok(Self { c, s })
    }
}

/// Proof of knowledge of `tt` in G2 such that `G = e(g, tt)`
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PairingProof {
    pub c: Scalar,
    pub s: G2Projective,
}

impl PairingProof {

    pub fn prove(rng: &mut dyn RngCore, g: &G1Projective, G: &Gt, tt: &G2Projective, msg: &[u8]) -> Result<Self, Error> {
        let rr = G2Projective::random(&mut *rng);
        let R = pair(g, &rr);
        let c = Self::challenge(g, G, &R, msg)?;
        Ok(Self { c, s: rr + tt * c })
    }

    pub fn verify(&self, g: &G1Projective, G: &Gt, msg: &[u8]) -> Result<bool, Error> {
        let R = pair(g, &self.s) - G * self.c;
        Ok(Self::challenge(g, G, &R, msg)? == self.c)
    }

    fn challenge(g: &G1Projective, G: &Gt, R: &Gt, msg: &[u8]) -> Result<Scalar, Error> {
        Transcript::new(msg).append_g1(g).append_gt(G).append_gt(R).challenge(PAIRING_DST)
    }

    pub(crate) fn write(&self, w: &mut ByteWriter) {
        w.scalar(&self.c).g2(&self.s);
    }

    pub(crate) fn read(r: &mut ByteReader<'_>) -> Result<Self, Error> {
        Ok(Self { c: r.scalar()?, s: r.g2()? })
    }
}
