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


use std::time::{SystemTime, UNIX_EPOCH};
use bls12_381_plus::{pairing, G1Projective, G2Projective, Gt, Scalar};
use elliptic_curve::{group::Curve, hash2curve::{ExpandMsg, ExpandMsgXmd, Expander}};
use ff::Field;
use rand::RngCore;
use sha2::Sha256;
use crate::errors::Error;

/// `expand_message_xmd` with SHA-256
pub(crate) type GroupsigExpander = ExpandMsgXmd<Sha256>;

/// Bytes expanded per scalar, reduced with [`Scalar::from_okm`]
pub(crate) const EXPAND_LEN: usize = 48;

pub(crate) const DST_PREFIX: &[u8] = b"GROUPSIG_BLS12381G1_XMD:SHA-256_";

/// Maps `msg_octets` to a non-zero scalar, retrying with an incremented
/// counter byte on the (negligible) zero outcome.
pub fn hash_to_scalar(msg_octets: &[u8], dst: &[u8]) -> Result<Scalar, Error> {
    let dst = [DST_PREFIX, dst].concat();
    let mut counter: u8 = 0;
    let mut uniform_bytes = [0u8; EXPAND_LEN];

    loop {
        let msg_prime = [msg_octets, &[counter]].concat();
        GroupsigExpander::expand_message(&[&msg_prime], &[&dst], EXPAND_LEN)
            .map_err(|_| Error::HashToScalarError)?
            .fill_bytes(&mut uniform_bytes);
        let hashed_scalar = Scalar::from_okm(&uniform_bytes);
        if !bool::from(hashed_scalar.is_zero()) {
            return Ok(hashed_scalar);
        }
        counter = counter.checked_add(1).ok_or(Error::HashToScalarError)?;
    }
}

pub fn hash_to_g1(msg: &[u8], dst: &[u8]) -> G1Projective {
    let dst = [DST_PREFIX, dst].concat();
    G1Projective::hash::<GroupsigExpander>(msg, &dst)
}

pub(crate) fn pair(p: &G1Projective, q: &G2Projective) -> Gt {
    pairing(&p.to_affine(), &q.to_affine())
}

pub(crate) fn random_nonzero_scalar(rng: &mut dyn RngCore) -> Scalar {
    loop {
        let s = Scalar::random(&mut *rng);
        if !bool::from(s.is_zero()) {
            return s;
        }
    }
}

pub(crate) fn invert(s: &Scalar) -> Option<Scalar> {
    Option::<Scalar>::from(s.invert())
}

/// Accumulates the encodings of group elements into a challenge transcript.
#[derive(Default)]
pub(crate) struct Transcript {
    bytes: Vec<u8>,
}

impl Transcript {

    pub fn new(msg: &[u8]) -> Self {
        let mut t = Self::default();
        t.append_bytes(msg);
        t
    }

    pub fn append_bytes(&mut self, b: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(&(b.len() as u64).to_be_bytes());
        self.bytes.extend_from_slice(b);
        self
    }

    pub fn append_g1(&mut self, p: &G1Projective) -> &mut Self {
        self.bytes.extend_from_slice(&p.to_affine().to_compressed());
        self
    }

    pub fn append_gt(&mut self, e: &Gt) -> &mut Self {
        self.bytes.extend_from_slice(&e.to_bytes());
        self
    }

    pub fn append_u64(&mut self, v: u64) -> &mut Self {
        self.bytes.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn challenge(&self, dst: &[u8]) -> Result<Scalar, Error> {
        hash_to_scalar(&self.bytes, dst)
    }
}

/// Seconds since the unix epoch
pub(crate) fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

pub(crate) fn g1_bytes(p: &G1Projective) -> [u8; 48] {
    p.to_affine().to_compressed()
}
