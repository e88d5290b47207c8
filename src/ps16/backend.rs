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


use bls12_381_plus::{G1Projective, G2Projective, Gt, Scalar};
use group::Group;
use rand::RngCore;
use crate::{
    backend::{MgrJoinStep, SchemeBackend, SetupOutput},
    errors::Error,
    gml::{Gml, GmlEntry},
    keys::{GroupKey, ManagerKey, MemberKey},
    schemes::{algorithms::SchemeVariant, generics::{Proof, Signature}},
    spk::{DlogProof, PairingProof},
    utils::{codec::Encodable, message::JoinMessage, util::{g1_bytes, pair, random_nonzero_scalar, Transcript}},
};
use super::{
    keys::{Ps16Credential, Ps16GroupKey, Ps16ManagerKey},
    proof::Ps16OpenProof,
    signature::Ps16Signature,
};

const SCHEME: SchemeVariant = SchemeVariant::Ps16;
const SIGN_DST: &[u8] = b"PS16_SIGN_";

pub struct Ps16Backend;

/// `e(sigma2, gg) / e(sigma1, X)`, which equals `e(sigma1, Y)^sk` for the signer's `sk`
fn signer_pairing(gk: &Ps16GroupKey, sig: &Ps16Signature) -> Gt {
    pair(&sig.sigma2, &gk.gg) - pair(&sig.sigma1, &gk.X)
}

fn challenge(msg: &[u8], sigma1: &G1Projective, sigma2: &G1Projective, e: &Gt) -> Result<Scalar, Error> {
    Transcript::new(msg).append_g1(sigma1).append_g1(sigma2).append_gt(e).challenge(SIGN_DST)
}

/// Message the opening proof is bound to: the signature and the claimed index
fn open_statement(sig: &Ps16Signature, index: u64) -> Vec<u8> {
    let mut bytes = sig.to_bytes();
    bytes.extend_from_slice(&index.to_be_bytes());
    bytes
}

fn ps16_signature(sig: &Signature) -> Result<&Ps16Signature, Error> {
    match sig {
        Signature::Ps16(s) => Ok(s),
        other => Err(Error::SchemeMismatchError(format!("{} signature given to the PS16 backend", other.scheme()))),
    }
}

impl SchemeBackend for Ps16Backend {

    fn variant(&self) -> SchemeVariant {
        SCHEME
    }

    fn setup(&self, rng: &mut dyn RngCore, grpkey: Option<&GroupKey>) -> Result<SetupOutput, Error> {
        if grpkey.is_some() {
            return Err(Error::SetupError("PS16 setup does not take a group key".to_owned()));
        }
        let g = G1Projective::random(&mut *rng);
        let gg = G2Projective::random(&mut *rng);
        let x = random_nonzero_scalar(rng);
        let y = random_nonzero_scalar(rng);

        Ok(SetupOutput {
            grpkey: GroupKey::Ps16(Ps16GroupKey { g, gg, X: gg * x, Y: gg * y }),
            mgrkey: ManagerKey::Ps16(Ps16ManagerKey { x, y }),
            gml: Some(Gml::new(SCHEME)),
        })
    }

    fn join_mgr(&self, rng: &mut dyn RngCore, step: MgrJoinStep<'_>) -> Result<JoinMessage, Error> {
        let gk = step.grpkey.ps16()?;
        let mk = step.mgrkey.ps16()?;

        match step.seq {
            0 => {
                let n = G1Projective::random(&mut *rng);
                let mut w = JoinMessage::writer(SCHEME, 0);
                w.g1(&n);
                Ok(JoinMessage::from_writer(w))
            }
            2 => {
                let gml = step.gml.ok_or_else(|| Error::JoinError("PS16 join requires a membership list".to_owned()))?;
                let sent = step.sent.ok_or_else(|| Error::JoinError("no challenge was sent for this join".to_owned()))?;
                let inbound = step.inbound.ok_or_else(|| Error::JoinError("missing member message".to_owned()))?;

                let mut r = sent.reader(SCHEME, 0)?;
                let expected_n = r.g1()?;
                r.finish()?;

                let mut r = inbound.reader(SCHEME, 1)?;
                let n = r.g1()?;
                let tau = r.g1()?;
                let ttau = r.g2()?;
                let pi = DlogProof::read(&mut r)?;
                r.finish()?;

                if n != expected_n {
                    return Err(Error::JoinError("the member answered a different challenge".to_owned()));
                }
                if !pi.verify(&tau, &gk.g, &g1_bytes(&n))? {
                    return Err(Error::JoinError("invalid proof of knowledge of the member secret".to_owned()));
                }
                if pair(&tau, &gk.Y) != pair(&gk.g, &ttau) {
                    return Err(Error::JoinError("inconsistent member public values".to_owned()));
                }

                let u = random_nonzero_scalar(rng);
                let sigma1 = gk.g * u;
                let sigma2 = (gk.g * mk.x + tau * mk.y) * u;

                let index = gml.push(GmlEntry::Ps16 { tau, ttau })?;
                log::debug!("PS16 credential issued for member {index}");

                let mut w = JoinMessage::writer(SCHEME, 2);
                w.g1(&sigma1).g1(&sigma2);
                Ok(JoinMessage::from_writer(w))
            }
            seq => Err(Error::JoinError(format!("PS16 manager has no step {seq}"))),
        }
    }

    fn join_mem(&self, rng: &mut dyn RngCore, seq: u8, memkey: &mut MemberKey, grpkey: &GroupKey, inbound: Option<&JoinMessage>) -> Result<Option<JoinMessage>, Error> {
        let gk = grpkey.ps16()?;
        let key = memkey.ps16_mut()?;
        let inbound = inbound.ok_or_else(|| Error::JoinError("missing manager message".to_owned()))?;

        match seq {
            1 => {
                let mut r = inbound.reader(SCHEME, 0)?;
                let n = r.g1()?;
                r.finish()?;

                let sk = random_nonzero_scalar(rng);
                let tau = gk.g * sk;
                let ttau = gk.Y * sk;
                let pi = DlogProof::prove(rng, &tau, &gk.g, &sk, &g1_bytes(&n))?;

                key.sk = Some(sk);
                key.credential = None;

                let mut w = JoinMessage::writer(SCHEME, 1);
                w.g1(&n).g1(&tau).g2(&ttau);
                pi.write(&mut w);
                Ok(Some(JoinMessage::from_writer(w)))
            }
            3 => {
                let sk = key.sk.ok_or_else(|| Error::JoinError("the member secret was not generated".to_owned()))?;
                let mut r = inbound.reader(SCHEME, 2)?;
                let sigma1 = r.g1()?;
                let sigma2 = r.g1()?;
                r.finish()?;

                // e(sigma2, gg) = e(sigma1, X * Y^sk)
                if bool::from(sigma1.is_identity()) || pair(&sigma2, &gk.gg) != pair(&sigma1, &(gk.X + gk.Y * sk)) {
                    return Err(Error::JoinError("the issued credential does not verify".to_owned()));
                }
                key.credential = Some(Ps16Credential { sigma1, sigma2 });
                Ok(None)
            }
            seq => Err(Error::JoinError(format!("PS16 member has no step {seq}"))),
        }
    }

    fn sign(&self, rng: &mut dyn RngCore, msg: &[u8], memkey: &MemberKey, grpkey: &GroupKey) -> Result<Signature, Error> {
        let gk = grpkey.ps16()?;
        let key = memkey.ps16()?;
        let (Some(sk), Some(cred)) = (key.sk, key.credential.as_ref()) else {
            return Err(Error::SignError("the member key has not completed the join".to_owned()));
        };

        let t = random_nonzero_scalar(rng);
        let k = random_nonzero_scalar(rng);

        let sigma1 = cred.sigma1 * t;
        let sigma2 = cred.sigma2 * t;
        let e = pair(&sigma1, &gk.Y) * k;

        let c = challenge(msg, &sigma1, &sigma2, &e)?;
        Ok(Signature::Ps16(Ps16Signature { sigma1, sigma2, c, s: k + c * sk }))
    }

    fn verify(&self, sig: &Signature, msg: &[u8], grpkey: &GroupKey) -> Result<bool, Error> {
        let gk = grpkey.ps16()?;
        let sig = ps16_signature(sig).map_err(|e| Error::VerifyError(e.to_string()))?;
        if bool::from(sig.sigma1.is_identity()) {
            return Ok(false);
        }
        let R = signer_pairing(gk, sig) * (-sig.c) + pair(&(sig.sigma1 * sig.s), &gk.Y);
        Ok(challenge(msg, &sig.sigma1, &sig.sigma2, &R)? == sig.c)
    }

    fn open(&self, rng: &mut dyn RngCore, sig: &Signature, grpkey: &GroupKey, _mgrkey: &ManagerKey, gml: &Gml) -> Result<(u64, Option<Proof>), Error> {
        let gk = grpkey.ps16()?;
        let sig = ps16_signature(sig)?;
        let G = signer_pairing(gk, sig);

        let found = gml.entries().iter().enumerate().find_map(|(i, entry)| match entry {
            GmlEntry::Ps16 { ttau, .. } if pair(&sig.sigma1, ttau) == G => Some((i as u64, *ttau)),
            _ => None,
        });
        let (index, ttau) = found.ok_or_else(|| Error::OpenError("the signer is not in the membership list".to_owned()))?;

        let proof = PairingProof::prove(rng, &sig.sigma1, &G, &ttau, &open_statement(sig, index))?;
        Ok((index, Some(Proof::Ps16(Ps16OpenProof(proof)))))
    }

    fn open_verify(&self, index: u64, proof: &Proof, sig: &Signature, grpkey: &GroupKey) -> Result<bool, Error> {
        let gk = grpkey.ps16()?;
        let sig = ps16_signature(sig)?;
        let Proof::Ps16(Ps16OpenProof(proof)) = proof;
        proof.verify(&sig.sigma1, &signer_pairing(gk, sig), &open_statement(sig, index))
    }
}
