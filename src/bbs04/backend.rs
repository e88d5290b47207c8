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
    utils::{message::JoinMessage, util::{invert, pair, random_nonzero_scalar, Transcript}},
};
use super::{keys::{Bbs04Credential, Bbs04GroupKey, Bbs04ManagerKey}, signature::Bbs04Signature};

const SCHEME: SchemeVariant = SchemeVariant::Bbs04;
const SIGN_DST: &[u8] = b"BBS04_SIGN_";

pub struct Bbs04Backend;

/// Pairings every signer and verifier needs: `e(h, w)`, `e(h, g2)` and `e(g1, g2)`
struct Precomputed {
    hw: Gt,
    hg2: Gt,
    g1g2: Gt,
}

impl Precomputed {
    fn new(gk: &Bbs04GroupKey) -> Self {
        Self {
            hw: pair(&gk.h, &gk.w),
            hg2: pair(&gk.h, &gk.g2),
            g1g2: pair(&gk.g1, &gk.g2),
        }
    }
}

fn challenge(msg: &[u8], T: [&G1Projective; 3], R1: &G1Projective, R2: &G1Projective, R3: &Gt, R4: &G1Projective, R5: &G1Projective) -> Result<Scalar, Error> {
    let mut t = Transcript::new(msg);
    T.iter().for_each(|p| { t.append_g1(p); });
    t.append_g1(R1).append_g1(R2).append_gt(R3).append_g1(R4).append_g1(R5);
    t.challenge(SIGN_DST)
}

impl SchemeBackend for Bbs04Backend {

    fn variant(&self) -> SchemeVariant {
        SCHEME
    }

    fn setup(&self, rng: &mut dyn RngCore, grpkey: Option<&GroupKey>) -> Result<SetupOutput, Error> {
        if grpkey.is_some() {
            return Err(Error::SetupError("BBS04 setup does not take a group key".to_owned()));
        }
        let g1 = G1Projective::GENERATOR;
        let g2 = G2Projective::GENERATOR;
        let h = G1Projective::random(&mut *rng);

        let xi1 = random_nonzero_scalar(rng);
        let xi2 = random_nonzero_scalar(rng);
        let gamma = random_nonzero_scalar(rng);

        let (Some(xi1_inv), Some(xi2_inv)) = (invert(&xi1), invert(&xi2)) else {
            return Err(Error::SetupError("degenerate tracing key".to_owned()));
        };

        let grpkey = Bbs04GroupKey { g1, g2, h, u: h * xi1_inv, v: h * xi2_inv, w: g2 * gamma };
        Ok(SetupOutput {
            grpkey: GroupKey::Bbs04(grpkey),
            mgrkey: ManagerKey::Bbs04(Bbs04ManagerKey { xi1, xi2, gamma }),
            gml: Some(Gml::new(SCHEME)),
        })
    }

    fn join_mgr(&self, rng: &mut dyn RngCore, step: MgrJoinStep<'_>) -> Result<JoinMessage, Error> {
        if step.seq != 0 {
            return Err(Error::JoinError(format!("BBS04 manager has no step {}", step.seq)));
        }
        let gk = step.grpkey.bbs04()?;
        let mk = step.mgrkey.bbs04()?;
        let gml = step.gml.ok_or_else(|| Error::JoinError("BBS04 join requires a membership list".to_owned()))?;

        let x = random_nonzero_scalar(rng);
        let exponent = invert(&(mk.gamma + x))
            .ok_or_else(|| Error::JoinError("gamma + x is zero".to_owned()))?;
        let A = gk.g1 * exponent;

        let index = gml.push(GmlEntry::Bbs04 { A })?;
        log::debug!("BBS04 credential issued for member {index}");

        let mut w = JoinMessage::writer(SCHEME, 0);
        w.scalar(&x).g1(&A);
        Ok(JoinMessage::from_writer(w))
    }

    fn join_mem(&self, _rng: &mut dyn RngCore, seq: u8, memkey: &mut MemberKey, grpkey: &GroupKey, inbound: Option<&JoinMessage>) -> Result<Option<JoinMessage>, Error> {
        if seq != 1 {
            return Err(Error::JoinError(format!("BBS04 member has no step {seq}")));
        }
        let gk = grpkey.bbs04()?;
        let key = memkey.bbs04_mut()?;
        let inbound = inbound.ok_or_else(|| Error::JoinError("missing manager message".to_owned()))?;

        let mut r = inbound.reader(SCHEME, 0)?;
        let x = r.scalar()?;
        let A = r.g1()?;
        r.finish()?;

        // e(A, w * g2^x) = e(g1, g2)
        if pair(&A, &(gk.w + gk.g2 * x)) != pair(&gk.g1, &gk.g2) {
            return Err(Error::JoinError("the issued credential does not verify".to_owned()));
        }
        key.credential = Some(Bbs04Credential { x, A });
        Ok(None)
    }

    fn sign(&self, rng: &mut dyn RngCore, msg: &[u8], memkey: &MemberKey, grpkey: &GroupKey) -> Result<Signature, Error> {
        let gk = grpkey.bbs04()?;
        let cred = memkey.bbs04()?.credential.as_ref()
            .ok_or_else(|| Error::SignError("the member key has not completed the join".to_owned()))?;
        let pre = Precomputed::new(gk);

        let alpha = random_nonzero_scalar(rng);
        let beta = random_nonzero_scalar(rng);

        let T1 = gk.u * alpha;
        let T2 = gk.v * beta;
        let T3 = cred.A + gk.h * (alpha + beta);

        let delta1 = cred.x * alpha;
        let delta2 = cred.x * beta;

        let r_alpha = random_nonzero_scalar(rng);
        let r_beta = random_nonzero_scalar(rng);
        let r_x = random_nonzero_scalar(rng);
        let r_delta1 = random_nonzero_scalar(rng);
        let r_delta2 = random_nonzero_scalar(rng);

        let R1 = gk.u * r_alpha;
        let R2 = gk.v * r_beta;
        let R3 = pair(&T3, &gk.g2) * r_x
            + pre.hw * (-(r_alpha + r_beta))
            + pre.hg2 * (-(r_delta1 + r_delta2));
        let R4 = T1 * r_x - gk.u * r_delta1;
        let R5 = T2 * r_x - gk.v * r_delta2;

        let c = challenge(msg, [&T1, &T2, &T3], &R1, &R2, &R3, &R4, &R5)?;

        Ok(Signature::Bbs04(Bbs04Signature {
            T1,
            T2,
            T3,
            c,
            s_alpha: r_alpha + c * alpha,
            s_beta: r_beta + c * beta,
            s_x: r_x + c * cred.x,
            s_delta1: r_delta1 + c * delta1,
            s_delta2: r_delta2 + c * delta2,
        }))
    }

    fn verify(&self, sig: &Signature, msg: &[u8], grpkey: &GroupKey) -> Result<bool, Error> {
        let gk = grpkey.bbs04()?;
        let Signature::Bbs04(sig) = sig else {
            return Err(Error::VerifyError(format!("{} signature given to the BBS04 backend", sig.scheme())));
        };
        let pre = Precomputed::new(gk);
        let c = sig.c;

        let R1 = gk.u * sig.s_alpha - sig.T1 * c;
        let R2 = gk.v * sig.s_beta - sig.T2 * c;
        let R3 = pair(&sig.T3, &(gk.w * c + gk.g2 * sig.s_x))
            + pre.hw * (-(sig.s_alpha + sig.s_beta))
            + pre.hg2 * (-(sig.s_delta1 + sig.s_delta2))
            - pre.g1g2 * c;
        let R4 = sig.T1 * sig.s_x - gk.u * sig.s_delta1;
        let R5 = sig.T2 * sig.s_x - gk.v * sig.s_delta2;

        Ok(challenge(msg, [&sig.T1, &sig.T2, &sig.T3], &R1, &R2, &R3, &R4, &R5)? == c)
    }

    fn open(&self, _rng: &mut dyn RngCore, sig: &Signature, _grpkey: &GroupKey, mgrkey: &ManagerKey, gml: &Gml) -> Result<(u64, Option<Proof>), Error> {
        let mk = mgrkey.bbs04()?;
        let Signature::Bbs04(sig) = sig else {
            return Err(Error::SchemeMismatchError(format!("{} signature given to the BBS04 backend", sig.scheme())));
        };

        // A = T3 / (T1^xi1 * T2^xi2)
        let A = sig.T3 - (sig.T1 * mk.xi1 + sig.T2 * mk.xi2);

        gml.entries().iter()
            .position(|entry| matches!(entry, GmlEntry::Bbs04 { A: a } if *a == A))
            .map(|i| (i as u64, None))
            .ok_or_else(|| Error::OpenError("the signer is not in the membership list".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::MemberKey;

    fn joined(rng: &mut dyn RngCore) -> (SetupOutput, MemberKey) {
        let mut out = Bbs04Backend.setup(rng, None).unwrap();
        let config = crate::config::GroupsigConfig::default();
        let m0 = Bbs04Backend.join_mgr(rng, MgrJoinStep {
            seq: 0,
            grpkey: &out.grpkey,
            mgrkey: &out.mgrkey,
            gml: out.gml.as_mut(),
            inbound: None,
            sent: None,
            config: &config,
        }).unwrap();
        let mut memkey = MemberKey::new(SCHEME);
        assert!(Bbs04Backend.join_mem(rng, 1, &mut memkey, &out.grpkey, Some(&m0)).unwrap().is_none());
        (out, memkey)
    }

    #[test]
    fn tampered_signature_does_not_verify() {
        let mut rng = rand::thread_rng();
        let (out, memkey) = joined(&mut rng);
        let sig = Bbs04Backend.sign(&mut rng, b"msg", &memkey, &out.grpkey).unwrap();
        assert!(Bbs04Backend.verify(&sig, b"msg", &out.grpkey).unwrap());

        let Signature::Bbs04(mut inner) = sig else { unreachable!() };
        inner.s_x += Scalar::from(1u64);
        assert!(!Bbs04Backend.verify(&Signature::Bbs04(inner), b"msg", &out.grpkey).unwrap());
    }

    #[test]
    fn open_unknown_signer_fails() {
        let mut rng = rand::thread_rng();
        let (out, memkey) = joined(&mut rng);
        let sig = Bbs04Backend.sign(&mut rng, b"msg", &memkey, &out.grpkey).unwrap();
        let empty = Gml::new(SCHEME);
        let err = Bbs04Backend.open(&mut rng, &sig, &out.grpkey, &out.mgrkey, &empty).unwrap_err();
        assert!(matches!(err, Error::OpenError(_)));
    }
}
