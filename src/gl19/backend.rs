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


use bls12_381_plus::{G1Projective, G2Projective, Scalar};
use group::Group;
use rand::RngCore;
use crate::{
    backend::{MgrJoinStep, SchemeBackend, SetupOutput},
    errors::Error,
    gml::GmlEntry,
    identity::Identity,
    keys::{BlindingKey, GroupKey, ManagerKey, MemberKey},
    schemes::{algorithms::SchemeVariant, generics::{BlindSignature, BlindStage, Signature}},
    spk::{DlogProof, RepProof, RepStatement},
    utils::{message::JoinMessage, util::{g1_bytes, hash_to_g1, hash_to_scalar, invert, pair, random_nonzero_scalar, unix_now}},
};
use super::{
    blind::Gl19BlindSignature,
    keys::{Gl19BlindingKey, Gl19ConverterKey, Gl19ConverterParams, Gl19Credential, Gl19GroupKey, Gl19IssuerKey, Gl19Secret},
    signature::Gl19Signature,
};

const SCHEME: SchemeVariant = SchemeVariant::Gl19;
const EXPIRATION_DST: &[u8] = b"GL19_EXPIRATION_";
const MESSAGE_DST: &[u8] = b"GL19_BLIND_MESSAGE_";

/// `(exponent, base)` pairs of the signature proof, consumed in order by the statements
const SIGN_INDEX: [(usize, usize); 11] = [(5, 0), (5, 1), (1, 2), (0, 3), (2, 4), (3, 5), (4, 4), (6, 6), (7, 0), (7, 7), (1, 2)];
/// Number of terms of each statement
const SIGN_PRODS: [usize; 6] = [1, 2, 2, 3, 1, 2];

pub struct Gl19Backend;

/// Hex digest of `msg` as recovered by unblinding, to compare against [`Identity::message`].
pub fn blinded_message_digest(msg: &[u8]) -> String {
    hex::encode(g1_bytes(&hash_to_g1(msg, MESSAGE_DST)))
}

fn expiration_scalar(l: u64) -> Result<Scalar, Error> {
    hash_to_scalar(&l.to_be_bytes(), EXPIRATION_DST)
}

/// The signed message is bound to the credential expiration.
fn bound_message(msg: &[u8], l: u64) -> Vec<u8> {
    [msg, &l.to_be_bytes()].concat()
}

/// `g1 * H * h2^s * h3^d`
fn credential_base(gk: &Gl19GroupKey, H: &G1Projective, s: &Scalar, d: &Scalar) -> G1Projective {
    gk.g1 + H + gk.h2 * s + gk.h3 * d
}

fn issuer_key(mgrkey: &ManagerKey) -> Result<&Gl19IssuerKey, Error> {
    match mgrkey {
        ManagerKey::Gl19Issuer(k) => Ok(k),
        other => Err(Error::JoinError(format!("a {:?} key of {} cannot issue GL19 credentials", other.role(), other.scheme()))),
    }
}

fn converter_key(mgrkey: &ManagerKey) -> Result<&Gl19ConverterKey, Error> {
    match mgrkey {
        ManagerKey::Gl19Converter(k) => Ok(k),
        other => Err(Error::ConvertError(format!("a {:?} key of {} cannot convert", other.role(), other.scheme()))),
    }
}

/// The six statements proven by a signature, in the order of [`SIGN_PRODS`]
fn sign_statement(gk: &Gl19GroupKey, conv: &Gl19ConverterParams, sig: &Gl19Signature, d_l: &Scalar) -> ([G1Projective; 6], [G1Projective; 8]) {
    let y = [
        sig.nym1,
        sig.nym2,
        sig.A_ - sig.d,
        gk.g1 + gk.h3 * d_l,
        sig.ehy1,
        sig.ehy2,
    ];
    let g = [gk.g, conv.cpk, gk.h, sig.AA, gk.h2, sig.d, gk.h1, conv.epk];
    (y, g)
}

impl SchemeBackend for Gl19Backend {

    fn variant(&self) -> SchemeVariant {
        SCHEME
    }

    fn setup(&self, rng: &mut dyn RngCore, grpkey: Option<&GroupKey>) -> Result<SetupOutput, Error> {
        match grpkey {
            None => {
                let g2 = G2Projective::random(&mut *rng);
                let isk = random_nonzero_scalar(rng);
                let grpkey = Gl19GroupKey {
                    g1: G1Projective::random(&mut *rng),
                    g: G1Projective::random(&mut *rng),
                    h: G1Projective::random(&mut *rng),
                    h1: G1Projective::random(&mut *rng),
                    h2: G1Projective::random(&mut *rng),
                    h3: G1Projective::random(&mut *rng),
                    g2,
                    ipk: g2 * isk,
                    converter: None,
                };
                log::debug!("GL19 issuer parameters generated");
                Ok(SetupOutput {
                    grpkey: GroupKey::Gl19(grpkey),
                    mgrkey: ManagerKey::Gl19Issuer(Gl19IssuerKey { isk }),
                    gml: None,
                })
            }
            Some(grpkey) => {
                let gk = grpkey.gl19()?;
                if gk.is_complete() {
                    return Err(Error::SetupError("the group key already carries converter parameters".to_owned()));
                }
                let csk = random_nonzero_scalar(rng);
                let esk = random_nonzero_scalar(rng);
                let mut completed = gk.clone();
                completed.converter = Some(Gl19ConverterParams { cpk: gk.g * csk, epk: gk.g * esk });
                log::debug!("GL19 converter parameters generated");
                Ok(SetupOutput {
                    grpkey: GroupKey::Gl19(completed),
                    mgrkey: ManagerKey::Gl19Converter(Gl19ConverterKey { csk, esk }),
                    gml: None,
                })
            }
        }
    }

    fn join_mgr(&self, rng: &mut dyn RngCore, step: MgrJoinStep<'_>) -> Result<JoinMessage, Error> {
        let gk = step.grpkey.gl19()?;
        let ik = issuer_key(step.mgrkey)?;

        match step.seq {
            0 => {
                let n = G1Projective::random(&mut *rng);
                let mut w = JoinMessage::writer(SCHEME, 0);
                w.g1(&n);
                Ok(JoinMessage::from_writer(w))
            }
            2 => {
                let sent = step.sent.ok_or_else(|| Error::JoinError("no challenge was sent for this join".to_owned()))?;
                let inbound = step.inbound.ok_or_else(|| Error::JoinError("missing member message".to_owned()))?;

                let mut r = sent.reader(SCHEME, 0)?;
                let expected_n = r.g1()?;
                r.finish()?;

                let mut r = inbound.reader(SCHEME, 1)?;
                let n = r.g1()?;
                let H = r.g1()?;
                let pi = DlogProof::read(&mut r)?;
                r.finish()?;

                if n != expected_n {
                    return Err(Error::JoinError("the member answered a different challenge".to_owned()));
                }
                if !pi.verify(&H, &gk.h1, &g1_bytes(&n))? {
                    return Err(Error::JoinError("invalid proof of knowledge of the member secret".to_owned()));
                }

                let x = random_nonzero_scalar(rng);
                let s = random_nonzero_scalar(rng);
                let l = unix_now().checked_add(step.config.credential_lifetime)
                    .ok_or_else(|| Error::JoinError("credential expiration overflows".to_owned()))?;
                let d = expiration_scalar(l)?;

                let exponent = invert(&(ik.isk + x))
                    .ok_or_else(|| Error::JoinError("isk + x is zero".to_owned()))?;
                let A = credential_base(gk, &H, &s, &d) * exponent;

                if let Some(gml) = step.gml {
                    let index = gml.push(GmlEntry::Gl19 { H, expiration: l })?;
                    log::debug!("GL19 member {index} registered");
                }
                log::debug!("GL19 credential issued, expires at {l}");

                let mut w = JoinMessage::writer(SCHEME, 2);
                w.g1(&A).scalar(&x).scalar(&s).u64(l);
                Ok(JoinMessage::from_writer(w))
            }
            seq => Err(Error::JoinError(format!("GL19 issuer has no step {seq}"))),
        }
    }

    fn join_mem(&self, rng: &mut dyn RngCore, seq: u8, memkey: &mut MemberKey, grpkey: &GroupKey, inbound: Option<&JoinMessage>) -> Result<Option<JoinMessage>, Error> {
        let gk = grpkey.gl19()?;
        let key = memkey.gl19_mut()?;
        let inbound = inbound.ok_or_else(|| Error::JoinError("missing issuer message".to_owned()))?;

        match seq {
            1 => {
                let mut r = inbound.reader(SCHEME, 0)?;
                let n = r.g1()?;
                r.finish()?;

                let y = random_nonzero_scalar(rng);
                let H = gk.h1 * y;
                let pi = DlogProof::prove(rng, &H, &gk.h1, &y, &g1_bytes(&n))?;

                key.secret = Some(Gl19Secret { y, H });
                key.credential = None;

                let mut w = JoinMessage::writer(SCHEME, 1);
                w.g1(&n).g1(&H);
                pi.write(&mut w);
                Ok(Some(JoinMessage::from_writer(w)))
            }
            3 => {
                let secret = key.secret.as_ref()
                    .ok_or_else(|| Error::JoinError("the member secret was not generated".to_owned()))?;
                let mut r = inbound.reader(SCHEME, 2)?;
                let A = r.g1()?;
                let x = r.scalar()?;
                let s = r.scalar()?;
                let l = r.u64()?;
                r.finish()?;

                let base = credential_base(gk, &secret.H, &s, &expiration_scalar(l)?);
                // e(A, g2^x * ipk) = e(g1 * H * h2^s * h3^d, g2)
                if bool::from(A.is_identity()) || pair(&A, &(gk.g2 * x + gk.ipk)) != pair(&base, &gk.g2) {
                    return Err(Error::JoinError("the issued credential does not verify".to_owned()));
                }
                key.credential = Some(Gl19Credential { A, x, s, l });
                Ok(None)
            }
            seq => Err(Error::JoinError(format!("GL19 member has no step {seq}"))),
        }
    }

    fn sign(&self, rng: &mut dyn RngCore, msg: &[u8], memkey: &MemberKey, grpkey: &GroupKey) -> Result<Signature, Error> {
        let gk = grpkey.gl19()?;
        let conv = gk.converter_params().map_err(|e| Error::SignError(e.to_string()))?;
        let key = memkey.gl19()?;
        let (Some(secret), Some(cred)) = (key.secret.as_ref(), key.credential.as_ref()) else {
            return Err(Error::SignError("the member key has not completed the join".to_owned()));
        };

        let alpha = random_nonzero_scalar(rng);
        let alpha2 = random_nonzero_scalar(rng);
        let r1 = random_nonzero_scalar(rng);
        let r2 = random_nonzero_scalar(rng);
        let r3 = invert(&r1).ok_or_else(|| Error::SignError("r1 is zero".to_owned()))?;

        let hy = gk.h * secret.y;
        let d_l = expiration_scalar(cred.l)?;
        let base = credential_base(gk, &secret.H, &cred.s, &d_l);

        let AA = cred.A * r1;
        let sig = Gl19Signature {
            AA,
            A_: AA * (-cred.x) + base * r1,
            d: base * r1 - gk.h2 * r2,
            nym1: gk.g * alpha,
            nym2: conv.cpk * alpha + hy,
            ehy1: gk.g * alpha2,
            ehy2: conv.epk * alpha2 + hy,
            pi: RepProof { c: Scalar::ZERO, s: Vec::new() },
            expiration: cred.l,
        };

        // ss = -(s - r2 * r3)
        let ss = r2 * r3 - cred.s;
        let x = [-cred.x, secret.y, r2, r3, ss, alpha, -secret.y, alpha2];

        let (y, g) = sign_statement(gk, conv, &sig, &d_l);
        let statement = RepStatement { y: &y, g: &g, index: &SIGN_INDEX, prods: &SIGN_PRODS };
        let pi = RepProof::prove(rng, &statement, &x, &bound_message(msg, cred.l))?;

        Ok(Signature::Gl19(Gl19Signature { pi, ..sig }))
    }

    fn verify(&self, sig: &Signature, msg: &[u8], grpkey: &GroupKey) -> Result<bool, Error> {
        let gk = grpkey.gl19()?;
        let conv = gk.converter_params().map_err(|e| Error::VerifyError(e.to_string()))?;
        let Signature::Gl19(sig) = sig else {
            return Err(Error::VerifyError(format!("{} signature given to the GL19 backend", sig.scheme())));
        };

        if bool::from(sig.AA.is_identity()) {
            return Ok(false);
        }
        if pair(&sig.AA, &gk.ipk) != pair(&sig.A_, &gk.g2) {
            return Ok(false);
        }

        let d_l = expiration_scalar(sig.expiration)?;
        let (y, g) = sign_statement(gk, conv, sig, &d_l);
        let statement = RepStatement { y: &y, g: &g, index: &SIGN_INDEX, prods: &SIGN_PRODS };
        if sig.pi.s.len() != 8 {
            return Ok(false);
        }
        sig.pi.verify(&statement, &bound_message(msg, sig.expiration))
    }

    fn blinding_key(&self, rng: &mut dyn RngCore, grpkey: &GroupKey) -> Result<BlindingKey, Error> {
        let gk = grpkey.gl19()?;
        let sk = random_nonzero_scalar(rng);
        Ok(BlindingKey::Gl19(Gl19BlindingKey { pk: gk.g * sk, sk: Some(sk) }))
    }

    fn blind(&self, rng: &mut dyn RngCore, grpkey: &GroupKey, bldkey: &BlindingKey, sig: &Signature, msg: &[u8]) -> Result<BlindSignature, Error> {
        let gk = grpkey.gl19()?;
        let conv = gk.converter_params().map_err(|e| Error::BlindError(e.to_string()))?;
        let bpk = bldkey.gl19()?.pk;
        let Signature::Gl19(sig) = sig else {
            return Err(Error::SchemeMismatchError(format!("{} signature given to the GL19 backend", sig.scheme())));
        };

        let alpha = random_nonzero_scalar(rng);
        let beta = random_nonzero_scalar(rng);
        let gamma = random_nonzero_scalar(rng);

        Ok(BlindSignature::Gl19(Gl19BlindSignature {
            stage: BlindStage::Blinded,
            nym1: sig.nym1 + gk.g * beta,
            nym2: gk.g * alpha,
            nym3: Some(sig.nym2 + conv.cpk * beta + bpk * alpha),
            c1: gk.g * gamma,
            c2: hash_to_g1(msg, MESSAGE_DST) + bpk * gamma,
        }))
    }

    fn convert(&self, rng: &mut dyn RngCore, bsigs: &[BlindSignature], grpkey: &GroupKey, mgrkey: &ManagerKey, bldkey: &BlindingKey) -> Result<Vec<BlindSignature>, Error> {
        let gk = grpkey.gl19()?;
        let ck = converter_key(mgrkey)?;
        let bpk = bldkey.gl19()?.pk;

        // One exponent for the whole batch keeps pseudonyms of the same member equal
        let r = random_nonzero_scalar(rng);

        bsigs.iter().enumerate()
            .map(|(i, bsig)| {
                let BlindSignature::Gl19(bsig) = bsig;
                let nym3 = match (bsig.stage, bsig.nym3) {
                    (BlindStage::Blinded, Some(nym3)) => nym3,
                    _ => return Err(Error::ConvertError(format!("element {i} is not a blinded signature"))),
                };
                let r1 = random_nonzero_scalar(rng);
                let r2 = random_nonzero_scalar(rng);

                Ok(BlindSignature::Gl19(Gl19BlindSignature {
                    stage: BlindStage::Converted,
                    nym1: bsig.nym2 * r + gk.g * r1,
                    nym2: (nym3 - bsig.nym1 * ck.csk) * r + bpk * r1,
                    nym3: None,
                    c1: bsig.c1 + gk.g * r2,
                    c2: bsig.c2 + bpk * r2,
                }))
            })
            .collect()
    }

    fn unblind(&self, csig: &BlindSignature, bldkey: &BlindingKey) -> Result<Identity, Error> {
        let BlindSignature::Gl19(csig) = csig;
        if csig.stage != BlindStage::Converted {
            return Err(Error::UnblindError("only converted signatures can be unblinded".to_owned()));
        }
        let sk = bldkey.gl19()?.private_key()?;

        let nym = csig.nym2 - csig.nym1 * sk;
        let digest = csig.c2 - csig.c1 * sk;

        Ok(Identity::new(SCHEME, hex::encode(g1_bytes(&nym))).with_message(hex::encode(g1_bytes(&digest))))
    }
}
