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


use bls12_381_plus::{G2Projective, Scalar};
use crate::{
    config::{GroupsigConfig, CREDENTIAL_LIFETIME_ENV, DEFAULT_CREDENTIAL_LIFETIME},
    errors::Error,
    identity::{IdProof, Identity, IndexProof},
    ps16::proof::Ps16OpenProof,
    schemes::{
        algorithms::{is_supported_scheme, SchemeVariant},
        capabilities::{Capabilities, JoinRole, OpenForm},
        generics::Proof,
    },
    spk::PairingProof,
    utils::{codec::{decode_text, kind, peek_scheme, ByteReader, ByteWriter, Encodable}, message::JoinMessage},
};

fn dummy_proof() -> Proof {
    Proof::Ps16(Ps16OpenProof(PairingProof { c: Scalar::ONE, s: G2Projective::GENERATOR }))
}

#[test]
fn scheme_codes() {
    assert_eq!(SchemeVariant::Bbs04.code(), 1);
    assert_eq!(SchemeVariant::Gl19.code(), 3);
    assert_eq!(SchemeVariant::Ps16.code(), 4);
    assert!(!is_supported_scheme(0));
    assert!(!is_supported_scheme(2));
    for v in SchemeVariant::ALL {
        assert!(is_supported_scheme(v.code()));
        assert_eq!(SchemeVariant::from_code(v.code()), Ok(v));
        assert_eq!(v.name().parse::<SchemeVariant>(), Ok(v));
        assert_eq!(v.name().to_lowercase().parse::<SchemeVariant>(), Ok(v));
    }
}

#[test]
fn join_step_roles() {
    let bbs04 = Capabilities::of(SchemeVariant::Bbs04);
    assert_eq!(bbs04.join_steps(), 2);
    assert_eq!(bbs04.role_for_seq(0), Some(JoinRole::Authority));
    assert_eq!(bbs04.role_for_seq(1), Some(JoinRole::Member));
    assert_eq!(bbs04.role_for_seq(2), None);
    assert!(bbs04.is_last_step(JoinRole::Authority, 0));
    assert!(bbs04.is_last_step(JoinRole::Member, 1));

    for variant in [SchemeVariant::Ps16, SchemeVariant::Gl19] {
        let caps = Capabilities::of(variant);
        assert_eq!(caps.join_seq, 3);
        assert_eq!(caps.join_start, JoinRole::Authority);
        assert!(!caps.is_last_step(JoinRole::Authority, 0));
        assert!(caps.is_last_step(JoinRole::Authority, 2));
        assert!(!caps.is_last_step(JoinRole::Member, 1));
        assert!(caps.is_last_step(JoinRole::Member, 3));
        assert_eq!(caps.first_step(JoinRole::Member), 1);
    }
}

#[test]
fn capability_table() {
    let bbs04 = Capabilities::of(SchemeVariant::Bbs04);
    let ps16 = Capabilities::of(SchemeVariant::Ps16);
    let gl19 = Capabilities::of(SchemeVariant::Gl19);

    assert!(bbs04.has_gml && ps16.has_gml && !gl19.has_gml);
    assert_eq!((bbs04.open, ps16.open, gl19.open), (OpenForm::Index, OpenForm::IndexWithProof, OpenForm::Unsupported));
    assert!(bbs04.require_open().is_ok());
    assert!(matches!(bbs04.require_open_proof(), Err(Error::UnsupportedOperation(_))));
    assert!(ps16.require_open_proof().is_ok());
    assert!(matches!(gl19.require_open(), Err(Error::UnsupportedOperation(_))));
    assert!(gl19.require_blind().is_ok());
    assert!(matches!(ps16.require_blind(), Err(Error::UnsupportedOperation(_))));
}

#[test]
fn byte_reader_checks_headers() {
    let mut w = ByteWriter::new(SchemeVariant::Ps16, kind::SIGNATURE);
    w.u64(42).flag(true).bytes(b"abc");
    let bytes = w.finish();
    assert_eq!(peek_scheme(&bytes), Ok(SchemeVariant::Ps16));

    let mut r = ByteReader::open(&bytes, SchemeVariant::Ps16, kind::SIGNATURE).unwrap();
    assert_eq!(r.u64(), Ok(42));
    assert_eq!(r.flag(), Ok(true));
    assert_eq!(r.bytes(), Ok(b"abc".to_vec()));
    assert!(r.finish().is_ok());

    assert!(matches!(ByteReader::open(&bytes, SchemeVariant::Ps16, kind::PROOF), Err(Error::DecodeError(_))));
    assert!(matches!(ByteReader::open(&bytes, SchemeVariant::Bbs04, kind::SIGNATURE), Err(Error::SchemeMismatchError(_))));

    let mut r = ByteReader::open(&bytes, SchemeVariant::Ps16, kind::SIGNATURE).unwrap();
    r.u64().unwrap();
    assert!(matches!(r.finish(), Err(Error::DecodeError(_))));
}

#[test]
fn text_errors_are_distinct() {
    assert!(matches!(decode_text("0g"), Err(Error::TextDecodeError(_))));
    assert!(matches!(decode_text("abc"), Err(Error::TextDecodeError(_))));
    assert_eq!(decode_text("0104"), Ok(vec![1, 4]));
}

#[test]
fn join_message_steps() {
    let mut w = JoinMessage::writer(SchemeVariant::Gl19, 2);
    w.u64(7);
    let m = JoinMessage::from_writer(w);
    assert_eq!(m.scheme(), Ok(SchemeVariant::Gl19));
    assert_eq!(m.seq(), Some(2));
    assert!(matches!(m.reader(SchemeVariant::Gl19, 1), Err(Error::JoinError(_))));
    assert_eq!(m.reader(SchemeVariant::Gl19, 2).and_then(|mut r| r.u64()), Ok(7));
}

#[test]
fn config_sources() {
    assert_eq!(GroupsigConfig::default().credential_lifetime, DEFAULT_CREDENTIAL_LIFETIME);
    assert_eq!(GroupsigConfig::from_json("{}"), Ok(GroupsigConfig::default()));
    assert_eq!(GroupsigConfig::from_json(r#"{"credential_lifetime": 60}"#).map(|c| c.credential_lifetime), Ok(60));
    assert!(matches!(GroupsigConfig::from_json(r#"{"credential_lifetime": 0}"#), Err(Error::ConfigError(_))));
    assert!(matches!(GroupsigConfig::from_json("nope"), Err(Error::ConfigError(_))));
    assert!(matches!(GroupsigConfig::from_json(r#"{"credential_lifetime": "soon"}"#), Err(Error::ConfigError(_))));

    std::env::set_var(CREDENTIAL_LIFETIME_ENV, "120");
    assert_eq!(GroupsigConfig::from_env().map(|c| c.credential_lifetime), Ok(120));
    std::env::set_var(CREDENTIAL_LIFETIME_ENV, "soon");
    assert!(matches!(GroupsigConfig::from_env(), Err(Error::ConfigError(_))));
    std::env::remove_var(CREDENTIAL_LIFETIME_ENV);
    assert_eq!(GroupsigConfig::from_env(), Ok(GroupsigConfig::default()));
}

#[test]
fn identity_equality_ignores_message() {
    let a = Identity::from_index(SchemeVariant::Bbs04, 3);
    let b = Identity::new(SchemeVariant::Bbs04, "3".to_owned()).with_message("digest".to_owned());
    assert_eq!(a, b);
    assert_eq!(b.to_string(), "3");
    assert_ne!(a, Identity::from_index(SchemeVariant::Bbs04, 4));

    let json = serde_json::to_string(&b).unwrap();
    let back: Identity = serde_json::from_str(&json).unwrap();
    assert_eq!(back.message(), Some("digest"));
}

#[test]
fn proof_wrappers_need_a_part() {
    assert!(matches!(IndexProof::new(SchemeVariant::Ps16, None, None), Err(Error::OpenError(_))));
    assert!(matches!(IdProof::new(None, None), Err(Error::OpenError(_))));
    assert!(matches!(
        IndexProof::new(SchemeVariant::Bbs04, Some(1), Some(dummy_proof())),
        Err(Error::SchemeMismatchError(_))
    ));
    let gl19_id = Identity::new(SchemeVariant::Gl19, "ab".to_owned());
    assert!(matches!(IdProof::new(Some(gl19_id), Some(dummy_proof())), Err(Error::SchemeMismatchError(_))));

    let id_proof = IdProof::new(Some(Identity::from_index(SchemeVariant::Ps16, 0)), Some(dummy_proof())).unwrap();
    let decoded = IdProof::decode(&id_proof.encode()).unwrap();
    assert_eq!(decoded, id_proof);
    assert_eq!(decoded.proof(), Some(&dummy_proof()));

    let only_proof = IndexProof::new(SchemeVariant::Ps16, None, Some(dummy_proof())).unwrap();
    assert_eq!(IndexProof::decode(&only_proof.encode()).unwrap().index(), None);
}
