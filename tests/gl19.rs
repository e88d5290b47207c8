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


#![allow(non_snake_case)]

#[cfg(test)]
mod gl19_tests {

    use std::time::{SystemTime, UNIX_EPOCH};
    use groupsig::{
        config::GroupsigConfig,
        errors::Error,
        gl19::backend::blinded_message_digest,
        gml::{Gml, GmlEntry},
        groupsig::{GroupSig, SetupState},
        identity::Identity,
        keys::{AuthorityRole, BlindingKey, GroupKey, ManagerKey, MemberKey},
        schemes::{algorithms::SchemeVariant, generics::{BlindSignature, BlindStage, Signature}},
        utils::codec::Encodable,
    };

    const GL19: SchemeVariant = SchemeVariant::Gl19;

    struct Parties {
        issuer: GroupSig,
        converter: GroupSig,
        member: GroupSig,
    }

    fn init_logger() {
        dotenvy::dotenv().ok();
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn parties(config: GroupsigConfig) -> Parties {
        init_logger();
        let mut issuer = GroupSig::new(GL19).with_config(config);
        issuer.setup(None).unwrap();
        let mut converter = GroupSig::new(GL19);
        converter.setup(issuer.group_key()).unwrap();
        let completed = converter.group_key().unwrap().clone();
        issuer.setup(Some(&completed)).unwrap();

        let mut member = GroupSig::new(GL19);
        member.set_group_key(completed).unwrap();
        Parties { issuer, converter, member }
    }

    fn join(issuer: &GroupSig, member: &GroupSig) -> MemberKey {
        let mut memkey = MemberKey::new(GL19);
        let m0 = issuer.join_mgr(0, None).unwrap();
        let m1 = member.join_mem(&mut memkey, 1, Some(&m0)).unwrap().unwrap();
        let m2 = issuer.join_mgr(2, Some(&m1)).unwrap();
        assert!(member.join_mem(&mut memkey, 3, Some(&m2)).unwrap().is_none());
        memkey
    }

    fn now() -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs()
    }

    /// Blinds one signature per `(memkey, message)` under a shared key and
    /// converts them as a single batch.
    fn convert_batch(p: &Parties, signers: &[(&MemberKey, &str)]) -> (BlindingKey, Vec<BlindSignature>) {
        let bldkey = p.member.blinding_key().unwrap();
        let blinded: Vec<BlindSignature> = signers.iter()
            .map(|(memkey, msg)| {
                let sig = p.member.sign(msg.as_bytes(), memkey, None).unwrap();
                assert!(p.member.verify(&sig, msg.as_bytes()).unwrap());
                let (_, bsig) = p.member.blind(Some(&bldkey.public_key()), &sig, msg.as_bytes()).unwrap();
                BlindSignature::decode(&bsig.encode()).unwrap()
            })
            .collect();
        let public = BlindingKey::decode(&bldkey.export_pub()).unwrap();
        let converted = p.converter.convert(&blinded, &public).unwrap();
        (bldkey, converted)
    }

    fn unblind_all(p: &Parties, bldkey: &BlindingKey, converted: &[BlindSignature]) -> Vec<Identity> {
        converted.iter().map(|csig| p.member.unblind(csig, bldkey).unwrap()).collect()
    }

    #[test]
    fn setup_needs_both_authorities() {
        let mut issuer = GroupSig::new(GL19);
        issuer.setup(None).unwrap();
        let partial = issuer.group_key().unwrap().clone();

        let mut member = GroupSig::new(GL19);
        member.set_group_key(partial.clone()).unwrap();
        let memkey = join(&issuer, &member);
        assert!(matches!(member.sign(b"early", &memkey, None), Err(Error::SignError(_))));

        // A converter key built for another issuer is refused
        let mut stranger = GroupSig::new(GL19);
        stranger.setup(None).unwrap();
        let mut converter = GroupSig::new(GL19);
        converter.setup(stranger.group_key()).unwrap();
        assert!(matches!(issuer.setup(converter.group_key()), Err(Error::SetupError(_))));

        let exported = GroupKey::decode(&partial.encode()).unwrap();
        assert_eq!(exported, partial);
    }

    #[test]
    fn restored_keys_resume_setup() {
        init_logger();
        let mut issuer = GroupSig::new(GL19);
        issuer.setup(None).unwrap();
        let partial = GroupKey::decode(&issuer.group_key().unwrap().encode()).unwrap();
        let isk = ManagerKey::decode(&issuer.manager_key().unwrap().encode()).unwrap();

        let restore = || {
            let mut restored = GroupSig::new(GL19);
            restored.set_group_key(partial.clone()).unwrap();
            restored.set_manager_key(isk.clone()).unwrap();
            assert_eq!(restored.setup_state(), SetupState::IssuerInitialized);
            restored
        };

        // Another issuer's partial key neither finalizes nor swaps the issuing key
        let mut other = GroupSig::new(GL19);
        other.setup(None).unwrap();
        let mut restored = restore();
        assert!(matches!(restored.setup(other.group_key()), Err(Error::SetupError(_))));
        assert_eq!(restored.manager_key().map(ManagerKey::role), Some(AuthorityRole::Issuer));
        assert_eq!(restored.setup_state(), SetupState::IssuerInitialized);

        let mut converter = GroupSig::new(GL19);
        converter.setup(Some(&partial)).unwrap();
        let completed = converter.group_key().unwrap().clone();
        let mut restored = restore();
        restored.setup(Some(&completed)).unwrap();
        assert_eq!(restored.setup_state(), SetupState::IssuerFinalized);
        assert_eq!(restored.group_key(), Some(&completed));

        let mut restored_converter = GroupSig::new(GL19);
        restored_converter.set_group_key(completed.clone()).unwrap();
        restored_converter.set_manager_key(converter.manager_key().unwrap().clone()).unwrap();
        assert_eq!(restored_converter.setup_state(), SetupState::ConverterCompleted);

        // A member holding the group key has no setup phase left
        let mut member = GroupSig::new(GL19);
        member.set_group_key(completed.clone()).unwrap();
        assert_eq!(member.setup_state(), SetupState::Adopted);
        assert!(matches!(member.setup(None), Err(Error::ProtocolSequenceError(_))));
        assert!(matches!(member.setup(Some(&partial)), Err(Error::ProtocolSequenceError(_))));
        assert_eq!(member.group_key(), Some(&completed));
    }

    #[test]
    fn signatures_carry_configured_expiration() {
        let config = GroupsigConfig::from_json(r#"{"credential_lifetime": 3600}"#).unwrap();
        let p = parties(config);
        let memkey = join(&p.issuer, &p.member);

        let before = now();
        let Signature::Gl19(sig) = p.member.sign(b"msg", &memkey, None).unwrap() else {
            panic!("expected a GL19 signature");
        };
        assert!(sig.expiration <= before + 3600);
        assert!(sig.expiration + 60 >= before + 3600);
    }

    #[test]
    fn expiration_is_bound_to_signature() {
        let p = parties(GroupsigConfig::default());
        let memkey = join(&p.issuer, &p.member);
        let sig = p.member.sign(b"msg", &memkey, None).unwrap();
        let Signature::Gl19(mut inner) = sig else { panic!("expected a GL19 signature") };
        inner.expiration += 1;
        assert!(!p.member.verify(&Signature::Gl19(inner), b"msg").unwrap());
    }

    #[test]
    fn registry_only_when_installed() {
        let mut p = parties(GroupsigConfig::default());
        join(&p.issuer, &p.member);
        assert!(p.issuer.gml().is_none());

        p.issuer.set_gml(Gml::new(GL19)).unwrap();
        join(&p.issuer, &p.member);
        join(&p.issuer, &p.member);
        let gml = p.issuer.gml().unwrap();
        assert_eq!(gml.len(), 2);
        assert!(matches!(gml.get(1), Some(GmlEntry::Gl19 { .. })));
    }

    #[test]
    fn blind_convert_unblind() {
        let p = parties(GroupsigConfig::default());
        let alice = join(&p.issuer, &p.member);
        let bob = join(&p.issuer, &p.member);

        let (bldkey, converted) = convert_batch(&p, &[(&alice, "first"), (&alice, "second"), (&bob, "third")]);
        assert_eq!(converted.len(), 3);
        assert!(converted.iter().all(|c| c.stage() == BlindStage::Converted));

        let ids = unblind_all(&p, &bldkey, &converted);
        assert_eq!(ids[0], ids[1]);
        assert_ne!(ids[0], ids[2]);
        assert_eq!(ids[0].message(), Some(blinded_message_digest(b"first").as_str()));
        assert_eq!(ids[2].message(), Some(blinded_message_digest(b"third").as_str()));

        let exported = Identity::decode(&ids[0].encode()).unwrap();
        assert_eq!(exported, ids[0]);
    }

    #[test]
    fn imported_converter_key_converts() {
        let p = parties(GroupsigConfig::default());
        let alice = join(&p.issuer, &p.member);
        let bob = join(&p.issuer, &p.member);

        let mut converter = GroupSig::new(GL19);
        converter.set_group_key(GroupKey::decode(&p.converter.group_key().unwrap().encode()).unwrap()).unwrap();
        let csk = ManagerKey::decode(&p.converter.manager_key().unwrap().encode()).unwrap();
        assert_eq!(&csk, p.converter.manager_key().unwrap());
        converter.set_manager_key(csk).unwrap();
        assert_eq!(converter.setup_state(), SetupState::ConverterCompleted);

        let p = Parties { converter, ..p };
        let (bldkey, converted) = convert_batch(&p, &[(&alice, "first"), (&bob, "second"), (&alice, "third")]);
        let ids = unblind_all(&p, &bldkey, &converted);
        assert_eq!(ids[0], ids[2]);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn pseudonyms_change_between_batches() {
        let p = parties(GroupsigConfig::default());
        let alice = join(&p.issuer, &p.member);

        let (k1, first) = convert_batch(&p, &[(&alice, "msg")]);
        let (k2, second) = convert_batch(&p, &[(&alice, "msg")]);
        assert_ne!(unblind_all(&p, &k1, &first), unblind_all(&p, &k2, &second));
    }

    #[test]
    fn conversion_stages_are_enforced() {
        let p = parties(GroupsigConfig::default());
        let alice = join(&p.issuer, &p.member);
        let sig = p.member.sign(b"msg", &alice, None).unwrap();

        let (bldkey, bsig) = p.member.blind(None, &sig, b"msg").unwrap();
        assert!(bldkey.has_private());
        assert_eq!(BlindingKey::decode(&bldkey.export()).unwrap(), bldkey);
        assert!(!BlindingKey::decode(&bldkey.export_pub()).unwrap().has_private());
        assert_eq!(bsig.stage(), BlindStage::Blinded);
        assert!(matches!(p.member.unblind(&bsig, &bldkey), Err(Error::UnblindError(_))));

        let converted = p.converter.convert(std::slice::from_ref(&bsig), &bldkey.public_key()).unwrap();
        let batch = vec![bsig.clone(), converted[0].clone()];
        assert!(matches!(p.converter.convert(&batch, &bldkey), Err(Error::ConvertError(_))));

        assert!(matches!(p.member.unblind(&converted[0], &bldkey.public_key()), Err(Error::UnblindError(_))));
        let id = p.member.unblind_with_signature(&sig, &converted[0], &bldkey).unwrap();
        assert_eq!(id.scheme(), GL19);
    }

    #[test]
    fn only_the_converter_converts() {
        let p = parties(GroupsigConfig::default());
        let alice = join(&p.issuer, &p.member);
        let sig = p.member.sign(b"msg", &alice, None).unwrap();
        let (bldkey, bsig) = p.member.blind(None, &sig, b"msg").unwrap();

        assert!(matches!(p.issuer.convert(&[bsig.clone()], &bldkey), Err(Error::ConvertError(_))));
        assert!(matches!(p.member.convert(&[bsig], &bldkey), Err(Error::ConvertError(_))));
        assert!(matches!(p.converter.join_mgr(0, None), Err(Error::JoinError(_))));
    }

    #[test]
    fn empty_batch_converts_to_nothing() {
        let p = parties(GroupsigConfig::default());
        let bldkey = BlindingKey::random(p.member.group_key().unwrap()).unwrap();
        assert!(p.converter.convert(&[], &bldkey).unwrap().is_empty());
    }
}
