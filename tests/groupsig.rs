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
mod groupsig_tests {

    use std::{collections::HashSet, sync::Arc, thread};
    use groupsig::{
        errors::Error,
        gml::Gml,
        groupsig::{GroupSig, SetupState},
        identity::IndexProof,
        keys::{BlindingKey, GroupKey, ManagerKey, MemberKey},
        schemes::{algorithms::SchemeVariant, capabilities::JoinRole, generics::{Proof, Signature}},
        utils::{codec::Encodable, message::JoinMessage},
    };

    const MSG: &[u8] = b"Hello, World!";

    /// Authority side and a member-side instance holding only the group key.
    struct Group {
        authority: GroupSig,
        member: GroupSig,
    }

    fn init_logger() {
        dotenvy::dotenv().ok();
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn setup(variant: SchemeVariant) -> Group {
        init_logger();
        let mut authority = GroupSig::new(variant);
        authority.setup(None).unwrap();

        if variant == SchemeVariant::Gl19 {
            let partial = authority.group_key().unwrap().clone();
            let mut converter = GroupSig::new(variant);
            converter.setup(Some(&partial)).unwrap();
            let completed = GroupKey::decode(&converter.group_key().unwrap().encode()).unwrap();
            authority.setup(Some(&completed)).unwrap();
        }

        let mut member = GroupSig::new(variant);
        let grpkey = GroupKey::decode(&authority.group_key().unwrap().encode()).unwrap();
        member.set_group_key(grpkey).unwrap();
        Group { authority, member }
    }

    /// Runs the whole join protocol, passing every message through its text form.
    fn join(authority: &GroupSig, member: &GroupSig) -> MemberKey {
        let mut memkey = MemberKey::new(member.variant());
        let mut inbound: Option<JoinMessage> = None;
        for seq in 0..=authority.join_seq() {
            let outbound = match authority.capabilities().role_for_seq(seq).unwrap() {
                JoinRole::Authority => Some(authority.join_mgr(seq, inbound.as_ref()).unwrap()),
                JoinRole::Member => member.join_mem(&mut memkey, seq, inbound.as_ref()).unwrap(),
            };
            inbound = outbound.map(|m| JoinMessage::decode(&m.encode()).unwrap());
        }
        assert!(inbound.is_none());
        assert!(memkey.is_complete());
        memkey
    }

    fn sign_verify(variant: SchemeVariant) {
        let group = setup(variant);
        let memkey = join(&group.authority, &group.member);

        let sig = group.member.sign(MSG, &memkey, None).unwrap();
        assert_eq!(sig.scheme(), variant);
        assert!(group.member.verify(&sig, MSG).unwrap());
        assert!(group.authority.verify(&sig, MSG).unwrap());
        assert!(!group.member.verify(&sig, b"Hello, World?").unwrap());
    }

    fn exported_objects(variant: SchemeVariant) {
        let group = setup(variant);
        let memkey = join(&group.authority, &group.member);

        let imported = MemberKey::decode(&memkey.encode()).unwrap();
        assert_eq!(imported, memkey);
        let sig = group.member.sign(MSG, &imported, None).unwrap();

        let text = sig.encode();
        assert!(text.starts_with(&format!("{:02x}", variant.code())));
        let decoded = Signature::decode(&text).unwrap();
        assert_eq!(decoded, sig);
        assert!(group.member.verify(&decoded, MSG).unwrap());

        let json = serde_json::to_string(&sig).unwrap();
        let from_json: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(from_json, sig);

        let mgrkey = group.authority.manager_key().unwrap();
        assert_eq!(&ManagerKey::decode(&mgrkey.encode()).unwrap(), mgrkey);
        let grpkey = group.authority.group_key().unwrap();
        assert_eq!(&GroupKey::from_bytes(&grpkey.to_bytes()).unwrap(), grpkey);
    }

    fn seeded_signatures(variant: SchemeVariant) {
        let group = setup(variant);
        let memkey = join(&group.authority, &group.member);

        let a = group.member.sign(MSG, &memkey, Some(7)).unwrap();
        let b = group.member.sign(MSG, &memkey, Some(7)).unwrap();
        let c = group.member.sign(MSG, &memkey, Some(8)).unwrap();
        assert_eq!(a.encode(), b.encode());
        assert_ne!(a.encode(), c.encode());
        assert!(group.member.verify(&c, MSG).unwrap());
    }

    fn open_recovers_join_index(variant: SchemeVariant) {
        let group = setup(variant);
        let memkeys: Vec<MemberKey> = (0..3).map(|_| join(&group.authority, &group.member)).collect();
        assert_eq!(group.authority.gml().unwrap().len(), 3);

        for (k, memkey) in memkeys.iter().enumerate() {
            let sig = group.member.sign(MSG, memkey, None).unwrap();
            let opened = group.authority.open(&Signature::decode(&sig.encode()).unwrap()).unwrap();
            assert_eq!(opened.index(), Some(k as u64));
            assert_eq!(opened.identity().map(|id| id.to_string()), Some(k.to_string()));

            let exported = IndexProof::decode(&opened.encode()).unwrap();
            assert_eq!(exported, opened);
        }
    }

    fn join_out_of_order(variant: SchemeVariant) {
        let group = setup(variant);
        let last = group.authority.join_seq();
        let mut memkey = MemberKey::new(variant);

        match group.authority.join_mgr(1, None) {
            Err(Error::ProtocolSequenceError(_)) => {}
            other => panic!("authority step 1 accepted: {other:?}"),
        }
        match group.member.join_mem(&mut memkey, 0, None) {
            Err(Error::ProtocolSequenceError(_)) => {}
            other => panic!("member step 0 accepted: {other:?}"),
        }
        match group.authority.join_mgr(last + 1, None) {
            Err(Error::JoinError(_)) => {}
            other => panic!("step past the end accepted: {other:?}"),
        }
        if last >= 2 {
            match group.authority.join_mgr(2, None) {
                Err(Error::ProtocolSequenceError(_)) => {}
                other => panic!("authority skipped step 0: {other:?}"),
            }
        }
        // The rejected calls leave the instance ready for a regular run
        join(&group.authority, &group.member);
    }

    fn mismatched_scheme(variant: SchemeVariant, other: SchemeVariant) {
        let mut group = setup(variant);
        let foreign = setup(other);
        let foreign_key = join(&foreign.authority, &foreign.member);
        let foreign_sig = foreign.member.sign(MSG, &foreign_key, None).unwrap();

        assert!(matches!(group.member.verify(&foreign_sig, MSG), Err(Error::VerifyError(_))));
        assert!(matches!(group.member.sign(MSG, &foreign_key, None), Err(Error::SignError(_))));
        assert!(matches!(
            group.member.set_group_key(foreign.authority.group_key().unwrap().clone()),
            Err(Error::SchemeMismatchError(_))
        ));
    }

    //SIGN AND VERIFY

    #[test]
    fn sign_verify_bbs04() {
        sign_verify(SchemeVariant::Bbs04);
    }

    #[test]
    fn sign_verify_ps16() {
        sign_verify(SchemeVariant::Ps16);
    }

    #[test]
    fn sign_verify_gl19() {
        sign_verify(SchemeVariant::Gl19);
    }

    #[test]
    fn hello_world_bbs04() {
        let mut manager = GroupSig::new(SchemeVariant::Bbs04);
        manager.setup(None).unwrap();
        assert_eq!(manager.setup_state(), SetupState::Ready);

        let mut memkey = MemberKey::new(SchemeVariant::Bbs04);
        let m0 = manager.join_mgr(0, None).unwrap();
        assert!(manager.join_mem(&mut memkey, 1, Some(&m0)).unwrap().is_none());

        let sig = manager.sign(MSG, &memkey, None).unwrap();
        assert!(manager.verify(&sig, MSG).unwrap());
        assert!(!manager.verify(&sig, b"Hello, Worlds!").unwrap());
        assert_eq!(manager.open(&sig).unwrap().index(), Some(0));
    }

    //EXPORT AND IMPORT

    #[test]
    fn exported_objects_bbs04() {
        exported_objects(SchemeVariant::Bbs04);
    }

    #[test]
    fn exported_objects_ps16() {
        exported_objects(SchemeVariant::Ps16);
    }

    #[test]
    fn exported_objects_gl19() {
        exported_objects(SchemeVariant::Gl19);
    }

    #[test]
    fn malformed_text_and_bytes() {
        assert!(matches!(Signature::decode("not hex"), Err(Error::TextDecodeError(_))));
        assert!(matches!(Signature::from_bytes(&[]), Err(Error::DecodeError(_))));
        assert!(matches!(Signature::from_bytes(&[0x09, 0x07, 0x00]), Err(Error::DecodeError(_))));

        let group = setup(SchemeVariant::Ps16);
        let memkey = join(&group.authority, &group.member);
        let mut bytes = group.member.sign(MSG, &memkey, None).unwrap().to_bytes();
        bytes.push(0);
        assert!(matches!(Signature::from_bytes(&bytes), Err(Error::DecodeError(_))));
        bytes.truncate(bytes.len() - 10);
        assert!(matches!(Signature::from_bytes(&bytes), Err(Error::DecodeError(_))));
    }

    #[test]
    fn restored_authority_opens() {
        let group = setup(SchemeVariant::Bbs04);
        let memkeys: Vec<MemberKey> = (0..2).map(|_| join(&group.authority, &group.member)).collect();

        let mut restored = GroupSig::new(SchemeVariant::Bbs04);
        restored.set_group_key(GroupKey::decode(&group.authority.group_key().unwrap().encode()).unwrap()).unwrap();
        restored.set_manager_key(ManagerKey::decode(&group.authority.manager_key().unwrap().encode()).unwrap()).unwrap();
        restored.set_gml(Gml::decode(&group.authority.gml().unwrap().encode()).unwrap()).unwrap();

        let sig = group.member.sign(MSG, &memkeys[1], None).unwrap();
        assert_eq!(restored.open(&sig).unwrap().index(), Some(1));
    }

    //SEEDED SIGNATURES

    #[test]
    fn seeded_signatures_bbs04() {
        seeded_signatures(SchemeVariant::Bbs04);
    }

    #[test]
    fn seeded_signatures_gl19() {
        seeded_signatures(SchemeVariant::Gl19);
    }

    //OPEN

    #[test]
    fn open_recovers_join_index_bbs04() {
        open_recovers_join_index(SchemeVariant::Bbs04);
    }

    #[test]
    fn open_recovers_join_index_ps16() {
        open_recovers_join_index(SchemeVariant::Ps16);
    }

    #[test]
    fn open_verify_ps16() {
        let group = setup(SchemeVariant::Ps16);
        let alice = join(&group.authority, &group.member);
        let bob = join(&group.authority, &group.member);

        let sig = group.member.sign(MSG, &bob, None).unwrap();
        let opened = group.authority.open(&sig).unwrap();
        let index = opened.index().unwrap();
        let proof = Proof::decode(&opened.proof().unwrap().encode()).unwrap();
        assert_eq!(index, 1);

        // Any holder of the group key can check the opening
        assert!(group.member.open_verify(index, &proof, &sig).unwrap());
        assert!(!group.member.open_verify(0, &proof, &sig).unwrap());

        let other = group.member.sign(MSG, &alice, None).unwrap();
        assert!(!group.member.open_verify(index, &proof, &other).unwrap());

        // Low bit of the challenge, right after the two header bytes
        let mut altered = proof.to_bytes();
        altered[2 + 31] ^= 0x01;
        let altered = Proof::from_bytes(&altered).unwrap();
        assert!(!group.member.open_verify(index, &altered, &sig).unwrap());
    }

    //JOIN

    #[test]
    fn join_out_of_order_bbs04() {
        join_out_of_order(SchemeVariant::Bbs04);
    }

    #[test]
    fn join_out_of_order_ps16() {
        join_out_of_order(SchemeVariant::Ps16);
    }

    #[test]
    fn join_out_of_order_gl19() {
        join_out_of_order(SchemeVariant::Gl19);
    }

    #[test]
    fn join_with_replayed_challenge_fails() {
        let group = setup(SchemeVariant::Ps16);
        let mut first = MemberKey::new(SchemeVariant::Ps16);
        let m0 = group.authority.join_mgr(0, None).unwrap();
        let m1 = group.member.join_mem(&mut first, 1, Some(&m0)).unwrap().unwrap();
        group.authority.abort_join();
        group.member.abort_join();

        // A new run issues a new challenge; the stale answer must be refused
        let mut second = MemberKey::new(SchemeVariant::Ps16);
        let n0 = group.authority.join_mgr(0, None).unwrap();
        group.member.join_mem(&mut second, 1, Some(&n0)).unwrap();
        assert!(matches!(group.authority.join_mgr(2, Some(&m1)), Err(Error::JoinError(_))));
        assert_eq!(group.authority.gml().unwrap().len(), 0);
    }

    #[test]
    fn concurrent_joins_get_distinct_indices() {
        let group = setup(SchemeVariant::Bbs04);
        let authority = Arc::new(group.authority);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let authority = Arc::clone(&authority);
                thread::spawn(move || authority.join_mgr(0, None).unwrap())
            })
            .collect();
        let messages: Vec<JoinMessage> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(authority.gml().unwrap().len(), 8);

        let mut opened = HashSet::new();
        for m in &messages {
            let mut memkey = MemberKey::new(SchemeVariant::Bbs04);
            group.member.join_mem(&mut memkey, 1, Some(m)).unwrap();
            let sig = group.member.sign(MSG, &memkey, None).unwrap();
            opened.insert(authority.open(&sig).unwrap().index().unwrap());
        }
        assert_eq!(opened, (0..8).collect::<HashSet<u64>>());
    }

    //CAPABILITIES AND SEQUENCING

    #[test]
    fn unsupported_operations() {
        let bbs04 = setup(SchemeVariant::Bbs04);
        let memkey = join(&bbs04.authority, &bbs04.member);
        let sig = bbs04.member.sign(MSG, &memkey, None).unwrap();

        assert!(matches!(bbs04.member.blinding_key(), Err(Error::UnsupportedOperation(_))));
        assert!(matches!(BlindingKey::random(bbs04.member.group_key().unwrap()), Err(Error::UnsupportedOperation(_))));
        assert!(matches!(bbs04.member.blind(None, &sig, MSG), Err(Error::UnsupportedOperation(_))));

        let ps16 = setup(SchemeVariant::Ps16);
        let ps16_key = join(&ps16.authority, &ps16.member);
        let ps16_sig = ps16.member.sign(MSG, &ps16_key, None).unwrap();
        let opened = ps16.authority.open(&ps16_sig).unwrap();
        let proof = opened.proof().unwrap();
        assert!(matches!(bbs04.member.open_verify(0, proof, &sig), Err(Error::UnsupportedOperation(_))));

        let gl19 = setup(SchemeVariant::Gl19);
        let gl19_key = join(&gl19.authority, &gl19.member);
        let gl19_sig = gl19.member.sign(MSG, &gl19_key, None).unwrap();
        assert!(matches!(gl19.authority.open(&gl19_sig), Err(Error::UnsupportedOperation(_))));
        assert!(matches!(gl19.member.open_verify(0, proof, &gl19_sig), Err(Error::UnsupportedOperation(_))));
        assert!(!gl19.member.has_gml());

        // Blind pipeline objects handed to schemes without one
        let (bldkey, bsig) = gl19.member.blind(None, &gl19_sig, MSG).unwrap();
        for group in [&bbs04, &ps16] {
            assert!(matches!(group.authority.convert(&[bsig.clone()], &bldkey), Err(Error::UnsupportedOperation(_))));
            assert!(matches!(group.member.unblind(&bsig, &bldkey), Err(Error::UnsupportedOperation(_))));
        }
        assert!(matches!(ps16.member.blinding_key(), Err(Error::UnsupportedOperation(_))));
        assert!(matches!(ps16.member.blind(None, &ps16_sig, MSG), Err(Error::UnsupportedOperation(_))));
        assert!(matches!(
            ps16.member.unblind_with_signature(&ps16_sig, &bsig, &bldkey),
            Err(Error::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn setup_out_of_sequence() {
        let mut bbs04 = GroupSig::new(SchemeVariant::Bbs04);
        bbs04.setup(None).unwrap();
        assert!(matches!(bbs04.setup(None), Err(Error::ProtocolSequenceError(_))));

        let mut issuer = GroupSig::new(SchemeVariant::Gl19);
        issuer.setup(None).unwrap();
        assert_eq!(issuer.setup_state(), SetupState::IssuerInitialized);
        assert!(matches!(issuer.setup(None), Err(Error::ProtocolSequenceError(_))));

        let mut converter = GroupSig::new(SchemeVariant::Gl19);
        converter.setup(Some(issuer.group_key().unwrap())).unwrap();
        assert_eq!(converter.setup_state(), SetupState::ConverterCompleted);
        let completed = converter.group_key().unwrap().clone();
        assert!(matches!(converter.setup(Some(&completed)), Err(Error::ProtocolSequenceError(_))));

        issuer.setup(Some(&completed)).unwrap();
        assert_eq!(issuer.setup_state(), SetupState::IssuerFinalized);
        assert_eq!(issuer.group_key(), Some(&completed));
        assert!(matches!(issuer.setup(Some(&completed)), Err(Error::ProtocolSequenceError(_))));
    }

    #[test]
    fn mismatched_scheme_bbs04_ps16() {
        mismatched_scheme(SchemeVariant::Bbs04, SchemeVariant::Ps16);
    }

    #[test]
    fn mismatched_scheme_gl19_bbs04() {
        mismatched_scheme(SchemeVariant::Gl19, SchemeVariant::Bbs04);
    }
}
