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


use core::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use crate::{
    backend::{default_backend, MgrJoinStep, SchemeBackend},
    config::GroupsigConfig,
    errors::Error,
    gml::Gml,
    identity::{Identity, IndexProof},
    keys::{AuthorityRole, BlindingKey, GroupKey, ManagerKey, MemberKey},
    schemes::{
        algorithms::SchemeVariant,
        capabilities::{Capabilities, JoinRole},
        generics::{BlindSignature, Proof, Signature},
    },
    utils::message::JoinMessage,
};

/// Where an instance stands in its setup protocol.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SetupState {
    /// No setup has run on this instance
    Empty,
    /// Single-call setup completed (BBS04, PS16)
    Ready,
    /// GL19 issuer generated its parameters; the group key is partial
    IssuerInitialized,
    /// GL19 converter added its parameters to the issuer's group key
    ConverterCompleted,
    /// GL19 issuer adopted the converter's group key
    IssuerFinalized,
    /// GL19 keys installed through the setters that match no setup phase,
    /// such as a member's group key
    Adopted,
}

#[derive(Debug)]
struct JoinCursors {
    authority_next: u8,
    member_next: u8,
    /// Last message the authority sent in the current run
    sent: Option<JoinMessage>,
}

impl JoinCursors {
    fn new(caps: &Capabilities) -> Self {
        Self {
            authority_next: caps.first_step(JoinRole::Authority),
            member_next: caps.first_step(JoinRole::Member),
            sent: None,
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// One party's view of a group signature scheme instance.
///
/// The same type serves every role: an authority holds the group key, its
/// manager key and (when the scheme has one) the membership list; a member
/// or verifier only holds the group key. Every operation first checks the
/// scheme's [`Capabilities`] and fails with [`Error::UnsupportedOperation`]
/// before reaching the backend when the scheme lacks it.
///
/// Join steps on one instance are serialized, so a `GroupSig` can be shared
/// between threads behind an [`Arc`].
pub struct GroupSig {
    variant: SchemeVariant,
    backend: Arc<dyn SchemeBackend>,
    config: GroupsigConfig,
    grpkey: Option<GroupKey>,
    mgrkey: Option<ManagerKey>,
    gml: Option<Mutex<Gml>>,
    setup_state: SetupState,
    join: Mutex<JoinCursors>,
}

impl fmt::Debug for GroupSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupSig")
            .field("variant", &self.variant)
            .field("setup_state", &self.setup_state)
            .field("has_group_key", &self.grpkey.is_some())
            .field("has_manager_key", &self.mgrkey.is_some())
            .finish_non_exhaustive()
    }
}

impl GroupSig {

    /// An empty instance backed by the built-in implementation of `variant`.
    pub fn new(variant: SchemeVariant) -> Self {
        Self::build(variant, default_backend(variant))
    }

    /// An empty instance driving `backend`, which must implement `variant`.
    pub fn with_backend(variant: SchemeVariant, backend: Arc<dyn SchemeBackend>) -> Result<Self, Error> {
        variant.expect(backend.variant(), "backend")?;
        Ok(Self::build(variant, backend))
    }

    fn build(variant: SchemeVariant, backend: Arc<dyn SchemeBackend>) -> Self {
        Self {
            variant,
            backend,
            config: GroupsigConfig::default(),
            grpkey: None,
            mgrkey: None,
            gml: None,
            setup_state: SetupState::Empty,
            join: Mutex::new(JoinCursors::new(Capabilities::of(variant))),
        }
    }

    pub fn with_config(mut self, config: GroupsigConfig) -> Self {
        self.config = config;
        self
    }

    pub fn variant(&self) -> SchemeVariant {
        self.variant
    }

    pub fn capabilities(&self) -> &'static Capabilities {
        Capabilities::of(self.variant)
    }

    pub fn has_gml(&self) -> bool {
        self.capabilities().has_gml
    }

    /// Last valid join `seq`
    pub fn join_seq(&self) -> u8 {
        self.capabilities().join_seq
    }

    /// Role sending the `seq = 0` join message
    pub fn join_start(&self) -> JoinRole {
        self.capabilities().join_start
    }

    pub fn config(&self) -> &GroupsigConfig {
        &self.config
    }

    pub fn setup_state(&self) -> SetupState {
        self.setup_state
    }

    pub fn group_key(&self) -> Option<&GroupKey> {
        self.grpkey.as_ref()
    }

    pub fn manager_key(&self) -> Option<&ManagerKey> {
        self.mgrkey.as_ref()
    }

    /// Snapshot of the membership list
    pub fn gml(&self) -> Option<Gml> {
        self.gml.as_ref().map(|m| lock(m).clone())
    }

    /// Adopts a group key obtained from an authority.
    pub fn set_group_key(&mut self, grpkey: GroupKey) -> Result<(), Error> {
        self.variant.expect(grpkey.scheme(), "group key")?;
        self.grpkey = Some(grpkey);
        self.adopt_setup_state();
        Ok(())
    }

    /// Adopts a previously exported manager key.
    pub fn set_manager_key(&mut self, mgrkey: ManagerKey) -> Result<(), Error> {
        self.variant.expect(mgrkey.scheme(), "manager key")?;
        self.mgrkey = Some(mgrkey);
        self.adopt_setup_state();
        Ok(())
    }

    /// Realigns the setup state with the keys now held, so that a restored
    /// authority resumes the protocol where its keys left it.
    fn adopt_setup_state(&mut self) {
        let complete = self.grpkey.as_ref().and_then(|gk| gk.gl19().ok()).map(|gk| gk.is_complete());
        self.setup_state = match (self.variant, complete, self.mgrkey.as_ref().map(ManagerKey::role)) {
            _ if self.grpkey.is_none() && self.mgrkey.is_none() => SetupState::Empty,
            (SchemeVariant::Bbs04 | SchemeVariant::Ps16, _, _) => SetupState::Ready,
            (SchemeVariant::Gl19, Some(false), Some(AuthorityRole::Issuer)) => SetupState::IssuerInitialized,
            (SchemeVariant::Gl19, Some(true), Some(AuthorityRole::Issuer)) => SetupState::IssuerFinalized,
            (SchemeVariant::Gl19, Some(true), Some(AuthorityRole::Converter)) => SetupState::ConverterCompleted,
            _ => SetupState::Adopted,
        };
        log::debug!("{} keys adopted, setup state is {:?}", self.variant, self.setup_state);
    }

    /// Installs a membership list, replacing the current one. Schemes without
    /// a mandatory list record members only once one is installed.
    pub fn set_gml(&mut self, gml: Gml) -> Result<(), Error> {
        self.variant.expect(gml.scheme(), "membership list")?;
        self.gml = Some(Mutex::new(gml));
        Ok(())
    }

    /// Runs this instance's part of the setup protocol.
    ///
    /// # Description
    /// BBS04 and PS16 set up in one call with no input. GL19 takes three calls
    /// spread over two instances:
    /// 1. the issuer calls `setup(None)` and obtains a partial group key;
    /// 2. the converter calls `setup(Some(partial))` on a fresh instance and
    ///    obtains the completed group key;
    /// 3. the issuer calls `setup(Some(completed))` to adopt it.
    ///
    /// # Inputs:
    /// * `grpkey` (OPTIONAL), the group key received from the other authority.
    ///
    /// # Output:
    /// () or [`Error::ProtocolSequenceError`] when the call does not match the
    /// local state.
    pub fn setup(&mut self, grpkey: Option<&GroupKey>) -> Result<(), Error> {
        if let Some(gk) = grpkey {
            self.variant.expect(gk.scheme(), "group key")?;
        }
        let mut rng = rand::thread_rng();

        match (self.variant, self.setup_state, grpkey) {
            (SchemeVariant::Bbs04 | SchemeVariant::Ps16, SetupState::Empty, None) => {
                let out = self.backend.setup(&mut rng, None)?;
                self.install(out.grpkey, out.mgrkey, out.gml);
                self.setup_state = SetupState::Ready;
            }
            (SchemeVariant::Gl19, SetupState::Empty, None) => {
                let out = self.backend.setup(&mut rng, None)?;
                self.install(out.grpkey, out.mgrkey, out.gml);
                self.setup_state = SetupState::IssuerInitialized;
            }
            (SchemeVariant::Gl19, SetupState::Empty, Some(partial)) => {
                let out = self.backend.setup(&mut rng, Some(partial))?;
                self.install(out.grpkey, out.mgrkey, out.gml);
                self.setup_state = SetupState::ConverterCompleted;
            }
            (SchemeVariant::Gl19, SetupState::IssuerInitialized, Some(completed)) => {
                self.finalize_issuer(completed)?;
                self.setup_state = SetupState::IssuerFinalized;
            }
            (variant, state, grpkey) => {
                log::warn!("{variant} setup rejected in state {state:?} (group key given: {})", grpkey.is_some());
                return Err(Error::ProtocolSequenceError(format!(
                    "{variant} setup cannot run in state {state:?} {} a group key",
                    if grpkey.is_some() { "with" } else { "without" },
                )));
            }
        }
        log::debug!("{} setup reached {:?}", self.variant, self.setup_state);
        Ok(())
    }

    fn install(&mut self, grpkey: GroupKey, mgrkey: ManagerKey, gml: Option<Gml>) {
        self.grpkey = Some(grpkey);
        self.mgrkey = Some(mgrkey);
        self.gml = gml.map(Mutex::new);
    }

    fn finalize_issuer(&mut self, completed: &GroupKey) -> Result<(), Error> {
        let (Some(current), Some(ManagerKey::Gl19Issuer(_))) = (self.grpkey.as_ref(), self.mgrkey.as_ref()) else {
            return Err(Error::ProtocolSequenceError("the issuer's final setup phase requires its own group and issuing keys".to_owned()));
        };
        let current = current.gl19()?;
        let received = completed.gl19()?;
        if !received.is_complete() {
            return Err(Error::SetupError("the received group key lacks the converter parameters".to_owned()));
        }
        if !current.same_issuer(received) {
            return Err(Error::SetupError("the received group key carries different issuer parameters".to_owned()));
        }
        self.grpkey = Some(completed.clone());
        Ok(())
    }

    fn refuse(&self, check: Result<(), Error>) -> Result<(), Error> {
        if let Err(e) = &check {
            log::warn!("{e}");
        }
        check
    }

    fn sequence_error(&self, role: JoinRole, seq: u8, expected: u8) -> Error {
        log::warn!("{} {role:?} join step {seq} rejected, expected {expected}", self.variant);
        Error::ProtocolSequenceError(format!("{role:?} join step {seq} called, expected step {expected}"))
    }

    fn check_step(&self, seq: u8, role: JoinRole) -> Result<(), Error> {
        let caps = self.capabilities();
        match caps.role_for_seq(seq) {
            None => Err(Error::JoinError(format!("{} join has no step {seq} (last is {})", self.variant, caps.join_seq))),
            Some(r) if r != role => Err(self.sequence_error(role, seq, {
                let cursors = lock(&self.join);
                match role {
                    JoinRole::Authority => cursors.authority_next,
                    JoinRole::Member => cursors.member_next,
                }
            })),
            Some(_) => Ok(()),
        }
    }

    /// Authority side of the join protocol.
    ///
    /// # Description
    /// Performs step `seq`, which must be the next authority step of the
    /// current run. The step that issues the credential appends the new member
    /// to the membership list while holding its lock, so concurrent joins
    /// receive distinct, increasing indices.
    ///
    /// # Inputs:
    /// * `seq`, the step number.
    /// * `inbound` (OPTIONAL), the member's last message; ignored on step 0.
    ///
    /// # Output:
    /// The message to hand to the member, or an [`Error`].
    pub fn join_mgr(&self, seq: u8, inbound: Option<&JoinMessage>) -> Result<JoinMessage, Error> {
        self.check_step(seq, JoinRole::Authority)?;
        let caps = self.capabilities();

        let grpkey = self.grpkey.as_ref().ok_or_else(|| Error::JoinError("no group key".to_owned()))?;
        let mgrkey = self.mgrkey.as_ref().ok_or_else(|| Error::JoinError("no manager key".to_owned()))?;
        if !mgrkey.role().can_issue() {
            return Err(Error::JoinError(format!("a {:?} key cannot issue credentials", mgrkey.role())));
        }
        if caps.has_gml && self.gml.is_none() {
            return Err(Error::JoinError(format!("{} join requires a membership list", self.variant)));
        }
        let inbound = if seq == 0 { None } else { inbound };
        if let Some(m) = inbound {
            self.variant.expect(m.scheme()?, "join message")?;
        }

        let mut cursors = lock(&self.join);
        if seq != cursors.authority_next {
            return Err(self.sequence_error(JoinRole::Authority, seq, cursors.authority_next));
        }

        let mut gml = self.gml.as_ref().map(lock);
        let mut rng = rand::thread_rng();
        let result = self.backend.join_mgr(&mut rng, MgrJoinStep {
            seq,
            grpkey,
            mgrkey,
            gml: gml.as_deref_mut(),
            inbound,
            sent: cursors.sent.as_ref(),
            config: &self.config,
        });

        let first = caps.first_step(JoinRole::Authority);
        match result {
            Ok(out) => {
                if caps.is_last_step(JoinRole::Authority, seq) {
                    cursors.authority_next = first;
                    cursors.sent = None;
                } else {
                    cursors.authority_next = seq + 2;
                    cursors.sent = Some(out.clone());
                }
                log::debug!("{} authority join step {seq} done", self.variant);
                Ok(out)
            }
            Err(e) => {
                cursors.authority_next = first;
                cursors.sent = None;
                log::warn!("{} authority join step {seq} failed: {e}", self.variant);
                Err(e)
            }
        }
    }

    /// Member side of the join protocol.
    ///
    /// Fills `memkey` progressively; after the member's last step it can sign.
    /// Returns the message to hand to the authority, or `None` after the last step.
    pub fn join_mem(&self, memkey: &mut MemberKey, seq: u8, inbound: Option<&JoinMessage>) -> Result<Option<JoinMessage>, Error> {
        self.check_step(seq, JoinRole::Member)?;
        let caps = self.capabilities();

        let grpkey = self.grpkey.as_ref().ok_or_else(|| Error::JoinError("no group key".to_owned()))?;
        self.variant.expect(memkey.scheme(), "member key")?;
        if let Some(m) = inbound {
            self.variant.expect(m.scheme()?, "join message")?;
        }

        let mut cursors = lock(&self.join);
        if seq != cursors.member_next {
            return Err(self.sequence_error(JoinRole::Member, seq, cursors.member_next));
        }

        let mut rng = rand::thread_rng();
        let result = self.backend.join_mem(&mut rng, seq, memkey, grpkey, inbound);

        let first = caps.first_step(JoinRole::Member);
        match result {
            Ok(out) => {
                cursors.member_next = if caps.is_last_step(JoinRole::Member, seq) { first } else { seq + 2 };
                log::debug!("{} member join step {seq} done", self.variant);
                Ok(out)
            }
            Err(e) => {
                cursors.member_next = first;
                log::warn!("{} member join step {seq} failed: {e}", self.variant);
                Err(e)
            }
        }
    }

    /// Abandons any join run in progress on this instance.
    pub fn abort_join(&self) {
        *lock(&self.join) = JoinCursors::new(self.capabilities());
    }

    /// Signs `msg` with `memkey`. With a `seed` the signature is reproducible.
    pub fn sign(&self, msg: &[u8], memkey: &MemberKey, seed: Option<u64>) -> Result<Signature, Error> {
        self.variant.expect(memkey.scheme(), "member key").map_err(|e| Error::SignError(e.to_string()))?;
        let grpkey = self.grpkey.as_ref().ok_or_else(|| Error::SignError("no group key".to_owned()))?;
        if !memkey.is_complete() {
            return Err(Error::SignError("the member key has not completed the join".to_owned()));
        }

        let mut seeded;
        let mut fresh;
        let rng: &mut dyn RngCore = match seed {
            Some(seed) => {
                seeded = ChaCha20Rng::seed_from_u64(seed);
                &mut seeded
            }
            None => {
                fresh = rand::thread_rng();
                &mut fresh
            }
        };
        self.backend.sign(rng, msg, memkey, grpkey)
    }

    /// Whether `sig` is a valid group signature on `msg`. Fails only on
    /// malformed input, such as a signature of another scheme.
    pub fn verify(&self, sig: &Signature, msg: &[u8]) -> Result<bool, Error> {
        self.variant.expect(sig.scheme(), "signature").map_err(|e| Error::VerifyError(e.to_string()))?;
        let grpkey = self.grpkey.as_ref().ok_or_else(|| Error::VerifyError("no group key".to_owned()))?;
        self.backend.verify(sig, msg, grpkey)
    }

    /// Recovers the membership index of the signer of `sig`, with a proof
    /// when the scheme produces one.
    pub fn open(&self, sig: &Signature) -> Result<IndexProof, Error> {
        self.refuse(self.capabilities().require_open())?;
        self.variant.expect(sig.scheme(), "signature")?;
        let grpkey = self.grpkey.as_ref().ok_or_else(|| Error::OpenError("no group key".to_owned()))?;
        let mgrkey = self.mgrkey.as_ref().ok_or_else(|| Error::OpenError("no manager key".to_owned()))?;
        let gml = self.gml.as_ref().ok_or_else(|| Error::OpenError("no membership list".to_owned()))?;

        let gml = lock(gml);
        let (index, proof) = self.backend.open(&mut rand::thread_rng(), sig, grpkey, mgrkey, &gml)?;
        log::debug!("{} signature opened to member {index}", self.variant);
        IndexProof::new(self.variant, Some(index), proof)
    }

    /// Checks an opening proof against the group key alone.
    pub fn open_verify(&self, index: u64, proof: &Proof, sig: &Signature) -> Result<bool, Error> {
        self.refuse(self.capabilities().require_open_proof())?;
        self.variant.expect(proof.scheme(), "proof")?;
        self.variant.expect(sig.scheme(), "signature")?;
        let grpkey = self.grpkey.as_ref().ok_or_else(|| Error::VerifyError("no group key".to_owned()))?;
        self.backend.open_verify(index, proof, sig, grpkey)
    }

    /// A fresh blinding keypair.
    pub fn blinding_key(&self) -> Result<BlindingKey, Error> {
        self.refuse(self.capabilities().require_blind())?;
        let grpkey = self.grpkey.as_ref().ok_or_else(|| Error::BlindError("no group key".to_owned()))?;
        self.backend.blinding_key(&mut rand::thread_rng(), grpkey)
    }

    /// Blinds `sig` on `msg` for the converter.
    ///
    /// # Inputs:
    /// * `bldkey` (OPTIONAL), the blinding key to use, full or public only. A
    ///   fresh keypair is generated when absent.
    /// * `sig`, the signature to blind.
    /// * `msg`, the message `sig` was produced on.
    ///
    /// # Output:
    /// The blinding key that was used and the blinded signature.
    pub fn blind(&self, bldkey: Option<&BlindingKey>, sig: &Signature, msg: &[u8]) -> Result<(BlindingKey, BlindSignature), Error> {
        self.refuse(self.capabilities().require_blind())?;
        self.variant.expect(sig.scheme(), "signature")?;
        let grpkey = self.grpkey.as_ref().ok_or_else(|| Error::BlindError("no group key".to_owned()))?;

        let bldkey = match bldkey {
            Some(k) => {
                self.variant.expect(k.scheme(), "blinding key")?;
                k.clone()
            }
            None => self.backend.blinding_key(&mut rand::thread_rng(), grpkey)?,
        };
        let bsig = self.backend.blind(&mut rand::thread_rng(), grpkey, &bldkey, sig, msg)?;
        Ok((bldkey, bsig))
    }

    /// Converts a batch of blinded signatures, all blinded under `bldkey`.
    /// The output keeps the order of the input; any failing element fails
    /// the whole batch.
    pub fn convert(&self, bsigs: &[BlindSignature], bldkey: &BlindingKey) -> Result<Vec<BlindSignature>, Error> {
        self.refuse(self.capabilities().require_blind())?;
        self.variant.expect(bldkey.scheme(), "blinding key")?;
        if let Some(other) = bsigs.iter().find(|b| b.scheme() != self.variant) {
            return Err(Error::SchemeMismatchError(format!("{} blind signature in a {} batch", other.scheme(), self.variant)));
        }
        let grpkey = self.grpkey.as_ref().ok_or_else(|| Error::ConvertError("no group key".to_owned()))?;
        let mgrkey = self.mgrkey.as_ref().ok_or_else(|| Error::ConvertError("no conversion key".to_owned()))?;

        let converted = self.backend.convert(&mut rand::thread_rng(), bsigs, grpkey, mgrkey, bldkey)?;
        log::debug!("{} converted a batch of {}", self.variant, converted.len());
        Ok(converted)
    }

    /// Recovers the identity behind a converted signature.
    pub fn unblind(&self, csig: &BlindSignature, bldkey: &BlindingKey) -> Result<Identity, Error> {
        self.refuse(self.capabilities().require_blind())?;
        self.variant.expect(csig.scheme(), "blind signature")?;
        self.variant.expect(bldkey.scheme(), "blinding key")?;
        self.backend.unblind(csig, bldkey)
    }

    /// Like [`GroupSig::unblind`], first checking that `sig`, the signature
    /// `csig` was derived from, belongs to this scheme.
    pub fn unblind_with_signature(&self, sig: &Signature, csig: &BlindSignature, bldkey: &BlindingKey) -> Result<Identity, Error> {
        self.refuse(self.capabilities().require_blind())?;
        self.variant.expect(sig.scheme(), "signature")
            .map_err(|e| Error::UnblindError(e.to_string()))?;
        self.unblind(csig, bldkey)
    }
}
