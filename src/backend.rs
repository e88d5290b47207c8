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


//! The cryptographic backend: the per-scheme primitives the
//! [`GroupSig`](crate::groupsig::GroupSig) orchestrator drives.
//!
//! Backends are plain values passed to the orchestrator, so tests can wrap
//! or replace them. Operations a scheme does not have keep the default
//! implementation, which fails with [`Error::UnsupportedOperation`].

use std::sync::Arc;
use rand::RngCore;
use crate::{
    bbs04::backend::Bbs04Backend,
    config::GroupsigConfig,
    errors::Error,
    gl19::backend::Gl19Backend,
    gml::Gml,
    identity::Identity,
    keys::{BlindingKey, GroupKey, ManagerKey, MemberKey},
    ps16::backend::Ps16Backend,
    schemes::{algorithms::SchemeVariant, generics::{BlindSignature, Proof, Signature}},
    utils::message::JoinMessage,
};

/// Keys produced by one setup invocation
#[derive(Clone, Debug)]
pub struct SetupOutput {
    pub grpkey: GroupKey,
    pub mgrkey: ManagerKey,
    pub gml: Option<Gml>,
}

/// Inputs of one authority-side join step
pub struct MgrJoinStep<'a> {
    pub seq: u8,
    pub grpkey: &'a GroupKey,
    pub mgrkey: &'a ManagerKey,
    pub gml: Option<&'a mut Gml>,
    /// Message received from the member, absent on the opening step
    pub inbound: Option<&'a JoinMessage>,
    /// The message this authority sent on its previous step of the same run
    pub sent: Option<&'a JoinMessage>,
    pub config: &'a GroupsigConfig,
}

pub trait SchemeBackend: Send + Sync {

    fn variant(&self) -> SchemeVariant;

    /// Creates fresh authority keys. `grpkey` is the group key received from
    /// another authority, for schemes whose setup spans several parties.
    fn setup(&self, rng: &mut dyn RngCore, grpkey: Option<&GroupKey>) -> Result<SetupOutput, Error>;

    fn join_mgr(&self, rng: &mut dyn RngCore, step: MgrJoinStep<'_>) -> Result<JoinMessage, Error>;

    /// Returns `None` on the member's terminal step.
    fn join_mem(&self, rng: &mut dyn RngCore, seq: u8, memkey: &mut MemberKey, grpkey: &GroupKey, inbound: Option<&JoinMessage>) -> Result<Option<JoinMessage>, Error>;

    fn sign(&self, rng: &mut dyn RngCore, msg: &[u8], memkey: &MemberKey, grpkey: &GroupKey) -> Result<Signature, Error>;

    /// `Ok(false)` for well-formed signatures that do not verify
    fn verify(&self, sig: &Signature, msg: &[u8], grpkey: &GroupKey) -> Result<bool, Error>;

    fn open(&self, _rng: &mut dyn RngCore, _sig: &Signature, _grpkey: &GroupKey, _mgrkey: &ManagerKey, _gml: &Gml) -> Result<(u64, Option<Proof>), Error> {
        Err(self.unsupported("open"))
    }

    fn open_verify(&self, _index: u64, _proof: &Proof, _sig: &Signature, _grpkey: &GroupKey) -> Result<bool, Error> {
        Err(self.unsupported("open_verify"))
    }

    fn blinding_key(&self, _rng: &mut dyn RngCore, _grpkey: &GroupKey) -> Result<BlindingKey, Error> {
        Err(self.unsupported("blinding_key"))
    }

    fn blind(&self, _rng: &mut dyn RngCore, _grpkey: &GroupKey, _bldkey: &BlindingKey, _sig: &Signature, _msg: &[u8]) -> Result<BlindSignature, Error> {
        Err(self.unsupported("blind"))
    }

    /// All-or-nothing: fails without output if any element fails.
    fn convert(&self, _rng: &mut dyn RngCore, _bsigs: &[BlindSignature], _grpkey: &GroupKey, _mgrkey: &ManagerKey, _bldkey: &BlindingKey) -> Result<Vec<BlindSignature>, Error> {
        Err(self.unsupported("convert"))
    }

    fn unblind(&self, _csig: &BlindSignature, _bldkey: &BlindingKey) -> Result<Identity, Error> {
        Err(self.unsupported("unblind"))
    }

    fn unsupported(&self, op: &str) -> Error {
        Error::UnsupportedOperation(format!("{} backend has no {op}", self.variant()))
    }
}

/// The BLS12-381 implementation of `variant`
pub fn default_backend(variant: SchemeVariant) -> Arc<dyn SchemeBackend> {
    match variant {
        SchemeVariant::Bbs04 => Arc::new(Bbs04Backend),
        SchemeVariant::Ps16 => Arc::new(Ps16Backend),
        SchemeVariant::Gl19 => Arc::new(Gl19Backend),
    }
}
