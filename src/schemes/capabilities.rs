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


use serde::{Deserialize, Serialize};
use crate::errors::Error;
use super::algorithms::SchemeVariant;

/// Which party sends the `seq = 0` join message.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum JoinRole {
    Authority = 0,
    Member = 1,
}

impl JoinRole {
    pub fn other(&self) -> JoinRole {
        match self {
            JoinRole::Authority => JoinRole::Member,
            JoinRole::Member => JoinRole::Authority,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum OpenForm {
    Unsupported,
    /// `open` returns the signer index only
    Index,
    /// `open` returns the signer index with a publicly verifiable proof
    IndexWithProof,
}

/// Static description of what a scheme variant can do.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Capabilities {
    pub variant: SchemeVariant,
    pub has_gml: bool,
    pub open: OpenForm,
    pub blind: bool,
    /// Last valid join `seq`
    pub join_seq: u8,
    pub join_start: JoinRole,
}

const BBS04_CAPABILITIES: Capabilities = Capabilities {
    variant: SchemeVariant::Bbs04,
    has_gml: true,
    open: OpenForm::Index,
    blind: false,
    join_seq: 1,
    join_start: JoinRole::Authority,
};

const PS16_CAPABILITIES: Capabilities = Capabilities {
    variant: SchemeVariant::Ps16,
    has_gml: true,
    open: OpenForm::IndexWithProof,
    blind: false,
    join_seq: 3,
    join_start: JoinRole::Authority,
};

const GL19_CAPABILITIES: Capabilities = Capabilities {
    variant: SchemeVariant::Gl19,
    has_gml: false,
    open: OpenForm::Unsupported,
    blind: true,
    join_seq: 3,
    join_start: JoinRole::Authority,
};

impl Capabilities {

    pub const fn of(variant: SchemeVariant) -> &'static Capabilities {
        match variant {
            SchemeVariant::Bbs04 => &BBS04_CAPABILITIES,
            SchemeVariant::Ps16 => &PS16_CAPABILITIES,
            SchemeVariant::Gl19 => &GL19_CAPABILITIES,
        }
    }

    /// Number of messages in a complete join run
    pub fn join_steps(&self) -> u8 {
        self.join_seq + 1
    }

    /// The role that must perform step `seq`, or `None` if `seq` is out of range.
    pub fn role_for_seq(&self, seq: u8) -> Option<JoinRole> {
        if seq > self.join_seq {
            return None;
        }
        if seq % 2 == 0 {
            Some(self.join_start)
        } else {
            Some(self.join_start.other())
        }
    }

    /// First step `role` performs in a join run
    pub fn first_step(&self, role: JoinRole) -> u8 {
        if role == self.join_start { 0 } else { 1 }
    }

    /// Whether `seq` is the last step `role` performs in a join run
    pub fn is_last_step(&self, role: JoinRole, seq: u8) -> bool {
        seq + 2 > self.join_seq && self.role_for_seq(seq) == Some(role)
    }

    pub fn require_open(&self) -> Result<(), Error> {
        if self.open == OpenForm::Unsupported {
            return Err(Error::UnsupportedOperation(format!("{} does not support opening", self.variant)));
        }
        Ok(())
    }

    pub fn require_open_proof(&self) -> Result<(), Error> {
        if self.open != OpenForm::IndexWithProof {
            return Err(Error::UnsupportedOperation(format!("{} has no verifiable opening proofs", self.variant)));
        }
        Ok(())
    }

    pub fn require_blind(&self) -> Result<(), Error> {
        if !self.blind {
            return Err(Error::UnsupportedOperation(format!("{} has no blind-conversion pipeline", self.variant)));
        }
        Ok(())
    }
}
