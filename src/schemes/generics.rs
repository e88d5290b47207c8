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
use crate::{
    bbs04::signature::Bbs04Signature,
    errors::Error,
    gl19::{blind::Gl19BlindSignature, signature::Gl19Signature},
    ps16::{proof::Ps16OpenProof, signature::Ps16Signature},
    utils::codec::{impl_hex_serde, peek_scheme, Encodable},
};
use super::algorithms::SchemeVariant;

/// A group signature, bound to one message and one member credential.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Signature {
    Bbs04(Bbs04Signature),
    Ps16(Ps16Signature),
    Gl19(Gl19Signature),
}

impl Signature {
    pub fn scheme(&self) -> SchemeVariant {
        match self {
            Signature::Bbs04(_) => SchemeVariant::Bbs04,
            Signature::Ps16(_) => SchemeVariant::Ps16,
            Signature::Gl19(_) => SchemeVariant::Gl19,
        }
    }
}

impl Encodable for Signature {
    fn to_bytes(&self) -> Vec<u8> {
        match self {
            Signature::Bbs04(s) => s.to_bytes(),
            Signature::Ps16(s) => s.to_bytes(),
            Signature::Gl19(s) => s.to_bytes(),
        }
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        match peek_scheme(bytes)? {
            SchemeVariant::Bbs04 => Bbs04Signature::from_bytes(bytes).map(Signature::Bbs04),
            SchemeVariant::Ps16 => Ps16Signature::from_bytes(bytes).map(Signature::Ps16),
            SchemeVariant::Gl19 => Gl19Signature::from_bytes(bytes).map(Signature::Gl19),
        }
    }
}

/// Position of a [`BlindSignature`] in the blind, convert, unblind pipeline.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum BlindStage {
    /// Output of blind, input of convert
    Blinded,
    /// Output of convert, input of unblind
    Converted,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum BlindSignature {
    Gl19(Gl19BlindSignature),
}

impl BlindSignature {

    pub fn scheme(&self) -> SchemeVariant {
        match self {
            BlindSignature::Gl19(_) => SchemeVariant::Gl19,
        }
    }

    pub fn stage(&self) -> BlindStage {
        match self {
            BlindSignature::Gl19(s) => s.stage,
        }
    }
}

impl Encodable for BlindSignature {
    fn to_bytes(&self) -> Vec<u8> {
        match self {
            BlindSignature::Gl19(s) => s.to_bytes(),
        }
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        match peek_scheme(bytes)? {
            SchemeVariant::Gl19 => Gl19BlindSignature::from_bytes(bytes).map(BlindSignature::Gl19),
            other => Err(Error::DecodeError(format!("{other} has no blind signatures"))),
        }
    }
}

/// Non-interactive proof accompanying an opening
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Proof {
    Ps16(Ps16OpenProof),
}

impl Proof {
    pub fn scheme(&self) -> SchemeVariant {
        match self {
            Proof::Ps16(_) => SchemeVariant::Ps16,
        }
    }
}

impl Encodable for Proof {
    fn to_bytes(&self) -> Vec<u8> {
        match self {
            Proof::Ps16(p) => p.to_bytes(),
        }
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        match peek_scheme(bytes)? {
            SchemeVariant::Ps16 => Ps16OpenProof::from_bytes(bytes).map(Proof::Ps16),
            other => Err(Error::DecodeError(format!("{other} has no opening proofs"))),
        }
    }
}

impl_hex_serde!(Signature);
impl_hex_serde!(BlindSignature);
impl_hex_serde!(Proof);
