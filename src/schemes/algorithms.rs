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
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::errors::Error;

/// The group signature schemes known to this crate.
///
/// * `Bbs04`: single authority, registry, index-only opening.
/// * `Ps16`: single authority, registry, opening with a publicly verifiable proof.
/// * `Gl19`: separate issuer and converter, no opening, blind/convert/unblind pipeline.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum SchemeVariant {
    Bbs04,
    Ps16,
    Gl19,
}

impl SchemeVariant {

    pub const ALL: [SchemeVariant; 3] = [SchemeVariant::Bbs04, SchemeVariant::Ps16, SchemeVariant::Gl19];

    /// Numeric code carried in the first byte of every exported object
    pub const fn code(&self) -> u8 {
        match self {
            SchemeVariant::Bbs04 => 1,
            SchemeVariant::Gl19 => 3,
            SchemeVariant::Ps16 => 4,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, Error> {
        Self::ALL.into_iter()
            .find(|v| v.code() == code)
            .ok_or_else(|| Error::DecodeError(format!("unknown scheme code {code}")))
    }

    pub const fn name(&self) -> &'static str {
        match self {
            SchemeVariant::Bbs04 => "BBS04",
            SchemeVariant::Ps16 => "PS16",
            SchemeVariant::Gl19 => "GL19",
        }
    }

    /// Fails with [`Error::SchemeMismatchError`] unless `other` is this variant.
    pub(crate) fn expect(&self, other: SchemeVariant, what: &str) -> Result<(), Error> {
        if *self != other {
            return Err(Error::SchemeMismatchError(format!("{what} belongs to {other}, expected {self}")));
        }
        Ok(())
    }
}

/// Returns whether `code` identifies a scheme this crate implements.
pub fn is_supported_scheme(code: u8) -> bool {
    SchemeVariant::from_code(code).is_ok()
}

impl fmt::Display for SchemeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SchemeVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnsupportedOperation(format!("unknown scheme {s}")))
    }
}
