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

/// Environment variable overriding [`GroupsigConfig::credential_lifetime`]
pub const CREDENTIAL_LIFETIME_ENV: &str = "GROUPSIG_CREDENTIAL_LIFETIME";

/// One year, in seconds
pub const DEFAULT_CREDENTIAL_LIFETIME: u64 = 60 * 60 * 24 * 365;

/// Runtime parameters of a [`crate::groupsig::GroupSig`] instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupsigConfig {
    /// Seconds a GL19 credential stays valid after the issuer completes the join
    pub credential_lifetime: u64,
}

impl Default for GroupsigConfig {
    fn default() -> Self {
        Self { credential_lifetime: DEFAULT_CREDENTIAL_LIFETIME }
    }
}

impl GroupsigConfig {

    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json).map_err(|e| Error::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the configuration from the process environment, falling back
    /// to the defaults for unset variables.
    pub fn from_env() -> Result<Self, Error> {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(CREDENTIAL_LIFETIME_ENV) {
            config.credential_lifetime = value.trim().parse::<u64>()
                .map_err(|e| Error::ConfigError(format!("{CREDENTIAL_LIFETIME_ENV}: {e}")))?;
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.credential_lifetime == 0 {
            return Err(Error::ConfigError("credential_lifetime must be positive".to_owned()));
        }
        Ok(())
    }
}
