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


use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Operation not supported by this scheme: {0}")]
    UnsupportedOperation(String),
    #[error("Protocol step called out of sequence: {0}")]
    ProtocolSequenceError(String),
    #[error("Error during setup: {0}")]
    SetupError(String),
    #[error("Error during join: {0}")]
    JoinError(String),
    #[error("Error during computation of a group signature: {0}")]
    SignError(String),
    #[error("Malformed input to verification: {0}")]
    VerifyError(String),
    #[error("Error during opening: {0}")]
    OpenError(String),
    #[error("Error during blinding: {0}")]
    BlindError(String),
    #[error("Error during conversion: {0}")]
    ConvertError(String),
    #[error("Error during unblinding: {0}")]
    UnblindError(String),
    /// Well-formed text whose bytes do not decode into the expected object
    #[error("Error during deserialization: {0}")]
    DecodeError(String),
    /// Text that is not a valid hex string
    #[error("Malformed text encoding: {0}")]
    TextDecodeError(String),
    #[error("Scheme mismatch: {0}")]
    SchemeMismatchError(String),
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
    #[error("Error during hash to scalar computation")]
    HashToScalarError,
}
