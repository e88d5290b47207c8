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


//! The [GL19 group signature scheme](https://doi.org/10.1007/978-3-030-17259-6_11)
//! by Garms and Lehmann, with convertible pseudonyms.
//!
//! There are two authorities. The issuer grants credentials and the converter
//! holds the key that turns pseudonyms into linkable ones. The group key is
//! assembled in three phases: issuer, then converter, then issuer again.
//! Every signature carries a pseudonym of its signer encrypted under the
//! converter key. A member blinds a batch of signatures under a blinding
//! key of its own and sends them to the converter. The converter strips its
//! layer and re-randomizes the whole batch with a shared exponent. After
//! unblinding, two signatures yield the same identity exactly when they come
//! from the same member. The converter never learns the pseudonyms, and an
//! identity is only meaningful within its batch.
//!
//! Credentials expire `credential_lifetime` seconds after issuance (see
//! [`GroupsigConfig`](crate::config::GroupsigConfig)), and every signature
//! carries the expiration of the credential that produced it.

/// Group, authority, member and blinding keys
pub mod keys;
/// Signatures
pub mod signature;
/// Blinded and converted signatures
pub mod blind;
/// Backend operations
pub mod backend;
