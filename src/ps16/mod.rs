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


//! The [PS16 group signature scheme](https://doi.org/10.1007/978-3-319-29485-8_7)
//! by Pointcheval and Sanders, built on their short randomizable signatures.
//! Members prove knowledge of their secret `sk` during the join, and the
//! manager stores `(g^sk, Y^sk)` in the membership list. Opening searches the
//! list with a pairing test and returns the index together with a proof that
//! anyone holding the group key can check.

/// Group, manager and member keys
pub mod keys;
/// Signatures
pub mod signature;
/// Opening proofs
pub mod proof;
/// Backend operations
pub mod backend;
