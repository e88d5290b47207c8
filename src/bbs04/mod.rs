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


//! The [BBS04 group signature scheme](https://doi.org/10.1007/978-3-540-28628-8_3)
//! by Boneh, Boyen and Shacham.
//! A single manager issues credentials `(x, A)` with `A = g1^(1/(gamma + x))`
//! and keeps them in the group membership list. A signature linearly encrypts
//! `A` under the manager's tracing key `(xi1, xi2)` and proves knowledge of a
//! valid credential, so the manager can open any signature back to the index
//! of its signer.
//! # Usage
//! ```no_run
//! use groupsig::groupsig::GroupSig;
//! use groupsig::keys::MemberKey;
//! use groupsig::schemes::algorithms::SchemeVariant;
//!
//! let mut manager = GroupSig::new(SchemeVariant::Bbs04);
//! manager.setup(None).unwrap();
//! let mut member = GroupSig::new(SchemeVariant::Bbs04);
//! member.set_group_key(manager.group_key().unwrap().clone()).unwrap();
//!
//! let mut memkey = MemberKey::new(SchemeVariant::Bbs04);
//! let m0 = manager.join_mgr(0, None).unwrap();
//! member.join_mem(&mut memkey, 1, Some(&m0)).unwrap();
//! let sig = member.sign(b"Hello, World!", &memkey, None).unwrap();
//! assert_eq!(manager.open(&sig).unwrap().index(), Some(0));
//! ```

/// Group, manager and member keys
pub mod keys;
/// Signatures
pub mod signature;
/// Backend operations
pub mod backend;
