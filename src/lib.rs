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


//! Group signatures over BLS12-381.
//!
//! Three schemes are provided behind one [`GroupSig`](groupsig::GroupSig)
//! interface:
//! * [BBS04](bbs04): short group signatures with a single issuing and opening authority.
//! * [PS16](ps16): Pointcheval-Sanders group signatures with provable openings.
//! * [GL19](gl19): signatures with expiring credentials, blindable and
//!   convertible into per-batch pseudonyms by a separate converter.

#![allow(non_snake_case)]

pub mod errors;
pub mod config;
pub mod utils;
pub mod schemes;
pub mod spk;
pub mod gml;
pub mod identity;
pub mod keys;
pub mod backend;
pub mod bbs04;
pub mod ps16;
pub mod gl19;
pub mod groupsig;

#[cfg(test)]
mod tests;
