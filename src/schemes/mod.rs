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


//! Scheme variants, their capability descriptors and the generic artifacts
//! (signatures, blind signatures, proofs) tagged with a variant.

/// Scheme variants and their codes
pub mod algorithms;
/// Static capability table
pub mod capabilities;
/// Scheme-tagged signatures, blind signatures and proofs
pub mod generics;
