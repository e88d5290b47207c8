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


use crate::{errors::Error, schemes::algorithms::SchemeVariant};
use super::codec::{impl_hex_serde, kind, peek_scheme, ByteReader, ByteWriter, Encodable};

/// A join protocol message, handed between the authority and the member by
/// the caller. The first bytes carry the scheme code and the step `seq`
/// that produced it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct JoinMessage {
    bytes: Vec<u8>,
}

impl JoinMessage {

    pub(crate) fn writer(scheme: SchemeVariant, seq: u8) -> ByteWriter {
        let mut w = ByteWriter::new(scheme, kind::JOIN_MESSAGE);
        w.u8(seq);
        w
    }

    pub(crate) fn from_writer(w: ByteWriter) -> Self {
        Self { bytes: w.finish() }
    }

    /// Opens the payload, checking that the message was produced by step `seq`.
    pub(crate) fn reader(&self, scheme: SchemeVariant, seq: u8) -> Result<ByteReader<'_>, Error> {
        let mut r = ByteReader::open(&self.bytes, scheme, kind::JOIN_MESSAGE)?;
        let found = r.u8()?;
        if found != seq {
            return Err(Error::JoinError(format!("message produced by step {found}, expected step {seq}")));
        }
        Ok(r)
    }

    pub fn scheme(&self) -> Result<SchemeVariant, Error> {
        peek_scheme(&self.bytes)
    }

    pub fn seq(&self) -> Option<u8> {
        self.bytes.get(2).copied()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Encodable for JoinMessage {
    fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let scheme = peek_scheme(bytes)?;
        ByteReader::open(bytes, scheme, kind::JOIN_MESSAGE)?;
        if bytes.len() < 3 {
            return Err(Error::DecodeError("join message without step".to_owned()));
        }
        Ok(Self { bytes: bytes.to_vec() })
    }
}

impl_hex_serde!(JoinMessage);
