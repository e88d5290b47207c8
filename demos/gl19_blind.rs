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


mod gl19_example {
    use groupsig::{
        config::GroupsigConfig,
        errors::Error,
        groupsig::GroupSig,
        keys::{BlindingKey, MemberKey},
        schemes::{algorithms::SchemeVariant, generics::BlindSignature},
        utils::codec::Encodable,
    };

    fn join(issuer: &GroupSig, member: &GroupSig) -> Result<MemberKey, Error> {
        let mut memkey = MemberKey::new(SchemeVariant::Gl19);
        let mut inbound = None;
        for seq in 0..=issuer.join_seq() {
            inbound = if seq % 2 == 0 {
                Some(issuer.join_mgr(seq, inbound.as_ref())?)
            } else {
                member.join_mem(&mut memkey, seq, inbound.as_ref())?
            };
        }
        Ok(memkey)
    }

    pub(crate) fn gl19_main(members: usize) -> Result<(), Error> {
        let config = GroupsigConfig::from_env()?;
        log::info!("Credential lifetime: {}s", config.credential_lifetime);

        log::info!("Issuer and converter setup");
        let mut issuer = GroupSig::new(SchemeVariant::Gl19).with_config(config);
        issuer.setup(None)?;
        let mut converter = GroupSig::new(SchemeVariant::Gl19);
        converter.setup(issuer.group_key())?;
        let grpkey = converter.group_key().cloned()
            .ok_or_else(|| Error::SetupError("converter produced no group key".to_owned()))?;
        issuer.setup(Some(&grpkey))?;
        log::info!("Group key: {}", grpkey.encode());

        let mut member = GroupSig::new(SchemeVariant::Gl19);
        member.set_group_key(grpkey)?;

        log::info!("Joining {members} members");
        let memkeys = (0..members).map(|_| join(&issuer, &member)).collect::<Result<Vec<_>, _>>()?;

        let bldkey = member.blinding_key()?;
        log::info!("Blinding public key: {}", bldkey.export_pub());

        let mut blinded = Vec::new();
        for (i, memkey) in memkeys.iter().enumerate() {
            for n in 0..2 {
                let msg = format!("message {n} of member {i}");
                let sig = member.sign(msg.as_bytes(), memkey, None)?;
                if !member.verify(&sig, msg.as_bytes())? {
                    return Err(Error::VerifyError(format!("signature of member {i} does not verify")));
                }
                let (_, bsig) = member.blind(Some(&bldkey.public_key()), &sig, msg.as_bytes())?;
                blinded.push(bsig.encode());
            }
        }

        log::info!("Converting a batch of {}", blinded.len());
        let batch = blinded.iter().map(|b| BlindSignature::decode(b)).collect::<Result<Vec<_>, _>>()?;
        let converted = converter.convert(&batch, &BlindingKey::decode(&bldkey.export_pub())?)?;

        log::info!("Unblinding");
        for csig in &converted {
            let id = member.unblind(csig, &bldkey)?;
            log::info!("Pseudonym: {id}");
        }
        Ok(())
    }
}

fn main() {

    use std::env;
    use crate::gl19_example::gl19_main;

    dotenvy::dotenv().ok();
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let members = match args.get(1).map(|a| a.parse::<usize>()) {
        None => 2,
        Some(Ok(n)) if n > 0 => n,
        Some(_) => {
            println!("Usage: {} [members]", args[0]);
            return;
        }
    };

    if let Err(e) = gl19_main(members) {
        log::error!("{e}");
    }
}
