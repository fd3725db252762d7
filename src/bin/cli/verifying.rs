//! Verification

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

use clap::{Error, Parser};
use colored::Colorize as _;

use rpicnic::{api, keygen::PublicKey, utils::marshalling::Marshalling as _};

use crate::utilities::{clap_err_result_msg, get_decoded_string_from_file_or_string, print_title};

#[derive(Parser)]
#[command(version, about("Masked Picnic3 signature scheme -- verification"), long_about = None)]
pub struct Verifying {
    /// Public key file or string
    #[arg(long("pk"))]
    pub pub_key: String,

    /// Message file or string
    #[arg(short, long)]
    pub msg: String,

    /// Signature file or string
    #[arg(short, long)]
    pub signature: String,
}

impl Verifying {
    fn get_public_key(&self) -> Result<PublicKey, Error> {
        let decoded_public_key = get_decoded_string_from_file_or_string(
            self.pub_key.clone(),
            Some("Public Key".to_string()),
        )?;
        clap_err_result_msg!(
            PublicKey::parse(&decoded_public_key),
            "Could not parse public key"
        )
    }

    fn get_msg(&self) -> Result<Vec<u8>, Error> {
        let path = Path::new(&self.msg);
        if path.exists() {
            clap_err_result_msg!(
                STANDARD.decode(std::fs::read_to_string(path)?.trim()),
                "Could not decode message using base64"
            )
        } else {
            Ok(self.msg.clone().into_bytes())
        }
    }

    pub fn verify_signature(&self) -> Result<(), Error> {
        print_title("Verifying message.");
        let pk = self.get_public_key()?;
        let msg = self.get_msg()?;
        let signature = get_decoded_string_from_file_or_string(
            self.signature.clone(),
            Some("Signature".to_string()),
        )?;

        let is_valid = api::verify(&pk, &msg, &signature).is_ok();

        eprint!(
            "{}",
            match is_valid {
                true => "Signature is valid: ".green(),
                false => "Signature is invalid: ".red(),
            }
        );

        println!("{}", is_valid);

        Ok(())
    }
}
