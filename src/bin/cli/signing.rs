//! Signing

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

use clap::{ArgAction, Error, Parser};

use rpicnic::{
    api, keygen::SecretKey, signature::SignConfig, utils::marshalling::Marshalling as _,
};

use crate::utilities::{
    clap_err_result, clap_err_result_msg, get_decoded_string_from_file_or_string, get_rng,
    print_title,
};

#[derive(Parser)]
#[command(version, about("Masked Picnic3 signature scheme -- signing"), long_about = None)]
pub struct Signing {
    /// Message file or string
    #[arg(short, long)]
    pub msg: String,

    /// Secret key file or string
    #[arg(long("sk"))]
    pub secret_key: String,

    /// Signing seed. Must be 32 bytes, base64 encoded.
    #[arg(long)]
    pub seed: Option<String>,

    /// Derive the salt from the key and message instead of fresh randomness,
    /// making the signature bytes reproducible
    #[arg(long, action = ArgAction::SetTrue)]
    pub deterministic: bool,
}

impl Signing {
    fn get_secret_key(&self) -> Result<SecretKey, Error> {
        let decoded_secret_key = get_decoded_string_from_file_or_string(
            self.secret_key.clone(),
            Some("Secret Key".to_string()),
        )?;
        clap_err_result_msg!(
            SecretKey::parse(&decoded_secret_key),
            "Could not parse secret key"
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

    pub fn sign_message(&self) -> Result<(), Error> {
        print_title("Signing message.");
        let secret_key = self.get_secret_key()?;
        let msg = self.get_msg()?;
        let mut rng = get_rng(self.seed.as_ref())?;

        let config = SignConfig {
            randomized: !self.deterministic,
            ..SignConfig::default()
        };
        let signature =
            clap_err_result!(api::sign_with_rng(&secret_key, &msg, &config, &mut rng))?;

        eprintln!();
        println!("{}", STANDARD.encode(signature));
        Ok(())
    }
}
