//! Keygen

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Error, Parser};
use colored::Colorize as _;

use rpicnic::{
    keygen::{self, PublicKey, SecretKey},
    lowmc::{LowmcInstance, ParameterSet},
    utils::marshalling::Marshalling as _,
};

use crate::utilities::{get_rng, print_title};

#[derive(Parser)]
#[command(version, about("Masked Picnic3 signature scheme -- key generation"), long_about = None)]
pub struct Keygen {
    /// Keygen seed. Must be 32 bytes, base64 encoded.
    #[arg(short, long)]
    seed: Option<String>,

    /// Output files
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output public key only
    #[arg(long("pk"), action=ArgAction::SetTrue, conflicts_with("sec_key"))]
    pub_key: bool,

    /// Output secret key only
    #[arg(long("sk"), action=ArgAction::SetTrue, conflicts_with("pub_key"))]
    sec_key: bool,
}

impl Keygen {
    /// Output keys to file or stdout. Returns true if keys are saved to file.
    fn output_keys(&self, pk: PublicKey, sk: SecretKey) -> Result<bool, Error> {
        let print_all = !self.pub_key && !self.sec_key;

        // If no output file is provided, print to stdout
        let Some(path_arg) = self.output.as_ref() else {
            if print_all || self.pub_key {
                eprint!("\n{}", "Public key: ".blue());
                println!("{}", STANDARD.encode(pk.serialise()));
            }

            if print_all || self.sec_key {
                eprint!("\n{}", "Secret key: ".blue());
                println!("{}", STANDARD.encode(sk.serialise()));
            }

            return Ok(false);
        };

        let mut path_buf = path_arg.clone();
        let path = if path_buf.is_dir() {
            path_buf.push("picnic");
            Path::new(&path_buf)
        } else {
            Path::new(&path_buf)
        };

        // Save public key to output file
        if print_all || self.pub_key {
            let pk_path = path.with_extension("pub");
            std::fs::write(&pk_path, STANDARD.encode(pk.serialise()))?;
            eprintln!("{} {:?}", "Public key saved to".blue(), pk_path.display());
        }

        // Save secret key to output file
        if print_all || self.sec_key {
            let sk_path = path.with_extension("");
            std::fs::write(&sk_path, STANDARD.encode(sk.serialise()))?;
            eprintln!("{} {:?}", "Secret key saved to".blue(), sk_path.display());
        }

        Ok(true)
    }

    pub fn generate_keys(&self) -> Result<(), Error> {
        print_title("Generating Picnic key pair.");
        let mut rng = get_rng(self.seed.as_ref())?;

        let instance = LowmcInstance::generate(ParameterSet::Picnic3L1);
        let (pk, sk) = keygen::keygen(&instance, &mut rng);

        self.output_keys(pk, sk)?;

        Ok(())
    }
}
