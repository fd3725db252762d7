use clap::{Error, Parser};
use colored::Colorize as _;

use rpicnic::constants::params::{self};
use rpicnic::max_signature_size;

#[derive(Parser)]
#[command(version, about("Masked Picnic3 signature scheme -- print parameters"), long_about = None)]
pub struct Parameters {}

impl Parameters {
    pub fn print_info(&self) -> Result<(), Error> {
        println!("Masked Picnic3 signature scheme parameters");
        println!("Parameter set Picnic3-L1");

        println!();

        println!("{}", "LowMC Parameters:".blue().bold());
        println!(
            "{}\t(n) Block size in bits",
            params::PARAM_LOWMC_BLOCK_BITS.to_string().bold()
        );
        println!(
            "{}\t(k) Key size in bits",
            params::PARAM_LOWMC_KEY_BITS.to_string().bold()
        );
        println!(
            "{}\t(r) Number of rounds",
            params::PARAM_LOWMC_ROUNDS.to_string().bold()
        );
        println!(
            "{}\t(m) S-boxes per substitution layer",
            params::PARAM_LOWMC_SBOXES.to_string().bold()
        );

        println!();
        println!("{}", "MPCitH Parameters:".blue().bold());
        println!(
            "{}\t(n) Number of parties per repetition",
            params::PARAM_NB_PARTIES.to_string().bold()
        );
        println!(
            "{}\t(M) Number of repetitions",
            params::PARAM_NB_EXECUTIONS.to_string().bold()
        );
        println!(
            "{}\t(τ) Number of opened repetitions",
            params::PARAM_NB_OPENED.to_string().bold()
        );
        println!(
            "{}\t(d) Number of boolean masking shares on the signer side",
            params::PARAM_MASKING_SHARES.to_string().bold()
        );

        println!("{}", "\nSignature Parameters:".blue().bold());
        println!(
            "{}\tSeed size in bytes",
            params::PARAM_SEED_SIZE.to_string().bold()
        );
        println!(
            "{}\tSalt size in bytes",
            params::PARAM_SALT_SIZE.to_string().bold()
        );
        println!(
            "{}\tDigest (Hash) size in bytes",
            params::PARAM_DIGEST_SIZE.to_string().bold()
        );
        println!(
            "{}\tMaximum signature size in bytes",
            max_signature_size().to_string().bold()
        );

        Ok(())
    }
}
