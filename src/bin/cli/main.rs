//! # Masked Picnic3 Command Line Interface
//!
//! ```
//! Usage: picnic [COMMAND]
//!
//! Commands:
//!   keygen      Masked Picnic3 signature scheme -- key generation
//!   sign        Masked Picnic3 signature scheme -- signing
//!   verify      Masked Picnic3 signature scheme -- verification
//!   parameters  Masked Picnic3 signature scheme -- print parameters
//!   help        Print this message or the help of the given subcommand(s)
//!
//! Options:
//!   -h, --help     Print help
//!   -V, --version  Print version
//! ```
//!
//! ## Build the CLI
//!
//! The CLI can be built with the following command:
//!
//! ```
//! $ cargo build --release --bin picnic
//! ```
//!
//! ## Keygen
//!
//! ```
//! $ picnic keygen -o key
//! Seed: 5oandmF2iBkAy0HZqLTSorYu/akQHGJbjN4669+8Y9o=
//! Public key saved to "key.pub"
//! Secret key saved to "key"
//! ```
//!
//! ## Signing
//!
//! ```
//! $ picnic sign --msg "hello world" --sk key > signature.txt
//! Signing message.
//! Reading Secret Key from file: key
//! Seed: v22gxQ4kR9BoUNSTI7der0ObMxkWKYyAF1CP1PzseW4=
//! ```
//!
//! ## Verification
//!
//! ```
//! $ picnic verify --msg "hello world" --pk key.pub --signature signature.txt
//! Verifying message.
//! Reading Public Key from file: key.pub
//! Reading Signature from file: signature.txt
//! Signature is valid: true
//! ```

use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize as _;
use keygen::Keygen;
use parameters::Parameters;
use signing::Signing;
use verifying::Verifying;

mod keygen;
mod parameters;
mod signing;
mod utilities;
mod verifying;

#[derive(Parser)]
#[command(version, about("Masked Picnic3 signature scheme\nParameter set Picnic3-L1"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    Keygen(Keygen),
    Sign(Signing),
    Verify(Verifying),
    Parameters(Parameters),
}

fn main() {
    let cli = Cli::parse();

    let res = match &cli.command {
        Some(Commands::Keygen(keygen)) => keygen.generate_keys(),
        Some(Commands::Sign(signing)) => signing.sign_message(),
        Some(Commands::Verify(verify)) => verify.verify_signature(),
        Some(Commands::Parameters(parameters)) => parameters.print_info(),
        // Print help
        None => {
            let _ = Cli::command().print_help();
            Ok(())
        }
    };

    if let Err(err) = res {
        eprintln!("{}", err.to_string().red());
        std::process::exit(1);
    }
}
