//! Utility functions shared by the subcommands

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

use clap::Error;
use colored::Colorize as _;
use rand::{rngs::StdRng, RngCore, SeedableRng};

macro_rules! clap_err_result {
    ($e:expr, $t:expr) => {
        match $e {
            Ok(val) => Ok::<_, Error>(val),
            Err(e) => return Err(Error::raw($t, e)),
        }
    };

    ($e:expr) => {
        match $e {
            Ok(val) => Ok::<_, Error>(val),
            Err(e) => return Err(Error::raw(clap::error::ErrorKind::InvalidValue, e)),
        }
    };
}
pub(super) use clap_err_result;

macro_rules! clap_err_result_msg {
    ($e:expr, $m:expr, $t:expr) => {
        match $e {
            Ok(val) => Ok::<_, Error>(val),
            Err(e) => return Err(Error::raw($t, format!("{}: {}", $m, e))),
        }
    };

    ($e:expr, $m:expr) => {
        clap_err_result_msg!($e, $m, clap::error::ErrorKind::InvalidValue)
    };
}
pub(super) use clap_err_result_msg;

pub(super) fn print_title(title: &str) {
    eprintln!("{}", title.green().bold());
}

/// Seed size of the generator behind every subcommand that takes randomness.
const RNG_SEED_SIZE: usize = 32;

/// Builds the RNG for a subcommand. With no seed argument a fresh seed is
/// drawn from entropy and printed so the run can be reproduced.
pub(super) fn get_rng(seed: Option<&String>) -> Result<StdRng, Error> {
    let mut bytes = [0u8; RNG_SEED_SIZE];

    match seed {
        None => {
            let mut entropy = StdRng::from_entropy();
            entropy.fill_bytes(&mut bytes);
            eprintln!("{}: {}", "Seed".blue(), STANDARD.encode(bytes));
        }
        Some(seed_string) => {
            let seed_vec = clap_err_result_msg!(
                STANDARD.decode(seed_string),
                "Could not decode seed from base64"
            )?;

            if seed_vec.len() != RNG_SEED_SIZE {
                return Err(Error::raw(
                    clap::error::ErrorKind::InvalidValue,
                    format!("Seed must be {} bytes long", RNG_SEED_SIZE),
                ));
            }

            bytes.copy_from_slice(&seed_vec);
        }
    }

    Ok(StdRng::from_seed(bytes))
}

/// Checks if the input is a file or a string. Returns the decoded string from the file or the input string.
pub(super) fn get_decoded_string_from_file_or_string(
    file_or_string: String,
    title: Option<String>,
) -> Result<Vec<u8>, Error> {
    let path = Path::new(&file_or_string);
    let read_title = match &title {
        Some(title) => format!("Reading {} from file", title).blue(),
        None => "Reading from file".blue(),
    };

    let encoded = if path.exists() {
        eprintln!("{}: {}", read_title, path.display());
        std::fs::read_to_string(path)?.trim().to_string()
    } else {
        file_or_string.clone()
    };

    clap_err_result_msg!(
        STANDARD.decode(encoded),
        format!(
            "Could not decode {} from base64",
            match title {
                Some(title) => title,
                None => "input".to_string(),
            }
        )
    )
}
