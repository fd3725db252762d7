//! Runs the signing functionality in a loop so a sampling profiler has
//! something to chew on.
//!
//! Run it with samply
//!
//! ```sh
//! cargo build --bin profiling_sign
//! samply record target/debug/profiling_sign [iterations]
//! ```
//!

use rand::RngCore as _;
use std::env;

fn main() {
    // Fetch iterations
    let iterations: usize = env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(1000);

    let (_, sk) = rpicnic::api::keygen();

    let mut rng = rand::thread_rng();
    let mut msg = vec![0u8; 100];

    eprintln!("Profiling - running sign message {} times...", iterations);

    (0..iterations).for_each(|_| {
        rng.fill_bytes(&mut msg);
        let _signature = rpicnic::api::sign(&sk, &msg);
    });
}
