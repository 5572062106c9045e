use clap::Parser;

use brawlsim::cli::Args;
use brawlsim::headless::{run_headless_bout, HeadlessBoutConfig};

fn main() {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match HeadlessBoutConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => HeadlessBoutConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.random_seed = Some(seed);
    }
    if let Some(output) = args.output {
        config.output_path = Some(output);
    }
    if let Some(max_duration) = args.max_duration {
        config.max_duration_secs = max_duration;
    }

    if let Err(e) = run_headless_bout(config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
