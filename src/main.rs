use std::io::Read;

use clap::Parser;

use overclaim::ScoringWeights;

#[derive(Parser)]
#[command(
    name = "overclaim",
    about = "Score confidence-without-evidence patterns in prose",
    version
)]
struct Cli {
    /// File paths to analyze (reads stdin if none provided)
    files: Vec<String>,

    /// Weight of the certainty sub-score (0-100)
    #[arg(long, default_value_t = 50)]
    certainty_weight: u32,

    /// Weight of the inverted evidence sub-score (0-100)
    #[arg(long, default_value_t = 30)]
    evidence_weight: u32,

    /// Weight of the claim sub-score (0-100)
    #[arg(long, default_value_t = 20)]
    claim_weight: u32,

    /// Score at or above which risk is classified high
    #[arg(long, default_value_t = 70)]
    high_threshold: u32,

    /// Score at or above which risk is classified medium
    #[arg(long, default_value_t = 40)]
    medium_threshold: u32,
}

fn main() {
    let cli = Cli::parse();

    let weights = ScoringWeights {
        certainty_weight: cli.certainty_weight,
        evidence_weight: cli.evidence_weight,
        claim_weight: cli.claim_weight,
        high_threshold: cli.high_threshold,
        medium_threshold: cli.medium_threshold,
    };
    if let Err(e) = weights.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(2);
    }

    if cli.files.is_empty() {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .expect("Failed to read stdin");
        let result = overclaim::analyze(&input, &weights).expect("weights already validated");
        println!("{}", serde_json::to_string_pretty(&result).unwrap());
    } else {
        for path in &cli.files {
            let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading {path}: {e}");
                std::process::exit(1);
            });
            let result = overclaim::analyze(&text, &weights).expect("weights already validated");
            println!("{}", serde_json::to_string_pretty(&result).unwrap());
        }
    }
}
