//! Batch lookups
//!
//! This example resolves many addresses at once. Batch lookups run in parallel and return the
//! outcomes in input order.

use std::time::Instant;

use dpo_finder::{
    DpoFinder, MatchStatus,
    data_processing::{TestDataConfig, create_test_data},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (file, _) = create_test_data(&TestDataConfig::sample())?;
    let finder = DpoFinder::from_path(file.path());

    let addresses = vec![
        "Indiranagar, Bangalore 560038",
        "Bangalore GPO 560001",
        "Fort, Mumbai 400001",
        "Anna Nagar East, Chennai",
        "Khurda Odisha",
        "Parliament Street 110001",
        "999999 Indiranagar",
        "Nowhere in particular",
    ];

    println!("Processing {} addresses...", addresses.len());

    let start = Instant::now();
    let outcomes = finder.lookup_batch(&addresses);
    println!("Batch finished in {:?}\n", start.elapsed());

    for (address, outcome) in addresses.iter().zip(&outcomes) {
        println!(
            "  {:<32} {:<28} {} {}",
            address,
            outcome.status,
            outcome.pin.as_deref().unwrap_or("-"),
            outcome.dpo_name.as_deref().unwrap_or("-"),
        );
    }

    let resolved = outcomes
        .iter()
        .filter(|outcome| outcome.status.has_suggestion())
        .count();
    let not_found = outcomes
        .iter()
        .filter(|outcome| outcome.status == MatchStatus::NotFound)
        .count();
    println!("\n{resolved} resolved, {not_found} not found");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_env() {
        let _ = dpo_finder::init_logging(tracing::Level::WARN);
    }

    #[test]
    fn test_batch_processing_example() {
        setup_test_env();
        assert!(main().is_ok(), "Batch processing example should run successfully");
    }
}
