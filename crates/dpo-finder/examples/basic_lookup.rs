//! Basic address lookup
//!
//! This example demonstrates the fundamental lookup operations:
//! - Creating a finder over a postal directory CSV
//! - Looking up addresses with and without a PIN code
//! - Reading the outcome

use dpo_finder::{
    DpoFinder, MatchOutcome,
    data_processing::{TestDataConfig, create_test_data},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A small sample directory; point `from_path` at the full export in real use
    let (file, _) = create_test_data(&TestDataConfig::sample())?;
    let finder = DpoFinder::from_path(file.path());

    for address in [
        "Connaught Place, New Delhi 110001",
        "Conaught Plaace, New Delhi 110001",
        "560038",
        "Random Street 110001",
        "Udyog Bhawan 110011",
        "Kharabela Nagar Bhubaneswar",
        "Peddakotla",
        "   ",
    ] {
        println!("Looking up '{address}':");
        print_outcome(&finder.lookup(address));
    }

    Ok(())
}

fn print_outcome(outcome: &MatchOutcome) {
    println!("{outcome}");
    if let Some(details) = &outcome.matched_keyword_details {
        for (keyword, field) in details {
            println!("    {keyword} -> {field}");
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_env() {
        let _ = dpo_finder::init_logging(tracing::Level::WARN);
    }

    #[test]
    fn test_basic_lookup_example() {
        setup_test_env();
        assert!(main().is_ok(), "Basic lookup example should run successfully");
    }
}
