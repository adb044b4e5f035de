//! Lookup configuration and customization
//!
//! This example compares the configuration presets on misspelled input and shows how to plug in
//! custom weights, stop-words and similarity functions.

use std::sync::Arc;

use dpo_finder::{
    DpoFinder, LookupConfigBuilder, SimilarityScorer, Tokenizer,
    data_processing::{TestDataConfig, create_test_data},
};

/// Similarity that only accepts identical strings.
#[derive(Debug)]
struct Strict;

impl SimilarityScorer for Strict {
    fn similarity(&self, keyword: &str, field: &str) -> f64 {
        if keyword == field { 100.0 } else { 0.0 }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (file, _) = create_test_data(&TestDataConfig::sample())?;
    let finder = DpoFinder::from_path(file.path());
    let table = finder.table()?.clone();
    let address = "Indranagar, Banglore";

    println!("Comparing configurations for '{address}':\n");

    let presets = [
        ("Default", LookupConfigBuilder::new().build()),
        ("Exact only", LookupConfigBuilder::exact_only().build()),
        ("Lenient", LookupConfigBuilder::lenient().build()),
        (
            "District heavy",
            LookupConfigBuilder::new()
                .custom_field_weights(1.0, 0.3, 0.9, 0.1, 0.05)?
                .fuzzy_threshold(85.0)
                .build(),
        ),
    ];
    for (name, config) in presets {
        let outcome = DpoFinder::from_table(table.clone())
            .with_config(config)
            .lookup(address);
        println!(
            "  {name:<15} {:<28} {:<20} score: {}",
            outcome.status,
            outcome.dpo_name.as_deref().unwrap_or("-"),
            outcome.score.map_or_else(|| "-".to_string(), |s| format!("{s:.2}")),
        );
    }

    println!("\nCustom similarity:");
    let outcome = DpoFinder::from_table(table.clone())
        .with_similarity(Arc::new(Strict))
        .lookup(address);
    println!("  {} ({})", outcome.status, outcome.message);

    println!("\nExtra stop-words:");
    let outcome = DpoFinder::from_table(table)
        .with_tokenizer(Tokenizer::new().with_extra_stop_words(["mumbai"]))
        .lookup("Mumbai 400001");
    println!("  {} ({})", outcome.status, outcome.message);

    Ok(())
}
