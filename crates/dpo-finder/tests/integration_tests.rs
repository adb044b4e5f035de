//! Integration tests for dpo-finder address resolution
//!
//! These tests go through the public API only. Most of them load the sample postal directory
//! written by `create_test_data`, so they do not need the full directory export.

use std::{collections::BTreeSet, sync::Arc};

use dpo_finder::{
    DEFAULT_STOP_WORDS, DpoFinder, LookupConfigBuilder, MatchField, MatchStatus, ParsedQuery,
    PostalRecord, ReferenceTable, Scorer,
    data_processing::{TestDataConfig, create_test_data},
    tokenize,
};

fn setup_test_env() {
    let _ = dpo_finder::init_logging(tracing::Level::WARN);
}

fn sample_finder() -> DpoFinder {
    let (file, _) = create_test_data(&TestDataConfig::sample()).expect("Should write sample data");
    let table = ReferenceTable::load(file.path()).expect("Should load sample data");
    DpoFinder::from_table(Arc::new(table))
}

fn two_office_finder() -> DpoFinder {
    DpoFinder::from_records(vec![
        PostalRecord::basic(
            "560038",
            "Indiranagar S.O",
            "Bangalore East Division",
            "Bangalore Urban",
            "KARNATAKA",
            "SO",
            true,
        )
        .unwrap(),
        PostalRecord::basic(
            "560038",
            "Majestic S.O",
            "Bangalore East Division",
            "Bangalore Urban",
            "KARNATAKA",
            "SO",
            false,
        )
        .unwrap(),
    ])
}

#[test]
fn test_full_workflow() {
    setup_test_env();

    let (file, rows) = create_test_data(&TestDataConfig::sample()).unwrap();
    let finder = DpoFinder::from_path(file.path());
    assert!(!finder.is_loaded(), "Table should load lazily");

    // 1. PIN plus locality
    let outcome = finder.lookup("Indiranagar, Bangalore 560038");
    assert!(finder.is_loaded());
    assert_eq!(outcome.status, MatchStatus::Success);
    assert_eq!(outcome.pin.as_deref(), Some("560038"));
    assert_eq!(outcome.dpo_name.as_deref(), Some("Indiranagar S.O"));
    assert!(outcome.score.unwrap() > 0.0);

    // 2. Bare PIN
    let outcome = finder.lookup("560038");
    assert_eq!(outcome.status, MatchStatus::SuccessPinOnlyDpo);
    assert_eq!(outcome.dpo_name.as_deref(), Some("Indiranagar S.O"));
    assert!(outcome.score.is_none());
    assert!(outcome.matched_keyword_details.is_none());

    // 3. Locality only
    let outcome = finder.lookup("Kharabela Nagar Bhubaneswar");
    assert_eq!(outcome.status, MatchStatus::SuccessLocalityDpo);
    assert_eq!(outcome.pin.as_deref(), Some("751003"));
    assert_eq!(outcome.dpo_name.as_deref(), Some("Kharabela Nagar S.O"));

    // 4. Table information, with the blank-PIN rows dropped
    let info = finder.info().unwrap();
    assert_eq!(info.records, rows);
    assert!(info.summary().contains("post offices"));
}

#[test]
fn test_pin_group_outcomes() {
    setup_test_env();
    let finder = sample_finder();

    let outcome = finder.lookup("Random Street 110001");
    assert_eq!(outcome.status, MatchStatus::PartialMatchPin);
    assert_eq!(outcome.input_pin.as_deref(), Some("110001"));
    assert_eq!(outcome.dpo_name.as_deref(), Some("Connaught Place H.O"));
    assert!(outcome.message.contains("Suggested first DPO"));

    let outcome = finder.lookup("Udyog Bhawan 110011");
    assert_eq!(outcome.status, MatchStatus::PartialMatchPinNoDpoFlag);
    assert_eq!(outcome.pin.as_deref(), Some("110011"));
    assert_eq!(outcome.dpo_name.as_deref(), Some("Nirman Bhawan S.O"));
    assert!(outcome.score.is_none());
}

#[test]
fn test_unknown_pin_falls_back_to_locality() {
    setup_test_env();
    let finder = sample_finder();

    let outcome = finder.lookup("999999 Indiranagar");
    assert!(!outcome.status.is_partial());
    assert_ne!(outcome.status, MatchStatus::SuccessPinOnlyDpo);
    assert_eq!(outcome.status, MatchStatus::SuccessLocalityDpo);
    assert_eq!(outcome.input_pin.as_deref(), Some("999999"));
    assert_eq!(outcome.pin.as_deref(), Some("560038"));

    let outcome = finder.lookup("999999");
    assert_eq!(outcome.status, MatchStatus::NotFound);
}

#[test]
fn test_two_office_table() {
    setup_test_env();
    let finder = two_office_finder();

    let outcome = finder.lookup("Indiranagar 560038");
    assert_eq!(outcome.status, MatchStatus::Success);
    assert_eq!(outcome.dpo_name.as_deref(), Some("Indiranagar S.O"));
    assert_eq!(
        outcome.matched_keyword_details.unwrap()["indiranagar"],
        MatchField::OfficeName
    );

    // Only delivery offices are candidates inside a PIN group, so the non-delivery Majestic
    // cannot be picked and the keyword matches nothing that can.
    let outcome = finder.lookup("Majestic 560038");
    assert_eq!(outcome.status, MatchStatus::PartialMatchPin);
    assert_eq!(outcome.dpo_name.as_deref(), Some("Indiranagar S.O"));
    assert!(outcome.score.is_none());

    // Without a PIN the non-delivery office can still win
    let outcome = finder.lookup("Majestic");
    assert_eq!(outcome.status, MatchStatus::SuccessLocalityNonDpo);
    assert_eq!(outcome.dpo_name.as_deref(), Some("Majestic S.O"));
}

#[test]
fn test_lookup_with_prebuilt_query() {
    setup_test_env();
    let finder = sample_finder();

    // Keywords are used as given, so callers can bypass stop-word filtering
    let query = ParsedQuery::new(Some("751003".to_string()), ["kharabela", "nagar"]);
    let outcome = finder.lookup_parsed(&query);
    assert_eq!(outcome.status, MatchStatus::Success);
    assert_eq!(outcome.dpo_name.as_deref(), Some("Kharabela Nagar S.O"));
    assert_eq!(outcome.matched_keyword_details.unwrap().len(), 2);

    let outcome = finder.lookup_parsed(&ParsedQuery::new(None, Vec::<String>::new()));
    assert_eq!(outcome.status, MatchStatus::NotFound);
    assert_eq!(outcome, finder.lookup(""));
}

#[test]
fn test_error_handling() {
    setup_test_env();

    let outcome = DpoFinder::from_records(Vec::new()).lookup("Indiranagar 560038");
    assert_eq!(outcome.status, MatchStatus::Error);
    assert_eq!(outcome.message, "Postal data is not loaded or empty.");

    let finder = DpoFinder::from_path("/nonexistent/postal_data.csv");
    let outcome = finder.lookup("560038");
    assert_eq!(outcome.status, MatchStatus::Error);
    assert!(finder.info().is_err());

    let outcome = sample_finder().lookup("   ");
    assert_eq!(outcome.status, MatchStatus::NotFound);
    assert!(outcome.message.starts_with("Insufficient information"));
}

#[test]
fn test_tokenizer_properties() {
    let addresses = [
        "H.No 12, 5th Cross, Indiranagar, Bangalore 560038",
        "Opp. Bus Stand, Main Road, Peddakotla 515631",
        "Anna Nagar East, Chennai 600102",
        "sector 4, phase 2 near post office",
        "No PIN here at all",
    ];

    for address in addresses {
        let parsed = tokenize(address);

        for keyword in &parsed.locality_keywords {
            assert!(
                !DEFAULT_STOP_WORDS.contains(&keyword.as_str()),
                "'{keyword}' is a stop-word"
            );
            assert!(keyword.chars().count() > 2);
            assert_eq!(keyword, &keyword.to_lowercase());
        }

        // Feeding the parsed pieces back in gives the same query
        let rejoined = parsed
            .pin_code
            .iter()
            .chain(parsed.locality_keywords.iter())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(tokenize(&rejoined), parsed, "Unstable for '{address}'");
    }

    assert_eq!(tokenize(addresses[0]).pin_code.as_deref(), Some("560038"));
    assert!(tokenize(addresses[4]).pin_code.is_none());
}

#[test]
fn test_score_never_drops_when_keywords_are_added() {
    let finder = sample_finder();
    let table = finder.table().unwrap();
    let scorer = Scorer::default();

    let base = ["indiranagar"]
        .iter()
        .map(|w| (*w).to_string())
        .collect::<BTreeSet<_>>();
    let mut extended = base.clone();
    extended.insert("bangalore".to_string());
    extended.insert("karnataka".to_string());

    for record in table.records() {
        let before = scorer.score(record, &base).score;
        let after = scorer.score(record, &extended).score;
        assert!(
            after >= before,
            "{} scored {after} < {before}",
            record.office_name()
        );
    }
}

#[test]
fn test_batch_matches_individual_lookups() {
    setup_test_env();
    let finder = sample_finder();

    let addresses = vec![
        "Indiranagar, Bangalore 560038".to_string(),
        "Fort, Mumbai 400001".to_string(),
        String::new(),
        "Anna Nagar East, Chennai".to_string(),
        "Udyog Bhawan 110011".to_string(),
        "Khurda Odisha".to_string(),
    ];
    let outcomes = finder.lookup_batch(&addresses);

    assert_eq!(outcomes.len(), addresses.len());
    for (address, outcome) in addresses.iter().zip(&outcomes) {
        assert_eq!(&finder.lookup(address), outcome, "Mismatch for '{address}'");
    }
    assert_eq!(outcomes[2].status, MatchStatus::NotFound);
}

#[test]
fn test_configuration_presets() {
    setup_test_env();
    let table = sample_finder().table().unwrap().clone();

    let default = DpoFinder::from_table(table.clone()).lookup("Indranagar 560038");
    assert_eq!(default.status, MatchStatus::Success);

    let exact = DpoFinder::from_table(table.clone())
        .with_config(LookupConfigBuilder::exact_only().build())
        .lookup("Indranagar 560038");
    assert_eq!(exact.status, MatchStatus::PartialMatchPin);
    assert_eq!(exact.dpo_name, default.dpo_name);

    let lenient = DpoFinder::from_table(table)
        .with_config(LookupConfigBuilder::lenient().build())
        .lookup("Indranagar 560038");
    assert_eq!(lenient.status, MatchStatus::Success);
    assert!(lenient.score.unwrap() < default.score.unwrap());
}

#[test]
fn test_suggestions_and_details() {
    setup_test_env();
    let finder = sample_finder();

    let suggestions = finder.suggest("bhubaneswar", 5).unwrap();
    assert_eq!(suggestions.total, 2);
    assert_eq!(suggestions.offices[0].office_name(), "Bhubaneswar GPO");

    let details = finder.office_details("CONNAUGHT PLACE H.O").unwrap().unwrap();
    assert_eq!(details.pin_code(), "110001");
    assert!(details.is_delivery());
    assert!(details.maps_link().is_some());

    let details = finder.office_details("Parliament Street H.O").unwrap().unwrap();
    assert!(details.maps_link().is_none());
}

#[test]
fn test_concurrent_access() {
    setup_test_env();
    let finder = Arc::new(sample_finder());

    let handles = (0..4)
        .map(|_| {
            let finder = Arc::clone(&finder);
            std::thread::spawn(move || finder.lookup("Indiranagar 560038"))
        })
        .collect::<Vec<_>>();

    for handle in handles {
        let outcome = handle.join().expect("Thread should not panic");
        assert_eq!(outcome.status, MatchStatus::Success);
    }
}
