//! Console rendering for lookup results, suggestions and office details.
use dpo_finder::{FinderInfo, MatchOutcome, ParsedQuery, PostalRecord, Suggestions};
use serde::Serialize;

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn render_parsed(parsed: &ParsedQuery) -> String {
    let keywords = parsed
        .locality_keywords
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Parsed components: pincode={}, locality_keywords=[{keywords}]",
        parsed.pin_code.as_deref().unwrap_or("None")
    )
}

pub fn render_outcome(address: &str, outcome: &MatchOutcome) -> String {
    format!("\nProcessing address: '{address}'\n\n--- Suggestion ---\n{outcome}")
}

pub fn render_suggestions(query: &str, suggestions: &Suggestions) -> String {
    if suggestions.is_empty() {
        return format!("No suggestions for '{query}'.");
    }

    let mut lines = vec![format!(
        "Suggestions for '{query}' ({} of {}):",
        suggestions.offices.len(),
        suggestions.total
    )];
    lines.extend(suggestions.offices.iter().map(|record| {
        format!(
            "  {}  {:<28} {}, {}",
            record.pin_code(),
            record.office_name(),
            title_case(record.district()),
            title_case(record.state()),
        )
    }));
    if suggestions.has_more() {
        lines.push("  ... more available, raise --limit to see them".to_string());
    }
    lines.join("\n")
}

pub fn render_details(record: &PostalRecord) -> String {
    let delivery = if record.is_delivery() { "Delivery" } else { "Non-Delivery" };
    let mut lines = vec![
        format!("  Office:      {}", record.office_name()),
        format!("  PIN Code:    {}", record.pin_code()),
        format!("  Type:        {} ({delivery})", record.office_type()),
        format!("  Division:    {}", title_case(record.division_name())),
        format!("  Region:      {}", title_case(record.region_name())),
        format!("  Circle:      {}", title_case(record.circle_name())),
        format!("  District:    {}", title_case(record.district())),
        format!("  State:       {}", title_case(record.state())),
    ];
    if let Some((lat, lon)) = record.coordinates() {
        lines.push(format!("  Coordinates: {lat}, {lon}"));
    }
    if let Some(link) = record.maps_link() {
        lines.push(format!("  Map:         {link}"));
    }
    lines.join("\n")
}

pub fn render_info(info: &FinderInfo) -> String {
    format!("Postal data loaded: {}", info.summary())
}

/// Matching fields are stored lower-cased; capitalize each word for display.
fn title_case(text: &str) -> String {
    if text.is_empty() {
        return "-".to_string();
    }
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
