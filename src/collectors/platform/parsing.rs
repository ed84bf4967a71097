//! Parsers for platform probe output
//!
//! Kept free of `cfg` gates so every platform's parsing is tested everywhere.

/// Placeholder strings firmware vendors leave in DMI fields
const DMI_PLACEHOLDERS: &[&str] = &[
    "to be filled by o.e.m.",
    "system product name",
    "system manufacturer",
    "default string",
    "not specified",
    "none",
];

/// Parses a sysfs `capacity` file (percent) into a fraction
pub fn parse_capacity_percent(text: &str) -> Option<f64> {
    let percent: f64 = text.trim().parse().ok()?;
    (0.0..=100.0).contains(&percent).then(|| percent / 100.0)
}

/// Extracts the battery fraction from `pmset -g batt` output
///
/// The relevant line looks like
/// `-InternalBattery-0 (id=4653155)\t85%; charging; 1:02 remaining present: true`.
pub fn parse_pmset_battery(output: &str) -> Option<f64> {
    output
        .lines()
        .filter(|line| line.contains("InternalBattery"))
        .flat_map(|line| line.split(|c: char| c.is_whitespace() || c == ';'))
        .find_map(|token| token.strip_suffix('%'))
        .and_then(parse_capacity_percent)
}

/// Reads `Key=Value` from `wmic ... /value` output
pub fn parse_wmic_value(output: &str, key: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let (name, value) = line.trim().split_once('=')?;
        if name.trim().eq_ignore_ascii_case(key) {
            non_blank(value)
        } else {
            None
        }
    })
}

/// Cleans a DMI identity field, dropping firmware placeholders
pub fn clean_dmi_value(text: &str) -> Option<String> {
    let value = non_blank(text)?;
    if DMI_PLACEHOLDERS.contains(&value.to_ascii_lowercase().as_str()) {
        None
    } else {
        Some(value)
    }
}

/// Trims probe output, treating blank output as absent
pub fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
