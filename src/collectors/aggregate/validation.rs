//! Precondition checks run before a collection starts

use std::collections::HashMap;
use std::time::Duration;

use log::{error, trace};

use crate::attributes::AttributeSource;
use crate::collectors::aggregate::errors::ConfigurationError;

/// Validates the catalog before any source is fetched
///
/// # Validation Rules
///
/// 1. **Non-empty**: the catalog holds at least one source
/// 2. **Non-blank ids**: every id has visible characters
/// 3. **Unique ids**: no two sources share an id
pub fn validate_catalog(catalog: &[AttributeSource]) -> Result<(), ConfigurationError> {
    if catalog.is_empty() {
        error!("Rejecting collection: attribute catalog is empty");
        return Err(ConfigurationError::EmptyCatalog);
    }

    let mut seen: HashMap<&str, usize> = HashMap::with_capacity(catalog.len());
    for (position, source) in catalog.iter().enumerate() {
        if source.id().trim().is_empty() {
            error!("Rejecting collection: blank attribute id at position {}", position);
            return Err(ConfigurationError::BlankId { position });
        }

        if let Some(first) = seen.insert(source.id(), position) {
            error!(
                "Rejecting collection: duplicate attribute id '{}' (positions {} and {})",
                source.id(),
                first,
                position
            );
            return Err(ConfigurationError::DuplicateId {
                id: source.id().to_string(),
                first,
                second: position,
            });
        }
    }

    trace!("Catalog validation passed for {} sources", catalog.len());
    Ok(())
}

/// Validates the per-source and overall time allowances
pub fn validate_timeouts(
    per_source_timeout: Duration,
    overall_timeout: Duration,
) -> Result<(), ConfigurationError> {
    if per_source_timeout.is_zero() {
        return Err(ConfigurationError::InvalidTimeout(
            "per-source timeout must be greater than zero".to_string(),
        ));
    }

    if overall_timeout < per_source_timeout {
        return Err(ConfigurationError::InvalidTimeout(format!(
            "overall timeout ({}ms) must not be shorter than the per-source timeout ({}ms)",
            overall_timeout.as_millis(),
            per_source_timeout.as_millis()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{Formatter, RawValue};

    fn source(id: &str) -> AttributeSource {
        AttributeSource::constant(id, Formatter::identity(), RawValue::from("value"))
    }

    #[test]
    fn test_valid_catalog() {
        let catalog = vec![source("Brand"), source("Model"), source("Version")];
        assert!(validate_catalog(&catalog).is_ok());
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let result = validate_catalog(&[]);
        assert!(matches!(result, Err(ConfigurationError::EmptyCatalog)));
    }

    #[test]
    fn test_duplicate_id_rejected_with_positions() {
        let catalog = vec![source("Brand"), source("Model"), source("Brand")];
        match validate_catalog(&catalog) {
            Err(ConfigurationError::DuplicateId { id, first, second }) => {
                assert_eq!(id, "Brand");
                assert_eq!(first, 0);
                assert_eq!(second, 2);
            }
            other => panic!("expected duplicate id error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_id_rejected() {
        let catalog = vec![source("Brand"), source("  ")];
        assert!(matches!(
            validate_catalog(&catalog),
            Err(ConfigurationError::BlankId { position: 1 })
        ));
    }

    #[test]
    fn test_timeout_rules() {
        let ms = Duration::from_millis;
        assert!(validate_timeouts(ms(100), ms(100)).is_ok());
        assert!(validate_timeouts(ms(100), ms(500)).is_ok());
        assert!(validate_timeouts(Duration::ZERO, ms(500)).is_err());

        let error = validate_timeouts(ms(500), ms(100)).unwrap_err();
        assert!(error.to_string().contains("overall timeout (100ms)"));
    }
}
