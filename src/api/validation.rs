use crate::core::Year;
use crate::error::{MarketError, MarketResult};

use super::{DatasetMetadata, EngineConfig};

pub(super) fn validate_metadata(metadata: &DatasetMetadata) -> MarketResult<()> {
    if metadata.base_year >= metadata.forecast_year {
        return Err(MarketError::InvalidData(format!(
            "metadata base_year ({}) must be < forecast_year ({})",
            metadata.base_year, metadata.forecast_year
        )));
    }
    if metadata.start_year > metadata.base_year {
        return Err(MarketError::InvalidData(format!(
            "metadata start_year ({}) must be <= base_year ({})",
            metadata.start_year, metadata.base_year
        )));
    }

    if metadata.years.is_empty() {
        return Ok(());
    }
    for pair in metadata.years.windows(2) {
        if pair[1] != pair[0] + 1 {
            return Err(MarketError::InvalidData(format!(
                "metadata years must be contiguous and ascending, found {} after {}",
                pair[1], pair[0]
            )));
        }
    }
    let range = metadata.year_range();
    for (name, year) in [
        ("base_year", metadata.base_year),
        ("forecast_year", metadata.forecast_year),
    ] {
        if !range.contains(year) {
            return Err(MarketError::InvalidData(format!(
                "metadata `{name}` {year} is outside listed years {}..={}",
                range.start, range.end
            )));
        }
    }
    Ok(())
}

pub(super) fn validate_engine_config(config: &EngineConfig) -> MarketResult<()> {
    if config.segment_separator.trim().is_empty() {
        return Err(MarketError::InvalidConfig(
            "segment_separator must contain a non-whitespace token".to_owned(),
        ));
    }
    if config.series_key_separator.is_empty() {
        return Err(MarketError::InvalidConfig(
            "series_key_separator must not be empty".to_owned(),
        ));
    }
    if let (Some(base), Some(forecast)) = (config.base_year, config.forecast_year) {
        if base >= forecast {
            return Err(MarketError::InvalidConfig(format!(
                "base_year ({base}) must be < forecast_year ({forecast})"
            )));
        }
    }
    config.opportunity.validate()
}

/// Checks the base/forecast pair the engine will actually use against the
/// dataset span.
pub(super) fn validate_reference_years(
    metadata: &DatasetMetadata,
    base_year: Year,
    forecast_year: Year,
) -> MarketResult<()> {
    if base_year >= forecast_year {
        return Err(MarketError::InvalidConfig(format!(
            "effective base_year ({base_year}) must be < forecast_year ({forecast_year})"
        )));
    }
    let range = metadata.year_range();
    for (name, year) in [("base_year", base_year), ("forecast_year", forecast_year)] {
        if !range.contains(year) {
            return Err(MarketError::InvalidConfig(format!(
                "effective `{name}` {year} is outside dataset years {}..={}",
                range.start, range.end
            )));
        }
    }
    Ok(())
}
