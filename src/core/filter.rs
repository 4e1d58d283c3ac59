use tracing::trace;

use super::context::QueryContext;
use super::filter_state::FilterState;
use super::types::DataRecord;

/// Returns records passing every axis of `state`, in input order.
///
/// Geography and segment selections are OR-matched and vacuous when empty;
/// segment type must be equal; business type passes when either side
/// carries none.
#[must_use]
pub fn filter_records<'a>(
    records: &'a [DataRecord],
    state: &FilterState,
    ctx: &QueryContext,
) -> Vec<&'a DataRecord> {
    let selected: Vec<&'a DataRecord> = records
        .iter()
        .filter(|record| record_passes(record, state, ctx))
        .collect();
    trace!(
        input = records.len(),
        output = selected.len(),
        segment_type = %state.segment_type,
        "filter records"
    );
    selected
}

/// Single-record form of [`filter_records`].
#[must_use]
pub fn record_passes(record: &DataRecord, state: &FilterState, ctx: &QueryContext) -> bool {
    if record.segment_type != state.segment_type {
        return false;
    }

    if !state.geographies.is_empty()
        && !ctx
            .geography()
            .is_match(&record.geography, &state.geographies)
    {
        return false;
    }

    if let (Some(wanted), Some(actual)) = (
        state.business_type,
        record.business_type(ctx.segment_separator()),
    ) {
        if wanted != actual {
            return false;
        }
    }

    ctx.segments()
        .matches_any(&record.segment, &state.segments)
}
