use market_chart::core::{WaterfallEntity, WaterfallKind, project_waterfall};
use proptest::prelude::*;

proptest! {
    #[test]
    fn deltas_bridge_start_and_end_totals(
        values in prop::collection::vec((-1_000.0f64..1_000.0, -1_000.0f64..1_000.0), 1..16)
    ) {
        let entities: Vec<WaterfallEntity> = values
            .iter()
            .enumerate()
            .map(|(index, (start, end))| WaterfallEntity::new(format!("E{index}"), *start, *end))
            .collect();

        let steps = project_waterfall(&entities, "start", "end");
        prop_assert_eq!(steps.len(), entities.len() + 2);
        prop_assert_eq!(steps[0].kind, WaterfallKind::Start);
        prop_assert_eq!(steps[steps.len() - 1].kind, WaterfallKind::End);

        let deltas = &steps[1..steps.len() - 1];
        let delta_sum: f64 = deltas.iter().map(|step| step.value).sum();
        let bridge = steps[steps.len() - 1].value - steps[0].value;
        prop_assert!((delta_sum - bridge).abs() <= 1e-6 * (1.0 + bridge.abs()));

        let first_negative = deltas
            .iter()
            .position(|step| step.kind == WaterfallKind::Negative)
            .unwrap_or(deltas.len());
        prop_assert!(deltas[..first_negative].iter().all(|step| step.kind == WaterfallKind::Positive));
        prop_assert!(deltas[first_negative..].iter().all(|step| step.kind == WaterfallKind::Negative));
        for pair in deltas.windows(2) {
            if pair[0].kind == pair[1].kind {
                prop_assert!(pair[0].value.abs() >= pair[1].value.abs());
            }
        }
    }
}
