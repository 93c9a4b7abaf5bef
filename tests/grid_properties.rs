//! Property tests for the grid model: unit counts, contiguous coverage,
//! monotonic past marking, phase coverage and event placement.

use chrono::NaiveDate;
use proptest::prelude::*;

use lifegrid::date_math::unit_range;
use lifegrid::phase::classify;
use lifegrid::{
    DEFAULT_PHASES, GridModel, GridRequest, HistoricalEvent, ViewGranularity, build,
    default_events,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn arb_granularity() -> impl Strategy<Value = ViewGranularity> {
    prop_oneof![
        Just(ViewGranularity::Weeks),
        Just(ViewGranularity::Months),
        Just(ViewGranularity::Years),
    ]
}

/// Birth dates between 1900 and 2023; day capped at 28 so every month is valid.
fn arb_birth() -> impl Strategy<Value = NaiveDate> {
    (1900i32..2024, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn build_for(
    birth: Option<NaiveDate>,
    granularity: ViewGranularity,
    lifespan_years: u32,
    events: &[HistoricalEvent],
) -> GridModel {
    build(
        &GridRequest {
            birth_date: birth,
            today: today(),
            granularity,
            lifespan_years,
            show_phases: true,
            show_events: true,
        },
        &DEFAULT_PHASES,
        events,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn unit_count_is_lifespan_times_units_per_year(
        granularity in arb_granularity(),
        lifespan in 1u32..=120,
        birth in prop::option::of(arb_birth()),
    ) {
        let model = build_for(birth, granularity, lifespan, &[]);
        prop_assert_eq!(
            model.total_units(),
            (lifespan * granularity.units_per_year()) as usize
        );
        for (i, unit) in model.units.iter().enumerate() {
            prop_assert_eq!(unit.index as usize, i);
        }
    }

    #[test]
    fn unit_ranges_are_contiguous(
        granularity in arb_granularity(),
        birth in arb_birth(),
        index in 0u32..6240,
    ) {
        let here = unit_range(granularity, birth, index);
        let next = unit_range(granularity, birth, index + 1);
        prop_assert!(here.start < here.end);
        prop_assert_eq!(here.end, next.start);
    }

    #[test]
    fn built_descriptors_tile_the_lifespan(
        granularity in arb_granularity(),
        birth in arb_birth(),
    ) {
        let model = build_for(Some(birth), granularity, 80, &[]);
        for pair in model.units.windows(2) {
            prop_assert_eq!(pair[0].range_end, pair[1].range_start);
        }
    }

    #[test]
    fn past_units_form_a_prefix(
        granularity in arb_granularity(),
        birth in arb_birth(),
    ) {
        let model = build_for(Some(birth), granularity, 80, &[]);
        let past = model.units.iter().take_while(|u| u.is_past).count();
        prop_assert!(model.units[past..].iter().all(|u| !u.is_past));
        prop_assert_eq!(past, (model.units_passed as usize).min(model.total_units()));
    }

    #[test]
    fn every_non_negative_age_has_exactly_one_phase(age in 0.0f64..500.0) {
        let matches = DEFAULT_PHASES.iter().filter(|p| p.contains(age)).count();
        prop_assert_eq!(matches, 1);
        prop_assert!(classify(age, &DEFAULT_PHASES).is_some());
    }

    #[test]
    fn events_land_in_the_unit_containing_their_date(
        granularity in arb_granularity(),
        birth in arb_birth(),
    ) {
        let events = default_events();
        let model = build_for(Some(birth), granularity, 80, &events);
        for event in &events {
            let holders: Vec<u32> = model
                .units
                .iter()
                .filter(|u| u.matched_events.contains(event))
                .map(|u| u.index)
                .collect();
            let containing: Vec<u32> = model
                .units
                .iter()
                .filter(|u| u.range().contains(event.date))
                .map(|u| u.index)
                .collect();
            prop_assert!(holders.len() <= 1);
            prop_assert_eq!(holders, containing);
        }
    }
}

#[test]
fn event_inside_lifespan_matches_exactly_once() {
    let birth = NaiveDate::from_ymd_opt(1960, 2, 29).unwrap();
    let events = default_events();
    for granularity in [
        ViewGranularity::Weeks,
        ViewGranularity::Months,
        ViewGranularity::Years,
    ] {
        let model = build_for(Some(birth), granularity, 80, &events);
        for event in &events {
            let hits = model
                .units
                .iter()
                .filter(|u| u.matched_events.contains(event))
                .count();
            assert_eq!(hits, 1, "{} under {granularity:?}", event.title);
        }
    }
}

#[test]
fn absent_birth_date_weeks_grid() {
    let model = build_for(None, ViewGranularity::Weeks, 80, &default_events());
    assert_eq!(model.total_units(), 4160);
    assert!(
        model
            .units
            .iter()
            .all(|u| !u.is_past && u.matched_events.is_empty())
    );
}
