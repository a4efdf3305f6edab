use super::common::*;
use crate::disruption::categories::StreetClass;
use crate::disruption::classifier::{
    ClassificationConfig, DisruptionClassifier, DisruptionDimension, DisruptionProfile, Severity,
};
use crate::disruption::collector::{LayerResults, SpatialFeatureCollector};
use crate::disruption::layers::{GeometryId, SpatialLayer, VolumeRadius};
use crate::disruption::DisruptionAssessor;
use std::collections::BTreeSet;
use std::sync::Arc;

fn collect(source: StaticLayerSource) -> LayerResults {
    SpatialFeatureCollector::new(Arc::new(source), vec![VolumeRadius(15), VolumeRadius(30)])
        .collect(SET)
        .expect("collects")
}

fn classify(source: StaticLayerSource, geometry: GeometryId) -> DisruptionProfile {
    DisruptionClassifier::default().classify(geometry, &collect(source))
}

#[test]
fn no_overlaps_give_the_lowest_bucket_everywhere() {
    let profile = classify(StaticLayerSource::default(), FIRST);

    assert_eq!(profile, DisruptionProfile::default());
    for dimension in DisruptionDimension::ALL {
        assert_eq!(profile.get(dimension), Severity::LOWEST);
    }
    assert_eq!(profile.worst(), Severity::LOWEST);
}

#[test]
fn traffic_volume_uses_the_wide_radius_on_major_streets() {
    let volumes = || {
        StaticLayerSource::default()
            .volumes(15, vec![volume(FIRST, 500)])
            .volumes(30, vec![volume(FIRST, 1200), volume(FIRST, 1800)])
    };

    let major = classify(
        volumes().layer(SpatialLayer::GeneralStreetClasses, vec![code(FIRST, MAIN_STREET)]),
        FIRST,
    );
    assert_eq!(major.street_class, Severity(5));
    assert_eq!(major.traffic_volume, Severity(3));

    let minor = classify(
        volumes().layer(SpatialLayer::GeneralStreetClasses, vec![code(FIRST, PLOT_STREET)]),
        FIRST,
    );
    assert_eq!(minor.street_class, Severity(1));
    assert_eq!(minor.traffic_volume, Severity(2));

    let unclassified = classify(volumes(), FIRST);
    assert_eq!(unclassified.street_class, Severity::LOWEST);
    assert_eq!(unclassified.traffic_volume, Severity(2));
}

#[test]
fn wide_radius_threshold_is_configurable() {
    let results = collect(
        StaticLayerSource::default()
            .layer(SpatialLayer::GeneralStreetClasses, vec![code(FIRST, LOCAL_COLLECTOR)])
            .volumes(15, vec![volume(FIRST, 12_000)])
            .volumes(30, vec![volume(FIRST, 40)]),
    );

    let default = DisruptionClassifier::default().classify(FIRST, &results);
    assert_eq!(default.traffic_volume, Severity(1));

    let strict = DisruptionClassifier::new(ClassificationConfig {
        wide_radius_from: StreetClass::RegionalCollector,
        ..ClassificationConfig::default()
    })
    .classify(FIRST, &results);
    assert_eq!(strict.traffic_volume, Severity(5));
}

#[test]
fn street_classes_count_only_on_public_street_areas() {
    let off_street = classify(
        StaticLayerSource::default()
            .layer(SpatialLayer::StreetClasses, vec![code(FIRST, LOCAL_COLLECTOR)]),
        FIRST,
    );
    assert_eq!(off_street.street_class, Severity::LOWEST);

    let on_street = classify(
        StaticLayerSource::default()
            .layer(SpatialLayer::PublicStreetAreas, vec![flag(FIRST, 1)])
            .layer(SpatialLayer::StreetClasses, vec![code(FIRST, LOCAL_COLLECTOR)]),
        FIRST,
    );
    assert_eq!(on_street.street_class, Severity(3));
}

#[test]
fn general_street_classes_take_precedence() {
    let profile = classify(
        StaticLayerSource::default()
            .layer(SpatialLayer::PublicStreetAreas, vec![flag(FIRST, 1)])
            .layer(SpatialLayer::StreetClasses, vec![code(FIRST, MAIN_STREET)])
            .layer(
                SpatialLayer::GeneralStreetClasses,
                vec![code(FIRST, PLOT_STREET), code(FIRST, LOCAL_COLLECTOR)],
            ),
        FIRST,
    );

    assert_eq!(profile.street_class, Severity(3));
}

#[test]
fn plot_street_in_central_business_district_is_upgraded() {
    let profile = classify(
        StaticLayerSource::default()
            .layer(SpatialLayer::GeneralStreetClasses, vec![code(FIRST, PLOT_STREET)])
            .layer(SpatialLayer::CentralBusinessDistrict, vec![flag(FIRST, 1)]),
        FIRST,
    );

    assert_eq!(profile.street_class, Severity(2));
}

#[test]
fn bus_critical_area_dominates_bus_routes() {
    let profile = classify(
        StaticLayerSource::default()
            .layer(SpatialLayer::BusCriticalArea, vec![flag(FIRST, 1)])
            .layer(SpatialLayer::BusRoutes, vec![bus(FIRST, "23", 2, "no")]),
        FIRST,
    );

    assert_eq!(profile.bus, Severity::HIGHEST);
}

#[test]
fn bus_severity_follows_trunk_lines_and_departures() {
    let cases = [
        (vec![bus(FIRST, "550", 1, "yes")], 5),
        (vec![bus(FIRST, "500", 1, "almost")], 4),
        (vec![bus(FIRST, "14", 12, "no"), bus(FIRST, "18", 9, "no")], 4),
        (vec![bus(FIRST, "14", 11, "no")], 3),
        (vec![bus(FIRST, "14", 5, "no")], 2),
        (vec![bus(FIRST, "14", 4, "no")], 1),
        (
            vec![
                bus(FIRST, "14", u32::MAX / 2 + 1, "no"),
                bus(FIRST, "18", u32::MAX / 2 + 1, "no"),
            ],
            4,
        ),
        (Vec::new(), 0),
    ];

    for (routes, expected) in cases {
        let profile = classify(
            StaticLayerSource::default().layer(SpatialLayer::BusRoutes, routes),
            FIRST,
        );
        assert_eq!(profile.bus, Severity(expected));
    }
}

#[test]
fn tram_and_cycle_routes_use_their_best_lane() {
    let profile = classify(
        StaticLayerSource::default()
            .layer(
                SpatialLayer::TramLanes,
                vec![code(FIRST, "shared"), code(SECOND, "shared"), code(SECOND, "dedicated")],
            )
            .layer(
                SpatialLayer::CycleRoutes,
                vec![code(FIRST, "main"), code(SECOND, "unknown")],
            ),
        FIRST,
    );
    assert_eq!(profile.tram, Severity(4));
    assert_eq!(profile.cycle_route, Severity(4));

    let second = classify(
        StaticLayerSource::default()
            .layer(SpatialLayer::TramLanes, vec![code(SECOND, "dedicated")])
            .layer(SpatialLayer::CycleRoutes, vec![code(SECOND, "priority")]),
        SECOND,
    );
    assert_eq!(second.tram, Severity(5));
    assert_eq!(second.cycle_route, Severity(5));
}

#[test]
fn hanke_profile_is_the_worst_per_dimension() {
    let results = collect(
        StaticLayerSource::default()
            .layer(SpatialLayer::GeneralStreetClasses, vec![code(FIRST, MAIN_STREET)])
            .layer(SpatialLayer::TramLanes, vec![code(SECOND, "shared")])
            .layer(SpatialLayer::BusRoutes, vec![bus(SECOND, "23", 6, "no")]),
    );

    let disruption = DisruptionClassifier::default()
        .classify_hanke(&results, &BTreeSet::from([FIRST, SECOND, GeometryId(99)]));

    assert_eq!(disruption.geometries.len(), 3);
    assert_eq!(
        disruption.geometries.get(&GeometryId(99)),
        Some(&DisruptionProfile::default())
    );
    assert_eq!(disruption.profile.street_class, Severity(5));
    assert_eq!(disruption.profile.tram, Severity(4));
    assert_eq!(disruption.profile.bus, Severity(2));
    assert_eq!(disruption.worst, Severity(5));
}

#[test]
fn hanke_without_geometries_gets_lowest_profile() {
    let disruption =
        DisruptionClassifier::default().classify_hanke(&LayerResults::default(), &BTreeSet::new());

    assert!(disruption.geometries.is_empty());
    assert_eq!(disruption.profile, DisruptionProfile::default());
    assert_eq!(disruption.worst, Severity::LOWEST);
}

#[test]
fn assessor_classifies_every_overlapping_geometry() {
    let assessor = DisruptionAssessor::new(
        Arc::new(
            StaticLayerSource::default()
                .layer(SpatialLayer::CycleRoutes, vec![code(FIRST, "priority")])
                .volumes(15, vec![volume(SECOND, 600)]),
        ),
        ClassificationConfig::default(),
    );

    let disruption = assessor.assess(SET).expect("assessed");

    assert_eq!(
        disruption.geometries.keys().copied().collect::<Vec<_>>(),
        vec![FIRST, SECOND]
    );
    assert_eq!(disruption.profile.cycle_route, Severity(5));
    assert_eq!(disruption.profile.traffic_volume, Severity(2));
}
