use astrot::aspects::{AspectCalculator, AspectSettings, AspectType};
use astrot::chart::BodyPosition;
use astrot::position::Placement;
use astrot::zodiac::{Body, House};

fn position(body: Body, longitude: f64, speed: f64) -> BodyPosition {
    let placement = Placement::from_longitude(longitude);
    BodyPosition {
        body,
        sign: placement.sign,
        degree: placement.degree,
        house: House::FIRST,
        retrograde: speed < 0.0,
        longitude: placement.longitude,
        speed,
    }
}

#[test]
fn test_square_at_exact_angle() {
    let calculator = AspectCalculator::new();
    let aspect = calculator
        .calculate_aspect(10.0, 100.0, 1.0, 1.0, &AspectSettings::default())
        .unwrap();

    assert_eq!(aspect.aspect_type, AspectType::Square);
    assert!(aspect.orb.abs() < 1e-9);
    assert!(aspect.exact);
}

#[test]
fn test_opposition_inside_orb() {
    let calculator = AspectCalculator::new();
    let aspect = calculator
        .calculate_aspect(10.0, 183.0, 1.0, 1.0, &AspectSettings::default())
        .unwrap();

    assert_eq!(aspect.aspect_type, AspectType::Opposition);
    assert!((aspect.orb - 7.0).abs() < 1e-9);
    assert!(!aspect.exact);
}

#[test]
fn test_conjunction_across_aries_point() {
    let calculator = AspectCalculator::new();
    let settings = AspectSettings::default();

    let aspect = calculator
        .calculate_aspect(357.0, 3.0, 1.0, 0.5, &settings)
        .unwrap();
    assert_eq!(aspect.aspect_type, AspectType::Conjunction);
    assert!((aspect.orb - 6.0).abs() < 1e-9);

    // 10 degrees apart, wider than the conjunction orb
    assert!(calculator.calculate_aspect(355.0, 5.0, 1.0, 0.5, &settings).is_none());
}

#[test]
fn test_no_aspect_between_patterns() {
    let calculator = AspectCalculator::new();
    // 45 degrees: 15 from sextile and square, 45 from conjunction
    assert!(calculator
        .calculate_aspect(0.0, 45.0, 1.0, 1.0, &AspectSettings::default())
        .is_none());
}

#[test]
fn test_argument_order_does_not_change_type_or_orb() {
    let calculator = AspectCalculator::new();
    let settings = AspectSettings::default();
    for (a, b) in [(10.0, 183.0), (20.0, 142.0), (300.0, 5.0), (0.0, 151.0)] {
        let forward = calculator.calculate_aspect(a, b, 0.0, 0.0, &settings);
        let backward = calculator.calculate_aspect(b, a, 0.0, 0.0, &settings);
        assert_eq!(
            forward.map(|x| (x.aspect_type, (x.orb * 1e6).round())),
            backward.map(|x| (x.aspect_type, (x.orb * 1e6).round()))
        );
    }
}

#[test]
fn test_applying_and_separating() {
    let calculator = AspectCalculator::new();
    let settings = AspectSettings::default();

    // Separation 95 shrinks toward 90 while the first body gains on the second
    let closing = calculator
        .calculate_aspect(10.0, 105.0, 1.0, 0.0, &settings)
        .unwrap();
    assert_eq!(closing.aspect_type, AspectType::Square);
    assert!(closing.applying);

    let opening = calculator
        .calculate_aspect(10.0, 105.0, -1.0, 0.0, &settings)
        .unwrap();
    assert!(!opening.applying);

    let stationary = calculator
        .calculate_aspect(10.0, 105.0, 0.3, 0.3, &settings)
        .unwrap();
    assert!(!stationary.applying);
}

#[test]
fn test_configured_orbs_are_respected() {
    let calculator = AspectCalculator::new();
    let tight = AspectSettings::default().with_orb(AspectType::Opposition, 5.0);
    assert!(calculator
        .calculate_aspect(10.0, 183.0, 1.0, 1.0, &tight)
        .is_none());
}

#[test]
fn test_natal_aspects_one_per_pair_in_body_order() {
    let calculator = AspectCalculator::new();
    let positions = vec![
        position(Body::Mars, 190.0, 0.5),
        position(Body::Sun, 10.0, 1.0),
        position(Body::Moon, 100.0, 13.0),
        position(Body::Venus, 12.0, 1.2),
    ];

    let aspects = calculator.natal_aspects(&positions, &AspectSettings::default());

    for aspect in &aspects {
        assert!(aspect.first < aspect.second);
    }
    let pairs: Vec<(Body, Body, AspectType)> = aspects
        .iter()
        .map(|a| (a.first, a.second, a.aspect.aspect_type))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (Body::Sun, Body::Moon, AspectType::Square),
            (Body::Sun, Body::Venus, AspectType::Conjunction),
            (Body::Sun, Body::Mars, AspectType::Opposition),
            (Body::Moon, Body::Venus, AspectType::Square),
            (Body::Moon, Body::Mars, AspectType::Square),
            (Body::Venus, Body::Mars, AspectType::Opposition),
        ]
    );
}

#[test]
fn test_aspect_serializes_flat() {
    let calculator = AspectCalculator::new();
    let positions = vec![position(Body::Sun, 10.0, 1.0), position(Body::Moon, 100.0, 13.0)];
    let aspects = calculator.natal_aspects(&positions, &AspectSettings::default());
    let json = serde_json::to_value(&aspects[0]).unwrap();

    assert_eq!(json["first"], "sun");
    assert_eq!(json["second"], "moon");
    assert_eq!(json["aspect_type"], "square");
    assert_eq!(json["exact"], true);
}
