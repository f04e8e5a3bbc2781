use super::*;

fn make_product(readiness: Option<Related<Readiness>>) -> Product {
    Product {
        id: "prd-001".to_owned(),
        name: "PayLink Express".to_owned(),
        product_type: Some("payments".to_owned()),
        lifecycle_stage: Some("pilot".to_owned()),
        readiness,
        ..Product::default()
    }
}

fn readiness(score: f64, band: &str) -> Readiness {
    Readiness {
        readiness_score: Some(score),
        risk_band: Some(band.to_owned()),
    }
}

#[test]
fn object_and_single_element_list_normalize_identically() {
    let from_object = normalize_product(make_product(Some(Related::One(readiness(72.0, "low")))));
    let from_list = normalize_product(make_product(Some(Related::Many(vec![readiness(
        72.0, "low",
    )]))));
    assert_eq!(from_object, from_list);
    assert_eq!(from_list.readiness_score(), Some(72.0));
}

#[test]
fn empty_list_normalizes_to_absent() {
    let normalized = normalize_product(make_product(Some(Related::Many(vec![]))));
    assert!(normalized.readiness.is_none());
    assert_eq!(normalized.readiness_score(), None);
}

#[test]
fn multi_element_list_keeps_first() {
    let normalized = normalize_product(make_product(Some(Related::Many(vec![
        readiness(40.0, "medium"),
        readiness(90.0, "low"),
    ]))));
    assert_eq!(normalized.readiness_score(), Some(40.0));
    assert_eq!(normalized.risk_band_label(), Some("medium"));
}

#[test]
fn missing_related_fields_stay_absent() {
    let normalized = normalize_product(make_product(None));
    assert!(normalized.readiness.is_none());
    assert!(normalized.prediction.is_none());
    assert!(normalized.readiness_score_or_zero().abs() < f64::EPSILON);
}

#[test]
fn blank_strings_become_none() {
    let product = Product {
        owner_email: Some("   ".to_owned()),
        budget_code: Some(String::new()),
        region: Some("emea".to_owned()),
        ..make_product(None)
    };
    let normalized = normalize_product(product);
    assert!(normalized.owner_email.is_none());
    assert!(normalized.budget_code.is_none());
    assert_eq!(normalized.region.as_deref(), Some("emea"));
}

#[test]
fn blank_risk_band_becomes_none() {
    let normalized = normalize_product(make_product(Some(Related::One(readiness(50.0, "")))));
    assert_eq!(normalized.readiness_score(), Some(50.0));
    assert!(normalized.risk_band_label().is_none());
}

#[test]
fn out_of_range_values_are_clamped() {
    let product = Product {
        revenue_target: Some(-10.0),
        prediction: Some(Related::One(Prediction {
            success_probability: 1.4,
            revenue_probability: -0.2,
            failure_risk: 0.3,
        })),
        ..make_product(Some(Related::One(readiness(130.0, "low"))))
    };
    let normalized = normalize_product(product);
    assert_eq!(normalized.readiness_score(), Some(100.0));
    assert_eq!(normalized.revenue_target, Some(0.0));
    let prediction = normalized.prediction.unwrap();
    assert!((prediction.success_probability - 1.0).abs() < f64::EPSILON);
    assert!(prediction.revenue_probability.abs() < f64::EPSILON);
    assert!((prediction.failure_risk - 0.3).abs() < f64::EPSILON);
}

#[test]
fn normalize_products_preserves_order() {
    let products = vec![
        Product {
            id: "b".to_owned(),
            ..Product::default()
        },
        Product {
            id: "a".to_owned(),
            ..Product::default()
        },
    ];
    let ids: Vec<String> = normalize_products(products)
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[test]
fn normalizes_raw_json_with_mixed_shapes() {
    let raw: Vec<Product> = serde_json::from_str(
        r#"[
            {"id":"p1","name":"A","readiness":{"readiness_score":10,"risk_band":"high"}},
            {"id":"p2","name":"B","readiness":[{"readiness_score":10,"risk_band":"high"}]},
            {"id":"p3","name":"C","readiness":null,"prediction":[]}
        ]"#,
    )
    .unwrap();
    let normalized = normalize_products(raw);
    assert_eq!(normalized[0].readiness, normalized[1].readiness);
    assert!(normalized[2].readiness.is_none());
    assert!(normalized[2].prediction.is_none());
}
