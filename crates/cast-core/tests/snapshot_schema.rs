//! Serde roundtrip and JsonSchema validation for the persisted and served types.

use std::collections::BTreeMap;

use cast_core::entities::{Payload, Task};
use cast_core::identity::{BotIdentity, Validation};
use cast_core::responses::{Stats, TaskSummary, TaskView};
use chrono::Utc;
use schemars::schema_for;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn sample_task(id: &str, photo: Option<&str>) -> Task {
    Task {
        id: id.into(),
        name: "Launch".into(),
        tokens: vec!["123456:AAA".into(), "123456:AAA".into()],
        invalid_tokens: vec!["999:bad".into()],
        chat_ids: vec!["-1001".into(), "@channel".into()],
        payload: Payload {
            message: "Xin chào".into(),
            photo: photo.map(String::from),
        },
        delay: 2.5,
        typing: true,
        running: true,
        sent_count: 42,
        last_sent: Some(Utc::now()),
        created_at: Utc::now(),
    }
}

roundtrip_and_validate!(
    task_roundtrip,
    Task,
    sample_task("task_1718000000_a3f8b2c1", Some("https://example.com/a.jpg"))
);

roundtrip_and_validate!(
    snapshot_file_roundtrip,
    BTreeMap<String, Task>,
    {
        let mut map = BTreeMap::new();
        for (id, photo) in [("task_1_aaaaaaaa", None), ("task_2_bbbbbbbb", Some("/tmp/p.jpg"))] {
            map.insert(id.to_string(), sample_task(id, photo));
        }
        map
    }
);

roundtrip_and_validate!(
    task_view_roundtrip,
    TaskView,
    TaskView::from(&sample_task("task_3_cccccccc", None))
);

roundtrip_and_validate!(
    summary_roundtrip,
    TaskSummary,
    TaskSummary::from(&sample_task("task_4_dddddddd", None))
);

roundtrip_and_validate!(
    stats_roundtrip,
    Stats,
    Stats {
        total_tasks: 3,
        running_tasks: 1,
        total_credentials: 5,
        total_sent: 1200,
    }
);

roundtrip_and_validate!(
    validation_roundtrip,
    Validation,
    Validation::valid(BotIdentity {
        id: 123_456,
        username: "promo_bot".into(),
        first_name: "Promo".into(),
    })
);

#[test]
fn invalid_validation_omits_identity() {
    let json = serde_json::to_value(Validation::invalid()).unwrap();
    assert_eq!(json, serde_json::json!({ "valid": false }));
}
