use phpspec_rewriter::{
    InvalidTypeHintRecord, Parameter, RejectionReason, TypeHintIndex, TypeHintRecord,
    TypeHintSink,
};

fn parameter(name: &str, position: u32) -> Parameter {
    Parameter {
        name: name.to_string(),
        position,
    }
}

fn valid(class: &str, method: &str, param: &str, type_hint: &str) -> TypeHintRecord {
    TypeHintRecord {
        class: class.to_string(),
        method: method.to_string(),
        parameter: parameter(param, 0),
        type_hint: type_hint.to_string(),
    }
}

fn invalid(class: &str, method: &str, param: &str, reason: RejectionReason) -> InvalidTypeHintRecord {
    InvalidTypeHintRecord {
        class: class.to_string(),
        method: method.to_string(),
        parameter: parameter(param, 0),
        reason,
    }
}

#[test]
fn test_empty_index() {
    let index = TypeHintIndex::new();
    assert!(index.is_empty());
    assert_eq!(index.len(), 0);
    assert_eq!(index.lookup("MailerSpec", "let", "mailer"), Ok(None));
}

#[test]
fn test_lookup_valid_and_invalid() {
    let index = TypeHintIndex::new();
    index.add(valid("spec\\MailerSpec", "let", "mailer", "Acme\\Mailer"));
    index.add_invalid(invalid(
        "spec\\MailerSpec",
        "it_counts",
        "step",
        RejectionReason::NonObjectTypeRejected,
    ));

    assert_eq!(index.len(), 2);
    assert_eq!(
        index.lookup("spec\\MailerSpec", "let", "mailer"),
        Ok(Some("Acme\\Mailer".to_string()))
    );

    let err = index
        .lookup("spec\\MailerSpec", "it_counts", "step")
        .expect_err("recorded as invalid");
    assert_eq!(err.class, "spec\\MailerSpec");
    assert_eq!(err.method, "it_counts");
    assert_eq!(err.parameter, "step");
    assert_eq!(err.reason, RejectionReason::NonObjectTypeRejected);
    assert_eq!(
        err.to_string(),
        "spec\\MailerSpec::it_counts() parameter step: non-object types cannot be doubled"
    );
}

#[test]
fn test_later_record_wins_on_lookup() {
    let index = TypeHintIndex::new();
    index.add(valid("MailerSpec", "let", "mailer", "Old\\Mailer"));
    index.add_invalid(invalid(
        "MailerSpec",
        "let",
        "mailer",
        RejectionReason::UnionTypeRejected,
    ));
    assert!(index.lookup("MailerSpec", "let", "mailer").is_err());

    index.add(valid("mailerspec", "LET", "mailer", "New\\Mailer"));
    assert_eq!(
        index.lookup("MailerSpec", "let", "mailer"),
        Ok(Some("New\\Mailer".to_string()))
    );

    // Nothing is deduplicated.
    assert_eq!(index.records().len(), 2);
    assert_eq!(index.invalid_records().len(), 1);
    assert_eq!(index.len(), 3);
}

#[test]
fn test_snapshot_serializes_to_json() {
    let index = TypeHintIndex::new();
    index.add(TypeHintRecord {
        class: "spec\\MailerSpec".to_string(),
        method: "let".to_string(),
        parameter: parameter("mailer", 42),
        type_hint: "Acme\\Mailer".to_string(),
    });
    index.add_invalid(invalid(
        "spec\\MailerSpec",
        "it_sends",
        "message",
        RejectionReason::IntersectionTypeRejected,
    ));

    let snapshot = index.snapshot();
    assert_eq!(snapshot.type_hints, index.records());
    assert_eq!(snapshot.invalid_type_hints, index.invalid_records());

    let json = serde_json::to_value(&snapshot).expect("serialize snapshot");
    assert_eq!(
        json,
        serde_json::json!({
            "type_hints": [{
                "class": "spec\\MailerSpec",
                "method": "let",
                "parameter": { "name": "mailer", "position": 42 },
                "type_hint": "Acme\\Mailer"
            }],
            "invalid_type_hints": [{
                "class": "spec\\MailerSpec",
                "method": "it_sends",
                "parameter": { "name": "message", "position": 0 },
                "reason": "IntersectionTypeRejected"
            }]
        })
    );
}

#[test]
fn test_index_is_shared_across_threads() {
    use std::sync::Arc;

    let index = Arc::new(TypeHintIndex::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let index = Arc::clone(&index);
            std::thread::spawn(move || {
                index.add(valid(
                    &format!("Class{}Spec", i),
                    "let",
                    "dep",
                    &format!("Dep{}", i),
                ));
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread panicked");
    }

    assert_eq!(index.len(), 4);
    assert_eq!(
        index.lookup("Class2Spec", "let", "dep"),
        Ok(Some("Dep2".to_string()))
    );
}
