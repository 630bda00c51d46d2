//! Integration tests for environmental context matching.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use authz_context::{
    Attribute, BasicEnvironmentalContext, EnvironmentCondition, EnvironmentConfig,
    EnvironmentNamespace, EnvironmentalContext, project_environment,
};

fn single(namespace: &EnvironmentNamespace, key: &str, value: &str) -> HashSet<Attribute> {
    HashSet::from([namespace.attribute(key, value).unwrap()])
}

#[test]
fn static_context_matches_its_own_value() {
    let ns = EnvironmentNamespace::default();
    let cases = [
        ("sourceip", "10.0.0.1"),
        ("project", "ops"),
        ("env", "prod.*"),
        ("node.tags", "[unterminated"),
        ("empty", ""),
    ];

    for (key, value) in cases {
        let context = BasicEnvironmentalContext::for_static(&ns, key, value).unwrap();
        assert!(context.matches(&single(&ns, key, value)), "{context}");
        assert!(
            !context.matches(&single(&ns, key, &format!("{value}-other"))),
            "{context}"
        );
    }
}

#[test]
fn aliased_keys_rejected_by_both_factories() {
    let ns = EnvironmentNamespace::default();

    for key in ["a/../project", "Project Name"] {
        assert!(BasicEnvironmentalContext::for_static(&ns, key, "ops").is_err());
        assert!(BasicEnvironmentalContext::for_pattern(&ns, key, "ops").is_err());
    }

    let condition = EnvironmentCondition::literal("a/../project", "ops");
    let err = condition.to_context(&ns).unwrap_err();
    assert!(err.is_definition_error());
}

#[test]
fn invalid_pattern_behaves_like_static() {
    let ns = EnvironmentNamespace::default();
    let pattern = BasicEnvironmentalContext::for_pattern(&ns, "env", "[unterminated").unwrap();
    let fixed = BasicEnvironmentalContext::for_static(&ns, "env", "[unterminated").unwrap();

    for candidate in ["[unterminated", "unterminated", "[", ""] {
        let environment = single(&ns, "env", candidate);
        assert_eq!(
            pattern.matches(&environment),
            fixed.matches(&environment),
            "candidate {candidate:?}"
        );
    }
    assert_eq!(pattern, fixed);
}

#[test]
fn policy_conditions_evaluated_polymorphically() {
    let config = EnvironmentConfig::from_toml_str(r#"namespace = "https://authz.example.org/env/""#)
        .unwrap();
    let ns = config.namespace().unwrap();

    let conditions: Vec<EnvironmentCondition> = serde_json::from_str(
        r#"[
            {"key": "project", "value": "ops-.*"},
            {"key": "project", "value": "ops-.*", "regex": false},
            {"key": "sourceip", "value": "10\\.0\\..*"}
        ]"#,
    )
    .unwrap();

    let contexts: Vec<Box<dyn EnvironmentalContext>> = conditions
        .iter()
        .map(|c| Box::new(c.to_context(&ns).unwrap()) as Box<dyn EnvironmentalContext>)
        .collect();

    assert!(contexts.iter().all(|c| c.is_valid()));

    let environment = project_environment(&ns, "ops-east").unwrap();
    let results: Vec<bool> = contexts.iter().map(|c| c.matches(&environment)).collect();
    assert_eq!(results, vec![true, false, false]);

    let environment = single(&ns, "sourceip", "10.0.4.2");
    let results: Vec<bool> = contexts.iter().map(|c| c.matches(&environment)).collect();
    assert_eq!(results, vec![false, false, true]);
}

#[test]
fn identical_conditions_deduplicate() {
    let ns = EnvironmentNamespace::default();
    let conditions = [
        EnvironmentCondition::pattern("project", "ops"),
        EnvironmentCondition::literal("project", "ops"),
        EnvironmentCondition::pattern("project", "dev"),
    ];

    let unique: HashSet<BasicEnvironmentalContext> = conditions
        .iter()
        .map(|c| c.to_context(&ns).unwrap())
        .collect();
    assert_eq!(unique.len(), 2);
}

#[test]
fn context_shared_across_threads() {
    let ns = EnvironmentNamespace::default();
    let context = Arc::new(BasicEnvironmentalContext::for_pattern(&ns, "env", "prod.*").unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let context = Arc::clone(&context);
            let ns = ns.clone();
            thread::spawn(move || {
                let value = if i % 2 == 0 { "production" } else { "staging" };
                context.matches(&single(&ns, "env", value))
            })
        })
        .collect();

    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for (i, matched) in results.into_iter().enumerate() {
        assert_eq!(matched, i % 2 == 0);
    }
}
