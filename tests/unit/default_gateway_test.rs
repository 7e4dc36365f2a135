// Single-default-per-scope invariant tests
//
// Exercises the registry against the in-memory store: after any finite
// sequence of upsert/set_default calls, each scope holds zero or one
// default gateway, and a default gateway is always enabled.

use std::sync::Arc;

use proptest::prelude::*;
use payhub::gateways::{
    GatewayRegistry, GatewayScope, GatewayUpsert, InMemoryGatewayRepository,
};

fn registry() -> GatewayRegistry {
    GatewayRegistry::new(Arc::new(InMemoryGatewayRepository::new()))
}

fn upsert(
    name: &str,
    is_enabled: bool,
    is_default: bool,
    organization_id: Option<&str>,
) -> GatewayUpsert {
    GatewayUpsert {
        id: None,
        name: name.to_string(),
        is_enabled,
        config: "{}".to_string(),
        is_default,
        organization_id: organization_id.map(str::to_string),
    }
}

#[tokio::test]
async fn test_second_default_displaces_first_in_same_scope() {
    let registry = registry();
    let org = GatewayScope::Organization("org-1".to_string());

    let a = registry
        .upsert(upsert("Gateway A", true, true, Some("org-1")))
        .await
        .unwrap();
    let b = registry
        .upsert(upsert("Gateway B", true, true, Some("org-1")))
        .await
        .unwrap();
    let c = registry
        .upsert(upsert("Gateway C", true, true, Some("org-2")))
        .await
        .unwrap();

    let org1 = registry.list(&org).await.unwrap();
    let a_now = org1.iter().find(|g| g.id == a.id).unwrap();
    let b_now = org1.iter().find(|g| g.id == b.id).unwrap();
    assert!(!a_now.is_default);
    assert!(b_now.is_default);

    // org-2 is an independent scope; its default is untouched.
    let org2 = registry
        .list(&GatewayScope::Organization("org-2".to_string()))
        .await
        .unwrap();
    assert!(org2.iter().find(|g| g.id == c.id).unwrap().is_default);
}

#[tokio::test]
async fn test_global_and_tenant_scopes_are_disjoint() {
    let registry = registry();

    registry
        .upsert(upsert("Global Gateway", true, true, None))
        .await
        .unwrap();
    registry
        .upsert(upsert("Tenant Gateway", true, true, Some("org-1")))
        .await
        .unwrap();

    let global = registry.list(&GatewayScope::Global).await.unwrap();
    let tenant = registry
        .list(&GatewayScope::Organization("org-1".to_string()))
        .await
        .unwrap();

    assert_eq!(global.len(), 1);
    assert_eq!(tenant.len(), 1);
    assert!(global[0].is_default);
    assert!(tenant[0].is_default);
}

#[tokio::test]
async fn test_set_default_forces_enabled() {
    let registry = registry();

    let gateway = registry
        .upsert(upsert("Dormant Gateway", false, false, None))
        .await
        .unwrap();
    assert!(!gateway.is_enabled);

    registry
        .set_default(&gateway.id, &GatewayScope::Global)
        .await
        .unwrap();

    let reloaded = registry.find(&gateway.id).await.unwrap().unwrap();
    assert!(reloaded.is_default);
    assert!(reloaded.is_enabled);
}

#[tokio::test]
async fn test_upsert_with_default_forces_enabled() {
    let registry = registry();

    let gateway = registry
        .upsert(upsert("Gateway", false, true, None))
        .await
        .unwrap();

    assert!(gateway.is_default);
    assert!(gateway.is_enabled);
}

#[tokio::test]
async fn test_deleting_the_default_leaves_zero_defaults() {
    let registry = registry();

    let a = registry
        .upsert(upsert("Gateway A", true, true, None))
        .await
        .unwrap();
    registry
        .upsert(upsert("Gateway B", true, false, None))
        .await
        .unwrap();

    registry.delete(&a.id).await.unwrap();

    let remaining = registry.list(&GatewayScope::Global).await.unwrap();
    assert_eq!(remaining.len(), 1);
    // Not auto-reassigned.
    assert!(remaining.iter().all(|g| !g.is_default));
}

#[tokio::test]
async fn test_set_default_rejects_gateway_outside_scope() {
    let registry = registry();

    let gateway = registry
        .upsert(upsert("Gateway", true, false, Some("org-1")))
        .await
        .unwrap();

    let err = registry
        .set_default(&gateway.id, &GatewayScope::Global)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Not found"));
}

#[tokio::test]
async fn test_config_round_trips_as_structured_data() {
    let registry = registry();

    let config = r#"{"apiEndpoint":"https://example.com","nested":{"retries":3,"flags":[true,false]},"note":"déjà vu"}"#;
    let gateway = registry
        .upsert(GatewayUpsert {
            id: None,
            name: "Custom Gateway".to_string(),
            is_enabled: true,
            config: config.to_string(),
            is_default: false,
            organization_id: None,
        })
        .await
        .unwrap();

    let reloaded = registry.find(&gateway.id).await.unwrap().unwrap();
    let expected: serde_json::Value = serde_json::from_str(config).unwrap();
    assert_eq!(reloaded.config, expected);
}

#[tokio::test]
async fn test_upsert_rejects_malformed_config() {
    let registry = registry();

    let err = registry
        .upsert(GatewayUpsert {
            id: None,
            name: "Broken".to_string(),
            is_enabled: true,
            config: "{not json".to_string(),
            is_default: false,
            organization_id: None,
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
}

#[tokio::test]
async fn test_upsert_validates_known_provider_config_eagerly() {
    let registry = registry();

    // Name resolves to Billplz, so the typed config is checked at save time.
    let err = registry
        .upsert(GatewayUpsert {
            id: None,
            name: "Billplz".to_string(),
            is_enabled: true,
            config: r#"{"apiKey":"bp-key"}"#.to_string(),
            is_default: false,
            organization_id: None,
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("collectionId"));
}

// Operations applied in random order against three scopes. The invariant
// must hold at the end of every sequence.
#[derive(Debug, Clone)]
enum Op {
    Insert {
        scope: usize,
        is_enabled: bool,
        is_default: bool,
    },
    SetDefault {
        target_scope: usize,
        pick: usize,
    },
    Delete {
        pick: usize,
    },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..3, any::<bool>(), any::<bool>()).prop_map(|(scope, is_enabled, is_default)| {
            Op::Insert {
                scope,
                is_enabled,
                is_default,
            }
        }),
        (0usize..3, 0usize..16).prop_map(|(target_scope, pick)| Op::SetDefault {
            target_scope,
            pick
        }),
        (0usize..16).prop_map(|pick| Op::Delete { pick }),
    ]
}

fn scope_for(index: usize) -> GatewayScope {
    match index {
        0 => GatewayScope::Global,
        1 => GatewayScope::Organization("org-1".to_string()),
        _ => GatewayScope::Organization("org-2".to_string()),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_default_invariant_holds_for_any_sequence(ops in proptest::collection::vec(op_strategy(), 1..40)) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            let registry = registry();
            let mut created: Vec<String> = Vec::new();

            for op in ops {
                match op {
                    Op::Insert { scope, is_enabled, is_default } => {
                        let scope = scope_for(scope);
                        let gateway = registry
                            .upsert(GatewayUpsert {
                                id: None,
                                name: "Gateway".to_string(),
                                is_enabled,
                                config: "{}".to_string(),
                                is_default,
                                organization_id: scope.organization_id().map(str::to_string),
                            })
                            .await
                            .unwrap();
                        created.push(gateway.id);
                    }
                    Op::SetDefault { target_scope, pick } => {
                        if created.is_empty() {
                            continue;
                        }
                        let id = &created[pick % created.len()];
                        // May target the wrong scope; the store must refuse
                        // rather than corrupt the invariant.
                        let _ = registry.set_default(id, &scope_for(target_scope)).await;
                    }
                    Op::Delete { pick } => {
                        if created.is_empty() {
                            continue;
                        }
                        let id = created.remove(pick % created.len());
                        let _ = registry.delete(&id).await;
                    }
                }
            }

            for scope_index in 0..3 {
                let scope = scope_for(scope_index);
                let gateways = registry.list(&scope).await.unwrap();
                let defaults: Vec<_> = gateways.iter().filter(|g| g.is_default).collect();
                prop_assert!(
                    defaults.len() <= 1,
                    "scope {} has {} defaults",
                    scope,
                    defaults.len()
                );
                for default in defaults {
                    prop_assert!(default.is_enabled, "default gateway is disabled");
                }
            }
            Ok(())
        })?;
    }
}
