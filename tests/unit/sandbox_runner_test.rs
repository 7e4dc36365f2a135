// Sandbox runner orchestration tests
//
// Every path here fails before the adapter would reach the network, so the
// runner can be exercised against the in-memory store with no HTTP at all.

use std::sync::Arc;

use rust_decimal_macros::dec;
use serde_json::json;

use payhub::core::AppError;
use payhub::gateways::{
    AdapterResolver, GatewayScope, GatewayStore, GatewayWrite, InMemoryGatewayRepository,
    SandboxPaymentRunner, SandboxSettings,
};

fn runner_with_store() -> (SandboxPaymentRunner, Arc<InMemoryGatewayRepository>) {
    let store = Arc::new(InMemoryGatewayRepository::new());
    let runner = SandboxPaymentRunner::new(
        store.clone(),
        AdapterResolver::new(SandboxSettings::default()),
    );
    (runner, store)
}

fn write(
    name: &str,
    is_enabled: bool,
    config: serde_json::Value,
    organization_id: Option<&str>,
) -> GatewayWrite {
    GatewayWrite {
        id: None,
        name: name.to_string(),
        is_enabled,
        config,
        is_default: false,
        organization_id: organization_id.map(str::to_string),
    }
}

#[tokio::test]
async fn test_unknown_gateway_id_is_not_found() {
    let (runner, _) = runner_with_store();

    let err = runner
        .run("no-such-id", &GatewayScope::Global, dec!(1.00), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_disabled_gateway_is_never_dispatched() {
    let (runner, store) = runner_with_store();

    // The name would resolve to Stripe, but disabled gateways are treated
    // as absent.
    let gateway = store
        .upsert(write(
            "Stripe",
            false,
            json!({"secretKey": "sk_test_abc"}),
            None,
        ))
        .await
        .unwrap();

    let err = runner
        .run(&gateway.id, &GatewayScope::Global, dec!(1.00), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(err.to_string().contains("disabled"));
}

#[tokio::test]
async fn test_gateway_from_another_scope_is_not_found() {
    let (runner, store) = runner_with_store();

    let gateway = store
        .upsert(write(
            "Stripe",
            true,
            json!({"secretKey": "sk_test_abc"}),
            Some("org-1"),
        ))
        .await
        .unwrap();

    let err = runner
        .run(
            &gateway.id,
            &GatewayScope::Organization("org-2".to_string()),
            dec!(1.00),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = runner
        .run(&gateway.id, &GatewayScope::Global, dec!(1.00), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_unrecognized_provider_name_is_unsupported() {
    let (runner, store) = runner_with_store();

    let gateway = store
        .upsert(write("Bank Transfer", true, json!({}), None))
        .await
        .unwrap();

    let err = runner
        .run(&gateway.id, &GatewayScope::Global, dec!(1.00), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UnsupportedProvider(_)));
    assert!(err.to_string().contains("Bank Transfer"));
}

#[tokio::test]
async fn test_non_object_config_is_a_configuration_error() {
    let (runner, store) = runner_with_store();

    // Written through the store directly; the registry would refuse this.
    let gateway = store
        .upsert(write("Stripe", true, json!("not an object"), None))
        .await
        .unwrap();

    let err = runner
        .run(&gateway.id, &GatewayScope::Global, dec!(1.00), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Configuration(_)));
}

#[tokio::test]
async fn test_missing_credentials_normalize_to_failed_result() {
    let (runner, store) = runner_with_store();

    // Recognized provider, valid object config, but no apiKey: the adapter
    // rejects it during its own validation, before any wire call, and the
    // runner surfaces a failed result rather than an error.
    let gateway = store
        .upsert(write(
            "Billplz",
            true,
            json!({"collectionId": "col-1"}),
            None,
        ))
        .await
        .unwrap();

    let result = runner
        .run(&gateway.id, &GatewayScope::Global, dec!(1.00), None)
        .await
        .unwrap();
    assert!(!result.success);
    assert!(result.payment_url.is_none());
    assert!(result.error.unwrap().contains("apiKey"));
}

#[tokio::test]
async fn test_secret_override_feeds_adapter_validation() {
    let (runner, store) = runner_with_store();

    // Stored config is missing the secret; the per-call override supplies
    // it, so validation moves past the missing-key failure. (The negative
    // amount then stops the adapter before any wire call.)
    let gateway = store
        .upsert(write(
            "Billplz",
            true,
            json!({"collectionId": "col-1"}),
            None,
        ))
        .await
        .unwrap();

    let result = runner
        .run(
            &gateway.id,
            &GatewayScope::Global,
            dec!(-1.00),
            Some("bp-override-key".to_string()),
        )
        .await
        .unwrap();
    assert!(!result.success);
    let message = result.error.unwrap();
    assert!(!message.contains("apiKey"), "override was not applied: {}", message);
    assert!(message.contains("negative"));
}

#[tokio::test]
async fn test_override_is_not_persisted() {
    let (runner, store) = runner_with_store();

    let gateway = store
        .upsert(write(
            "Billplz",
            true,
            json!({"collectionId": "col-1"}),
            None,
        ))
        .await
        .unwrap();

    let _ = runner
        .run(
            &gateway.id,
            &GatewayScope::Global,
            dec!(-1.00),
            Some("bp-override-key".to_string()),
        )
        .await
        .unwrap();

    let stored = store.find_by_id(&gateway.id).await.unwrap().unwrap();
    assert_eq!(stored.config, json!({"collectionId": "col-1"}));
}
