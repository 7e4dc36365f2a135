// Provider dispatch tests
//
// Dispatch is a case-insensitive substring match on the gateway name in a
// fixed priority order. That makes resolution deterministic, including the
// documented quirk that any name containing a provider keyword resolves to
// that provider.

use payhub::gateways::{AdapterResolver, Provider, SandboxSettings};

#[test]
fn test_exact_names_resolve() {
    assert_eq!(Provider::detect("ToyyibPay"), Some(Provider::ToyyibPay));
    assert_eq!(Provider::detect("Stripe"), Some(Provider::Stripe));
    assert_eq!(Provider::detect("Billplz"), Some(Provider::Billplz));
    assert_eq!(Provider::detect("TNG Digital"), Some(Provider::TngDigital));
    assert_eq!(Provider::detect("Touch 'n Go eWallet"), Some(Provider::TngDigital));
}

#[test]
fn test_substring_match_is_the_documented_quirk() {
    // A cosmetic name containing a keyword dispatches to that provider.
    assert_eq!(Provider::detect("My Stripe Clone"), Some(Provider::Stripe));
    assert_eq!(
        Provider::detect("toyyibpay (production)"),
        Some(Provider::ToyyibPay)
    );
}

#[test]
fn test_match_is_case_insensitive() {
    assert_eq!(Provider::detect("STRIPE"), Some(Provider::Stripe));
    assert_eq!(Provider::detect("bIlLpLz"), Some(Provider::Billplz));
    assert_eq!(Provider::detect("tng"), Some(Provider::TngDigital));
}

#[test]
fn test_priority_order_when_names_collide() {
    assert_eq!(
        Provider::detect("toyyibpay-stripe-billplz-tng"),
        Some(Provider::ToyyibPay)
    );
    assert_eq!(Provider::detect("stripe-billplz-tng"), Some(Provider::Stripe));
    assert_eq!(Provider::detect("billplz-tng"), Some(Provider::Billplz));
}

#[test]
fn test_unknown_names_do_not_resolve() {
    assert_eq!(Provider::detect("Bank Transfer"), None);
    assert_eq!(Provider::detect(""), None);
    assert_eq!(Provider::detect("PayPal"), None);
}

#[test]
fn test_resolver_agrees_with_detection() {
    let resolver = AdapterResolver::new(SandboxSettings::default());

    for (name, provider) in [
        ("Stripe", Provider::Stripe),
        ("My Stripe Clone", Provider::Stripe),
        ("ToyyibPay MY", Provider::ToyyibPay),
        ("Billplz", Provider::Billplz),
        ("Touch 'n Go", Provider::TngDigital),
    ] {
        let adapter = resolver.resolve(name).unwrap();
        assert_eq!(adapter.provider(), provider, "name: {}", name);
    }

    assert!(resolver.resolve("Manual Payment").is_none());
}
