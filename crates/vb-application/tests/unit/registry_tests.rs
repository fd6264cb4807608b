//! Registry resolution tests
//!
//! vb-providers is linked as a dev-dependency, so its linkme registrations
//! are present in this binary.

use vb_application::ports::registry::{
    BridgeLedgerSettings, CacheProviderSettings, EmbeddingProviderConfig, VectorStoreSettings,
    list_cache_providers, list_embedding_providers, resolve_bridge_ledger, resolve_cache_provider,
    resolve_embedding_provider, resolve_vector_store_provider,
};

#[test]
fn embedding_registry_resolves_by_name() {
    let names: Vec<&str> = list_embedding_providers().iter().map(|(n, _)| *n).collect();
    for expected in ["openai", "gemini", "ollama", "null"] {
        assert!(names.contains(&expected), "missing provider '{expected}'");
    }

    let provider = resolve_embedding_provider(&EmbeddingProviderConfig::new("null")).unwrap();
    assert_eq!(provider.provider_name(), "null");
    assert!(provider.dimensions() > 0);
}

#[test]
fn unknown_names_fail_fast_with_the_available_pool() {
    let err = resolve_embedding_provider(&EmbeddingProviderConfig::new("nope"))
        .err()
        .expect("must not resolve");
    assert!(err.is_fatal());
    assert!(err.to_string().contains("ollama"));
}

#[test]
fn hosted_providers_require_credentials() {
    assert!(resolve_embedding_provider(&EmbeddingProviderConfig::new("openai")).is_err());
    assert!(
        resolve_embedding_provider(
            &EmbeddingProviderConfig::new("openai").with_api_key("sk-test")
        )
        .is_ok()
    );
}

#[test]
fn cache_store_and_ledger_registries_resolve() {
    let names: Vec<&str> = list_cache_providers().iter().map(|(n, _)| *n).collect();
    assert!(names.contains(&"moka"));

    let cache = resolve_cache_provider(&CacheProviderSettings::new("moka")).unwrap();
    assert_eq!(cache.provider_name(), "moka");

    let store = resolve_vector_store_provider(&VectorStoreSettings::new("memory")).unwrap();
    assert_eq!(store.provider_name(), "memory");

    let ledger = resolve_bridge_ledger(&BridgeLedgerSettings::new("memory")).unwrap();
    assert_eq!(ledger.provider_name(), "memory");
}
