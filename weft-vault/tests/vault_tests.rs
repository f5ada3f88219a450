use weft_types::{NetworkId, ProtocolId};
use weft_vault::{VaultError, VaultStore};

fn ids() -> (NetworkId, ProtocolId) {
    (NetworkId::new(), ProtocolId::new("lora-http"))
}

// ── Basic keyed access ───────────────────────────────────────────

#[test]
fn upsert_then_load() {
    let store = VaultStore::open_in_memory().unwrap();
    let (network, protocol) = ids();

    store.upsert(&network, &protocol, "session", "tok-1").unwrap();
    let value = store.load_value(&network, &protocol, "session").unwrap();
    assert_eq!(value, "tok-1");
}

#[test]
fn load_missing_is_not_found() {
    let store = VaultStore::open_in_memory().unwrap();
    let (network, protocol) = ids();

    let err = store.load_value(&network, &protocol, "nope").unwrap_err();
    assert!(matches!(err, VaultError::NotFound(_)));
}

#[test]
fn upsert_replaces() {
    let store = VaultStore::open_in_memory().unwrap();
    let (network, protocol) = ids();

    store.upsert(&network, &protocol, "session", "v1").unwrap();
    store.upsert(&network, &protocol, "session", "v2").unwrap();
    assert_eq!(store.load_value(&network, &protocol, "session").unwrap(), "v2");
}

#[test]
fn entries_are_scoped_per_network() {
    let store = VaultStore::open_in_memory().unwrap();
    let protocol = ProtocolId::new("lora-http");
    let n1 = NetworkId::new();
    let n2 = NetworkId::new();

    store.upsert(&n1, &protocol, "session", "one").unwrap();
    store.upsert(&n2, &protocol, "session", "two").unwrap();

    assert_eq!(store.load_value(&n1, &protocol, "session").unwrap(), "one");
    assert_eq!(store.load_value(&n2, &protocol, "session").unwrap(), "two");
}

#[test]
fn entries_are_scoped_per_protocol() {
    let store = VaultStore::open_in_memory().unwrap();
    let network = NetworkId::new();
    let p1 = ProtocolId::new("lora-http");
    let p2 = ProtocolId::new("mqtt-bridge");

    store.upsert(&network, &p1, "session", "one").unwrap();
    assert!(matches!(
        store.load_value(&network, &p2, "session").unwrap_err(),
        VaultError::NotFound(_)
    ));
}

// ── Prefix sweep ─────────────────────────────────────────────────

#[test]
fn clear_by_prefix_removes_matching() {
    let store = VaultStore::open_in_memory().unwrap();
    let (network, protocol) = ids();

    store.upsert(&network, &protocol, "cursor:app", "a").unwrap();
    store.upsert(&network, &protocol, "cursor:dev", "b").unwrap();
    store.upsert(&network, &protocol, "session", "c").unwrap();

    let removed = store.clear_by_prefix(&network, &protocol, "cursor:").unwrap();
    assert_eq!(removed, 2);

    assert!(store.load_value(&network, &protocol, "cursor:app").is_err());
    assert_eq!(store.load_value(&network, &protocol, "session").unwrap(), "c");
}

#[test]
fn clear_by_empty_prefix_removes_all_for_network() {
    let store = VaultStore::open_in_memory().unwrap();
    let protocol = ProtocolId::new("lora-http");
    let n1 = NetworkId::new();
    let n2 = NetworkId::new();

    store.upsert(&n1, &protocol, "a", "1").unwrap();
    store.upsert(&n1, &protocol, "b", "2").unwrap();
    store.upsert(&n2, &protocol, "a", "3").unwrap();

    let removed = store.clear_by_prefix(&n1, &protocol, "").unwrap();
    assert_eq!(removed, 2);
    assert!(store.identifiers(&n1, &protocol).unwrap().is_empty());
    assert_eq!(store.identifiers(&n2, &protocol).unwrap(), vec!["a"]);
}

#[test]
fn clear_by_prefix_escapes_like_wildcards() {
    let store = VaultStore::open_in_memory().unwrap();
    let (network, protocol) = ids();

    store.upsert(&network, &protocol, "a_b", "1").unwrap();
    store.upsert(&network, &protocol, "aXb", "2").unwrap();

    // '_' must match literally, not as a single-char wildcard.
    let removed = store.clear_by_prefix(&network, &protocol, "a_").unwrap();
    assert_eq!(removed, 1);
    assert_eq!(store.load_value(&network, &protocol, "aXb").unwrap(), "2");
}

#[test]
fn identifiers_are_sorted() {
    let store = VaultStore::open_in_memory().unwrap();
    let (network, protocol) = ids();

    store.upsert(&network, &protocol, "b", "2").unwrap();
    store.upsert(&network, &protocol, "a", "1").unwrap();

    assert_eq!(store.identifiers(&network, &protocol).unwrap(), vec!["a", "b"]);
}

// ── Persistence ──────────────────────────────────────────────────

#[test]
fn survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vault.db");
    let (network, protocol) = ids();

    {
        let store = VaultStore::open(&path).unwrap();
        store.upsert(&network, &protocol, "session", "tok").unwrap();
    }

    let store = VaultStore::open(&path).unwrap();
    assert_eq!(store.load_value(&network, &protocol, "session").unwrap(), "tok");
}
