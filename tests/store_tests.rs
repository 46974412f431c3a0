//! Integration tests for the credential store.
//!
//! These construct the session context directly from a fixed key so the
//! tests stay fast; the Argon2 path is covered by the gate tests.

use std::fs;

use passvault::crypto::{MasterKey, Token};
use passvault::errors::PassVaultError;
use passvault::vault::{CredentialEntry, CredentialStore, Unlocked, VaultFile, VaultPaths};
use tempfile::TempDir;

const KEY: [u8; 32] = [7u8; 32];

/// Helper: fresh paths plus a session context over a fixed key.
fn setup() -> (TempDir, VaultPaths, Unlocked) {
    let dir = TempDir::new().expect("create temp dir");
    let paths = VaultPaths::new(dir.path().join("vault"));
    paths.ensure_data_dir().unwrap();
    let ctx = Unlocked::new(MasterKey::new(KEY));
    (dir, paths, ctx)
}

fn seal(value: &str) -> Token {
    Token::seal(&KEY, value.as_bytes()).unwrap()
}

/// An entry whose tokens no key can open.
fn garbage_entry() -> CredentialEntry {
    CredentialEntry {
        username: Token::from_string("bm90LWEtdG9rZW4".to_string()),
        password: Token::from_string("YWxzby1ub3QtYS10b2tlbg".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Add and get
// ---------------------------------------------------------------------------

#[test]
fn add_and_get_roundtrip() {
    let (_dir, paths, ctx) = setup();
    let store = CredentialStore::new(paths);

    store.add("example.com", "me", "pw1", &ctx).unwrap();

    let creds = store.get("example.com", &ctx).unwrap();
    assert_eq!(creds.len(), 1);
    assert_eq!(creds[0].username, "me");
    assert_eq!(creds[0].password, "pw1");
}

#[test]
fn get_unknown_site_is_not_found() {
    let (_dir, paths, ctx) = setup();
    let store = CredentialStore::new(paths);

    let result = store.get("nowhere.example", &ctx);
    assert!(matches!(result, Err(PassVaultError::NotFound(_))));
}

#[test]
fn add_rejects_empty_fields() {
    let (_dir, paths, ctx) = setup();
    let store = CredentialStore::new(paths);

    assert!(store.add("", "me", "pw", &ctx).is_err());
    assert!(store.add("site", "", "pw", &ctx).is_err());
    assert!(store.add("site", "me", "", &ctx).is_err());
}

#[test]
fn site_names_are_case_sensitive() {
    let (_dir, paths, ctx) = setup();
    let store = CredentialStore::new(paths);

    store.add("Example.com", "a", "1", &ctx).unwrap();
    assert!(matches!(
        store.get("example.com", &ctx),
        Err(PassVaultError::NotFound(_))
    ));
}

// ---------------------------------------------------------------------------
// Legacy-format normalization
// ---------------------------------------------------------------------------

#[test]
fn legacy_single_entry_behaves_like_one_element_list() {
    let (_dir, paths, ctx) = setup();

    // Legacy shape: a single object directly under the site.
    let legacy = serde_json::json!({
        "example.com": { "username": seal("me").as_str(), "password": seal("pw1").as_str() }
    });
    fs::write(paths.passwords(), legacy.to_string()).unwrap();
    let from_legacy = CredentialStore::new(paths.clone())
        .get("example.com", &ctx)
        .unwrap();

    // Current shape: a one-element list.
    let current = serde_json::json!({
        "example.com": [ { "username": seal("me").as_str(), "password": seal("pw1").as_str() } ]
    });
    fs::write(paths.passwords(), current.to_string()).unwrap();
    let from_current = CredentialStore::new(paths).get("example.com", &ctx).unwrap();

    assert_eq!(from_legacy, from_current);
    assert_eq!(from_legacy[0].username, "me");
}

#[test]
fn legacy_user_field_name_is_accepted() {
    let (_dir, paths, ctx) = setup();

    let legacy = serde_json::json!({
        "example.com": { "user": seal("me").as_str(), "password": seal("pw1").as_str() }
    });
    fs::write(paths.passwords(), legacy.to_string()).unwrap();

    let creds = CredentialStore::new(paths).get("example.com", &ctx).unwrap();
    assert_eq!(creds[0].username, "me");
}

#[test]
fn legacy_shape_is_rewritten_as_list_on_next_mutation() {
    let (_dir, paths, ctx) = setup();

    let legacy = serde_json::json!({
        "example.com": { "username": seal("me").as_str(), "password": seal("pw1").as_str() }
    });
    fs::write(paths.passwords(), legacy.to_string()).unwrap();

    let store = CredentialStore::new(paths.clone());
    store.add("example.com", "other", "pw2", &ctx).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(paths.passwords()).unwrap()).unwrap();
    assert!(raw["example.com"].is_array());
    assert_eq!(raw["example.com"].as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Multi-entry sites
// ---------------------------------------------------------------------------

#[test]
fn two_usernames_on_one_site_are_independent() {
    let (_dir, paths, ctx) = setup();
    let store = CredentialStore::new(paths);

    store.add("example.com", "alice", "a-pw", &ctx).unwrap();
    store.add("example.com", "bob", "b-pw", &ctx).unwrap();

    // Insertion order is preserved.
    let creds = store.get("example.com", &ctx).unwrap();
    assert_eq!(creds.len(), 2);
    assert_eq!(creds[0].username, "alice");
    assert_eq!(creds[1].username, "bob");

    // Deleting one leaves the other intact.
    assert!(store.delete("example.com", Some("alice"), &ctx).unwrap());
    let creds = store.get("example.com", &ctx).unwrap();
    assert_eq!(creds.len(), 1);
    assert_eq!(creds[0].username, "bob");
    assert_eq!(creds[0].password, "b-pw");
}

#[test]
fn find_by_username_matches_decrypted_names() {
    let (_dir, paths, ctx) = setup();
    let store = CredentialStore::new(paths);

    store.add("example.com", "alice", "pw", &ctx).unwrap();

    assert!(store.find_by_username("example.com", "alice", &ctx).unwrap());
    assert!(!store.find_by_username("example.com", "bob", &ctx).unwrap());
    assert!(!store.find_by_username("other.com", "alice", &ctx).unwrap());
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_without_username_removes_whole_site() {
    let (_dir, paths, ctx) = setup();
    let store = CredentialStore::new(paths);

    store.add("example.com", "alice", "1", &ctx).unwrap();
    store.add("example.com", "bob", "2", &ctx).unwrap();

    assert!(store.delete("example.com", None, &ctx).unwrap());
    assert!(matches!(
        store.get("example.com", &ctx),
        Err(PassVaultError::NotFound(_))
    ));
}

#[test]
fn deleting_last_entry_removes_the_site_record() {
    let (_dir, paths, ctx) = setup();
    let store = CredentialStore::new(paths);

    store.add("example.com", "me", "pw1", &ctx).unwrap();
    assert!(store.delete("example.com", Some("me"), &ctx).unwrap());

    assert!(store.list_site_names().unwrap().is_empty());
    assert!(matches!(
        store.get("example.com", &ctx),
        Err(PassVaultError::NotFound(_))
    ));
}

#[test]
fn delete_returns_false_when_nothing_matches() {
    let (_dir, paths, ctx) = setup();
    let store = CredentialStore::new(paths);

    assert!(!store.delete("nowhere.example", None, &ctx).unwrap());

    store.add("example.com", "alice", "pw", &ctx).unwrap();
    assert!(!store.delete("example.com", Some("bob"), &ctx).unwrap());
    assert_eq!(store.get("example.com", &ctx).unwrap().len(), 1);
}

#[test]
fn delete_keeps_entries_that_fail_to_decrypt() {
    let (_dir, paths, ctx) = setup();

    let mut vault = VaultFile::default();
    vault.push_entry("example.com", garbage_entry());
    vault.save(&paths.passwords()).unwrap();

    let store = CredentialStore::new(paths);
    store.add("example.com", "alice", "pw", &ctx).unwrap();

    // Deleting alice must not touch the undecryptable entry.
    assert!(store.delete("example.com", Some("alice"), &ctx).unwrap());
    assert_eq!(store.list_site_names().unwrap(), vec!["example.com"]);

    // And a delete that matches nothing readable deletes nothing.
    assert!(!store.delete("example.com", Some("alice"), &ctx).unwrap());
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[test]
fn get_fails_whole_call_when_any_entry_is_bad() {
    let (_dir, paths, ctx) = setup();

    let mut vault = VaultFile::default();
    vault.push_entry(
        "example.com",
        CredentialEntry {
            username: seal("alice"),
            password: seal("pw"),
        },
    );
    vault.push_entry("example.com", garbage_entry());
    vault.save(&paths.passwords()).unwrap();

    assert!(matches!(
        CredentialStore::new(paths).get("example.com", &ctx),
        Err(PassVaultError::DecryptionFailed(_))
    ));
}

#[test]
fn list_all_isolates_per_entry_failures() {
    let (_dir, paths, ctx) = setup();

    let mut vault = VaultFile::default();
    vault.push_entry(
        "example.com",
        CredentialEntry {
            username: seal("alice"),
            password: seal("pw"),
        },
    );
    vault.push_entry("example.com", garbage_entry());
    vault.save(&paths.passwords()).unwrap();

    let all = CredentialStore::new(paths).list_all(&ctx).unwrap();
    let entries = &all["example.com"];
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].as_ref().unwrap().username, "alice");
    assert!(entries[1].is_none());
}

#[test]
fn list_site_names_needs_no_decryption() {
    let (_dir, paths, ctx) = setup();
    let store = CredentialStore::new(paths.clone());

    store.add("b.com", "x", "1", &ctx).unwrap();
    store.add("a.com", "y", "2", &ctx).unwrap();

    // A second store handle with no session context at all.
    let names = CredentialStore::new(paths).list_site_names().unwrap();
    assert_eq!(names, vec!["a.com", "b.com"]);
}

#[test]
fn display_names_disambiguate_multi_entry_sites() {
    let (_dir, paths, ctx) = setup();
    let store = CredentialStore::new(paths);

    store.add("single.com", "me", "1", &ctx).unwrap();
    store.add("multi.com", "alice", "2", &ctx).unwrap();
    store.add("multi.com", "bob", "3", &ctx).unwrap();

    let items = store.site_display_names(&ctx).unwrap();
    assert_eq!(items.len(), 3);

    let multi: Vec<_> = items.iter().filter(|i| i.site == "multi.com").collect();
    assert_eq!(multi[0].label, "multi.com | alice");
    assert_eq!(multi[1].label, "multi.com | bob");

    let single = items.iter().find(|i| i.site == "single.com").unwrap();
    assert_eq!(single.label, "single.com");
    assert_eq!(single.username, None);
}

// ---------------------------------------------------------------------------
// Corruption handling
// ---------------------------------------------------------------------------

#[test]
fn corrupted_store_is_backed_up_and_reset() {
    let (_dir, paths, ctx) = setup();
    fs::write(paths.passwords(), "{ this is not json").unwrap();

    let store = CredentialStore::new(paths.clone());
    assert!(store.list_site_names().unwrap().is_empty());

    // The broken bytes were moved aside, not destroyed.
    let backup = fs::read_to_string(paths.passwords_backup()).unwrap();
    assert_eq!(backup, "{ this is not json");

    // The store works normally afterwards.
    store.add("example.com", "me", "pw", &ctx).unwrap();
    assert_eq!(store.get("example.com", &ctx).unwrap().len(), 1);
}
