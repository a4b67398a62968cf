//! Vault manager: owner scoping, encryption at rest and persistence.

mod common;

use std::sync::Arc;

use credvault::app::App;
use credvault::crypto::CipherKey;
use credvault::errors::CredVaultError;
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn add_then_list_returns_plaintext() {
    let dir = TempDir::new().unwrap();
    let app = common::app(&dir);
    let alice = common::register(&app, "alice", "pw1");

    let entry = app.vault.add(&alice, "example.com", "a@x", "s3cret").unwrap();
    assert_ne!(entry.encrypted_secret, "s3cret");

    let listed = app.vault.list(&alice).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, entry.id);
    assert_eq!(listed[0].site, "example.com");
    assert_eq!(listed[0].username, "a@x");
    assert_eq!(listed[0].secret, "s3cret");
    assert!(listed[0].updated_at.is_none());
}

#[test]
fn secret_never_stored_in_clear() {
    let dir = TempDir::new().unwrap();
    let app = common::app(&dir);
    let alice = common::register(&app, "alice", "pw1");
    app.vault.add(&alice, "example.com", "a@x", "very-plain-secret").unwrap();

    let raw = std::fs::read_to_string(common::settings(&dir).entries_path()).unwrap();
    assert!(!raw.contains("very-plain-secret"));
    assert!(raw.contains("\"encryptedSecret\""));
    assert!(raw.contains("\"ownerUserId\""));
}

#[test]
fn same_secret_twice_gives_different_ciphertexts() {
    let dir = TempDir::new().unwrap();
    let app = common::app(&dir);
    let alice = common::register(&app, "alice", "pw1");

    let a = app.vault.add(&alice, "one.com", "u", "same").unwrap();
    let b = app.vault.add(&alice, "two.com", "u", "same").unwrap();
    assert_ne!(a.encrypted_secret, b.encrypted_secret);
    assert_ne!(a.id, b.id);
}

#[test]
fn users_only_see_their_own_entries() {
    let dir = TempDir::new().unwrap();
    let app = common::app(&dir);
    let alice = common::register(&app, "alice", "pw1");
    let bob = common::register(&app, "bob", "pw2");

    let entry = app.vault.add(&alice, "example.com", "a@x", "s3cret").unwrap();

    assert!(app.vault.list(&bob).unwrap().is_empty());
    assert!(matches!(
        app.vault.get(&bob, &entry.id),
        Err(CredVaultError::NotFound)
    ));
    assert_eq!(app.vault.get(&alice, &entry.id).unwrap().secret, "s3cret");
}

#[test]
fn foreign_update_and_delete_change_nothing() {
    let dir = TempDir::new().unwrap();
    let app = common::app(&dir);
    let alice = common::register(&app, "alice", "pw1");
    let bob = common::register(&app, "bob", "pw2");
    let entry = app.vault.add(&alice, "example.com", "a@x", "s3cret").unwrap();

    let before = std::fs::read(common::settings(&dir).entries_path()).unwrap();

    assert!(!app
        .vault
        .update(&bob, &entry.id, "evil.com", "b", "stolen")
        .unwrap());
    assert!(!app.vault.delete(&bob, &entry.id).unwrap());

    let after = std::fs::read(common::settings(&dir).entries_path()).unwrap();
    assert_eq!(before, after);
    assert_eq!(app.vault.list(&alice).unwrap()[0].secret, "s3cret");
}

#[test]
fn update_replaces_fields_and_stamps_time() {
    let dir = TempDir::new().unwrap();
    let app = common::app(&dir);
    let alice = common::register(&app, "alice", "pw1");
    let entry = app.vault.add(&alice, "example.com", "a@x", "old").unwrap();

    assert!(app
        .vault
        .update(&alice, &entry.id, "example.org", "a@y", "new")
        .unwrap());

    let got = app.vault.get(&alice, &entry.id).unwrap();
    assert_eq!(got.site, "example.org");
    assert_eq!(got.username, "a@y");
    assert_eq!(got.secret, "new");
    assert_eq!(got.created_at, entry.created_at);
    assert!(got.updated_at.is_some());
}

#[test]
fn delete_removes_only_the_target() {
    let dir = TempDir::new().unwrap();
    let app = common::app(&dir);
    let alice = common::register(&app, "alice", "pw1");
    let first = app.vault.add(&alice, "one.com", "u", "1").unwrap();
    let second = app.vault.add(&alice, "two.com", "u", "2").unwrap();

    assert!(app.vault.delete(&alice, &first.id).unwrap());
    assert!(!app.vault.delete(&alice, &first.id).unwrap());

    let left = app.vault.list(&alice).unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, second.id);
}

#[test]
fn empty_fields_are_rejected() {
    let dir = TempDir::new().unwrap();
    let app = common::app(&dir);
    let alice = common::register(&app, "alice", "pw1");

    for (site, user, secret) in [("", "u", "s"), ("x.com", "", "s"), ("x.com", "u", "")] {
        assert!(matches!(
            app.vault.add(&alice, site, user, secret),
            Err(CredVaultError::Validation(_))
        ));
    }
    assert!(app.vault.list(&alice).unwrap().is_empty());
}

#[test]
fn list_fails_when_an_entry_cannot_be_decrypted() {
    let dir = TempDir::new().unwrap();
    let app = common::app(&dir);
    let alice = common::register(&app, "alice", "pw1");
    app.vault.add(&alice, "one.com", "u", "1").unwrap();
    app.vault.add(&alice, "two.com", "u", "2").unwrap();

    let path = common::settings(&dir).entries_path();
    let mut doc: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    doc[1]["encryptedSecret"] = Value::String("bm90LWEtcmVhbC1jaXBoZXJ0ZXh0".into());
    std::fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();

    assert!(matches!(
        app.vault.list(&alice),
        Err(CredVaultError::DecryptionFailed)
    ));
}

#[test]
fn legacy_field_names_are_still_read() {
    let dir = TempDir::new().unwrap();
    let app = common::app(&dir);
    let alice = common::register(&app, "alice", "pw1");
    app.vault.add(&alice, "example.com", "a@x", "s3cret").unwrap();

    // Rewrite the file with the older `userId` / `password` names.
    let path = common::settings(&dir).entries_path();
    let raw = std::fs::read_to_string(&path)
        .unwrap()
        .replace("\"ownerUserId\"", "\"userId\"")
        .replace("\"encryptedSecret\"", "\"password\"");
    std::fs::write(&path, raw).unwrap();

    assert_eq!(app.vault.list(&alice).unwrap()[0].secret, "s3cret");
}

#[test]
fn concurrent_adds_are_all_kept() {
    let dir = TempDir::new().unwrap();
    let app = common::app(&dir);
    let alice = common::register(&app, "alice", "pw1");

    std::thread::scope(|s| {
        for i in 0..10 {
            let (app, alice) = (&app, &alice);
            s.spawn(move || {
                app.vault
                    .add(alice, &format!("site{i}.com"), "u", &format!("s{i}"))
                    .unwrap()
            });
        }
    });

    let entries = app.vault.list(&alice).unwrap();
    assert_eq!(entries.len(), 10);

    let mut ids: Vec<_> = entries.iter().map(|e| e.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 10);
}

#[test]
fn separate_apps_on_one_data_dir_lose_no_adds() {
    let dir = TempDir::new().unwrap();
    let alice = common::register(&common::app(&dir), "alice", "pw1");

    std::thread::scope(|s| {
        for t in 0..2 {
            let (dir, alice) = (&dir, &alice);
            s.spawn(move || {
                // Each thread opens its own App, as two CLI processes would.
                let app = common::app(dir);
                for i in 0..50 {
                    app.vault
                        .add(alice, &format!("site{t}-{i}.com"), "u", "s")
                        .unwrap();
                }
            });
        }
    });

    let entries = common::app(&dir).vault.list(&alice).unwrap();
    assert_eq!(entries.len(), 100);
}

#[test]
fn deleted_ids_are_not_handed_out_again() {
    let dir = TempDir::new().unwrap();
    let app = common::app(&dir);
    let alice = common::register(&app, "alice", "pw1");

    let first = app.vault.add(&alice, "one.com", "u", "1").unwrap();
    let second = app.vault.add(&alice, "two.com", "u", "2").unwrap();
    assert!(app.vault.delete(&alice, &second.id).unwrap());

    let third = common::app(&dir).vault.add(&alice, "three.com", "u", "3").unwrap();
    assert_ne!(third.id, first.id);
    assert_ne!(third.id, second.id);
}

#[test]
fn listing_under_a_different_key_fails() {
    let dir = TempDir::new().unwrap();
    let app = common::app(&dir);
    let alice = common::register(&app, "alice", "pw1");
    app.vault.add(&alice, "example.com", "a@x", "placeholder").unwrap();

    // "s3cret" under the 0x42 test key with IV 00..0f.  Under the 0x24 key
    // the last block decrypts to invalid padding.
    let path = common::settings(&dir).entries_path();
    let mut doc: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    doc[0]["encryptedSecret"] = Value::String("AAECAwQFBgcICQoLDA0OD3n7Pqv5UzIzlpreFNTHOMI=".into());
    std::fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();

    assert_eq!(app.vault.list(&alice).unwrap()[0].secret, "s3cret");

    let other = App::with_key(
        &common::settings(&dir),
        Arc::new(CipherKey::new([0x24; 32])),
    )
    .unwrap();
    assert!(matches!(
        other.vault.list(&alice),
        Err(CredVaultError::DecryptionFailed)
    ));
}

#[test]
fn key_file_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let settings = common::settings(&dir);

    let (alice, entry_id) = {
        let app = App::open(&settings).unwrap();
        let alice = common::register(&app, "alice", "pw1");
        let entry = app.vault.add(&alice, "example.com", "a@x", "s3cret").unwrap();
        (alice, entry.id)
    };
    assert!(settings.key_path().exists());

    let app = App::open(&settings).unwrap();
    assert_eq!(app.vault.get(&alice, &entry_id).unwrap().secret, "s3cret");
}

#[cfg(feature = "audit-log")]
#[test]
fn operations_are_recorded_in_audit_log() {
    let dir = TempDir::new().unwrap();
    let app = common::app(&dir);
    let alice = common::register(&app, "alice", "pw1");

    let entry = app.vault.add(&alice, "example.com", "a@x", "s3cret").unwrap();
    app.record("add", Some(&alice), Some(&entry.id), "ok");

    let audit = app.audit_log().unwrap();
    let rows = audit.query(10, Some(&alice)).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].entry_id.as_deref(), Some(entry.id.as_str()));
}
