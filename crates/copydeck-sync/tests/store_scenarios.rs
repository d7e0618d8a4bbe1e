//! Store scenarios across mount, mutation and remote reconciliation.

use copydeck_core::{Anchor, DocumentKind, OverrideMap, PageEvent, PageIntent, TextCatalog};
use copydeck_sync::{
    DesignCommentStore, FileMirror, LocalMirror, MemoryRemote, RemoteDocuments, SyncPhase,
    TextOverrideStore,
};
use copydeck_test_utils::{comment_store, sample_catalog, session_with, text_store, ScriptedRemote};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn pick(store: &TextOverrideStore, id: &str, default: &str, text: &str) -> Option<copydeck_sync::Committed<copydeck_core::OverrideEntry>> {
    store.open_editor(id, store.get_text(id, default), Anchor::default());
    store.select(text)
}

#[tokio::test]
async fn selection_rotates_catalog_defaults() {
    let (store, _, remote) = text_store(sample_catalog());
    let committed = pick(&store, "cta_primary", "Contact", "Talk to us").unwrap();
    committed.push.finished().await;

    assert_eq!(store.get_text("cta_primary", "Contact"), "Talk to us");
    assert_eq!(
        store.get_alternatives("cta_primary"),
        vec!["Book a demo".to_string(), "Contact".to_string()]
    );
    assert_eq!(
        remote.document(DocumentKind::TextConfig),
        Some(json!({
            "cta_primary": {"current": "Talk to us", "alternatives": ["Book a demo", "Contact"]}
        }))
    );
}

#[tokio::test]
async fn push_payload_matches_snapshot() {
    let (store, _, remote) = text_store(TextCatalog::new());
    pick(&store, "a", "A", "A1").unwrap().push.finished().await;
    pick(&store, "b", "B", "B1").unwrap().push.finished().await;

    let pushed: OverrideMap = serde_json::from_value(remote.document(DocumentKind::TextConfig).unwrap()).unwrap();
    assert_eq!(pushed, store.overrides());
}

#[tokio::test]
async fn local_mirror_survives_remote_outage() {
    let dir = tempfile::tempdir().unwrap();
    let remote = Arc::new(MemoryRemote::new());
    remote.set_fail_push(true);

    {
        let mirror = Arc::new(FileMirror::open(dir.path()).unwrap());
        let store = TextOverrideStore::new(TextCatalog::new(), mirror, remote.clone());
        store.mount().await;
        let committed = pick(&store, "hero_title", "A", "B").unwrap();
        committed.push.finished().await;
        assert!(!store.is_syncing());
    }

    remote.set_fail_fetch(true);
    let mirror = Arc::new(FileMirror::open(dir.path()).unwrap());
    let store = TextOverrideStore::new(TextCatalog::new(), mirror, remote);
    store.mount().await;

    assert_eq!(store.phase(), SyncPhase::LocalLoaded);
    assert_eq!(store.get_text("hero_title", "A"), "B");
}

#[tokio::test]
async fn remote_copy_wins_on_mount() {
    let dir = tempfile::tempdir().unwrap();
    let mirror = Arc::new(FileMirror::open(dir.path()).unwrap());
    mirror
        .write(
            DocumentKind::Comments.mirror_key(),
            r#"[{"id":"local0001","text":"stale","x":1.0,"y":1.0,"author":"User","createdAt":1}]"#,
        )
        .unwrap();

    let remote = Arc::new(MemoryRemote::new().with_document(
        DocumentKind::Comments,
        json!([{"id": "remote001", "text": "fresh", "x": 10.0, "y": 20.0, "author": "User", "createdAt": 2}]),
    ));
    let store = DesignCommentStore::new(mirror.clone(), remote);
    store.mount().await;

    assert_eq!(store.phase(), SyncPhase::RemoteReconciled);
    let comments = store.comments();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments.as_slice()[0].text, "fresh");

    let raw = mirror.read(DocumentKind::Comments.mirror_key()).unwrap().unwrap();
    assert!(raw.contains("remote001"));
}

#[tokio::test]
async fn comment_lifecycle() {
    let (store, _, remote) = comment_store();
    assert!(store.add_comment("", 5.0, 5.0).is_none());

    let added = store.add_comment("note", 50.0, 50.0).unwrap();
    added.push.finished().await;
    assert_eq!(store.comments().len(), 1);

    let unknown = store.remove_comment("missing00");
    unknown.push.finished().await;
    assert_eq!(store.comments().len(), 1);

    store.remove_comment(&added.value.id).push.finished().await;
    assert!(store.comments().is_empty());
    assert_eq!(remote.pushes().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn slow_earlier_push_overwrites_later_one() {
    let remote = Arc::new(ScriptedRemote::new().with_push_delays([Duration::from_millis(500), Duration::ZERO]));
    let (session, _) = session_with(remote.clone());
    let store = session.texts();

    let first = pick(store, "hero_title", "A", "B").unwrap();
    let second = pick(store, "hero_title", "A", "C").unwrap();
    assert!(session.is_syncing());

    second.push.finished().await;
    first.push.finished().await;
    assert!(!session.is_syncing());

    assert_eq!(store.get_text("hero_title", "A"), "C");
    let landed = remote.landed();
    assert_eq!(landed.len(), 2);
    assert_eq!(landed[1].1["hero_title"]["current"], "B");
    assert_eq!(remote.document(DocumentKind::TextConfig).unwrap()["hero_title"]["current"], "B");
}

#[tokio::test]
async fn session_routes_events_to_stores() {
    let remote: Arc<dyn RemoteDocuments> = Arc::new(MemoryRemote::new());
    let (session, _) = session_with(remote);
    session.mount().await;

    let intent = session.dispatch(PageEvent::ContextMenu {
        fragment_id: "hero_title".into(),
        displayed_text: "Spatial computing".into(),
        anchor: Anchor::new(40.0, 80.0),
    });
    assert!(matches!(intent, PageIntent::OpenEditor { .. }));

    let committed = session.texts().select("AR that works on the floor").unwrap();
    committed.push.finished().await;
    assert_eq!(
        session.texts().get_alternatives("hero_title"),
        vec!["Spatial computing for industry".to_string(), "Spatial computing".to_string()]
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn store_never_duplicates_alternatives(picks in prop::collection::vec(("[ab]", "[wxyz]{1,2}"), 1..12)) {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        runtime.block_on(async {
            let (store, _, remote) = text_store(TextCatalog::new().with("a", ["w", "x"]));
            for (id, text) in &picks {
                if let Some(committed) = pick(&store, id, "d", text) {
                    committed.push.finished().await;
                }
            }

            for (id, entry) in store.overrides().iter() {
                let mut seen = std::collections::HashSet::new();
                prop_assert!(entry.alternatives.iter().all(|alt| seen.insert(alt.clone())), "duplicate in {id}");
                prop_assert!(!entry.alternatives.contains(&entry.current));
            }
            let pushed: OverrideMap = serde_json::from_value(
                remote.document(DocumentKind::TextConfig).unwrap_or_else(|| json!({})),
            ).unwrap();
            prop_assert_eq!(pushed, store.overrides());
            Ok(())
        })?;
    }
}
