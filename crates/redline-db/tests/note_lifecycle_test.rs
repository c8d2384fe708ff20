//! Integration tests for the note edit lifecycle.
//!
//! Run with a test database up:
//!   cargo test -p redline-db -- --ignored

use uuid::Uuid;

use redline_db::test_fixtures::TestDatabase;
use redline_db::{CheckedMatch, CreateNoteRequest, Error, UpdateNoteRequest};

async fn connect() -> TestDatabase {
    dotenvy::dotenv().ok();
    TestDatabase::new().await
}

fn create_req(title: &str, content: &str, tags: &[&str]) -> CreateNoteRequest {
    CreateNoteRequest {
        title: title.to_string(),
        content: Some(content.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn typo_match(offset: i32, length: i32, replacement: &str) -> CheckedMatch {
    CheckedMatch {
        message: "Possible spelling mistake found.".to_string(),
        short_message: Some("Spelling mistake".to_string()),
        offset,
        length,
        context: None,
        replacements: vec![replacement.to_string()],
        issue_type: Some("misspelling".to_string()),
        rule_id: Some("MORFOLOGIK_RULE_EN_US".to_string()),
        category: Some("Possible Typo".to_string()),
    }
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_create_does_not_snapshot() {
    let test_db = connect().await;
    let owner = Uuid::new_v4();

    let note = test_db
        .db
        .notes
        .create(owner, create_req("First", "body", &[]))
        .await
        .unwrap();

    let revisions = test_db.db.revisions.list(note.note.id, owner).await.unwrap();
    assert!(revisions.is_empty());

    test_db.cleanup_owner(owner).await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_update_snapshots_pre_edit_state() {
    let test_db = connect().await;
    let owner = Uuid::new_v4();

    let note = test_db
        .db
        .notes
        .create(owner, create_req("Shopping", "Teh milk", &[]))
        .await
        .unwrap();

    let updated = test_db
        .db
        .notes
        .update(
            note.note.id,
            owner,
            UpdateNoteRequest {
                title: None,
                content: Some("The milk".to_string()),
                tags: None,
            },
        )
        .await
        .unwrap();

    // Absent title kept its value; content changed.
    assert_eq!(updated.note.title, "Shopping");
    assert_eq!(updated.note.content.as_deref(), Some("The milk"));

    // The single revision holds the state from before the edit.
    let revisions = test_db.db.revisions.list(note.note.id, owner).await.unwrap();
    assert_eq!(revisions.len(), 1);
    assert_eq!(revisions[0].title, "Shopping");
    assert_eq!(revisions[0].content, "Teh milk");

    test_db.cleanup_owner(owner).await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_restore_round_trip() {
    let test_db = connect().await;
    let owner = Uuid::new_v4();

    let note = test_db
        .db
        .notes
        .create(owner, create_req("Original", "original body", &[]))
        .await
        .unwrap();
    let note_id = note.note.id;

    test_db
        .db
        .notes
        .update(
            note_id,
            owner,
            UpdateNoteRequest {
                title: Some("Edited".to_string()),
                content: Some("edited body".to_string()),
                tags: None,
            },
        )
        .await
        .unwrap();

    let revisions = test_db.db.revisions.list(note_id, owner).await.unwrap();
    assert_eq!(revisions.len(), 1);

    let restored = test_db
        .db
        .notes
        .restore(note_id, revisions[0].id, owner)
        .await
        .unwrap();

    // Back to the original state.
    assert_eq!(restored.note.title, "Original");
    assert_eq!(restored.note.content.as_deref(), Some("original body"));

    // The restore snapshotted the edited state, so nothing was lost.
    let revisions = test_db.db.revisions.list(note_id, owner).await.unwrap();
    assert_eq!(revisions.len(), 2);
    assert_eq!(revisions[1].title, "Edited");
    assert_eq!(revisions[1].content, "edited body");

    test_db.cleanup_owner(owner).await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_restore_rejects_foreign_revision() {
    let test_db = connect().await;
    let owner = Uuid::new_v4();

    let note_a = test_db
        .db
        .notes
        .create(owner, create_req("A", "a", &[]))
        .await
        .unwrap();
    let note_b = test_db
        .db
        .notes
        .create(owner, create_req("B", "b", &[]))
        .await
        .unwrap();

    test_db
        .db
        .notes
        .update(
            note_b.note.id,
            owner,
            UpdateNoteRequest {
                title: None,
                content: Some("b2".to_string()),
                tags: None,
            },
        )
        .await
        .unwrap();
    let revisions = test_db
        .db
        .revisions
        .list(note_b.note.id, owner)
        .await
        .unwrap();

    // Revision of B applied to A must not resolve.
    let err = test_db
        .db
        .notes
        .restore(note_a.note.id, revisions[0].id, owner)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    test_db.cleanup_owner(owner).await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_ownership_isolation() {
    let test_db = connect().await;
    let owner = Uuid::new_v4();
    let other = Uuid::new_v4();

    let note = test_db
        .db
        .notes
        .create(owner, create_req("Private", "secret", &[]))
        .await
        .unwrap();
    let note_id = note.note.id;

    test_db
        .db
        .notes
        .update(
            note_id,
            owner,
            UpdateNoteRequest {
                title: None,
                content: Some("secret v2".to_string()),
                tags: None,
            },
        )
        .await
        .unwrap();
    let revisions = test_db.db.revisions.list(note_id, owner).await.unwrap();
    let revision_id = revisions[0].id;

    // Every read and write path answers NotFound for the wrong owner,
    // indistinguishable from a nonexistent id.
    assert!(matches!(
        test_db.db.notes.fetch(note_id, other).await.unwrap_err(),
        Error::NotFound(_)
    ));
    assert!(matches!(
        test_db
            .db
            .notes
            .update(
                note_id,
                other,
                UpdateNoteRequest {
                    title: Some("hijack".to_string()),
                    content: None,
                    tags: None
                }
            )
            .await
            .unwrap_err(),
        Error::NotFound(_)
    ));
    assert!(matches!(
        test_db
            .db
            .revisions
            .get(revision_id, other)
            .await
            .unwrap_err(),
        Error::NotFound(_)
    ));
    assert!(test_db
        .db
        .revisions
        .list(note_id, other)
        .await
        .unwrap()
        .is_empty());
    assert!(matches!(
        test_db
            .db
            .notes
            .soft_delete(note_id, other)
            .await
            .unwrap_err(),
        Error::NotFound(_)
    ));

    // The owner's note is untouched by the failed attempts.
    let fetched = test_db.db.notes.fetch(note_id, owner).await.unwrap();
    assert_eq!(fetched.note.content.as_deref(), Some("secret v2"));

    test_db.cleanup_owner(owner).await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_soft_delete_hides_note_keeps_revisions() {
    let test_db = connect().await;
    let owner = Uuid::new_v4();

    let note = test_db
        .db
        .notes
        .create(owner, create_req("Gone soon", "body", &[]))
        .await
        .unwrap();
    let note_id = note.note.id;

    test_db
        .db
        .notes
        .update(
            note_id,
            owner,
            UpdateNoteRequest {
                title: None,
                content: Some("body v2".to_string()),
                tags: None,
            },
        )
        .await
        .unwrap();

    test_db.db.notes.soft_delete(note_id, owner).await.unwrap();

    // Hidden from fetch and list.
    assert!(matches!(
        test_db.db.notes.fetch(note_id, owner).await.unwrap_err(),
        Error::NotFound(_)
    ));
    assert!(test_db.db.notes.list(owner).await.unwrap().is_empty());

    // History stays addressable.
    let revisions = test_db.db.revisions.list(note_id, owner).await.unwrap();
    assert_eq!(revisions.len(), 1);

    // Deleting again is a no-op, not an error.
    test_db.db.notes.soft_delete(note_id, owner).await.unwrap();

    test_db.cleanup_owner(owner).await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_tags_lookup_or_create() {
    let test_db = connect().await;
    let owner = Uuid::new_v4();

    let first = test_db
        .db
        .notes
        .create(owner, create_req("One", "a", &["errands", "home"]))
        .await
        .unwrap();
    let second = test_db
        .db
        .notes
        .create(owner, create_req("Two", "b", &["errands"]))
        .await
        .unwrap();

    // "errands" resolved to the same tag row both times.
    let errands_first = first.tags.iter().find(|t| t.name == "errands").unwrap();
    let errands_second = second.tags.iter().find(|t| t.name == "errands").unwrap();
    assert_eq!(errands_first.id, errands_second.id);

    let by_tag = test_db.db.notes.list_by_tag(owner, "errands").await.unwrap();
    assert_eq!(by_tag.len(), 2);
    let by_tag = test_db.db.notes.list_by_tag(owner, "home").await.unwrap();
    assert_eq!(by_tag.len(), 1);

    // Unknown tag name is NotFound, not an empty list.
    let err = test_db
        .db
        .notes
        .list_by_tag(owner, "no-such-tag-xyz")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    test_db.cleanup_owner(owner).await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_issue_replace_is_atomic_and_idempotent() {
    let test_db = connect().await;
    let owner = Uuid::new_v4();

    let note = test_db
        .db
        .notes
        .create(owner, create_req("Typos", "Teh cat sat.", &[]))
        .await
        .unwrap();
    test_db
        .db
        .notes
        .update(
            note.note.id,
            owner,
            UpdateNoteRequest {
                title: None,
                content: Some("Teh cat sat!".to_string()),
                tags: None,
            },
        )
        .await
        .unwrap();

    let revisions = test_db.db.revisions.list(note.note.id, owner).await.unwrap();
    let revision = test_db.db.revisions.get(revisions[0].id, owner).await.unwrap();

    // "Typos\n\nTeh cat sat." — the typo starts after the title prefix.
    let matches = vec![typo_match(7, 3, "The")];
    let stored = test_db.db.issues.replace(&revision, &matches).await.unwrap();
    assert_eq!(stored.len(), 1);
    let first_id = stored[0].id;

    // Re-checking replaces the set wholesale; the old rows are gone.
    let stored = test_db.db.issues.replace(&revision, &matches).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_ne!(stored[0].id, first_id);
    assert_eq!(test_db.db.issues.list(revision.id).await.unwrap().len(), 1);

    // A match past the end of the combined text aborts the replace and
    // leaves the previous set intact.
    let bad = vec![typo_match(7, 3, "The"), typo_match(500, 3, "nope")];
    let err = test_db.db.issues.replace(&revision, &bad).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert_eq!(test_db.db.issues.list(revision.id).await.unwrap().len(), 1);

    test_db.cleanup_owner(owner).await;
}
