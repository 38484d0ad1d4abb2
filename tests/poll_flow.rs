use pollshare::{
    resolve_poll, shareable_url, shareable_url_with_data, Poll, PollStore, ShareConfig, VoteError,
};
use tempfile::TempDir;

fn open_store() -> (TempDir, PollStore) {
    let _ = env_logger::builder().is_test(true).try_init();
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let store = PollStore::open(temp_dir.path()).expect("open store");
    (temp_dir, store)
}

#[test]
fn create_publish_vote_and_reload_contract() {
    let (_tmp, store) = open_store();

    let mut poll =
        Poll::new("Lunch?", &["Pizza".to_string(), "Sushi".to_string()]).expect("valid poll");
    let id = poll.id.clone();

    // Draft → Published.
    store.save(&id, &poll).expect("publish poll");

    poll.cast_vote("Alice", "Pizza").expect("accepted vote");
    store.save(&id, &poll).expect("persist vote");

    let loaded = store.get(&id).expect("poll exists");
    assert_eq!(loaded, poll);
    assert_eq!(loaded.votes, vec![1, 0]);
    assert_eq!(loaded.total_votes() as usize, loaded.voters.len());
}

#[test]
fn store_survives_reopen_from_the_same_directory() {
    let _ = env_logger::builder().is_test(true).try_init();
    let temp_dir = tempfile::tempdir().expect("create temp dir");

    let mut poll =
        Poll::new("Lunch?", &["Pizza".to_string(), "Sushi".to_string()]).expect("valid poll");
    poll.cast_vote("Alice", "Pizza").expect("accepted vote");
    let id = poll.id.clone();

    {
        let store = PollStore::open(temp_dir.path()).expect("open store");
        store.save(&id, &poll).expect("save poll");
    }

    let reopened = PollStore::open(temp_dir.path()).expect("reopen store");
    let loaded = reopened.get(&id).expect("poll exists");
    assert_eq!(loaded, poll);

    assert!(reopened.get("some-other-id").is_none());
}

#[test]
fn duplicate_voter_is_rejected_across_a_persistence_round_trip() {
    let (_tmp, store) = open_store();

    let mut poll =
        Poll::new("Lunch?", &["Pizza".to_string(), "Sushi".to_string()]).expect("valid poll");
    poll.cast_vote("Alice", "Pizza").expect("accepted vote");
    store.save(&poll.id, &poll).expect("save poll");

    // A fresh load of the same record still knows Alice voted.
    let mut reloaded = store.get(&poll.id).expect("poll exists");
    assert_eq!(
        reloaded.cast_vote("ALICE", "Sushi").unwrap_err(),
        VoteError::DuplicateVoter
    );
    assert_eq!(reloaded, poll);

    reloaded.cast_vote("Bob", "Sushi").expect("accepted vote");
    store.save(&reloaded.id, &reloaded).expect("persist vote");
    assert_eq!(store.get(&poll.id).expect("poll exists").votes, vec![1, 1]);
}

#[test]
fn share_link_imports_the_poll_into_a_cold_store() {
    let (_tmp_a, sender_store) = open_store();
    let (_tmp_b, recipient_store) = open_store();

    let mut poll =
        Poll::new("Lunch?", &["Pizza".to_string(), "Sushi".to_string()]).expect("valid poll");
    poll.cast_vote("Alice", "Pizza").expect("accepted vote");
    sender_store.save(&poll.id, &poll).expect("save poll");

    let config = ShareConfig::development();
    let url = shareable_url_with_data(&config, &poll).expect("build share url");
    let (route, embedded) = url.split_once("?data=").expect("url carries data param");
    assert_eq!(route, shareable_url(&config, &poll.id));

    // The recipient has never seen this poll; the link alone reconstructs it.
    assert!(recipient_store.get(&poll.id).is_none());
    let imported =
        resolve_poll(&recipient_store, &poll.id, Some(embedded)).expect("poll resolves");
    assert_eq!(imported, poll);

    // And the import stuck: voting proceeds from the recipient's own store.
    let mut local = recipient_store.get(&poll.id).expect("seeded record");
    local.cast_vote("Bob", "Sushi").expect("accepted vote");
    recipient_store.save(&local.id, &local).expect("persist vote");
    assert_eq!(
        recipient_store.get(&poll.id).expect("poll exists").votes,
        vec![1, 1]
    );
}

#[test]
fn resolve_redirects_to_creation_when_nothing_is_found() {
    let (_tmp, store) = open_store();
    assert!(resolve_poll(&store, "nonexistent", None).is_none());
}
