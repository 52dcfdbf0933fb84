//! Identity, hydration and deletion contract of resource objects.

use envipath_model::{
    Compound, FromRecord, Group, MemoryFetcher, ModelError, Node, Package, Pathway, Resource,
    ResourceKind, ResourceType, SharedFetcher, TransportError, User,
};
use proptest::prelude::*;
use serde_json::json;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

const HOST: &str = "http://localhost:8080/";

fn memory() -> (Arc<MemoryFetcher>, SharedFetcher) {
    let memory = Arc::new(MemoryFetcher::new(HOST));
    let shared: SharedFetcher = memory.clone();
    (memory, shared)
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// ============================================================================
// Hydrate once
// ============================================================================

#[test]
fn test_hydration_fetches_once_for_many_fields() {
    let (memory, fetcher) = memory();
    memory.insert(
        "compound/1",
        json!({
            "id": "compound/1",
            "name": "Atrazine",
            "description": "herbicide",
            "structures": []
        }),
    );

    let compound = Compound::new(fetcher, "compound/1");
    assert_eq!(compound.name().unwrap(), "Atrazine");
    assert_eq!(compound.description().unwrap(), "herbicide");
    assert!(compound.structures().unwrap().is_empty());
    assert_eq!(compound.name().unwrap(), "Atrazine");

    assert_eq!(memory.fetch_count("compound/1"), 1);
}

#[test]
fn test_missing_property_after_hydration_does_not_refetch() {
    let (memory, fetcher) = memory();
    memory.insert("node/1", json!({"name": "n1"}));

    let node = Node::new(fetcher, "node/1");
    let err = node.depth().unwrap_err();
    assert!(err.is_missing_property());
    assert!(node.depth().unwrap_err().is_missing_property());
    assert_eq!(memory.fetch_count("node/1"), 1);
}

#[test]
fn test_cached_reads_ignore_remote_changes() {
    let (memory, fetcher) = memory();
    memory.insert("package/1", json!({"name": "before", "description": "d"}));

    let package = Package::new(fetcher.clone(), "package/1");
    assert_eq!(package.name().unwrap(), "before");

    memory.insert("package/1", json!({"name": "after", "description": "d"}));
    assert_eq!(package.name().unwrap(), "before");

    // An independent instance hydrates on its own and sees the new snapshot.
    let fresh = Package::new(fetcher, "package/1");
    assert_eq!(fresh.name().unwrap(), "after");
    assert_eq!(fresh, package);
}

#[test]
fn test_transport_errors_propagate_unchanged() {
    let (_memory, fetcher) = memory();
    let package = Package::new(fetcher, "package/missing");

    match package.name() {
        Err(ModelError::Transport(TransportError::Status { status, uri, .. })) => {
            assert_eq!(status, 404);
            assert_eq!(uri, "package/missing");
        }
        other => panic!("expected transport error, got {other:?}"),
    }
    assert!(!package.resource().is_hydrated());
}

#[test]
fn test_hydration_is_shared_across_threads_of_one_instance() {
    let (memory, fetcher) = memory();
    memory.insert("pathway/1", json!({"pathwayName": "p", "completed": "true"}));
    let pathway = Arc::new(Pathway::new(fetcher, "pathway/1"));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pathway = Arc::clone(&pathway);
            std::thread::spawn(move || pathway.is_completed().unwrap())
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert_eq!(memory.fetch_count("pathway/1"), 1);
}

// ============================================================================
// Identity
// ============================================================================

#[test]
fn test_equality_ignores_hydration_state_and_seed() {
    let (memory, fetcher) = memory();
    memory.insert("node/7", json!({"depth": 1}));

    let bare = Node::new(fetcher.clone(), "node/7");
    let seeded = Node::from_record(&fetcher, &json!({"id": "node/7", "name": "x"})).unwrap();
    seeded.depth().unwrap();

    assert!(seeded.resource().is_hydrated());
    assert!(!bare.resource().is_hydrated());
    assert_eq!(bare, seeded);
    assert_eq!(hash_of(&bare), hash_of(&seeded));

    let set: HashSet<Node> = [bare, seeded].into_iter().collect();
    assert_eq!(set.len(), 1);
}

#[test]
fn test_same_attributes_different_identifier_are_unequal() {
    let (_memory, fetcher) = memory();
    let a = Node::from_record(&fetcher, &json!({"id": "node/a", "name": "n", "depth": 1})).unwrap();
    let b = Node::from_record(&fetcher, &json!({"id": "node/b", "name": "n", "depth": 1})).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_same_identifier_different_kind_are_unequal() {
    let (_memory, fetcher) = memory();
    let as_node = Resource::new(ResourceKind::Node, fetcher.clone(), "x/1");
    let as_edge = Resource::new(ResourceKind::Edge, fetcher, "x/1");
    assert_ne!(as_node, as_edge);
}

#[test]
fn test_clone_hydrates_independently() {
    let (memory, fetcher) = memory();
    memory.insert("user/1", json!({"name": "anonymous", "email": "a@b.c"}));

    let user = User::new(fetcher, "user/1");
    let copy = user.clone();
    assert_eq!(user.email().unwrap(), "a@b.c");
    assert!(!copy.resource().is_hydrated());
    assert_eq!(copy.email().unwrap(), "a@b.c");
    assert_eq!(memory.fetch_count("user/1"), 2);
}

proptest! {
    #[test]
    fn identity_follows_identifier(
        id_a in "[a-z]{1,8}/[0-9]{1,4}",
        id_b in "[a-z]{1,8}/[0-9]{1,4}",
        name_a in "[A-Za-z]{0,12}",
        name_b in "[A-Za-z]{0,12}",
    ) {
        let (_memory, fetcher) = memory();
        let a = Compound::from_record(&fetcher, &json!({"id": &id_a, "name": &name_a})).unwrap();
        let b = Compound::from_record(&fetcher, &json!({"id": &id_b, "name": &name_b})).unwrap();

        prop_assert_eq!(a == b, id_a == id_b);
        if id_a == id_b {
            prop_assert_eq!(hash_of(&a), hash_of(&b));
        }
    }
}

// ============================================================================
// Deletion
// ============================================================================

#[test]
fn test_delete_invalidates_object() {
    let (memory, fetcher) = memory();
    memory.insert("package/1", json!({"name": "Test Suite Package"}));

    let mut package = Package::new(fetcher, "package/1");
    assert_eq!(package.name().unwrap(), "Test Suite Package");
    package.delete().unwrap();

    assert_eq!(memory.deleted(), vec!["package/1".to_string()]);
    assert!(!memory.contains("package/1"));
    assert!(matches!(package.id(), Err(ModelError::Invalidated { .. })));
    assert!(matches!(package.name(), Err(ModelError::Invalidated { .. })));
    assert!(package.resource().cached("name").is_none());
    assert!(matches!(package.delete(), Err(ModelError::Invalidated { .. })));
    assert_eq!(memory.deleted().len(), 1);
}

#[test]
fn test_deleted_objects_keep_distinct_identities() {
    let (memory, fetcher) = memory();
    memory.insert("package/1", json!({}));
    memory.insert("package/2", json!({}));

    let mut first = Package::new(fetcher.clone(), "package/1");
    let mut second = Package::new(fetcher.clone(), "package/2");
    let live = Package::new(fetcher, "package/1");
    first.delete().unwrap();
    second.delete().unwrap();

    assert!(first.resource().is_deleted());
    assert_ne!(first, second);
    assert_ne!(first, live);
    assert_eq!(first, first.clone());

    let set: HashSet<Package> = [first.clone(), second, first].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn test_failed_remote_delete_keeps_object_usable() {
    let (memory, fetcher) = memory();
    let mut group = Group::new(fetcher, "group/gone");

    let err = group.delete().unwrap_err();
    assert!(matches!(err, ModelError::Transport(_)));
    assert_eq!(group.id().unwrap(), "group/gone");
    assert!(memory.deleted().is_empty());
}

#[test]
fn test_deleted_package_cannot_be_fetched_again() {
    let (memory, fetcher) = memory();
    memory.insert("package/1", json!({"name": "p"}));

    let mut package = Package::new(fetcher.clone(), "package/1");
    package.delete().unwrap();

    let again = Package::new(fetcher, "package/1");
    assert!(matches!(again.name(), Err(ModelError::Transport(_))));
}

#[test]
fn test_display_reads_cache_only() {
    let (memory, fetcher) = memory();
    memory.insert("pathway/1", json!({"pathwayName": "Atrazine degradation"}));

    let pathway = Pathway::new(fetcher, "pathway/1");
    assert_eq!(pathway.to_string(), "Pathway:  (pathway/1)");
    pathway.name().unwrap();
    assert_eq!(
        pathway.to_string(),
        "Pathway: Atrazine degradation (pathway/1)"
    );
    assert_eq!(memory.fetch_count("pathway/1"), 1);
}
