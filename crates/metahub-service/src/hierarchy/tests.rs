use metahub_core::config::CatalogConfig;
use metahub_core::error::ErrorKind;
use metahub_core::ltree::{Label, LabelPath};
use metahub_database::{CatalogStore, CatalogTransaction, ItemRepository, MemoryCatalogStore};
use metahub_entity::item::{ContainerType, ExtendedExtra, Item, ItemType};
use uuid::Uuid;

use super::{Bequest, HierarchyEngine, NewItem};

const PROJECT: &str = "project";

fn engine() -> HierarchyEngine {
    HierarchyEngine::new(&CatalogConfig::default())
}

fn new_item(parent: Option<Uuid>, name: &str, item_type: ItemType) -> NewItem {
    NewItem {
        parent,
        parent_path: None,
        name: name.to_string(),
        item_type,
        zone: 0,
        size: None,
        owner: Some("admin".to_string()),
        container_code: PROJECT.to_string(),
        container_type: ContainerType::Project,
        location_uri: None,
        version: None,
        extra: ExtendedExtra::default(),
    }
}

fn path(display: &str) -> LabelPath {
    LabelPath::from_display(display).unwrap()
}

async fn add(
    tx: &mut dyn CatalogTransaction,
    parent: Option<&Item>,
    name: &str,
    item_type: ItemType,
) -> Item {
    engine()
        .create(tx, new_item(parent.map(|p| p.id), name, item_type))
        .await
        .unwrap()
        .item
}

/// `admin/a/b/F/C/file.txt`
struct Tree {
    admin: Item,
    a: Item,
    b: Item,
    f: Item,
    c: Item,
    file: Item,
}

async fn seed(tx: &mut dyn CatalogTransaction) -> Tree {
    let admin = add(tx, None, "admin", ItemType::NameFolder).await;
    let a = add(tx, Some(&admin), "a", ItemType::Folder).await;
    let b = add(tx, Some(&a), "b", ItemType::Folder).await;
    let f = add(tx, Some(&b), "F", ItemType::Folder).await;
    let c = add(tx, Some(&f), "C", ItemType::Folder).await;
    let file = add(tx, Some(&c), "file.txt", ItemType::File).await;
    Tree {
        admin,
        a,
        b,
        f,
        c,
        file,
    }
}

async fn reload(tx: &mut dyn CatalogTransaction, id: Uuid) -> Item {
    tx.find_item(id).await.unwrap().unwrap()
}

#[tokio::test]
async fn test_create_encodes_parent_path() {
    let store = MemoryCatalogStore::new();
    let mut tx = store.begin().await.unwrap();
    let tree = seed(tx.as_mut()).await;

    assert_eq!(tree.f.parent, Some(tree.b.id));
    assert_eq!(tree.f.parent_path, Some(path("admin.a.b")));
    assert_eq!(tree.file.parent_path, Some(path("admin.a.b.F.C")));
    assert_eq!(tree.file.name, Label::encode("file.txt"));
    assert!(tree.admin.parent_path.is_none());
}

#[tokio::test]
async fn test_create_by_parent_path() {
    let store = MemoryCatalogStore::new();
    let mut tx = store.begin().await.unwrap();
    let tree = seed(tx.as_mut()).await;

    let mut request = new_item(None, "by-path.txt", ItemType::File);
    request.parent_path = Some("admin.a.b".to_string());
    let created = engine().create(tx.as_mut(), request).await.unwrap();
    assert_eq!(created.item.parent, Some(tree.b.id));

    let mut mismatch = new_item(Some(tree.a.id), "x.txt", ItemType::File);
    mismatch.parent_path = Some("admin.a.b".to_string());
    let err = engine().create(tx.as_mut(), mismatch).await.unwrap_err();
    assert!(err.is(ErrorKind::Validation));
}

#[tokio::test]
async fn test_name_folder_invariants() {
    let store = MemoryCatalogStore::new();
    let mut tx = store.begin().await.unwrap();
    let tree = seed(tx.as_mut()).await;

    let err = engine()
        .create(
            tx.as_mut(),
            new_item(Some(tree.a.id), "nested", ItemType::NameFolder),
        )
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));

    let mut with_path = new_item(None, "nested", ItemType::NameFolder);
    with_path.parent_path = Some("admin".to_string());
    let err = engine().create(tx.as_mut(), with_path).await.unwrap_err();
    assert!(err.is(ErrorKind::Validation));

    let err = engine()
        .create(tx.as_mut(), new_item(None, "orphan", ItemType::Folder))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));

    let err = engine()
        .set_archived(tx.as_mut(), tree.admin.id, true)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::InvalidOperation));
}

#[tokio::test]
async fn test_name_folders_are_scoped_by_container_type() {
    let store = MemoryCatalogStore::new();
    let mut tx = store.begin().await.unwrap();
    let tree = seed(tx.as_mut()).await;

    let mut dataset = new_item(None, "admin", ItemType::NameFolder);
    dataset.container_type = ContainerType::Dataset;
    let created = engine().create(tx.as_mut(), dataset.clone()).await.unwrap();
    assert_ne!(created.item.id, tree.admin.id);
    assert_eq!(created.item.container_type, ContainerType::Dataset);

    let err = engine().create(tx.as_mut(), dataset).await.unwrap_err();
    assert!(err.is(ErrorKind::Conflict));

    let err = engine()
        .create(tx.as_mut(), new_item(None, "admin", ItemType::NameFolder))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Conflict));
}

#[tokio::test]
async fn test_folder_name_cannot_contain_separator() {
    let store = MemoryCatalogStore::new();
    let mut tx = store.begin().await.unwrap();
    let tree = seed(tx.as_mut()).await;

    let err = engine()
        .create(tx.as_mut(), new_item(Some(tree.a.id), "v1.2", ItemType::Folder))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));
}

#[tokio::test]
async fn test_duplicate_active_name_conflicts() {
    let store = MemoryCatalogStore::new();
    let mut tx = store.begin().await.unwrap();
    let tree = seed(tx.as_mut()).await;

    let err = engine()
        .create(tx.as_mut(), new_item(Some(tree.b.id), "F", ItemType::Folder))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Conflict));
}

#[tokio::test]
async fn test_rename_cascades_single_segment() {
    let store = MemoryCatalogStore::new();
    let mut tx = store.begin().await.unwrap();
    let tree = seed(tx.as_mut()).await;

    let affected = engine().rename(tx.as_mut(), tree.f.id, "F2").await.unwrap();
    assert_eq!(affected.len(), 3);

    let f = reload(tx.as_mut(), tree.f.id).await;
    let c = reload(tx.as_mut(), tree.c.id).await;
    let file = reload(tx.as_mut(), tree.file.id).await;
    assert_eq!(f.name, Label::encode("F2"));
    assert_eq!(f.parent_path, Some(path("admin.a.b")));
    assert_eq!(c.parent_path, Some(path("admin.a.b.F2")));
    assert_eq!(file.parent_path, Some(path("admin.a.b.F2.C")));
}

#[tokio::test]
async fn test_rename_to_taken_name_conflicts() {
    let store = MemoryCatalogStore::new();
    let mut tx = store.begin().await.unwrap();
    let tree = seed(tx.as_mut()).await;
    add(tx.as_mut(), Some(&tree.b), "G", ItemType::Folder).await;

    let err = engine().rename(tx.as_mut(), tree.f.id, "G").await.unwrap_err();
    assert!(err.is(ErrorKind::Conflict));
}

#[tokio::test]
async fn test_move_cascades_prefix() {
    let store = MemoryCatalogStore::new();
    let mut tx = store.begin().await.unwrap();
    let tree = seed(tx.as_mut()).await;
    let x = add(tx.as_mut(), Some(&tree.admin), "x", ItemType::Folder).await;
    let y = add(tx.as_mut(), Some(&x), "y", ItemType::Folder).await;

    let affected = engine()
        .move_item(tx.as_mut(), tree.f.id, Some(y.id), None, None)
        .await
        .unwrap();
    assert_eq!(affected.len(), 3);

    let f = reload(tx.as_mut(), tree.f.id).await;
    let c = reload(tx.as_mut(), tree.c.id).await;
    let file = reload(tx.as_mut(), tree.file.id).await;
    assert_eq!(f.parent, Some(y.id));
    assert_eq!(f.parent_path, Some(path("admin.x.y")));
    assert_eq!(c.parent_path, Some(path("admin.x.y.F")));
    assert_eq!(file.parent_path, Some(path("admin.x.y.F.C")));
}

#[tokio::test]
async fn test_move_into_own_subtree_rejected() {
    let store = MemoryCatalogStore::new();
    let mut tx = store.begin().await.unwrap();
    let tree = seed(tx.as_mut()).await;

    let err = engine()
        .move_item(tx.as_mut(), tree.f.id, Some(tree.c.id), None, None)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));
}

#[tokio::test]
async fn test_move_with_rename_checks_final_slot() {
    let store = MemoryCatalogStore::new();
    let mut tx = store.begin().await.unwrap();
    let tree = seed(tx.as_mut()).await;
    let x = add(tx.as_mut(), Some(&tree.admin), "x", ItemType::Folder).await;
    add(tx.as_mut(), Some(&x), "F", ItemType::Folder).await;

    let err = engine()
        .move_item(tx.as_mut(), tree.f.id, Some(x.id), None, None)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Conflict));

    let affected = engine()
        .move_item(tx.as_mut(), tree.f.id, Some(x.id), None, Some("G"))
        .await
        .unwrap();
    assert_eq!(affected.len(), 3);

    let f = reload(tx.as_mut(), tree.f.id).await;
    let file = reload(tx.as_mut(), tree.file.id).await;
    assert_eq!(f.name, Label::encode("G"));
    assert_eq!(f.parent, Some(x.id));
    assert_eq!(f.parent_path, Some(path("admin.x")));
    assert_eq!(file.parent_path, Some(path("admin.x.G.C")));

    let err = engine()
        .move_item(tx.as_mut(), tree.c.id, Some(x.id), None, Some("F"))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Conflict));
}

#[tokio::test]
async fn test_archive_restore_round_trip() {
    let store = MemoryCatalogStore::new();
    let mut tx = store.begin().await.unwrap();
    let tree = seed(tx.as_mut()).await;
    let extra = add(tx.as_mut(), Some(&tree.f), "notes.md", ItemType::File).await;

    let archived = engine()
        .set_archived(tx.as_mut(), tree.f.id, true)
        .await
        .unwrap();
    assert_eq!(archived.len(), 4);
    assert!(archived.iter().all(|i| i.archived && i.parent_path.is_none()));

    let f = reload(tx.as_mut(), tree.f.id).await;
    assert_eq!(f.parent, None);
    assert_eq!(f.restore_path, Some(path("admin.a.b")));
    let c = reload(tx.as_mut(), tree.c.id).await;
    assert_eq!(c.parent, Some(tree.f.id));
    assert_eq!(c.restore_path, Some(path("admin.a.b.F")));

    let restored = engine()
        .set_archived(tx.as_mut(), tree.f.id, false)
        .await
        .unwrap();
    assert_eq!(restored.len(), 4);
    assert!(restored.iter().all(|i| !i.archived && i.restore_path.is_none()));

    for before in [&tree.f, &tree.c, &tree.file, &extra] {
        let after = reload(tx.as_mut(), before.id).await;
        assert_eq!(after.parent, before.parent);
        assert_eq!(after.parent_path, before.parent_path);
        assert_eq!(after.name, before.name);
        assert!(!after.archived);
    }
}

#[tokio::test]
async fn test_archive_twice_is_rejected() {
    let store = MemoryCatalogStore::new();
    let mut tx = store.begin().await.unwrap();
    let tree = seed(tx.as_mut()).await;

    engine()
        .set_archived(tx.as_mut(), tree.file.id, true)
        .await
        .unwrap();
    let err = engine()
        .set_archived(tx.as_mut(), tree.file.id, true)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::InvalidOperation));
}

#[tokio::test]
async fn test_restore_into_occupied_slot_gets_suffix() {
    let store = MemoryCatalogStore::new();
    let mut tx = store.begin().await.unwrap();
    let tree = seed(tx.as_mut()).await;
    let first = add(tx.as_mut(), Some(&tree.b), "conflict.txt", ItemType::File).await;

    engine()
        .set_archived(tx.as_mut(), first.id, true)
        .await
        .unwrap();
    let second = add(tx.as_mut(), Some(&tree.b), "conflict.txt", ItemType::File).await;

    let restored = engine()
        .set_archived(tx.as_mut(), first.id, false)
        .await
        .unwrap();
    assert_eq!(restored[0].name, Label::encode("conflict_1.txt"));
    assert_eq!(restored[0].parent_path, Some(path("admin.a.b")));

    let untouched = reload(tx.as_mut(), second.id).await;
    assert_eq!(untouched.name, Label::encode("conflict.txt"));
    assert!(!untouched.archived);
}

#[tokio::test]
async fn test_archive_bucket_collision_keeps_descendants_reachable() {
    let store = MemoryCatalogStore::new();
    let mut tx = store.begin().await.unwrap();
    let tree = seed(tx.as_mut()).await;

    // Archive F, recreate F with a child, archive it again.
    engine().set_archived(tx.as_mut(), tree.f.id, true).await.unwrap();
    let f2 = add(tx.as_mut(), Some(&tree.b), "F", ItemType::Folder).await;
    let child = add(tx.as_mut(), Some(&f2), "inner", ItemType::Folder).await;
    let archived = engine().set_archived(tx.as_mut(), f2.id, true).await.unwrap();

    assert_eq!(archived.len(), 2);
    assert_eq!(archived[0].name, Label::encode("F_1"));
    let child = reload(tx.as_mut(), child.id).await;
    assert_eq!(child.restore_path, Some(path("admin.a.b.F_1")));

    // The first archived F still owns exactly its own subtree.
    let first = reload(tx.as_mut(), tree.f.id).await;
    let subtree = engine().subtree(tx.as_mut(), &first).await.unwrap();
    assert_eq!(subtree.len(), 2);
}

#[tokio::test]
async fn test_restore_without_destination_fails() {
    let store = MemoryCatalogStore::new();
    let mut tx = store.begin().await.unwrap();
    let tree = seed(tx.as_mut()).await;

    engine().set_archived(tx.as_mut(), tree.file.id, true).await.unwrap();
    engine().delete(tx.as_mut(), tree.c.id).await.unwrap();

    let err = engine()
        .set_archived(tx.as_mut(), tree.file.id, false)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::InvalidOperation));
    assert_eq!(err.message, "restore destination does not exist");
}

#[tokio::test]
async fn test_delete_cascades() {
    let store = MemoryCatalogStore::new();
    let mut tx = store.begin().await.unwrap();
    let tree = seed(tx.as_mut()).await;

    let deleted = engine().delete(tx.as_mut(), tree.f.id).await.unwrap();
    assert_eq!(deleted.len(), 3);
    assert_eq!(deleted.last(), Some(&tree.f.id));
    for id in [tree.f.id, tree.c.id, tree.file.id] {
        assert!(tx.find_item(id).await.unwrap().is_none());
        assert!(tx.find_storage(id).await.unwrap().is_none());
        assert!(tx.find_extended(id).await.unwrap().is_none());
    }
    assert!(tx.find_item(tree.b.id).await.unwrap().is_some());

    let leaf = add(tx.as_mut(), Some(&tree.b), "leaf.txt", ItemType::File).await;
    assert_eq!(engine().delete(tx.as_mut(), leaf.id).await.unwrap(), vec![leaf.id]);
}

#[tokio::test]
async fn test_subtree_layers() {
    let store = MemoryCatalogStore::new();
    let mut tx = store.begin().await.unwrap();
    let tree = seed(tx.as_mut()).await;

    let subtree = engine().subtree(tx.as_mut(), &tree.a).await.unwrap();
    let layers = subtree.layers();
    assert_eq!(layers.len(), 4);
    assert_eq!(layers[0][0].id, tree.b.id);
    assert_eq!(layers[3][0].id, tree.file.id);

    let read = engine().read_subtree(tx.as_mut(), &tree.a).await.unwrap();
    let ids = |s: &super::Subtree| s.descendants().iter().map(|d| d.item.id).collect::<Vec<_>>();
    assert_eq!(ids(&read), ids(&subtree));
}

#[tokio::test]
async fn test_bequeath_requires_folder() {
    let store = MemoryCatalogStore::new();
    let mut tx = store.begin().await.unwrap();
    let tree = seed(tx.as_mut()).await;

    let bequest = Bequest {
        system_tags: Some(vec!["copied".to_string()]),
        ..Bequest::default()
    };
    let err = engine()
        .bequeath(tx.as_mut(), tree.file.id, &bequest)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::InvalidOperation));

    let updated = engine()
        .bequeath(tx.as_mut(), tree.b.id, &bequest)
        .await
        .unwrap();
    assert_eq!(updated.len(), 3);
    let extended = tx.find_extended(tree.file.id).await.unwrap().unwrap();
    assert_eq!(extended.extra.system_tags, vec!["copied".to_string()]);
}
