use nosql::{KeyValueStore, NosqlError, Result, SledStore};
use tempfile::TempDir;

fn open() -> (TempDir, SledStore) {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    let store = SledStore::open(temp_dir.path()).expect("unable to open SledStore");
    (temp_dir, store)
}

#[test]
fn set_overwrites() -> Result<()> {
    let (_dir, store) = open();
    store.set("key", b"one".to_vec())?;
    store.set("key", b"two".to_vec())?;
    assert_eq!(store.get("key")?, Some(b"two".to_vec()));
    Ok(())
}

#[test]
fn incr_starts_from_zero() -> Result<()> {
    let (_dir, store) = open();
    assert_eq!(store.incr("counter", 1)?, 1);
    assert_eq!(store.incr("counter", 4)?, 5);
    assert_eq!(store.get("counter")?, Some(b"5".to_vec()));
    Ok(())
}

#[test]
fn incr_continues_from_a_set_integer() -> Result<()> {
    let (_dir, store) = open();
    store.set("counter", b"41".to_vec())?;
    assert_eq!(store.incr("counter", 1)?, 42);
    Ok(())
}

#[test]
fn incr_rejects_non_integers() {
    let (_dir, store) = open();
    store.set("text", b"hello".to_vec()).unwrap();

    let err = store.incr("text", 1).unwrap_err();
    assert_eq!(err.downcast::<NosqlError>().unwrap(), NosqlError::NotAnInteger);
}

#[test]
fn rpush_appends_in_order() -> Result<()> {
    let (_dir, store) = open();
    assert_eq!(store.rpush("list", b"a".to_vec())?, 1);
    assert_eq!(store.rpush("list", b"b".to_vec())?, 2);
    assert_eq!(store.lrange("list")?, vec![b"a".to_vec(), b"b".to_vec()]);
    assert!(store.lrange("missing")?.is_empty());
    Ok(())
}

#[test]
fn lists_and_values_do_not_mix() {
    let (_dir, store) = open();
    store.rpush("list", b"a".to_vec()).unwrap();
    store.set("value", b"v".to_vec()).unwrap();

    let err = store.get("list").unwrap_err();
    assert_eq!(err.downcast::<NosqlError>().unwrap(), NosqlError::WrongType);
    assert!(store.incr("list", 1).is_err());
    assert!(store.rpush("value", b"x".to_vec()).is_err());
    assert!(store.lrange("value").is_err());
}

#[test]
fn flush_removes_everything() -> Result<()> {
    let (_dir, store) = open();
    store.set("a", b"1".to_vec())?;
    store.rpush("b", b"2".to_vec())?;

    store.flush()?;

    assert_eq!(store.get("a")?, None);
    assert!(store.lrange("b")?.is_empty());
    Ok(())
}

#[test]
fn clones_share_data() -> Result<()> {
    let (_dir, store) = open();
    let other = store.clone();

    store.set("shared", b"yes".to_vec())?;

    assert_eq!(other.get("shared")?, Some(b"yes".to_vec()));
    Ok(())
}

#[test]
fn open_rejects_files() {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    let file = temp_dir.path().join("file");
    std::fs::write(&file, b"").unwrap();

    let err = SledStore::open(file).unwrap_err();
    assert_eq!(err.downcast::<NosqlError>().unwrap(), NosqlError::NotADirectory);
}

#[test]
fn long_lists_keep_every_element_in_order() -> Result<()> {
    let (_dir, store) = open();
    for i in 0..300u64 {
        assert_eq!(store.rpush("list", i.to_string().into_bytes())?, i + 1);
    }

    let list = store.lrange("list")?;
    assert_eq!(list.len(), 300);
    for (i, element) in list.iter().enumerate() {
        assert_eq!(element, &i.to_string().into_bytes());
    }
    Ok(())
}

#[test]
fn set_replaces_a_list() -> Result<()> {
    let (_dir, store) = open();
    store.rpush("key", b"a".to_vec())?;
    store.rpush("key", b"b".to_vec())?;

    store.set("key", b"value".to_vec())?;

    assert_eq!(store.get("key")?, Some(b"value".to_vec()));
    Ok(())
}

#[test]
fn list_after_flush_starts_empty() -> Result<()> {
    let (_dir, store) = open();
    store.rpush("list", b"old".to_vec())?;
    store.rpush("list", b"older".to_vec())?;

    store.flush()?;

    assert_eq!(store.rpush("list", b"new".to_vec())?, 1);
    assert_eq!(store.lrange("list")?, vec![b"new".to_vec()]);
    Ok(())
}
