use carlogapp::error::CarlogError;
use carlogapp::store::fs_backend::FsBackend;
use carlogapp::store::{self, keys, KeyValueStore};
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().join("data"));
    (dir, backend)
}

#[test]
fn test_fs_backend_basic_io() {
    let (_dir, backend) = setup();

    assert_eq!(backend.read(keys::VEHICLES).unwrap(), None);

    backend.write(keys::VEHICLES, "[]").unwrap();
    assert_eq!(backend.read(keys::VEHICLES).unwrap(), Some("[]".to_string()));

    backend.remove(keys::VEHICLES).unwrap();
    assert_eq!(backend.read(keys::VEHICLES).unwrap(), None);

    // Removing twice is fine.
    backend.remove(keys::VEHICLES).unwrap();
}

#[test]
fn test_fs_backend_creates_root_on_first_write() {
    let (dir, backend) = setup();
    assert!(!dir.path().join("data").exists());

    backend.write(keys::THEME, "\"dark\"").unwrap();
    assert!(dir.path().join("data").join("theme.json").exists());
}

#[test]
fn test_fs_backend_atomic_write_leaves_no_artifacts() {
    let (_dir, backend) = setup();

    backend.write(keys::FUEL, "[1]").unwrap();
    backend.write(keys::FUEL, "[1,2]").unwrap();

    let names: Vec<String> = fs::read_dir(backend.root())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["fuel.json".to_string()]);
    assert_eq!(backend.read(keys::FUEL).unwrap(), Some("[1,2]".to_string()));
}

#[test]
fn test_fs_backend_clear_only_removes_documents() {
    let (_dir, backend) = setup();
    backend.write(keys::VEHICLES, "[]").unwrap();
    backend.write(keys::LAST_BACKUP, "0").unwrap();
    let stray = backend.root().join("notes.txt");
    fs::write(&stray, "keep me").unwrap();

    backend.clear().unwrap();

    assert_eq!(backend.read(keys::VEHICLES).unwrap(), None);
    assert_eq!(backend.read(keys::LAST_BACKUP).unwrap(), None);
    assert!(stray.exists());
}

#[test]
fn test_fs_backend_rejects_path_like_keys() {
    let (_dir, backend) = setup();

    for key in ["", "../escape", "a/b", "dot.json"] {
        let result = backend.write(key, "{}");
        assert!(
            matches!(result, Err(CarlogError::Persistence { .. })),
            "key {:?} accepted",
            key
        );
    }
}

#[test]
fn test_typed_get_fails_soft_on_corrupt_document() {
    let (_dir, backend) = setup();
    backend.write(keys::PARTS, "{not json").unwrap();

    let parts: Vec<serde_json::Value> = store::get(&backend, keys::PARTS, Vec::new());
    assert!(parts.is_empty());
}
