use hbnb::models::*;
use hbnb::storage::*;
use serde_json::json;
use speculate2::speculate;

fn create_user(storage: &mut Storage, email: &str) -> Instance {
    let mut user = Instance::new(ClassName::User);
    user.set_attribute("email", json!(email))
        .expect("Failed to set attribute");
    storage.insert(user.clone());
    user
}

speculate! {
    before {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("file.json");
        let mut storage = Storage::open(JsonFileBackend::new(path.clone()))
            .expect("Failed to open storage");
    }

    describe "json file backend" {
        it "starts empty when the file does not exist" {
            assert!(storage.is_empty());
            assert!(!path.exists());
        }

        it "treats an empty file as an empty store" {
            std::fs::write(&path, "").expect("Failed to write");
            storage.reload().expect("Failed to reload");
            assert!(storage.is_empty());
        }

        it "persists objects across reopening" {
            let user = create_user(&mut storage, "ada@example.com");
            storage.save().expect("Failed to save");

            let reopened = Storage::open(JsonFileBackend::new(path.clone()))
                .expect("Failed to reopen");
            let found = reopened.get(ClassName::User, &user.id.to_string())
                .expect("User not persisted");
            assert_eq!(found, &user);
        }

        it "writes a flat map keyed by class and id" {
            let user = create_user(&mut storage, "ada@example.com");
            storage.save().expect("Failed to save");

            let raw: serde_json::Value = serde_json::from_str(
                &std::fs::read_to_string(&path).expect("Failed to read"),
            ).expect("File is not JSON");
            let entry = &raw[format!("User.{}", user.id)];
            assert_eq!(entry["__class__"], "User");
            assert_eq!(entry["email"], "ada@example.com");
        }

        it "creates missing parent directories on save" {
            let nested = dir.path().join("a/b/objects.json");
            let mut nested_storage = Storage::open(JsonFileBackend::new(nested.clone()))
                .expect("Failed to open");
            create_user(&mut nested_storage, "x@example.com");
            nested_storage.save().expect("Failed to save");
            assert!(nested.exists());
        }

        it "reports malformed files" {
            std::fs::write(&path, "{not json").expect("Failed to write");
            let result = storage.reload();
            assert!(matches!(result, Err(StorageError::Json(_))));
        }

        it "drops unsaved changes on reload" {
            create_user(&mut storage, "ada@example.com");
            storage.reload().expect("Failed to reload");
            assert!(storage.is_empty());
        }
    }

    describe "keyed map" {
        it "keeps one entry per key" {
            let mut user = create_user(&mut storage, "ada@example.com");
            user.set_attribute("email", json!("grace@example.com"))
                .expect("Failed to set attribute");
            storage.insert(user.clone());

            assert_eq!(storage.len(), 1);
            let stored = storage.get(ClassName::User, &user.id.to_string())
                .expect("User missing");
            assert_eq!(stored.attributes["email"], "grace@example.com");
        }

        it "scopes lookups to the class" {
            let user = create_user(&mut storage, "ada@example.com");
            assert!(storage.get(ClassName::Place, &user.id.to_string()).is_none());
        }

        it "filters and counts by class" {
            create_user(&mut storage, "ada@example.com");
            create_user(&mut storage, "grace@example.com");
            storage.insert(Instance::new(ClassName::City));

            assert_eq!(storage.count(ClassName::User), 2);
            assert_eq!(storage.count(ClassName::City), 1);
            assert_eq!(storage.count(ClassName::Review), 0);
            assert!(storage.all_of(ClassName::User).all(|i| i.class == ClassName::User));
            assert_eq!(storage.all().len(), 3);
        }

        it "removes instances" {
            let user = create_user(&mut storage, "ada@example.com");
            let removed = storage.remove(ClassName::User, &user.id.to_string());
            assert_eq!(removed, Some(user.clone()));
            assert!(storage.remove(ClassName::User, &user.id.to_string()).is_none());
            assert!(storage.is_empty());
        }
    }

    describe "sqlite backend" {
        it "starts empty" {
            let db = Storage::open(SqliteBackend::open_memory().expect("Failed to open db"))
                .expect("Failed to open storage");
            assert!(db.is_empty());
        }

        it "persists objects across reopening a database file" {
            let db_path = dir.path().join("data/hbnb.db");
            let mut db = Storage::open(SqliteBackend::open(db_path.clone()).expect("Failed to open db"))
                .expect("Failed to open storage");
            let user = create_user(&mut db, "ada@example.com");
            db.insert(Instance::new(ClassName::Amenity));
            db.save().expect("Failed to save");
            drop(db);

            let reopened = Storage::open(SqliteBackend::open(db_path).expect("Failed to reopen db"))
                .expect("Failed to open storage");
            assert_eq!(reopened.len(), 2);
            assert_eq!(reopened.get(ClassName::User, &user.id.to_string()), Some(&user));
        }

        it "replaces the stored contents on save" {
            let db_path = dir.path().join("replace.db");
            let mut db = Storage::open(SqliteBackend::open(db_path.clone()).expect("Failed to open db"))
                .expect("Failed to open storage");
            let user = create_user(&mut db, "ada@example.com");
            db.save().expect("Failed to save");

            db.remove(ClassName::User, &user.id.to_string());
            db.save().expect("Failed to save");
            db.reload().expect("Failed to reload");
            assert!(db.is_empty());
        }
    }
}
