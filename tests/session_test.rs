use genrecli::management::SessionManager;
use genrecli::types::{Session, UserProfile};
use tempfile::TempDir;

fn profile() -> UserProfile {
    UserProfile {
        id: "user-1".to_string(),
        display_name: Some("Jo".to_string()),
    }
}

#[tokio::test]
async fn test_session_survives_persist_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cache/session.json");

    let mut manager = SessionManager::new(Session::logged_in(None));
    manager.set_profile(Some(profile()));
    manager.persist_to(&path).await.unwrap();

    let loaded = SessionManager::load_from(&path).await.unwrap();
    let session = loaded.current_session();
    assert!(session.is_logged_in);
    assert_eq!(session.profile.as_ref().map(|p| p.label()), Some("Jo"));
}

#[tokio::test]
async fn test_clear_removes_cache_and_logs_out() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");

    let mut manager = SessionManager::new(Session::logged_in(Some(profile())));
    manager.persist_to(&path).await.unwrap();
    manager.clear_at(&path).await.unwrap();

    assert!(!path.exists());
    assert_eq!(manager.current_session(), &Session::default());

    // clearing twice is fine
    manager.clear_at(&path).await.unwrap();
}

#[tokio::test]
async fn test_missing_or_corrupt_cache_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");

    assert!(SessionManager::load_from(&path).await.is_err());

    std::fs::write(&path, "{ not json").unwrap();
    assert!(SessionManager::load_from(&path).await.is_err());
}

#[test]
fn test_profile_label_falls_back_to_id() {
    let anonymous = UserProfile {
        id: "user-2".to_string(),
        display_name: None,
    };
    assert_eq!(anonymous.label(), "user-2");
    assert_eq!(profile().label(), "Jo");
}
