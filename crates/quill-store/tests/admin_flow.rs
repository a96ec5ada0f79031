// End-to-end admin flow: sign in, guard the admin area, manage posts and comments

use std::sync::Arc;

use pretty_assertions::assert_eq;
use quill_store::{
    admin_guard, AuthClient, AuthEvent, AuthStore, AuthView, Backend, CommentStore, CommentView,
    MemoryAuth, MemoryBackend, NavigationPolicy, PostStore, PostView, RecordingNavigator, Redirect,
    Row, Table,
};
use serde_json::json;

fn row(value: serde_json::Value) -> Row {
    value.as_object().cloned().expect("object literal")
}

struct Harness {
    backend: MemoryBackend,
    auth: MemoryAuth,
    policy: NavigationPolicy,
}

impl Harness {
    async fn new() -> Self {
        let backend = MemoryBackend::new();
        let auth = MemoryAuth::new();

        auth.add_user("u1", "editor@example.com", "hunter2").await;
        backend
            .seed(
                Table::Profiles,
                vec![row(json!({
                    "id": "u1", "name": "Editor", "email": "editor@example.com", "role": "admin"
                }))],
            )
            .await;
        backend
            .seed(
                Table::Posts,
                vec![row(json!({
                    "id": "1", "title": "Hello", "content": "First post",
                    "author_id": "u1", "published": false,
                    "created_at": "2024-01-01T00:00:00Z"
                }))],
            )
            .await;

        Self {
            backend,
            auth,
            policy: NavigationPolicy::default(),
        }
    }

    fn backend(&self) -> Arc<dyn Backend> {
        Arc::new(self.backend.clone())
    }

    fn auth_view(&self) -> AuthView {
        AuthView::new(
            AuthStore::new(self.backend(), Arc::new(self.auth.clone())),
            self.policy.clone(),
        )
    }

    fn post_view(&self) -> PostView {
        PostView::new(PostStore::new(self.backend()), self.policy.clone())
    }
}

#[tokio::test]
async fn test_login_then_guard_allows_admin_area() {
    let harness = Harness::new().await;
    let mut view = harness.auth_view();
    let mut nav = RecordingNavigator::new();

    assert_eq!(
        admin_guard("/admin/posts", view.store(), &harness.policy),
        Some(Redirect::to("/auth/login?redirect=%2Fadmin%2Fposts"))
    );

    let outcome = view.login("editor@example.com", "hunter2").await.unwrap();
    outcome.apply(&mut nav);

    assert_eq!(nav.last(), Some(&Redirect::to("/admin")));
    assert_eq!(admin_guard("/admin/posts", view.store(), &harness.policy), None);

    let outcome = view.logout().await;
    outcome.apply(&mut nav);
    assert_eq!(nav.last(), Some(&Redirect::to("/")));
}

#[tokio::test]
async fn test_failed_login_does_not_navigate() {
    let harness = Harness::new().await;
    let mut view = harness.auth_view();

    let err = view.login("editor@example.com", "wrong").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid login credentials");
    assert_eq!(view.error(), Some("Invalid login credentials"));
    assert!(view.user().is_none());
}

#[tokio::test]
async fn test_toggle_publish_success_and_failure() {
    let harness = Harness::new().await;
    let mut view = harness.post_view();
    view.load().await;

    assert!(view.toggle_publish("1").await.ok);
    assert!(view.posts()[0].published);

    harness.backend.fail_with("write rejected").await;
    assert!(!view.toggle_publish("1").await.ok);
    assert!(view.posts()[0].published);
    assert_eq!(view.error(), Some("write rejected"));
}

#[tokio::test]
async fn test_fetch_error_keeps_prior_collection() {
    let harness = Harness::new().await;
    let mut view = harness.post_view();

    harness.backend.fail_with("offline").await;
    assert!(!view.load().await.ok);
    assert!(view.posts().is_empty());
    assert!(view.error().is_some());

    harness.backend.recover().await;
    view.load().await;
    harness.backend.fail_with("offline").await;
    view.load().await;
    assert_eq!(view.posts().len(), 1);
    assert!(!view.is_loading());
}

#[tokio::test]
async fn test_create_redirects_to_edit_page() {
    let harness = Harness::new().await;
    let mut view = harness.post_view();
    view.load().await;

    let outcome = view.create("A", "B", "u1").await;
    let current = view.current().cloned().expect("current post");

    assert_eq!(view.posts().len(), 2);
    assert_eq!(view.posts()[0], current);
    assert_eq!(current.title, "A");
    assert_eq!(outcome.redirect, Some(Redirect::to(format!("/admin/posts/{}", current.id))));

    let outcome = view.delete(&current.id).await;
    assert_eq!(outcome.redirect, Some(Redirect::to("/admin/posts")));
    assert_eq!(view.posts().len(), 1);
}

#[tokio::test]
async fn test_failed_create_has_no_redirect() {
    let harness = Harness::new().await;
    let mut view = harness.post_view();
    harness.backend.fail_with("insert failed").await;

    let outcome = view.create("A", "B", "u1").await;
    assert!(!outcome.ok);
    assert_eq!(outcome.redirect, None);
    assert!(view.current().is_none());
}

#[tokio::test]
async fn test_comment_thread() {
    let harness = Harness::new().await;
    let mut view = CommentView::new(CommentStore::new(harness.backend()));

    assert!(view.add("Nice", "1", "u1").await.ok);
    assert!(view.add("Thanks", "1", "u1").await.ok);
    assert!(view.load("1").await.ok);
    assert_eq!(view.comments_for("1").len(), 2);

    let id = view.comments_for("1")[0].id.clone();
    assert!(view.edit(&id, "Very nice").await.ok);
    assert_eq!(view.comments_for("1")[0].content, "Very nice");

    assert!(view.remove(&id).await.ok);
    assert_eq!(view.comments_for("1").len(), 1);
}

#[tokio::test]
async fn test_auth_events_over_listener() {
    let harness = Harness::new().await;
    let mut store = AuthStore::new(harness.backend(), Arc::new(harness.auth.clone()));

    harness
        .auth
        .sign_in_with_password("editor@example.com", "hunter2")
        .await
        .unwrap();

    let (tx, rx) = tokio::sync::broadcast::channel(4);
    tx.send(AuthEvent::SignedIn).unwrap();
    drop(tx);

    store.listen(rx).await;
    assert!(store.is_admin());

    let (tx, rx) = tokio::sync::broadcast::channel(4);
    tx.send(AuthEvent::SignedOut).unwrap();
    drop(tx);

    store.listen(rx).await;
    assert!(!store.is_authenticated());
}
