use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use quill_forms::{Field, Form, Rule};
use quill_kit::{dates, markdown, ToastQueue};
use quill_store::{
    admin_guard, AuthStore, AuthView, Backend, CommentStore, CommentView, Config, MemoryAuth,
    MemoryBackend, NavigationPolicy, Outcome, PostStore, PostView, RecordingNavigator, Row, Table,
};
use serde_json::json;

const ADMIN_ID: &str = "demo-admin";
const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "correct-horse";

fn row(value: serde_json::Value) -> Row {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Row::new(),
    }
}

async fn seed(backend: &MemoryBackend, auth: &MemoryAuth) {
    auth.add_user(ADMIN_ID, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    backend
        .seed(
            Table::Profiles,
            vec![row(json!({
                "id": ADMIN_ID,
                "name": "Demo Admin",
                "email": ADMIN_EMAIL,
                "role": "admin"
            }))],
        )
        .await;
    backend
        .seed(
            Table::Posts,
            vec![row(json!({
                "id": "welcome",
                "title": "Welcome to Quill",
                "content": "This is the **first** post.\nIt was seeded by the demo.",
                "author_id": ADMIN_ID,
                "published": true,
                "created_at": "2024-01-01T09:00:00Z"
            }))],
        )
        .await;
}

fn post_form() -> Form {
    Form::new()
        .field("title", Field::new("").required().rules(vec![Rule::max_length(120)]))
        .field("content", Field::new("").required().rules(vec![Rule::min_length(10)]))
}

fn step(label: &str, outcome: &Outcome, nav: &mut RecordingNavigator) {
    outcome.apply(nav);
    let mark = if outcome.ok { "✓".green() } else { "✗".red() };
    match &outcome.redirect {
        Some(redirect) => println!("  {} {} → {}", mark, label, redirect.location.cyan()),
        None => println!("  {} {}", mark, label),
    }
}

pub async fn execute(config: &Config, persist: bool) -> Result<()> {
    println!("{}", "Running demo admin session...".green().bold());
    println!();

    let backend = MemoryBackend::new();
    let auth = MemoryAuth::new();
    seed(&backend, &auth).await;

    let shared: Arc<dyn Backend> = Arc::new(backend.clone());
    let policy = NavigationPolicy::from_config(&config.navigation);
    let mut nav = RecordingNavigator::new();
    let mut toasts = ToastQueue::new(std::time::Duration::from_millis(config.ui.toast_duration_ms));

    // Guard before sign-in
    let mut auth_view = AuthView::new(AuthStore::new(shared.clone(), Arc::new(auth.clone())), policy.clone());
    if let Some(redirect) = admin_guard(&policy.posts, auth_view.store(), &policy) {
        println!("  {} guard sends anonymous visitor to {}", "•".yellow(), redirect.location.cyan());
    }

    let mut auth_events = auth_view.store().subscribe();

    // Wrong password, then the right one
    if let Err(err) = auth_view.login(ADMIN_EMAIL, "wrong").await {
        toasts.error(err.to_string());
        println!("  {} login rejected: {}", "✗".red(), err);
    }
    let outcome = auth_view
        .login(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .context("demo admin could not sign in")?;
    step("login", &outcome, &mut nav);
    toasts.success("Signed in");

    // Post list
    let mut posts = PostView::new(PostStore::new(shared.clone()), policy.clone());
    step("load posts", &posts.load().await, &mut nav);

    // Create through a validated form: first attempt is blocked
    let mut form = post_form();
    form.set_value("title", "Shipping Quill");
    form.set_value("content", "short");
    let blocked = form.submit(|_| async { Ok::<(), String>(()) }).await;
    if !blocked {
        println!(
            "  {} form blocked: {} ({})",
            "✗".red(),
            form.submit_error().unwrap_or_default(),
            form.error("content").unwrap_or_default()
        );
    }

    form.set_value(
        "content",
        "# Shipping\n\nForms, stores and guards now live in *plain Rust*.\n\n```rust\nlet form = Form::new();\n```",
    );
    let mut created = Outcome::failure();
    let view = &mut posts;
    let slot = &mut created;
    form.submit(move |values| async move {
        let title = values.text("title").unwrap_or_default().to_string();
        let content = values.text("content").unwrap_or_default().to_string();
        *slot = view.create(&title, &content, ADMIN_ID).await;
        match view.error() {
            Some(err) => Err(err.to_string()),
            None => Ok(()),
        }
    })
    .await;
    step("create post", &created, &mut nav);

    let new_id = posts
        .current()
        .map(|post| post.id.clone())
        .context("created post missing from store")?;
    step("publish", &posts.toggle_publish(&new_id).await, &mut nav);
    step("toggle unknown post", &posts.toggle_publish("missing").await, &mut nav);
    if let Some(err) = posts.error() {
        toasts.warning(err.to_string());
    }

    // Comments
    let mut comments = CommentView::new(CommentStore::new(shared.clone()));
    step("add comment", &comments.add("Great news!", &new_id, ADMIN_ID).await, &mut nav);
    step("load comments", &comments.load(&new_id).await, &mut nav);

    // Summary
    println!();
    println!("{}", "Posts".cyan().bold());
    let now = chrono::Utc::now();
    for post in posts.posts() {
        let when = post
            .created_at
            .map(|at| dates::format_relative_time(&at, &now))
            .unwrap_or_default();
        println!(
            "  {} {} ({} min read, {}) {}",
            if post.published { "●".green() } else { "○".yellow() },
            post.title.bold(),
            markdown::estimate_reading_time(&post.content),
            when,
            markdown::extract_excerpt(&post.content, config.ui.excerpt_length).dimmed()
        );
    }
    println!("  {} comment(s) on {}", comments.comments_for(&new_id).len(), new_id);

    if persist {
        let storage = config.open_storage().await?;
        auth_view
            .store()
            .persist(&storage)
            .await
            .context("failed to persist auth state")?;
        println!(
            "  {} profile saved under {}:{} ({})",
            "✓".green(),
            storage.prefix(),
            quill_store::stores::auth::PERSIST_KEY,
            storage.driver_name()
        );
    }

    step("logout", &auth_view.logout().await, &mut nav);
    let applied = auth_view.store_mut().drain_events(&mut auth_events).await;
    println!("  {} {} auth event(s) replayed", "•".yellow(), applied);

    println!();
    println!("{}", "Toasts".cyan().bold());
    for toast in toasts.toasts() {
        println!("  [{:?}] {}", toast.kind, toast.message);
    }
    println!();
    println!(
        "Navigation history: {}",
        nav.history
            .iter()
            .map(|r| r.location.as_str())
            .collect::<Vec<_>>()
            .join(" → ")
    );

    tracing::debug!("demo finished with {} redirect(s)", nav.history.len());
    Ok(())
}
