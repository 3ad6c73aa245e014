use burogu::config::SecurityConfig;
use burogu::db::Store;

async fn memory_store() -> Store {
    Store::with_pool_options("sqlite::memory:", 1, 1)
        .await
        .expect("Failed to open in-memory store")
}

fn security() -> SecurityConfig {
    SecurityConfig::default()
}

#[tokio::test]
async fn test_schema_enforces_unique_username_and_email() {
    let store = memory_store().await;
    let sec = security();

    store
        .create_user("corey", "corey@example.com", "testing789", Some(&sec))
        .await
        .unwrap();

    // The repository is bypassed by handler-level checks in normal use;
    // the schema constraint is the backstop.
    let duplicate_username = store
        .create_user("corey", "other@example.com", "testing789", Some(&sec))
        .await;
    assert!(duplicate_username.is_err());

    let duplicate_email = store
        .create_user("other", "corey@example.com", "testing789", Some(&sec))
        .await;
    assert!(duplicate_email.is_err());
}

#[tokio::test]
async fn test_password_verification() {
    let store = memory_store().await;
    let sec = security();

    let created = store
        .create_user("corey", "corey@example.com", "testing789", Some(&sec))
        .await
        .unwrap();
    assert_eq!(created.image_file, "default.png");

    let user = store
        .verify_user_password("corey@example.com", "testing789")
        .await
        .unwrap();
    assert_eq!(user.map(|u| u.id), Some(created.id));

    let wrong = store
        .verify_user_password("corey@example.com", "wrongpassword")
        .await
        .unwrap();
    assert!(wrong.is_none());

    let unknown = store
        .verify_user_password("nobody@example.com", "testing789")
        .await
        .unwrap();
    assert!(unknown.is_none());
}

#[tokio::test]
async fn test_password_update_invalidates_old_password() {
    let store = memory_store().await;
    let sec = security();

    let user = store
        .create_user("corey", "corey@example.com", "oldpassword1", Some(&sec))
        .await
        .unwrap();

    store
        .update_user_password(user.id, "newpassword1", Some(&sec))
        .await
        .unwrap();

    assert!(
        store
            .verify_user_password("corey@example.com", "oldpassword1")
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        store
            .verify_user_password("corey@example.com", "newpassword1")
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_user_posts_page_order_and_bounds() {
    let store = memory_store().await;
    let sec = security();

    let user = store
        .create_user("alice", "alice@example.com", "testing789", Some(&sec))
        .await
        .unwrap();

    for i in 1..=6 {
        store
            .create_post(user.id, &format!("post-{i}"), "content")
            .await
            .unwrap();
    }

    let first = store.user_posts_page(user.id, 1, 5).await.unwrap();
    assert_eq!(first.total_items, 6);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.posts.len(), 5);
    assert_eq!(first.posts[0].title, "post-6");
    assert_eq!(first.posts[0].author.as_deref(), Some("alice"));

    let second = store.user_posts_page(user.id, 2, 5).await.unwrap();
    assert_eq!(second.posts.len(), 1);
    assert_eq!(second.posts[0].title, "post-1");

    // Past the end: empty page, same totals
    let third = store.user_posts_page(user.id, 3, 5).await.unwrap();
    assert!(third.posts.is_empty());
    assert_eq!(third.total_pages, 2);
}

#[tokio::test]
async fn test_feed_interleaves_users_newest_first() {
    let store = memory_store().await;
    let sec = security();

    let alice = store
        .create_user("alice", "alice@example.com", "testing789", Some(&sec))
        .await
        .unwrap();
    let bob = store
        .create_user("bob", "bob@example.com", "testing789", Some(&sec))
        .await
        .unwrap();

    store.create_post(alice.id, "from-alice", "a").await.unwrap();
    store.create_post(bob.id, "from-bob", "b").await.unwrap();

    let feed = store.post_feed_page(1, 5).await.unwrap();
    assert_eq!(feed.total_items, 2);
    assert_eq!(feed.posts[0].title, "from-bob");
    assert_eq!(feed.posts[1].title, "from-alice");

    // Per-user pages only contain that user's posts
    let alices = store.user_posts_page(alice.id, 1, 5).await.unwrap();
    assert_eq!(alices.total_items, 1);
    assert_eq!(alices.posts[0].title, "from-alice");
}

#[tokio::test]
async fn test_deleting_user_cascades_to_posts() {
    use sea_orm::EntityTrait;

    let store = memory_store().await;
    let sec = security();

    let user = store
        .create_user("alice", "alice@example.com", "testing789", Some(&sec))
        .await
        .unwrap();
    store.create_post(user.id, "post", "content").await.unwrap();

    burogu::entities::users::Entity::delete_by_id(user.id)
        .exec(&store.conn)
        .await
        .unwrap();

    assert_eq!(store.count_posts().await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_image_returns_previous_filename() {
    let store = memory_store().await;
    let sec = security();

    let user = store
        .create_user("alice", "alice@example.com", "testing789", Some(&sec))
        .await
        .unwrap();

    let previous = store.update_user_image(user.id, "abc123.png").await.unwrap();
    assert_eq!(previous, "default.png");

    let previous = store.update_user_image(user.id, "def456.jpg").await.unwrap();
    assert_eq!(previous, "abc123.png");
}
