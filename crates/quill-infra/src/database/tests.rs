use std::sync::Arc;

use quill_core::CoreError;
use quill_core::domain::Category;
use quill_core::ops::{
    CatalogService, CommentPatch, CommentService, NewComment, NewPost, NewUser, PostPatch,
    PostService, ProfileImage, UserPatch, UserService, resolve_tags,
};
use quill_core::policy::Caller;
use quill_core::ports::{AuthError, FileError, FileStore, PasswordService, TagStore};
use quill_core::query::{Page, PostFilter};

use super::memory::MemoryStore;

/// Deterministic stand-in hasher; the Argon2 implementation has its own
/// tests and is too slow for these.
struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("hashed:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("hashed:{password}"))
    }
}

/// File store that keeps nothing and echoes a reference.
struct EchoFiles;

#[async_trait::async_trait]
impl FileStore for EchoFiles {
    async fn store(&self, name: &str, _bytes: &[u8]) -> Result<String, FileError> {
        Ok(format!("files/{name}"))
    }
}

struct Fixture {
    store: Arc<MemoryStore>,
    users: UserService,
    posts: PostService,
    comments: CommentService,
    catalog: CatalogService,
}

fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    Fixture {
        users: UserService::new(store.clone(), Arc::new(PlainPasswords), Arc::new(EchoFiles)),
        posts: PostService::new(store.clone(), store.clone()),
        comments: CommentService::new(store.clone()),
        catalog: CatalogService::new(store.clone()),
        store,
    }
}

fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "longenough".to_string(),
        bio: format!("{username} bio"),
        profile_picture: None,
    }
}

async fn register(fx: &Fixture, username: &str) -> Caller {
    let user = fx.users.register(None, new_user(username)).await.unwrap();
    Caller {
        id: user.id,
        username: user.username,
    }
}

fn tech_post(title: &str, tags: &[&str]) -> NewPost {
    NewPost {
        title: title.to_string(),
        body: "Body text".to_string(),
        category: Category::Technology,
        tags: tags.iter().map(|s| s.to_string()).collect(),
    }
}

mod registration {
    use super::*;

    #[tokio::test]
    async fn anonymous_registration_succeeds() {
        let fx = fixture();
        let user = fx.users.register(None, new_user("alice")).await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.password_hash, "hashed:longenough");
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let fx = fixture();
        fx.users.register(None, new_user("alice")).await.unwrap();
        let err = fx.users.register(None, new_user("alice")).await.unwrap_err();
        assert!(matches!(err, CoreError::Integrity(_)));
    }

    #[tokio::test]
    async fn authenticated_registration_is_forbidden() {
        let fx = fixture();
        let caller = register(&fx, "alice").await;
        let err = fx
            .users
            .register(Some(&caller), new_user("bob"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Forbidden));
    }

    #[tokio::test]
    async fn profile_picture_is_stored_by_reference() {
        let fx = fixture();
        let mut input = new_user("alice");
        input.profile_picture = Some(ProfileImage {
            filename: "avatar.png".to_string(),
            bytes: vec![0xFF, 0xD8],
        });
        let user = fx.users.register(None, input).await.unwrap();
        assert_eq!(user.profile_picture.as_deref(), Some("files/avatar.png"));
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let fx = fixture();
        let mut input = new_user("alice");
        input.password = "short".to_string();
        let err = fx.users.register(None, input).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn authenticate_checks_credentials() {
        let fx = fixture();
        register(&fx, "alice").await;
        assert!(fx.users.authenticate("alice", "longenough").await.is_ok());
        assert!(matches!(
            fx.users.authenticate("alice", "wrong-pass").await.unwrap_err(),
            CoreError::Unauthenticated
        ));
        assert!(matches!(
            fx.users.authenticate("nobody", "longenough").await.unwrap_err(),
            CoreError::Unauthenticated
        ));
    }
}

mod self_resource {
    use super::*;

    #[tokio::test]
    async fn me_returns_only_the_caller() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;
        register(&fx, "bob").await;

        let me = fx.users.me(Some(&alice)).await.unwrap();
        assert_eq!(me.id, alice.id);

        let err = fx.users.me(None).await.unwrap_err();
        assert!(matches!(err, CoreError::Unauthenticated));
    }

    #[tokio::test]
    async fn patching_bio_and_password() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;

        let updated = fx
            .users
            .update(
                Some(&alice),
                UserPatch {
                    bio: Some("Updated bio".to_string()),
                    password: Some("even-longer-pass".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.bio, "Updated bio");
        assert!(fx.users.authenticate("alice", "even-longer-pass").await.is_ok());
    }

    #[tokio::test]
    async fn deleting_self_cascades_to_posts_and_comments() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;
        let bob = register(&fx, "bob").await;

        let post = fx
            .posts
            .create(Some(&alice), tech_post("Alice Post", &[]))
            .await
            .unwrap();
        fx.comments
            .create(
                Some(&alice),
                NewComment {
                    post_id: post.id,
                    body: "self comment".to_string(),
                },
            )
            .await
            .unwrap();
        // Bob's comment on Alice's post dies with the post.
        fx.comments
            .create(
                Some(&bob),
                NewComment {
                    post_id: post.id,
                    body: "bob comment".to_string(),
                },
            )
            .await
            .unwrap();

        fx.users.delete(Some(&alice)).await.unwrap();

        assert!(
            fx.posts
                .list(None, PostFilter::default(), Page::default())
                .await
                .unwrap()
                .is_empty()
        );
        assert!(fx.comments.list(None, Page::default()).await.unwrap().is_empty());
    }
}

mod posts {
    use super::*;

    #[tokio::test]
    async fn create_forces_author_and_derives_slug() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;

        let post = fx
            .posts
            .create(Some(&alice), tech_post("Hello, World!", &["rust"]))
            .await
            .unwrap();
        assert_eq!(post.author_id, alice.id);
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.tags.len(), 1);
    }

    #[tokio::test]
    async fn same_title_gets_distinct_slugs() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;

        let first = fx
            .posts
            .create(Some(&alice), tech_post("Same Title", &[]))
            .await
            .unwrap();
        let second = fx
            .posts
            .create(Some(&alice), tech_post("Same Title", &[]))
            .await
            .unwrap();

        assert_eq!(first.slug, "same-title");
        assert_eq!(second.slug, "same-title-2");
    }

    #[tokio::test]
    async fn anonymous_may_read_but_not_write() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;
        let post = fx
            .posts
            .create(Some(&alice), tech_post("Public Post", &[]))
            .await
            .unwrap();

        assert_eq!(
            fx.posts
                .list(None, PostFilter::default(), Page::default())
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(fx.posts.get(None, &post.slug).await.unwrap().id, post.id);

        let err = fx
            .posts
            .create(None, tech_post("Anon Post", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Unauthenticated));
    }

    #[tokio::test]
    async fn foreign_author_gets_not_found_owner_succeeds() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;
        let bob = register(&fx, "bob").await;
        let post = fx
            .posts
            .create(Some(&alice), tech_post("Alice Post", &[]))
            .await
            .unwrap();

        let patch = PostPatch {
            title: Some("Hijacked".to_string()),
            ..Default::default()
        };
        let err = fx
            .posts
            .update(Some(&bob), &post.slug, patch.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound));
        let err = fx.posts.delete(Some(&bob), &post.slug).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound));

        let updated = fx
            .posts
            .update(Some(&alice), &post.slug, patch)
            .await
            .unwrap();
        assert_eq!(updated.title, "Hijacked");
        fx.posts.delete(Some(&alice), &post.slug).await.unwrap();
    }

    #[tokio::test]
    async fn title_update_keeps_the_slug() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;
        let post = fx
            .posts
            .create(Some(&alice), tech_post("Original Title", &[]))
            .await
            .unwrap();

        let updated = fx
            .posts
            .update(
                Some(&alice),
                &post.slug,
                PostPatch {
                    title: Some("Brand New Title".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.slug, "original-title");
    }

    #[tokio::test]
    async fn deleting_a_post_cascades_to_comments() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;
        let post = fx
            .posts
            .create(Some(&alice), tech_post("Doomed", &[]))
            .await
            .unwrap();
        fx.comments
            .create(
                Some(&alice),
                NewComment {
                    post_id: post.id,
                    body: "gone soon".to_string(),
                },
            )
            .await
            .unwrap();

        fx.posts.delete(Some(&alice), &post.slug).await.unwrap();
        assert!(fx.comments.list(None, Page::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn title_length_counts_characters_not_bytes() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;

        // 60 characters, 120 bytes; must pass the 100-character cap.
        let post = fx
            .posts
            .create(Some(&alice), tech_post(&"é".repeat(60), &[]))
            .await
            .unwrap();
        assert_eq!(post.title.chars().count(), 60);

        let err = fx
            .posts
            .create(Some(&alice), tech_post(&"é".repeat(101), &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}

mod filtering {
    use super::*;

    #[tokio::test]
    async fn category_and_tag_names_compose_without_duplicates() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;

        // Matches both tag names - must still appear exactly once.
        fx.posts
            .create(Some(&alice), tech_post("Django on the Web", &["django", "web"]))
            .await
            .unwrap();
        fx.posts
            .create(Some(&alice), tech_post("Untagged Tech", &[]))
            .await
            .unwrap();
        let mut sports = tech_post("Sports Django", &["django"]);
        sports.category = Category::Sports;
        fx.posts.create(Some(&alice), sports).await.unwrap();

        let filter = PostFilter {
            category: Some(Category::Technology),
            tag_names: Some(PostFilter::parse_tag_names("django,web")),
            ..Default::default()
        };
        let results = fx.posts.list(None, filter, Page::default()).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Django on the Web");
    }

    #[tokio::test]
    async fn search_matches_author_username() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;
        let bob = register(&fx, "bob").await;
        fx.posts
            .create(Some(&alice), tech_post("First", &[]))
            .await
            .unwrap();
        fx.posts
            .create(Some(&bob), tech_post("Second", &[]))
            .await
            .unwrap();

        let filter = PostFilter {
            search: Some("ALI".to_string()),
            ..Default::default()
        };
        let results = fx.posts.list(None, filter, Page::default()).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "First");
    }

    #[tokio::test]
    async fn listing_is_newest_first() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;
        fx.posts
            .create(Some(&alice), tech_post("Older", &[]))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        fx.posts
            .create(Some(&alice), tech_post("Newer", &[]))
            .await
            .unwrap();

        let results = fx
            .posts
            .list(None, PostFilter::default(), Page::default())
            .await
            .unwrap();
        assert_eq!(results[0].title, "Newer");
        assert_eq!(results[1].title, "Older");
    }

    #[tokio::test]
    async fn page_window_applies_after_newest_first_order() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;
        for title in ["First", "Second", "Third"] {
            fx.posts
                .create(Some(&alice), tech_post(title, &[]))
                .await
                .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let first_page = fx
            .posts
            .list(
                None,
                PostFilter::default(),
                Page {
                    limit: Some(2),
                    offset: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(first_page.len(), 2);
        assert_eq!(first_page[0].title, "Third");
        assert_eq!(first_page[1].title, "Second");

        let last_page = fx
            .posts
            .list(
                None,
                PostFilter::default(),
                Page {
                    limit: Some(2),
                    offset: Some(2),
                },
            )
            .await
            .unwrap();
        assert_eq!(last_page.len(), 1);
        assert_eq!(last_page[0].title, "First");

        let past_the_end = fx
            .posts
            .list(
                None,
                PostFilter::default(),
                Page {
                    limit: Some(2),
                    offset: Some(3),
                },
            )
            .await
            .unwrap();
        assert!(past_the_end.is_empty());
    }
}

mod comments {
    use super::*;

    #[tokio::test]
    async fn author_is_always_the_caller() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;
        let bob = register(&fx, "bob").await;
        let post = fx
            .posts
            .create(Some(&alice), tech_post("Open Post", &[]))
            .await
            .unwrap();

        // Bob comments on Alice's post; the comment belongs to Bob.
        let comment = fx
            .comments
            .create(
                Some(&bob),
                NewComment {
                    post_id: post.id,
                    body: "Nice post!".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(comment.author_id, bob.id);
    }

    #[tokio::test]
    async fn dangling_post_reference_is_an_integrity_error() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;

        let err = fx
            .comments
            .create(
                Some(&alice),
                NewComment {
                    post_id: uuid::Uuid::new_v4(),
                    body: "into the void".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Integrity(_)));
    }

    #[tokio::test]
    async fn only_the_author_may_edit_or_delete() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;
        let bob = register(&fx, "bob").await;
        let post = fx
            .posts
            .create(Some(&alice), tech_post("Post", &[]))
            .await
            .unwrap();
        let comment = fx
            .comments
            .create(
                Some(&alice),
                NewComment {
                    post_id: post.id,
                    body: "mine".to_string(),
                },
            )
            .await
            .unwrap();

        let patch = CommentPatch {
            body: Some("edited".to_string()),
        };
        let err = fx
            .comments
            .update(Some(&bob), comment.id, patch.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound));
        let err = fx.comments.delete(Some(&bob), comment.id).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound));

        let updated = fx
            .comments
            .update(Some(&alice), comment.id, patch)
            .await
            .unwrap();
        assert_eq!(updated.body, "edited");
        fx.comments.delete(Some(&alice), comment.id).await.unwrap();
    }

    #[tokio::test]
    async fn listing_is_open_and_oldest_first() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;
        let post = fx
            .posts
            .create(Some(&alice), tech_post("Post", &[]))
            .await
            .unwrap();
        for body in ["first", "second"] {
            fx.comments
                .create(
                    Some(&alice),
                    NewComment {
                        post_id: post.id,
                        body: body.to_string(),
                    },
                )
                .await
                .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let listed = fx.comments.list(None, Page::default()).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].body, "first");
        assert_eq!(listed[1].body, "second");

        let second_only = fx
            .comments
            .list(
                None,
                Page {
                    limit: Some(1),
                    offset: Some(1),
                },
            )
            .await
            .unwrap();
        assert_eq!(second_only.len(), 1);
        assert_eq!(second_only[0].body, "second");
    }
}

mod catalog {
    use super::*;

    #[tokio::test]
    async fn resolver_covers_distinct_names_once() {
        let fx = fixture();
        let names = vec![
            "rust".to_string(),
            "web".to_string(),
            "rust".to_string(),
            " rust ".to_string(),
        ];
        let resolved = resolve_tags(fx.store.as_ref() as &dyn TagStore, &names)
            .await
            .unwrap();

        let mut seen: Vec<&str> = resolved.iter().map(|t| t.name.as_str()).collect();
        seen.sort();
        assert_eq!(seen, vec!["rust", "web"]);
    }

    #[tokio::test]
    async fn resolver_reuses_existing_rows() {
        let fx = fixture();
        let first = resolve_tags(fx.store.as_ref() as &dyn TagStore, &["rust".to_string()])
            .await
            .unwrap();
        let second = resolve_tags(fx.store.as_ref() as &dyn TagStore, &["rust".to_string()])
            .await
            .unwrap();
        assert_eq!(first[0].id, second[0].id);
    }

    #[tokio::test]
    async fn tag_name_length_counts_characters_not_bytes() {
        let fx = fixture();

        let resolved = resolve_tags(fx.store.as_ref() as &dyn TagStore, &["é".repeat(15)])
            .await
            .unwrap();
        assert_eq!(resolved[0].name.chars().count(), 15);

        let err = resolve_tags(fx.store.as_ref() as &dyn TagStore, &["é".repeat(16)])
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn tag_and_category_listing_require_auth() {
        let fx = fixture();
        let alice = register(&fx, "alice").await;

        assert!(matches!(
            fx.catalog.list_tags(None, Page::default()).await.unwrap_err(),
            CoreError::Unauthenticated
        ));
        assert!(fx.catalog.list_tags(Some(&alice), Page::default()).await.is_ok());

        assert!(fx.catalog.list_categories(None).is_err());
        let categories = fx.catalog.list_categories(Some(&alice)).unwrap();
        assert_eq!(categories.len(), 7);
        assert!(categories.contains(&Category::CurrentAffairs));
    }
}

#[cfg(feature = "postgres")]
mod postgres_mock {
    use quill_core::ports::UserStore;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::database::entity::user;
    use crate::database::postgres::PostgresUserStore;

    #[tokio::test]
    async fn find_by_username_maps_the_row() {
        let user_id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user::Model {
                id: user_id,
                username: "alice".to_owned(),
                email: "alice@example.com".to_owned(),
                password_hash: "hash".to_owned(),
                bio: "bio".to_owned(),
                profile_picture: None,
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection();

        let store = PostgresUserStore::new(db);

        let found = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, user_id);
        assert_eq!(found.username, "alice");
    }
}
