//! Runs the SQL path against a real Postgres. Ignored by default:
//! `DATABASE_URL=postgres://... cargo test -- --ignored`

use intellsys_portal::{
    AppConfig, Database, HostedClients, StoreRepository,
    models::{BlogInput, CapabilityInput, WorkInput},
    repository::Repository,
};
use serial_test::serial;
use sqlx::PgPool;

// --- Test Context and Setup ---

struct DbTestContext {
    pool: PgPool,
}

impl DbTestContext {
    async fn setup() -> Self {
        dotenv::dotenv().ok();

        let db_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set to run integration tests");

        let pool = PgPool::connect(&db_url)
            .await
            .expect("Failed to connect to database for integration tests.");

        sqlx::raw_sql(include_str!("../migrations/0001_create_site_tables.sql"))
            .execute(&pool)
            .await
            .expect("Failed to apply schema.");

        DbTestContext { pool }
    }

    fn repository(&self) -> StoreRepository {
        // Hosted clients are built but never called by the SQL-path tests.
        StoreRepository::new(
            Database::from_pool(self.pool.clone()),
            HostedClients::new(&AppConfig::default()),
        )
    }
}

fn blog(title: &str, top_featured: bool) -> BlogInput {
    BlogInput {
        title: title.to_string(),
        top_featured,
        ..Default::default()
    }
}

// --- Tests ---

#[tokio::test]
#[ignore]
#[serial]
async fn test_top_featured_single_holder() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();

    let first = repo.create_blog(blog("repo-test first", true)).await.unwrap();
    let second = repo.create_blog(blog("repo-test second", true)).await.unwrap();

    let holders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blogs WHERE top_featured")
        .fetch_one(&ctx.pool)
        .await
        .unwrap();
    assert_eq!(holders, 1);
    assert_eq!(repo.top_featured_blog().await.unwrap().unwrap().id, second.id);

    // Promoting the first again demotes the second.
    repo.replace_blog(first.id, blog("repo-test first", true))
        .await
        .unwrap()
        .unwrap();
    let second_now = repo.get_blog(second.id).await.unwrap().unwrap();
    assert!(!second_now.top_featured);

    assert!(repo.delete_blog(first.id).await.unwrap());
    assert!(repo.delete_blog(second.id).await.unwrap());
    assert!(!repo.delete_blog(second.id).await.unwrap());
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_store_refuses_a_second_top_featured_post() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();

    let holder = repo.create_blog(blog("repo-test holder", true)).await.unwrap();

    // A write that skips the clearing step is stopped by the index.
    let err = sqlx::query("INSERT INTO blogs (title, top_featured) VALUES ('repo-test rogue', true)")
        .execute(&ctx.pool)
        .await
        .unwrap_err();
    let code = err
        .as_database_error()
        .and_then(|db| db.code())
        .map(|code| code.into_owned());
    assert_eq!(code.as_deref(), Some("23505"));

    // Promoting through the repository still works with the index in place.
    let next = repo.create_blog(blog("repo-test next", true)).await.unwrap();
    assert!(next.top_featured);
    assert!(!repo.get_blog(holder.id).await.unwrap().unwrap().top_featured);

    assert!(repo.delete_blog(holder.id).await.unwrap());
    assert!(repo.delete_blog(next.id).await.unwrap());
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_replace_clears_omitted_columns() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();

    let created = repo
        .create_work(WorkInput {
            title: "repo-test work".into(),
            client: Some("Acme".into()),
            featured: true,
            ..Default::default()
        })
        .await
        .unwrap();

    let replaced = repo
        .replace_work(
            created.id,
            WorkInput {
                title: "repo-test work v2".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(replaced.client, None);
    assert!(!replaced.featured);
    assert_eq!(replaced.created_at, created.created_at);
    assert!(replaced.updated_at >= created.updated_at);

    assert!(repo.delete_work(created.id).await.unwrap());
    assert!(repo.replace_work(created.id, WorkInput::default()).await.unwrap().is_none());
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_capability_features_round_trip_in_order() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();

    let created = repo
        .create_capability(CapabilityInput {
            title: "repo-test capability".into(),
            features: vec!["Stage".into(), "Sound".into(), "Light".into()],
            sort_order: -100,
            ..Default::default()
        })
        .await
        .unwrap();

    let listed = repo.list_capabilities().await.unwrap();
    assert_eq!(listed.first().map(|c| c.id), Some(created.id));
    assert_eq!(created.features, ["Stage", "Sound", "Light"]);

    assert!(repo.delete_capability(created.id).await.unwrap());
}
