use inkpost_core::db::open_db_in_memory;
use inkpost_core::model::category::CategoryId;
use inkpost_core::model::tag::TagId;
use inkpost_core::{
    PostDraft, PostService, PostServiceError, SqlitePostRepository, SqliteTaxonomyRepository,
    TaxonomyService, ValidationError,
};
use rusqlite::Connection;
use uuid::Uuid;

fn seed_category(conn: &mut Connection, name: &str) -> CategoryId {
    let repo = SqliteTaxonomyRepository::new(conn);
    TaxonomyService::new(repo).create_category(name).unwrap().id
}

fn seed_tag(conn: &mut Connection, name: &str) -> TagId {
    let repo = SqliteTaxonomyRepository::new(conn);
    TaxonomyService::new(repo).create_tag(name).unwrap().id
}

fn seed_post(conn: &mut Connection, title: &str, category: CategoryId) -> i64 {
    let repo = SqlitePostRepository::new(conn);
    let mut service = PostService::new(repo);
    service
        .create_post(PostDraft {
            title: title.to_string(),
            body: "body".to_string(),
            excerpt: None,
            category: Some(category),
            author: Some(Uuid::new_v4()),
            tags: Vec::new(),
        })
        .unwrap()
        .id
}

#[test]
fn set_post_tags_replaces_the_whole_set() {
    let mut conn = open_db_in_memory().unwrap();
    let tech = seed_category(&mut conn, "Tech");
    let rust = seed_tag(&mut conn, "rust");
    let web = seed_tag(&mut conn, "web");
    let post_id = seed_post(&mut conn, "tagged", tech);

    let repo = SqlitePostRepository::new(&mut conn);
    let mut service = PostService::new(repo);

    let after_first = service.set_post_tags(post_id, vec![rust, web]).unwrap();
    let mut expected = vec![rust, web];
    expected.sort_unstable();
    assert_eq!(after_first.tags, expected);

    let after_replace = service.set_post_tags(post_id, vec![web]).unwrap();
    assert_eq!(after_replace.tags, vec![web]);

    let cleared = service.set_post_tags(post_id, Vec::new()).unwrap();
    assert!(cleared.tags.is_empty());
}

#[test]
fn duplicate_tag_entries_in_one_list_are_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let tech = seed_category(&mut conn, "Tech");
    let rust = seed_tag(&mut conn, "rust");
    let post_id = seed_post(&mut conn, "tagged", tech);

    let repo = SqlitePostRepository::new(&mut conn);
    let mut service = PostService::new(repo);

    let err = service.set_post_tags(post_id, vec![rust, rust]).unwrap_err();
    assert!(matches!(
        err,
        PostServiceError::Validation(ValidationError::DuplicateTag(id)) if id == rust
    ));

    let err = service
        .create_post(PostDraft {
            title: "doubled".to_string(),
            body: "body".to_string(),
            excerpt: None,
            category: Some(tech),
            author: Some(Uuid::new_v4()),
            tags: vec![rust, rust],
        })
        .unwrap_err();
    assert!(matches!(
        err,
        PostServiceError::Validation(ValidationError::DuplicateTag(id)) if id == rust
    ));
}

#[test]
fn attaching_the_same_tag_twice_keeps_it_exactly_once() {
    let mut conn = open_db_in_memory().unwrap();
    let tech = seed_category(&mut conn, "Tech");
    let rust = seed_tag(&mut conn, "rust");
    let post_id = seed_post(&mut conn, "tagged", tech);

    let repo = SqlitePostRepository::new(&mut conn);
    let mut service = PostService::new(repo);

    let after_first = service.add_post_tag(post_id, rust).unwrap();
    assert_eq!(after_first.tags, vec![rust]);

    let after_second = service.add_post_tag(post_id, rust).unwrap();
    assert_eq!(after_second.tags, vec![rust]);
}

#[test]
fn detaching_tags_is_idempotent() {
    let mut conn = open_db_in_memory().unwrap();
    let tech = seed_category(&mut conn, "Tech");
    let rust = seed_tag(&mut conn, "rust");
    let post_id = seed_post(&mut conn, "tagged", tech);

    let repo = SqlitePostRepository::new(&mut conn);
    let mut service = PostService::new(repo);

    service.add_post_tag(post_id, rust).unwrap();
    let detached = service.remove_post_tag(post_id, rust).unwrap();
    assert!(detached.tags.is_empty());

    let detached_again = service.remove_post_tag(post_id, rust).unwrap();
    assert!(detached_again.tags.is_empty());
}

#[test]
fn tag_operations_on_missing_posts_or_tags_report_the_reference() {
    let mut conn = open_db_in_memory().unwrap();
    let tech = seed_category(&mut conn, "Tech");
    let rust = seed_tag(&mut conn, "rust");
    let post_id = seed_post(&mut conn, "tagged", tech);

    let repo = SqlitePostRepository::new(&mut conn);
    let mut service = PostService::new(repo);

    let err = service.set_post_tags(999, vec![rust]).unwrap_err();
    assert!(matches!(err, PostServiceError::PostNotFound(999)));

    let err = service.add_post_tag(post_id, 999).unwrap_err();
    assert!(matches!(err, PostServiceError::UnknownTag(999)));
}

#[test]
fn listing_filters_by_tag() {
    let mut conn = open_db_in_memory().unwrap();
    let tech = seed_category(&mut conn, "Tech");
    let rust = seed_tag(&mut conn, "rust");
    let tagged_post = seed_post(&mut conn, "tagged", tech);
    let plain_post = seed_post(&mut conn, "plain", tech);

    let repo = SqlitePostRepository::new(&mut conn);
    let mut service = PostService::new(repo);
    service.add_post_tag(tagged_post, rust).unwrap();

    let filtered = service.list_posts(None, Some(rust), Some(10), 0).unwrap();
    assert_eq!(filtered.items.len(), 1);
    assert_eq!(filtered.items[0].id, tagged_post);

    let all = service.list_posts(None, None, Some(10), 0).unwrap();
    assert_eq!(all.items.len(), 2);
    assert!(all.items.iter().any(|post| post.id == plain_post));
}

#[test]
fn deleting_a_tag_detaches_it_from_posts() {
    let mut conn = open_db_in_memory().unwrap();
    let tech = seed_category(&mut conn, "Tech");
    let rust = seed_tag(&mut conn, "rust");
    let post_id = seed_post(&mut conn, "tagged", tech);

    {
        let repo = SqlitePostRepository::new(&mut conn);
        let mut service = PostService::new(repo);
        service.add_post_tag(post_id, rust).unwrap();
    }

    {
        let repo = SqliteTaxonomyRepository::new(&mut conn);
        TaxonomyService::new(repo).delete_tag(rust).unwrap();
    }

    let repo = SqlitePostRepository::new(&mut conn);
    let service = PostService::new(repo);
    let post = service.get_post(post_id).unwrap().unwrap();
    assert!(post.tags.is_empty());
}
