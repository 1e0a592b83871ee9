use inkpost_core::{
    Category, Labeled, Post, Tag, ValidationError, CATEGORY_NAME_MAX_CHARS, POST_TITLE_MAX_CHARS,
    TAG_NAME_MAX_CHARS,
};
use uuid::Uuid;

fn sample_post() -> Post {
    Post {
        id: 1,
        title: "Hello".to_string(),
        body: "body text".to_string(),
        excerpt: String::new(),
        category_id: 1,
        author_id: Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap(),
        created_at: 1_700_000_000_000,
        updated_at: 1_700_000_000_000,
        tags: vec![1, 2],
    }
}

#[test]
fn labels_render_name_or_title() {
    let category = Category {
        id: 1,
        name: "Tech".to_string(),
    };
    let tag = Tag {
        id: 1,
        name: "django".to_string(),
    };
    let post = sample_post();

    assert_eq!(category.label(), "Tech");
    assert_eq!(tag.label(), "django");
    assert_eq!(post.label(), "Hello");
}

#[test]
fn name_validation_counts_chars_not_bytes() {
    let max_name: String = "é".repeat(CATEGORY_NAME_MAX_CHARS);
    assert!(Category::validate_name(&max_name).is_ok());
    assert!(Tag::validate_name(&"é".repeat(TAG_NAME_MAX_CHARS)).is_ok());

    let too_long: String = "é".repeat(CATEGORY_NAME_MAX_CHARS + 1);
    assert_eq!(
        Category::validate_name(&too_long).unwrap_err(),
        ValidationError::CategoryNameTooLong {
            chars: CATEGORY_NAME_MAX_CHARS + 1
        }
    );
    assert_eq!(
        Tag::validate_name(&too_long).unwrap_err(),
        ValidationError::TagNameTooLong {
            chars: TAG_NAME_MAX_CHARS + 1
        }
    );
}

#[test]
fn post_validate_rejects_overlong_title() {
    let mut post = sample_post();
    post.title = "t".repeat(POST_TITLE_MAX_CHARS + 1);

    assert_eq!(
        post.validate().unwrap_err(),
        ValidationError::TitleTooLong {
            chars: POST_TITLE_MAX_CHARS + 1
        }
    );
}

#[test]
fn post_validate_rejects_nil_author() {
    let mut post = sample_post();
    post.author_id = Uuid::nil();

    assert_eq!(post.validate().unwrap_err(), ValidationError::NilAuthor);
}

#[test]
fn post_validate_rejects_duplicate_tag_refs() {
    let mut post = sample_post();
    post.tags = vec![3, 5, 3];

    assert_eq!(
        post.validate().unwrap_err(),
        ValidationError::DuplicateTag(3)
    );
}

#[test]
fn post_validate_rejects_reversed_timestamps() {
    let mut post = sample_post();
    post.created_at = 2_000;
    post.updated_at = 1_000;

    assert_eq!(
        post.validate().unwrap_err(),
        ValidationError::TimestampOrder {
            created_at: 2_000,
            updated_at: 1_000,
        }
    );
}

#[test]
fn post_serialization_uses_expected_wire_fields() {
    let post = sample_post();

    let json = serde_json::to_value(&post).unwrap();
    assert_eq!(json["id"], 1);
    assert_eq!(json["title"], "Hello");
    assert_eq!(json["category"], 1);
    assert_eq!(json["author"], post.author_id.to_string());
    assert_eq!(json["created_time"], 1_700_000_000_000_i64);
    assert_eq!(json["modified_time"], 1_700_000_000_000_i64);
    assert_eq!(json["tags"], serde_json::json!([1, 2]));

    let decoded: Post = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, post);
}

#[test]
fn deserialize_rejects_reversed_timestamps() {
    let value = serde_json::json!({
        "id": 9,
        "title": "bad clock",
        "body": "text",
        "excerpt": "",
        "category": 1,
        "author": "11111111-2222-4333-8444-555555555555",
        "created_time": 200,
        "modified_time": 100,
        "tags": []
    });

    let err = serde_json::from_value::<Post>(value).unwrap_err();
    assert!(
        err.to_string()
            .contains("updated_at (100) must be >= created_at (200)"),
        "unexpected error: {err}"
    );
}

#[test]
fn deserialize_rejects_duplicate_tags() {
    let value = serde_json::json!({
        "id": 9,
        "title": "double tagged",
        "body": "text",
        "excerpt": "",
        "category": 1,
        "author": "11111111-2222-4333-8444-555555555555",
        "created_time": 100,
        "modified_time": 100,
        "tags": [7, 7]
    });

    let err = serde_json::from_value::<Post>(value).unwrap_err();
    assert!(
        err.to_string().contains("duplicate tag reference: 7"),
        "unexpected error: {err}"
    );
}
