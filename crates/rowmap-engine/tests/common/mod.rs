#![allow(dead_code)]

use std::sync::Arc;

use rowmap_core::{Entity, EntityCache, MappingBuilder, MappingRegistry};
use rowmap_engine::Orm;
use rowmap_store::SqliteStore;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
}

impl Entity for Post {
    fn mapping() -> MappingBuilder<Self> {
        MappingBuilder::for_table("posts")
            .primary_key("id", "id", |p: &Post| p.id, |p, v| p.id = v)
            .column("user_id", "user_id", |p: &Post| p.user_id, |p, v| p.user_id = v)
            .column("title", "title", |p: &Post| p.title.clone(), |p, v| p.title = v)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub posts: Vec<Post>,
}

impl Entity for User {
    fn mapping() -> MappingBuilder<Self> {
        MappingBuilder::for_table("users")
            .primary_key("id", "id", |u: &User| u.id, |u, v| u.id = v)
            .column("name", "name", |u: &User| u.name.clone(), |u, v| u.name = v)
            .column("age", "age", |u: &User| u.age, |u, v| u.age = v)
            .relation::<Post, _>("posts", "posts", "user_id", |u, posts| u.posts = posts)
    }
}

/// Table and columns named after SQL keywords
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ticket {
    pub id: i64,
    pub order: i32,
    pub group: String,
}

impl Entity for Ticket {
    fn mapping() -> MappingBuilder<Self> {
        MappingBuilder::for_table("order")
            .primary_key("id", "id", |t: &Ticket| t.id, |t, v| t.id = v)
            .column("order", "order", |t: &Ticket| t.order, |t, v| t.order = v)
            .column("group", "group", |t: &Ticket| t.group.clone(), |t, v| t.group = v)
    }
}

pub fn user(name: &str, age: i32) -> User {
    User {
        id: 0,
        name: name.to_string(),
        age,
        posts: Vec::new(),
    }
}

pub fn post(user_id: i64, title: &str) -> Post {
    Post {
        id: 0,
        user_id,
        title: title.to_string(),
    }
}

/// In-memory orchestrator with its own registry and cache, tables created
pub fn setup_orm() -> Orm<SqliteStore> {
    setup_orm_with_cache(Arc::new(EntityCache::new()))
}

pub fn setup_orm_with_cache(cache: Arc<EntityCache>) -> Orm<SqliteStore> {
    let store = SqliteStore::open_in_memory().unwrap();
    let orm = Orm::with_parts(store, Arc::new(MappingRegistry::new()), cache);
    assert!(orm.generate_table::<User>().unwrap());
    assert!(orm.generate_table::<Post>().unwrap());
    orm
}
