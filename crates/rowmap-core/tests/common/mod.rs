#![allow(dead_code)]

use rowmap_core::{Entity, MappingBuilder, Row, Value};

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

/// No table name declared
#[derive(Debug, Clone, Default)]
pub struct Untabled {
    pub id: i64,
}

impl Entity for Untabled {
    fn mapping() -> MappingBuilder<Self> {
        MappingBuilder::new().primary_key("id", "id", |u: &Untabled| u.id, |u, v| u.id = v)
    }
}

/// Two primary-key columns
#[derive(Debug, Clone, Default)]
pub struct TwoKeys {
    pub a: i64,
    pub b: i64,
}

impl Entity for TwoKeys {
    fn mapping() -> MappingBuilder<Self> {
        MappingBuilder::for_table("two_keys")
            .primary_key("a", "a", |t: &TwoKeys| t.a, |t, v| t.a = v)
            .primary_key("b", "b", |t: &TwoKeys| t.b, |t, v| t.b = v)
    }
}

/// Same column declared twice
#[derive(Debug, Clone, Default)]
pub struct Duplicated {
    pub id: i64,
    pub name: String,
    pub alias: String,
}

impl Entity for Duplicated {
    fn mapping() -> MappingBuilder<Self> {
        MappingBuilder::for_table("duplicated")
            .primary_key("id", "id", |d: &Duplicated| d.id, |d, v| d.id = v)
            .column("name", "name", |d: &Duplicated| d.name.clone(), |d, v| d.name = v)
            .column("alias", "NAME", |d: &Duplicated| d.alias.clone(), |d, v| d.alias = v)
    }
}

pub fn user_row(id: i64, name: &str, age: i64) -> Row {
    Row::from_pairs([
        ("id", Value::Integer(id)),
        ("name", Value::from(name)),
        ("age", Value::Integer(age)),
    ])
}
