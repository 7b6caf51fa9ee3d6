//! CRUD Demonstration
//!
//! Walks one entity through its lifecycle against an in-memory SQLite store:
//! table creation, insert, cached lookup, update with cache invalidation,
//! relation hydration and delete.
//!
//! Pass a TOML file path as the first argument to override the defaults.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use rowmap_core::logging_facility::{self, Profile};
use rowmap_core::{Entity, MappingBuilder, OrmConfig};
use rowmap_engine::Orm;

#[derive(Debug, Clone, Default)]
struct Book {
    id: i64,
    author_id: i64,
    title: String,
}

impl Entity for Book {
    fn mapping() -> MappingBuilder<Self> {
        MappingBuilder::for_table("books")
            .primary_key("id", "id", |b: &Book| b.id, |b, v| b.id = v)
            .column("author_id", "author_id", |b: &Book| b.author_id, |b, v| b.author_id = v)
            .column("title", "title", |b: &Book| b.title.clone(), |b, v| b.title = v)
    }
}

#[derive(Debug, Clone, Default)]
struct Author {
    id: i64,
    name: String,
    born: i32,
    books: Vec<Book>,
}

impl Entity for Author {
    fn mapping() -> MappingBuilder<Self> {
        MappingBuilder::for_table("authors")
            .primary_key("id", "id", |a: &Author| a.id, |a, v| a.id = v)
            .column("name", "name", |a: &Author| a.name.clone(), |a, v| a.name = v)
            .column("born", "born", |a: &Author| a.born, |a, v| a.born = v)
            .relation::<Book, _>("books", "books", "author_id", |a, books| a.books = books)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => OrmConfig::from_file(path)?,
        None => OrmConfig::default(),
    };
    logging_facility::init(config.logging.profile);
    if config.logging.profile == Profile::Test {
        println!("(logging disabled by test profile)");
    }

    let orm = Orm::open(&config)?;
    println!("=== rowmap CRUD Demo ===\n");

    println!("create authors: {}", orm.generate_table::<Author>()?);
    println!("create books:   {}", orm.generate_table::<Book>()?);

    let id = orm.insert(&Author {
        name: "Ursula".to_string(),
        born: 1929,
        ..Author::default()
    })?;
    for title in ["A Wizard of Earthsea", "The Dispossessed"] {
        orm.insert(&Book {
            author_id: id,
            title: title.to_string(),
            ..Book::default()
        })?;
    }

    let mut author = orm.query_by_key::<Author>(id)?.expect("author was inserted");
    println!("\nloaded {} with {} books", author.name, author.books.len());
    println!("cached entries: {}", orm.cache().count());

    author.born = 1930;
    println!("\nupdated: {}", orm.update(&author)?);
    println!("cached entries: {}", orm.cache().count());

    let books: Vec<Book> = orm.query_many_related("books", "author_id", id)?;
    for book in &books {
        println!("  - {}", book.title);
    }

    println!("\ndeleted: {}", orm.delete::<Author>(id)?);
    println!("lookup after delete: {:?}", orm.query_by_key::<Author>(id)?.map(|a| a.name));

    orm.into_store().close()?;
    Ok(())
}
