//! Built-in catalog and users for running without any configuration.

use stockroom_auth::{Actor, Role};
use stockroom_core::{Money, UserId};
use stockroom_infra::SeedFile;
use stockroom_inventory::NewProduct;

pub fn catalog() -> SeedFile {
    SeedFile::Catalog(vec![
        NewProduct::new("Laptop Dell XPS 13", Money::from_cents(129_999), 15, 5)
            .with_description("High-end ultrabook")
            .with_category("Electronics"),
        NewProduct::new("Mouse Logitech MX Master", Money::from_cents(9_999), 3, 10)
            .with_description("Ergonomic wireless mouse")
            .with_category("Accessories"),
        NewProduct::new("Monitor Samsung 27\"", Money::from_cents(39_999), 8, 5)
            .with_description("4K monitor for professionals")
            .with_category("Monitors"),
        NewProduct::new("Mechanical Keyboard", Money::from_cents(14_999), 25, 15)
            .with_description("RGB mechanical keyboard")
            .with_category("Accessories"),
    ])
}

pub fn users() -> Vec<Actor> {
    vec![
        Actor::new(UserId::new(1), "admin", Role::Admin),
        Actor::new(UserId::new(2), "user", Role::User),
        Actor::new(UserId::new(3), "manager", Role::User),
    ]
}

pub fn find_user(username: &str) -> Option<Actor> {
    users().into_iter().find(|u| u.username == username)
}
