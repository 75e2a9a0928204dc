//! Command handlers.
//!
//! [`CommandContext::open`] builds the store, repository and controller once
//! per invocation.

use anyhow::Context as _;
use people_store::config::PeopleStoreConfig;
use people_store::observability::EventBus;
use people_store::storage::{JsonFileStore, Seed};
use people_store::{PeopleController, Person, PersonRepository};
use std::sync::Arc;

/// Sort key for `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortKey {
    /// By first name.
    First,
    /// By last name.
    Last,
}

/// Everything a command needs.
pub struct CommandContext {
    controller: PeopleController<JsonFileStore<Seed>>,
}

impl CommandContext {
    /// Opens and initializes the configured store.
    pub fn open(config: &PeopleStoreConfig) -> anyhow::Result<Self> {
        let store = JsonFileStore::new(config.store.clone(), Seed)
            .context("failed to open the store directory")?;
        let repository = PersonRepository::new(store);
        repository
            .initialize()
            .context("failed to initialize the store")?;

        let controller =
            PeopleController::on_current_runtime(Arc::new(repository), EventBus::default())?;
        Ok(Self { controller })
    }
}

/// List command.
pub fn cmd_list(ctx: &CommandContext, sort: SortKey) -> anyhow::Result<()> {
    let people = match sort {
        SortKey::First => ctx.controller.fetch()?.people,
        SortKey::Last => ctx
            .controller
            .repository()
            .get_all_sorted_by(|p| Some(p.last_name.as_str()))?,
    };

    println!("{} people:", people.len());
    for person in &people {
        println!("  {}  {}", person.id, person.full_name());
    }
    Ok(())
}

/// Show command.
pub fn cmd_show(ctx: &CommandContext, id: &str) -> anyhow::Result<()> {
    let person = ctx.controller.fetch_by_id(id)?;
    print_person(&person);
    Ok(())
}

/// Add command.
pub fn cmd_add(
    ctx: &CommandContext,
    first: String,
    last: String,
    email: Option<String>,
    phone: Option<String>,
) -> anyhow::Result<()> {
    let mut person = Person::new(first, last);
    if let Some(email) = email {
        person = person.with_email(email);
    }
    if let Some(phone) = phone {
        person = person.with_phone(phone);
    }

    ctx.controller.create(person.clone())?;
    println!("Added:");
    print_person(&person);
    Ok(())
}

/// Update command.
pub fn cmd_update(
    ctx: &CommandContext,
    id: &str,
    first: Option<String>,
    last: Option<String>,
    email: Option<String>,
    phone: Option<String>,
) -> anyhow::Result<()> {
    let mut person = ctx.controller.fetch_by_id(id)?;
    if let Some(first) = first {
        person.first_name = first.trim().to_string();
    }
    if let Some(last) = last {
        person.last_name = last.trim().to_string();
    }
    if let Some(email) = email {
        person = person.with_email(email);
    }
    if let Some(phone) = phone {
        person = person.with_phone(phone);
    }

    ctx.controller.update(person.clone())?;
    println!("Updated:");
    print_person(&person);
    Ok(())
}

/// Remove command.
pub fn cmd_remove(ctx: &CommandContext, id: &str) -> anyhow::Result<()> {
    let person = ctx.controller.fetch_by_id(id)?;
    ctx.controller.remove(&person)?;
    println!("Removed {} ({})", person.full_name(), person.id);
    Ok(())
}

fn print_person(person: &Person) {
    println!("  ID:    {}", person.id);
    println!("  Name:  {}", person.full_name());
    if let Some(email) = &person.email {
        println!("  Email: {email}");
    }
    if let Some(phone) = &person.phone {
        println!("  Phone: {phone}");
    }
}
