//! Name value object and the person that carries it.
//!
//! `Name` compares by value. `Person` is a mutable holder, and
//! `SharedPerson` is a handle through which several owners see and change
//! the same person.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

/// A person's name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name {
    first_name: String,
    surname: String,
}

impl Name {
    pub fn new(first_name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            surname: surname.into(),
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn surname(&self) -> &str {
        &self.surname
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.first_name, self.surname)
    }
}

/// A person whose name can change over time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    name: Name,
}

impl Person {
    pub fn new(name: Name) -> Self {
        Self { name }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn rename(&mut self, name: Name) {
        self.name = name;
    }
}

/// Reference-counted handle to a single `Person`.
///
/// Cloning the handle aliases the person: a rename through one clone is
/// visible through every other.
#[derive(Debug, Clone)]
pub struct SharedPerson(Arc<RwLock<Person>>);

impl SharedPerson {
    pub fn new(person: Person) -> Self {
        Self(Arc::new(RwLock::new(person)))
    }

    /// Returns a copy of the current name.
    pub fn name(&self) -> Name {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .name()
            .clone()
    }

    /// Renames the underlying person for every holder of this handle.
    pub fn rename(&self, name: Name) {
        self.0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .rename(name);
    }

    /// Returns true if both handles point at the same person.
    pub fn is_same(&self, other: &SharedPerson) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Person> for SharedPerson {
    fn from(person: Person) -> Self {
        Self::new(person)
    }
}
