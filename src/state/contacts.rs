//! Emergency contacts store

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ContactError;

/// A person (or service) to notify in an emergency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: u64,
    pub name: String,
    pub phone: String,
    pub is_primary: bool,
}

#[derive(Debug)]
struct Book {
    contacts: Vec<Contact>,
    next_id: u64,
}

/// In-memory list of emergency contacts. Nothing here is persisted.
#[derive(Debug)]
pub struct ContactsStore {
    book: Mutex<Book>,
}

fn validated(name: &str, phone: &str) -> Result<(String, String), ContactError> {
    let (name, phone) = (name.trim(), phone.trim());
    if name.is_empty() || phone.is_empty() {
        return Err(ContactError::MissingField);
    }
    Ok((name.to_string(), phone.to_string()))
}

impl ContactsStore {
    /// Create a store seeded with the local emergency number as primary contact
    pub fn new(emergency_number: &str) -> Self {
        Self::with_contacts(vec![Contact {
            id: 1,
            name: "Emergency Services".to_string(),
            phone: emergency_number.to_string(),
            is_primary: true,
        }])
    }

    /// Create a store from an existing list
    pub fn with_contacts(contacts: Vec<Contact>) -> Self {
        let next_id = contacts.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        Self {
            book: Mutex::new(Book { contacts, next_id }),
        }
    }

    fn book(&self) -> std::sync::MutexGuard<'_, Book> {
        // A panic while holding the lock cannot leave the list half-edited
        self.book.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Read-only copy of all contacts
    pub fn snapshot(&self) -> Vec<Contact> {
        self.book().contacts.clone()
    }

    /// Add a new, non-primary contact
    pub fn add(&self, name: &str, phone: &str) -> Result<Contact, ContactError> {
        let (name, phone) = validated(name, phone)?;
        let mut book = self.book();
        let contact = Contact {
            id: book.next_id,
            name,
            phone,
            is_primary: false,
        };
        book.next_id += 1;
        book.contacts.push(contact.clone());
        info!("Added contact {} ({})", contact.id, contact.name);
        Ok(contact)
    }

    /// Replace name and phone of an existing contact
    pub fn edit(&self, id: u64, name: &str, phone: &str) -> Result<Contact, ContactError> {
        let (name, phone) = validated(name, phone)?;
        let mut book = self.book();
        let contact = book
            .contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ContactError::NotFound(id))?;
        contact.name = name;
        contact.phone = phone;
        info!("Edited contact {}", id);
        Ok(contact.clone())
    }

    /// Remove a contact. The primary contact is protected.
    pub fn delete(&self, id: u64) -> Result<Contact, ContactError> {
        let mut book = self.book();
        let index = book
            .contacts
            .iter()
            .position(|c| c.id == id)
            .ok_or(ContactError::NotFound(id))?;
        if book.contacts[index].is_primary {
            return Err(ContactError::PrimaryProtected);
        }
        let removed = book.contacts.remove(index);
        info!("Deleted contact {} ({})", removed.id, removed.name);
        Ok(removed)
    }

    /// Make `id` the only primary contact
    pub fn set_primary(&self, id: u64) -> Result<Contact, ContactError> {
        let mut book = self.book();
        if !book.contacts.iter().any(|c| c.id == id) {
            return Err(ContactError::NotFound(id));
        }
        let mut promoted = None;
        for contact in book.contacts.iter_mut() {
            contact.is_primary = contact.id == id;
            if contact.is_primary {
                promoted = Some(contact.clone());
            }
        }
        info!("Contact {} is now primary", id);
        promoted.ok_or(ContactError::NotFound(id))
    }
}
