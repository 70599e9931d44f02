// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;

/// Trait representing a to-do list.
pub trait TodoList {
    /// Returns the unique identifier of the list.
    fn id(&self) -> Cow<'_, str>;
    /// Returns the name of the list.
    fn name(&self) -> Cow<'_, str>;
    /// Returns the creation time, RFC 3339.
    fn created_at(&self) -> Cow<'_, str>;
    /// Returns the owner of the list, if known.
    fn owner_id(&self) -> Option<Cow<'_, str>>;
    /// Number of items in the list.
    fn total(&self) -> i64;
    /// Number of completed items in the list.
    fn done(&self) -> i64;
}

/// Trait representing a to-do item.
pub trait Todo {
    /// Returns the unique identifier of the item.
    fn id(&self) -> Cow<'_, str>;
    /// Returns the list the item belongs to.
    fn list_id(&self) -> Cow<'_, str>;
    /// Returns the description of the item.
    fn description(&self) -> Cow<'_, str>;
    /// Whether the item is completed.
    fn completed(&self) -> bool;
    /// Returns the creation time, RFC 3339.
    fn created_at(&self) -> Cow<'_, str>;
    /// Returns the completion time, if completed.
    fn completed_at(&self) -> Option<Cow<'_, str>>;
    /// Returns who created the item, if known.
    fn created_by(&self) -> Option<Cow<'_, str>>;
    /// Returns who completed the item, if known.
    fn completed_by(&self) -> Option<Cow<'_, str>>;
}

/// The data to create a new list.
#[derive(Debug, Clone)]
pub struct ListDraft {
    /// The name of the list.
    pub name: String,
}

impl ListDraft {
    /// Validates the draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("List name must not be empty".to_string());
        }
        Ok(())
    }
}

/// The data to create a new item.
#[derive(Debug, Clone)]
pub struct TodoDraft {
    /// The list the item goes into.
    pub list_id: String,
    /// The description of the item.
    pub description: String,
}

impl TodoDraft {
    /// Validates the draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the description is blank.
    pub fn validate(&self) -> Result<(), String> {
        if self.description.trim().is_empty() {
            return Err("Todo description must not be empty".to_string());
        }
        Ok(())
    }
}
