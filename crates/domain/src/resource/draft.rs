//! Resource form draft.
//!
//! The draft is the editing session's private copy of a resource. Every
//! mutation takes the current draft and returns the next one, touching only
//! the targeted field.

use serde::{Deserialize, Serialize};

use super::{Resource, ResourceHeader, ResourceMethod};
use crate::error::{DomainError, DomainResult};
use crate::literal::EMPTY_STRING_LITERAL;

/// A single scalar field update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    /// Resource and variable name.
    Name(String),
    /// URL expression.
    Url(String),
    /// Request method.
    Method(ResourceMethod),
    /// Body expression.
    Body(String),
}

/// In-progress resource edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDraft {
    /// Name shared by the variable and the resource.
    pub name: String,
    /// URL expression.
    pub url: String,
    /// Request method.
    pub method: ResourceMethod,
    /// Ordered headers.
    pub headers: Vec<ResourceHeader>,
    /// Body expression. Kept while hidden for `get`.
    pub body: String,
}

impl Default for ResourceDraft {
    fn default() -> Self {
        Self::new("")
    }
}

impl ResourceDraft {
    /// Creates a draft for a new resource.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: EMPTY_STRING_LITERAL.to_string(),
            method: ResourceMethod::Get,
            headers: Vec::new(),
            body: EMPTY_STRING_LITERAL.to_string(),
        }
    }

    /// Creates a draft from an existing resource, named after its variable.
    #[must_use]
    pub fn from_resource(variable_name: &str, resource: &Resource) -> Self {
        Self {
            name: variable_name.to_string(),
            url: resource.url.clone(),
            method: resource.method,
            headers: resource.headers.clone(),
            body: resource.body.clone(),
        }
    }

    /// Returns the draft with one scalar field replaced.
    #[must_use]
    pub fn set_field(&self, field: DraftField) -> Self {
        let mut next = self.clone();
        match field {
            DraftField::Name(name) => next.name = name,
            DraftField::Url(url) => next.url = url,
            DraftField::Method(method) => next.method = method,
            DraftField::Body(body) => next.body = body,
        }
        next
    }

    /// Returns the draft with the header at `index` replaced.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::HeaderIndexOutOfRange`] if `index` does not
    /// address an existing header; the draft is left untouched.
    pub fn set_header(
        &self,
        index: usize,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> DomainResult<Self> {
        self.check_header_index(index)?;
        let mut next = self.clone();
        next.headers[index] = ResourceHeader::new(name, value);
        Ok(next)
    }

    /// Returns the draft with a blank header appended.
    #[must_use]
    pub fn add_header(&self) -> Self {
        let mut next = self.clone();
        next.headers.push(ResourceHeader::blank());
        next
    }

    /// Returns the draft with the header at `index` removed.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::HeaderIndexOutOfRange`] if `index` does not
    /// address an existing header; the draft is left untouched.
    pub fn remove_header(&self, index: usize) -> DomainResult<Self> {
        self.check_header_index(index)?;
        let mut next = self.clone();
        next.headers.remove(index);
        Ok(next)
    }

    /// Whether the body field is shown for the current method.
    #[must_use]
    pub const fn body_visible(&self) -> bool {
        self.method.has_body()
    }

    fn check_header_index(&self, index: usize) -> DomainResult<()> {
        if index < self.headers.len() {
            Ok(())
        } else {
            Err(DomainError::HeaderIndexOutOfRange {
                index,
                len: self.headers.len(),
            })
        }
    }
}
