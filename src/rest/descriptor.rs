//! Resource descriptors and capabilities.
//!
//! Every resource the service exposes is described by data rather than by a
//! dedicated type: its collection path, its JSON:API type name and the set
//! of operations it supports. A single generic
//! [`ResourceEndpoint`](crate::rest::ResourceEndpoint) consults the
//! descriptor before issuing any request.
//!
//! # Example
//!
//! ```rust
//! use jsonapi_client::rest::{Capabilities, ResourceDescriptor, ResourceOperation};
//!
//! const PEOPLE: ResourceDescriptor = ResourceDescriptor::new(
//!     "Person",
//!     "people",
//!     "people",
//!     Capabilities::ALL,
//! );
//! const ACTIVITIES: ResourceDescriptor = ResourceDescriptor::new(
//!     "Activity",
//!     "activities",
//!     "activities",
//!     Capabilities::READ_ONLY,
//! );
//!
//! assert!(PEOPLE.supports(ResourceOperation::Delete));
//! assert!(!ACTIVITIES.supports(ResourceOperation::Create));
//! assert_eq!(PEOPLE.member_path("42"), "people/42");
//! ```

use std::fmt;
use std::ops::BitOr;

/// Operations a resource may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceOperation {
    /// List a collection (GET /resources).
    List,
    /// Find a single resource by ID (GET /resources/{id}).
    Find,
    /// Create a resource (POST /resources).
    Create,
    /// Update a resource (PATCH /resources/{id}).
    Update,
    /// Delete a resource (DELETE /resources/{id}).
    Delete,
}

impl ResourceOperation {
    /// Returns the operation name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Find => "find",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::List => 1,
            Self::Find => 1 << 1,
            Self::Create => 1 << 2,
            Self::Update => 1 << 3,
            Self::Delete => 1 << 4,
        }
    }
}

impl fmt::Display for ResourceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of [`ResourceOperation`]s a resource supports.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    /// No operations.
    pub const NONE: Self = Self(0);
    /// Listing.
    pub const LIST: Self = Self(ResourceOperation::List.bit());
    /// Finding by ID.
    pub const FIND: Self = Self(ResourceOperation::Find.bit());
    /// Creating.
    pub const CREATE: Self = Self(ResourceOperation::Create.bit());
    /// Updating.
    pub const UPDATE: Self = Self(ResourceOperation::Update.bit());
    /// Deleting.
    pub const DELETE: Self = Self(ResourceOperation::Delete.bit());
    /// Listing and finding.
    pub const READ_ONLY: Self = Self::LIST.union(Self::FIND);
    /// Every operation.
    pub const ALL: Self = Self::READ_ONLY
        .union(Self::CREATE)
        .union(Self::UPDATE)
        .union(Self::DELETE);

    /// Returns the union of two sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `true` if `operation` is in the set.
    #[must_use]
    pub const fn contains(self, operation: ResourceOperation) -> bool {
        self.0 & operation.bit() != 0
    }

    /// Iterates over the operations in the set.
    pub fn operations(self) -> impl Iterator<Item = ResourceOperation> {
        [
            ResourceOperation::List,
            ResourceOperation::Find,
            ResourceOperation::Create,
            ResourceOperation::Update,
            ResourceOperation::Delete,
        ]
        .into_iter()
        .filter(move |operation| self.contains(*operation))
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.operations()).finish()
    }
}

/// Static description of one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Human-readable name used in errors, e.g. `"Project"`.
    pub name: &'static str,
    /// JSON:API `type` member, e.g. `"projects"`.
    pub resource_type: &'static str,
    /// Collection path relative to the base URL, e.g. `"projects"`.
    pub path: &'static str,
    /// Supported operations.
    pub capabilities: Capabilities,
}

impl ResourceDescriptor {
    /// Creates a descriptor. Usable in `const` items.
    #[must_use]
    pub const fn new(
        name: &'static str,
        resource_type: &'static str,
        path: &'static str,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            name,
            resource_type,
            path,
            capabilities,
        }
    }

    /// Returns `true` if the resource supports `operation`.
    #[must_use]
    pub const fn supports(&self, operation: ResourceOperation) -> bool {
        self.capabilities.contains(operation)
    }

    /// Returns the collection path.
    #[must_use]
    pub fn collection_path(&self) -> &str {
        self.path.trim_end_matches('/')
    }

    /// Returns the path of one member, percent-encoding the ID.
    #[must_use]
    pub fn member_path(&self, id: &str) -> String {
        format!("{}/{}", self.collection_path(), urlencoding::encode(id))
    }
}
