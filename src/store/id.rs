use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use rocket::request::FromParam;
use serde::{Serialize, Serializer};
use uuid::Uuid;

/// Identifier of a stored `Item`.
///
/// The type parameter only tags the id; a `Id<Venue>` cannot be passed where an
/// `Id<Artist>` is expected. The trait impls are written by hand because derive
/// would require the bounds on `Item` as well.
pub struct Id<Item> {
    pub id: Uuid,
    item: PhantomData<Item>,
}

impl<Item> Id<Item> {
    pub fn new() -> Self {
        Uuid::new_v4().into()
    }

    pub fn parse_str(input: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(input).map(Id::from)
    }
}

impl<Item> From<Uuid> for Id<Item> {
    fn from(id: Uuid) -> Self {
        Id {
            id,
            item: PhantomData,
        }
    }
}

impl<Item> Clone for Id<Item> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Item> Copy for Id<Item> {}

impl<Item> PartialEq for Id<Item> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<Item> Eq for Id<Item> {}

impl<Item> Hash for Id<Item> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl<Item> fmt::Debug for Id<Item> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.id)
    }
}

impl<Item> fmt::Display for Id<Item> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.id.hyphenated().fmt(f)
    }
}

impl<Item> Serialize for Id<Item> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.id.serialize(serializer)
    }
}

impl<'a, Item> FromParam<'a> for Id<Item> {
    type Error = uuid::Error;

    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        Id::parse_str(param)
    }
}
