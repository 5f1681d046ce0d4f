//! The binding table templates are rendered against.
//!
//! Resolved variables are shared read-only through an `Arc`; each iterated
//! render unit gets its own copy extended with an `item` binding.

use std::sync::Arc;

use indexmap::IndexMap;
use tera::Context;

use crate::spec::Item;

/// Name under which the current `with_items` entry is bound.
pub const ITEM_BINDING: &str = "item";

/// Resolved variable values plus the optional current item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    values: Arc<IndexMap<String, String>>,
    item: Option<Item>,
}

impl Bindings {
    pub fn new(values: IndexMap<String, String>) -> Self {
        Self {
            values: Arc::new(values),
            item: None,
        }
    }

    /// A copy of this table with `item` bound. The variable values are shared.
    pub fn with_item(&self, item: Item) -> Self {
        Self {
            values: Arc::clone(&self.values),
            item: Some(item),
        }
    }

    /// Value of a declared variable.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn item(&self) -> Option<&Item> {
        self.item.as_ref()
    }

    /// Variables in declaration order, excluding `item`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build the Tera context for one render. `item` shadows a variable of the same name.
    pub(crate) fn to_context(&self) -> Context {
        let mut context = Context::new();
        for (name, value) in self.values.iter() {
            context.insert(name.as_str(), value);
        }
        if let Some(item) = &self.item {
            context.insert(ITEM_BINDING, item);
        }
        context
    }
}

impl<K, V> FromIterator<(K, V)> for Bindings
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
