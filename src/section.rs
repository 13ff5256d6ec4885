use indexmap::IndexMap;
use indexmap::map::Iter;

use crate::error::{Error, Result};
use crate::value::{self, Declaration, ScalarType, Value, ValueSlot};

/// Typed keys of one `[name]` block, kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    slots: IndexMap<String, ValueSlot>,
}

impl Section {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if `key` has no slot.
    pub fn get(&self, key: &str) -> Result<&ValueSlot> {
        self.slots.get(key).ok_or_else(|| Error::key_not_found(key))
    }

    /// Declare the expected type of `key` without a default.
    pub fn declare_type(&mut self, key: impl Into<String>, ty: ScalarType) {
        self.slots.insert(key.into(), ValueSlot::declared(ty));
    }

    /// Store `value` as the default of `key`; its type becomes the key's expected type.
    pub fn assign(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.slots.insert(key.into(), ValueSlot::with_default(value.into()));
    }

    /// Declare the expected type of `key` and, optionally, its default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Type`] if `default` is not of type `ty`.
    pub fn declare(
        &mut self,
        key: impl Into<String>,
        ty: ScalarType,
        default: Option<Value>,
    ) -> Result<()> {
        let key = key.into();
        let slot = match default {
            None => ValueSlot::declared(ty),
            Some(value) if ty.accepts(&value) => ValueSlot::typed(ty, value),
            Some(value) => {
                return Err(Error::Type {
                    key,
                    expected: ty,
                    found: value.scalar_type(),
                });
            }
        };

        self.slots.insert(key, slot);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if `key` has no slot.
    pub fn remove(&mut self, key: &str) -> Result<ValueSlot> {
        self.slots
            .shift_remove(key)
            .ok_or_else(|| Error::key_not_found(key))
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn iter(&self) -> Iter<'_, String, ValueSlot> {
        self.slots.iter()
    }

    /// Keys that carry a default, with that default.
    pub fn defaults(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.slots
            .iter()
            .filter_map(|(key, slot)| slot.default().map(|value| (key.as_str(), value)))
    }

    /// Split a `key = value` line on its first `=` and coerce the value.
    ///
    /// The section itself is left untouched; a key that already has a slot only constrains the
    /// type of the coerced value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] with `n` and `line` if the line has no `=`, the key or the value
    /// is empty, the value is not a recognized literal, or the value's type differs from the
    /// type declared for the key.
    pub fn parse_key_value(&self, n: usize, line: &str) -> Result<(String, Value)> {
        let Some((key, value)) = line.split_once('=') else {
            return Err(Error::parse(n, line));
        };
        let (key, value) = (key.trim(), value.trim());

        if key.is_empty() || value.is_empty() {
            return Err(Error::parse(n, line));
        }

        let value = value::coerce(value).ok_or_else(|| Error::parse(n, line))?;

        match self.slots.get(key) {
            Some(slot) if !slot.ty().accepts(&value) => Err(Error::parse(n, line)),
            _ => Ok((key.to_owned(), value)),
        }
    }
}

impl<'a> IntoIterator for &'a Section {
    type Item = (&'a String, &'a ValueSlot);
    type IntoIter = Iter<'a, String, ValueSlot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

impl<K, D> FromIterator<(K, D)> for Section
where
    K: Into<String>,
    D: Into<Declaration>,
{
    fn from_iter<I: IntoIterator<Item = (K, D)>>(iter: I) -> Self {
        let slots = iter
            .into_iter()
            .map(|(key, declaration)| (key.into(), ValueSlot::from(declaration.into())))
            .collect();

        Self { slots }
    }
}

impl<K, D, const N: usize> From<[(K, D); N]> for Section
where
    K: Into<String>,
    D: Into<Declaration>,
{
    fn from(entries: [(K, D); N]) -> Self {
        entries.into_iter().collect()
    }
}
