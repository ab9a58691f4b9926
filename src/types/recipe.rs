use std::fmt;
use std::marker::PhantomData;

use serde::Deserialize;
use serde::de::{self, Deserializer, MapAccess, Visitor};

/// Map entries kept in document order.
///
/// Beverage order drives batching and ingredient order drives which shortfall
/// gets reported, so both must survive deserialization as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedEntries<V>(pub Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedEntries<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = OrderedEntries<V>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map with unique string keys")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries: Vec<(String, V)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));

                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    if entries.iter().any(|(existing, _)| *existing == key) {
                        return Err(de::Error::custom(format!("duplicate key \"{key}\"")));
                    }
                    entries.push((key, value));
                }

                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

/// Ingredient requirements for one beverage, in recipe order.
///
/// Each ingredient appears once; repeated names are summed into the position
/// of their first occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    ingredients: Vec<(String, u64)>,
}

impl Recipe {
    pub fn new<I, S>(ingredients: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut merged: Vec<(String, u64)> = Vec::new();

        for (name, quantity) in ingredients {
            let name = name.into();
            match merged.iter_mut().find(|(existing, _)| *existing == name) {
                Some((_, total)) => *total = total.saturating_add(quantity),
                None => merged.push((name, quantity)),
            }
        }

        Self {
            ingredients: merged,
        }
    }

    pub fn ingredients(&self) -> impl Iterator<Item = (&str, u64)> {
        self.ingredients
            .iter()
            .map(|(name, quantity)| (name.as_str(), *quantity))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beverage {
    pub name: String,
    pub recipe: Recipe,
}

/// Every beverage the machine is asked to prepare during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeTable {
    beverages: Vec<Beverage>,
}

impl RecipeTable {
    pub fn new(beverages: Vec<Beverage>) -> Self {
        Self { beverages }
    }

    pub fn beverages(&self) -> &[Beverage] {
        &self.beverages
    }

    pub fn len(&self) -> usize {
        self.beverages.len()
    }
}

impl<S: Into<String>> FromIterator<(S, Recipe)> for RecipeTable {
    fn from_iter<T: IntoIterator<Item = (S, Recipe)>>(iter: T) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(name, recipe)| Beverage {
                    name: name.into(),
                    recipe,
                })
                .collect(),
        )
    }
}
