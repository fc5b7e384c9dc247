//! Struct members and enum constants.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::markup::Markup;

fn is_false(value: &bool) -> bool {
    !*value
}

/// A struct member or an enum constant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Field {
    /// Key of the field in its `FieldMap`; not serialized inside the record.
    #[serde(skip)]
    pub name: String,

    /// Declared type (members only).
    #[serde(rename = "CT_TYPE", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    #[serde(rename = "CT_POINTER", skip_serializing_if = "is_false")]
    pub pointer: bool,

    #[serde(rename = "CT_CONST", skip_serializing_if = "is_false")]
    pub is_const: bool,

    /// Fixed array length expression, as written.
    #[serde(rename = "CT_LENGTH", skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,

    /// Enumerator value (constants only).
    #[serde(rename = "CT_VALUE", skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,

    #[serde(flatten)]
    pub markup: Markup,
}

impl Field {
    /// Create a struct member of the given type.
    pub fn member(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
            ..Default::default()
        }
    }

    /// Create an enum constant.
    pub fn constant(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
            ..Default::default()
        }
    }

    pub fn with_markup(mut self, markup: Markup) -> Self {
        self.markup = markup;
        self
    }

    /// Label shown in the editor, falling back to the field name.
    pub fn label(&self) -> &str {
        self.markup.label.as_deref().unwrap_or(&self.name)
    }
}

/// Fields in declaration order, keyed by name.
///
/// Inserting a field whose name is already present replaces the earlier one
/// in place. Serializes as a JSON object in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    fields: Vec<Field>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field) {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<Field> for FieldMap {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for field in iter {
            map.insert(field);
        }
        map
    }
}

impl<'a> IntoIterator for &'a FieldMap {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&field.name, field)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldMapVisitor;

        impl<'de> Visitor<'de> for FieldMapVisitor {
            type Value = FieldMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of field names to field records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FieldMap, A::Error> {
                let mut map = FieldMap::new();
                while let Some((name, mut field)) = access.next_entry::<String, Field>()? {
                    field.name = name;
                    map.insert(field);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(FieldMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_keeps_order() {
        let map: FieldMap = vec![Field::constant("RED", 0), Field::constant("GREEN", 1)]
            .into_iter()
            .collect();
        assert_eq!(map.names().collect::<Vec<_>>(), vec!["RED", "GREEN"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map = FieldMap::new();
        map.insert(Field::member("x", "float"));
        map.insert(Field::member("y", "float"));
        map.insert(Field::member("x", "double"));

        assert_eq!(map.len(), 2);
        assert_eq!(map.names().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(map.get("x").unwrap().type_name.as_deref(), Some("double"));
    }

    #[test]
    fn test_label_falls_back_to_name() {
        let mut field = Field::constant("MY_A", 0);
        assert_eq!(field.label(), "MY_A");
        field.markup.label = Some("My A".to_string());
        assert_eq!(field.label(), "My A");
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let mut zeta = Field::member("zeta", "int32_t");
        zeta.pointer = true;
        let map: FieldMap = vec![zeta, Field::member("alpha", "float")].into_iter().collect();

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(
            json,
            r#"{"zeta":{"CT_TYPE":"int32_t","CT_POINTER":true},"alpha":{"CT_TYPE":"float"}}"#
        );

        let back: FieldMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
