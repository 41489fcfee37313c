//! Attribute-resolving entities over normalized payload nodes
//!
//! An [`Entity`] pairs a declared [`Schema`] with one mapping from the
//! normalized payload. Reads go through [`Entity::get`], which rejects names
//! outside the schema and applies the schema's [`Decode`] rule for nested or
//! structured properties.
//!
//! In [`DecodeMode::Dynamic`] every read re-derives its value from the raw
//! mapping, so nested entities are rebuilt on each access. In
//! [`DecodeMode::Static`] every property is resolved once at construction and
//! the raw mapping is dropped; later reads hand out the cached value, and
//! nested entities share one allocation across reads.

use std::{collections::HashMap, fmt, sync::Arc};

use domain::GeoLocation;
use serde_json::{Map, Value};

use crate::error::AmapError;

/// Property resolution strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Resolve on every read
    Dynamic,
    /// Resolve everything once at construction
    #[default]
    Static,
}

impl DecodeMode {
    /// Mode for a `static_mode` flag
    #[must_use]
    pub const fn from_static_flag(static_mode: bool) -> Self {
        if static_mode { Self::Static } else { Self::Dynamic }
    }
}

/// Decoding rule for a property that is not read as-is
#[derive(Clone, Copy)]
pub enum Decode {
    /// Nested mapping decoded as an entity
    Entity(&'static Schema),
    /// List of mappings decoded as entities
    EntityList(&'static Schema),
    /// Numeric text decoded as an integer
    Int,
    /// Numeric text decoded as a float
    Float,
    /// `"x,y;x,y"` decoded as coordinate pairs
    Points,
    /// Arbitrary pure decoder over the owning mapping
    Custom(fn(&Map<String, Value>, DecodeMode) -> Field),
}

impl Decode {
    fn apply(self, key: &str, raw: &Map<String, Value>, mode: DecodeMode) -> Field {
        let value = raw.get(key).unwrap_or(&Value::Null);
        match self {
            Self::Entity(schema) => Field::Entity(Arc::new(Entity::new(schema, value, mode))),
            Self::EntityList(schema) => Field::List(
                value
                    .as_array()
                    .map(|items| {
                        items
                            .iter()
                            .map(|item| Field::Entity(Arc::new(Entity::new(schema, item, mode))))
                            .collect()
                    })
                    .unwrap_or_default(),
            ),
            Self::Int => loose_i64(value).map_or(Field::Absent, Field::Int),
            Self::Float => loose_f64(value).map_or(Field::Absent, Field::Float),
            Self::Points => value
                .as_str()
                .and_then(parse_points)
                .map_or(Field::Absent, Field::Points),
            Self::Custom(decoder) => decoder(raw, mode),
        }
    }
}

impl fmt::Debug for Decode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // schemas may be recursive, so only their names are printed
        match self {
            Self::Entity(schema) => write!(f, "Entity({})", schema.name),
            Self::EntityList(schema) => write!(f, "EntityList({})", schema.name),
            Self::Int => f.write_str("Int"),
            Self::Float => f.write_str("Float"),
            Self::Points => f.write_str("Points"),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Declared shape of an entity kind
#[derive(Debug)]
pub struct Schema {
    /// Entity kind name
    pub name: &'static str,
    /// Every readable property
    pub properties: &'static [&'static str],
    /// Properties decoded by a rule instead of read as-is
    pub decoders: &'static [(&'static str, Decode)],
    /// Property holding a `"lng,lat"` location, if any
    pub location_key: Option<&'static str>,
}

impl Schema {
    /// Whether `name` is a declared property
    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.properties.iter().any(|p| *p == name)
    }

    fn decoder_for(&self, name: &str) -> Option<Decode> {
        self.decoders
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, decode)| *decode)
    }

    fn resolve(&self, name: &str, raw: &Map<String, Value>, mode: DecodeMode) -> Field {
        match self.decoder_for(name) {
            Some(decode) => decode.apply(name, raw, mode),
            None => raw.get(name).map_or(Field::Absent, Field::from_raw),
        }
    }
}

/// A resolved property value
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Missing or `null`
    Absent,
    /// Raw value as found in the payload
    Value(Value),
    /// Nested entity
    Entity(Arc<Entity>),
    /// List of resolved values, usually entities
    List(Vec<Field>),
    /// Decoded integer
    Int(i64),
    /// Decoded float
    Float(f64),
    /// Decoded coordinate pairs
    Points(Vec<(f64, f64)>),
}

impl Field {
    fn from_raw(value: &Value) -> Self {
        if value.is_null() {
            Self::Absent
        } else {
            Self::Value(value.clone())
        }
    }

    /// True for [`Field::Absent`]
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// String content of a raw value
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Value(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Integer content, parsing numeric text
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Value(v) => loose_i64(v),
            _ => None,
        }
    }

    /// Float content, parsing numeric text
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Value(v) => loose_f64(v),
            _ => None,
        }
    }

    /// Nested entity
    #[must_use]
    pub const fn as_entity(&self) -> Option<&Arc<Entity>> {
        match self {
            Self::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// List items, empty for anything that is not a list
    #[must_use]
    pub fn as_list(&self) -> &[Self] {
        match self {
            Self::List(items) => items,
            _ => &[],
        }
    }

    /// Coordinate pairs
    #[must_use]
    pub fn as_points(&self) -> Option<&[(f64, f64)]> {
        match self {
            Self::Points(p) => Some(p),
            _ => None,
        }
    }

    /// Raw JSON value
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Clone)]
enum Inner {
    Dynamic(Arc<Map<String, Value>>),
    Static(Arc<HashMap<&'static str, Field>>),
}

/// Entity over one mapping of a normalized payload
#[derive(Clone)]
pub struct Entity {
    schema: &'static Schema,
    inner: Inner,
}

impl Entity {
    /// Build an entity; anything other than a mapping is treated as empty
    #[must_use]
    pub fn new(schema: &'static Schema, raw: &Value, mode: DecodeMode) -> Self {
        let map = raw.as_object().cloned().unwrap_or_default();
        Self::from_map(schema, map, mode)
    }

    /// Build an entity from an owned mapping
    #[must_use]
    pub fn from_map(schema: &'static Schema, raw: Map<String, Value>, mode: DecodeMode) -> Self {
        let inner = match mode {
            DecodeMode::Dynamic => Inner::Dynamic(Arc::new(raw)),
            DecodeMode::Static => {
                let resolved = schema
                    .properties
                    .iter()
                    .map(|name| (*name, schema.resolve(name, &raw, mode)))
                    .collect();
                Inner::Static(Arc::new(resolved))
            },
        };
        Self { schema, inner }
    }

    /// Schema this entity was built with
    #[must_use]
    pub const fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Entity kind name
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.schema.name
    }

    /// Resolution mode
    #[must_use]
    pub const fn mode(&self) -> DecodeMode {
        match self.inner {
            Inner::Dynamic(_) => DecodeMode::Dynamic,
            Inner::Static(_) => DecodeMode::Static,
        }
    }

    /// Read a declared property
    ///
    /// # Errors
    ///
    /// Returns `UnknownAttribute` when `name` is not declared by the schema.
    pub fn get(&self, name: &str) -> Result<Field, AmapError> {
        if !self.schema.declares(name) {
            return Err(AmapError::UnknownAttribute {
                entity: self.schema.name,
                attribute: name.to_string(),
            });
        }
        Ok(match &self.inner {
            Inner::Dynamic(raw) => self.schema.resolve(name, raw, DecodeMode::Dynamic),
            Inner::Static(cache) => cache.get(name).cloned().unwrap_or(Field::Absent),
        })
    }

    /// Read a declared property as text
    ///
    /// # Errors
    ///
    /// Same as [`Entity::get`].
    pub fn text(&self, name: &str) -> Result<Option<String>, AmapError> {
        Ok(self.get(name)?.as_str().map(ToString::to_string))
    }

    /// Read a declared list property as entities
    ///
    /// # Errors
    ///
    /// Same as [`Entity::get`].
    pub fn entities(&self, name: &str) -> Result<Vec<Arc<Self>>, AmapError> {
        Ok(self
            .get(name)?
            .as_list()
            .iter()
            .filter_map(Field::as_entity)
            .cloned()
            .collect())
    }

    /// Read a declared nested entity property
    ///
    /// # Errors
    ///
    /// Same as [`Entity::get`].
    pub fn entity(&self, name: &str) -> Result<Option<Arc<Self>>, AmapError> {
        Ok(self.get(name)?.as_entity().cloned())
    }

    /// Parse the schema's location property
    ///
    /// `Ok(None)` when the schema has no location property or the value is
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns `MalformedPayload` when the location text does not parse.
    pub fn location(&self) -> Result<Option<GeoLocation>, AmapError> {
        let Some(key) = self.schema.location_key else {
            return Ok(None);
        };
        self.get(key)?
            .as_str()
            .map(|text| {
                GeoLocation::parse(text).map_err(|e| AmapError::MalformedPayload(e.to_string()))
            })
            .transpose()
    }

    /// Every declared property with its resolved value
    ///
    /// # Errors
    ///
    /// Never fails for a well-formed schema; propagates [`Entity::get`].
    pub fn fields(&self) -> Result<Vec<(&'static str, Field)>, AmapError> {
        self.schema
            .properties
            .iter()
            .map(|name| Ok((*name, self.get(name)?)))
            .collect()
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name == other.schema.name
            && self
                .schema
                .properties
                .iter()
                .all(|name| self.get(name).ok() == other.get(name).ok())
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.schema.name);
        for name in self.schema.properties {
            match self.get(name) {
                Ok(Field::Absent) | Err(_) => {},
                Ok(field) => {
                    s.field(name, &field);
                },
            }
        }
        s.finish_non_exhaustive()
    }
}

fn loose_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn loose_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse `"x,y;x,y"` into coordinate pairs
pub(crate) fn parse_points(text: &str) -> Option<Vec<(f64, f64)>> {
    if text.trim().is_empty() {
        return None;
    }
    text.split(';')
        .map(|pair| {
            let (x, y) = pair.split_once(',')?;
            Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    static CHILD: Schema = Schema {
        name: "Child",
        properties: &["name", "type"],
        decoders: &[],
        location_key: None,
    };

    static PARENT: Schema = Schema {
        name: "Parent",
        properties: &["name", "location", "child", "children", "count", "ratio", "line", "tag"],
        decoders: &[
            ("child", Decode::Entity(&CHILD)),
            ("children", Decode::EntityList(&CHILD)),
            ("count", Decode::Int),
            ("ratio", Decode::Float),
            ("line", Decode::Points),
            ("tag", Decode::Custom(upper_name)),
        ],
        location_key: Some("location"),
    };

    fn upper_name(raw: &Map<String, Value>, _mode: DecodeMode) -> Field {
        raw.get("name")
            .and_then(Value::as_str)
            .map_or(Field::Absent, |s| Field::Value(Value::String(s.to_uppercase())))
    }

    fn sample() -> Value {
        json!({
            "name": "root",
            "location": "116.481488,39.990464",
            "child": {"name": "c", "type": "t"},
            "children": [{"name": "a"}, {"name": "b"}],
            "count": "12",
            "ratio": "0.5",
            "line": "116.1,39.1;116.2,39.2",
            "undeclared": 1
        })
    }

    #[test]
    fn undeclared_property_is_an_error() {
        for mode in [DecodeMode::Dynamic, DecodeMode::Static] {
            let entity = Entity::new(&PARENT, &sample(), mode);
            let err = entity.get("undeclared").unwrap_err();
            assert!(matches!(
                err,
                AmapError::UnknownAttribute { entity: "Parent", .. }
            ));
        }
    }

    #[test]
    fn static_and_dynamic_agree_on_every_property() {
        let dynamic = Entity::new(&PARENT, &sample(), DecodeMode::Dynamic);
        let stat = Entity::new(&PARENT, &sample(), DecodeMode::Static);
        for name in PARENT.properties {
            assert_eq!(dynamic.get(name).unwrap(), stat.get(name).unwrap(), "{name}");
        }
        assert_eq!(dynamic, stat);
    }

    #[test]
    fn static_nested_reads_are_identical() {
        let entity = Entity::new(&PARENT, &sample(), DecodeMode::Static);
        let first = entity.entity("child").unwrap().unwrap();
        let second = entity.entity("child").unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn dynamic_nested_reads_are_equal_but_not_identical() {
        let entity = Entity::new(&PARENT, &sample(), DecodeMode::Dynamic);
        let first = entity.entity("child").unwrap().unwrap();
        let second = entity.entity("child").unwrap().unwrap();
        assert_eq!(first, second);
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn decoders_apply() {
        let entity = Entity::new(&PARENT, &sample(), DecodeMode::Static);
        assert_eq!(entity.get("count").unwrap(), Field::Int(12));
        assert_eq!(entity.get("ratio").unwrap(), Field::Float(0.5));
        assert_eq!(
            entity.get("line").unwrap().as_points().unwrap(),
            &[(116.1, 39.1), (116.2, 39.2)]
        );
        assert_eq!(entity.text("tag").unwrap().as_deref(), Some("ROOT"));
        let children = entity.entities("children").unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].text("name").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn absent_values_map_to_empty_defaults() {
        let entity = Entity::new(&PARENT, &Value::Null, DecodeMode::Static);
        assert!(entity.get("name").unwrap().is_absent());
        assert!(entity.get("children").unwrap().as_list().is_empty());
        assert!(entity.get("count").unwrap().is_absent());
        let child = entity.entity("child").unwrap().unwrap();
        assert!(child.get("name").unwrap().is_absent());
        assert_eq!(entity.location().unwrap(), None);
    }

    #[test]
    fn location_parses() {
        let entity = Entity::new(&PARENT, &sample(), DecodeMode::Dynamic);
        let loc = entity.location().unwrap().unwrap();
        assert!((loc.longitude() - 116.481488).abs() < 1e-9);
        assert!((loc.latitude() - 39.990464).abs() < 1e-9);
    }

    #[test]
    fn bad_location_is_malformed() {
        let entity = Entity::new(&PARENT, &json!({"location": "nowhere"}), DecodeMode::Static);
        assert!(matches!(
            entity.location(),
            Err(AmapError::MalformedPayload(_))
        ));
    }

    #[test]
    fn mode_is_reported() {
        assert_eq!(
            Entity::new(&CHILD, &json!({}), DecodeMode::Dynamic).mode(),
            DecodeMode::Dynamic
        );
        assert_eq!(DecodeMode::from_static_flag(true), DecodeMode::Static);
    }

    #[test]
    fn parse_points_rejects_garbage() {
        assert_eq!(parse_points(""), None);
        assert_eq!(parse_points("1,2;x,3"), None);
        assert_eq!(parse_points("1,2"), Some(vec![(1.0, 2.0)]));
    }

    #[test]
    fn fields_lists_every_property() {
        let entity = Entity::new(&CHILD, &json!({"name": "n"}), DecodeMode::Static);
        let fields = entity.fields().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].0, "name");
    }
}
