//! Field descriptors: how criteria see the fields of a record type.
//!
//! A [`DescriptorSet`] is built once per entity kind and shared read-only by
//! every request. It maps a filter field name to the field's type and to an
//! accessor that reads the value out of a record.

use strsim::levenshtein;

use crate::value::{FieldType, Value};

/// Maximum edit distance for a field name to be offered as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Reads one field out of a record. `None` is the null value.
pub type Accessor<R> = fn(&R) -> Option<Value>;

/// Name, type and accessor of one filterable field.
pub struct FieldDescriptor<R> {
    name: &'static str,
    field_type: FieldType,
    accessor: Accessor<R>,
}

impl<R> FieldDescriptor<R> {
    /// Returns the filter name of the field.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared type.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Reads this field from `record`.
    pub fn read(&self, record: &R) -> Option<Value> {
        (self.accessor)(record)
    }

    /// Returns the raw accessor.
    pub fn accessor(&self) -> Accessor<R> {
        self.accessor
    }
}

// Manual impls: derives would needlessly require `R: Clone` / `R: Debug`.
impl<R> Clone for FieldDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            field_type: self.field_type,
            accessor: self.accessor,
        }
    }
}

impl<R> std::fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .finish()
    }
}

/// The filterable fields of one entity kind.
pub struct DescriptorSet<R> {
    entity: &'static str,
    id_field: &'static str,
    fields: Vec<FieldDescriptor<R>>,
}

impl<R> DescriptorSet<R> {
    /// Starts building the descriptors for `entity`.
    pub fn builder(entity: &'static str) -> DescriptorSetBuilder<R> {
        DescriptorSetBuilder {
            entity,
            id_field: None,
            fields: Vec::new(),
        }
    }

    /// Returns the entity name used in messages.
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Returns the descriptor of the identifier field.
    pub fn id_field(&self) -> &FieldDescriptor<R> {
        // The builder registers the id field first and `build` refuses sets without one.
        &self.fields[0]
    }

    /// Returns the name of the identifier field.
    pub fn id_field_name(&self) -> &'static str {
        self.id_field
    }

    /// Looks up a field by exact name.
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor<R>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns all fields in declaration order, the id field first.
    pub fn fields(&self) -> &[FieldDescriptor<R>] {
        &self.fields
    }

    /// Returns all field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Finds the closest known field name to `name`.
    ///
    /// Returns `None` for exact matches and when nothing is within the
    /// suggestion distance.
    pub fn suggest(&self, name: &str) -> Option<&'static str> {
        let query = name.to_lowercase();
        let (best, distance) = self
            .names()
            .map(|candidate| (candidate, levenshtein(&query, &candidate.to_lowercase())))
            .min_by_key(|(_, d)| *d)?;

        if distance > 0 && distance <= MAX_SUGGESTION_DISTANCE {
            Some(best)
        } else {
            None
        }
    }
}

impl<R> std::fmt::Debug for DescriptorSet<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescriptorSet")
            .field("entity", &self.entity)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Builder for [`DescriptorSet`].
pub struct DescriptorSetBuilder<R> {
    entity: &'static str,
    id_field: Option<FieldDescriptor<R>>,
    fields: Vec<FieldDescriptor<R>>,
}

impl<R> DescriptorSetBuilder<R> {
    /// Registers the integer identifier field.
    pub fn id(mut self, name: &'static str, accessor: Accessor<R>) -> Self {
        self.id_field = Some(FieldDescriptor {
            name,
            field_type: FieldType::Integer,
            accessor,
        });
        self
    }

    /// Registers a filterable field.
    pub fn field(mut self, name: &'static str, field_type: FieldType, accessor: Accessor<R>) -> Self {
        self.fields.push(FieldDescriptor {
            name,
            field_type,
            accessor,
        });
        self
    }

    /// Finishes the set.
    ///
    /// # Panics
    ///
    /// Panics if no id field was registered or a field name repeats. Both are
    /// programming errors in a static descriptor table.
    pub fn build(self) -> DescriptorSet<R> {
        let Some(id) = self.id_field else {
            panic!("descriptor set for {} has no id field", self.entity);
        };

        let mut fields = Vec::with_capacity(self.fields.len() + 1);
        let id_field = id.name;
        fields.push(id);
        for field in self.fields {
            assert!(
                fields.iter().all(|f: &FieldDescriptor<R>| f.name != field.name),
                "duplicate field '{}' in descriptor set for {}",
                field.name,
                self.entity
            );
            fields.push(field);
        }

        DescriptorSet {
            entity: self.entity,
            id_field,
            fields,
        }
    }
}

/// A record type that can be filtered.
///
/// Implementations build their descriptor set once, typically behind a
/// `std::sync::LazyLock`, and hand out the same `'static` reference for
/// every request.
pub trait Entity: Sized + 'static {
    /// Entity name used in messages (`BankAccount`).
    const NAME: &'static str;

    /// Returns the shared descriptor set for this entity.
    fn descriptors() -> &'static DescriptorSet<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Account {
        id: i64,
        name: String,
        closed: Option<bool>,
    }

    fn descriptors() -> DescriptorSet<Account> {
        DescriptorSet::<Account>::builder("Account")
            .id("id", |a| Some(Value::Integer(a.id)))
            .field("name", FieldType::Text, |a| Some(Value::Text(a.name.clone())))
            .field("closed", FieldType::Boolean, |a| a.closed.map(Value::Boolean))
            .build()
    }

    #[test]
    fn test_id_field_comes_first() {
        let set = descriptors();
        assert_eq!(set.id_field_name(), "id");
        assert_eq!(set.id_field().name(), "id");
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["id", "name", "closed"]);
    }

    #[test]
    fn test_get_and_read() {
        let set = descriptors();
        let account = Account {
            id: 7,
            name: "Main".to_string(),
            closed: None,
        };
        let name = set.get("name").unwrap();
        assert_eq!(name.field_type(), FieldType::Text);
        assert_eq!(name.read(&account), Some(Value::Text("Main".to_string())));
        assert_eq!(set.get("closed").unwrap().read(&account), None);
        assert!(set.get("Name").is_none());
    }

    #[test]
    fn test_suggest_close_name() {
        let set = descriptors();
        assert_eq!(set.suggest("nmae"), Some("name"));
        assert_eq!(set.suggest("closd"), Some("closed"));
    }

    #[test]
    fn test_suggest_nothing_for_distant_or_exact_name() {
        let set = descriptors();
        assert_eq!(set.suggest("bogusfield"), None);
        assert_eq!(set.suggest("name"), None);
    }

    #[test]
    #[should_panic(expected = "has no id field")]
    fn test_build_without_id_panics() {
        let _ = DescriptorSet::<Account>::builder("Account")
            .field("name", FieldType::Text, |a| Some(Value::Text(a.name.clone())))
            .build();
    }

    #[test]
    #[should_panic(expected = "duplicate field 'name'")]
    fn test_build_with_duplicate_field_panics() {
        let _ = DescriptorSet::<Account>::builder("Account")
            .id("id", |a| Some(Value::Integer(a.id)))
            .field("name", FieldType::Text, |a| Some(Value::Text(a.name.clone())))
            .field("name", FieldType::Text, |a| Some(Value::Text(a.name.clone())))
            .build();
    }
}
