//! Conversion from a parsed Avro schema.
//!
//! Named references are inlined, logical types collapse to their underlying
//! primitive. A reference back into a type that is still being converted means
//! the schema is recursive, which the Schema Model cannot represent.

use std::collections::{HashMap, HashSet};

use apache_avro::schema::{Name, SchemaKind as AvroKind};
use apache_avro::Schema as AvroSchema;

use super::{Field, Schema};
use crate::error::SchemaError;

impl TryFrom<&AvroSchema> for Schema {
    type Error = SchemaError;

    fn try_from(schema: &AvroSchema) -> Result<Self, Self::Error> {
        Converter::default().convert(schema)
    }
}

#[derive(Default)]
struct Converter {
    defined: HashMap<String, Schema>,
    in_progress: HashSet<String>,
}

impl Converter {
    fn convert(&mut self, schema: &AvroSchema) -> Result<Schema, SchemaError> {
        let converted = match schema {
            AvroSchema::Null => Schema::Null,
            AvroSchema::Boolean => Schema::Boolean,
            AvroSchema::Int | AvroSchema::Date | AvroSchema::TimeMillis => Schema::Int,
            AvroSchema::Long
            | AvroSchema::TimeMicros
            | AvroSchema::TimestampMillis
            | AvroSchema::TimestampMicros
            | AvroSchema::TimestampNanos
            | AvroSchema::LocalTimestampMillis
            | AvroSchema::LocalTimestampMicros
            | AvroSchema::LocalTimestampNanos => Schema::Long,
            AvroSchema::Float => Schema::Float,
            AvroSchema::Double => Schema::Double,
            AvroSchema::Bytes => Schema::Bytes,
            AvroSchema::String | AvroSchema::Uuid => Schema::String,
            AvroSchema::Array(array) => Schema::array(self.convert(&array.items)?),
            AvroSchema::Map(map) => Schema::map(self.convert(&map.types)?),
            AvroSchema::Union(union) => Schema::Union {
                members: union
                    .variants()
                    .iter()
                    .map(|member| self.convert(member))
                    .collect::<Result<_, _>>()?,
            },
            AvroSchema::Enum(e) => {
                let converted = Schema::Enum {
                    name: fullname(&e.name),
                    symbols: e.symbols.clone(),
                };
                self.define(&e.name, &converted);
                converted
            }
            AvroSchema::Fixed(f) => {
                let converted = Schema::Fixed {
                    name: fullname(&f.name),
                    size: f.size,
                };
                self.define(&f.name, &converted);
                converted
            }
            AvroSchema::Record(record) => {
                let name = fullname(&record.name);
                self.in_progress.insert(name.clone());
                let mut fields = Vec::with_capacity(record.fields.len());
                for field in &record.fields {
                    fields.push(Field::new(field.name.clone(), self.convert(&field.schema)?));
                }
                self.in_progress.remove(&name);
                let converted = Schema::Record { name, fields };
                self.define(&record.name, &converted);
                converted
            }
            AvroSchema::Ref { name } => self.resolve(name)?,
            other => {
                return Err(SchemaError::Unsupported(format!("{:?}", AvroKind::from(other))));
            }
        };
        Ok(converted)
    }

    fn define(&mut self, name: &Name, schema: &Schema) {
        self.defined.insert(fullname(name), schema.clone());
    }

    fn resolve(&self, name: &Name) -> Result<Schema, SchemaError> {
        let fullname = fullname(name);
        if self.in_progress.contains(&fullname) {
            return Err(SchemaError::Recursive(fullname));
        }
        self.defined
            .get(&fullname)
            .cloned()
            .ok_or(SchemaError::UnknownReference(fullname))
    }
}

fn fullname(name: &Name) -> String {
    name.fullname(None)
}
