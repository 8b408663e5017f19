use crate::collection::Document;
use crate::common::{Value, FIELD_SEPARATOR};

use super::SchemaDescriptor;

pub const DEFAULT_MAX_SCHEMA_DEPTH: usize = 32;

/// Result of inferring a schema over a document sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InferredSchema {
    /// Every qualified path, sorted.
    pub fields: Vec<String>,
    pub schema: SchemaDescriptor,
    /// Number of documents the schema was inferred from.
    pub sample_size: usize,
}

/// Infers a [SchemaDescriptor] by walking documents recursively.
///
/// Every field of every document is registered under its qualified path.
/// Nested documents are walked with the field's path as prefix. For arrays
/// only the first element is inspected, and only if it is a document.
///
/// Paths deeper than `max_depth` segments are not registered. Inference is
/// a pure function of the sample: running it twice over the same documents
/// gives the same result.
///
/// ```rust
/// use doclens::doc;
/// use doclens::schema::SchemaInferencer;
///
/// let docs = vec![doc! { a: 1, b: "x" }, doc! { a: 2, b: "yyy", c: { d: true } }];
/// let inferred = SchemaInferencer::default().infer(&docs);
///
/// assert_eq!(inferred.fields, vec!["a", "b", "c", "c.d"]);
/// assert_eq!(inferred.schema["b"].max_length, Some(3));
/// assert!(inferred.schema["c"].nested);
/// assert!(inferred.schema["c.d"].boolean_field);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaInferencer {
    max_depth: usize,
}

impl Default for SchemaInferencer {
    fn default() -> Self {
        SchemaInferencer::new(DEFAULT_MAX_SCHEMA_DEPTH)
    }
}

// state of one inference run, moved through the recursion
#[derive(Default)]
struct SchemaAccumulator {
    schema: SchemaDescriptor,
    truncated: usize,
    first_truncated: Option<String>,
}

impl SchemaInferencer {
    pub fn new(max_depth: usize) -> Self {
        SchemaInferencer { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn infer<'a, I>(&self, documents: I) -> InferredSchema
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut accumulator = SchemaAccumulator::default();
        let mut sample_size = 0;

        for document in documents {
            accumulator = self.analyze_document(document, "", 1, accumulator);
            sample_size += 1;
        }

        if let Some(path) = &accumulator.first_truncated {
            log::warn!(
                "Schema inference skipped {} field occurrences nested deeper than {} levels, first at {}",
                accumulator.truncated,
                self.max_depth,
                path
            );
        }

        let fields = accumulator.schema.keys().cloned().collect();
        InferredSchema {
            fields,
            schema: accumulator.schema,
            sample_size,
        }
    }

    fn analyze_document(
        &self,
        document: &Document,
        prefix: &str,
        depth: usize,
        mut accumulator: SchemaAccumulator,
    ) -> SchemaAccumulator {
        for (key, value) in document.iter() {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}{}{}", prefix, FIELD_SEPARATOR, key)
            };

            if depth > self.max_depth {
                accumulator.truncated += 1;
                if accumulator.first_truncated.is_none() {
                    accumulator.first_truncated = Some(path);
                }
                continue;
            }

            accumulator = self.analyze_value(&path, value, depth, accumulator);
        }
        accumulator
    }

    fn analyze_value(
        &self,
        path: &str,
        value: &Value,
        depth: usize,
        mut accumulator: SchemaAccumulator,
    ) -> SchemaAccumulator {
        accumulator
            .schema
            .entry(path.to_string())
            .or_default()
            .observe(value);

        match value {
            Value::Document(nested) => self.analyze_document(nested, path, depth + 1, accumulator),
            Value::Array(items) => match items.first() {
                Some(Value::Document(first)) => {
                    self.analyze_document(first, path, depth + 1, accumulator)
                }
                _ => accumulator,
            },
            _ => accumulator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    #[test]
    fn test_flat_and_nested() {
        let docs = vec![
            doc! { a: 1, b: "x" },
            doc! { a: 2, b: "yyy", c: { d: true } },
        ];
        let inferred = SchemaInferencer::default().infer(&docs);

        assert_eq!(inferred.sample_size, 2);
        assert_eq!(inferred.fields, vec!["a", "b", "c", "c.d"]);

        let a = &inferred.schema["a"];
        assert_eq!(a.type_name, "int32");
        assert!(a.numeric);

        let b = &inferred.schema["b"];
        assert_eq!(b.type_name, "string");
        assert_eq!(b.max_length, Some(3));

        let c = &inferred.schema["c"];
        assert_eq!(c.type_name, "document");
        assert!(c.nested);

        let d = &inferred.schema["c.d"];
        assert_eq!(d.type_name, "boolean");
        assert!(d.boolean_field);
    }

    #[test]
    fn test_array_first_element_only() {
        let docs = vec![doc! {
            items: [{ sku: "A1", qty: 2 }, { sku: "B2", price: 9.5 }],
            tags: ["x", "y"]
        }];
        let inferred = SchemaInferencer::default().infer(&docs);

        assert_eq!(
            inferred.fields,
            vec!["items", "items.qty", "items.sku", "tags"]
        );
        let items = &inferred.schema["items"];
        assert!(items.array);
        assert!(items.array_of_objects);
        assert_eq!(items.array_size, Some(2));

        let tags = &inferred.schema["tags"];
        assert!(tags.array);
        assert!(!tags.array_of_objects);
    }

    #[test]
    fn test_empty_sample() {
        let inferred = SchemaInferencer::default().infer(&Vec::<Document>::new());
        assert_eq!(inferred.sample_size, 0);
        assert!(inferred.fields.is_empty());
        assert!(inferred.schema.is_empty());
    }

    #[test]
    fn test_disjoint_field_sets() {
        let docs = vec![doc! { a: 1 }, doc! { b: 2 }];
        let inferred = SchemaInferencer::default().infer(&docs);
        assert_eq!(inferred.fields, vec!["a", "b"]);
    }

    #[test]
    fn test_type_is_last_observed() {
        let docs = vec![doc! { v: 1 }, doc! { v: "one" }];
        let inferred = SchemaInferencer::default().infer(&docs);
        let v = &inferred.schema["v"];
        assert_eq!(v.type_name, "string");
        assert!(v.numeric);
        assert_eq!(v.max_length, Some(3));
    }

    #[test]
    fn test_depth_cap() {
        let docs = vec![doc! { a: { b: { c: 1 } }, top: 1 }];

        let inferred = SchemaInferencer::new(2).infer(&docs);
        assert_eq!(inferred.fields, vec!["a", "a.b", "top"]);
        assert!(inferred.schema["a.b"].nested);

        let inferred = SchemaInferencer::new(1).infer(&docs);
        assert_eq!(inferred.fields, vec!["a", "top"]);
        assert_eq!(SchemaInferencer::new(1).max_depth(), 1);
    }

    #[test]
    fn test_idempotent() {
        let docs = vec![
            doc! { a: 1, list: [{ x: "y" }] },
            doc! { a: 2.5, nested: { deep: { deeper: "z" } } },
        ];
        let inferencer = SchemaInferencer::default();
        assert_eq!(inferencer.infer(&docs), inferencer.infer(&docs));
    }

    #[test]
    fn test_deep_document_does_not_overflow() {
        let mut document = doc! { leaf: 1 };
        for _ in 0..200 {
            document = doc! { inner: (Value::Document(document)) };
        }
        let inferred = SchemaInferencer::default().infer(std::iter::once(&document));
        assert_eq!(inferred.fields.len(), DEFAULT_MAX_SCHEMA_DEPTH);
    }
}
