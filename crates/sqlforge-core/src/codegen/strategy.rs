//! Builder-style and setter-style object assembly.

use crate::naming::capitalize;

/// One field assignment: the shape's field name and the Java expression
/// producing its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    /// Field name, lower camel case.
    pub name: String,
    /// Java expression.
    pub value: String,
}

impl FieldValue {
    /// Creates a field assignment.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Emits the Java statements that build a `shape` instance from `fields`
/// and return it.
pub trait AssemblyStrategy {
    /// Returns unindented statement lines ending in a `return`.
    fn emit(&self, shape: &str, fields: &[FieldValue]) -> String;
}

/// `Shape.builder().f(..)....build()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FluentAssembly;

impl AssemblyStrategy for FluentAssembly {
    fn emit(&self, shape: &str, fields: &[FieldValue]) -> String {
        let mut out = format!("return {shape}.builder()\n");
        for field in fields {
            out.push_str(&format!("        .{}({})\n", field.name, field.value));
        }
        out.push_str("        .build();\n");
        out
    }
}

/// `new Shape()` followed by one setter call per field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationAssembly;

impl AssemblyStrategy for MutationAssembly {
    fn emit(&self, shape: &str, fields: &[FieldValue]) -> String {
        let mut out = format!("{shape} row = new {shape}();\n");
        for field in fields {
            out.push_str(&format!(
                "row.set{}({});\n",
                capitalize(&field.name),
                field.value
            ));
        }
        out.push_str("return row;\n");
        out
    }
}

static FLUENT: FluentAssembly = FluentAssembly;
static MUTATION: MutationAssembly = MutationAssembly;

/// Picks fluent assembly for up to `threshold` fields, mutation above.
#[must_use]
pub fn select_strategy(field_count: usize, threshold: usize) -> &'static dyn AssemblyStrategy {
    if field_count <= threshold {
        &FLUENT
    } else {
        &MUTATION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> Vec<FieldValue> {
        vec![
            FieldValue::new("orderId", "rs.getInt(\"order_id\")"),
            FieldValue::new("status", "rs.getString(\"status\")"),
        ]
    }

    #[test]
    fn test_fluent() {
        let out = FluentAssembly.emit("OrderResponse", &fields());
        assert_eq!(
            out,
            "return OrderResponse.builder()\n\
             \x20       .orderId(rs.getInt(\"order_id\"))\n\
             \x20       .status(rs.getString(\"status\"))\n\
             \x20       .build();\n"
        );
    }

    #[test]
    fn test_mutation() {
        let out = MutationAssembly.emit("OrderResponse", &fields());
        assert_eq!(
            out,
            "OrderResponse row = new OrderResponse();\n\
             row.setOrderId(rs.getInt(\"order_id\"));\n\
             row.setStatus(rs.getString(\"status\"));\n\
             return row;\n"
        );
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let shape = "S";
        let one = [FieldValue::new("a", "1")];
        assert_eq!(
            select_strategy(20, 20).emit(shape, &one),
            FluentAssembly.emit(shape, &one)
        );
        assert_eq!(
            select_strategy(21, 20).emit(shape, &one),
            MutationAssembly.emit(shape, &one)
        );
        assert_eq!(
            select_strategy(0, 0).emit(shape, &[]),
            FluentAssembly.emit(shape, &[])
        );
    }
}
