//! Java artifact synthesis.
//!
//! [`Synthesizer`] turns [`StatementMetadata`] into source fragments for a
//! Spring application backed by `NamedParameterJdbcTemplate` and Lombok:
//!
//! | kind | artifacts |
//! |---|---|
//! | Read | response shape, `List<Shape> get<Domain>(..)`, `@GetMapping` route |
//! | Insert | request shape, `int insert<Domain>(Shape request)`, `@PostMapping` route |
//! | Update | request shape of SET fields, `int update<Domain>(set.., where..)`, `@PutMapping` route |
//! | Delete | `int delete<Domain>(where..)`, `@DeleteMapping` route |
//!
//! Output depends only on the metadata and [`SynthesisOptions`].

mod access;
mod java;
mod options;
mod route;
mod shape;
mod strategy;

pub use options::{SynthesisOptions, DEFAULT_BUILDER_THRESHOLD};
pub use strategy::{
    select_strategy, AssemblyStrategy, FieldValue, FluentAssembly, MutationAssembly,
};

use serde::Serialize;
use tracing::debug;

use crate::error::{GenerateError, Result};
use crate::metadata::{BoundColumn, ColumnDescriptor, ParameterDescriptor, StatementMetadata};
use crate::naming::{capitalize, to_kebab, to_lower_camel, to_upper_camel};
use crate::rewrite::names::NameAllocator;

use java::JavaVar;
use route::{route_method, RouteInputs, Verb};
use shape::render_shape;

/// Locals of generated methods that parameters must not shadow.
const METHOD_LOCALS: [&str; 6] = ["sql", "params", "rs", "rowNum", "request", "row"];

/// What a generated fragment is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// A data-transfer class.
    Shape,
    /// A data-access method.
    AccessMethod,
    /// A controller route method.
    RouteMethod,
}

/// One generated source fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedArtifact {
    /// What the fragment is.
    pub kind: ArtifactKind,
    /// Class or method name.
    pub name: String,
    /// Fully qualified imports the fragment needs, sorted.
    pub imports: Vec<String>,
    /// Java source.
    pub source: String,
}

pub(crate) struct Context<'a> {
    options: &'a SynthesisOptions,
    domain: String,
    path: String,
    sql: &'a str,
}

pub(crate) fn getter_call(target: &str, field: &str) -> String {
    format!("{target}.get{}()", capitalize(field))
}

/// Generates Java artifacts from statement metadata.
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    options: SynthesisOptions,
}

impl Synthesizer {
    /// Creates a synthesizer with the given options.
    #[must_use]
    pub const fn new(options: SynthesisOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &SynthesisOptions {
        &self.options
    }

    /// Synthesizes the artifacts for `metadata`, naming them after `domain`.
    ///
    /// # Errors
    ///
    /// Returns `ContractViolation` if `domain` yields no identifier.
    pub fn synthesize(
        &self,
        domain: &str,
        metadata: &StatementMetadata,
    ) -> Result<Vec<GeneratedArtifact>> {
        let domain_name = to_upper_camel(domain);
        if domain_name.is_empty() {
            return Err(GenerateError::ContractViolation(format!(
                "domain '{domain}' has no identifier characters"
            )));
        }
        let ctx = Context {
            options: &self.options,
            domain: domain_name,
            path: route_path(&self.options.base_path, domain),
            sql: metadata.sql(),
        };

        let artifacts = match metadata {
            StatementMetadata::Read {
                columns,
                parameters,
                ..
            } => read_artifacts(&ctx, columns, parameters),
            StatementMetadata::Insert { columns, .. } => insert_artifacts(&ctx, columns),
            StatementMetadata::Update {
                set_columns,
                where_columns,
                ..
            } => update_artifacts(&ctx, set_columns, where_columns),
            StatementMetadata::Delete { where_columns, .. } => {
                delete_artifacts(&ctx, where_columns)
            }
        };

        debug!(
            domain = %ctx.domain,
            kind = %metadata.kind(),
            artifacts = artifacts.len(),
            "Synthesized artifacts"
        );
        Ok(artifacts)
    }
}

fn route_path(base_path: &str, domain: &str) -> String {
    let base = base_path.trim_matches('/');
    if base.is_empty() {
        format!("/{}", to_kebab(domain))
    } else {
        format!("/{base}/{}", to_kebab(domain))
    }
}

fn identifier(names: &mut NameAllocator, base: &str, fallback: impl FnOnce() -> String) -> String {
    let camel = to_lower_camel(base);
    if camel.is_empty() {
        names.allocate(&fallback())
    } else {
        names.allocate(&camel)
    }
}

fn method_names() -> NameAllocator {
    NameAllocator::with_reserved(METHOD_LOCALS)
}

/// Shape fields and their row-mapping expressions, labeled by alias.
fn read_fields(columns: &[ColumnDescriptor]) -> (Vec<JavaVar>, Vec<FieldValue>) {
    let mut names = NameAllocator::default();
    columns
        .iter()
        .map(|column| {
            let label = column.label();
            let name = identifier(&mut names, label, || {
                format!("column{}", column.ordinal_position)
            });
            let value = column.mapping.read_expression("rs", label, column.nullable);
            let var = JavaVar {
                name: name.clone(),
                host: column.mapping.host,
                placeholder: String::new(),
            };
            (var, FieldValue::new(name, value))
        })
        .unzip()
}

fn parameter_vars(names: &mut NameAllocator, parameters: &[ParameterDescriptor]) -> Vec<JavaVar> {
    parameters
        .iter()
        .map(|p| JavaVar {
            name: identifier(names, &p.display_name(), || format!("param{}", p.position)),
            host: p.mapping.host,
            placeholder: p.placeholder.clone(),
        })
        .collect()
}

/// Variables for bound columns. Generic placeholders are named after the
/// column they write.
fn bound_vars(names: &mut NameAllocator, bound: &[BoundColumn]) -> Vec<JavaVar> {
    bound
        .iter()
        .map(|b| {
            let base = b
                .parameter
                .name
                .as_deref()
                .unwrap_or(&b.column.source_name);
            JavaVar {
                name: identifier(names, base, || format!("param{}", b.parameter.position)),
                host: b.column.mapping.host,
                placeholder: b.parameter.placeholder.clone(),
            }
        })
        .collect()
}

fn names_of(vars: &[JavaVar]) -> Vec<String> {
    vars.iter().map(|v| v.name.clone()).collect()
}

fn read_artifacts(
    ctx: &Context<'_>,
    columns: &[ColumnDescriptor],
    parameters: &[ParameterDescriptor],
) -> Vec<GeneratedArtifact> {
    let shape_name = format!("{}Response", ctx.domain);
    let (fields, values) = read_fields(columns);
    let params = parameter_vars(&mut method_names(), parameters);

    let access = access::read_method(ctx, &shape_name, &params, &values);
    let route = route_method(
        ctx,
        Verb::Get,
        &access.name,
        &format!("List<{shape_name}>"),
        &RouteInputs {
            body: None,
            params: &params,
        },
        &names_of(&params),
    );
    vec![render_shape(&shape_name, &fields), access, route]
}

fn insert_artifacts(ctx: &Context<'_>, columns: &[BoundColumn]) -> Vec<GeneratedArtifact> {
    let shape_name = format!("{}Request", ctx.domain);
    let fields = bound_vars(&mut NameAllocator::default(), columns);

    let access = access::insert_method(ctx, &shape_name, &fields);
    let route = route_method(
        ctx,
        Verb::Post,
        &access.name,
        "Integer",
        &RouteInputs {
            body: Some(&shape_name),
            params: &[],
        },
        &[String::from("request")],
    );
    vec![render_shape(&shape_name, &fields), access, route]
}

fn update_artifacts(
    ctx: &Context<'_>,
    set_columns: &[BoundColumn],
    where_columns: &[BoundColumn],
) -> Vec<GeneratedArtifact> {
    let shape_name = format!("{}Request", ctx.domain);
    let mut names = method_names();
    let set = bound_vars(&mut names, set_columns);
    let filters = bound_vars(&mut names, where_columns);

    let mut artifacts = Vec::with_capacity(3);
    let body = if set.is_empty() {
        None
    } else {
        artifacts.push(render_shape(&shape_name, &set));
        Some(shape_name.as_str())
    };
    let arguments: Vec<String> = set
        .iter()
        .map(|field| getter_call("request", &field.name))
        .chain(names_of(&filters))
        .collect();

    let access = access::update_method(ctx, &set, &filters);
    let route = route_method(
        ctx,
        Verb::Put,
        &access.name,
        "Integer",
        &RouteInputs {
            body,
            params: &filters,
        },
        &arguments,
    );
    artifacts.push(access);
    artifacts.push(route);
    artifacts
}

fn delete_artifacts(ctx: &Context<'_>, where_columns: &[BoundColumn]) -> Vec<GeneratedArtifact> {
    let filters = bound_vars(&mut method_names(), where_columns);
    let access = access::delete_method(ctx, &filters);
    let route = route_method(
        ctx,
        Verb::Delete,
        &access.name,
        "Integer",
        &RouteInputs {
            body: None,
            params: &filters,
        },
        &names_of(&filters),
    );
    vec![access, route]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_map::lookup;

    fn column(name: &str, alias: Option<&str>, vendor: &str, ordinal: usize) -> ColumnDescriptor {
        ColumnDescriptor {
            source_name: name.to_string(),
            alias: alias.map(str::to_string),
            vendor_type_name: vendor.to_string(),
            mapping: lookup(vendor).unwrap(),
            nullable: false,
            ordinal_position: ordinal,
        }
    }

    fn parameter(position: usize, name: Option<&str>, placeholder: &str) -> ParameterDescriptor {
        ParameterDescriptor {
            position,
            name: name.map(str::to_string),
            placeholder: placeholder.to_string(),
            vendor_type_name: String::from("INTEGER"),
            mapping: lookup("INTEGER").unwrap(),
        }
    }

    fn read(columns: Vec<ColumnDescriptor>, parameters: Vec<ParameterDescriptor>) -> StatementMetadata {
        StatementMetadata::Read {
            columns,
            parameters,
            sql: String::from("SELECT order_id, status AS state FROM orders WHERE customer_id = :customerId"),
        }
    }

    #[test]
    fn test_read_artifacts() {
        let metadata = read(
            vec![
                column("order_id", None, "INTEGER", 1),
                column("status", Some("state"), "TEXT", 2),
            ],
            vec![parameter(1, Some("customerId"), "customerId")],
        );
        let artifacts = Synthesizer::default().synthesize("order", &metadata).unwrap();
        let kinds: Vec<ArtifactKind> = artifacts.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![ArtifactKind::Shape, ArtifactKind::AccessMethod, ArtifactKind::RouteMethod]
        );
        assert_eq!(artifacts[0].name, "OrderResponse");
        assert!(artifacts[0].source.contains("private String state;"));

        let access = &artifacts[1].source;
        assert!(access.starts_with("public List<OrderResponse> getOrder(Integer customerId) {\n"));
        assert!(access.contains(".addValue(\"customerId\", customerId)"));
        assert!(access.contains("return namedParameterJdbcTemplate.query(sql, params, (rs, rowNum) -> {"));
        assert!(access.contains(".orderId(rs.getInt(\"order_id\"))"));
        assert!(access.contains(".state(rs.getString(\"state\"))"));

        let route = &artifacts[2].source;
        assert!(route.starts_with("@GetMapping(\"/order\")\n"));
        assert!(route.contains("@RequestParam Integer customerId"));
        assert!(route.contains("return ResponseEntity.ok(repository.getOrder(customerId));"));
    }

    #[test]
    fn test_empty_alias_is_the_label() {
        let metadata = read(vec![column("status", Some(""), "TEXT", 1)], vec![]);
        let artifacts = Synthesizer::default().synthesize("order", &metadata).unwrap();
        assert!(artifacts[0].source.contains("private String column1;"));
        assert!(artifacts[1].source.contains(".column1(rs.getString(\"\"))"));
    }

    #[test]
    fn test_generic_parameter_keeps_its_placeholder() {
        let metadata = read(
            vec![column("order_id", None, "INTEGER", 1)],
            vec![parameter(1, None, "param2")],
        );
        let artifacts = Synthesizer::default().synthesize("order", &metadata).unwrap();
        assert!(artifacts[1].source.contains("getOrder(Integer param1)"));
        assert!(artifacts[1].source.contains(".addValue(\"param2\", param1)"));
    }

    #[test]
    fn test_parameters_do_not_shadow_locals() {
        let metadata = read(
            vec![column("order_id", None, "INTEGER", 1)],
            vec![parameter(1, Some("sql"), "sql")],
        );
        let artifacts = Synthesizer::default().synthesize("order", &metadata).unwrap();
        assert!(artifacts[1].source.contains("getOrder(Integer sql2)"));
        assert!(artifacts[1].source.contains(".addValue(\"sql\", sql2)"));
    }

    #[test]
    fn test_wide_shape_uses_setters() {
        let columns = (1..=3)
            .map(|i| column(&format!("c{i}"), None, "TEXT", i))
            .collect();
        let options = SynthesisOptions {
            builder_threshold: 2,
            ..SynthesisOptions::default()
        };
        let artifacts = Synthesizer::new(options)
            .synthesize("wide", &read(columns, vec![]))
            .unwrap();
        assert!(artifacts[1].source.contains("WideResponse row = new WideResponse();"));
        assert!(artifacts[1].source.contains("row.setC3(rs.getString(\"c3\"));"));
    }

    #[test]
    fn test_route_path_uses_base_path() {
        assert_eq!(route_path("", "OrderItem"), "/order-item");
        assert_eq!(route_path("/api/", "order_item"), "/api/order-item");
        assert_eq!(route_path("api", "orders"), "/api/orders");
    }

    #[test]
    fn test_domain_without_identifier_is_rejected() {
        let metadata = read(vec![], vec![]);
        let err = Synthesizer::default().synthesize("--", &metadata).unwrap_err();
        assert!(matches!(err, GenerateError::ContractViolation(_)));
    }
}
