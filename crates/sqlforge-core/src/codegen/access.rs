//! Access-layer methods on `NamedParameterJdbcTemplate`.

use super::java::{indent, parameter_list, parameter_source, string_literal, Imports, JavaVar};
use super::strategy::{select_strategy, FieldValue};
use super::{ArtifactKind, Context, GeneratedArtifact};

const PARAMETER_SOURCE: &str = "org.springframework.jdbc.core.namedparam.MapSqlParameterSource";

fn direct_bindings(vars: &[JavaVar]) -> Vec<(String, String)> {
    vars.iter()
        .map(|v| (v.placeholder.clone(), v.name.clone()))
        .collect()
}

fn method(
    name: String,
    signature: String,
    body: &str,
    mut imports: Imports,
) -> GeneratedArtifact {
    imports.add(PARAMETER_SOURCE);
    let source = format!("public {signature} {{\n{}}}\n", indent(body, 1));
    GeneratedArtifact {
        kind: ArtifactKind::AccessMethod,
        name,
        imports: imports.into_vec(),
        source,
    }
}

/// `List<Shape> get<Domain>(params...)`, mapping each row with the
/// strategy chosen for the shape's width.
pub(crate) fn read_method(
    ctx: &Context<'_>,
    shape: &str,
    params: &[JavaVar],
    fields: &[FieldValue],
) -> GeneratedArtifact {
    let name = format!("get{}", ctx.domain);
    let assembly = select_strategy(fields.len(), ctx.options.builder_threshold).emit(shape, fields);

    let mut body = format!("String sql = {};\n", string_literal(ctx.sql));
    body.push_str(&parameter_source(&direct_bindings(params)));
    body.push_str(&format!(
        "return {}.query(sql, params, (rs, rowNum) -> {{\n",
        ctx.options.template_field
    ));
    body.push_str(&indent(&assembly, 1));
    body.push_str("});\n");

    let mut imports = Imports::default();
    imports.add("java.util.List");
    imports.add_hosts(params);
    let signature = format!("List<{shape}> {name}({})", parameter_list(params));
    method(name, signature, &body, imports)
}

fn update_body(ctx: &Context<'_>, bindings: &[(String, String)]) -> String {
    let mut body = format!("String sql = {};\n", string_literal(ctx.sql));
    body.push_str(&parameter_source(bindings));
    body.push_str(&format!(
        "return {}.update(sql, params);\n",
        ctx.options.template_field
    ));
    body
}

/// `int insert<Domain>(Shape request)`, binding each field through its
/// getter.
pub(crate) fn insert_method(
    ctx: &Context<'_>,
    shape: &str,
    fields: &[JavaVar],
) -> GeneratedArtifact {
    let name = format!("insert{}", ctx.domain);
    let bindings: Vec<(String, String)> = fields
        .iter()
        .map(|f| (f.placeholder.clone(), super::getter_call("request", &f.name)))
        .collect();
    let signature = format!("int {name}({shape} request)");
    method(name, signature, &update_body(ctx, &bindings), Imports::default())
}

/// `int update<Domain>(set..., where...)`.
pub(crate) fn update_method(
    ctx: &Context<'_>,
    set: &[JavaVar],
    filters: &[JavaVar],
) -> GeneratedArtifact {
    let name = format!("update{}", ctx.domain);
    let params: Vec<JavaVar> = set.iter().chain(filters).cloned().collect();
    let mut imports = Imports::default();
    imports.add_hosts(&params);
    let signature = format!("int {name}({})", parameter_list(&params));
    method(
        name,
        signature,
        &update_body(ctx, &direct_bindings(&params)),
        imports,
    )
}

/// `int delete<Domain>(where...)`.
pub(crate) fn delete_method(ctx: &Context<'_>, filters: &[JavaVar]) -> GeneratedArtifact {
    let name = format!("delete{}", ctx.domain);
    let mut imports = Imports::default();
    imports.add_hosts(filters);
    let signature = format!("int {name}({})", parameter_list(filters));
    method(
        name,
        signature,
        &update_body(ctx, &direct_bindings(filters)),
        imports,
    )
}
