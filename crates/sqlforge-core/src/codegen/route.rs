//! Spring MVC route methods delegating to the access layer.

use super::java::{indent, Imports, JavaVar};
use super::{ArtifactKind, Context, GeneratedArtifact};

const ANNOTATIONS: &str = "org.springframework.web.bind.annotation";

#[derive(Debug, Clone, Copy)]
pub(crate) enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    const fn annotation(self) -> &'static str {
        match self {
            Self::Get => "GetMapping",
            Self::Post => "PostMapping",
            Self::Put => "PutMapping",
            Self::Delete => "DeleteMapping",
        }
    }
}

/// A route method's inputs: an optional `@RequestBody` shape and
/// `@RequestParam` variables.
pub(crate) struct RouteInputs<'a> {
    pub body: Option<&'a str>,
    pub params: &'a [JavaVar],
}

/// Renders a route named `name` that returns `ResponseEntity<returns>`
/// and passes `arguments` to the access method of the same name.
pub(crate) fn route_method(
    ctx: &Context<'_>,
    verb: Verb,
    name: &str,
    returns: &str,
    inputs: &RouteInputs<'_>,
    arguments: &[String],
) -> GeneratedArtifact {
    let mut imports = Imports::default();
    imports.add("org.springframework.http.ResponseEntity");
    imports.add(&format!("{ANNOTATIONS}.{}", verb.annotation()));
    if returns.starts_with("List<") {
        imports.add("java.util.List");
    }

    let mut declarations = Vec::new();
    if let Some(shape) = inputs.body {
        imports.add(&format!("{ANNOTATIONS}.RequestBody"));
        declarations.push(format!("@RequestBody {shape} request"));
    }
    if !inputs.params.is_empty() {
        imports.add(&format!("{ANNOTATIONS}.RequestParam"));
        imports.add_hosts(inputs.params);
    }
    declarations.extend(
        inputs
            .params
            .iter()
            .map(|p| format!("@RequestParam {}", p.declaration())),
    );

    let body = format!(
        "return ResponseEntity.ok({}.{name}({}));\n",
        ctx.options.repository_field,
        arguments.join(", ")
    );
    let source = format!(
        "@{}(\"{}\")\npublic ResponseEntity<{returns}> {name}({}) {{\n{}}}\n",
        verb.annotation(),
        ctx.path,
        declarations.join(", "),
        indent(&body, 1)
    );

    GeneratedArtifact {
        kind: ArtifactKind::RouteMethod,
        name: name.to_string(),
        imports: imports.into_vec(),
        source,
    }
}
