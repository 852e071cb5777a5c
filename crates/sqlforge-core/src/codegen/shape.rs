//! Lombok data-transfer shapes.

use super::java::{Imports, JavaVar};
use super::{ArtifactKind, GeneratedArtifact};

const LOMBOK: [&str; 4] = [
    "lombok.AllArgsConstructor",
    "lombok.Builder",
    "lombok.Data",
    "lombok.NoArgsConstructor",
];

/// Renders a `@Data @Builder` class with one private field per variable.
pub(crate) fn render_shape(name: &str, fields: &[JavaVar]) -> GeneratedArtifact {
    let mut imports = Imports::default();
    for import in LOMBOK {
        imports.add(import);
    }
    imports.add_hosts(fields);

    let mut source = imports.render();
    source.push_str("\n@Data\n@Builder\n@NoArgsConstructor\n@AllArgsConstructor\n");
    source.push_str(&format!("public class {name} {{\n"));
    for field in fields {
        source.push_str(&format!("    private {};\n", field.declaration()));
    }
    source.push_str("}\n");

    GeneratedArtifact {
        kind: ArtifactKind::Shape,
        name: name.to_string(),
        imports: imports.into_vec(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_map::HostType;

    #[test]
    fn test_render_shape() {
        let fields = vec![
            JavaVar {
                name: String::from("orderId"),
                host: HostType::Integer,
                placeholder: String::new(),
            },
            JavaVar {
                name: String::from("total"),
                host: HostType::BigDecimal,
                placeholder: String::new(),
            },
        ];
        let artifact = render_shape("OrderResponse", &fields);
        assert_eq!(artifact.kind, ArtifactKind::Shape);
        assert_eq!(
            artifact.source,
            "import java.math.BigDecimal;\n\
             import lombok.AllArgsConstructor;\n\
             import lombok.Builder;\n\
             import lombok.Data;\n\
             import lombok.NoArgsConstructor;\n\
             \n\
             @Data\n\
             @Builder\n\
             @NoArgsConstructor\n\
             @AllArgsConstructor\n\
             public class OrderResponse {\n\
             \x20   private Integer orderId;\n\
             \x20   private BigDecimal total;\n\
             }\n"
        );
        assert_eq!(artifact.imports[0], "java.math.BigDecimal");
    }
}
