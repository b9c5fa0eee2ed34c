use std::collections::BTreeSet;

use anyhow::Context;

use crate::generator::dialect::{
    ControllerView, Dialect, ModelView, ProjectContext, RouteView, ServiceView, SourceFile,
    TypeTable,
};
use crate::generator::naming::{
    comment_text, identifier_or, lower_first, path_segment, string_literal, SourceBuilder,
};
use crate::generator::target::Target;
use crate::generator::templates::{
    render, JavaApplicationTemplate, JavaDockerfileTemplate, JavaPomTemplate,
    JavaPropertiesTemplate,
};
use crate::graph::{FieldType, HttpMethod};

use super::readme;

pub const BASE_PACKAGE: &str = "com.arachnet.api";
const GROUP_ID: &str = "com.arachnet";
const PACKAGE_DIR: &str = "src/main/java/com/arachnet/api";

const TYPES: TypeTable = TypeTable {
    string: "String",
    number: "Double",
    boolean: "Boolean",
    date: "LocalDateTime",
    object_id: "String",
    any: "Object",
};

const INDENT: &str = "    ";

/// Spring Boot + JPA + Lombok.
#[derive(Debug, Default, Clone, Copy)]
pub struct JavaDialect;

fn source_path(package: &str, class: &str) -> String {
    format!("{PACKAGE_DIR}/{package}/{}.java", path_segment(class))
}

/// `package` line followed by a sorted import block.
fn header(src: &mut SourceBuilder, package: &str, imports: &BTreeSet<String>) {
    src.line(0, format!("package {BASE_PACKAGE}.{package};"));
    if !imports.is_empty() {
        src.blank();
        for import in imports {
            src.line(0, format!("import {import};"));
        }
    }
    src.blank();
}

fn mapping_annotation(method: HttpMethod) -> &'static str {
    match method {
        HttpMethod::Get => "GetMapping",
        HttpMethod::Post => "PostMapping",
        HttpMethod::Put => "PutMapping",
        HttpMethod::Delete => "DeleteMapping",
    }
}

impl JavaDialect {
    fn entity(&self, model: &ModelView<'_>) -> SourceFile {
        let name = model.name();
        let mut imports: BTreeSet<String> = ["jakarta.persistence.*", "lombok.Data"]
            .into_iter()
            .map(String::from)
            .collect();
        if model.fields.iter().any(|f| f.field_type == FieldType::Date) {
            imports.insert("java.time.LocalDateTime".to_string());
        }
        let mut src = SourceBuilder::new(INDENT);
        header(&mut src, "models", &imports);
        src.line(0, "@Entity")
            .line(0, "@Data")
            .line(0, format!("public class {name} {{"))
            .line(1, "@Id")
            .line(1, "@GeneratedValue(strategy = GenerationType.IDENTITY)")
            .line(1, "private Long id;");
        for field in model.fields {
            src.blank();
            if field.required {
                src.line(1, "@Column(nullable = false)");
            }
            src.line(
                1,
                format!(
                    "private {} {};",
                    self.types().map(&field.field_type),
                    field.name
                ),
            );
        }
        src.line(0, "}");
        SourceFile::new(source_path("models", name), src.finish())
    }

    fn repository(&self, model: &ModelView<'_>) -> SourceFile {
        let name = model.name();
        let imports: BTreeSet<String> = [
            format!("{BASE_PACKAGE}.models.{name}"),
            "org.springframework.data.jpa.repository.JpaRepository".to_string(),
            "org.springframework.stereotype.Repository".to_string(),
        ]
        .into_iter()
        .collect();
        let mut src = SourceBuilder::new(INDENT);
        header(&mut src, "repositories", &imports);
        src.line(0, "@Repository")
            .line(
                0,
                format!("public interface {name}Repository extends JpaRepository<{name}, Long> {{"),
            )
            .line(0, "}");
        SourceFile::new(
            source_path("repositories", &format!("{name}Repository")),
            src.finish(),
        )
    }
}

impl Dialect for JavaDialect {
    fn target(&self) -> Target {
        Target::Java
    }

    fn types(&self) -> &'static TypeTable {
        &TYPES
    }

    fn layout(&self) -> &'static [&'static str] {
        &[
            "src/main/java/com/arachnet/api/models",
            "src/main/java/com/arachnet/api/repositories",
            "src/main/java/com/arachnet/api/services",
            "src/main/java/com/arachnet/api/controllers",
            "src/main/java/com/arachnet/api/routes",
            "src/main/resources",
        ]
    }

    fn project_files(&self, ctx: &ProjectContext<'_>) -> anyhow::Result<Vec<SourceFile>> {
        let artifact_id = ctx.package_name.as_str();
        let descriptor = ctx
            .descriptor
            .to_pretty_json()
            .context("Failed to serialize the interface descriptor")?;
        Ok(vec![
            render(
                &JavaPomTemplate {
                    group_id: GROUP_ID,
                    artifact_id,
                    version: &ctx.descriptor.info.version,
                },
                "pom.xml",
            )?,
            render(
                &JavaApplicationTemplate {
                    base_package: BASE_PACKAGE,
                },
                format!("{PACKAGE_DIR}/ApiApplication.java"),
            )?,
            render(
                &JavaPropertiesTemplate { artifact_id },
                "src/main/resources/application.properties",
            )?,
            SourceFile::new("src/main/resources/static/openapi.json", descriptor),
        ])
    }

    fn model_files(&self, model: &ModelView<'_>, _ctx: &ProjectContext<'_>) -> Vec<SourceFile> {
        vec![self.entity(model), self.repository(model)]
    }

    fn service_file(
        &self,
        service: &ServiceView<'_>,
        _ctx: &ProjectContext<'_>,
    ) -> Option<SourceFile> {
        let name = service.name();
        let mut imports = BTreeSet::from(["org.springframework.stereotype.Service".to_string()]);
        if !service.models.is_empty() {
            imports.insert("java.util.List".to_string());
            imports.insert("lombok.RequiredArgsConstructor".to_string());
        }
        for model in &service.models {
            imports.insert(format!("{BASE_PACKAGE}.models.{}", model.label));
            imports.insert(format!("{BASE_PACKAGE}.repositories.{}Repository", model.label));
        }

        let mut src = SourceBuilder::new(INDENT);
        header(&mut src, "services", &imports);
        src.line(0, "@Service");
        if !service.models.is_empty() {
            src.line(0, "@RequiredArgsConstructor");
        }
        src.line(0, format!("public class {name}Service {{"));
        for model in &service.models {
            src.line(
                1,
                format!(
                    "private final {}Repository {}Repository;",
                    model.label,
                    lower_first(&model.label)
                ),
            );
        }
        for model in &service.models {
            let m = &model.label;
            src.blank()
                .line(1, format!("public List<{m}> getAll{m}s() {{"))
                .line(2, format!("return {}Repository.findAll();", lower_first(m)))
                .line(1, "}");
        }
        for (i, rule) in service.rules.iter().enumerate() {
            src.blank()
                .line(1, format!("// Rule: {}", comment_text(&rule.name)))
                .line(
                    1,
                    format!(
                        "public void {}() {{",
                        identifier_or(&rule.name, &format!("rule{i}"))
                    ),
                )
                .line(2, format!("// {}", comment_text(&rule.description)))
                .line(1, "}");
        }
        src.line(0, "}");
        Some(SourceFile::new(
            source_path("services", &format!("{name}Service")),
            src.finish(),
        ))
    }

    fn controller_file(
        &self,
        controller: &ControllerView<'_>,
        _ctx: &ProjectContext<'_>,
    ) -> Option<SourceFile> {
        let name = controller.name();
        let mut imports = BTreeSet::from(["org.springframework.stereotype.Component".to_string()]);
        if !controller.services.is_empty() {
            imports.insert("lombok.RequiredArgsConstructor".to_string());
        }
        for link in &controller.services {
            imports.insert(format!("{BASE_PACKAGE}.services.{}Service", link.name()));
        }
        for (_, model) in controller.handler_pairs() {
            imports.insert("java.util.List".to_string());
            imports.insert(format!("{BASE_PACKAGE}.models.{model}"));
        }
        if !controller.rules.is_empty() {
            imports.insert("java.util.Map".to_string());
        }

        let mut src = SourceBuilder::new(INDENT);
        header(&mut src, "controllers", &imports);
        src.line(0, "@Component");
        if !controller.services.is_empty() {
            src.line(0, "@RequiredArgsConstructor");
        }
        src.line(0, format!("public class {name}Controller {{"));
        for link in &controller.services {
            src.line(
                1,
                format!(
                    "private final {}Service {}Service;",
                    link.name(),
                    lower_first(link.name())
                ),
            );
        }
        for (service, model) in controller.handler_pairs() {
            src.blank()
                .line(1, format!("public List<{model}> get{model}s() {{"))
                .line(
                    2,
                    format!("return {}Service.getAll{model}s();", lower_first(service)),
                )
                .line(1, "}");
        }
        for (i, rule) in controller.rules.iter().enumerate() {
            let message = string_literal(&format!("Rule {} executed", rule.name));
            src.blank()
                .line(1, format!("// Rule: {}", comment_text(&rule.name)))
                .line(
                    1,
                    format!(
                        "public Map<String, String> {}() {{",
                        identifier_or(&rule.name, &format!("rule{i}"))
                    ),
                )
                .line(2, format!("// {}", comment_text(&rule.description)))
                .line(2, format!("return Map.of(\"message\", {message});"))
                .line(1, "}");
        }
        src.line(0, "}");
        Some(SourceFile::new(
            source_path("controllers", &format!("{name}Controller")),
            src.finish(),
        ))
    }

    fn route_file(&self, route: &RouteView<'_>, _ctx: &ProjectContext<'_>) -> Option<SourceFile> {
        let name = route.name();
        let mut imports = BTreeSet::from(["org.springframework.web.bind.annotation.*".to_string()]);
        if !route.controllers.is_empty() {
            imports.insert("lombok.RequiredArgsConstructor".to_string());
        }
        if !route.endpoints.is_empty() {
            imports.insert("java.util.Map".to_string());
        }
        for controller in &route.controllers {
            imports.insert(format!(
                "{BASE_PACKAGE}.controllers.{}Controller",
                controller.label
            ));
        }

        let mut src = SourceBuilder::new(INDENT);
        header(&mut src, "routes", &imports);
        src.line(0, "@RestController");
        if !route.controllers.is_empty() {
            src.line(0, "@RequiredArgsConstructor");
        }
        src.line(0, format!("public class {name}Routes {{"));
        for controller in &route.controllers {
            src.line(
                1,
                format!(
                    "private final {}Controller {}Controller;",
                    controller.label,
                    lower_first(&controller.label)
                ),
            );
        }
        for (i, endpoint) in route.endpoints.iter().enumerate() {
            let message = string_literal(&format!("{} endpoint", endpoint.name));
            src.blank()
                .line(
                    1,
                    format!(
                        "@{}(\"{}\")",
                        mapping_annotation(endpoint.method),
                        endpoint.normalized_path()
                    ),
                )
                .line(
                    1,
                    format!(
                        "public Map<String, String> {}() {{",
                        identifier_or(&endpoint.name, &format!("endpoint{i}"))
                    ),
                )
                .line(2, format!("// Endpoint: {}", comment_text(&endpoint.name)))
                .line(2, format!("return Map.of(\"message\", {message});"))
                .line(1, "}");
        }
        src.line(0, "}");
        Some(SourceFile::new(
            source_path("routes", &format!("{name}Routes")),
            src.finish(),
        ))
    }

    fn support_files(&self, ctx: &ProjectContext<'_>) -> anyhow::Result<Vec<SourceFile>> {
        Ok(vec![
            render(
                &JavaDockerfileTemplate {
                    artifact_id: &ctx.package_name,
                    version: &ctx.descriptor.info.version,
                },
                "Dockerfile",
            )?,
            readme(
                ctx,
                Target::Java,
                vec!["mvn spring-boot:run"],
                "/openapi.json",
            )?,
        ])
    }
}
