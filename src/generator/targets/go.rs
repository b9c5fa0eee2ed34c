use crate::generator::dialect::{
    ControllerView, Dialect, ModelView, ProjectContext, RouteView, ServiceView, SourceFile,
    TypeTable,
};
use crate::generator::naming::{
    capitalize_first, comment_text, file_stem, identifier_or, string_literal, SourceBuilder,
};
use crate::generator::target::Target;
use crate::generator::templates::{render, GoDockerfileTemplate, GoMainTemplate, GoModTemplate};
use crate::graph::FieldType;

use super::{readme, route_mounts};

const TYPES: TypeTable = TypeTable {
    string: "string",
    number: "float64",
    boolean: "bool",
    date: "time.Time",
    object_id: "string",
    any: "interface{}",
};

const INDENT: &str = "\t";

/// Gin + GORM.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoDialect;

/// Write an import block; groups are separated by a blank line and empty
/// groups are dropped. Nothing is written when every group is empty.
fn imports(src: &mut SourceBuilder, groups: &[Vec<String>]) {
    let groups: Vec<&Vec<String>> = groups.iter().filter(|g| !g.is_empty()).collect();
    if groups.is_empty() {
        return;
    }
    src.blank().line(0, "import (");
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            src.blank();
        }
        for path in group.iter() {
            src.line(1, format!("\"{path}\""));
        }
    }
    src.line(0, ")");
}

fn json_tag(name: &str, required: bool) -> String {
    if required {
        format!("`json:\"{name}\" binding:\"required\"`")
    } else {
        format!("`json:\"{name}\"`")
    }
}

impl Dialect for GoDialect {
    fn target(&self) -> Target {
        Target::Go
    }

    fn types(&self) -> &'static TypeTable {
        &TYPES
    }

    fn layout(&self) -> &'static [&'static str] {
        &["models", "services", "controllers", "routes"]
    }

    fn project_files(&self, ctx: &ProjectContext<'_>) -> anyhow::Result<Vec<SourceFile>> {
        let module = ctx.package_name.as_str();
        Ok(vec![
            render(&GoModTemplate { module }, "go.mod")?,
            render(
                &GoMainTemplate {
                    module,
                    routes: route_mounts(ctx),
                },
                "main.go",
            )?,
        ])
    }

    fn model_files(&self, model: &ModelView<'_>, _ctx: &ProjectContext<'_>) -> Vec<SourceFile> {
        let name = model.name();
        let mut src = SourceBuilder::new(INDENT);
        src.line(0, "package models");
        if model.fields.iter().any(|f| f.field_type == FieldType::Date) {
            src.blank().line(0, "import \"time\"");
        }
        src.blank()
            .line(0, format!("type {name} struct {{"))
            .line(1, "ID uint `json:\"id\" gorm:\"primaryKey\"`");
        for field in model.fields {
            src.line(
                1,
                format!(
                    "{} {} {}",
                    capitalize_first(&field.name),
                    self.types().map(&field.field_type),
                    json_tag(&field.name, field.required)
                ),
            );
        }
        src.line(0, "}");
        vec![SourceFile::new(
            format!("models/{}.go", file_stem(name)),
            src.finish(),
        )]
    }

    fn service_file(
        &self,
        service: &ServiceView<'_>,
        ctx: &ProjectContext<'_>,
    ) -> Option<SourceFile> {
        let name = service.name();
        let has_models = !service.models.is_empty();
        let mut src = SourceBuilder::new(INDENT);
        src.line(0, "package services");
        if has_models {
            imports(
                &mut src,
                &[
                    vec![format!("{}/models", ctx.package_name)],
                    vec!["gorm.io/gorm".to_string()],
                ],
            );
        }
        src.blank()
            .line(0, format!("// {name}Service holds the {name} business logic."));
        if has_models {
            src.line(0, format!("type {name}Service struct {{"))
                .line(1, "DB *gorm.DB")
                .line(0, "}");
        } else {
            src.line(0, format!("type {name}Service struct{{}}"));
        }
        for model in &service.models {
            let m = &model.label;
            src.blank()
                .line(
                    0,
                    format!("func (s *{name}Service) GetAll{m}s() ([]models.{m}, error) {{"),
                )
                .line(1, format!("var items []models.{m}"))
                .line(1, "err := s.DB.Find(&items).Error")
                .line(1, "return items, err")
                .line(0, "}");
        }
        for (i, rule) in service.rules.iter().enumerate() {
            let ident = capitalize_first(&identifier_or(&rule.name, &format!("Rule{i}")));
            src.blank()
                .line(0, format!("// {ident} implements the {} rule.", comment_text(&rule.name)))
                .line(0, format!("// {}", comment_text(&rule.description)))
                .line(0, format!("func (s *{name}Service) {ident}() error {{"))
                .line(1, "return nil")
                .line(0, "}");
        }
        Some(SourceFile::new(
            format!("services/{}_service.go", file_stem(name)),
            src.finish(),
        ))
    }

    fn controller_file(
        &self,
        controller: &ControllerView<'_>,
        ctx: &ProjectContext<'_>,
    ) -> Option<SourceFile> {
        let name = controller.name();
        let has_handlers =
            controller.handler_pairs().next().is_some() || !controller.rules.is_empty();
        let mut src = SourceBuilder::new(INDENT);
        src.line(0, "package controllers");

        let mut std_imports = Vec::new();
        let mut local_imports = Vec::new();
        let mut third_party = Vec::new();
        if has_handlers {
            std_imports.push("net/http".to_string());
            third_party.push("github.com/gin-gonic/gin".to_string());
        }
        if !controller.services.is_empty() {
            local_imports.push(format!("{}/services", ctx.package_name));
        }
        imports(&mut src, &[std_imports, local_imports, third_party]);

        src.blank();
        if controller.services.is_empty() {
            src.line(0, format!("type {name}Controller struct{{}}"));
        } else {
            src.line(0, format!("type {name}Controller struct {{"));
            for link in &controller.services {
                src.line(
                    1,
                    format!("{0}Service *services.{0}Service", link.name()),
                );
            }
            src.line(0, "}");
        }

        for (service, model) in controller.handler_pairs() {
            src.blank()
                .line(
                    0,
                    format!("func (ctl *{name}Controller) Get{model}s(c *gin.Context) {{"),
                )
                .line(1, format!("data, err := ctl.{service}Service.GetAll{model}s()"))
                .line(1, "if err != nil {")
                .line(
                    2,
                    "c.JSON(http.StatusInternalServerError, gin.H{\"error\": err.Error()})",
                )
                .line(2, "return")
                .line(1, "}")
                .line(1, "c.JSON(http.StatusOK, data)")
                .line(0, "}");
        }
        for (i, rule) in controller.rules.iter().enumerate() {
            let ident = capitalize_first(&identifier_or(&rule.name, &format!("Rule{i}")));
            let message = string_literal(&format!("Rule {} executed", rule.name));
            src.blank()
                .line(0, format!("// {ident}: {}", comment_text(&rule.description)))
                .line(
                    0,
                    format!("func (ctl *{name}Controller) {ident}(c *gin.Context) {{"),
                )
                .line(1, format!("c.JSON(http.StatusOK, gin.H{{\"message\": {message}}})"))
                .line(0, "}");
        }
        Some(SourceFile::new(
            format!("controllers/{}_controller.go", file_stem(name)),
            src.finish(),
        ))
    }

    fn route_file(&self, route: &RouteView<'_>, ctx: &ProjectContext<'_>) -> Option<SourceFile> {
        let ident = capitalize_first(route.name());
        let mut src = SourceBuilder::new(INDENT);
        src.line(0, "package routes");

        let std_imports = if route.endpoints.is_empty() {
            vec![]
        } else {
            vec!["net/http".to_string()]
        };
        let local_imports = if route.controllers.is_empty() {
            vec![]
        } else {
            vec![format!("{}/controllers", ctx.package_name)]
        };
        imports(
            &mut src,
            &[
                std_imports,
                local_imports,
                vec!["github.com/gin-gonic/gin".to_string()],
            ],
        );

        if !route.controllers.is_empty() {
            src.blank().line(0, "var (");
            for controller in &route.controllers {
                src.line(1, format!("_ *controllers.{}Controller", controller.label));
            }
            src.line(0, ")");
        }

        src.blank()
            .line(0, format!("func Register{ident}Routes(r *gin.Engine) {{"));
        for endpoint in route.endpoints {
            let message = string_literal(&format!("{} endpoint", endpoint.name));
            src.line(1, format!("// Endpoint: {}", comment_text(&endpoint.name)))
                .line(
                    1,
                    format!(
                        "r.{}(\"{}\", func(c *gin.Context) {{",
                        endpoint.method.as_str(),
                        endpoint.normalized_path()
                    ),
                )
                .line(2, format!("c.JSON(http.StatusOK, gin.H{{\"message\": {message}}})"))
                .line(1, "})");
        }
        src.line(0, "}");
        Some(SourceFile::new(
            format!("routes/{}_routes.go", file_stem(route.name())),
            src.finish(),
        ))
    }

    fn support_files(&self, ctx: &ProjectContext<'_>) -> anyhow::Result<Vec<SourceFile>> {
        Ok(vec![
            render(&GoDockerfileTemplate, "Dockerfile")?,
            readme(
                ctx,
                Target::Go,
                vec!["go mod tidy", "go run ."],
                "/api-docs",
            )?,
        ])
    }
}
