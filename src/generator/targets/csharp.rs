use serde_json::json;

use crate::generator::dialect::{
    ControllerView, Dialect, ModelView, ProjectContext, RouteView, ServiceView, SourceFile,
    TypeTable,
};
use crate::generator::naming::{
    capitalize_first, comment_text, file_stem, identifier_or, lower_first, path_segment,
    string_literal, to_pascal_case, SourceBuilder,
};
use crate::generator::target::Target;
use crate::generator::templates::{
    render, CSharpDockerfileTemplate, CSharpProgramTemplate, CSharpProjectTemplate,
};
use crate::graph::{HttpMethod, NodeType};

use super::readme;

const TYPES: TypeTable = TypeTable {
    string: "string",
    number: "double",
    boolean: "bool",
    date: "DateTime",
    object_id: "string",
    any: "object",
};

const INDENT: &str = "    ";

/// ASP.NET Core + Entity Framework Core.
#[derive(Debug, Default, Clone, Copy)]
pub struct CSharpDialect;

/// Root namespace derived from the package slug (`arachnet-api` → `ArachnetApi`).
pub fn root_namespace(package_name: &str) -> String {
    let ns = to_pascal_case(package_name);
    if ns.is_empty() || ns.starts_with(|c: char| c.is_ascii_digit()) {
        format!("Arachnet{ns}")
    } else {
        ns
    }
}

fn is_reference_type(cs_type: &str) -> bool {
    matches!(cs_type, "string" | "object")
}

fn http_attribute(method: HttpMethod) -> &'static str {
    match method {
        HttpMethod::Get => "HttpGet",
        HttpMethod::Post => "HttpPost",
        HttpMethod::Put => "HttpPut",
        HttpMethod::Delete => "HttpDelete",
    }
}

fn header(src: &mut SourceBuilder, usings: &[String], namespace: &str) {
    for using in usings {
        src.line(0, format!("using {using};"));
    }
    if !usings.is_empty() {
        src.blank();
    }
    src.line(0, format!("namespace {namespace};")).blank();
}

impl CSharpDialect {
    fn db_context(&self, ctx: &ProjectContext<'_>, ns: &str) -> SourceFile {
        let models = ctx.labels(NodeType::Model);
        let mut usings = vec!["Microsoft.EntityFrameworkCore".to_string()];
        if !models.is_empty() {
            usings.push(format!("{ns}.Models"));
        }
        let mut src = SourceBuilder::new(INDENT);
        header(&mut src, &usings, &format!("{ns}.Data"));
        src.line(0, "public class AppDbContext : DbContext")
            .line(0, "{")
            .line(
                1,
                "public AppDbContext(DbContextOptions<AppDbContext> options) : base(options)",
            )
            .line(1, "{")
            .line(1, "}");
        for model in models {
            src.blank().line(
                1,
                format!("public DbSet<{model}> {model}s => Set<{model}>();"),
            );
        }
        src.line(0, "}");
        SourceFile::new("Data/AppDbContext.cs", src.finish())
    }
}

impl Dialect for CSharpDialect {
    fn target(&self) -> Target {
        Target::CSharp
    }

    fn types(&self) -> &'static TypeTable {
        &TYPES
    }

    fn layout(&self) -> &'static [&'static str] {
        &["Models", "Data", "Services", "Controllers", "Routes"]
    }

    fn project_files(&self, ctx: &ProjectContext<'_>) -> anyhow::Result<Vec<SourceFile>> {
        let ns = root_namespace(&ctx.package_name);
        let services = ctx
            .labels(NodeType::Service)
            .into_iter()
            .map(|label| format!("{label}Service"))
            .collect();
        let appsettings = json!({
            "ConnectionStrings": {
                "DefaultConnection": format!(
                    "Server=localhost;Database={ns};Trusted_Connection=True;TrustServerCertificate=True"
                )
            },
            "Logging": { "LogLevel": { "Default": "Information" } },
            "AllowedHosts": "*"
        });
        Ok(vec![
            render(&CSharpProjectTemplate { namespace: &ns }, format!("{ns}.csproj"))?,
            render(
                &CSharpProgramTemplate {
                    namespace: &ns,
                    services,
                },
                "Program.cs",
            )?,
            SourceFile::new(
                "appsettings.json",
                serde_json::to_string_pretty(&appsettings)? + "\n",
            ),
            self.db_context(ctx, &ns),
        ])
    }

    fn model_files(&self, model: &ModelView<'_>, ctx: &ProjectContext<'_>) -> Vec<SourceFile> {
        let name = model.name();
        let ns = root_namespace(&ctx.package_name);
        let mut src = SourceBuilder::new(INDENT);
        header(&mut src, &[], &format!("{ns}.Models"));
        src.line(0, format!("public class {name}"))
            .line(0, "{")
            .line(1, "public int Id { get; set; }");
        for field in model.fields {
            let cs_type = self.types().map(&field.field_type);
            let prop = capitalize_first(&field.name);
            let line = match (field.required, is_reference_type(cs_type)) {
                (true, true) => format!("public {cs_type} {prop} {{ get; set; }} = default!;"),
                (true, false) => format!("public {cs_type} {prop} {{ get; set; }}"),
                (false, _) => format!("public {cs_type}? {prop} {{ get; set; }}"),
            };
            src.line(1, line);
        }
        src.line(0, "}");
        vec![SourceFile::new(format!("Models/{}.cs", path_segment(name)), src.finish())]
    }

    fn service_file(
        &self,
        service: &ServiceView<'_>,
        ctx: &ProjectContext<'_>,
    ) -> Option<SourceFile> {
        let name = service.name();
        let ns = root_namespace(&ctx.package_name);
        let has_models = !service.models.is_empty();
        let usings = if has_models {
            vec![
                "Microsoft.EntityFrameworkCore".to_string(),
                format!("{ns}.Data"),
                format!("{ns}.Models"),
            ]
        } else {
            vec![]
        };
        let mut src = SourceBuilder::new(INDENT);
        header(&mut src, &usings, &format!("{ns}.Services"));
        src.line(0, format!("public class {name}Service")).line(0, "{");
        if has_models {
            src.line(1, "private readonly AppDbContext _context;")
                .blank()
                .line(1, format!("public {name}Service(AppDbContext context)"))
                .line(1, "{")
                .line(2, "_context = context;")
                .line(1, "}");
        }
        for model in &service.models {
            let m = &model.label;
            src.blank()
                .line(1, format!("public async Task<List<{m}>> GetAll{m}sAsync()"))
                .line(1, "{")
                .line(2, format!("return await _context.{m}s.ToListAsync();"))
                .line(1, "}");
        }
        for (i, rule) in service.rules.iter().enumerate() {
            let ident = capitalize_first(&identifier_or(&rule.name, &format!("Rule{i}")));
            src.blank()
                .line(1, format!("// Rule: {}", comment_text(&rule.name)))
                .line(1, format!("public void {ident}()"))
                .line(1, "{")
                .line(2, format!("// {}", comment_text(&rule.description)))
                .line(1, "}");
        }
        src.line(0, "}");
        Some(SourceFile::new(
            format!("Services/{}Service.cs", path_segment(name)),
            src.finish(),
        ))
    }

    fn controller_file(
        &self,
        controller: &ControllerView<'_>,
        ctx: &ProjectContext<'_>,
    ) -> Option<SourceFile> {
        let name = controller.name();
        let ns = root_namespace(&ctx.package_name);
        let mut usings = vec!["Microsoft.AspNetCore.Mvc".to_string()];
        if !controller.services.is_empty() {
            usings.push(format!("{ns}.Services"));
        }
        let mut src = SourceBuilder::new(INDENT);
        header(&mut src, &usings, &format!("{ns}.Controllers"));
        src.line(0, "[ApiController]")
            .line(0, "[Route(\"[controller]\")]")
            .line(0, format!("public class {name}Controller : ControllerBase"))
            .line(0, "{");

        if !controller.services.is_empty() {
            for link in &controller.services {
                src.line(
                    1,
                    format!(
                        "private readonly {}Service _{}Service;",
                        link.name(),
                        lower_first(link.name())
                    ),
                );
            }
            let params = controller
                .services
                .iter()
                .map(|link| format!("{}Service {}Service", link.name(), lower_first(link.name())))
                .collect::<Vec<_>>()
                .join(", ");
            src.blank()
                .line(1, format!("public {name}Controller({params})"))
                .line(1, "{");
            for link in &controller.services {
                let var = lower_first(link.name());
                src.line(2, format!("_{var}Service = {var}Service;"));
            }
            src.line(1, "}");
        }

        for (service, model) in controller.handler_pairs() {
            src.blank()
                .line(1, format!("[HttpGet(\"{}s\")]", file_stem(model)))
                .line(1, format!("public async Task<IActionResult> Get{model}s()"))
                .line(1, "{")
                .line(
                    2,
                    format!(
                        "return Ok(await _{}Service.GetAll{model}sAsync());",
                        lower_first(service)
                    ),
                )
                .line(1, "}");
        }
        for (i, rule) in controller.rules.iter().enumerate() {
            let ident = capitalize_first(&identifier_or(&rule.name, &format!("Rule{i}")));
            let message = string_literal(&format!("Rule {} executed", rule.name));
            src.blank()
                .line(1, format!("[HttpPost(\"{ident}\")]"))
                .line(1, format!("public IActionResult {ident}()"))
                .line(1, "{")
                .line(2, format!("// {}", comment_text(&rule.description)))
                .line(2, format!("return Ok(new {{ message = {message} }});"))
                .line(1, "}");
        }
        src.line(0, "}");
        Some(SourceFile::new(
            format!("Controllers/{}Controller.cs", path_segment(name)),
            src.finish(),
        ))
    }

    fn route_file(&self, route: &RouteView<'_>, ctx: &ProjectContext<'_>) -> Option<SourceFile> {
        let name = route.name();
        let ns = root_namespace(&ctx.package_name);
        let mut src = SourceBuilder::new(INDENT);
        header(
            &mut src,
            &["Microsoft.AspNetCore.Mvc".to_string()],
            &format!("{ns}.Routes"),
        );
        if !route.controllers.is_empty() {
            let handled_by = route
                .controllers
                .iter()
                .map(|c| format!("{ns}.Controllers.{}Controller", c.label))
                .collect::<Vec<_>>()
                .join(", ");
            src.line(0, format!("// Handled alongside {handled_by}"));
        }
        src.line(0, "[ApiController]")
            .line(0, format!("public class {name}RoutesController : ControllerBase"))
            .line(0, "{");
        let mut first = true;
        for (i, endpoint) in route.endpoints.iter().enumerate() {
            if !first {
                src.blank();
            }
            first = false;
            let ident = capitalize_first(&identifier_or(&endpoint.name, &format!("Endpoint{i}")));
            let message = string_literal(&format!("{} endpoint", endpoint.name));
            src.line(
                1,
                format!(
                    "[{}(\"{}\")]",
                    http_attribute(endpoint.method),
                    endpoint.normalized_path()
                ),
            )
            .line(1, format!("public IActionResult {ident}()"))
            .line(1, "{")
            .line(2, format!("// Endpoint: {}", comment_text(&endpoint.name)))
            .line(2, format!("return Ok(new {{ message = {message} }});"))
            .line(1, "}");
        }
        src.line(0, "}");
        Some(SourceFile::new(
            format!("Routes/{}RoutesController.cs", path_segment(name)),
            src.finish(),
        ))
    }

    fn support_files(&self, ctx: &ProjectContext<'_>) -> anyhow::Result<Vec<SourceFile>> {
        let ns = root_namespace(&ctx.package_name);
        Ok(vec![
            render(&CSharpDockerfileTemplate { namespace: &ns }, "Dockerfile")?,
            readme(ctx, Target::CSharp, vec!["dotnet run"], "/api-docs")?,
        ])
    }
}
