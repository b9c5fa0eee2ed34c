use serde_json::json;

use crate::generator::dialect::{
    ControllerView, Dialect, ModelView, ProjectContext, RouteView, ServiceView, SourceFile,
    TypeTable,
};
use crate::generator::naming::{comment_text, file_stem, identifier_or, string_literal, SourceBuilder};
use crate::generator::target::Target;
use crate::generator::templates::{render, NodeDockerfileTemplate, NodeIndexTemplate};

use super::{readme, route_mounts};

const TYPES: TypeTable = TypeTable {
    string: "String",
    number: "Number",
    boolean: "Boolean",
    date: "Date",
    object_id: "mongoose.Schema.Types.ObjectId",
    any: "mongoose.Schema.Types.Mixed",
};

const INDENT: &str = "  ";

/// Express + Mongoose.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeDialect;

fn package_json(package_name: &str, version: &str) -> anyhow::Result<String> {
    let manifest = json!({
        "name": package_name,
        "version": version,
        "main": "index.js",
        "scripts": { "start": "node index.js", "dev": "nodemon index.js" },
        "dependencies": {
            "cors": "^2.8.5",
            "dotenv": "^16.0.3",
            "express": "^4.18.2",
            "mongoose": "^7.0.0",
            "swagger-ui-express": "^5.0.0"
        },
        "devDependencies": { "nodemon": "^3.0.0" }
    });
    Ok(serde_json::to_string_pretty(&manifest)? + "\n")
}

impl Dialect for NodeDialect {
    fn target(&self) -> Target {
        Target::Node
    }

    fn types(&self) -> &'static TypeTable {
        &TYPES
    }

    fn layout(&self) -> &'static [&'static str] {
        &["models", "services", "controllers", "routes"]
    }

    fn project_files(&self, ctx: &ProjectContext<'_>) -> anyhow::Result<Vec<SourceFile>> {
        Ok(vec![
            SourceFile::new(
                "package.json",
                package_json(&ctx.package_name, &ctx.descriptor.info.version)?,
            ),
            SourceFile::new(
                ".env",
                format!(
                    "PORT=3000\nMONGO_URI=mongodb://localhost:27017/{}\n",
                    ctx.package_name
                ),
            ),
            render(
                &NodeIndexTemplate {
                    routes: route_mounts(ctx),
                },
                "index.js",
            )?,
        ])
    }

    fn model_files(&self, model: &ModelView<'_>, _ctx: &ProjectContext<'_>) -> Vec<SourceFile> {
        let name = model.name();
        let mut src = SourceBuilder::new(INDENT);
        src.line(0, "const mongoose = require('mongoose');")
            .blank()
            .line(0, format!("const {name}Schema = new mongoose.Schema({{"));
        for field in model.fields {
            src.line(
                1,
                format!(
                    "{}: {{ type: {}, required: {} }},",
                    field.name,
                    self.types().map(&field.field_type),
                    field.required
                ),
            );
        }
        src.line(0, "}, { timestamps: true });")
            .blank()
            .line(0, format!("module.exports = mongoose.model('{name}', {name}Schema);"));
        vec![SourceFile::new(
            format!("models/{}.model.js", file_stem(name)),
            src.finish(),
        )]
    }

    fn service_file(
        &self,
        service: &ServiceView<'_>,
        _ctx: &ProjectContext<'_>,
    ) -> Option<SourceFile> {
        let name = service.name();
        let mut src = SourceBuilder::new(INDENT);
        src.line(0, format!("// Service for {name}"));
        for model in &service.models {
            src.line(
                0,
                format!(
                    "const {} = require('../models/{}.model');",
                    model.label,
                    file_stem(&model.label)
                ),
            );
        }
        src.blank().line(0, format!("class {name}Service {{"));
        let mut first = true;
        for model in &service.models {
            if !first {
                src.blank();
            }
            first = false;
            let m = &model.label;
            src.line(1, format!("async getAll{m}s() {{"))
                .line(2, format!("return await {m}.find();"))
                .line(1, "}");
        }
        for (i, rule) in service.rules.iter().enumerate() {
            if !first {
                src.blank();
            }
            first = false;
            src.line(1, format!("// Rule: {}", comment_text(&rule.name)))
                .line(
                    1,
                    format!("async {}() {{", identifier_or(&rule.name, &format!("rule{i}"))),
                )
                .line(2, format!("// {}", comment_text(&rule.description)))
                .line(1, "}");
        }
        src.line(0, "}")
            .blank()
            .line(0, format!("module.exports = new {name}Service();"));
        Some(SourceFile::new(
            format!("services/{}.service.js", file_stem(name)),
            src.finish(),
        ))
    }

    fn controller_file(
        &self,
        controller: &ControllerView<'_>,
        _ctx: &ProjectContext<'_>,
    ) -> Option<SourceFile> {
        let name = controller.name();
        let mut src = SourceBuilder::new(INDENT);
        src.line(0, format!("// Controller for {name}"));
        for link in &controller.services {
            src.line(
                0,
                format!(
                    "const {}Service = require('../services/{}.service');",
                    link.name(),
                    file_stem(link.name())
                ),
            );
        }
        src.blank().line(0, format!("const {name}Controller = {{"));
        for (service, model) in controller.handler_pairs() {
            src.line(1, format!("async get{model}s(req, res) {{"))
                .line(
                    2,
                    format!("const data = await {service}Service.getAll{model}s();"),
                )
                .line(2, "res.json(data);")
                .line(1, "},");
        }
        for (i, rule) in controller.rules.iter().enumerate() {
            let message = string_literal(&format!("Rule {} executed", rule.name));
            src.line(1, format!("// Rule: {}", comment_text(&rule.name)))
                .line(
                    1,
                    format!(
                        "async {}(req, res) {{",
                        identifier_or(&rule.name, &format!("rule{i}"))
                    ),
                )
                .line(2, format!("// {}", comment_text(&rule.description)))
                .line(2, format!("res.json({{ message: {message} }});"))
                .line(1, "},");
        }
        src.line(0, "};")
            .blank()
            .line(0, format!("module.exports = {name}Controller;"));
        Some(SourceFile::new(
            format!("controllers/{}.controller.js", file_stem(name)),
            src.finish(),
        ))
    }

    fn route_file(&self, route: &RouteView<'_>, _ctx: &ProjectContext<'_>) -> Option<SourceFile> {
        let mut src = SourceBuilder::new(INDENT);
        src.line(0, "const express = require('express');")
            .line(0, "const router = express.Router();");
        for controller in &route.controllers {
            src.line(
                0,
                format!(
                    "const {}Controller = require('../controllers/{}.controller');",
                    controller.label,
                    file_stem(&controller.label)
                ),
            );
        }
        src.blank();
        for endpoint in route.endpoints {
            let message = string_literal(&format!("{} endpoint", endpoint.name));
            src.line(
                0,
                format!(
                    "router.{}('{}', (req, res) => {{",
                    endpoint.method.as_lower(),
                    endpoint.normalized_path()
                ),
            )
            .line(1, format!("// Endpoint: {}", comment_text(&endpoint.name)))
            .line(1, format!("res.json({{ message: {message} }});"))
            .line(0, "});");
        }
        src.blank().line(0, "module.exports = router;");
        Some(SourceFile::new(
            format!("routes/{}.routes.js", file_stem(route.name())),
            src.finish(),
        ))
    }

    fn support_files(&self, ctx: &ProjectContext<'_>) -> anyhow::Result<Vec<SourceFile>> {
        Ok(vec![
            render(&NodeDockerfileTemplate, "Dockerfile")?,
            readme(
                ctx,
                Target::Node,
                vec!["npm install", "npm start"],
                "/api-docs",
            )?,
        ])
    }
}
