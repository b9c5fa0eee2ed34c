use crate::generator::dialect::{
    ControllerView, Dialect, ModelView, ProjectContext, RouteView, ServiceView, SourceFile,
    TypeTable,
};
use crate::generator::naming::{
    comment_text, file_stem, identifier_or, string_literal, SourceBuilder,
};
use crate::generator::target::Target;
use crate::generator::templates::{
    render, PythonDatabaseTemplate, PythonDockerfileTemplate, PythonMainTemplate,
    PythonRequirementsTemplate,
};
use crate::graph::FieldType;

use super::{readme, route_mounts};

/// Pydantic annotations.
const TYPES: TypeTable = TypeTable {
    string: "str",
    number: "float",
    boolean: "bool",
    date: "datetime",
    object_id: "str",
    any: "Any",
};

/// SQLAlchemy column types.
const COLUMNS: TypeTable = TypeTable {
    string: "String",
    number: "Float",
    boolean: "Boolean",
    date: "DateTime",
    object_id: "String",
    any: "JSON",
};

const INDENT: &str = "    ";

/// FastAPI + SQLAlchemy + Pydantic.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonDialect;

fn snake(label: &str) -> String {
    file_stem(label)
}

impl PythonDialect {
    fn orm_model(&self, model: &ModelView<'_>) -> SourceFile {
        let name = model.name();
        let stem = file_stem(name);
        let mut src = SourceBuilder::new(INDENT);
        src.line(
            0,
            "from sqlalchemy import JSON, Boolean, Column, DateTime, Float, Integer, String",
        )
        .blank()
        .line(0, "from database import Base")
        .blank()
        .blank()
        .line(0, format!("class {name}DB(Base):"))
        .line(1, format!("__tablename__ = \"{stem}s\""))
        .blank()
        .line(1, "id = Column(Integer, primary_key=True, index=True)");
        for field in model.fields {
            src.line(
                1,
                format!(
                    "{} = Column({}, nullable={})",
                    field.name,
                    COLUMNS.map(&field.field_type),
                    if field.required { "False" } else { "True" }
                ),
            );
        }
        SourceFile::new(format!("models/{stem}.py"), src.finish())
    }

    fn pydantic_schema(&self, model: &ModelView<'_>) -> SourceFile {
        let name = model.name();
        let mut src = SourceBuilder::new(INDENT);
        if model
            .fields
            .iter()
            .any(|f| f.field_type == FieldType::Date)
        {
            src.line(0, "from datetime import datetime");
        }
        src.line(0, "from typing import Any, Optional")
            .blank()
            .line(0, "from pydantic import BaseModel, ConfigDict")
            .blank()
            .blank()
            .line(0, format!("class {name}Base(BaseModel):"));
        if model.fields.is_empty() {
            src.line(1, "pass");
        }
        for field in model.fields {
            let py_type = self.types().map(&field.field_type);
            if field.required {
                src.line(1, format!("{}: {py_type}", field.name));
            } else {
                src.line(1, format!("{}: Optional[{py_type}] = None", field.name));
            }
        }
        src.blank()
            .blank()
            .line(0, format!("class {name}Create({name}Base):"))
            .line(1, "pass")
            .blank()
            .blank()
            .line(0, format!("class {name}({name}Base):"))
            .line(1, "model_config = ConfigDict(from_attributes=True)")
            .blank()
            .line(1, "id: int");
        SourceFile::new(format!("schemas/{}.py", file_stem(name)), src.finish())
    }
}

impl Dialect for PythonDialect {
    fn target(&self) -> Target {
        Target::Python
    }

    fn types(&self) -> &'static TypeTable {
        &TYPES
    }

    fn layout(&self) -> &'static [&'static str] {
        &["models", "schemas", "services", "controllers", "routes"]
    }

    fn project_files(&self, ctx: &ProjectContext<'_>) -> anyhow::Result<Vec<SourceFile>> {
        let db_name = ctx.package_name.replace('-', "_");
        Ok(vec![
            render(&PythonRequirementsTemplate, "requirements.txt")?,
            render(
                &PythonMainTemplate {
                    title: string_literal(ctx.title()),
                    routes: route_mounts(ctx),
                },
                "main.py",
            )?,
            render(&PythonDatabaseTemplate { db_name: &db_name }, "database.py")?,
            SourceFile::new(
                ".env",
                format!("PORT=3000\nDATABASE_URL=sqlite:///./{db_name}.db\n"),
            ),
        ])
    }

    fn model_files(&self, model: &ModelView<'_>, _ctx: &ProjectContext<'_>) -> Vec<SourceFile> {
        vec![self.orm_model(model), self.pydantic_schema(model)]
    }

    fn service_file(
        &self,
        service: &ServiceView<'_>,
        _ctx: &ProjectContext<'_>,
    ) -> Option<SourceFile> {
        let name = service.name();
        let mut src = SourceBuilder::new(INDENT);
        src.line(0, format!("# Service for {name}"));
        if !service.models.is_empty() {
            src.line(0, "from sqlalchemy.orm import Session").blank();
            for model in &service.models {
                src.line(
                    0,
                    format!(
                        "from models.{} import {}DB",
                        file_stem(&model.label),
                        model.label
                    ),
                );
            }
        }
        src.blank()
            .blank()
            .line(0, format!("class {name}Service:"));
        if service.models.is_empty() && service.rules.is_empty() {
            src.line(1, "pass");
        }
        let mut first = true;
        for model in &service.models {
            if !first {
                src.blank();
            }
            first = false;
            src.line(
                1,
                format!("def get_all_{}s(self, db: Session):", snake(&model.label)),
            )
            .line(2, format!("return db.query({}DB).all()", model.label));
        }
        for (i, rule) in service.rules.iter().enumerate() {
            if !first {
                src.blank();
            }
            first = false;
            src.line(1, format!("# Rule: {}", comment_text(&rule.name)))
                .line(
                    1,
                    format!(
                        "def {}(self):",
                        identifier_or(&rule.name, &format!("rule{i}"))
                    ),
                )
                .line(2, format!("# {}", comment_text(&rule.description)))
                .line(2, "pass");
        }
        Some(SourceFile::new(
            format!("services/{}_service.py", file_stem(name)),
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
        src.line(0, format!("# Controller for {name}"));
        let has_handlers = controller.handler_pairs().next().is_some();
        if has_handlers {
            src.line(0, "from sqlalchemy.orm import Session");
        }
        if !controller.services.is_empty() {
            src.blank();
            for link in &controller.services {
                src.line(
                    0,
                    format!(
                        "from services.{}_service import {}Service",
                        file_stem(link.name()),
                        link.name()
                    ),
                );
            }
            src.blank();
            for link in &controller.services {
                src.line(
                    0,
                    format!("{}_service = {}Service()", snake(link.name()), link.name()),
                );
            }
        }
        src.blank()
            .blank()
            .line(0, format!("class {name}Controller:"));
        if !has_handlers && controller.rules.is_empty() {
            src.line(1, "pass");
        }
        let mut first = true;
        for (service, model) in controller.handler_pairs() {
            if !first {
                src.blank();
            }
            first = false;
            src.line(1, format!("def get_{}s(self, db: Session):", snake(model)))
                .line(
                    2,
                    format!(
                        "return {}_service.get_all_{}s(db)",
                        snake(service),
                        snake(model)
                    ),
                );
        }
        for (i, rule) in controller.rules.iter().enumerate() {
            if !first {
                src.blank();
            }
            first = false;
            let message = string_literal(&format!("Rule {} executed", rule.name));
            src.line(1, format!("# Rule: {}", comment_text(&rule.name)))
                .line(
                    1,
                    format!(
                        "def {}(self):",
                        identifier_or(&rule.name, &format!("rule{i}"))
                    ),
                )
                .line(2, format!("# {}", comment_text(&rule.description)))
                .line(2, format!("return {{\"message\": {message}}}"));
        }
        Some(SourceFile::new(
            format!("controllers/{}_controller.py", file_stem(name)),
            src.finish(),
        ))
    }

    fn route_file(&self, route: &RouteView<'_>, _ctx: &ProjectContext<'_>) -> Option<SourceFile> {
        let mut src = SourceBuilder::new(INDENT);
        src.line(0, "from fastapi import APIRouter");
        if !route.controllers.is_empty() {
            src.blank();
            for controller in &route.controllers {
                src.line(
                    0,
                    format!(
                        "from controllers.{}_controller import {}Controller",
                        file_stem(&controller.label),
                        controller.label
                    ),
                );
            }
        }
        src.blank().line(0, "router = APIRouter()");
        for controller in &route.controllers {
            src.line(
                0,
                format!(
                    "{}_controller = {}Controller()",
                    snake(&controller.label),
                    controller.label
                ),
            );
        }
        for (i, endpoint) in route.endpoints.iter().enumerate() {
            let message = string_literal(&format!("{} endpoint", endpoint.name));
            src.blank()
                .blank()
                .line(
                    0,
                    format!(
                        "@router.{}(\"{}\")",
                        endpoint.method.as_lower(),
                        endpoint.normalized_path()
                    ),
                )
                .line(
                    0,
                    format!(
                        "async def {}():",
                        identifier_or(&endpoint.name, &format!("endpoint{i}"))
                    ),
                )
                .line(1, format!("# Endpoint: {}", comment_text(&endpoint.name)))
                .line(1, format!("return {{\"message\": {message}}}"));
        }
        Some(SourceFile::new(
            format!("routes/{}_routes.py", file_stem(route.name())),
            src.finish(),
        ))
    }

    fn support_files(&self, ctx: &ProjectContext<'_>) -> anyhow::Result<Vec<SourceFile>> {
        Ok(vec![
            render(&PythonDockerfileTemplate, "Dockerfile")?,
            readme(
                ctx,
                Target::Python,
                vec![
                    "pip install -r requirements.txt",
                    "uvicorn main:app --reload --port 3000",
                ],
                "/api-docs",
            )?,
        ])
    }
}
