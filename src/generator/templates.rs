//! Askama templates for the fixed boilerplate of each target (manifests,
//! entrypoints, Dockerfiles, READMEs).
//!
//! Graph-dependent sources are assembled line by line in the target modules;
//! only files whose shape is constant live under `templates/`.

use anyhow::Context;
use askama::Template;

use super::dialect::SourceFile;

/// A route module that the entrypoint has to mount.
#[derive(Debug, Clone)]
pub struct RouteMount {
    /// Lowercased label, the file stem of the route module
    pub stem: String,
    /// Label with its first letter capitalized (Go/Java/C# identifiers)
    pub ident: String,
    /// Label with its first letter lowercased (JS variables)
    pub var: String,
}

/// One line of the README endpoint table.
#[derive(Debug, Clone)]
pub struct EndpointLine {
    pub method: String,
    pub path: String,
    pub name: String,
}

/// Template data for the README every target ships
#[derive(Template)]
#[template(path = "README.md.txt", escape = "none")]
pub struct ReadmeTemplate<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub stack: &'a str,
    pub run: Vec<&'static str>,
    pub docs_path: &'static str,
    pub models: Vec<String>,
    pub endpoints: Vec<EndpointLine>,
}

#[derive(Template)]
#[template(path = "node/index.js.txt", escape = "none")]
pub struct NodeIndexTemplate {
    pub routes: Vec<RouteMount>,
}

#[derive(Template)]
#[template(path = "node/Dockerfile.txt", escape = "none")]
pub struct NodeDockerfileTemplate;

/// Template data for the FastAPI entrypoint
#[derive(Template)]
#[template(path = "python/main.py.txt", escape = "none")]
pub struct PythonMainTemplate {
    /// Application title, already quoted as a Python string literal
    pub title: String,
    pub routes: Vec<RouteMount>,
}

#[derive(Template)]
#[template(path = "python/database.py.txt", escape = "none")]
pub struct PythonDatabaseTemplate<'a> {
    pub db_name: &'a str,
}

#[derive(Template)]
#[template(path = "python/requirements.txt", escape = "none")]
pub struct PythonRequirementsTemplate;

#[derive(Template)]
#[template(path = "python/Dockerfile.txt", escape = "none")]
pub struct PythonDockerfileTemplate;

#[derive(Template)]
#[template(path = "go/go.mod.txt", escape = "none")]
pub struct GoModTemplate<'a> {
    pub module: &'a str,
}

/// Template data for the Gin entrypoint
#[derive(Template)]
#[template(path = "go/main.go.txt", escape = "none")]
pub struct GoMainTemplate<'a> {
    pub module: &'a str,
    pub routes: Vec<RouteMount>,
}

#[derive(Template)]
#[template(path = "go/Dockerfile.txt", escape = "none")]
pub struct GoDockerfileTemplate;

/// Template data for the Maven manifest
#[derive(Template)]
#[template(path = "java/pom.xml.txt", escape = "none")]
pub struct JavaPomTemplate<'a> {
    pub group_id: &'a str,
    pub artifact_id: &'a str,
    pub version: &'a str,
}

#[derive(Template)]
#[template(path = "java/ApiApplication.java.txt", escape = "none")]
pub struct JavaApplicationTemplate<'a> {
    pub base_package: &'a str,
}

#[derive(Template)]
#[template(path = "java/application.properties.txt", escape = "none")]
pub struct JavaPropertiesTemplate<'a> {
    pub artifact_id: &'a str,
}

#[derive(Template)]
#[template(path = "java/Dockerfile.txt", escape = "none")]
pub struct JavaDockerfileTemplate<'a> {
    pub artifact_id: &'a str,
    pub version: &'a str,
}

#[derive(Template)]
#[template(path = "csharp/project.csproj.txt", escape = "none")]
pub struct CSharpProjectTemplate<'a> {
    pub namespace: &'a str,
}

/// Template data for the ASP.NET Core entrypoint
#[derive(Template)]
#[template(path = "csharp/Program.cs.txt", escape = "none")]
pub struct CSharpProgramTemplate<'a> {
    pub namespace: &'a str,
    /// Service class names registered with the DI container
    pub services: Vec<String>,
}

#[derive(Template)]
#[template(path = "csharp/Dockerfile.txt", escape = "none")]
pub struct CSharpDockerfileTemplate<'a> {
    pub namespace: &'a str,
}

/// Render a template into a [`SourceFile`] at `path`.
pub fn render(template: &impl Template, path: impl Into<String>) -> anyhow::Result<SourceFile> {
    let path = path.into();
    let mut contents = template
        .render()
        .with_context(|| format!("Failed to render template for {path}"))?;
    if !contents.ends_with('\n') {
        contents.push('\n');
    }
    Ok(SourceFile::new(path, contents))
}
