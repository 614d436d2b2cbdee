//! Markdown generator
//!
//! One page per document (`-<name>.md`), one page per resource and an
//! `index.md` listing both.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::Generator;
use crate::error::Result;
use crate::model::{
    Document, DocumentationRoot, ExampleRequest, ExampleResponse, Param, ParamKind, Resource,
    ResourceExample,
};

const PARAM_HEADINGS: [&str; 13] = [
    "Name",
    "Type",
    "Required",
    "Default",
    "Example",
    "Enum",
    "Pattern",
    "MinLength",
    "MaxLength",
    "Minimum",
    "Maximum",
    "Repeat",
    "Description",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownGenerator;

impl Generator for MarkdownGenerator {
    fn generate(&self, root: &DocumentationRoot, dest: &Path) -> Result<Vec<PathBuf>> {
        if dest.exists() {
            std::fs::remove_dir_all(dest)?;
        }
        std::fs::create_dir_all(dest)?;

        let mut written = Vec::new();
        let mut write = |name: String, content: String| -> Result<()> {
            let path = dest.join(name);
            std::fs::write(&path, content)?;
            written.push(path);
            Ok(())
        };

        for document in &root.documents {
            write(format!("-{}.md", document.filename()), render_document(document))?;
        }
        for methods in root.resources.tree().values() {
            for resource in methods.values().filter(|r| !r.is_cors_companion()) {
                write(format!("{}.md", resource.filename()), render_resource(resource))?;
            }
        }
        write("index.md".to_string(), render_index(root))?;

        tracing::debug!(dest = %dest.display(), files = written.len(), "markdown written");
        Ok(written)
    }
}

pub fn render_document(document: &Document) -> String {
    format!(
        "# {}\n\n{}",
        document.title,
        document.content.as_deref().unwrap_or_default()
    )
}

fn flag(value: bool) -> &'static str {
    if value {
        "`True`"
    } else {
        "`False`"
    }
}

fn cell<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn render_params(out: &mut String, params: &[Param]) {
    let _ = writeln!(out, "{}", PARAM_HEADINGS.join(" | "));
    let _ = writeln!(out, "{}", vec!["---"; PARAM_HEADINGS.len()].join(" | "));

    let mut sorted: Vec<&Param> = params.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    for param in sorted {
        let row = [
            param.name.clone(),
            param
                .type_name
                .clone()
                .unwrap_or_else(|| "string".to_string()),
            flag(param.required).to_string(),
            cell(&param.default),
            cell(&param.example),
            cell(&param.enum_values.as_ref().map(|v| v.join(", "))),
            cell(&param.pattern),
            cell(&param.min_length),
            cell(&param.max_length),
            cell(&param.minimum),
            cell(&param.maximum),
            flag(param.repeat).to_string(),
            cell(&param.description).replace('\n', " "),
        ];
        let _ = writeln!(out, "{}", row.join(" | "));
    }
}

fn fenced(language: &str, body: &str) -> String {
    format!("```{}\n{}\n```\n", language, body)
}

fn render_request(out: &mut String, request: &ExampleRequest) {
    let _ = writeln!(out, "#### Request\n");
    let _ = writeln!(out, "`{}`\n", request);
    if !request.headers.is_empty() {
        out.push_str(&fenced("", &request.headers_text()));
    }
    if let Some(body) = &request.body {
        let language = request.body_format().map(|f| f.as_str()).unwrap_or("");
        out.push_str(&fenced(language, body));
    }
    out.push('\n');
}

fn render_response(out: &mut String, response: &ExampleResponse) {
    let _ = writeln!(out, "#### Response\n");
    let _ = writeln!(out, "`{}`\n", response.status_line());
    if !response.headers.is_empty() {
        out.push_str(&fenced("", &response.headers_text()));
    }
    if let Some(body) = response.body_json().or_else(|| response.body.clone()) {
        let language = response.body_format().map(|f| f.as_str()).unwrap_or("");
        out.push_str(&fenced(language, &body));
    }
}

fn render_example(out: &mut String, index: usize, example: &ResourceExample) {
    let _ = writeln!(out, "### #{}\n", index);
    render_request(out, &example.request);
    render_response(out, &example.response);
    out.push_str("\n---\n");
}

pub fn render_resource(resource: &Resource) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "# {}\n",
        resource.display_name.as_deref().unwrap_or("untitled")
    );
    let _ = writeln!(
        out,
        "## `{}` `{}`\n",
        resource.method.to_uppercase(),
        resource.path
    );

    if let Some(description) = &resource.description {
        let _ = writeln!(out, "{}\n", description);
    }

    if resource.all_params().next().is_some() {
        out.push_str("## Parameters\n\n");
        for kind in [
            ParamKind::Url,
            ParamKind::Query,
            ParamKind::Header,
            ParamKind::Form,
        ] {
            let params = resource.params(kind);
            if !params.is_empty() {
                let _ = writeln!(out, "### {}\n", kind.label());
                render_params(&mut out, params);
                out.push('\n');
            }
        }
    }

    let visible: Vec<&ResourceExample> = resource.examples.iter().filter(|e| e.visible).collect();
    if !visible.is_empty() {
        out.push_str("## Examples\n\n");
        for (index, example) in visible.into_iter().enumerate() {
            render_example(&mut out, index, example);
        }
    }
    out
}

pub fn render_index(root: &DocumentationRoot) -> String {
    let mut out = String::new();
    let title = if root.title.is_empty() {
        "untitled"
    } else {
        root.title.as_str()
    };
    let _ = writeln!(out, "# {}\n", title);
    if let Some(version) = &root.version {
        let _ = writeln!(out, "Version: `{}`\n", version);
    }

    if !root.documents.is_empty() {
        out.push_str("## Documents\n\n");
        for document in &root.documents {
            let _ = writeln!(out, "- [{}](-{}.md)", document.title, document.filename());
        }
        out.push('\n');
    }

    let resources: Vec<&Resource> = root.resources.documented().collect();
    if !resources.is_empty() {
        out.push_str("## Resources\n\n");
        for resource in resources {
            let _ = writeln!(
                out,
                "- [`{}` `{}`]({}.md) {}",
                resource.method.to_uppercase(),
                resource.path,
                resource.filename(),
                resource.display_name.as_deref().unwrap_or_default()
            );
        }
    }
    out
}
