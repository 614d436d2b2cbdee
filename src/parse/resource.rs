//! Resource blocks
//!
//! Turns one `@api` annotation block into a [`ParsedResource`]. Lines are
//! grouped into tag lines, then walked as a work queue: `@apiUse` appends the
//! referenced definition's lines to the tail of the queue, so spliced tags
//! are handled exactly like inline ones. Each queued line remembers the
//! definitions it was spliced through; a definition that reaches itself is
//! rejected, while one reached twice through different parents splices twice.

use super::definition::DefinitionTable;
use super::tokens::{api_tokens, param_tokens};
use super::warning::{Warning, WarningKind};
use crate::lexer::RawBlock;
use crate::model::{Param, ParamKind, Resource};

/// Annotation tags understood by the resource parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Api,
    Version,
    Group,
    Permission,
    Description,
    Param(ParamKind),
    Use,
}

impl Tag {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "@api" => Some(Tag::Api),
            "@apiVersion" => Some(Tag::Version),
            "@apiGroup" => Some(Tag::Group),
            "@apiPermission" => Some(Tag::Permission),
            "@apiDescription" => Some(Tag::Description),
            "@apiParam" => Some(Tag::Param(ParamKind::Form)),
            "@apiQueryParam" => Some(Tag::Param(ParamKind::Query)),
            "@apiUrlParam" => Some(Tag::Param(ParamKind::Url)),
            "@apiHeadParam" => Some(Tag::Param(ParamKind::Header)),
            "@apiUse" => Some(Tag::Use),
            _ => None,
        }
    }

    /// Split a tag line into its tag and the text after the tag name
    pub fn split(line: &str) -> Option<(Self, &str)> {
        let end = line.find(char::is_whitespace).unwrap_or(line.len());
        let (name, rest) = line.split_at(end);
        Tag::from_name(name).map(|tag| (tag, rest))
    }
}

/// A tag line with its continuation lines joined on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLine {
    pub text: String,
    /// Source line of the tag
    pub line: usize,
}

/// Group block lines into tag lines.
///
/// Lines not starting with `@` continue the previous tag line; text before
/// the first tag is dropped. `line_of` maps a block line offset to the line
/// reported for the tag.
pub fn tag_lines(text: &str, line_of: impl Fn(usize) -> usize) -> Vec<TagLine> {
    let mut lines: Vec<TagLine> = Vec::new();
    for (offset, raw) in text.split('\n').enumerate() {
        if raw.starts_with('@') {
            lines.push(TagLine {
                text: raw.to_string(),
                line: line_of(offset),
            });
        } else if let Some(last) = lines.last_mut() {
            last.text.push_str(" \n");
            last.text.push_str(raw);
        }
    }
    lines
}

/// A parameter as written in an annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParam {
    pub kind: ParamKind,
    pub name: String,
    pub type_name: Option<String>,
    pub group: Option<String>,
    pub default: Option<String>,
    pub description: Option<String>,
    pub optional: bool,
}

impl RawParam {
    pub fn to_param(&self) -> Param {
        Param {
            type_name: self.type_name.clone(),
            description: self.description.clone(),
            default: self.default.clone(),
            ..Param::new(self.kind, self.name.clone())
        }
        .required(!self.optional)
    }
}

/// Everything one `@api` block says about an endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResource {
    pub method: Option<String>,
    pub path: String,
    pub title: Option<String>,
    pub version: Option<String>,
    pub group: Option<String>,
    pub description: Option<String>,
    pub permissions: Vec<String>,
    pub params: Vec<RawParam>,
    pub filename: String,
    /// Line of the `@api` tag
    pub line: usize,
}

impl ParsedResource {
    /// Convert into a model resource; `None` when the method is unknown
    pub fn to_resource(&self) -> Option<Resource> {
        let method = self.method.as_deref()?;
        let mut resource = Resource::new(self.path.clone(), method);
        resource.display_name = self.title.clone();
        resource.description = self.description.clone();
        resource.tags = self.group.iter().cloned().collect();
        resource.security.roles = self.permissions.clone();
        resource.set_params(self.params.iter().map(RawParam::to_param));
        Some(resource)
    }
}

/// Outcome of parsing one block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockParse {
    pub resource: Option<ParsedResource>,
    pub warnings: Vec<Warning>,
}

/// True when the block starts with an `@api` tag
pub fn is_resource_block(block: &RawBlock) -> bool {
    block
        .trimmed()
        .split_whitespace()
        .next()
        .is_some_and(|word| word == "@api")
}

fn trimmed(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Parse one annotation block.
///
/// Blocks that do not start with `@api` yield neither a resource nor
/// warnings. A missing path ends parsing of the block.
pub fn parse_block(block: &RawBlock, filename: &str, definitions: &DefinitionTable) -> BlockParse {
    let mut outcome = BlockParse::default();
    if !is_resource_block(block) {
        return outcome;
    }

    let warn = |kind, message: String, line| Warning::new(kind, message, filename, line);

    let mut record = ParsedResource {
        filename: filename.to_string(),
        line: block.start_line,
        ..Default::default()
    };
    // Each tag line with the chain of definitions it was spliced through
    let mut queue: Vec<(TagLine, Vec<String>)> = tag_lines(&block.text, |offset| {
        block.start_line + offset
    })
    .into_iter()
    .map(|tag_line| (tag_line, Vec::new()))
    .collect();

    let mut index = 0;
    while index < queue.len() {
        let (TagLine { text, line }, chain) = queue[index].clone();
        index += 1;

        let Some((tag, rest)) = Tag::split(&text) else {
            continue;
        };

        match tag {
            Tag::Api => {
                let tokens = api_tokens(&text);
                record.line = line;
                if tokens.method.is_none() {
                    outcome.warnings.push(warn(
                        WarningKind::MissedParameter,
                        "Missed method name in @api".to_string(),
                        line,
                    ));
                }
                let Some(path) = tokens.path else {
                    outcome.warnings.push(warn(
                        WarningKind::MissedParameter,
                        "Missed path name in @api".to_string(),
                        line,
                    ));
                    return outcome;
                };
                record.method = tokens.method;
                record.path = path;
                record.title = tokens.title;
            }
            Tag::Version => record.version = trimmed(rest),
            Tag::Group => record.group = trimmed(rest),
            Tag::Permission => record
                .permissions
                .extend(rest.split(',').map(|p| p.trim().to_string())),
            Tag::Description => {
                if record.description.is_some() {
                    outcome.warnings.push(warn(
                        WarningKind::DuplicateApiName,
                        "Duplicate @apiDescription, the last one is used".to_string(),
                        line,
                    ));
                }
                record.description = trimmed(rest);
            }
            Tag::Param(kind) => {
                let tokens = param_tokens(&text);
                match tokens.name {
                    Some(name) => record.params.push(RawParam {
                        kind,
                        name,
                        type_name: tokens.type_name,
                        group: tokens.group,
                        default: tokens.default,
                        description: tokens.description,
                        optional: tokens.optional,
                    }),
                    None => outcome.warnings.push(warn(
                        WarningKind::MissedParameter,
                        "Missed parameter name".to_string(),
                        line,
                    )),
                }
            }
            Tag::Use => {
                let name = rest.split_whitespace().next().unwrap_or_default();
                match definitions.lookup(name) {
                    None => outcome.warnings.push(warn(
                        WarningKind::InvalidDefinition,
                        format!("There is no such apiDefine `{}`", name),
                        line,
                    )),
                    Some(_) if chain.iter().any(|used| used == name) => {
                        outcome.warnings.push(warn(
                            WarningKind::InvalidDefinition,
                            format!("apiDefine `{}` uses itself", name),
                            line,
                        ))
                    }
                    Some(definition) => {
                        let mut inner = chain.clone();
                        inner.push(name.to_string());
                        queue.extend(
                            tag_lines(&definition.content, |_| line)
                                .into_iter()
                                .map(|tag_line| (tag_line, inner.clone())),
                        );
                    }
                }
            }
        }
    }

    outcome.resource = Some(record);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::definition::Definition;
    use pretty_assertions::assert_eq;

    fn block(text: &str, start_line: usize) -> RawBlock {
        RawBlock {
            text: text.to_string(),
            start_line,
        }
    }

    fn definitions() -> DefinitionTable {
        let mut table = DefinitionTable::new();
        table.define(
            Definition::parse(
                "@apiDefine ProductGetParams\n\n@apiSuccess title\n@apiQueryParam model\n@apiQueryParam purchasable\n",
            )
            .unwrap(),
        );
        table.define(Definition::parse("@apiDefine Foo\n@apiParam {String} foo").unwrap());
        table.define(Definition::parse("@apiDefine Loop\n@apiUse Loop").unwrap());
        table.define(Definition::parse("@apiDefine Ping\n@apiUse Pong").unwrap());
        table.define(Definition::parse("@apiDefine Pong\n@apiUse Ping").unwrap());
        table.define(Definition::parse("@apiDefine Common\n@apiHeadParam Authorization").unwrap());
        table.define(
            Definition::parse("@apiDefine Auth\n@apiUse Common\n@apiPermission user").unwrap(),
        );
        table.define(
            Definition::parse("@apiDefine Paging\n@apiUse Common\n@apiQueryParam page").unwrap(),
        );
        table
    }

    #[test]
    fn test_tag_lines_join_continuations() {
        let lines = tag_lines(
            "\nintro\n@apiDescription\nline one\n  line two\n@apiGroup Seller",
            |offset| 10 + offset,
        );
        assert_eq!(
            lines,
            vec![
                TagLine {
                    text: "@apiDescription \nline one \n  line two".to_string(),
                    line: 12
                },
                TagLine {
                    text: "@apiGroup Seller".to_string(),
                    line: 15
                },
            ]
        );
    }

    #[test]
    fn test_parse_full_block() {
        let text = "\n@api {GET} /product Get all products\n@apiVersion 1.0.0\n@apiGroup Product\n\n@apiPermission god\n@apiPermission operator, admin\n\n@apiQueryParam [sort]\n\n@apiUse ProductGetParams Some product params\n";
        let outcome = parse_block(&block(text, 15), "product.py", &definitions());
        assert!(outcome.warnings.is_empty());

        let record = outcome.resource.unwrap();
        assert_eq!(record.method.as_deref(), Some("get"));
        assert_eq!(record.path, "/product");
        assert_eq!(record.title.as_deref(), Some("Get all products"));
        assert_eq!(record.version.as_deref(), Some("1.0.0"));
        assert_eq!(record.group.as_deref(), Some("Product"));
        assert_eq!(record.permissions, vec!["god", "operator", "admin"]);
        assert_eq!(record.line, 16);

        let names: Vec<&str> = record.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["sort", "model", "purchasable"]);
        assert!(record.params[0].optional);
        assert!(record.params.iter().all(|p| p.kind == ParamKind::Query));
    }

    #[test]
    fn test_non_resource_block_is_skipped() {
        let outcome = parse_block(
            &block("\n@apiDefine Foo\n@apiParam foo\n", 1),
            "a.py",
            &definitions(),
        );
        assert_eq!(outcome, BlockParse::default());

        let outcome = parse_block(&block("Just a docstring", 1), "a.py", &definitions());
        assert_eq!(outcome, BlockParse::default());
    }

    #[test]
    fn test_missing_path_is_fatal() {
        let text = "\n@api {get}\n@apiVersion 1.0.0\n@apiUrlParam {Integer} sellerId\n";
        let outcome = parse_block(&block(text, 6), "seller.py", &definitions());

        assert!(outcome.resource.is_none());
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].kind, WarningKind::MissedParameter);
        assert_eq!(outcome.warnings[0].line, 7);
    }

    #[test]
    fn test_missing_method_continues() {
        let outcome = parse_block(&block("@api /seller Sellers\n@apiGroup Seller", 3), "s.py", &definitions());
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].kind, WarningKind::MissedParameter);

        let record = outcome.resource.unwrap();
        assert_eq!(record.method, None);
        assert_eq!(record.path, "/seller");
        assert_eq!(record.group.as_deref(), Some("Seller"));
        assert!(record.to_resource().is_none());
    }

    #[test]
    fn test_missing_param_name() {
        let text = "@api {put} /seller/:id Update\n@apiUrlParam {Integer}\n@apiParam {String} name";
        let outcome = parse_block(&block(text, 1), "s.py", &definitions());

        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].line, 2);
        assert_eq!(outcome.resource.unwrap().params.len(), 1);
    }

    #[test]
    fn test_duplicate_description_keeps_last() {
        let text = "\n@api {post} /seller Post\n@apiDescription Add a seller\n@apiDescription SellerId is unique\n";
        let outcome = parse_block(&block(text, 6), "s.py", &definitions());

        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].kind, WarningKind::DuplicateApiName);
        assert_eq!(outcome.warnings[0].line, 9);
        assert_eq!(
            outcome.resource.unwrap().description.as_deref(),
            Some("SellerId is unique")
        );
    }

    #[test]
    fn test_multiline_description() {
        let text = "@api {delete} /product/:id Delete\n@apiDescription\nDelete a product.\n\n    - purchased products\n";
        let record = parse_block(&block(text, 1), "p.py", &definitions())
            .resource
            .unwrap();
        assert_eq!(
            record.description.as_deref(),
            Some("Delete a product. \n \n    - purchased products")
        );
    }

    #[test]
    fn test_unknown_use_contributes_nothing() {
        let text = "@api {post} /seller Post\n@apiUse SellerSuccess\n";
        let outcome = parse_block(&block(text, 5), "s.py", &definitions());

        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].kind, WarningKind::InvalidDefinition);
        assert_eq!(outcome.warnings[0].line, 6);
        assert!(outcome.resource.unwrap().params.is_empty());
    }

    #[test]
    fn test_use_splices_definition() {
        let text = "@api {post} /thing Post\n@apiUse Foo\n";
        let record = parse_block(&block(text, 1), "t.py", &definitions())
            .resource
            .unwrap();
        let resource = record.to_resource().unwrap();

        assert_eq!(resource.form_params.len(), 1);
        assert_eq!(resource.form_params[0].name, "foo");
        assert_eq!(resource.form_params[0].type_name.as_deref(), Some("String"));
        assert!(resource.form_params[0].required);
    }

    #[test]
    fn test_recursive_use_stops() {
        let text = "@api {get} /loop Loop\n@apiUse Loop\n";
        let outcome = parse_block(&block(text, 1), "l.py", &definitions());

        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].kind, WarningKind::InvalidDefinition);
        assert_eq!(outcome.warnings[0].line, 2);
    }

    #[test]
    fn test_mutual_recursion_stops() {
        let text = "@api {get} /ping Ping\n@apiUse Ping\n";
        let outcome = parse_block(&block(text, 1), "p.py", &definitions());

        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].kind, WarningKind::InvalidDefinition);
        assert!(outcome.warnings[0].message.contains("`Ping`"));
    }

    #[test]
    fn test_shared_definition_splices_for_each_parent() {
        let text = "@api {get} /photo Photos\n@apiUse Auth\n@apiUse Paging\n";
        let outcome = parse_block(&block(text, 1), "p.py", &definitions());
        assert!(outcome.warnings.is_empty());

        let resource = outcome.resource.unwrap().to_resource().unwrap();
        assert_eq!(resource.security.roles, vec!["user"]);
        assert_eq!(resource.query_params[0].name, "page");
        let headers: Vec<&str> = resource
            .header_params
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(headers, vec!["Authorization", "Authorization"]);
    }

    #[test]
    fn test_missing_method_with_brace_placeholder() {
        let outcome = parse_block(&block("@api /user/{id} Get user", 4), "u.py", &definitions());
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].kind, WarningKind::MissedParameter);
        assert_eq!(outcome.warnings[0].line, 4);

        let record = outcome.resource.unwrap();
        assert_eq!(record.method, None);
        assert_eq!(record.path, "/user/{id}");
        assert!(record.to_resource().is_none());
    }

    #[test]
    fn test_empty_permission_is_not_fatal() {
        let text = "@api {get} /seller/:id Get\n@apiPermission\n@apiPermission\n\n@apiUrlParam {Integer} sellerId\n";
        let outcome = parse_block(&block(text, 1), "s.py", &definitions());
        assert!(outcome.warnings.is_empty());

        let resource = outcome.resource.unwrap().to_resource().unwrap();
        assert_eq!(resource.security.roles, vec!["", ""]);
        assert_eq!(resource.uri_params[0].name, "sellerId");
        assert!(resource.uri_params[0].required);
    }

    #[test]
    fn test_to_resource() {
        let text = "@api {put} /product/:productId Update a product\n@apiGroup Product\n@apiUrlParam {Integer} productId\n@apiHeadParam [Authorization] Token\n@apiParam {String} [title=untitled] Title";
        let resource = parse_block(&block(text, 1), "p.py", &definitions())
            .resource
            .unwrap()
            .to_resource()
            .unwrap();

        assert_eq!(resource.key(), "/product/:productId-put");
        assert_eq!(resource.display_name.as_deref(), Some("Update a product"));
        assert_eq!(resource.tags, vec!["Product"]);
        assert_eq!(resource.uri_params[0].type_name.as_deref(), Some("Integer"));
        assert!(!resource.header_params[0].required);
        assert_eq!(resource.header_params[0].description.as_deref(), Some("Token"));
        assert_eq!(resource.form_params[0].name, "title");
        assert_eq!(resource.form_params[0].default.as_deref(), Some("untitled"));
    }
}
