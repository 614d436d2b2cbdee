//! Annotation parsing integration tests
//!
//! Fixture projects are written to temporary directories and run through
//! the full build pipeline.

use std::path::Path;

use apiscribe::{Config, Documentor, ParamKind, Parser, SourceFile, WarningKind};
use pretty_assertions::assert_eq;

const PRODUCT: &str = r#""""
@apiDefine ProductGetParams

@apiSuccess title
@apiQueryParam model
@apiQueryParam purchasable
@apiQueryParam manufacturedAt
"""


class Product:

    def get(self):
        """
        @api {get} /product Get all products
        @apiVersion 1.0.0
        @apiGroup Product

        @apiPermission god
        @apiPermission operator

        @apiQueryParam [sort]

        @apiUse ProductGetParams Some product params
        """
        """
        @api {get} /product/:productId Get a seller
        @apiVersion 1.0.0
        @apiGroup Product

        @apiUrlParam {Integer} productId
        """
        return self

    def put(self):
        """
        @api {put} /product/:productId Update a product
        @apiVersion 1.0.0
        @apiGroup Product

        @apiUrlParam {Integer} productId

        @apiParam {String} title (Product title)
        @apiParam {String} model Product Model
        @apiParam {Boolean} purchasable Can purchase this product
        @apiParam {DateTime} manufacturedAt When product manufactured
        """
        return self

    def delete(self):
        """
        @api {delete} /product/:productId Delete a product
        @apiVersion 1.0.0
        @apiGroup Product

        @apiUrlParam productId Product ID

        @apiHeadParam Authorization Access Token

        @apiDescription
        Delete a product with product ID, but actually its
        marked as deleted.

        List of products cannot delete:
        - Products purchased on time
        - Products related to a `seller`
        """
        return self
"#;

const SELLER: &str = r#"

class Seller:

    def get(self):
        """
        @api {get} /seller Get sellers list
        @apiVersion 1.0.0
        @apiGroup Seller

        @apiQueryParam {String} [sort]
        """
        """
        @api {get} /seller/:sellerId Get a seller
        @apiVersion 1.0.0
        @apiGroup Seller

        @apiUrlParam {Integer} sellerId
        """
        return self

    def post(self):
        """
        @api {get} /seller/:sellerId Get a seller
        @apiVersion 1.0.0
        @apiGroup Seller

        @apiPermission
        @apiPermission

        @apiUrlParam {Integer} sellerId
        """
        return self


class SellerV2:

    def delete(self):
        """
        @api {delete} /seller/:sellerId Delete a seller
        @apiVersion 2.0.0
        @apiGroup Seller

        @apiUrlParam {Integer} sellerId
        """
        return self
"#;

const WRONG_API_NAME: &str = r#"

class Seller:

    def post(self):
        """
        @api {get}
        @apiVersion 1.0.0
        @apiGroup Seller

        @apiPermission
        @apiPermission

        @apiUrlParam {Integer} sellerId
        """
        return self

    def get(self):
        """
        @api {get} /seller Get sellers list
        @apiVersion 1.0.0
        @apiGroup Seller

        @apiQueryParam {String} [sort]
        """
        return self
"#;

const WRONG_API_USE: &str = r#"

class Seller:

    def post(self):
        """
        @api {post} /seller Post a seller
        @apiVersion 1.0.0
        @apiGroup Seller

        @apiPermission
        @apiPermission

        @apiUrlParam {Integer} sellerId

        @apiUse SellerSuccess
        """
        return self
"#;

const DUPLICATE_DESCRIPTION: &str = r#"

class Seller:

    def post(self):
        """
        @api {post} /seller post sellers list
        @apiVersion 1.0.0
        @apiGroup Seller

        @apiPermission
        @apiPermission

        @apiDescription Add a seller
        @apiDescription SellerId is unique

        @apiUrlParam {Integer} sellerId
        """
        return self
"#;

const MISSED_PARAMETER_NAME: &str = r#"

class Seller:

    def post(self):
        """
        @api {post} /seller Post a seller
        @apiVersion 1.0.0
        @apiGroup Seller

        @apiPermission admin

        @apiQueryParam {String} [sort]
        @apiUrlParam {Integer}
        """
        return self
"#;

const MISSED_METHOD_NAME: &str = r#"

class User:

    def get(self, user_id):
        """
        @api /user/{user_id} Get a user
        @apiUrlParam {Integer} user_id
        """
        return self
"#;

const SHARED_DEFINITIONS: &str = r#"
"""
@apiDefine Common
@apiHeadParam Authorization Access token
"""

"""
@apiDefine Auth
@apiUse Common
@apiPermission user
"""

"""
@apiDefine Paging
@apiUse Common
@apiQueryParam {Integer} [page=1]
"""
"#;

const GALLERY: &str = r#"
class Photo:

    def get(self):
        """
        @api {get} /photo Get photos
        @apiUse Auth
        @apiUse Paging
        """
        return self
"#;

fn write_project(dir: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        let path = dir.join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }
}

fn online_store_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.title = "Online Store".to_string();
    config.examples_dir = dir.join("no-examples");
    config
}

mod online_store_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_product_resource() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), &[("product.py", PRODUCT), ("seller.py", SELLER)]);

        let report = Documentor::new(online_store_config(dir.path()))
            .build(dir.path())
            .unwrap();
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);

        let resource = report.root.resources.get("/product-get").unwrap();
        assert_eq!(resource.method, "get");
        assert_eq!(resource.path, "/product");
        assert_eq!(resource.display_name.as_deref(), Some("Get all products"));
        assert_eq!(resource.tags, vec!["Product".to_string()]);
        assert_eq!(resource.security.roles, vec!["god", "operator"]);

        let params: Vec<_> = resource.all_params().collect();
        assert_eq!(params.len(), 4);
        assert_eq!(params[0].kind, ParamKind::Query);
        assert_eq!(params[0].name, "sort");
        assert_eq!(params[0].type_name, None);
        assert!(!params[0].required);

        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["sort", "model", "purchasable", "manufacturedAt"]);
        assert_eq!(resource.to_string(), "GET /product");
    }

    #[test]
    fn test_url_and_form_params() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), &[("store/product.py", PRODUCT)]);

        let report = Documentor::new(online_store_config(dir.path()))
            .build(dir.path())
            .unwrap();

        let get = report.root.resources.get("/product/:productId-get").unwrap();
        assert_eq!(get.uri_params.len(), 1);
        assert!(get.uri_params[0].required);
        assert_eq!(get.uri_params[0].type_name.as_deref(), Some("Integer"));

        let put = report.root.resources.get("/product/:productId-put").unwrap();
        let form: Vec<&str> = put.form_params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(form, vec!["title", "model", "purchasable", "manufacturedAt"]);
        assert_eq!(put.form_params[0].description.as_deref(), Some("(Product title)"));
        assert_eq!(put.form_params[1].description.as_deref(), Some("Product Model"));

        let delete = report.root.resources.get("/product/:productId-delete").unwrap();
        assert_eq!(delete.header_params[0].name, "Authorization");
        let description = delete.description.as_deref().unwrap();
        assert!(description.starts_with("Delete a product with product ID"));
        assert!(description.contains("marked as deleted."));
        assert!(description.ends_with("- Products related to a `seller`"));
    }

    #[test]
    fn test_registry_keys_and_companions() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), &[("product.py", PRODUCT), ("seller.py", SELLER)]);

        let report = Documentor::new(online_store_config(dir.path()))
            .build(dir.path())
            .unwrap();
        let resources = &report.root.resources;

        // the second `get /seller/:sellerId` block overwrites the first
        let mut keys: Vec<String> = resources.documented().map(|r| r.key()).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "/product-get",
                "/product/:productId-delete",
                "/product/:productId-get",
                "/product/:productId-put",
                "/seller-get",
                "/seller/:sellerId-delete",
                "/seller/:sellerId-get",
            ]
        );

        for path in ["/product", "/product/:productId", "/seller", "/seller/:sellerId"] {
            let companion = resources.get(&format!("{}-options", path)).unwrap();
            assert!(companion.is_cors_companion());
        }

        let seller = resources.get("/seller/:sellerId-get").unwrap();
        assert_eq!(seller.security.roles, vec!["", ""]);
        assert_eq!(report.without_examples().len(), 7);
    }

    #[test]
    fn test_routing_after_build() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), &[("product.py", PRODUCT)]);

        let report = Documentor::new(online_store_config(dir.path()))
            .build(dir.path())
            .unwrap();
        let resources = &report.root.resources;

        assert_eq!(
            resources.find("/product/12/", "put").map(|r| r.key()),
            Some("/product/:productId-put".to_string())
        );
        assert_eq!(
            resources.find("/product", "GET").map(|r| r.key()),
            Some("/product-get".to_string())
        );
        assert!(resources.find("/product/12/images", "get").is_none());
        assert!(resources.find("/product", "post").is_none());
    }
}

mod wrong_usecase_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(name: &str, content: &str) -> apiscribe::parse::ParseOutput {
        let sources = vec![
            SourceFile::new("product.py", PRODUCT),
            SourceFile::new(name, content),
        ];
        Parser::default().parse(&sources)
    }

    #[test]
    fn test_api_without_path() {
        let output = parse("wrong_api_name.py", WRONG_API_NAME);

        assert_eq!(output.warnings.len(), 1);
        let warning = &output.warnings[0];
        assert_eq!(warning.kind, WarningKind::MissedParameter);
        assert_eq!(warning.filename, "wrong_api_name.py");
        assert_eq!(warning.line, 7);

        // the other block of the file still parses
        assert!(output
            .resources
            .iter()
            .any(|r| r.filename == "wrong_api_name.py" && r.path == "/seller"));
    }

    #[test]
    fn test_missing_parameter_name() {
        let output = parse("missed_parameter_name.py", MISSED_PARAMETER_NAME);

        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].kind, WarningKind::MissedParameter);
        assert_eq!(output.warnings[0].line, 14);

        let seller = output
            .resources
            .iter()
            .find(|r| r.filename == "missed_parameter_name.py")
            .unwrap();
        assert_eq!(seller.params.len(), 1);
    }

    #[test]
    fn test_use_of_undefined_block() {
        let output = parse("wrong_api_use.py", WRONG_API_USE);

        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].kind, WarningKind::InvalidDefinition);
        assert_eq!(output.warnings[0].line, 16);
        assert!(output.warnings[0].message.contains("SellerSuccess"));
    }

    #[test]
    fn test_duplicate_description() {
        let output = parse("duplicate_description.py", DUPLICATE_DESCRIPTION);

        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].kind, WarningKind::DuplicateApiName);
        assert_eq!(output.warnings[0].line, 15);

        let seller = output
            .resources
            .iter()
            .find(|r| r.filename == "duplicate_description.py")
            .unwrap();
        assert_eq!(seller.description.as_deref(), Some("SellerId is unique"));
    }

    #[test]
    fn test_missing_method_before_brace_path() {
        let output = parse("missed_method_name.py", MISSED_METHOD_NAME);

        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].kind, WarningKind::MissedParameter);
        assert_eq!(output.warnings[0].line, 7);

        let user = output
            .resources
            .iter()
            .find(|r| r.filename == "missed_method_name.py")
            .unwrap();
        assert_eq!(user.method, None);
        assert_eq!(user.path, "/user/{user_id}");
        assert!(user.to_resource().is_none());
    }

    #[test]
    fn test_warning_display() {
        let output = parse("wrong_api_use.py", WRONG_API_USE);
        assert_eq!(
            output.warnings[0].to_string(),
            "wrong_api_use.py:16: [invalid-definition] There is no such apiDefine `SellerSuccess`"
        );
    }
}

mod shared_definition_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_definition_reached_through_two_parents() {
        let sources = vec![
            SourceFile::new("definitions.py", SHARED_DEFINITIONS),
            SourceFile::new("gallery.py", GALLERY),
        ];
        let output = Parser::default().parse(&sources);
        assert!(output.warnings.is_empty());

        let photo = output.resources[0].to_resource().unwrap();
        assert_eq!(photo.key(), "/photo-get");
        assert_eq!(photo.security.roles, vec!["user"]);
        assert_eq!(photo.query_params.len(), 1);
        assert_eq!(photo.query_params[0].default.as_deref(), Some("1"));
        assert_eq!(photo.header_params.len(), 2);
        assert!(photo
            .header_params
            .iter()
            .all(|p| p.name == "Authorization" && p.kind == ParamKind::Header));
    }
}
