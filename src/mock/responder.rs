//! Mock responder
//!
//! Picks the recorded example that best fits an inbound request. The
//! request is routed to a resource first; every example of that resource
//! recorded for the same path and method is then scored by how many
//! request features it shares with the inbound one.

use crate::error::Result;
use crate::model::root::strip_base;
use crate::model::{DocumentationRoot, ExampleRequest, ExampleResponse, ResourceExample};

/// Reason phrase of the response sent when no example fits
pub const NOT_FOUND_REASON: &str = "Example Not Found";

/// Resolves inbound requests to recorded responses
#[derive(Debug, Clone)]
pub struct MockResponder {
    root: DocumentationRoot,
    base_path: Option<String>,
}

fn same_keys<K: PartialEq, V, W>(
    a: impl Iterator<Item = (K, V)>,
    b: impl Iterator<Item = (K, W)>,
) -> bool {
    let a: Vec<K> = a.map(|(k, _)| k).collect();
    let b: Vec<K> = b.map(|(k, _)| k).collect();
    a.len() == b.len() && a.iter().all(|k| b.contains(k))
}

/// Number of features `recorded` shares with `candidate`.
///
/// `None` when the recorded request was made to another path or method.
pub fn score(recorded: &ExampleRequest, candidate: &ExampleRequest) -> Option<usize> {
    if recorded.path != candidate.path || recorded.method != candidate.method {
        return None;
    }

    let form_keys = match (&recorded.form_params, &candidate.form_params) {
        (Some(r), Some(c)) if !r.is_empty() && !c.is_empty() => same_keys(r.iter(), c.iter()),
        _ => false,
    };

    let recorded_body = recorded.formatted_body();
    let candidate_body = candidate.formatted_body();
    let body_keys = match (&recorded_body, &candidate_body) {
        (Some(serde_json::Value::Object(r)), Some(serde_json::Value::Object(c))) => {
            same_keys(r.iter(), c.iter())
        }
        _ => false,
    };

    let checks = [
        same_keys(recorded.query_strings.iter(), candidate.query_strings.iter()),
        recorded.query_strings == candidate.query_strings,
        form_keys,
        recorded.form_params == candidate.form_params,
        body_keys,
        recorded_body == candidate_body,
        recorded.headers == candidate.headers,
    ];
    Some(checks.into_iter().filter(|passed| *passed).count())
}

impl MockResponder {
    /// Fails when the root's base URI cannot be parsed
    pub fn new(root: DocumentationRoot) -> Result<Self> {
        let base_path = root.base_path()?;
        Ok(Self { root, base_path })
    }

    pub fn root(&self) -> &DocumentationRoot {
        &self.root
    }

    /// Best recorded example for `request`; earliest wins among equal scores
    pub fn find_example(&self, request: &ExampleRequest) -> Option<&ResourceExample> {
        let path = strip_base(&request.path, self.base_path.as_deref());
        let resource = self.root.resources.find(&path, &request.method)?;
        if resource.examples.is_empty() {
            return None;
        }

        let candidate = ExampleRequest {
            path,
            method: request.method.to_lowercase(),
            ..request.clone()
        };

        let mut best: Option<(usize, &ResourceExample)> = None;
        for example in &resource.examples {
            let recorded_path = strip_base(&example.request.path, self.base_path.as_deref());
            let recorded = ExampleRequest {
                path: recorded_path,
                ..example.request.clone()
            };
            let Some(points) = score(&recorded, &candidate) else {
                continue;
            };
            if best.map_or(true, |(top, _)| points > top) {
                best = Some((points, example));
            }
        }

        if let Some((points, example)) = best {
            tracing::debug!(
                resource = %resource,
                score = points,
                status = example.response.status,
                "selected example"
            );
        }
        best.map(|(_, example)| example)
    }

    /// Recorded response for `request`, or the `404 Example Not Found` sentinel
    pub fn respond(&self, request: &ExampleRequest) -> ExampleResponse {
        match self.find_example(request) {
            Some(example) => example.response.clone(),
            None => {
                tracing::debug!(method = %request.method, path = %request.path, "no example found");
                not_found()
            }
        }
    }
}

/// The `404 Example Not Found` sentinel with an empty body
pub fn not_found() -> ExampleResponse {
    ExampleResponse {
        reason: Some(NOT_FOUND_REASON.to_string()),
        body: Some(String::new()),
        ..ExampleResponse::new(404)
    }
}
