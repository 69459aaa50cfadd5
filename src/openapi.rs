//! OpenAPI 3.1 document generation from registered procedure metadata.

use bytes::Bytes;
use serde_json::{Map, Value, json};

use crate::operation;

/// Top-level API info for the OpenAPI document.
pub struct Info {
    pub title: &'static str,
    pub version: &'static str,
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "type": "object", "properties": { "error": { "type": "string" } } }
            }
        }
    })
}

/// Build an OpenAPI 3.1 JSON document from collected operation metadata.
pub fn generate(info: &Info, operations: &[operation::Meta]) -> Value {
    let mut paths: Map<String, Value> = Map::new();
    let mut schemas: Map<String, Value> = Map::new();

    for op in operations {
        let mut operation_obj: Map<String, Value> = Map::new();

        if !op.summary.is_empty() {
            operation_obj.insert("summary".into(), Value::String(op.summary.clone()));
        }
        if !op.tag.is_empty() {
            operation_obj.insert("tags".into(), json!([op.tag]));
        }

        let params = op.path_params();
        if !params.is_empty() {
            let parameters: Vec<Value> = params
                .iter()
                .map(|name| {
                    json!({
                        "name": name,
                        "in": "path",
                        "required": true,
                        "schema": { "type": "integer", "format": "int64" }
                    })
                })
                .collect();
            operation_obj.insert("parameters".into(), Value::Array(parameters));
        }

        // Request body
        if let Some(input_schema) = &op.input_schema {
            let input_json = serde_json::to_value(input_schema).unwrap_or(json!({}));
            let (content_schema, input_defs) = extract_defs(input_json);

            for (name, schema) in input_defs {
                schemas.entry(name).or_insert(schema);
            }

            operation_obj.insert(
                "requestBody".into(),
                json!({
                    "required": true,
                    "content": {
                        "application/json": {
                            "schema": content_schema
                        }
                    }
                }),
            );
        }

        // Response
        let mut responses: Map<String, Value> = Map::new();
        match &op.output_schema {
            Some(output_schema) => {
                let output_json = serde_json::to_value(output_schema).unwrap_or(json!({}));
                let (response_schema, output_defs) = extract_defs(output_json);

                for (name, schema) in output_defs {
                    schemas.entry(name).or_insert(schema);
                }

                responses.insert(
                    op.status.to_string(),
                    json!({
                        "description": "Successful response",
                        "content": {
                            "application/json": {
                                "schema": response_schema
                            }
                        }
                    }),
                );
            }
            None => {
                responses.insert(
                    op.status.to_string(),
                    json!({ "description": "Successful response" }),
                );
            }
        }

        // Error responses
        if op.input_schema.is_some() || !params.is_empty() {
            responses.insert("400".into(), error_response("Bad request"));
        }
        if !params.is_empty() {
            responses.insert("404".into(), json!({ "description": "Not found" }));
        }
        responses.insert("500".into(), error_response("Internal server error"));

        operation_obj.insert("responses".into(), Value::Object(responses));

        // Insert into paths grouped by path
        let path_item = paths
            .entry(op.path.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(map) = path_item {
            map.insert(op.method.clone(), Value::Object(operation_obj));
        }
    }

    let mut spec = json!({
        "openapi": "3.1.0",
        "info": {
            "title": info.title,
            "version": info.version,
        },
        "paths": paths,
    });

    if !schemas.is_empty()
        && let Some(obj) = spec.as_object_mut()
    {
        obj.insert("components".into(), json!({ "schemas": schemas }));
    }

    spec
}

/// Swagger UI page rendering the document served at `spec_path`.
pub fn docs_page(spec_path: &str) -> Bytes {
    Bytes::from(format!(
        r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>API documentation</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {{
      window.ui = SwaggerUIBundle({{ url: "{spec_path}", dom_id: "#swagger-ui" }});
    }};
  </script>
</body>
</html>
"##
    ))
}

/// Extract `$defs` from a schemars-generated schema and return
/// (root schema without $defs, Vec of (name, schema) pairs).
fn extract_defs(mut schema: Value) -> (Value, Vec<(String, Value)>) {
    let mut defs = Vec::new();

    if let Some(obj) = schema.as_object_mut()
        && let Some(Value::Object(defs_map)) = obj.remove("$defs")
    {
        for (name, def_schema) in defs_map {
            defs.push((name, rewrite_refs(def_schema)));
        }
    }

    (rewrite_refs(schema), defs)
}

/// Rewrite `$ref` values from schemars' `#/$defs/Foo` format to OpenAPI's
/// `#/components/schemas/Foo` format.
fn rewrite_refs(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let new_map: Map<String, Value> = map
                .into_iter()
                .map(|(k, v)| {
                    if k == "$ref" {
                        if let Value::String(ref s) = v
                            && let Some(name) = s.strip_prefix("#/$defs/")
                        {
                            return (k, Value::String(format!("#/components/schemas/{name}")));
                        }
                        (k, v)
                    } else {
                        (k, rewrite_refs(v))
                    }
                })
                .collect();
            Value::Object(new_map)
        }
        Value::Array(arr) => Value::Array(arr.into_iter().map(rewrite_refs).collect()),
        other => other,
    }
}
