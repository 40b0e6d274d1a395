//! Test fixtures: swagger documents written to a temp directory
#![allow(dead_code)]

use serde_json::json;
use std::path::Path;
use tempfile::TempDir;

/// OpenAPI 3 document with 3 paths and one server.
pub fn petstore() -> serde_json::Value {
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Pet Store",
            "description": "A sample API",
            "version": "1.0"
        },
        "servers": [
            { "url": "https://petstore.example.com/v1", "description": "production" }
        ],
        "paths": {
            "/pets": {
                "get": {
                    "summary": "List pets",
                    "operationId": "listPets",
                    "tags": ["pets"],
                    "parameters": [
                        { "name": "limit", "in": "query", "schema": { "type": "integer" } }
                    ],
                    "responses": {
                        "200": {
                            "description": "A list of pets",
                            "content": {
                                "application/json": { "schema": { "type": "array" } }
                            }
                        }
                    }
                },
                "post": {
                    "summary": "Create a pet",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } }
                        }
                    },
                    "responses": { "201": { "description": "Created" } }
                }
            },
            "/pets/{petId}": {
                "get": {
                    "operationId": "showPetById",
                    "parameters": [
                        { "name": "petId", "in": "path", "required": true, "schema": { "type": "string" } }
                    ],
                    "responses": { "200": { "description": "A pet" } }
                }
            },
            "/health": {
                "head": { "responses": { "204": { "description": "Alive" } } }
            }
        },
        "components": {
            "schemas": { "Pet": { "type": "object" } }
        }
    })
}

/// Swagger 2.0 document with 2 paths and no servers.
pub fn inventory() -> serde_json::Value {
    json!({
        "swagger": "2.0",
        "info": { "title": "Inventory", "version": "2.1" },
        "paths": {
            "/items": {
                "post": {
                    "parameters": [
                        { "name": "item", "in": "body", "required": true, "schema": { "type": "object" } }
                    ],
                    "responses": { "200": { "description": "ok" } }
                }
            },
            "/items/{id}": {
                "delete": { "responses": { "204": { "description": "deleted" } } }
            }
        }
    })
}

pub struct SpecDir {
    pub dir: TempDir,
}

impl SpecDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Write `contents` to `name` and return its path as a registry source.
    pub fn write(&self, name: &str, contents: &str) -> String {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("Failed to write spec file");
        path_string(&path)
    }

    pub fn write_json(&self, name: &str, doc: &serde_json::Value) -> String {
        self.write(name, &doc.to_string())
    }

    pub fn missing(&self, name: &str) -> String {
        path_string(&self.dir.path().join(name))
    }
}

fn path_string(path: &Path) -> String {
    path.to_str().expect("utf-8 temp path").to_string()
}
