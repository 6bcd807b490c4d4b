//! Tool handler exposing the meta description pipeline over MCP.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::mcp::{InitializeParams, McpHandler, Tool, ToolCallParams, PROTOCOL_VERSION};
use crate::seo::{BatchItem, BatchResult, GenerationRequest, MetaGenerator, Tone};

pub const GENERATE_META_DESCRIPTION: &str = "generate_meta_description";
pub const ANALYZE_CONTENT: &str = "analyze_content";
pub const BATCH_GENERATE: &str = "batch_generate";

/// Names of every tool, in listing order
pub const TOOL_NAMES: &[&str] = &[GENERATE_META_DESCRIPTION, ANALYZE_CONTENT, BATCH_GENERATE];

const TONES: &[&str] = &["professional", "casual", "technical", "marketing"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateArgs {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    max_length: Option<f64>,
    #[serde(default)]
    tone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeArgs {
    #[serde(default)]
    content: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct BatchArgs {
    #[serde(default)]
    posts: Value,
    #[serde(default)]
    tone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MetaToolHandler {
    generator: Arc<MetaGenerator>,
    default_tone: Tone,
    default_max_length: usize,
    name: String,
    version: String,
}

impl MetaToolHandler {
    pub fn new(generator: Arc<MetaGenerator>) -> Self {
        Self {
            generator,
            default_tone: Tone::default(),
            default_max_length: crate::seo::DEFAULT_MAX_LENGTH,
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn with_defaults(mut self, tone: Tone, max_length: usize) -> Self {
        self.default_tone = tone;
        self.default_max_length = max_length;
        self
    }

    pub fn with_server_info(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.name = name.into();
        self.version = version.into();
        self
    }

    pub fn generator(&self) -> &MetaGenerator {
        &self.generator
    }

    /// Run a tool and return its bare JSON payload
    pub fn execute(&self, name: &str, arguments: Value) -> Result<Value> {
        debug!("Executing tool: {}", name);
        match name {
            GENERATE_META_DESCRIPTION => self.generate(arguments),
            ANALYZE_CONTENT => self.analyze(arguments),
            BATCH_GENERATE => self.batch(arguments),
            other => Err(Error::ToolNotFound(other.to_string())),
        }
    }

    fn generate(&self, arguments: Value) -> Result<Value> {
        let args: GenerateArgs = decode_args(arguments)?;
        let request = GenerationRequest {
            title: args.title,
            content: args.content,
            keywords: args.keywords,
            max_length: match args.max_length {
                Some(len) => to_length(len)?,
                None => self.default_max_length,
            },
            tone: self.resolve_tone(args.tone.as_deref())?,
        };

        let generated = self.generator.generate_description(&request)?;
        let mut payload = serde_json::to_value(&generated)?;
        payload["success"] = json!(true);
        Ok(payload)
    }

    fn analyze(&self, arguments: Value) -> Result<Value> {
        let args: AnalyzeArgs = decode_args(arguments)?;
        let analysis = self.generator.analyze_content(&args.content, &args.title)?;
        let mut payload = serde_json::to_value(&analysis)?;
        payload["success"] = json!(true);
        Ok(payload)
    }

    fn batch(&self, arguments: Value) -> Result<Value> {
        let args: BatchArgs = decode_args(arguments)?;
        let tone = self.resolve_tone(args.tone.as_deref())?;

        let posts = match args.posts {
            Value::Array(posts) if !posts.is_empty() => posts,
            _ => return Err(Error::InvalidInput("Posts array cannot be empty".to_string())),
        };
        self.generator.check_batch_size(posts.len())?;

        let results: Vec<BatchResult> = posts
            .into_iter()
            .map(|post| {
                let id = post_id(&post);
                match serde_json::from_value::<BatchItem>(post) {
                    Ok(item) => self.generator.generate_item(&item, tone),
                    Err(e) => BatchResult::failed(id, &Error::InvalidParams(e.to_string())),
                }
            })
            .collect();

        let failed = results.iter().filter(|r| !r.success).count();
        info!("Batch processed: {} items, {} failed", results.len(), failed);

        Ok(json!({
            "success": true,
            "processed": results.len(),
            "results": results,
        }))
    }

    fn resolve_tone(&self, tone: Option<&str>) -> Result<Tone> {
        match tone {
            Some(tone) => tone.parse(),
            None => Ok(self.default_tone),
        }
    }

    pub fn tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: GENERATE_META_DESCRIPTION.to_string(),
                description: "Generate SEO-optimized meta descriptions for WordPress posts/pages"
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "title": {
                            "type": "string",
                            "description": "The page/post title",
                            "maxLength": 200
                        },
                        "content": {
                            "type": "string",
                            "description": "The main content of the page/post",
                            "maxLength": 5000
                        },
                        "keywords": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "Target keywords for SEO (optional)",
                            "maxItems": 10
                        },
                        "maxLength": {
                            "type": "number",
                            "description": "Maximum length of meta description",
                            "default": self.default_max_length,
                            "minimum": crate::seo::MIN_MAX_LENGTH,
                            "maximum": crate::seo::MAX_MAX_LENGTH
                        },
                        "tone": {
                            "type": "string",
                            "enum": TONES,
                            "description": "Tone of the meta description",
                            "default": self.default_tone
                        }
                    },
                    "required": ["title", "content"],
                    "additionalProperties": false
                }),
            },
            Tool {
                name: ANALYZE_CONTENT.to_string(),
                description: "Analyze content to extract key themes and suggest keywords"
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "content": {
                            "type": "string",
                            "description": "Content to analyze",
                            "maxLength": 10000
                        },
                        "title": {
                            "type": "string",
                            "description": "Title of the content",
                            "maxLength": 200
                        }
                    },
                    "required": ["content", "title"],
                    "additionalProperties": false
                }),
            },
            Tool {
                name: BATCH_GENERATE.to_string(),
                description: "Generate meta descriptions for multiple posts at once".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "posts": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "id": { "type": ["string", "number"] },
                                    "title": { "type": "string", "maxLength": 200 },
                                    "content": { "type": "string", "maxLength": 3000 },
                                    "keywords": {
                                        "type": "array",
                                        "items": { "type": "string" },
                                        "maxItems": 5
                                    }
                                },
                                "required": ["id", "title", "content"]
                            },
                            "maxItems": self.generator.options().max_batch_items
                        },
                        "tone": {
                            "type": "string",
                            "enum": TONES,
                            "default": self.default_tone
                        }
                    },
                    "required": ["posts"],
                    "additionalProperties": false
                }),
            },
        ]
    }
}

#[async_trait]
impl McpHandler for MetaToolHandler {
    async fn initialize(&self, params: InitializeParams) -> Result<Value> {
        if let Some(client) = &params.client_info {
            info!("MCP client connected: {} {}", client.name, client.version);
        }
        Ok(json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {
                    "listChanged": false
                }
            },
            "serverInfo": {
                "name": self.name,
                "version": self.version
            }
        }))
    }

    async fn list_tools(&self) -> Result<Vec<Tool>> {
        Ok(self.tools())
    }

    async fn call_tool(&self, params: ToolCallParams) -> Result<Value> {
        let payload = self.execute(&params.name, params.arguments.unwrap_or_default())?;
        Ok(json!({
            "content": [
                {
                    "type": "text",
                    "text": serde_json::to_string_pretty(&payload)?
                }
            ]
        }))
    }
}

fn decode_args<T: for<'de> Deserialize<'de>>(arguments: Value) -> Result<T> {
    let arguments = match arguments {
        Value::Null => json!({}),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| Error::InvalidParams(e.to_string()))
}

fn to_length(value: f64) -> Result<usize> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidInput(format!("Invalid maxLength: {}", value)));
    }
    Ok(value.floor() as usize)
}

/// Best-effort id of a post that failed to decode
fn post_id(post: &Value) -> String {
    match post.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BREAD: &str = "Step 1: mix flour and water. Step 2: knead the dough for ten minutes. Bake at 450F.";

    fn handler() -> MetaToolHandler {
        MetaToolHandler::new(Arc::new(MetaGenerator::default()))
    }

    #[test]
    fn test_generate_payload_shape() {
        let payload = handler()
            .execute(
                GENERATE_META_DESCRIPTION,
                json!({"title": "How to Bake Bread", "content": BREAD, "keywords": ["bread"]}),
            )
            .unwrap();

        assert_eq!(payload["success"], true);
        assert_eq!(payload["tone"], "professional");
        assert_eq!(payload["keywords"], json!(["bread"]));
        assert_eq!(payload["analysis"]["contentType"], "tutorial");
        let text = payload["metaDescription"].as_str().unwrap();
        assert_eq!(payload["length"], text.chars().count());
    }

    #[test]
    fn test_generate_rejects_bad_arguments() {
        let handler = handler();
        let err = handler
            .execute(GENERATE_META_DESCRIPTION, json!({"title": "", "content": BREAD}))
            .unwrap_err();
        assert_eq!(err.to_string(), "Title cannot be empty");

        let err = handler
            .execute(
                GENERATE_META_DESCRIPTION,
                json!({"title": "T", "content": BREAD, "tone": "sarcastic"}),
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = handler
            .execute(GENERATE_META_DESCRIPTION, json!({"title": 5, "content": BREAD}))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParams(_)));
    }

    #[test]
    fn test_analyze_payload_is_flat() {
        let payload = handler()
            .execute(ANALYZE_CONTENT, json!({"title": "Bread", "content": BREAD}))
            .unwrap();
        assert_eq!(payload["success"], true);
        assert_eq!(payload["title"], "Bread");
        assert!(payload["wordCount"].as_u64().unwrap() > 0);
        assert!(payload.get("readabilityScore").is_some());
    }

    #[test]
    fn test_batch_decodes_items_independently() {
        let payload = handler()
            .execute(
                BATCH_GENERATE,
                json!({
                    "posts": [
                        {"id": 7, "title": "Bread", "content": BREAD},
                        {"id": "b", "title": ["bad"], "content": BREAD},
                        {"id": "c", "title": "", "content": BREAD}
                    ],
                    "tone": "casual"
                }),
            )
            .unwrap();

        assert_eq!(payload["processed"], 3);
        let results = payload["results"].as_array().unwrap();
        assert_eq!(results[0]["id"], "7");
        assert_eq!(results[0]["success"], true);
        assert_eq!(results[1]["id"], "b");
        assert_eq!(results[1]["success"], false);
        assert_eq!(results[2]["error"], "Title cannot be empty");
    }

    #[test]
    fn test_batch_accepts_null_keywords() {
        let payload = handler()
            .execute(
                BATCH_GENERATE,
                json!({"posts": [
                    {"id": "1", "title": "How to Bake Bread", "content": BREAD, "keywords": null}
                ]}),
            )
            .unwrap();
        assert_eq!(payload["results"][0]["id"], "1");
        assert_eq!(payload["results"][0]["success"], true);
        assert!(payload["results"][0].get("error").is_none());
    }

    #[test]
    fn test_batch_requires_posts() {
        let handler = handler();
        for args in [json!({}), json!({"posts": []}), json!({"posts": "x"})] {
            let err = handler.execute(BATCH_GENERATE, args).unwrap_err();
            assert_eq!(err.to_string(), "Posts array cannot be empty");
        }
    }

    #[test]
    fn test_unknown_tool() {
        let err = handler().execute("delete_everything", json!({})).unwrap_err();
        assert!(matches!(err, Error::ToolNotFound(_)));
    }

    #[tokio::test]
    async fn test_call_tool_wraps_text_content() {
        let result = handler()
            .call_tool(ToolCallParams {
                name: ANALYZE_CONTENT.to_string(),
                arguments: Some(json!({"title": "Bread", "content": BREAD})),
            })
            .await
            .unwrap();
        assert_eq!(result["content"][0]["type"], "text");
        let text = result["content"][0]["text"].as_str().unwrap();
        let inner: Value = serde_json::from_str(text).unwrap();
        assert_eq!(inner["title"], "Bread");
    }

    #[tokio::test]
    async fn test_tools_listed_in_order() {
        let tools = handler().list_tools().await.unwrap();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, TOOL_NAMES);
    }
}
