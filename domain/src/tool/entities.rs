//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Definition of a tool published by a gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "browser_navigate")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    pub required: bool,
    /// Parameter type hint (e.g., "string", "number")
    pub param_type: String,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    /// Build a definition from an MCP `inputSchema` (JSON Schema object).
    pub fn from_input_schema(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: &serde_json::Value,
    ) -> Self {
        let mut def = Self::new(name, description);
        let required: Vec<&str> = schema
            .get("required")
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default();

        if let Some(props) = schema.get("properties").and_then(|v| v.as_object()) {
            for (prop_name, prop) in props {
                let description = prop
                    .get("description")
                    .and_then(|v| v.as_str())
                    .unwrap_or("");
                let param_type = prop.get("type").and_then(|v| v.as_str()).unwrap_or("string");
                def.parameters.push(
                    ToolParameter::new(prop_name, description, required.contains(&prop_name.as_str()))
                        .with_type(param_type),
                );
            }
        }
        def
    }

    /// One-line description, logged when a gateway publishes its tools.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| {
                if p.required {
                    format!("{}: {}", p.name, p.param_type)
                } else {
                    format!("{}?: {}", p.name, p.param_type)
                }
            })
            .collect();
        format!("{}({}) - {}", self.name, params.join(", "), self.description)
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// Catalog of tools published by one gateway
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolSpec {
    tools: BTreeMap<String, ToolDefinition>,
    /// Alias → canonical name mapping (e.g. "navigate" → "browser_navigate")
    aliases: HashMap<String, String>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, tool: ToolDefinition) -> Self {
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    /// Register a single alias mapping (builder pattern)
    pub fn register_alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), canonical.into());
        self
    }

    /// Browser tools every gateway is assumed to offer when discovery fails.
    pub fn fallback_browser() -> Self {
        Self::new()
            .register(
                ToolDefinition::new("browser_navigate", "Navigate to a URL")
                    .with_parameter(ToolParameter::new("url", "The URL to navigate to", true)),
            )
            .register(
                ToolDefinition::new("browser_click", "Click an element on the page")
                    .with_parameter(ToolParameter::new(
                        "element",
                        "Human-readable element description",
                        true,
                    ))
                    .with_parameter(ToolParameter::new(
                        "ref",
                        "Exact element reference from the page snapshot",
                        true,
                    )),
            )
            .register(
                ToolDefinition::new("browser_type", "Type text into an editable element")
                    .with_parameter(ToolParameter::new(
                        "element",
                        "Human-readable element description",
                        true,
                    ))
                    .with_parameter(ToolParameter::new(
                        "ref",
                        "Exact element reference from the page snapshot",
                        true,
                    ))
                    .with_parameter(ToolParameter::new("text", "Text to type", true))
                    .with_parameter(
                        ToolParameter::new("submit", "Press Enter after typing", false)
                            .with_type("boolean"),
                    ),
            )
            .register(ToolDefinition::new(
                "browser_snapshot",
                "Capture an accessibility snapshot of the current page",
            ))
            .register(ToolDefinition::new(
                "browser_take_screenshot",
                "Take a screenshot of the current page",
            ))
            .with_browser_aliases()
    }

    /// Short names models tend to use for the browser tools.
    pub fn with_browser_aliases(self) -> Self {
        self.register_alias("navigate", "browser_navigate")
            .register_alias("goto", "browser_navigate")
            .register_alias("click", "browser_click")
            .register_alias("type", "browser_type")
            .register_alias("snapshot", "browser_snapshot")
            .register_alias("screenshot", "browser_take_screenshot")
    }

    /// Resolve a name: the canonical name if registered, else the alias
    /// target if that is registered, else `None`.
    pub fn resolve<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.tools.contains_key(name) {
            return Some(name);
        }
        self.aliases
            .get(name)
            .map(|s| s.as_str())
            .filter(|canonical| self.tools.contains_key(*canonical))
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A call to a tool with arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub tool_name: String,
    /// Arguments passed to the tool
    #[serde(default)]
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Arguments as a JSON object, for wire encoding.
    pub fn arguments_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.arguments
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_browser_catalog() {
        let spec = ToolSpec::fallback_browser();
        assert_eq!(spec.len(), 5);
        assert!(spec.contains("browser_navigate"));
        assert!(spec.contains("browser_take_screenshot"));
        assert!(!spec.contains("run_command"));
    }

    #[test]
    fn test_alias_resolution() {
        let spec = ToolSpec::fallback_browser();
        assert_eq!(spec.resolve("navigate"), Some("browser_navigate"));
        assert_eq!(spec.resolve("browser_click"), Some("browser_click"));
        assert_eq!(spec.resolve("scroll"), None);
    }

    #[test]
    fn test_alias_to_unregistered_tool_is_rejected() {
        let spec = ToolSpec::new()
            .register(ToolDefinition::new("browser_snapshot", "snap"))
            .with_browser_aliases();
        assert_eq!(spec.resolve("snapshot"), Some("browser_snapshot"));
        assert_eq!(spec.resolve("navigate"), None);
    }

    #[test]
    fn test_from_input_schema() {
        let schema = serde_json::json!({
            "type": "object",
            "properties": {
                "url": {"type": "string", "description": "Target URL"},
                "wait": {"type": "number"}
            },
            "required": ["url"]
        });
        let def = ToolDefinition::from_input_schema("browser_navigate", "Go", &schema);
        let url = def.parameters.iter().find(|p| p.name == "url").unwrap();
        assert!(url.required);
        let wait = def.parameters.iter().find(|p| p.name == "wait").unwrap();
        assert!(!wait.required);
        assert_eq!(wait.param_type, "number");
    }

    #[test]
    fn test_signature() {
        let def = ToolDefinition::new("browser_navigate", "Navigate to a URL")
            .with_parameter(ToolParameter::new("url", "URL", true));
        assert_eq!(def.signature(), "browser_navigate(url: string) - Navigate to a URL");
    }

    #[test]
    fn test_tool_call_args() {
        let call = ToolCall::new("browser_navigate").with_arg("url", "https://stripe.com");
        assert_eq!(call.get_string("url"), Some("https://stripe.com"));
        assert_eq!(call.arguments_json()["url"], "https://stripe.com");
    }
}
