//! Tool and resource registry
//!
//! Holds the named tool and resource descriptors with their handlers.
//! Registration order is preserved; names are unique per kind, enforced by a
//! full scan at registration time (the expected scale is tens of entries, so
//! the O(n) scan is the contract, not an accident).
//!
//! One `RwLock` guards the descriptor vectors. Lookups clone the matched
//! descriptor (cheap `Arc` and string clones) under the read guard and drop
//! it before the handler runs, so handler I/O never serializes behind
//! registry contention and an unregistered handler stays alive for any call
//! already in flight.

use {
    crate::error::{McpError, McpResult},
    async_trait::async_trait,
    serde::Serialize,
    serde_json::Value,
    std::sync::{Arc, RwLock},
    tracing::info,
};

const DEFAULT_MIME_TYPE: &str = "text/plain";

/// A callable exposed to MCP clients via `tools/call`.
///
/// Receives the call's `arguments` (absent when the client sent none) and
/// returns the result payload, or `None` for a failure with no detail (the
/// dispatcher reports it as an Internal Error). Context lives in the
/// implementing type itself.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, arguments: Option<Value>) -> Option<Value>;
}

/// A readable content source exposed via `resources/read`.
///
/// Receives the concrete URI that matched the resource's template and
/// returns the textual content, or `None` when this resource cannot serve
/// the URI (the read then falls through to later candidates).
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    async fn read(&self, uri: &str) -> Option<String>;
}

/// Adapter so a plain closure can serve as a [`ToolHandler`]
pub struct FnTool<F>(F);

impl<F> FnTool<F>
where
    F: Fn(Option<Value>) -> Option<Value> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> ToolHandler for FnTool<F>
where
    F: Fn(Option<Value>) -> Option<Value> + Send + Sync,
{
    async fn call(&self, arguments: Option<Value>) -> Option<Value> {
        (self.0)(arguments)
    }
}

/// Adapter so a plain closure can serve as a [`ResourceHandler`]
pub struct FnResource<F>(F);

impl<F> FnResource<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> ResourceHandler for FnResource<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    async fn read(&self, uri: &str) -> Option<String> {
        (self.0)(uri)
    }
}

/// Registration-time configuration for a tool
pub struct ToolConfig {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub input_schema: Option<Value>,
    pub handler: Arc<dyn ToolHandler>,
}

impl ToolConfig {
    pub fn new(name: impl Into<String>, handler: Arc<dyn ToolHandler>) -> Self {
        Self {
            name: name.into(),
            title: None,
            description: None,
            input_schema: None,
            handler,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn input_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }
}

/// Registration-time configuration for a resource
pub struct ResourceConfig {
    pub uri_template: String,
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub mime_type: Option<String>,
    pub handler: Arc<dyn ResourceHandler>,
}

impl ResourceConfig {
    pub fn new(
        uri_template: impl Into<String>,
        name: impl Into<String>,
        handler: Arc<dyn ResourceHandler>,
    ) -> Self {
        Self {
            uri_template: uri_template.into(),
            name: name.into(),
            title: None,
            description: None,
            mime_type: None,
            handler,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// Owned tool entry. Cloning shares the handler, not the registration.
#[derive(Clone)]
pub(crate) struct ToolDescriptor {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub input_schema: Option<Value>,
    pub handler: Arc<dyn ToolHandler>,
}

/// Owned resource entry
#[derive(Clone)]
pub(crate) struct ResourceDescriptor {
    pub uri_template: String,
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub mime_type: String,
    pub handler: Arc<dyn ResourceHandler>,
}

/// Handler-free tool projection for `tools/list`
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "inputSchema", skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

/// Handler-free resource projection for `resources/list`
#[derive(Debug, Clone, Serialize)]
pub struct ResourceInfo {
    pub uri: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

#[derive(Default)]
struct RegistryInner {
    tools: Vec<ToolDescriptor>,
    resources: Vec<ResourceDescriptor>,
}

/// The shared tool/resource registry
#[derive(Default)]
pub struct Registry {
    inner: RwLock<RegistryInner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Fails with `InvalidArgument` on an empty name and
    /// `AlreadyExists` when the name is already taken among tools.
    pub fn register_tool(&self, config: ToolConfig) -> McpResult<()> {
        if config.name.is_empty() {
            return Err(McpError::InvalidArgument(
                "tool name is required".to_string(),
            ));
        }

        let mut inner = self.inner.write().expect("registry lock poisoned");
        if inner.tools.iter().any(|tool| tool.name == config.name) {
            return Err(McpError::AlreadyExists(config.name));
        }

        info!(tool = %config.name, "Tool registered");
        inner.tools.push(ToolDescriptor {
            name: config.name,
            title: config.title,
            description: config.description,
            input_schema: config.input_schema,
            handler: config.handler,
        });
        Ok(())
    }

    /// Register a resource. Requires a uri_template and a name; the MIME
    /// type defaults to `text/plain` when not given.
    pub fn register_resource(&self, config: ResourceConfig) -> McpResult<()> {
        if config.uri_template.is_empty() {
            return Err(McpError::InvalidArgument(
                "resource uri_template is required".to_string(),
            ));
        }
        if config.name.is_empty() {
            return Err(McpError::InvalidArgument(
                "resource name is required".to_string(),
            ));
        }

        let mut inner = self.inner.write().expect("registry lock poisoned");
        if inner
            .resources
            .iter()
            .any(|resource| resource.name == config.name)
        {
            return Err(McpError::AlreadyExists(config.name));
        }

        info!(resource = %config.name, template = %config.uri_template, "Resource registered");
        inner.resources.push(ResourceDescriptor {
            uri_template: config.uri_template,
            name: config.name,
            title: config.title,
            description: config.description,
            mime_type: config
                .mime_type
                .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
            handler: config.handler,
        });
        Ok(())
    }

    /// Remove a tool by name, preserving the order of the remaining entries.
    /// Calls already holding the handler finish undisturbed.
    pub fn unregister_tool(&self, name: &str) -> McpResult<()> {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        match inner.tools.iter().position(|tool| tool.name == name) {
            Some(index) => {
                inner.tools.remove(index);
                info!(tool = %name, "Tool unregistered");
                Ok(())
            }
            None => Err(McpError::NotFound(name.to_string())),
        }
    }

    /// Remove a resource by name
    pub fn unregister_resource(&self, name: &str) -> McpResult<()> {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        match inner
            .resources
            .iter()
            .position(|resource| resource.name == name)
        {
            Some(index) => {
                inner.resources.remove(index);
                info!(resource = %name, "Resource unregistered");
                Ok(())
            }
            None => Err(McpError::NotFound(name.to_string())),
        }
    }

    /// Registration-order tool projections for `tools/list`
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        let inner = self.inner.read().expect("registry lock poisoned");
        inner
            .tools
            .iter()
            .map(|tool| ToolInfo {
                name: tool.name.clone(),
                title: tool.title.clone(),
                description: tool.description.clone(),
                input_schema: tool.input_schema.clone(),
            })
            .collect()
    }

    /// Registration-order resource projections for `resources/list`
    pub fn list_resources(&self) -> Vec<ResourceInfo> {
        let inner = self.inner.read().expect("registry lock poisoned");
        inner
            .resources
            .iter()
            .map(|resource| ResourceInfo {
                uri: resource.uri_template.clone(),
                name: resource.name.clone(),
                title: resource.title.clone(),
                description: resource.description.clone(),
                mime_type: resource.mime_type.clone(),
            })
            .collect()
    }

    /// Find a tool by exact name. The returned clone shares the handler,
    /// so the caller invokes it without holding the registry lock.
    pub(crate) fn find_tool(&self, name: &str) -> Option<ToolDescriptor> {
        let inner = self.inner.read().expect("registry lock poisoned");
        inner.tools.iter().find(|tool| tool.name == name).cloned()
    }

    /// Snapshot of the resources in registration order, for template
    /// matching outside the lock
    pub(crate) fn resources_snapshot(&self) -> Vec<ResourceDescriptor> {
        let inner = self.inner.read().expect("registry lock poisoned");
        inner.resources.clone()
    }

    pub fn tool_count(&self) -> usize {
        self.inner.read().expect("registry lock poisoned").tools.len()
    }

    pub fn resource_count(&self) -> usize {
        self.inner
            .read()
            .expect("registry lock poisoned")
            .resources
            .len()
    }
}
