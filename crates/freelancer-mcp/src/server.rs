//! rmcp `ServerHandler` wiring for the Freelancer tools and resources.

use crate::requests::{empty_schema, project_search_schema, user_search_schema};
use crate::resources::{self, JSON_MIME_TYPE, RESOURCES};
use crate::session::FreelancerSession;
use crate::tools::{FreelancerTools, HEALTH_CHECK, SEARCH_FREELANCERS, SEARCH_PROJECTS};
use rmcp::model::{
    Annotated, CallToolRequestParams, CallToolResult, Content, ListResourcesResult,
    ListToolsResult, PaginatedRequestParams, RawResource, ReadResourceRequestParams,
    ReadResourceResult, Resource, ResourceContents, ServerCapabilities, ServerInfo, Tool,
    ToolAnnotations,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler};
use std::sync::Arc;

const INSTRUCTIONS: &str = "Search Freelancer.com projects and freelancers. \
Use search_projects to find open projects, search_freelancers to find people by skill or \
location, and health_check to verify API connectivity. Read freelancer://help for details.";

#[derive(Debug, Clone)]
pub struct FreelancerMcpServer {
    tools: FreelancerTools,
}

impl FreelancerMcpServer {
    #[must_use]
    pub fn new(session: Arc<FreelancerSession>) -> Self {
        Self {
            tools: FreelancerTools::new(session),
        }
    }

    #[must_use]
    pub fn tools(&self) -> &FreelancerTools {
        &self.tools
    }
}

/// Every tool here reads from an external API and changes nothing.
fn read_only_annotations() -> ToolAnnotations {
    ToolAnnotations {
        title: None,
        read_only_hint: Some(true),
        destructive_hint: Some(false),
        idempotent_hint: Some(true),
        open_world_hint: Some(true),
    }
}

#[must_use]
pub fn tool_definitions() -> Vec<Tool> {
    [
        (
            SEARCH_PROJECTS,
            "Search for projects on Freelancer.com",
            project_search_schema(),
        ),
        (
            SEARCH_FREELANCERS,
            "Search for freelancers on Freelancer.com",
            user_search_schema(),
        ),
        (
            HEALTH_CHECK,
            "Check the health status of the MCP server and Freelancer API connection",
            empty_schema(),
        ),
    ]
    .into_iter()
    .map(|(name, description, schema)| {
        let mut tool = Tool::new(name, description, Arc::new(schema));
        tool.annotations = Some(read_only_annotations());
        tool
    })
    .collect()
}

#[must_use]
pub fn resource_definitions() -> Vec<Resource> {
    RESOURCES
        .iter()
        .map(|spec| {
            let mut raw = RawResource::new(spec.uri, spec.name);
            raw.description = Some(spec.description.to_string());
            raw.mime_type = Some(JSON_MIME_TYPE.to_string());
            Annotated::new(raw, None)
        })
        .collect()
}

impl ServerHandler for FreelancerMcpServer {
    fn get_info(&self) -> ServerInfo {
        let settings = self.tools.session().settings();
        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder()
            .enable_tools()
            .enable_resources()
            .build();
        info.server_info.name.clone_from(&settings.server_name);
        info.server_info.version.clone_from(&settings.server_version);
        info.instructions = Some(INSTRUCTIONS.to_string());
        info
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(tool_definitions()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let name = request.name.as_ref();
        tracing::debug!(tool = name, "tools/call");

        let Some(body) = self.tools.call(name, request.arguments.as_ref()).await else {
            return Err(ErrorData::invalid_params(
                format!("unknown tool '{name}'"),
                None,
            ));
        };

        let text = serde_json::to_string(&body).unwrap_or_else(|_| body.to_string());
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        Ok(ListResourcesResult::with_all_items(resource_definitions()))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        let Some(text) = resources::read(&request.uri, self.tools.session()) else {
            return Err(ErrorData::resource_not_found(
                format!("unknown resource '{}'", request.uri),
                None,
            ));
        };

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn three_read_only_tools_are_advertised() {
        let tools = tool_definitions();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert_eq!(names, [SEARCH_PROJECTS, SEARCH_FREELANCERS, HEALTH_CHECK]);
        for tool in &tools {
            let hints = tool.annotations.as_ref().expect("annotations");
            assert_eq!(hints.read_only_hint, Some(true));
        }
        assert!(tools[0].input_schema.contains_key("properties"));
    }

    #[test]
    fn resources_are_json_documents() {
        let resources = resource_definitions();
        assert_eq!(resources.len(), 3);
        for resource in &resources {
            assert_eq!(resource.raw.mime_type.as_deref(), Some(JSON_MIME_TYPE));
            assert!(resource.raw.uri.starts_with("freelancer://"));
        }
    }

    #[test]
    fn server_info_uses_configured_name_and_version() {
        let mut settings = Settings::new(Some("tok".to_string()));
        settings.server_name = "fln-test".to_string();
        let server = FreelancerMcpServer::new(Arc::new(FreelancerSession::new(Arc::new(settings))));
        let info = server.get_info();
        assert_eq!(info.server_info.name, "fln-test");
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
    }
}
