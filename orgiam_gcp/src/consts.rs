pub const AUTH_HEADER: &str = "Authorization";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const ACCEPT_HEADER: &str = "Accept";
pub const USER_AGENT_HEADER: &str = "User-Agent";
pub const USER_AGENT: &str = "orgiam";

pub const DEFAULT_API_URL: &str = "https://cloudresourcemanager.googleapis.com/v1";
pub const ORGANIZATIONS_PREFIX: &str = "organizations/";
/// Resource type name used in config and state files.
pub const RESOURCE_TYPE: &str = "google_organization_iam_policy";
pub const BINDINGS_UPDATE_MASK: &str = "bindings";
