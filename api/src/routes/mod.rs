pub mod agent_info_route;
pub mod health_route;
pub mod query;
