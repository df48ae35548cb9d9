pub mod http_provider;
pub mod provider;
