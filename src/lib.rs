pub mod ai_client;
pub mod brochure;
pub mod db;
pub mod error;
pub mod http_server;
pub mod settings;
pub mod utils;
pub mod vapi_client;

#[cfg(test)]
mod test_support;
