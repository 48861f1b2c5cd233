pub mod config;
pub mod docstore;
pub mod error;
pub mod module;
pub mod owner;
pub mod settings;
pub mod types;

pub use config::ServiceConfig;
pub use error::{error_code, ServiceError};
pub use module::Module;
pub use owner::OwnerId;
pub use settings::AccountSettings;
pub use types::{merge_patch, new_id, now_rfc3339, parse_rfc3339, ListParams, ListResult};
