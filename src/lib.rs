//---------------------------------------
pub mod model;
pub mod tasks;
pub mod error;
//---------------------------------------

//---------------------------------------
pub mod store;
pub mod service;
//---------------------------------------

//---------------------------------------
pub mod dto;
pub mod api;
pub mod routes;
//---------------------------------------

//---------------------------------------
pub mod settings;
pub mod logging;
//---------------------------------------

pub use api::{AppState, SharedState};
pub use error::{StoreError, TaskError};
pub use model::{Priority, Task};
pub use routes::map_routes;
pub use service::TaskService;
pub use settings::Settings;
pub use store::SaveFile;
