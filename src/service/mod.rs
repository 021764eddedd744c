pub mod deadline;
pub mod dispatcher;
pub mod notification_service;
pub mod routing;
pub mod task_service;
