pub mod http;
pub mod ticktick_client;
