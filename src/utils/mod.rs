pub mod http;
pub mod throttle;
