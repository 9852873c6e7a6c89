pub mod attachment;
pub mod disclosure_service;
