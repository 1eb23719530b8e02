pub mod turn_service;
