pub mod dto;
pub mod goal_service;
pub mod transfer_service;
