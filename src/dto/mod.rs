pub mod api_response;
pub mod eta_dto;
pub mod route_dto;
pub mod stop_dto;
pub mod user_dto;
pub mod vehicle_dto;

pub use api_response::ApiResponse;
