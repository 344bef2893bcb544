pub mod authenticate_routes;
pub mod bot_routes;
pub mod plan_routes;
pub mod session_routes;
pub mod user_routes;
