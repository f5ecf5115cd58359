pub mod guard;
pub mod handlers;
pub mod signup;
pub mod strength;
