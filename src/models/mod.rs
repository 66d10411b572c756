pub mod task;
pub mod user;

pub use task::{NewTask, Task, TaskQuery, TaskUpdate};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, User};
