/// Business logic between the HTTP layer and the stores
///
/// - [`user`]: Registration, login and user lookup
/// - [`task`]: Task CRUD with ownership validation

pub mod task;
pub mod user;

pub use task::TaskUsecase;
pub use user::UserUsecase;
