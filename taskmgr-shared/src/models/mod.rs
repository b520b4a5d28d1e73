/// Domain models
///
/// - [`user`]: User accounts, roles and credentials
/// - [`task`]: Tasks scoped to an owning user
///
/// Persistence lives in [`crate::store`]; these types carry no storage logic.

pub mod task;
pub mod user;
