/// Router Module Index
///
/// Routing split by access tier. Access control is attached per module in `create_router`,
/// so an endpoint's exposure is decided by the file it is registered in.

/// Anonymous, read-only article site plus newsletter signup.
pub mod public;

/// Routes behind the `AuthUser` middleware.
pub mod authenticated;

/// The editorial dashboard; handlers require the 'admin' role.
pub mod admin;
