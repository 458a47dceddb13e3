//! Router Module Index
//!
//! Routing split by audience. Access control is not attached per router: the admin
//! gate runs router-wide and decides from the full request path.

/// Marketing site reads and public form submissions.
pub mod public;

/// Admin CRUD surface under `/api/intellsys`.
pub mod admin;

/// Admin console static pages under `/intellsys`.
pub mod console;
