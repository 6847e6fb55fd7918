//! Web server with the upload views and the REST API.

pub mod run;
