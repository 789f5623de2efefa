//! HTTP-level integration tests driving the full router against the
//! in-memory stores.

mod auth_test;
mod helpers;
mod media_test;
mod post_test;
