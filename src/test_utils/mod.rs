#![allow(missing_docs)]

pub(crate) mod http;
pub(crate) mod store;

pub(crate) use http::{assert_content_type, json_body};
pub(crate) use store::{get_test_store, january_transaction, seed_january_scenario};
