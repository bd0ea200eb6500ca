#![allow(missing_docs)]

pub(crate) mod fake_api;

pub(crate) use fake_api::FakeApi;
