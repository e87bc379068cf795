#![allow(dead_code)]

pub mod adbuilder_env;
pub mod gateway;
pub mod http_stub;
