pub mod rest;
pub mod tcp;
