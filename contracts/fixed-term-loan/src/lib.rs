#![no_std]

pub mod admin;
pub mod common;
pub mod interfaces;
pub mod operations;

pub use common::error::Error;

pub mod contract;

pub use contract::{LoanContract, LoanContractClient};

#[cfg(test)]
mod test;
