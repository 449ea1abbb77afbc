// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod notify;
pub mod query;
pub mod repo;
pub mod reports;
pub mod schema;
pub mod storage;
pub mod utils;

pub use error::{Error, Result};
pub use repo::Database;
