// SPDX-License-Identifier: MIT

//! SQLite persistence layer.

mod sqlite;

pub use sqlite::Db;
