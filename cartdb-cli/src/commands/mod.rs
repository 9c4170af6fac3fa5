pub(crate) mod columns;
pub(crate) mod config;
pub(crate) mod import;
pub(crate) mod search;
pub(crate) mod stats;
pub(crate) mod upgrade;
