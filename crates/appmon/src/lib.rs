//! Command line front end for converting BTXT string tables.

pub mod commands;
