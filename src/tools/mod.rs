//! EatWise Tools module
//!
//! Tool implementations shared by the MCP server and the command line.

pub mod advice;
pub mod energy;
pub mod records;
pub mod status;
