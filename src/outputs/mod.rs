//! Output writers for scraped records.
//!
//! - [`csv`]: delimited text file with a fixed `title,summary,url,date` header

pub mod csv;
