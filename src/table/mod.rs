//! Table extraction engine.
//!
//! A [`schema::Table`] describes one logical table: the file holding its
//! rows, where row data starts, how wide each row is, and the byte layout of
//! each column. [`extract::Extractor`] loads the file as a
//! [`region::FileRegion`], finds every row with [`locate::locate_rows`], and
//! decodes the cells column by column into a [`result::ResultSet`].
//!
//! Schemas are usually built from a JSON document with
//! [`document::Database`], but can also be assembled by hand.

pub mod column;
pub mod constants;
pub mod document;
pub mod extract;
pub mod locate;
pub mod region;
pub mod result;
pub mod schema;
