//! skilltrace-report: HTML and CSV rendering of rating reports.

pub mod csv;
pub mod html;
