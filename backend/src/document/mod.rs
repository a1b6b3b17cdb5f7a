//! # Document Pipeline
//!
//! Everything between an uploaded Word file and a finished PDF:
//!
//! - `docx`: pulls the raw paragraph text out of a `.docx` archive.
//! - `extract`: finds `{placeholder}` tokens and infers their types and labels.
//! - `substitute`: replaces tokens with submitted form values.
//! - `render`: lays the substituted text out on A4 pages and writes the PDF.

pub mod docx;
pub mod extract;
pub mod render;
pub mod substitute;
