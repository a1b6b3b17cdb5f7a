pub mod form_value;
pub mod generated_pdf;
pub mod place_holder;
pub mod stats;
pub mod template;
pub mod user;
