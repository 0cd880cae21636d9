//! Form rendering module
//!
//! - `field_renderer`: field and radio group rendering
//! - `category_form`: category selector with conditional details
//! - `list_form`: repeatable tin + file entries

mod category_form;
mod field_renderer;
mod list_form;

pub use category_form::draw as draw_category_form;
pub use list_form::draw as draw_list_form;
