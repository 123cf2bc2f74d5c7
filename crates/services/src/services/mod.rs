pub mod form_schema;
pub mod template_merge;
pub mod template_validation;
