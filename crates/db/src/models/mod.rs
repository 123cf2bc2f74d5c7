pub mod field_definition;
pub mod field_overrides;
pub mod inspection_template;
pub mod property_template_override;
