pub mod custom_field_handlers;
pub mod custom_field_value_handlers;
