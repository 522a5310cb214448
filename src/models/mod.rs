pub mod cast;
pub mod custom_field;
pub mod custom_field_option;
pub mod custom_field_value;
pub mod ordering;
pub mod setting;
pub mod validate;
