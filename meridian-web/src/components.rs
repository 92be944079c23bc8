pub mod contact_form;
pub mod custom_select;
pub mod date_picker;
pub mod experience_builder;
pub mod itinerary;
pub mod summary_panel;
