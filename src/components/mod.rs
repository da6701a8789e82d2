pub mod card;
pub mod form_panel;
