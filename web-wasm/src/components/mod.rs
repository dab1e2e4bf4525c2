pub mod header;
pub mod status_screen;
pub mod general_info;
pub mod finding_panel;
pub mod material_section;
