pub mod apps_script;
