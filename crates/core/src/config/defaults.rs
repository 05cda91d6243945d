//! Default values and functions for configuration

pub(crate) const DEFAULT_PROJECT_CONFIG_FILE: &str = "tsconfig.json";
pub(crate) const DEFAULT_OUTPUT_FORMAT: &str = "summary";
pub(crate) const VALID_OUTPUT_FORMATS: &[&str] = &["summary", "json"];

pub(crate) fn default_project_config_file() -> String {
    DEFAULT_PROJECT_CONFIG_FILE.to_string()
}

pub(crate) fn default_propagate_dependencies() -> bool {
    true
}

pub(crate) fn default_output_format() -> String {
    DEFAULT_OUTPUT_FORMAT.to_string()
}
