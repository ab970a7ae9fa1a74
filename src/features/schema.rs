//! Column names of the raw log, the derived fields and the fixed feature lists.
//!
//! The selected and categorical lists define the feature space the classifier was
//! trained on. Reordering them changes indicator order only; the aligner restores
//! the model's order regardless.

// Raw log columns read by the deriver
pub const TIMESTAMP: &str = "Timestamp";
pub const SOURCE_IP: &str = "Source IP Address";
pub const DESTINATION_IP: &str = "Destination IP Address";
pub const SOURCE_PORT: &str = "Source Port";
pub const DESTINATION_PORT: &str = "Destination Port";
pub const SEVERITY_LEVEL: &str = "Severity Level";
pub const DEVICE_INFORMATION: &str = "Device Information";
pub const ATTACK_TYPE: &str = "Attack Type";

// Derived columns
pub const HOUR: &str = "Hour";
pub const DAY_OF_WEEK: &str = "DayOfWeek";
pub const MONTH: &str = "Month";
pub const YEAR: &str = "Year";
pub const SEVERITY_LEVEL_NUMERIC: &str = "Severity Level Numeric";
pub const BROWSER: &str = "Browser";
pub const OPERATING_SYSTEM: &str = "Operating System";
pub const IS_SOURCE_PRIVATE: &str = "Is Source Private";
pub const IS_DESTINATION_PRIVATE: &str = "Is Destination Private";
pub const SOURCE_PORT_CATEGORY: &str = "Source Port Category";
pub const DESTINATION_PORT_CATEGORY: &str = "Destination Port Category";
pub const IS_NIGHT_TRAFFIC: &str = "Is Night Traffic";
pub const IS_WEEKEND: &str = "Is Weekend";
pub const ATTACK_TYPE_NUMERIC: &str = "Attack Type Numeric";

/// Column appended to the aligned features in the predictions table.
pub const PREDICTIONS: &str = "Predictions";

/// Raw columns the deriver cannot run without.
/// Order matches the index destructuring in the deriver.
pub const REQUIRED_RAW_COLUMNS: [&str; 8] = [
    TIMESTAMP,
    SOURCE_IP,
    DESTINATION_IP,
    SOURCE_PORT,
    DESTINATION_PORT,
    SEVERITY_LEVEL,
    DEVICE_INFORMATION,
    ATTACK_TYPE,
];

/// Feature candidates passed downstream, in order (26).
pub const SELECTED_COLUMNS: &[&str] = &[
    "Protocol",
    "Packet Length",
    "Packet Type",
    "Traffic Type",
    "Malware Indicators",
    "Anomaly Scores",
    "Alerts/Warnings",
    "Attack Signature",
    "Action Taken",
    "Network Segment",
    "Firewall Logs",
    "IDS/IPS Alerts",
    "Log Source",
    HOUR,
    DAY_OF_WEEK,
    MONTH,
    YEAR,
    SEVERITY_LEVEL,
    BROWSER,
    OPERATING_SYSTEM,
    IS_SOURCE_PRIVATE,
    IS_DESTINATION_PRIVATE,
    SOURCE_PORT_CATEGORY,
    DESTINATION_PORT_CATEGORY,
    IS_NIGHT_TRAFFIC,
    IS_WEEKEND,
];

/// Nominal columns expanded into one-hot indicators (16, all within SELECTED_COLUMNS).
pub const CATEGORICAL_COLUMNS: &[&str] = &[
    "Protocol",
    "Packet Type",
    "Traffic Type",
    "Malware Indicators",
    "Alerts/Warnings",
    "Attack Signature",
    "Action Taken",
    "Network Segment",
    "Firewall Logs",
    "IDS/IPS Alerts",
    "Log Source",
    SEVERITY_LEVEL,
    BROWSER,
    OPERATING_SYSTEM,
    SOURCE_PORT_CATEGORY,
    DESTINATION_PORT_CATEGORY,
];

pub fn selected_columns() -> Vec<String> {
    SELECTED_COLUMNS.iter().map(|s| s.to_string()).collect()
}

pub fn categorical_columns() -> Vec<String> {
    CATEGORICAL_COLUMNS.iter().map(|s| s.to_string()).collect()
}
