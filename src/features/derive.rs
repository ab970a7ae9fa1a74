//! Field derivation: raw log columns → time parts, ordinal recodes, network/port
//! classes and browser/OS extraction. Every derived value depends on its own row only.

use super::schema::*;
use crate::dataset::{Table, Value};
use crate::error::{PipelineError, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// First octets flagged as private. Prefix match only, so 172.x and 192.x outside
/// 172.16/12 and 192.168/16 are flagged too.
pub const PRIVATE_FIRST_OCTETS: [u32; 3] = [10, 172, 192];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingSystem {
    Windows,
    MacOs,
    Linux,
    Android,
    Ios,
    Other,
}

impl OperatingSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingSystem::Windows => "Windows",
            OperatingSystem::MacOs => "MacOS",
            OperatingSystem::Linux => "Linux",
            OperatingSystem::Android => "Android",
            OperatingSystem::Ios => "iOS",
            OperatingSystem::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortCategory {
    WellKnown,
    Registered,
    Dynamic,
}

impl PortCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortCategory::WellKnown => "Well-known",
            PortCategory::Registered => "Registered",
            PortCategory::Dynamic => "Dynamic",
        }
    }
}

/// Ground-truth classes and their numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackType {
    DDoS,
    Malware,
    Intrusion,
}

impl AttackType {
    pub const ALL: [AttackType; 3] = [AttackType::DDoS, AttackType::Malware, AttackType::Intrusion];

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "DDoS" => Some(AttackType::DDoS),
            "Malware" => Some(AttackType::Malware),
            "Intrusion" => Some(AttackType::Intrusion),
            _ => None,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.code() == code)
    }

    pub fn code(&self) -> i64 {
        match self {
            AttackType::DDoS => 0,
            AttackType::Malware => 1,
            AttackType::Intrusion => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttackType::DDoS => "DDoS",
            AttackType::Malware => "Malware",
            AttackType::Intrusion => "Intrusion",
        }
    }
}

/// Parse a log timestamp. Offsets are kept as wall-clock time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Low→1, Medium→2, High→3; anything else is unmapped.
pub fn severity_level(label: &str) -> Option<u8> {
    match label {
        "Low" => Some(1),
        "Medium" => Some(2),
        "High" => Some(3),
        _ => None,
    }
}

/// Text before the first `/`, or the whole string.
pub fn extract_browser(user_agent: &str) -> &str {
    user_agent.split('/').next().unwrap_or(user_agent)
}

/// Case-insensitive keyword match, first hit wins. Android is tested before Linux
/// because Android agents also carry "Linux".
pub fn classify_os(user_agent: &str) -> OperatingSystem {
    let ua = user_agent.to_lowercase();
    if ua.contains("windows") {
        OperatingSystem::Windows
    } else if ua.contains("mac os") || ua.contains("macintosh") {
        OperatingSystem::MacOs
    } else if ua.contains("android") {
        OperatingSystem::Android
    } else if ua.contains("linux") {
        OperatingSystem::Linux
    } else if ua.contains("iphone") || ua.contains("ipad") {
        OperatingSystem::Ios
    } else {
        OperatingSystem::Other
    }
}

/// `None` when the first dotted part is not an integer.
pub fn is_private_ip(addr: &str) -> Option<bool> {
    let first = addr.split('.').next()?.trim().parse::<u32>().ok()?;
    Some(PRIVATE_FIRST_OCTETS.contains(&first))
}

pub fn categorize_port(port: u16) -> PortCategory {
    if port <= 1023 {
        PortCategory::WellKnown
    } else if port <= 49151 {
        PortCategory::Registered
    } else {
        PortCategory::Dynamic
    }
}

pub fn is_night_traffic(hour: u32) -> bool {
    hour >= 18 || hour <= 6
}

/// Checks {6, 7} against a Monday=0 numbering, so only Sunday is flagged.
pub fn is_weekend(day_of_week: u32) -> bool {
    day_of_week == 6 || day_of_week == 7
}

/// Fields computed from one raw row.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFields {
    pub hour: u32,
    pub day_of_week: u32,
    pub month: u32,
    pub year: i32,
    pub severity: Option<u8>,
    pub browser: String,
    pub os: OperatingSystem,
    pub source_private: bool,
    pub destination_private: bool,
    pub source_port: PortCategory,
    pub destination_port: PortCategory,
    pub attack_type: Option<AttackType>,
}

impl DerivedFields {
    pub fn is_night(&self) -> bool {
        is_night_traffic(self.hour)
    }

    pub fn is_weekend(&self) -> bool {
        is_weekend(self.day_of_week)
    }
}

struct RawColumns {
    timestamp: usize,
    source_ip: usize,
    destination_ip: usize,
    source_port: usize,
    destination_port: usize,
    severity: usize,
    device: usize,
    attack_type: usize,
}

impl RawColumns {
    fn locate(table: &Table) -> Result<Self> {
        let mut idx = [0usize; REQUIRED_RAW_COLUMNS.len()];
        for (slot, name) in idx.iter_mut().zip(REQUIRED_RAW_COLUMNS) {
            *slot = table.require_column(name)?;
        }
        let [
            timestamp,
            source_ip,
            destination_ip,
            source_port,
            destination_port,
            severity,
            device,
            attack_type,
        ] = idx;
        Ok(Self {
            timestamp,
            source_ip,
            destination_ip,
            source_port,
            destination_port,
            severity,
            device,
            attack_type,
        })
    }

    fn derive(&self, row: &[Value], n: usize) -> Result<DerivedFields> {
        let raw_ts = text_cell(&row[self.timestamp], TIMESTAMP, n)?;
        let ts = parse_timestamp(raw_ts).ok_or_else(|| {
            PipelineError::data(TIMESTAMP, format!("row {}: unparseable timestamp `{}`", n, raw_ts))
        })?;
        let device = text_cell(&row[self.device], DEVICE_INFORMATION, n)?;

        Ok(DerivedFields {
            hour: ts.hour(),
            day_of_week: ts.weekday().num_days_from_monday(),
            month: ts.month(),
            year: ts.year(),
            severity: row[self.severity].as_str().and_then(severity_level),
            browser: extract_browser(device).to_string(),
            os: classify_os(device),
            source_private: private_cell(&row[self.source_ip], SOURCE_IP, n)?,
            destination_private: private_cell(&row[self.destination_ip], DESTINATION_IP, n)?,
            source_port: categorize_port(port_cell(&row[self.source_port], SOURCE_PORT, n)?),
            destination_port: categorize_port(port_cell(
                &row[self.destination_port],
                DESTINATION_PORT,
                n,
            )?),
            attack_type: row[self.attack_type].as_str().and_then(AttackType::from_label),
        })
    }
}

fn text_cell<'a>(v: &'a Value, column: &str, row: usize) -> Result<&'a str> {
    v.as_str()
        .ok_or_else(|| PipelineError::data(column, format!("row {}: expected text, found `{}`", row, v)))
}

fn private_cell(v: &Value, column: &str, row: usize) -> Result<bool> {
    let addr = text_cell(v, column, row)?;
    is_private_ip(addr).ok_or_else(|| {
        PipelineError::data(column, format!("row {}: malformed IP address `{}`", row, addr))
    })
}

fn port_cell(v: &Value, column: &str, row: usize) -> Result<u16> {
    let port = match v {
        Value::Number(_) => v.as_i64(),
        Value::Text(s) => s.trim().parse::<i64>().ok(),
        Value::Missing => None,
    };
    port.and_then(|p| u16::try_from(p).ok()).ok_or_else(|| {
        PipelineError::data(column, format!("row {}: port `{}` is not in 0..=65535", row, v))
    })
}

fn flag(b: bool) -> Value {
    Value::Number(if b { 1.0 } else { 0.0 })
}

/// Deduplicate rows, then append the derived columns to a copy of `raw`.
pub fn derive_fields(raw: &Table) -> Result<Table> {
    let cols = RawColumns::locate(raw)?;
    let mut table = raw.clone();
    let removed = table.dedup_rows();
    if removed > 0 {
        tracing::debug!(removed, "dropped duplicate rows");
    }

    let derived = table
        .rows()
        .iter()
        .enumerate()
        .map(|(n, row)| cols.derive(row, n))
        .collect::<Result<Vec<_>>>()?;

    let extractors: [(&str, fn(&DerivedFields) -> Value); 14] = [
        (HOUR, |d| Value::number(d.hour)),
        (DAY_OF_WEEK, |d| Value::number(d.day_of_week)),
        (MONTH, |d| Value::number(d.month)),
        (YEAR, |d| Value::number(d.year)),
        (SEVERITY_LEVEL_NUMERIC, |d| d.severity.map(Value::number).unwrap_or(Value::Missing)),
        (BROWSER, |d| Value::text(d.browser.clone())),
        (OPERATING_SYSTEM, |d| Value::text(d.os.as_str())),
        (IS_SOURCE_PRIVATE, |d| flag(d.source_private)),
        (IS_DESTINATION_PRIVATE, |d| flag(d.destination_private)),
        (SOURCE_PORT_CATEGORY, |d| Value::text(d.source_port.as_str())),
        (DESTINATION_PORT_CATEGORY, |d| Value::text(d.destination_port.as_str())),
        (IS_NIGHT_TRAFFIC, |d| flag(d.is_night())),
        (IS_WEEKEND, |d| flag(d.is_weekend())),
        (ATTACK_TYPE_NUMERIC, |d| {
            d.attack_type
                .map(|a| Value::number(a.code() as f64))
                .unwrap_or(Value::Missing)
        }),
    ];
    for (name, extract) in extractors {
        table.set_column(name, derived.iter().map(extract).collect())?;
    }

    tracing::info!(rows = table.len(), removed, "fields derived");
    Ok(table)
}
