//! Feature derivation, selection, one-hot encoding and contract alignment.

pub mod schema;
mod derive;
mod select;
mod encoder;
mod align;
mod pipeline;

pub use derive::{
    categorize_port, classify_os, derive_fields, extract_browser, is_night_traffic, is_private_ip,
    is_weekend, parse_timestamp, severity_level, AttackType, DerivedFields, OperatingSystem,
    PortCategory,
};
pub use select::select_features;
pub use encoder::{category_label, indicator_name, CategoryList, OneHotEncoder, Vocabulary};
pub use align::{align, AlignedMatrix, Alignment};
pub use pipeline::{FeaturePipeline, PreparedBatch};
