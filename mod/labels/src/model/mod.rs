pub mod label;
pub mod sanitary;

pub use label::{Label, LabelView};
pub use sanitary::{SanitaryLabel, SanitaryLabelView};
