pub mod context;
pub mod feature_export;
pub mod features;
pub mod form;
pub mod formation;
pub mod historical_dataset;
