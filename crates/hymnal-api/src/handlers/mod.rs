pub mod activity;
pub mod content;
pub mod drama;
pub mod hymn_detail;
pub mod images;
pub mod search;
pub mod upload;
