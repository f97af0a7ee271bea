pub mod answer;
pub mod axis;
pub mod party;
pub mod question;
pub mod result;
