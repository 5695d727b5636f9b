pub mod assessment;
pub mod docs;
pub mod extract;
pub mod generation;
pub mod health;
