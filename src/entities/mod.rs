pub mod courses;
pub mod enrollments;
pub mod matches;
pub mod outcome;
pub mod players;
pub mod predictions;
pub mod students;

pub use outcome::Outcome;
